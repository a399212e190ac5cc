//! CLI module — Clap argument parser, interactive prompts, output
//! helpers, and command implementations.

pub mod commands;
pub mod generator;
pub mod output;

use clap::Parser;
use zeroize::Zeroizing;

use crate::errors::{PasskeepError, Result};

/// Minimum length for a typed master passphrase or entry password.
pub const MIN_TYPED_LEN: usize = 12;

/// Minimum length for a generated password.
pub const MIN_GENERATED_LEN: usize = 16;

/// Passkeep CLI: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "passkeep",
    about = "Local encrypted password vault for the terminal",
    version
)]
pub struct Cli {
    /// Path to the vault database (default: platform data directory)
    #[arg(long, env = "PASSKEEP_DB")]
    pub db_path: Option<String>,
}

/// The interactive menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Info,
    View,
    Add,
    Update,
    Delete,
    Copy,
    Master,
    Quit,
}

/// Parse a typed line into a menu command, accepting shortcuts.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "/help" | "/h" => Some(Command::Help),
        "/info" | "/i" => Some(Command::Info),
        "/view" | "/v" => Some(Command::View),
        "/add" | "/a" => Some(Command::Add),
        "/update" | "/u" => Some(Command::Update),
        "/delete" | "/d" => Some(Command::Delete),
        "/copy" | "/c" => Some(Command::Copy),
        "/master" | "/m" => Some(Command::Master),
        "/quit" | "/q" => Some(Command::Quit),
        _ => None,
    }
}

/// Mutable REPL state shared across commands.
#[derive(Debug, Default)]
pub struct ReplState {
    /// The most recently viewed or added entry, used as the default
    /// target for `/copy`.
    pub last_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Shared prompt helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Read one line of input, allowing an empty answer.
pub fn prompt_line(prompt: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PasskeepError::CommandFailed(format!("input prompt: {e}")))
}

/// Read a required text field, re-prompting until it is non-empty.
pub fn prompt_nonempty(prompt: &str, field: &str) -> Result<String> {
    loop {
        let value = prompt_line(prompt)?;
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        output::warning(&format!("{field} cannot be empty."));
    }
}

/// Read an entry id, or `None` when the user leaves the field empty.
pub fn prompt_entry_id(prompt: &str) -> Result<Option<i64>> {
    loop {
        let raw = prompt_line(prompt)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<i64>() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => output::warning("Please enter a numeric ID."),
        }
    }
}

/// Read the master passphrase without echoing.
///
/// `PASSKEEP_PASSPHRASE` short-circuits the prompt for scripted use.
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory
/// on drop.
pub fn prompt_passphrase(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("PASSKEEP_PASSPHRASE") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| PasskeepError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Ask the user to either type a password or have one generated.
///
/// Typed passwords must pass the complexity check at `min_length`;
/// generated ones are at least `MIN_GENERATED_LEN` characters and are
/// shown exactly once.
pub fn choose_password(label: &str, min_length: usize) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("PASSKEEP_PASSPHRASE") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let choice = prompt_line(&format!(
            "Choose {label} method — /create to type your own, /generate for a random one"
        ))?;

        match choice.trim() {
            "/create" | "/c" => loop {
                let pw = dialoguer::Password::new()
                    .with_prompt(format!("Create {label}"))
                    .with_confirmation(
                        format!("Confirm {label}"),
                        "Entries do not match, try again",
                    )
                    .interact()
                    .map_err(|e| {
                        PasskeepError::CommandFailed(format!("passphrase prompt: {e}"))
                    })?;

                let gaps = generator::complexity_gaps(&pw, min_length);
                if gaps.is_empty() {
                    return Ok(Zeroizing::new(pw));
                }
                output::warning(&format!("Password must contain: {}", gaps.join(", ")));
            },
            "/generate" | "/g" => loop {
                let raw =
                    prompt_line(&format!("Enter password length (min {MIN_GENERATED_LEN})"))?;
                let Ok(length) = raw.trim().parse::<usize>() else {
                    output::warning("Please enter a valid number.");
                    continue;
                };
                if length < MIN_GENERATED_LEN {
                    output::warning(&format!(
                        "Password must have at least {MIN_GENERATED_LEN} characters."
                    ));
                    continue;
                }

                let pw = generator::generate_password(length);
                output::success(&format!("Generated {label}: {pw}"));
                output::warning("Store it securely — it will not be shown again.");
                return Ok(Zeroizing::new(pw));
            },
            _ => output::warning("Invalid input. Enter /create or /generate."),
        }
    }
}
