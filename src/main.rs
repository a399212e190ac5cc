use std::path::PathBuf;

use clap::Parser;

use passkeep::cli::{self, commands, output, Cli, Command, ReplState};
use passkeep::config::Settings;
use passkeep::errors::{PasskeepError, Result};
use passkeep::store::{paths, CredentialStore};
use passkeep::vault::VaultSession;

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {}
        Err(PasskeepError::UserCancelled) => {}
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let db_path = cli
        .db_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(paths::database_path);

    let settings = Settings::load(&paths::data_dir())?;
    let store = CredentialStore::open(&db_path)?;
    let mut session = VaultSession::new(store, settings.kdf_params());

    output::banner(env!("CARGO_PKG_VERSION"));

    if session.is_initialized()? {
        authenticate(&mut session)?;
    } else {
        first_run(&mut session)?;
    }

    let mut state = ReplState::default();

    loop {
        let line = cli::prompt_line(">")?;
        let Some(command) = cli::parse_command(&line) else {
            if !line.trim().is_empty() {
                output::warning("Unknown command — type /help for the list.");
            }
            continue;
        };

        let result = match command {
            Command::Quit => break,
            Command::Help => {
                output::print_command_help();
                Ok(())
            }
            Command::Info => {
                output::print_info(env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            Command::View => commands::view::execute(&session, &mut state),
            Command::Add => commands::add::execute(&mut session, &mut state),
            Command::Update => commands::update::execute(&mut session),
            Command::Delete => commands::delete::execute(&mut session),
            Command::Copy => commands::copy::execute(&session, &state),
            Command::Master => commands::master::execute(&mut session),
        };

        if let Err(e) = result {
            output::error(&e.to_string());
        }
    }

    session.lock();
    output::info("Vault locked. Goodbye.");
    Ok(())
}

/// Prompt for the master passphrase until it verifies.  `/quit` exits.
fn authenticate(session: &mut VaultSession) -> Result<()> {
    loop {
        let attempt = cli::prompt_passphrase("Enter master passphrase")?;

        if matches!(attempt.trim(), "/quit" | "/q") {
            return Err(PasskeepError::UserCancelled);
        }

        match session.unlock(&attempt) {
            Ok(()) => {
                output::success("Vault unlocked.");
                return Ok(());
            }
            Err(PasskeepError::AuthenticationFailed) => {
                output::error("Incorrect master passphrase. Access denied.");
                output::tip("Try again or type /quit to exit.");
            }
            Err(e) => return Err(e),
        }
    }
}

/// First-run setup: create the master passphrase and initialize the vault.
fn first_run(session: &mut VaultSession) -> Result<()> {
    output::info("No vault found — let's create your master passphrase.");

    let passphrase = cli::choose_password("master passphrase", cli::MIN_TYPED_LEN)?;
    session.initialize(&passphrase)?;

    output::success("Vault initialized and unlocked.");
    output::warning("If you lose the master passphrase, stored passwords cannot be recovered.");
    Ok(())
}
