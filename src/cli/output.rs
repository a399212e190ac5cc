//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{presets, ContentArrangement, Table};
use console::style;

use crate::store::SecretMetadata;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the startup banner: name, version, and the command list.
pub fn banner(version: &str) {
    println!();
    println!("{}", style("passkeep").bold());
    println!("{}", style(format!("v{version}")).dim());
    println!();
    print_command_help();
}

/// Print the borderless command reference table.
pub fn print_command_help() {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);

    let commands = [
        ("/help", "all commands", "/h"),
        ("/info", "version details", "/i"),
        ("/view", "view passwords", "/v"),
        ("/add", "add password", "/a"),
        ("/update", "update password", "/u"),
        ("/delete", "delete password", "/d"),
        ("/copy", "copy to clipboard", "/c"),
        ("/master", "change master passphrase", "/m"),
        ("/quit", "quit program", "/q"),
    ];

    for (cmd, desc, shortcut) in commands {
        table.add_row(vec![
            style(cmd).dim().to_string(),
            desc.to_string(),
            style(shortcut).dim().to_string(),
        ]);
    }

    println!("{table}");
    println!();
}

/// Print version details.
pub fn print_info(version: &str) {
    println!("passkeep v{version}");
    println!("A local encrypted password vault for the terminal.");
    println!();
}

/// Print a table of stored entries (ID, Website, Username, Created).
pub fn print_entries_table(entries: &[SecretMetadata]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Website", "Username", "Created"]);

    for e in entries {
        table.add_row(vec![
            e.id.to_string(),
            e.website.clone(),
            e.username.clone(),
            e.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
}
