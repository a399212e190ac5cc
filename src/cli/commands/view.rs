//! `/view` — list stored entries and reveal one password.

use console::style;

use crate::cli::{output, prompt_entry_id, ReplState};
use crate::errors::{PasskeepError, Result};
use crate::vault::VaultSession;

/// Execute the `/view` command.
pub fn execute(session: &VaultSession, state: &mut ReplState) -> Result<()> {
    let entries = session.entries()?;
    if entries.is_empty() {
        output::info("No passwords stored yet.");
        output::tip("Use /add to store your first password.");
        return Ok(());
    }

    output::print_entries_table(&entries);

    let Some(id) = prompt_entry_id("Enter the ID of the password to reveal (empty to go back)")?
    else {
        return Ok(());
    };

    match session.reveal(id) {
        Ok(plaintext) => {
            println!("Password: {}", style(&plaintext).bold());
            state.last_id = Some(id);
        }
        Err(PasskeepError::RecordNotFound(_)) => {
            output::warning(&format!("No password found for ID {id}."));
        }
        Err(PasskeepError::DecryptionFailed) => {
            output::error("Decryption failed — this entry cannot be read under the current key.");
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
