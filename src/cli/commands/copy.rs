//! `/copy` — copy a decrypted password to the system clipboard.

use crate::cli::{output, prompt_entry_id, ReplState};
use crate::errors::{PasskeepError, Result};
use crate::vault::VaultSession;

/// Execute the `/copy` command.
///
/// Defaults to the most recently viewed or added entry; prompts for an
/// ID otherwise.
pub fn execute(session: &VaultSession, state: &ReplState) -> Result<()> {
    let id = match state.last_id {
        Some(id) => id,
        None => {
            let Some(id) = prompt_entry_id("Enter the ID of the password to copy")? else {
                return Ok(());
            };
            id
        }
    };

    let plaintext = match session.reveal(id) {
        Ok(pt) => pt,
        Err(PasskeepError::RecordNotFound(_)) => {
            output::warning(&format!("No password found for ID {id}."));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PasskeepError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(plaintext)
        .map_err(|e| PasskeepError::ClipboardError(e.to_string()))?;

    output::success(&format!("Password for entry {id} copied to clipboard."));
    Ok(())
}
