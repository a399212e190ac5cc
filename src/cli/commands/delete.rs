//! `/delete` — remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::{output, prompt_entry_id};
use crate::errors::{PasskeepError, Result};
use crate::vault::VaultSession;

/// Execute the `/delete` command.
pub fn execute(session: &mut VaultSession) -> Result<()> {
    let entries = session.entries()?;
    if entries.is_empty() {
        output::info("No passwords stored yet.");
        return Ok(());
    }

    output::print_entries_table(&entries);

    let Some(id) = prompt_entry_id("Enter the ID of the entry to delete (empty to go back)")?
    else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt(format!("Delete entry {id}?"))
        .default(false)
        .interact()
        .map_err(|e| PasskeepError::CommandFailed(format!("confirm prompt: {e}")))?;

    if !confirmed {
        output::info("Cancelled.");
        return Ok(());
    }

    if session.delete(id)? {
        output::success(&format!("Entry {id} deleted."));
    } else {
        output::warning(&format!("No password found for ID {id}."));
    }

    Ok(())
}
