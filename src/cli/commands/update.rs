//! `/update` — change an entry's username and/or password.

use dialoguer::Confirm;

use crate::cli::{choose_password, output, prompt_entry_id, prompt_line, MIN_TYPED_LEN};
use crate::errors::{PasskeepError, Result};
use crate::vault::VaultSession;

/// Execute the `/update` command.
pub fn execute(session: &mut VaultSession) -> Result<()> {
    let entries = session.entries()?;
    if entries.is_empty() {
        output::info("No passwords stored yet.");
        return Ok(());
    }

    output::print_entries_table(&entries);

    let Some(id) = prompt_entry_id("Enter the ID of the entry to update (empty to go back)")?
    else {
        return Ok(());
    };

    let username_input = prompt_line("New username (empty to keep current)")?;
    let username = {
        let trimmed = username_input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    let replace_password = Confirm::new()
        .with_prompt("Replace the stored password?")
        .default(false)
        .interact()
        .map_err(|e| PasskeepError::CommandFailed(format!("confirm prompt: {e}")))?;

    let password = if replace_password {
        Some(choose_password("password", MIN_TYPED_LEN)?)
    } else {
        None
    };

    if username.is_none() && password.is_none() {
        output::warning("Nothing to update.");
        return Ok(());
    }

    match session.update(id, username.as_deref(), password.as_ref().map(|p| p.as_str())) {
        Ok(()) => output::success(&format!("Entry {id} updated.")),
        Err(PasskeepError::RecordNotFound(_)) => {
            output::warning(&format!("No password found for ID {id}."));
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
