//! `/add` — store a new website credential.

use crate::cli::{choose_password, output, prompt_nonempty, ReplState, MIN_TYPED_LEN};
use crate::errors::Result;
use crate::vault::VaultSession;

/// Execute the `/add` command.
pub fn execute(session: &mut VaultSession, state: &mut ReplState) -> Result<()> {
    let website = prompt_nonempty("Enter website", "Website")?;
    let username = prompt_nonempty("Enter username", "Username")?;
    let password = choose_password("password", MIN_TYPED_LEN)?;

    let id = session.add(&website, &username, &password)?;
    state.last_id = Some(id);

    output::success(&format!("Password for {website} added (ID {id})."));
    Ok(())
}
