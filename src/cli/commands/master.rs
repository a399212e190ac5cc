//! `/master` — change the master passphrase.
//!
//! Decrypts every stored entry with the current key, re-encrypts under
//! the new one, and persists everything atomically.  The session stays
//! unlocked on the new key afterward.

use crate::cli::{choose_password, output, MIN_TYPED_LEN};
use crate::errors::{PasskeepError, Result};
use crate::vault::VaultSession;

/// Execute the `/master` command.
pub fn execute(session: &mut VaultSession) -> Result<()> {
    output::info("Choose a new master passphrase.");
    let new_passphrase = choose_password("master passphrase", MIN_TYPED_LEN)?;

    match session.change_passphrase(&new_passphrase) {
        Ok(count) => {
            output::success(&format!(
                "Master passphrase changed ({count} entries re-encrypted)."
            ));
            output::warning(
                "If you lose the new passphrase, stored passwords cannot be recovered.",
            );
        }
        Err(PasskeepError::RekeyAborted { id }) => {
            output::error(&format!(
                "Passphrase change aborted — entry {id} could not be decrypted. \
                 The vault is unchanged."
            ));
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
