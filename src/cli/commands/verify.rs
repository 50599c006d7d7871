//! `mqttcred verify` — check a password against a stored hash.

use crate::cli::output;
use crate::cli::{prompt_password, Context};
use crate::errors::{MqttCredError, Result};

/// Execute the `verify` command.
///
/// A mismatch is an error so scripts can rely on the exit code.
pub fn execute(ctx: &Context, username: &str) -> Result<()> {
    if !ctx.store.exists(username)? {
        return Err(MqttCredError::NotFound(username.to_string()));
    }

    let password = prompt_password(username)?;
    if !ctx.store.verify(username, &password)? {
        return Err(MqttCredError::VerificationFailed(username.to_string()));
    }

    output::success(&format!("Password for '{username}' matches"));
    Ok(())
}
