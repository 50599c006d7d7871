//! `mqttcred add` — hash a new password and append the user.

use crate::cli::output;
use crate::cli::{prompt_new_password, Context};
use crate::errors::{MqttCredError, Result};
use crate::store::validate_username;

/// Execute the `add` command.
pub fn execute(ctx: &Context, username: &str) -> Result<()> {
    // Reject bad or taken names before prompting for a password.
    validate_username(username)?;
    if ctx.store.exists(username)? {
        return Err(MqttCredError::AlreadyExists(username.to_string()));
    }

    let password = prompt_new_password(&ctx.policy())?;
    ctx.store.add(username, &password)?;

    ctx.record_added(username);
    output::success(&format!(
        "Credentials for '{username}' added to '{}'",
        ctx.store.path().display()
    ));
    output::reload_reminder();

    Ok(())
}
