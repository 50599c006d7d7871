//! `mqttcred delete` — remove a user from the credentials file.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{MqttCredError, Result};

/// Execute the `delete` command.
pub fn execute(ctx: &Context, username: &str, force: bool) -> Result<()> {
    // Unknown users fail before the confirmation prompt.
    if !ctx.store.exists(username)? {
        return Err(MqttCredError::NotFound(username.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete user '{username}'?"))
            .default(false)
            .interact()
            .map_err(|e| MqttCredError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let remaining = ctx.store.remove(username)?;
    ctx.record_removed(username, remaining);
    output::success(&format!(
        "Deleted user '{username}' from '{}' ({remaining} remaining)",
        ctx.store.path().display()
    ));
    output::reload_reminder();

    Ok(())
}
