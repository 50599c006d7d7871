//! `mqttcred show` — print one user's stored record.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{MqttCredError, Result};

/// Execute the `show` command.
pub fn execute(ctx: &Context, username: &str) -> Result<()> {
    let token = ctx
        .store
        .find(username)?
        .ok_or_else(|| MqttCredError::NotFound(username.to_string()))?;

    output::print_credential(username, &token);

    Ok(())
}
