//! `mqttcred list` — display all usernames in a table.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let path = ctx.store.path();
    let usernames = ctx.store.list_all()?;

    if !usernames.is_empty() {
        output::info(&format!("{} — {} user(s)", path.display(), usernames.len()));
    }

    output::print_users_table(&usernames, path);

    Ok(())
}
