//! `mqttcred history` — show who was added or removed, and when.
//!
//! Usage:
//!   mqttcred history                 # latest 50 changes
//!   mqttcred history --user alice    # one user's changes
//!   mqttcred history --since 7d      # changes from the last week

use chrono::{DateTime, TimeDelta, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{MqttCredError, Result};
use crate::history::{Change, ChangeFilter, ChangeKind, History};

/// Execute the `history` command.
pub fn execute(ctx: &Context, user: Option<&str>, last: usize, since: Option<&str>) -> Result<()> {
    let Some(path) = &ctx.history_path else {
        output::info("Change history is off.");
        output::tip("Set history_file in .mqttcred.toml to start recording changes.");
        return Ok(());
    };

    // Parse before touching the database so a bad --since creates nothing.
    let since = since.map(|s| parse_since(s, Utc::now())).transpose()?;

    if !path.exists() {
        output::info("No changes recorded yet.");
        return Ok(());
    }

    let changes = History::open(path)?.changes(&ChangeFilter {
        username: user.map(str::to_string),
        since,
        limit: last,
    })?;

    if changes.is_empty() {
        output::info("No matching changes.");
        return Ok(());
    }

    print_changes(&changes);
    Ok(())
}

/// Turn "7d", "24h" or "30m" into the instant that long before `now`.
fn parse_since(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = |why: &str| {
        MqttCredError::CommandFailed(format!(
            "invalid --since '{input}': {why} (use e.g. 7d, 24h, 30m)"
        ))
    };

    let unit = input
        .chars()
        .last()
        .ok_or_else(|| invalid("empty value"))?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid("not a whole number"))?;
    if amount <= 0 {
        return Err(invalid("must be greater than zero"));
    }

    let span = match unit {
        'd' => TimeDelta::try_days(amount),
        'h' => TimeDelta::try_hours(amount),
        'm' => TimeDelta::try_minutes(amount),
        _ => return Err(invalid("unknown unit")),
    }
    .ok_or_else(|| invalid("too large"))?;

    now.checked_sub_signed(span)
        .ok_or_else(|| invalid("too large"))
}

fn print_changes(changes: &[Change]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When (UTC)", "Change", "User", "Detail", "File"]);

    for change in changes {
        let (kind, detail) = match change.kind {
            ChangeKind::Added => (
                style("added").green().to_string(),
                change
                    .rounds
                    .map(|r| format!("{r} rounds"))
                    .unwrap_or_default(),
            ),
            ChangeKind::Removed => (
                style("removed").red().to_string(),
                change
                    .remaining
                    .map(|n| format!("{n} left"))
                    .unwrap_or_default(),
            ),
        };

        table.add_row(vec![
            change.at.format("%Y-%m-%d %H:%M:%S").to_string(),
            kind,
            change.username.clone(),
            detail,
            change.credentials_file.display().to_string(),
        ]);
    }

    println!("{table}");
}
