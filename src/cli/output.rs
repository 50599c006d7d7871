//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Remind the operator that the broker only sees changes after a reload.
pub fn reload_reminder() {
    tip("Restart or reload the MQTT broker so it picks up the new credentials.");
}

/// Print a numbered table of usernames.
pub fn print_users_table(usernames: &[String], path: &Path) {
    if usernames.is_empty() {
        info(&format!("No users in {} yet.", path.display()));
        tip("Run `mqttcred add <USERNAME>` to add your first user.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Username"]);

    for (i, name) in usernames.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), name.clone()]);
    }

    println!("{table}");
}

/// Print one stored record as `username:token`, ready to paste into a
/// broker password file.
pub fn print_credential(username: &str, token: &str) {
    println!("{}:{}", style(username).bold(), token);
}
