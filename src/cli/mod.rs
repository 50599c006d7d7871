//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{MqttCredError, Result};
use crate::policy::PasswordPolicy;
use crate::store::CredentialStore;

/// Environment variable that supplies the password non-interactively.
pub const PASSWORD_ENV: &str = "MQTTCRED_PASSWORD";

/// mqttcred CLI: manage MQTT broker username/password-hash records.
#[derive(Parser)]
#[command(
    name = "mqttcred",
    about = "MQTT broker credential file manager",
    version
)]
pub struct Cli {
    /// Subcommand to run (omit for the interactive menu)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Credentials file (overrides `credentials_file` in .mqttcred.toml)
    #[arg(long, env = "MQTTCRED_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Directory containing .mqttcred.toml (default: current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a user (prompts for the password)
    Add {
        /// MQTT username
        username: String,
    },

    /// Delete a user
    Delete {
        /// MQTT username
        username: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show one user's stored credentials
    Show {
        /// MQTT username
        username: String,
    },

    /// List all users
    List,

    /// Check a password against a user's stored hash
    Verify {
        /// MQTT username
        username: String,
    },

    /// Interactive menu (default when no subcommand is given)
    Menu,

    /// Show recorded additions and removals (needs `history_file` in .mqttcred.toml)
    #[cfg(feature = "history")]
    History {
        /// Only changes to this user
        #[arg(long)]
        user: Option<String>,
        /// Maximum number of changes to show
        #[arg(long, default_value_t = 50)]
        last: usize,
        /// Only changes newer than this (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Print a shell completion script to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Everything a command needs: resolved settings plus the store handle.
pub struct Context {
    pub settings: Settings,
    pub store: CredentialStore,
    /// Change history database, when `history_file` is configured.
    pub history_path: Option<PathBuf>,
}

impl Context {
    /// Resolve settings and the credentials path from the CLI arguments.
    ///
    /// `--file` wins over `credentials_file` from the config.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_dir = match &cli.config_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let settings = Settings::load(&config_dir)?;

        let path = match &cli.file {
            Some(file) => file.clone(),
            None => settings.credentials_path(&config_dir),
        };
        let store = CredentialStore::new(path, settings.hasher_params());
        let history_path = settings.history_path(&config_dir);

        Ok(Self {
            settings,
            store,
            history_path,
        })
    }

    pub fn policy(&self) -> PasswordPolicy {
        self.settings.password_policy()
    }

    /// Note a user the store has just appended.
    pub fn record_added(&self, username: &str) {
        #[cfg(feature = "history")]
        {
            let rounds = self.store.params().rounds;
            self.record(crate::history::Change::added(self.store.path(), username, rounds));
        }

        #[cfg(not(feature = "history"))]
        let _ = username;
    }

    /// Note a user the store has just removed.
    pub fn record_removed(&self, username: &str, remaining: usize) {
        #[cfg(feature = "history")]
        {
            let change = crate::history::Change::removed(self.store.path(), username, remaining);
            self.record(change);
        }

        #[cfg(not(feature = "history"))]
        let _ = (username, remaining);
    }

    /// The change is already on disk, so a history failure only warns.
    #[cfg(feature = "history")]
    fn record(&self, change: crate::history::Change) {
        let Some(path) = &self.history_path else {
            return;
        };
        let result = crate::history::History::open(path).and_then(|h| h.record(&change));
        if let Err(e) = result {
            log::warn!("change history not updated: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Read a password from `MQTTCRED_PASSWORD`, if set and non-empty.
fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Get an existing password (used by `verify`), trying in order:
/// 1. `MQTTCRED_PASSWORD` env var (scripts)
/// 2. Interactive masked prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(username: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for '{username}'"))
        .interact()
        .map_err(|e| MqttCredError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `add`).
///
/// Also respects `MQTTCRED_PASSWORD` for scripted usage, in which case a
/// policy violation is an error instead of a retry.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password(policy: &PasswordPolicy) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        policy.check(&pw)?;
        return Ok(pw);
    }

    output::tip(&policy.describe());
    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Enter password (input will be hidden)")
                .with_confirmation("Confirm password", "Passwords do not match, try again")
                .interact()
                .map_err(|e| MqttCredError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if let Err(e) = policy.check(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(password);
    }
}

/// Prompt for a username (used by the interactive menu).
pub fn prompt_username(prompt: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| MqttCredError::CommandFailed(format!("input prompt: {e}")))
}
