//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod completions;
pub mod delete;
#[cfg(feature = "history")]
pub mod history;
pub mod list;
pub mod menu;
pub mod show;
pub mod verify;
