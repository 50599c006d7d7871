//! `mqttcred menu` — interactive credential manager.
//!
//! Loops over a numbered menu until the operator picks "Exit".  Every
//! failed action is reported on one line and the loop continues.

use dialoguer::Select;

use crate::cli::output;
use crate::cli::{prompt_username, Context};
use crate::errors::{MqttCredError, Result};

use super::{add, delete, list, show};

/// Menu entries, in display order.
const ITEMS: [&str; 5] = [
    "Add User",
    "Delete User",
    "Show User Credentials",
    "Show All Users",
    "Exit",
];

/// One operator choice from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Delete,
    Show,
    ShowAll,
    Exit,
}

impl Action {
    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Add),
            1 => Some(Self::Delete),
            2 => Some(Self::Show),
            3 => Some(Self::ShowAll),
            4 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Execute the interactive menu.
pub fn execute(ctx: &Context) -> Result<()> {
    loop {
        println!();
        let choice = Select::new()
            .with_prompt("MQTT User Credentials Manager")
            .items(&ITEMS)
            .default(0)
            .interact()
            .map_err(|e| MqttCredError::CommandFailed(format!("menu prompt: {e}")))?;

        let action = Action::from_index(choice).unwrap_or(Action::Exit);
        if action == Action::Exit {
            output::info("Exiting MQTT User Credentials Manager.");
            return Ok(());
        }

        if let Err(e) = run_action(ctx, action) {
            output::error(&e.to_string());
        }
    }
}

fn run_action(ctx: &Context, action: Action) -> Result<()> {
    match action {
        Action::Add => add::execute(ctx, &prompt_username("MQTT username")?),
        Action::Delete => {
            delete::execute(ctx, &prompt_username("MQTT username to delete")?, false)
        }
        Action::Show => show::execute(ctx, &prompt_username("MQTT username to show")?),
        Action::ShowAll => list::execute(ctx),
        Action::Exit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_item_maps_to_an_action() {
        for i in 0..ITEMS.len() {
            assert!(Action::from_index(i).is_some());
        }
        assert_eq!(Action::from_index(ITEMS.len()), None);
    }

    #[test]
    fn last_item_is_exit() {
        assert_eq!(ITEMS[ITEMS.len() - 1], "Exit");
        assert_eq!(Action::from_index(ITEMS.len() - 1), Some(Action::Exit));
    }
}
