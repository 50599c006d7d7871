use clap::Parser;
use mqttcred::cli::{Cli, Commands, Context};

fn main() {
    // Diagnostics go to stderr; RUST_LOG overrides the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Completions need no settings or credentials file.
    if let Some(Commands::Completions { shell }) = cli.command {
        if let Err(e) = mqttcred::cli::commands::completions::execute(shell) {
            mqttcred::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
        return;
    }

    let ctx = match Context::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            mqttcred::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None | Some(Commands::Menu) => mqttcred::cli::commands::menu::execute(&ctx),
        Some(Commands::Add { ref username }) => {
            mqttcred::cli::commands::add::execute(&ctx, username)
        }
        Some(Commands::Delete {
            ref username,
            force,
        }) => mqttcred::cli::commands::delete::execute(&ctx, username, force),
        Some(Commands::Show { ref username }) => {
            mqttcred::cli::commands::show::execute(&ctx, username)
        }
        Some(Commands::List) => mqttcred::cli::commands::list::execute(&ctx),
        Some(Commands::Verify { ref username }) => {
            mqttcred::cli::commands::verify::execute(&ctx, username)
        }
        #[cfg(feature = "history")]
        Some(Commands::History {
            ref user,
            last,
            ref since,
        }) => mqttcred::cli::commands::history::execute(
            &ctx,
            user.as_deref(),
            last,
            since.as_deref(),
        ),
        Some(Commands::Completions { .. }) => Ok(()),
    };

    if let Err(e) = result {
        mqttcred::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
