use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "objact", version, about = "Object action registration tooling")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a console registration file (schema and consistency checks).
    Check {
        /// Path to the console YAML file
        file: PathBuf,
    },

    /// List the actions a user would be offered, per display slot.
    List {
        /// Path to the console YAML file
        file: PathBuf,

        /// Permission held by the user (repeatable)
        #[arg(long = "permission", short = 'p')]
        permissions: Vec<String>,

        /// Treat the user as a superuser
        #[arg(long, default_value_t = false)]
        superuser: bool,

        /// Show the creation form (no object yet)
        #[arg(long = "new-object", default_value_t = false)]
        new_object: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Check { file } => commands::check::run(&file)?,
        Command::List {
            file,
            permissions,
            superuser,
            new_object,
        } => commands::list::run(
            &file,
            &commands::list::ListOptions {
                permissions,
                superuser,
                new_object,
            },
        )?,
    }

    Ok(())
}
