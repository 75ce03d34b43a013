//! wdx CLI - WorldDex evaluation and seeding tools.
//!
//! Two independent one-shot tools:
//! - `eval` runs every prompt against every image through a hosted
//!   multimodal model and records label, latency and cost to CSV;
//! - `usernames` turns plaintext username lists into batched SQL inserts
//!   for the `username_pool` table.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate prompts.yaml against eval_images/ with Gemini 2.0 Flash
//! wdx eval
//!
//! # Seed SQL from one list, or merge many
//! wdx usernames convert usernames.txt insert_usernames.sql
//! wdx usernames merge all_names.sql 'names/*.txt' extra.txt
//!
//! # View configuration
//! wdx config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// wdx - WorldDex evaluation and seeding tools.
#[derive(Parser, Debug)]
#[command(name = "wdx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every prompt against every image and record results to CSV
    Eval(cli::eval::EvalArgs),

    /// Convert username lists to SQL insert scripts
    Usernames(cli::usernames::UsernamesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match wdx_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `wdx config path`."
            );
            wdx_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("wdx v{}", wdx_core::VERSION);

    match cli.command {
        Commands::Eval(args) => cli::eval::execute(args, config).await,
        Commands::Usernames(args) => cli::usernames::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_positionals() {
        let cli = Cli::try_parse_from(["wdx", "usernames", "convert", "in.txt", "out.sql"]).unwrap();
        assert!(matches!(cli.command, Commands::Usernames(_)));
    }

    #[test]
    fn merge_requires_a_pattern() {
        assert!(Cli::try_parse_from(["wdx", "usernames", "merge", "out.sql"]).is_err());
        assert!(Cli::try_parse_from(["wdx", "usernames", "merge", "out.sql", "*.txt"]).is_ok());
    }

    #[test]
    fn global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["wdx", "eval", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
