//! The `wdx usernames` command: username lists to batched SQL inserts.

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use wdx_core::usernames::{convert_file, merge_patterns, SqlScript};
use wdx_core::Config;

/// Arguments for the `usernames` command.
#[derive(Args, Debug)]
pub struct UsernamesArgs {
    #[command(subcommand)]
    pub command: UsernamesCommand,
}

/// Subcommands for username SQL generation.
#[derive(Subcommand, Debug)]
pub enum UsernamesCommand {
    /// Convert one file (one username per line), keeping first-seen order
    Convert {
        /// Input text file
        input: PathBuf,
        /// Output SQL file
        output: PathBuf,
    },

    /// Merge files matching one or more glob patterns into one sorted script
    Merge {
        /// Output SQL file
        output: PathBuf,
        /// Input files or glob patterns (e.g. 'names/*.txt')
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

/// Execute the usernames command.
pub fn execute(args: UsernamesArgs, config: &Config) -> anyhow::Result<()> {
    let target = &config.usernames;

    match args.command {
        UsernamesCommand::Convert { input, output } => {
            let script = convert_file(&input, target)?;
            println!("Found {} unique usernames", script.total);
            write_script(&script, &output)?;
        }

        UsernamesCommand::Merge { output, patterns } => {
            let script = merge_patterns(&patterns, target)?;
            for c in &script.contributions {
                println!(
                    "{}: {} names, {} new unique",
                    c.path.display(),
                    c.names_read,
                    c.new_unique
                );
            }
            println!(
                "Total unique usernames across {} files: {}",
                script.contributions.len(),
                script.total
            );
            write_script(&script, &output)?;
            println!("Note: Any duplicates with existing data will be automatically skipped");
        }
    }

    Ok(())
}

fn write_script(script: &SqlScript, output: &std::path::Path) -> anyhow::Result<()> {
    script
        .write_to(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!("SQL written to {:?}", output);
    println!("Successfully created {}", output.display());
    Ok(())
}
