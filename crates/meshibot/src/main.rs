// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meshibot - a restaurant-search chat-bot backend.
//!
//! This is the binary entry point.

use clap::{Parser, Subcommand};

mod cache;
mod feed;
mod notify;
mod pipeline;
mod serve;
mod tutorial;

/// Meshibot - a restaurant-search chat-bot backend.
#[derive(Parser, Debug)]
#[command(name = "meshibot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Meshibot server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = match meshibot_config::load_and_validate() {
                Ok(config) => config,
                Err(errors) => {
                    meshibot_config::render_errors(&errors);
                    std::process::exit(1);
                }
            };
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("meshibot serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // Resolved config without serve-time validation, so a partial
            // setup can still be inspected.
            match meshibot_config::load_config() {
                Ok(config) => match toml::to_string_pretty(&config) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(e) => {
                        eprintln!("meshibot config: failed to render: {e}");
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("meshibot config: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("meshibot: use --help for available commands");
        }
    }
}
