// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frontdesk - a university FAQ chatbot.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod ask;
mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frontdesk_config::FrontdeskConfig;

/// Frontdesk - a university FAQ chatbot.
#[derive(Parser, Debug)]
#[command(name = "frontdesk", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard locations.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default).
    Serve,
    /// Validate the configuration and print a summary.
    Check,
    /// Show which knowledge sections a question would retrieve.
    Ask {
        /// The question to look up.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> FrontdeskConfig {
    let loaded = match path {
        Some(path) => frontdesk_config::load_and_validate_from(path),
        None => frontdesk_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            frontdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check => {
            check::run_check(&config);
            Ok(())
        }
        Commands::Ask { query } => {
            ask::run_ask(&config, &query.join(" "));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("frontdesk: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["frontdesk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn ask_joins_words_and_accepts_global_config() {
        let cli = Cli::try_parse_from([
            "frontdesk",
            "ask",
            "tuition",
            "fees",
            "--config",
            "/tmp/frontdesk.toml",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Ask { query }) => assert_eq!(query.join(" "), "tuition fees"),
            other => panic!("expected ask, got {other:?}"),
        }
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/frontdesk.toml")));
    }

    #[test]
    fn ask_requires_a_query() {
        assert!(Cli::try_parse_from(["frontdesk", "ask"]).is_err());
    }
}
