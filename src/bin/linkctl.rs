//! Command-line companion for link-forwarder.
//!
//! Runs the same link verification the service applies to origin URLs,
//! without starting a server.
//!
//! # Usage
//!
//! ```bash
//! # Check a candidate origin URL as if it were submitted to s.example.com
//! cargo run --bin linkctl -- verify https://example.com/page --host s.example.com
//!
//! # Permit links back to this service's own forward endpoints
//! cargo run --bin linkctl -- verify https://s.example.com/fw/abc --host s.example.com --allow-self-redirection
//!
//! # Show the forward endpoint names
//! cargo run --bin linkctl -- endpoints
//! ```
//!
//! `verify` exits with status 1 when the URL is not valid.

use link_forwarder::domain::verification::{LinkVerifier, LinkVerifyResult, RequestOrigin};
use link_forwarder::utils::local_url::is_local_url;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "linkctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a candidate origin URL
    Verify {
        /// URL to classify
        url: String,

        /// Host (and optional port) the request would arrive on
        #[arg(long)]
        host: String,

        /// Scheme the request would arrive with
        #[arg(long, default_value = "https")]
        scheme: String,

        /// Accept URLs that point at this service's forward endpoints
        #[arg(long)]
        allow_self_redirection: bool,
    },

    /// List the forward endpoint names
    Endpoints,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let verifier = LinkVerifier::default();

    match cli.command {
        Commands::Verify {
            url,
            host,
            scheme,
            allow_self_redirection,
        } => {
            let origin = RequestOrigin::new(&host, &scheme);
            let result = verifier.verify(
                Some(&url),
                &is_local_url,
                &origin,
                allow_self_redirection,
            );

            print_result(&url, &origin, result);

            Ok(if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Endpoints => {
            println!("{}", "Forward endpoints".bright_blue().bold());
            for name in verifier.endpoints().names() {
                println!("  /{}", name.bright_white());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_result(url: &str, origin: &RequestOrigin, result: LinkVerifyResult) {
    let label = match result {
        LinkVerifyResult::Valid => result.code().green().bold(),
        LinkVerifyResult::InvalidFormat => result.code().red().bold(),
        LinkVerifyResult::InvalidLocal | LinkVerifyResult::InvalidSelfReference => {
            result.code().yellow().bold()
        }
    };

    println!("{}  {}", label, url);
    println!("  {} {}", "origin:".dimmed(), origin);
    println!("  {}", result.message().dimmed());
}
