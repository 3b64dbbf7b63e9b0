#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod logging;
mod server;

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Serves the barangay web application behind the role-based access gate.
#[derive(Debug, Parser)]
#[command(name = "brgy-server", version, about)]
struct Cli {
    /// YAML configuration file. Environment variables prefixed with
    /// `BRGY__` override its values.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration (secrets redacted) and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    logging::init(&cfg.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting brgy-server");

    server::run(cfg).await
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["brgy-server", "-c", "brgy.yaml", "--print-config"]);

        assert_eq!(cli.config, Some(PathBuf::from("brgy.yaml")));
        assert!(cli.print_config);
    }
}
