use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scholar_sync::config::{find_config_file, get_config, load_config, Config, CONFIG_FILE_NAME};
use scholar_sync::scholar::{ScholarClient, StatLookup};
use scholar_sync::Runner;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar Sync - Save Google Scholar metrics and publications as JSON
#[derive(Parser, Debug)]
#[command(name = "scholar-sync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch Google Scholar citation metrics and publications into JSON files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scholar profile identifier (overrides scholar.user_id)
    #[arg(long, short, global = true)]
    user: Option<String>,

    /// Output directory for the JSON files (overrides output.directory)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Base URL of the Scholar service (overrides scholar.base_url)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Pause between the two requests in milliseconds (overrides scholar.request_delay_ms)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// How profile statistics are located (overrides scholar.stat_lookup)
    #[arg(long, value_enum, global = true)]
    stat_lookup: Option<LookupArg>,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Statistic lookup strategy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LookupArg {
    /// First three statistic cells, in page order
    Positional,
    /// Statistics table rows matched by label
    Labeled,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch metrics and publications and write them (default)
    Fetch,

    /// Parse saved profile/listing pages instead of fetching them
    Parse {
        /// Saved profile page (metrics)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Saved listing page (publications)
        #[arg(long)]
        listing: Option<PathBuf>,
    },

    /// Write a configuration file with the default settings
    InitConfig {
        /// Destination (default: ./scholar-sync.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Scholar Sync - Environment Variables");
    println!();
    println!("Profile:");
    println!("  SCHOLAR_SYNC_SCHOLAR__USER_ID           Scholar profile identifier");
    println!("  SCHOLAR_SYNC_SCHOLAR__BASE_URL          Service URL (default: https://scholar.google.com)");
    println!("  SCHOLAR_SYNC_SCHOLAR__LANGUAGE          Interface language (default: en)");
    println!("  SCHOLAR_SYNC_SCHOLAR__PAGE_SIZE         Listing rows requested (default: 100)");
    println!("  SCHOLAR_SYNC_SCHOLAR__REQUEST_DELAY_MS  Pause between requests (default: 2000)");
    println!("  SCHOLAR_SYNC_SCHOLAR__USER_AGENT        User-Agent header");
    println!("  SCHOLAR_SYNC_SCHOLAR__STAT_LOOKUP       positional or labeled (default: positional)");
    println!();
    println!("Output:");
    println!("  SCHOLAR_SYNC_OUTPUT__DIRECTORY          Output directory (default: data)");
    println!("  SCHOLAR_SYNC_OUTPUT__METRICS_FILE       Metrics file name (default: metrics.json)");
    println!("  SCHOLAR_SYNC_OUTPUT__PUBLICATIONS_FILE  Publications file name (default: publications.json)");
    println!();
    println!("Other Settings:");
    println!("  SCHOLAR_SYNC_LOGGING__LEVEL             Log level when no -v/-q is given (default: info)");
    println!("  RUST_LOG                                Rust logging filter, overrides everything else");
}

fn load(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let path = cli.config.clone().or_else(find_config_file);

    let mut config = match &path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config().context("Failed to read configuration from environment")?,
    };

    if let Some(user) = &cli.user {
        config.scholar.user_id = user.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.scholar.base_url = base_url.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.scholar.request_delay_ms = delay_ms;
    }
    if let Some(lookup) = cli.stat_lookup {
        config.scholar.stat_lookup = match lookup {
            LookupArg::Positional => StatLookup::Positional,
            LookupArg::Labeled => StatLookup::Labeled,
        };
    }

    Ok((config, path))
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scholar_sync={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(ExitCode::SUCCESS);
    }

    let (config, config_path) = load(&cli)?;
    init_tracing(&cli, &config);

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let summary = match cli.command.unwrap_or(Commands::Fetch) {
        Commands::Fetch => {
            config.scholar.validate()?;
            let runner = Runner::new(&config)?;
            let client = ScholarClient::new(&config.scholar)?;
            runner.run(&client).await
        }
        Commands::Parse { profile, listing } => {
            if profile.is_none() && listing.is_none() {
                bail!("Nothing to parse: pass --profile and/or --listing");
            }
            let runner = Runner::new(&config)?;
            runner.run_offline(profile.as_deref(), listing.as_deref())
        }
        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            config.save(&path)?;
            println!("Wrote {}", path.display());
            return Ok(ExitCode::SUCCESS);
        }
    };

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["scholar-sync"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.user.is_none());
        assert!(cli.delay_ms.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["scholar-sync", "-vv"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["scholar-sync", "fetch", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "scholar-sync",
            "--user",
            "abc123",
            "--output-dir",
            "site/data",
            "--delay-ms",
            "0",
            "--stat-lookup",
            "labeled",
        ]);

        assert_eq!(cli.user.as_deref(), Some("abc123"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("site/data")));
        assert_eq!(cli.delay_ms, Some(0));
        assert_eq!(cli.stat_lookup, Some(LookupArg::Labeled));
    }

    #[test]
    fn test_cli_parse_command() {
        let cli = Cli::parse_from(["scholar-sync", "parse", "--profile", "profile.html"]);
        match cli.command {
            Some(Commands::Parse { profile, listing }) => {
                assert_eq!(profile, Some(PathBuf::from("profile.html")));
                assert!(listing.is_none());
            }
            other => panic!("Expected Parse command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_init_config_command() {
        let cli = Cli::parse_from(["scholar-sync", "init-config", "my.toml", "--force"]);
        match cli.command {
            Some(Commands::InitConfig { path, force }) => {
                assert_eq!(path, Some(PathBuf::from("my.toml")));
                assert!(force);
            }
            other => panic!("Expected InitConfig command, got {:?}", other),
        }
    }
}
