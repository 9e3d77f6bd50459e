use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::config::{Settings, DEFAULT_SETTINGS_PATH};
use crate::parsers::TokenLogParser;
use crate::render;
use crate::services::{build_report, DataLoaderService, PricingTable, UsageApiClient};

/// Daily token usage & cost report for CLIProxyAPI and local token logs
#[derive(Parser, Debug)]
#[command(name = "tokreport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show daily usage report (default)
    Daily(DailyArgs),

    /// List dates that have a local token log file
    Dates,
}

#[derive(Args, Debug, Default)]
struct DailyArgs {
    /// Show detailed usage for each model per day
    #[arg(long)]
    details: bool,

    /// Show summary information only, without model details
    #[arg(long)]
    total: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Source and configuration overrides
#[derive(Args, Debug)]
struct SourceArgs {
    /// Settings file
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// CLIProxyAPI service URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Management API key
    #[arg(
        long,
        global = true,
        env = "CLI_PROXY_MANAGEMENT_KEY",
        hide_env_values = true
    )]
    key: Option<String>,

    /// Token pricing configuration file
    #[arg(long = "config", global = true, value_name = "PATH")]
    pricing: Option<PathBuf>,

    /// Token log file directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Skip the CLIProxyAPI usage endpoint
    #[arg(long, global = true)]
    no_remote: bool,

    /// Include local token log files
    #[arg(long, global = true, conflicts_with = "no_logs")]
    with_logs: bool,

    /// Exclude local token log files
    #[arg(long, global = true)]
    no_logs: bool,
}

impl SourceArgs {
    /// Settings file values with command-line overrides applied
    fn resolve(&self) -> crate::types::Result<Settings> {
        let mut settings = Settings::load(&self.settings)?;

        if let Some(url) = &self.url {
            settings.api_url = url.clone();
        }
        if let Some(path) = &self.pricing {
            settings.pricing_path = path.clone();
        }
        if let Some(dir) = &self.log_dir {
            settings.log_directory = dir.clone();
        }
        if self.no_remote {
            settings.remote_enabled = false;
        }
        if self.with_logs {
            settings.log_enabled = true;
        }
        if self.no_logs {
            settings.log_enabled = false;
        }

        Ok(settings)
    }

    fn management_key(&self) -> Option<String> {
        self.key.clone().filter(|k| !k.is_empty())
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let settings = self.sources.resolve().context("failed to load settings")?;

        match self.command {
            None => run_daily(&settings, self.sources.management_key(), DailyArgs::default()),
            Some(Commands::Daily(args)) => run_daily(&settings, self.sources.management_key(), args),
            Some(Commands::Dates) => {
                for date in TokenLogParser::new(&settings.log_directory).available_dates() {
                    println!("{}", date.format("%Y-%m-%d"));
                }
                Ok(())
            }
        }
    }
}

fn run_daily(settings: &Settings, key: Option<String>, args: DailyArgs) -> anyhow::Result<()> {
    let pricing = PricingTable::load(&settings.pricing_path)
        .context("failed to load pricing configuration")?;

    let selection = settings.source_selection();
    if selection.remote && key.is_none() {
        warn!("no management key provided, attempting access without key");
    }

    let loader = DataLoaderService::new(
        UsageApiClient::new(&settings.api_url, key),
        TokenLogParser::new(&settings.log_directory),
    );
    let records = loader
        .load(selection)
        .context("failed to load usage data")?;
    let report = build_report(&records, &pricing);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let show_details = args.details && !args.total;
        print!("{}", render::render_report(&report, show_details));
    }
    Ok(())
}
