mod commands;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::Result;
use boozedb::{BoozeDbConfig, CatalogService, DefaultAssembler};
use clap::{Parser, Subcommand};

use commands::{Backend, GetArgs, SearchArgs, handle_get, handle_meta, handle_search};
use output::{GlobalOptions, OutputFormat, OutputManager};

const HELP_APPENDIX: &str = "\
Environment Variables:
  REDIS_URL       Redis connection URL (default for [redis].url)
  BOOZEDB_CONFIG  Path to a boozedb.toml config file
  RUST_LOG        Log filter, e.g. boozedb=debug

Examples:
  boozedb get wh-003
  boozedb search --category Whiskey --max-price 60 --page 2
  boozedb --fixtures bottles.json --output json meta";

/// Look up bottles in the BoozeDB catalog
#[derive(Parser)]
#[command(name = "boozedb", version)]
#[command(styles = theme::help_styles(), after_long_help = HELP_APPENDIX)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print backend and request details to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (falls back to $BOOZEDB_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve lookups from a JSON fixture file instead of Redis
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a single bottle by id
    Get(GetArgs),

    /// Search the catalog with optional filters
    Search(SearchArgs),

    /// Show the category taxonomy
    Meta,
}

impl Cli {
    fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            output_format: self.output.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
            no_color: self.no_color,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    let output = OutputManager::new(cli.global_options());

    if let Err(err) = run(cli, &output).await {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &OutputManager) -> Result<()> {
    let config = BoozeDbConfig::load(cli.config.as_deref())?;
    let backend = Backend::open(&config, cli.fixtures.as_ref(), output).await?;
    let assembler = DefaultAssembler::parse(&config.links.base_url)?;
    let service = CatalogService::new(backend, assembler).with_defaults(config.pagination);

    match cli.command {
        Commands::Get(args) => handle_get(&service, &config, args, output).await,
        Commands::Search(args) => handle_search(&service, &config, args, output).await,
        Commands::Meta => handle_meta(&service, output).await,
    }
}
