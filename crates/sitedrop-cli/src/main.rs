//! Sitedrop - deploy static sites to decentralized hosting
//!
//! Usage:
//!   sitedrop deploy ./public --name my-site   # Deploy a local directory
//!   sitedrop search blog                      # Search projects
//!   sitedrop view <project-id>                # Show project detail
//!   sitedrop call deploy_site --args '{...}'  # Raw tool call (JSON in, JSON out)

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitedrop_core::context::AppContext;
use sitedrop_core::tools::{DeploySiteArgs, SearchProjectArgs, ToolResponse, ViewProjectArgs};
use sitedrop_core::types::{FileMap, Platform};

#[derive(Parser)]
#[command(name = "sitedrop")]
#[command(about = "Deploy static sites to 4EVERLAND hosting", long_about = None)]
struct Cli {
    /// Config file (defaults to <config_dir>/sitedrop/sitedrop.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the files of a local directory
    Deploy {
        /// Directory whose contents become the site root
        dir: PathBuf,

        /// Project name (alphanumeric, underscore, hyphen; no leading/trailing hyphen)
        #[arg(long, short)]
        name: String,

        /// Deploy to an existing project instead of creating one
        #[arg(long)]
        project_id: Option<String>,

        /// Storage platform for a new project (ipfs, ar, ic, greenfield)
        #[arg(long, short, value_parser = parse_platform)]
        platform: Option<Platform>,
    },

    /// Search projects by keyword
    Search {
        keyword: String,
    },

    /// Show the detail of one project
    View {
        /// Project ID
        id: String,
    },

    /// Invoke a tool with JSON arguments and print the JSON response
    Call {
        /// Tool name (deploy_site, search_project, view_project_detail)
        tool: String,

        /// JSON arguments; read from stdin when omitted
        #[arg(long)]
        args: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable text
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitedrop=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::load(cli.config.clone())?;

    // Raw tool calls always answer in the tool's own JSON shape
    let format = match cli.command {
        Commands::Call { .. } => OutputFormat::Json,
        _ => cli.format,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let response = runtime.block_on(run_cli(&ctx, cli.command))?;

    print_response(&response, format)?;
    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_cli(ctx: &AppContext, command: Commands) -> Result<ToolResponse> {
    let host = ctx.tool_host()?;

    let response = match command {
        Commands::Deploy {
            dir,
            name,
            project_id,
            platform,
        } => {
            let code_files = FileMap::from_dir(&dir)
                .with_context(|| format!("Failed to read site directory: {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), files = code_files.len(), "Read site directory");
            host.deploy_site(DeploySiteArgs {
                code_files,
                project_name: name,
                project_id,
                platform,
            })
            .await
        }
        Commands::Search { keyword } => host.search_project(SearchProjectArgs { keyword }).await,
        Commands::View { id } => host.view_project_detail(ViewProjectArgs { id }).await,
        Commands::Call { tool, args } => {
            let raw = match args {
                Some(raw) => raw,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read tool arguments from stdin")?;
                    buf
                }
            };
            let args: serde_json::Value =
                serde_json::from_str(&raw).context("Tool arguments must be valid JSON")?;
            host.call(&tool, args).await
        }
    };

    Ok(response)
}

fn print_response(response: &ToolResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if response.is_success() {
                println!("{} {}", style("✓").green(), response.text());
                if let Some(id) = &response.project_id {
                    println!("  Project ID: {}", style(id).green());
                }
            } else {
                println!("{} {}", style("✗").red(), response.text());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }
    Ok(())
}

fn parse_platform(raw: &str) -> Result<Platform, String> {
    raw.parse::<Platform>().map_err(|e| e.to_string())
}
