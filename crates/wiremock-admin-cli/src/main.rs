//! WireMock admin CLI
//!
//! Inspect and manage a running WireMock server from the shell. Every command
//! prints its result as pretty JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # List stub mappings on localhost:8080
//! wiremock-admin mappings list
//!
//! # Import every *.json mapping in a directory
//! wiremock-admin --admin-url http://wiremock:8080 --files-root ./__files \
//!     mappings import ./mappings
//!
//! # Count GET /api/users requests made by Chrome
//! wiremock-admin --browser chrome requests count --method GET --url /api/users
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use wiremock_admin::builders::request_for;
use wiremock_admin::matchers::{url_equal_to, url_matching};
use wiremock_admin::model::RequestMethod;
use wiremock_admin::{AdminClient, AdminConfig};

#[derive(Parser, Debug)]
#[command(name = "wiremock-admin")]
#[command(author, version, about = "Manage a WireMock server through its admin API")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admin API URL (overrides the configuration file)
    #[arg(short, long, env = "WIREMOCK_ADMIN_URL")]
    admin_url: Option<String>,

    /// Directory body files are resolved against when not found as given
    #[arg(long)]
    files_root: Option<PathBuf>,

    /// Only count and search requests whose User-Agent names this browser
    #[arg(long)]
    browser: Option<String>,

    /// Log admin requests
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stub mappings
    #[command(subcommand)]
    Mappings(MappingsCommand),

    /// Scenario state
    #[command(subcommand)]
    Scenarios(ScenariosCommand),

    /// Request journal
    #[command(subcommand)]
    Requests(RequestsCommand),

    /// Body file store
    #[command(subcommand)]
    Files(FilesCommand),
}

#[derive(Subcommand, Debug)]
enum MappingsCommand {
    /// List all stub mappings
    List,
    /// Show one stub mapping
    Get { id: String },
    /// Add a mapping for every *.json file in a directory
    Import { dir: PathBuf },
    /// Delete a stub mapping and its body file
    Delete { id: String },
    /// Delete all mappings and files, then clear the request journal
    Reset,
}

#[derive(Subcommand, Debug)]
enum ScenariosCommand {
    /// List scenarios and their current state
    List,
    /// Move every scenario back to its initial state
    Reset,
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    /// Dump the request journal
    List,
    /// Clear the request journal
    Reset,
    /// Count journaled requests
    Count {
        /// HTTP method to match
        #[arg(short, long, default_value = "ANY")]
        method: RequestMethod,

        /// Exact URL to match; all URLs when omitted
        #[arg(short, long)]
        url: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FilesCommand {
    /// List stored files
    List,
    /// Delete every stored file
    DeleteAll,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let config = load_config(&args)?;
    debug!(base_url = %config.base_url, "Using admin API");
    let client = AdminClient::new(&config).context("Failed to create admin client")?;

    match args.command {
        Command::Mappings(command) => run_mappings(&client, command).await,
        Command::Scenarios(command) => run_scenarios(&client, command).await,
        Command::Requests(command) => {
            run_requests(&client, config.browser_name.as_deref(), command).await
        }
        Command::Files(command) => run_files(&client, command).await,
    }
}

/// Configuration file values, overridden by command line flags.
fn load_config(args: &Args) -> anyhow::Result<AdminConfig> {
    let mut config = match &args.config {
        Some(path) => AdminConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AdminConfig::default(),
    };

    if let Some(url) = &args.admin_url {
        config.base_url = url.clone();
    }
    if let Some(root) = &args.files_root {
        config.files_root = Some(root.clone());
    }
    if let Some(browser) = &args.browser {
        config.browser_name = Some(browser.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn run_mappings(client: &AdminClient, command: MappingsCommand) -> anyhow::Result<()> {
    match command {
        MappingsCommand::List => print_json(&client.get_mappings().await?),
        MappingsCommand::Get { id } => print_json(&client.get_mapping(&id).await?),
        MappingsCommand::Import { dir } => {
            let added = client.add_mappings_from_dir(&dir).await?;
            print_json(&serde_json::json!({ "added": added }))
        }
        MappingsCommand::Delete { id } => {
            client.delete_mapping(&id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        MappingsCommand::Reset => {
            client.delete_all_mappings().await?;
            print_json(&serde_json::json!({ "reset": true }))
        }
    }
}

async fn run_scenarios(client: &AdminClient, command: ScenariosCommand) -> anyhow::Result<()> {
    match command {
        ScenariosCommand::List => print_json(&client.get_scenarios().await?),
        ScenariosCommand::Reset => {
            client.reset_scenarios().await?;
            print_json(&serde_json::json!({ "reset": true }))
        }
    }
}

async fn run_requests(
    client: &AdminClient,
    browser: Option<&str>,
    command: RequestsCommand,
) -> anyhow::Result<()> {
    let journal = client.request_journal(browser);
    match command {
        RequestsCommand::List => print_json(&journal.get_request_journal().await?.into_value()),
        RequestsCommand::Reset => {
            journal.reset_request_journal().await?;
            print_json(&serde_json::json!({ "reset": true }))
        }
        RequestsCommand::Count { method, url } => {
            let url = match url {
                Some(url) => url_equal_to(url),
                None => url_matching(".*"),
            };
            let count = journal
                .get_request_count(&request_for(method, url).build())
                .await;
            print_json(&serde_json::json!({ "count": count }))
        }
    }
}

async fn run_files(client: &AdminClient, command: FilesCommand) -> anyhow::Result<()> {
    match command {
        FilesCommand::List => print_json(&client.list_files().await?),
        FilesCommand::DeleteAll => {
            client.delete_all_files().await?;
            print_json(&serde_json::json!({ "deleted": "all" }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
