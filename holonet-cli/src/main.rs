//! HOLONET CLI
//!
//! Command-line interface for the Star Wars character catalog.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use holonet_api::{filter_by_name, paginate, ApiConfig, ApiServer, ListParams};
use holonet_core::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_SWAPI_BASE_URL, MAX_PAGE_LIMIT};
use holonet_core::traits::Upstream;
use holonet_core::types::{Character, CharacterSummary, Pagination};
use holonet_swapi::{to_list_summary, CharacterAssembler, SwapiClient, SwapiConfig};

/// HOLONET - Star Wars character catalog
#[derive(Parser)]
#[command(name = "holonet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// SWAPI base URL
    #[arg(long, global = true, env = "SWAPI_BASE_URL", default_value = DEFAULT_SWAPI_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// List one page of characters
    List(PageArgs),

    /// Search characters by name
    Search {
        /// Name or part of a name
        term: String,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one character with everything it references
    Show {
        /// Character id
        id: String,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    page: u32,
    /// Characters per page
    #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: u32,
}

impl PageArgs {
    fn params(&self, query: Option<String>) -> ListParams {
        ListParams {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
            query,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "holonet=debug,info"
    } else {
        "holonet=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(base_url = %cli.base_url, "Using SWAPI upstream");

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind, cli.base_url).await,
        Commands::List(page) => cmd_list(&cli.base_url, &page).await,
        Commands::Search { term, page } => cmd_search(&cli.base_url, &term, &page).await,
        Commands::Show { id, json } => cmd_show(&cli.base_url, &id, json).await,
    }
}

fn client(base_url: &str) -> Result<SwapiClient> {
    SwapiClient::with_config(SwapiConfig::new(base_url)).context("Failed to create SWAPI client")
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str, base_url: String) -> Result<()> {
    println!("{}", "🛰  Starting HOLONET API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("   {} {}", "Upstream:".dimmed(), base_url);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = ApiConfig::from_env().with_swapi_base_url(base_url);
    let server = ApiServer::new(config).context("Invalid server configuration")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}

/// List one page of characters
async fn cmd_list(base_url: &str, args: &PageArgs) -> Result<()> {
    let client = client(base_url)?;
    let params = args.params(None);

    let pb = spinner("Fetching characters...")?;
    let page = client.get_page(params.page, params.limit).await;
    pb.finish_and_clear();
    let page = page.context("Failed to fetch characters")?;

    let summaries: Vec<CharacterSummary> = page.results.iter().map(to_list_summary).collect();
    print_summaries(
        &summaries,
        &Pagination::from_upstream(params.page, params.limit, &page),
    );
    Ok(())
}

/// Search characters by name
async fn cmd_search(base_url: &str, term: &str, args: &PageArgs) -> Result<()> {
    let term = term.trim();
    anyhow::ensure!(!term.is_empty(), "Search query is required");

    let client = client(base_url)?;
    let params = args.params(Some(term.to_string()));

    let pb = spinner("Fetching the full character listing...")?;
    let all = client.get_all_characters().await;
    pb.finish_and_clear();
    let all = all.context("Failed to fetch characters")?;

    let matches = filter_by_name(all.iter().map(to_list_summary), term);
    if matches.is_empty() {
        println!("{} No characters match '{}'", "✗".red(), term);
        return Ok(());
    }

    let page = paginate(matches, &params);
    print_summaries(&page.data, &page.pagination);
    Ok(())
}

/// Show one character
async fn cmd_show(base_url: &str, id: &str, json: bool) -> Result<()> {
    let client: Arc<dyn Upstream> = Arc::new(client(base_url)?);

    let pb = spinner(&format!("Fetching character {}...", id))?;
    let record = client.get_character(id).await;
    let character = match record {
        Ok(record) => Ok(CharacterAssembler::new(client.clone()).to_detail(record).await),
        Err(e) => Err(e),
    };
    pb.finish_and_clear();

    let character = match character {
        Ok(character) => character,
        Err(e) if e.is_not_found() => anyhow::bail!("Character with ID {} not found", id),
        Err(e) => return Err(e).context("Failed to fetch character"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&character)?);
    } else {
        print_character(&character);
    }
    Ok(())
}

fn print_summaries(summaries: &[CharacterSummary], pagination: &Pagination) {
    for summary in summaries {
        println!("  {:>4}  {}", summary.id.dimmed(), summary.name.bold());
    }
    println!(
        "\n  {} page {}/{} ({} total)",
        "•".cyan(),
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    );
}

fn print_character(c: &Character) {
    println!("{}", c.name.cyan().bold());
    let rows = [
        ("Height", &c.height),
        ("Mass", &c.mass),
        ("Hair", &c.hair_color),
        ("Skin", &c.skin_color),
        ("Eyes", &c.eye_color),
        ("Born", &c.birth_year),
        ("Gender", &c.gender),
    ];
    for (label, value) in rows {
        println!("   {:<8} {}", format!("{}:", label).green(), value);
    }

    if let Some(planet) = &c.homeworld {
        println!("   {:<8} {}", "World:".green(), planet.name);
    }

    print_names("Films", c.films.iter().map(|f| f.title.as_str()));
    print_names("Species", c.species.iter().map(|s| s.name.as_str()));
    print_names("Vehicles", c.vehicles.iter().map(|v| v.name.as_str()));
    print_names("Ships", c.starships.iter().map(|s| s.name.as_str()));
    println!("   {:<8} {}", "Image:".dimmed(), c.image_url);
}

fn print_names<'a>(label: &str, names: impl Iterator<Item = &'a str>) {
    let names: Vec<&str> = names.collect();
    if !names.is_empty() {
        println!("   {:<8} {}", format!("{}:", label).green(), names.join(", "));
    }
}
