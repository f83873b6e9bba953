mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tdoll")]
#[command(about = "Harvest T-Doll stats, auras and artwork from the Girls' Frontline wiki")]
struct Cli {
    /// Output format for listings: table, markdown or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every T-Doll listed on the wiki index
    Scrape(commands::scrape::ScrapeArgs),
    /// Print records from a finished scrape
    Show(commands::show::ShowArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tdoll=info".parse()?)
                .add_directive("gfwiki_api=warn".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Scrape(args) => commands::scrape::run(args).await?,
        Commands::Show(args) => commands::show::run(args, &format)?,
    }

    Ok(())
}
