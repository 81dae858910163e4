mod config;
mod db;
mod error;
mod menu;
mod models;
mod pipeline;
mod sources;
#[cfg(test)]
mod testutil;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};
use crate::sources::ListingSource;
use crate::sources::hh::HhClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vacancydb=info")),
        )
        .init();

    let config = Config::parse();

    // Bootstrap failures are fatal; nothing downstream can proceed
    // without a reachable database.
    tracing::info!("Connecting to database...");
    db::ensure_database_exists(&config).await?;
    let pool = db::connect(&config).await?;
    db::init_schema(&pool).await?;

    let source = HhClient::new(&config.api_base_url)?;

    match config.command.clone() {
        Some(Command::Ingest) => {
            pipeline::ingest(&pool, &source, &config.employer_ids).await;
        }
        Some(Command::Menu) => {
            menu::run(&pool).await?;
        }
        Some(Command::SearchEmployers { query }) => {
            let hits = source.search_employers(&query).await?;
            if hits.is_empty() {
                println!("No employers found for '{query}'.");
            }
            for hit in hits {
                println!(
                    "{}: {} | {} | {} open vacancies",
                    hit.id,
                    hit.name,
                    hit.url.as_deref().unwrap_or("-"),
                    hit.open_vacancies
                );
            }
        }
        None => {
            // Default flow: load the configured employers, then open the
            // query menu over the result.
            pipeline::ingest(&pool, &source, &config.employer_ids).await;
            menu::run(&pool).await?;
        }
    }

    pool.close().await;
    Ok(())
}
