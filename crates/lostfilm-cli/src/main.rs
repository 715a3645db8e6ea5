//! LostFilm scraper command-line entry point
//!
//! Fetches the catalog and every series page, writes `tvseries.xml`,
//! `genres.xml` and `countries.xml`, then prints one block per series.
//! Settings come from `LOSTFILM_*` environment variables, log level from
//! `RUST_LOG` (default `info`).

mod config;

use std::process::ExitCode;

use lostfilm_core::LostfilmScraper;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::from_env()?;
    log::info!(
        "Scraping {}{} into {} ({})",
        config.client.base_url,
        config.catalog_path,
        config.output_dir.display(),
        config.output_encoding
    );

    let scraper = LostfilmScraper::with_config(config)?;
    let aggregate = scraper.run().await?;

    for record in &aggregate.records {
        println!("{}\n", record);
    }

    log::info!(
        "Done: {} series, {} genres, {} countries",
        aggregate.records.len(),
        aggregate.genres.len(),
        aggregate.countries.len()
    );
    Ok(())
}
