use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use log::error;
use reqwest::Client;

use config::Config;
use update::{print_summary, run_update};

mod config;
mod exchange_rate;
mod history;
mod http;
mod parser;
mod record;
mod source;
mod store;
mod update;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match update_rates().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("❌ Fatal error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn update_rates() -> Result<()> {
    let config = Config::default();
    let client = Client::new();

    let update = run_update(&client, &config, Utc::now()).await?;
    print_summary(&update);

    Ok(())
}
