use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde_json::Value;

use crate::config::Config;
use crate::exchange_rate::{ExchangeRate, FetchedRates, usable};
use crate::history::{load_history, push_capped};
use crate::http::TextFetcher;
use crate::record::{AllRates, CurrentRate, FullRate, HistoryEntry, Rates};
use crate::source::Source;
use crate::store::{ensure_data_dir, write_json};

/// What one run fetched and persisted to `rates.json`.
#[derive(Debug)]
pub struct Update {
    pub fetched: FetchedRates,
    pub full: FullRate,
}

/// Fetches, selects, merges history and rewrites both data files.
pub async fn run_update(
    fetcher: &dyn TextFetcher,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Update> {
    ensure_data_dir(&config.data_dir)?;

    println!("🔄 Fetching exchange rates...");
    let fetched = fetch_all(fetcher).await;
    let selected = fetched.select(config.fallback_rate);

    let rates_path = config.rates_path();
    let history = load_history(&rates_path);
    let (current, full) = build_records(config, &fetched, selected, history, now);

    write_json(&config.current_rate_path(), &current).context("Can't save the current rate")?;
    write_json(&rates_path, &full).context("Can't save the rate history")?;
    info!("Saved {} history entries to {}", full.history.len(), rates_path.display());

    Ok(Update { fetched, full })
}

/// Queries every source at once and waits for all of them.
pub async fn fetch_all(fetcher: &dyn TextFetcher) -> FetchedRates {
    let (bcv, exchange_api, dolar_today) =
        (Source::bcv(), Source::exchange_rate_api(), Source::dolar_today());

    let (bcv, exchange_api, dolar_today) = tokio::join!(
        bcv.fetch_rate(fetcher),
        exchange_api.fetch_rate(fetcher),
        dolar_today.fetch_rate(fetcher)
    );

    FetchedRates { bcv, exchange_api, dolar_today }
}

pub fn build_records(
    config: &Config,
    fetched: &FetchedRates,
    selected: ExchangeRate,
    history: Vec<Value>,
    now: DateTime<Utc>,
) -> (CurrentRate, FullRate) {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let date = timestamp
        .split_once('T')
        .map_or(timestamp.as_str(), |(date, _)| date)
        .to_string();

    let entry = HistoryEntry {
        date: date.clone(),
        bcv: selected.rate,
        timestamp: timestamp.clone(),
    };

    let current = CurrentRate {
        bcv: selected.rate,
        updated: timestamp.clone(),
        date: date.clone(),
    };

    let full = FullRate {
        timestamp: timestamp.clone(),
        date,
        rates: Rates {
            bcv: selected.rate,
            source: selected.provider,
            last_update: timestamp,
        },
        all_rates: AllRates {
            bcv_official: fetched.bcv,
            exchange_api: fetched.exchange_api,
            dolar_today: fetched.dolar_today,
        },
        history: push_capped(history, entry.into_value(), config.history_limit),
    };

    (current, full)
}

pub fn print_summary(update: &Update) {
    println!("✅ Rates updated successfully!");
    println!("📊 BCV Rate: {:.2} Bs/$", update.full.rates.bcv);
    println!("📍 Source: {}", update.full.rates.source);
    println!("🕐 Timestamp: {}", update.full.timestamp);

    println!("\n📈 All fetched rates:");
    println!("  BCV Official: {}", or_na(update.fetched.bcv));
    println!("  ExchangeRate-API: {}", or_na(update.fetched.exchange_api));
    println!("  DolarToday: {}", or_na(update.fetched.dolar_today));
}

fn or_na(rate: Option<f64>) -> String {
    usable(rate).map_or_else(|| "N/A".to_string(), |rate| rate.to_string())
}
