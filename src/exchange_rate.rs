use crate::source::Provider;

/// Bolívars per US dollar, tagged with where the value came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    pub rate: f64,
    pub provider: Provider,
}

/// Raw per-source results of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchedRates {
    pub bcv: Option<f64>,
    pub exchange_api: Option<f64>,
    pub dolar_today: Option<f64>,
}

impl FetchedRates {
    /// Picks BCV, then ExchangeRate-API, then DolarToday, then the fallback.
    pub fn select(&self, fallback_rate: f64) -> ExchangeRate {
        [
            (self.bcv, Provider::BcvOfficial),
            (self.exchange_api, Provider::ExchangeRateApi),
            (self.dolar_today, Provider::DolarToday),
        ]
        .into_iter()
        .find_map(|(rate, provider)| {
            usable(rate).map(|rate| ExchangeRate { rate, provider })
        })
        .unwrap_or(ExchangeRate {
            rate: fallback_rate,
            provider: Provider::Fallback,
        })
    }
}

/// Zero counts as "no value".
pub fn usable(rate: Option<f64>) -> Option<f64> {
    rate.filter(|rate| *rate != 0.0)
}
