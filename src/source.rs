use std::fmt;
use std::sync::LazyLock;

use log::{debug, error};
use regex::Regex;
use serde::Serialize;

use crate::http::TextFetcher;
use crate::parser::RateParser;

pub const BCV_URL: &str = "https://www.bcv.org.ve/";
pub const EXCHANGE_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const DOLAR_TODAY_URL: &str = "https://s3.amazonaws.com/dolartoday/data.json";

// ASCII digits only, and the gap never crosses a line terminator.
static BCV_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"[Uu][Ss][Dd][^\n\r\x{2028}\x{2029}]*?([0-9]+)[,.]([0-9]+)")
            .expect("USD regex is valid"),
        Regex::new(r"[Dd][OoÓó][Ll][Aa][Rr][^\n\r\x{2028}\x{2029}]*?([0-9]+)[,.]([0-9]+)")
            .expect("dolar regex is valid"),
    ]
});

/// Where the published rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provider {
    #[serde(rename = "BCV Official")]
    BcvOfficial,
    #[serde(rename = "ExchangeRate-API")]
    ExchangeRateApi,
    #[serde(rename = "DolarToday")]
    DolarToday,
    #[serde(rename = "Fallback")]
    Fallback,
}

impl Provider {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BcvOfficial => "BCV Official",
            Self::ExchangeRateApi => "ExchangeRate-API",
            Self::DolarToday => "DolarToday",
            Self::Fallback => "Fallback",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A remote endpoint publishing the USD/VES rate.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub provider: Provider,
    pub url: &'static str,
    pub parser: RateParser,
    /// Prefix of error lines logged for this source.
    pub error_prefix: &'static str,
}

impl Source {
    pub fn bcv() -> Self {
        Self {
            provider: Provider::BcvOfficial,
            url: BCV_URL,
            parser: RateParser::HtmlPatterns(BCV_PATTERNS.as_slice()),
            error_prefix: "BCV fetch error",
        }
    }

    pub fn exchange_rate_api() -> Self {
        Self {
            provider: Provider::ExchangeRateApi,
            url: EXCHANGE_RATE_API_URL,
            parser: RateParser::JsonPath(&["rates", "VES"]),
            error_prefix: "ExchangeRate-API error",
        }
    }

    pub fn dolar_today() -> Self {
        Self {
            provider: Provider::DolarToday,
            url: DOLAR_TODAY_URL,
            parser: RateParser::JsonPath(&["USD", "promedio_real"]),
            error_prefix: "DolarToday error",
        }
    }

    /// Makes one attempt at this source. Every failure is logged and turned into `None`.
    pub async fn fetch_rate(&self, fetcher: &dyn TextFetcher) -> Option<f64> {
        let result = match fetcher.get_text(self.url).await {
            Ok(body) => self.parser.parse(&body),
            Err(err) => Err(err),
        };

        match result {
            Ok(rate) => {
                debug!("{} returned {rate}", self.provider);
                Some(rate)
            }
            Err(err) => {
                error!("{}: {err:#}", self.error_prefix);
                None
            }
        }
    }
}
