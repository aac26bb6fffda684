use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{BsError, BsResult},
    utils::datetime::date_to_str,
};

/// One bulletin line: a ticker's quotation on one trading day.
///
/// Field names follow the persisted columns on the wire (JSON/CSV), which are
/// the bulletin's own labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyQuotation {
    pub date: NaiveDate,
    /// Left empty when absent so `normalized` reports it as a constraint
    /// violation rather than a decoding error.
    #[serde(default)]
    pub ticker: String,

    #[serde(rename = "compagnie")]
    pub company: Option<String>,
    #[serde(rename = "secteur")]
    pub sector: Option<String>,

    #[serde(rename = "cours_precedent")]
    pub previous_close: Option<Decimal>,
    #[serde(rename = "cours_ouv")]
    pub open: Option<Decimal>,
    #[serde(rename = "cours_cloture")]
    pub close: Option<Decimal>,
    #[serde(rename = "variation_jour")]
    pub day_change_pct: Option<Decimal>,

    pub volume: Option<i64>,
    #[serde(rename = "valeur_transigee")]
    pub traded_value: Option<i64>,

    #[serde(rename = "cours_reference")]
    pub reference_price: Option<Decimal>,
    #[serde(rename = "variation_ytd")]
    pub ytd_change_pct: Option<Decimal>,
    #[serde(rename = "dernier_div")]
    pub last_dividend: Option<Decimal>,
    /// Ex-dividend date exactly as printed in the bulletin (e.g. `15/07/2025`).
    #[serde(rename = "date_div")]
    pub dividend_date_raw: Option<String>,
    #[serde(rename = "rendement_net")]
    pub net_yield_pct: Option<Decimal>,
    #[serde(rename = "per")]
    pub price_earnings: Option<Decimal>,
}

/// A quotation as persisted, with its surrogate key and audit timestamp.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredQuotation {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub quotation: DailyQuotation,
}

impl DailyQuotation {
    pub fn new(date: NaiveDate, ticker: &str) -> Self {
        Self {
            date,
            ticker: ticker.to_string(),
            company: None,
            sector: None,
            previous_close: None,
            open: None,
            close: None,
            day_change_pct: None,
            volume: None,
            traded_value: None,
            reference_price: None,
            ytd_change_pct: None,
            last_dividend: None,
            dividend_date_raw: None,
            net_yield_pct: None,
            price_earnings: None,
        }
    }

    /// Checks the row invariants and returns the normalized row that gets
    /// written: ticker trimmed and upper-cased, blank texts turned into NULL.
    pub fn normalized(&self) -> BsResult<Self> {
        let ticker = normalize_ticker(&self.ticker).ok_or_else(|| BsError::ConstraintViolation {
            code: "TICKER_REQUIRED",
            message: format!("Missing ticker for date {}", date_to_str(&self.date)),
        })?;

        for (name, value) in [("volume", self.volume), ("valeur_transigee", self.traded_value)] {
            if let Some(v) = value {
                if v < 0 {
                    return Err(BsError::ConstraintViolation {
                        code: "NEGATIVE_AMOUNT",
                        message: format!(
                            "Negative {name} {v} for ({}, {ticker})",
                            date_to_str(&self.date)
                        ),
                    });
                }
            }
        }

        Ok(Self {
            ticker,
            company: non_blank(&self.company),
            sector: non_blank(&self.sector),
            dividend_date_raw: non_blank(&self.dividend_date_raw),
            ..self.clone()
        })
    }
}

pub fn normalize_ticker(ticker: &str) -> Option<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        None
    } else {
        Some(ticker.to_uppercase())
    }
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
