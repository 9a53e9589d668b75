//! Market quote snapshot model.
//!
//! # Invariants
//! - `(symbol, exchange, last_trade_date)` is unique (enforced by storage).
//! - `current_price` and `change` fit 10 digits with 2 decimal places.
//! - `percent_change` fits 30 digits with 20 decimal places.
//! - `change` is NOT checked against `current_price`.

use crate::model::validation::{
    require_decimal, require_id, require_short_text, require_text, require_timestamp, require_url,
    ValidationError,
};
use crate::model::EntityKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type QuoteId = Uuid;

const PRICE_MAX_DIGITS: u32 = 10;
const PRICE_DECIMAL_PLACES: u32 = 2;
const PERCENT_MAX_DIGITS: u32 = 30;
const PERCENT_DECIMAL_PLACES: u32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExchangeType {
    Nyse,
    Nasdaq,
    NyseMkt,
    NasdaqOth,
    #[default]
    Unknown,
}

impl ExchangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nyse => "NYSE",
            Self::Nasdaq => "NASDAQ",
            Self::NyseMkt => "NYSEMKT",
            Self::NasdaqOth => "NASDAQOTH",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NYSE" => Some(Self::Nyse),
            "NASDAQ" => Some(Self::Nasdaq),
            "NYSEMKT" => Some(Self::NyseMkt),
            "NASDAQOTH" => Some(Self::NasdaqOth),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyType {
    #[default]
    Usd,
}

impl CurrencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default = "Uuid::new_v4")]
    pub id: QuoteId,
    pub company_name: String,
    pub symbol: String,
    #[serde(default)]
    pub exchange: ExchangeType,
    #[serde(default)]
    pub currency_code: CurrencyType,
    pub description: String,
    pub current_price: Decimal,
    pub change: Decimal,
    pub percent_change: Decimal,
    pub website: String,
    pub last_trade_date: DateTime<Utc>,
}

impl Quote {
    /// Creates a flat (zero change) quote on an unknown exchange.
    pub fn new(
        company_name: impl Into<String>,
        symbol: impl Into<String>,
        description: impl Into<String>,
        website: impl Into<String>,
        last_trade_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: company_name.into(),
            symbol: symbol.into(),
            exchange: ExchangeType::default(),
            currency_code: CurrencyType::default(),
            description: description.into(),
            current_price: Decimal::ZERO,
            change: Decimal::ZERO,
            percent_change: Decimal::ZERO,
            website: website.into(),
            last_trade_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = EntityKind::Quote;
        require_id(kind, self.id)?;
        require_short_text(kind, "company_name", &self.company_name)?;
        require_short_text(kind, "symbol", &self.symbol)?;
        require_text(kind, "description", &self.description)?;
        require_url("website", &self.website)?;
        require_timestamp("last_trade_date", &self.last_trade_date)?;
        require_decimal(
            "current_price",
            self.current_price,
            PRICE_MAX_DIGITS,
            PRICE_DECIMAL_PLACES,
        )?;
        require_decimal("change", self.change, PRICE_MAX_DIGITS, PRICE_DECIMAL_PLACES)?;
        require_decimal(
            "percent_change",
            self.percent_change,
            PERCENT_MAX_DIGITS,
            PERCENT_DECIMAL_PLACES,
        )?;
        Ok(())
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.symbol)
    }
}
