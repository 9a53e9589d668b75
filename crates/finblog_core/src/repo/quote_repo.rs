//! Quote repository contract and SQLite implementation.
//!
//! Decimals are stored as exact text, never as SQLite REAL.

use crate::model::quote::{CurrencyType, ExchangeType, Quote, QuoteId};
use crate::model::EntityKind;
use crate::repo::{
    ensure_table_ready, in_savepoint, map_write_error, parse_decimal, parse_timestamp, parse_uuid,
    timestamp_to_db, Page, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const QUOTE_SELECT_SQL: &str = "SELECT
    id,
    company_name,
    symbol,
    exchange,
    currency_code,
    description,
    current_price,
    change,
    percent_change,
    website,
    last_trade_date
FROM quotes";

const QUOTE_COLUMNS: &[&str] = &[
    "id",
    "company_name",
    "symbol",
    "exchange",
    "currency_code",
    "description",
    "current_price",
    "change",
    "percent_change",
    "website",
    "last_trade_date",
];

/// Filter options for listing quotes.
///
/// Results are ordered by `last_trade_date DESC, symbol ASC, id ASC`.
#[derive(Debug, Clone, Default)]
pub struct QuoteListQuery {
    pub symbol: Option<String>,
    pub exchange: Option<ExchangeType>,
    pub page: Page,
}

pub trait QuoteRepository {
    /// Validates and persists a quote snapshot, returning the stored record.
    fn create_quote(&self, quote: &Quote) -> RepoResult<Quote>;
    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote>;
    fn list_quotes(&self, query: &QuoteListQuery) -> RepoResult<Vec<Quote>>;
}

#[derive(Debug)]
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "quotes", QUOTE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn create_quote(&self, quote: &Quote) -> RepoResult<Quote> {
        quote.validate()?;

        in_savepoint(self.conn, "create_quote", || {
            self.conn
                .execute(
                    "INSERT INTO quotes (
                        id,
                        company_name,
                        symbol,
                        exchange,
                        currency_code,
                        description,
                        current_price,
                        change,
                        percent_change,
                        website,
                        last_trade_date
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                    params![
                        quote.id.to_string(),
                        quote.company_name.as_str(),
                        quote.symbol.as_str(),
                        quote.exchange.as_str(),
                        quote.currency_code.as_str(),
                        quote.description.as_str(),
                        quote.current_price.to_string(),
                        quote.change.to_string(),
                        quote.percent_change.to_string(),
                        quote.website.as_str(),
                        timestamp_to_db(&quote.last_trade_date),
                    ],
                )
                .map_err(|err| map_write_error(EntityKind::Quote, err))?;

            self.get_quote(quote.id)
        })
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => parse_quote_row(row),
            None => Err(RepoError::NotFound {
                kind: EntityKind::Quote,
                id,
            }),
        }
    }

    fn list_quotes(&self, query: &QuoteListQuery) -> RepoResult<Vec<Quote>> {
        let mut sql = format!("{QUOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(symbol) = query.symbol.as_ref() {
            sql.push_str(" AND symbol = ?");
            bind_values.push(Value::Text(symbol.clone()));
        }
        if let Some(exchange) = query.exchange {
            sql.push_str(" AND exchange = ?");
            bind_values.push(Value::Text(exchange.as_str().to_string()));
        }

        sql.push_str(" ORDER BY last_trade_date DESC, symbol ASC, id ASC");
        query.page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut quotes = Vec::new();
        while let Some(row) = rows.next()? {
            quotes.push(parse_quote_row(row)?);
        }
        Ok(quotes)
    }
}

fn parse_quote_row(row: &Row<'_>) -> RepoResult<Quote> {
    let id_text: String = row.get("id")?;
    let exchange_text: String = row.get("exchange")?;
    let exchange = ExchangeType::parse(&exchange_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid exchange `{exchange_text}` in quotes.exchange"
        ))
    })?;
    let currency_text: String = row.get("currency_code")?;
    let currency_code = CurrencyType::parse(&currency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid currency `{currency_text}` in quotes.currency_code"
        ))
    })?;
    let current_price: String = row.get("current_price")?;
    let change: String = row.get("change")?;
    let percent_change: String = row.get("percent_change")?;
    let last_trade_date: String = row.get("last_trade_date")?;

    let quote = Quote {
        id: parse_uuid(&id_text, "quotes.id")?,
        company_name: row.get("company_name")?,
        symbol: row.get("symbol")?,
        exchange,
        currency_code,
        description: row.get("description")?,
        current_price: parse_decimal(&current_price, "quotes.current_price")?,
        change: parse_decimal(&change, "quotes.change")?,
        percent_change: parse_decimal(&percent_change, "quotes.percent_change")?,
        website: row.get("website")?,
        last_trade_date: parse_timestamp(&last_trade_date, "quotes.last_trade_date")?,
    };
    quote
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("quote {}: {err}", quote.id)))?;
    Ok(quote)
}
