#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use finblog_core::{Article, ArticleType, Author, ExchangeType, Quote};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 7, 1, hour, 0, 0).unwrap()
}

pub fn author(username: &str, external_uid: i64) -> Author {
    Author::new(
        username,
        "Morgan",
        "Housel",
        format!("{username}@fool.com"),
        external_uid,
    )
}

pub fn article(path: &str) -> Article {
    let mut article = Article::new(
        format!("Headline for {path}"),
        "Body text about compounding.",
        "Morgan Housel",
        path,
        "https://g.foolcdn.com/editorial/images/cover.jpg",
    );
    article.created = at(1);
    article.publish_at = at(2);
    article.modified = at(2);
    article
}

pub fn featured(path: &str, publish_hour: u32) -> Article {
    let mut article = article(path);
    article.article_type = ArticleType::TenPromiseSeries;
    article.publish_at = at(publish_hour);
    article
}

pub fn quote(symbol: &str, exchange: ExchangeType, hour: u32) -> Quote {
    let mut quote = Quote::new(
        format!("{symbol} Inc."),
        symbol,
        "Designs and sells consumer electronics.",
        "https://www.example.com",
        at(hour),
    );
    quote.exchange = exchange;
    quote.current_price = Decimal::from_str("364.11").unwrap();
    quote.change = Decimal::from_str("-2.35").unwrap();
    quote.percent_change = Decimal::from_str("-0.00641304951637510265").unwrap();
    quote
}
