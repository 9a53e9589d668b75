mod common;

use common::{article, author, quote};
use finblog_core::{
    ArticleType, ContributorType, EntityKind, ExchangeType, ValidationError,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn author_new_uses_full_name_byline_and_default_avatars() {
    let author = author("mhousel", 1001);

    assert_eq!(author.byline, "Morgan Housel");
    assert_eq!(author.contributor_type, ContributorType::Individual);
    assert!(!author.primary);
    assert!(author.small_avatar_url.ends_with("/small.ashx"));
    assert!(author.large_avatar_url.ends_with("/large.ashx"));
    assert_eq!(author.to_string(), "Morgan Housel");
    author.validate().unwrap();
}

#[test]
fn byline_may_be_full_name_or_username_and_nothing_else() {
    let mut author = author("mhousel", 1001);

    author.byline = "mhousel".to_string();
    author.validate().unwrap();

    for byline in ["Morgan", "Housel Morgan", "morgan housel", "Morgan  Housel"] {
        author.byline = byline.to_string();
        let err = author.validate().unwrap_err();
        assert!(
            matches!(err, ValidationError::BylineMismatch { .. }),
            "byline `{byline}` should be rejected, got {err}"
        );
    }
}

#[test]
fn author_validation_rejects_bad_email_and_long_username() {
    let mut bad_email = author("mhousel", 1001);
    bad_email.email = "not-an-email".to_string();
    assert!(matches!(
        bad_email.validate(),
        Err(ValidationError::InvalidEmail(_))
    ));

    let mut long_name = author(&"x".repeat(256), 1002);
    long_name.byline = long_name.full_name();
    assert!(matches!(
        long_name.validate(),
        Err(ValidationError::FieldTooLong {
            entity: EntityKind::Author,
            field: "username",
            ..
        })
    ));
}

#[test]
fn article_requires_path_and_valid_image_url() {
    let mut missing_path = article("  ");
    missing_path.path = "  ".to_string();
    assert_eq!(
        missing_path.validate().unwrap_err(),
        ValidationError::EmptyField {
            entity: EntityKind::Article,
            field: "path",
        }
    );

    let mut bad_image = article("2020/07/01/buy-and-hold");
    bad_image.featured_image_url = "cover.jpg".to_string();
    assert!(matches!(
        bad_image.validate(),
        Err(ValidationError::InvalidUrl {
            field: "featured_image_url",
            ..
        })
    ));
}

#[test]
fn nil_ids_are_rejected() {
    let mut article = article("2020/07/01/nil");
    article.id = Uuid::nil();
    assert_eq!(
        article.validate().unwrap_err(),
        ValidationError::NilId(EntityKind::Article)
    );
}

#[test]
fn quote_prices_must_fit_two_decimal_places() {
    let mut quote = quote("AAPL", ExchangeType::Nasdaq, 10);
    quote.validate().unwrap();

    quote.current_price = Decimal::from_str("364.115").unwrap();
    assert!(matches!(
        quote.validate(),
        Err(ValidationError::DecimalOutOfRange {
            field: "current_price",
            ..
        })
    ));
}

#[test]
fn quote_change_is_not_tied_to_current_price() {
    let mut quote = quote("AAPL", ExchangeType::Nasdaq, 10);
    quote.current_price = Decimal::from_str("100.00").unwrap();
    quote.change = Decimal::from_str("5000.00").unwrap();
    quote.validate().unwrap();
}

#[test]
fn serialization_uses_expected_wire_values() {
    let mut featured = article("2020/07/01/promise");
    featured.article_type = ArticleType::TenPromiseSeries;
    let json = serde_json::to_value(&featured).unwrap();
    assert_eq!(json["article_type"], "10-promise-series");
    assert_eq!(json["path"], "2020/07/01/promise");

    let quote = quote("BRK.B", ExchangeType::NyseMkt, 10);
    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["exchange"], "NYSEMKT");
    assert_eq!(json["currency_code"], "USD");
    assert_eq!(json["current_price"], "364.11");

    let author = author("mhousel", 1001);
    let json = serde_json::to_value(&author).unwrap();
    assert_eq!(json["contributor_type"], "individual");
}

#[test]
fn deserialize_fills_defaults_for_omitted_fields() {
    let value = serde_json::json!({
        "company_name": "Apple Inc.",
        "symbol": "AAPL",
        "description": "Consumer electronics.",
        "current_price": "364.11",
        "change": "-2.35",
        "percent_change": "-0.0064",
        "website": "https://www.apple.com",
        "last_trade_date": "2020-07-01T20:00:00Z"
    });

    let quote: finblog_core::Quote = serde_json::from_value(value).unwrap();
    assert!(!quote.id.is_nil());
    assert_eq!(quote.exchange, ExchangeType::Unknown);
    quote.validate().unwrap();
}

#[test]
fn featured_image_name_has_no_length_cap() {
    let mut with_long_name = article("2020/07/01/long-image-name");
    with_long_name.featured_image_name = Some("n".repeat(1000));
    with_long_name.validate().unwrap();
}

#[test]
fn email_on_localhost_is_accepted() {
    let mut local = author("mhousel", 1001);
    local.email = "mhousel@localhost".to_string();
    local.validate().unwrap();

    local.email = "mhousel@fooldomain".to_string();
    assert!(matches!(
        local.validate(),
        Err(ValidationError::InvalidEmail(_))
    ));
}
