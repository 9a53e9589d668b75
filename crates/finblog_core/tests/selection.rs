mod common;

use common::{article, author, featured, quote};
use finblog_core::db::open_db_in_memory;
use finblog_core::{
    Article, ArticleRepository, AuthorRepository, AuthorService, EntityKind, ExchangeType,
    QuoteRepository, SampleMode, SelectionError, SelectionService, SqliteArticleRepository,
    SqliteAuthorRepository, SqliteQuoteRepository,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn seed_articles(conn: &Connection, articles: &[Article]) {
    let repo = SqliteArticleRepository::try_new(conn).unwrap();
    for item in articles {
        repo.create_article(item).unwrap();
    }
}

fn seeded(
    conn: &Connection,
    seed: u64,
) -> SelectionService<SqliteArticleRepository<'_>, SqliteQuoteRepository<'_>, StdRng> {
    SelectionService::with_rng(
        SqliteArticleRepository::try_new(conn).unwrap(),
        SqliteQuoteRepository::try_new(conn).unwrap(),
        StdRng::seed_from_u64(seed),
    )
}

fn five_articles() -> Vec<Article> {
    vec![
        featured("2020/07/01/promise-1", 3),
        featured("2020/07/01/promise-2", 5),
        article("2020/07/01/regular-1"),
        article("2020/07/01/regular-2"),
        article("2020/07/01/regular-3"),
    ]
}

#[test]
fn latest_featured_article_picks_newest_publish_time() {
    let conn = setup();
    let articles = vec![
        featured("2020/07/01/t1", 1),
        featured("2020/07/01/t3", 3),
        featured("2020/07/01/t2", 2),
        article("2020/07/01/regular-newest"),
    ];
    seed_articles(&conn, &articles);

    let selection = seeded(&conn, 7);
    let latest = selection.latest_featured_article().unwrap();

    assert_eq!(latest.id, articles[1].id);
    assert!(latest.is_featured());
}

#[test]
fn latest_featured_article_tie_goes_to_later_created() {
    let conn = setup();
    let first = featured("2020/07/01/tie-a", 4);
    let mut second = featured("2020/07/01/tie-b", 4);
    second.created = common::at(2);
    seed_articles(&conn, &[first, second.clone()]);

    let latest = seeded(&conn, 7).latest_featured_article().unwrap();
    assert_eq!(latest.id, second.id);
}

#[test]
fn latest_featured_article_without_featured_content_is_not_found() {
    let conn = setup();
    seed_articles(&conn, &[article("2020/07/01/regular")]);

    let err = seeded(&conn, 7).latest_featured_article().unwrap_err();
    assert!(matches!(err, SelectionError::NoFeaturedArticle));
    assert!(err.is_not_found());
}

#[test]
fn article_by_id_returns_article_or_not_found() {
    let conn = setup();
    let stored = article("2020/07/01/by-id");
    seed_articles(&conn, &[stored.clone()]);
    let selection = seeded(&conn, 7);

    assert_eq!(selection.article_by_id(stored.id).unwrap(), stored);

    let missing = Uuid::new_v4();
    let err = selection.article_by_id(missing).unwrap_err();
    assert!(matches!(err, SelectionError::ArticleNotFound(id) if id == missing));
}

#[test]
fn sample_other_articles_never_returns_excluded_article() {
    let conn = setup();
    let articles = five_articles();
    seed_articles(&conn, &articles);
    let excluded = articles[1].id;

    let mut selection = seeded(&conn, 42);
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let drawn = selection.sample_other_articles(excluded, 3).unwrap();
        assert_eq!(drawn.len(), 3);
        for item in drawn {
            assert_ne!(item.id, excluded);
            seen.insert(item.id);
        }
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn sample_other_articles_with_only_the_excluded_article_is_not_found() {
    let conn = setup();
    let only = featured("2020/07/01/only", 3);
    seed_articles(&conn, &[only.clone()]);

    let err = seeded(&conn, 7)
        .sample_other_articles(only.id, 3)
        .unwrap_err();
    assert!(matches!(
        err,
        SelectionError::NoCandidates(EntityKind::Article)
    ));

    let err = seeded(&conn, 7)
        .sample_other_articles(only.id, 0)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn sampling_with_replacement_may_exceed_candidate_count() {
    let conn = setup();
    let articles = vec![
        featured("2020/07/01/lead", 3),
        article("2020/07/01/a"),
        article("2020/07/01/b"),
    ];
    seed_articles(&conn, &articles);

    let drawn = seeded(&conn, 11)
        .sample_other_articles(articles[0].id, 6)
        .unwrap();
    assert_eq!(drawn.len(), 6);
    let unique: HashSet<Uuid> = drawn.iter().map(|item| item.id).collect();
    assert!(unique.len() <= 2);
}

#[test]
fn distinct_mode_never_repeats_and_caps_at_candidate_count() {
    let conn = setup();
    let articles = five_articles();
    seed_articles(&conn, &articles);

    let mut selection = seeded(&conn, 5).with_sample_mode(SampleMode::Distinct);
    assert_eq!(selection.sample_mode(), SampleMode::Distinct);

    for _ in 0..100 {
        let drawn = selection.sample_other_articles(articles[0].id, 3).unwrap();
        let unique: HashSet<Uuid> = drawn.iter().map(|item| item.id).collect();
        assert_eq!(unique.len(), 3);
    }

    let capped = selection.sample_other_articles(articles[0].id, 10).unwrap();
    assert_eq!(capped.len(), 4);
}

#[test]
fn same_seed_reproduces_same_sample() {
    let conn = setup();
    let articles = five_articles();
    seed_articles(&conn, &articles);

    let first: Vec<Uuid> = seeded(&conn, 99)
        .sample_other_articles(articles[0].id, 8)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    let second: Vec<Uuid> = seeded(&conn, 99)
        .sample_other_articles(articles[0].id, 8)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();

    assert_eq!(first, second);
}

#[test]
fn sample_quotes_requires_stored_quotes() {
    let conn = setup();

    let err = seeded(&conn, 7).sample_quotes(3).unwrap_err();
    assert!(matches!(err, SelectionError::NoCandidates(EntityKind::Quote)));

    let repo = SqliteQuoteRepository::try_new(&conn).unwrap();
    repo.create_quote(&quote("AAPL", ExchangeType::Nasdaq, 10))
        .unwrap();
    repo.create_quote(&quote("KO", ExchangeType::Nyse, 10))
        .unwrap();

    let drawn = seeded(&conn, 7).sample_quotes(5).unwrap();
    assert_eq!(drawn.len(), 5);
    assert!(drawn
        .iter()
        .all(|item| item.symbol == "AAPL" || item.symbol == "KO"));

    assert!(seeded(&conn, 7).sample_quotes(0).unwrap().is_empty());
}

#[test]
fn front_page_leads_with_featured_and_excludes_it_from_more_articles() {
    let conn = setup();
    let articles = five_articles();
    seed_articles(&conn, &articles);

    let page = seeded(&conn, 3).front_page(3).unwrap();

    assert_eq!(page.main_article.id, articles[1].id);
    assert_eq!(page.more_articles.len(), 3);
    assert!(page
        .more_articles
        .iter()
        .all(|item| item.id != page.main_article.id));

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["main_article"]["path"], "2020/07/01/promise-2");
}

#[test]
fn article_page_pairs_article_with_quotes() {
    let conn = setup();
    let stored = article("2020/07/01/detail");
    seed_articles(&conn, &[stored.clone()]);
    SqliteQuoteRepository::try_new(&conn)
        .unwrap()
        .create_quote(&quote("AAPL", ExchangeType::Nasdaq, 10))
        .unwrap();

    let mut selection = seeded(&conn, 3);
    let page = selection.article_page(stored.id, 2).unwrap();
    assert_eq!(page.article, stored);
    assert_eq!(page.quotes.len(), 2);

    let err = selection.article_page(Uuid::new_v4(), 2).unwrap_err();
    assert!(matches!(err, SelectionError::ArticleNotFound(_)));
}

#[test]
fn author_for_article_resolves_byline_soft_reference() {
    let conn = setup();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let stored = authors.create_author(&author("mhousel", 1001)).unwrap();
    let service = AuthorService::new(authors);

    let written = article("2020/07/01/by-morgan");
    assert_eq!(
        service.author_for_article(&written).unwrap(),
        Some(stored)
    );

    let mut orphan = article("2020/07/01/by-nobody");
    orphan.byline = "Anonymous Fool".to_string();
    assert!(service.author_for_article(&orphan).unwrap().is_none());
}
