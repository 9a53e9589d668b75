//! Content bundle ingestion.
//!
//! # Responsibility
//! - Decode JSON bundles of authors, articles and quotes.
//! - Write a whole bundle through the repositories in one transaction.
//!
//! # Invariants
//! - A bundle is applied atomically: any rejected entity rolls back all.
//! - Every entity passes the same validation as a direct `create`.

use crate::db::DbError;
use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::quote::Quote;
use crate::model::EntityKind;
use crate::repo::article_repo::{ArticleRepository, SqliteArticleRepository};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::quote_repo::{QuoteRepository, SqliteQuoteRepository};
use crate::repo::RepoError;
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

/// Counts of records written by one ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub authors: usize,
    pub articles: usize,
    pub quotes: usize,
}

#[derive(Debug)]
pub enum IngestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(serde_json::Error),
    /// Entity at `index` of its bundle section was rejected.
    Entity {
        kind: EntityKind,
        index: usize,
        source: RepoError,
    },
    /// Store is not ready for writes (missing tables or columns).
    Store(RepoError),
    Db(DbError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read bundle `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "invalid content bundle: {err}"),
            Self::Entity {
                kind,
                index,
                source,
            } => write!(f, "{kind} #{index} rejected: {source}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
            Self::Entity { source, .. } => Some(source),
            Self::Store(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<rusqlite::Error> for IngestError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Reads and decodes a bundle file.
pub fn load_bundle(path: impl AsRef<Path>) -> IngestResult<ContentBundle> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bundle(&text)
}

pub fn parse_bundle(json: &str) -> IngestResult<ContentBundle> {
    Ok(serde_json::from_str(json)?)
}

/// Writes all bundle entities, or none of them.
pub fn ingest_bundle(conn: &mut Connection, bundle: &ContentBundle) -> IngestResult<IngestReport> {
    let started_at = Instant::now();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let report = match write_bundle(&tx, bundle) {
        Ok(report) => report,
        Err(err) => {
            error!(
                "event=ingest module=ingest status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }
    };
    tx.commit()?;

    info!(
        "event=ingest module=ingest status=ok authors={} articles={} quotes={} duration_ms={}",
        report.authors,
        report.articles,
        report.quotes,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

fn write_bundle(conn: &Connection, bundle: &ContentBundle) -> IngestResult<IngestReport> {
    let authors = SqliteAuthorRepository::try_new(conn).map_err(IngestError::Store)?;
    for (index, author) in bundle.authors.iter().enumerate() {
        authors
            .create_author(author)
            .map_err(rejected(EntityKind::Author, index))?;
    }

    let articles = SqliteArticleRepository::try_new(conn).map_err(IngestError::Store)?;
    for (index, article) in bundle.articles.iter().enumerate() {
        articles
            .create_article(article)
            .map_err(rejected(EntityKind::Article, index))?;
    }

    let quotes = SqliteQuoteRepository::try_new(conn).map_err(IngestError::Store)?;
    for (index, quote) in bundle.quotes.iter().enumerate() {
        quotes
            .create_quote(quote)
            .map_err(rejected(EntityKind::Quote, index))?;
    }

    Ok(IngestReport {
        authors: bundle.authors.len(),
        articles: bundle.articles.len(),
        quotes: bundle.quotes.len(),
    })
}

fn rejected(kind: EntityKind, index: usize) -> impl FnOnce(RepoError) -> IngestError {
    move |source| IngestError::Entity {
        kind,
        index,
        source,
    }
}
