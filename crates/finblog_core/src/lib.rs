//! Core domain logic for the finance blog.
//! This crate is the single source of truth for content invariants.

pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use ingest::{
    ingest_bundle, load_bundle, parse_bundle, ContentBundle, IngestError, IngestReport,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::article::{Article, ArticleId, ArticleType};
pub use model::author::{Author, AuthorId, ContributorType};
pub use model::quote::{CurrencyType, ExchangeType, Quote, QuoteId};
pub use model::reserved::{Instrument, InstrumentId, Tag, TagId};
pub use model::validation::ValidationError;
pub use model::EntityKind;
pub use repo::article_repo::{ArticleListQuery, ArticleRepository, SqliteArticleRepository};
pub use repo::author_repo::{AuthorListQuery, AuthorRepository, SqliteAuthorRepository};
pub use repo::quote_repo::{QuoteListQuery, QuoteRepository, SqliteQuoteRepository};
pub use repo::reserved_repo::{InstrumentRepository, SqliteReservedRepository, TagRepository};
pub use repo::{Page, RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::selection::{
    ArticlePage, FrontPage, SampleMode, SelectionError, SelectionResult, SelectionService,
};

const SANITY_MESSAGE: &str = "Congratulations, application installed successfully!";

/// Fixed message proving the core is linked and callable.
pub fn sanity_check() -> &'static str {
    SANITY_MESSAGE
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
