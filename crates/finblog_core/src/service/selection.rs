//! Query/selection use-cases for presentation callers.
//!
//! # Responsibility
//! - Pick the front page lead article and sample "more reading" articles.
//! - Sample quotes for article sidebars and refresh requests.
//!
//! # Invariants
//! - Never mutates the store.
//! - Sampling fails with a not-found error when no candidate exists, even
//!   when zero draws are requested.
//! - `SampleMode::WithReplacement` may return the same record more than once.
//! - Randomness comes only from the injected `Rng`.

use crate::model::article::{Article, ArticleId, ArticleType};
use crate::model::quote::Quote;
use crate::model::EntityKind;
use crate::repo::article_repo::{ArticleListQuery, ArticleRepository};
use crate::repo::quote_repo::{QuoteListQuery, QuoteRepository};
use crate::repo::RepoError;
use log::{debug, warn};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SelectionResult<T> = Result<T, SelectionError>;

/// How repeated draws relate to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleMode {
    /// Independent uniform draws; duplicates are possible.
    #[default]
    WithReplacement,
    /// Up to `count` distinct records in random order.
    Distinct,
}

impl SampleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WithReplacement => "with_replacement",
            Self::Distinct => "distinct",
        }
    }
}

#[derive(Debug)]
pub enum SelectionError {
    ArticleNotFound(ArticleId),
    /// No ten-promise-series article exists.
    NoFeaturedArticle,
    /// A sampling call had nothing to draw from.
    NoCandidates(EntityKind),
    Repo(RepoError),
}

impl SelectionError {
    /// Returns whether this error belongs to the not-found class.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ArticleNotFound(_) | Self::NoFeaturedArticle | Self::NoCandidates(_) => true,
            Self::Repo(err) => err.is_not_found(),
        }
    }
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::NoFeaturedArticle => write!(f, "no featured article has been published"),
            Self::NoCandidates(kind) => write!(f, "no {kind} available to sample"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SelectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SelectionError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: EntityKind::Article,
                id,
            } => Self::ArticleNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Front page composition: featured lead plus sampled follow-up reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontPage {
    pub main_article: Article,
    pub more_articles: Vec<Article>,
}

/// Article detail composition: the article plus sampled quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticlePage {
    pub article: Article,
    pub quotes: Vec<Quote>,
}

/// Read-only selection service over article and quote repositories.
pub struct SelectionService<A, Q, G = ThreadRng> {
    articles: A,
    quotes: Q,
    rng: G,
    mode: SampleMode,
}

impl<A: ArticleRepository, Q: QuoteRepository> SelectionService<A, Q, ThreadRng> {
    /// Creates a service drawing from the thread-local entropy source.
    pub fn new(articles: A, quotes: Q) -> Self {
        Self::with_rng(articles, quotes, rand::thread_rng())
    }
}

impl<A: ArticleRepository, Q: QuoteRepository, G: Rng> SelectionService<A, Q, G> {
    /// Creates a service with an explicit randomness source.
    pub fn with_rng(articles: A, quotes: Q, rng: G) -> Self {
        Self {
            articles,
            quotes,
            rng,
            mode: SampleMode::default(),
        }
    }

    pub fn with_sample_mode(mut self, mode: SampleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn sample_mode(&self) -> SampleMode {
        self.mode
    }

    /// Returns the ten-promise-series article with the newest `publish_at`.
    pub fn latest_featured_article(&self) -> SelectionResult<Article> {
        self.articles
            .latest_published(ArticleType::TenPromiseSeries)?
            .ok_or_else(|| {
                warn!("event=latest_featured module=selection status=empty");
                SelectionError::NoFeaturedArticle
            })
    }

    pub fn article_by_id(&self, id: ArticleId) -> SelectionResult<Article> {
        Ok(self.articles.get_article(id)?)
    }

    /// Draws `count` articles other than `exclude_id`.
    pub fn sample_other_articles(
        &mut self,
        exclude_id: ArticleId,
        count: usize,
    ) -> SelectionResult<Vec<Article>> {
        let candidates = self.articles.list_articles(&ArticleListQuery {
            exclude_id: Some(exclude_id),
            ..ArticleListQuery::default()
        })?;
        self.draw(EntityKind::Article, &candidates, count)
    }

    /// Draws `count` quotes from all stored quotes.
    pub fn sample_quotes(&mut self, count: usize) -> SelectionResult<Vec<Quote>> {
        let candidates = self.quotes.list_quotes(&QuoteListQuery::default())?;
        self.draw(EntityKind::Quote, &candidates, count)
    }

    /// Featured lead plus `count` sampled other articles.
    pub fn front_page(&mut self, count: usize) -> SelectionResult<FrontPage> {
        let main_article = self.latest_featured_article()?;
        let more_articles = self.sample_other_articles(main_article.id, count)?;
        Ok(FrontPage {
            main_article,
            more_articles,
        })
    }

    /// Article by id plus `quote_count` sampled quotes.
    pub fn article_page(
        &mut self,
        id: ArticleId,
        quote_count: usize,
    ) -> SelectionResult<ArticlePage> {
        let article = self.article_by_id(id)?;
        let quotes = self.sample_quotes(quote_count)?;
        Ok(ArticlePage { article, quotes })
    }

    fn draw<T: Clone>(
        &mut self,
        kind: EntityKind,
        candidates: &[T],
        count: usize,
    ) -> SelectionResult<Vec<T>> {
        if candidates.is_empty() {
            warn!(
                "event=sample module=selection status=empty kind={kind} requested={count}"
            );
            return Err(SelectionError::NoCandidates(kind));
        }

        let drawn: Vec<T> = match self.mode {
            SampleMode::WithReplacement => (0..count)
                .filter_map(|_| candidates.choose(&mut self.rng).cloned())
                .collect(),
            SampleMode::Distinct => candidates
                .choose_multiple(&mut self.rng, count)
                .cloned()
                .collect(),
        };

        debug!(
            "event=sample module=selection status=ok kind={kind} mode={} candidates={} drawn={}",
            self.mode.as_str(),
            candidates.len(),
            drawn.len()
        );
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::{SampleMode, SelectionError};
    use crate::model::EntityKind;
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn default_mode_keeps_replacement_semantics() {
        assert_eq!(SampleMode::default(), SampleMode::WithReplacement);
    }

    #[test]
    fn repo_not_found_for_article_maps_to_article_not_found() {
        let id = Uuid::new_v4();
        let err = SelectionError::from(RepoError::NotFound {
            kind: EntityKind::Article,
            id,
        });
        assert!(matches!(err, SelectionError::ArticleNotFound(found) if found == id));
        assert!(err.is_not_found());
    }

    #[test]
    fn not_found_class_covers_empty_samples_but_not_invalid_data() {
        assert!(SelectionError::NoCandidates(EntityKind::Quote).is_not_found());
        assert!(SelectionError::NoFeaturedArticle.is_not_found());
        assert!(!SelectionError::Repo(RepoError::InvalidData("x".to_string())).is_not_found());
    }
}
