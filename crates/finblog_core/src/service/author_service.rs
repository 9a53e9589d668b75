//! Author use-case service.
//!
//! Resolves the article byline soft reference. A byline with no matching
//! author is a normal outcome, not an error.

use crate::model::article::Article;
use crate::model::author::{Author, AuthorId};
use crate::repo::author_repo::{AuthorListQuery, AuthorRepository};
use crate::repo::RepoResult;
use log::debug;

pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_author(&self, author: &Author) -> RepoResult<Author> {
        self.repo.create_author(author)
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Author> {
        self.repo.get_author(id)
    }

    pub fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        self.repo.list_authors(query)
    }

    /// Looks up the author whose byline matches the article byline.
    pub fn author_for_article(&self, article: &Article) -> RepoResult<Option<Author>> {
        let author = self.repo.find_author_by_byline(&article.byline)?;
        if author.is_none() {
            debug!(
                "event=byline_resolve module=author status=unmatched article_id={}",
                article.id
            );
        }
        Ok(author)
    }
}
