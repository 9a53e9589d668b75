//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - `username` and `external_uid` are unique at table level.
//! - Authors have no update path; they are immutable after create.

use crate::model::author::{Author, AuthorId, ContributorType};
use crate::model::EntityKind;
use crate::repo::{
    bool_to_int, ensure_table_ready, in_savepoint, map_write_error, parse_bool, parse_uuid, Page,
    RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    username,
    byline,
    contributor_type,
    email,
    first_name,
    last_name,
    external_uid,
    is_primary,
    small_avatar_url,
    large_avatar_url,
    twitter_username,
    short_bio,
    long_bio
FROM authors";

const AUTHOR_COLUMNS: &[&str] = &[
    "id",
    "username",
    "byline",
    "contributor_type",
    "email",
    "first_name",
    "last_name",
    "external_uid",
    "is_primary",
    "small_avatar_url",
    "large_avatar_url",
    "twitter_username",
    "short_bio",
    "long_bio",
];

/// Filter options for listing authors. Results are ordered by username.
#[derive(Debug, Clone, Default)]
pub struct AuthorListQuery {
    pub contributor_type: Option<ContributorType>,
    pub primary_only: bool,
    pub page: Page,
}

pub trait AuthorRepository {
    /// Validates and persists an author, returning the stored record.
    fn create_author(&self, author: &Author) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Author>;
    fn find_author_by_username(&self, username: &str) -> RepoResult<Option<Author>>;
    /// Resolves an article byline to an author.
    ///
    /// Bylines are not unique; primary authors win, then username order.
    fn find_author_by_byline(&self, byline: &str) -> RepoResult<Option<Author>>;
    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>>;
}

#[derive(Debug)]
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "authors", AUTHOR_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_one(&self, filter: &str, value: Value) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} {filter} LIMIT 1;"))?;
        let mut rows = stmt.query([value])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_author_row(row)?)),
            None => Ok(None),
        }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &Author) -> RepoResult<Author> {
        author.validate()?;

        in_savepoint(self.conn, "create_author", || {
            self.conn
                .execute(
                    "INSERT INTO authors (
                        id,
                        username,
                        byline,
                        contributor_type,
                        email,
                        first_name,
                        last_name,
                        external_uid,
                        is_primary,
                        small_avatar_url,
                        large_avatar_url,
                        twitter_username,
                        short_bio,
                        long_bio
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
                    params![
                        author.id.to_string(),
                        author.username.as_str(),
                        author.byline.as_str(),
                        author.contributor_type.as_str(),
                        author.email.as_str(),
                        author.first_name.as_str(),
                        author.last_name.as_str(),
                        author.external_uid,
                        bool_to_int(author.primary),
                        author.small_avatar_url.as_str(),
                        author.large_avatar_url.as_str(),
                        author.twitter_username.as_deref(),
                        author.short_bio.as_deref(),
                        author.long_bio.as_deref(),
                    ],
                )
                .map_err(|err| map_write_error(EntityKind::Author, err))?;

            self.get_author(author.id)
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Author> {
        self.query_one("WHERE id = ?1", Value::Text(id.to_string()))?
            .ok_or(RepoError::NotFound {
                kind: EntityKind::Author,
                id,
            })
    }

    fn find_author_by_username(&self, username: &str) -> RepoResult<Option<Author>> {
        self.query_one("WHERE username = ?1", Value::Text(username.to_string()))
    }

    fn find_author_by_byline(&self, byline: &str) -> RepoResult<Option<Author>> {
        self.query_one(
            "WHERE byline = ?1 ORDER BY is_primary DESC, username ASC",
            Value::Text(byline.to_string()),
        )
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(contributor_type) = query.contributor_type {
            sql.push_str(" AND contributor_type = ?");
            bind_values.push(Value::Text(contributor_type.as_str().to_string()));
        }
        if query.primary_only {
            sql.push_str(" AND is_primary = 1");
        }

        sql.push_str(" ORDER BY username ASC, id ASC");
        query.page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id_text: String = row.get("id")?;
    let contributor_text: String = row.get("contributor_type")?;
    let contributor_type = ContributorType::parse(&contributor_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid contributor type `{contributor_text}` in authors.contributor_type"
        ))
    })?;

    let author = Author {
        id: parse_uuid(&id_text, "authors.id")?,
        username: row.get("username")?,
        byline: row.get("byline")?,
        contributor_type,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        external_uid: row.get("external_uid")?,
        primary: parse_bool(row.get("is_primary")?, "authors.is_primary")?,
        small_avatar_url: row.get("small_avatar_url")?,
        large_avatar_url: row.get("large_avatar_url")?,
        twitter_username: row.get("twitter_username")?,
        short_bio: row.get("short_bio")?,
        long_bio: row.get("long_bio")?,
    };
    author
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("author {}: {err}", author.id)))?;
    Ok(author)
}
