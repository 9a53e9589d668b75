//! Article repository contract and SQLite implementation.
//!
//! # Invariants
//! - `path` is unique at table level.
//! - Every update stamps `modified` with the write time.
//! - Listing order is `publish_at DESC, created DESC, id ASC`.

use crate::model::article::{Article, ArticleId, ArticleType};
use crate::model::EntityKind;
use crate::repo::{
    bool_to_int, ensure_table_ready, in_savepoint, map_write_error, parse_bool, parse_timestamp,
    parse_uuid, timestamp_to_db, Page, RepoError, RepoResult,
};
use chrono::Utc;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    body,
    headline,
    promo,
    byline,
    article_type,
    featured_image_url,
    featured_image_name,
    static_page,
    path,
    created,
    publish_at,
    modified,
    disclosure
FROM articles";

const ARTICLE_COLUMNS: &[&str] = &[
    "id",
    "body",
    "headline",
    "promo",
    "byline",
    "article_type",
    "featured_image_url",
    "featured_image_name",
    "static_page",
    "path",
    "created",
    "publish_at",
    "modified",
    "disclosure",
];

const ARTICLE_ORDER_SQL: &str = " ORDER BY publish_at DESC, created DESC, id ASC";

/// Filter options for listing articles.
#[derive(Debug, Clone, Default)]
pub struct ArticleListQuery {
    pub article_type: Option<ArticleType>,
    /// Drops one article from the result, e.g. the current front page lead.
    pub exclude_id: Option<ArticleId>,
    pub byline: Option<String>,
    pub page: Page,
}

pub trait ArticleRepository {
    /// Validates and persists an article, returning the stored record.
    fn create_article(&self, article: &Article) -> RepoResult<Article>;
    /// Replaces all fields of an existing article and stamps `modified`.
    fn update_article(&self, article: &Article) -> RepoResult<Article>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Article>;
    fn find_article_by_path(&self, path: &str) -> RepoResult<Option<Article>>;
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>>;
    /// Returns the article of `article_type` with the newest `publish_at`.
    ///
    /// Ties go to the later `created`, then to the lowest id.
    fn latest_published(&self, article_type: ArticleType) -> RepoResult<Option<Article>>;
}

#[derive(Debug)]
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "articles", ARTICLE_COLUMNS)?;
        Ok(Self { conn })
    }

    fn collect(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Article>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }
        Ok(articles)
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, article: &Article) -> RepoResult<Article> {
        article.validate()?;

        in_savepoint(self.conn, "create_article", || {
            self.conn
                .execute(
                    "INSERT INTO articles (
                        id,
                        body,
                        headline,
                        promo,
                        byline,
                        article_type,
                        featured_image_url,
                        featured_image_name,
                        static_page,
                        path,
                        created,
                        publish_at,
                        modified,
                        disclosure
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
                    params![
                        article.id.to_string(),
                        article.body.as_str(),
                        article.headline.as_str(),
                        article.promo.as_str(),
                        article.byline.as_str(),
                        article.article_type.as_str(),
                        article.featured_image_url.as_str(),
                        article.featured_image_name.as_deref(),
                        bool_to_int(article.static_page),
                        article.path.as_str(),
                        timestamp_to_db(&article.created),
                        timestamp_to_db(&article.publish_at),
                        timestamp_to_db(&article.modified),
                        article.disclosure.as_deref(),
                    ],
                )
                .map_err(|err| map_write_error(EntityKind::Article, err))?;

            self.get_article(article.id)
        })
    }

    fn update_article(&self, article: &Article) -> RepoResult<Article> {
        article.validate()?;

        in_savepoint(self.conn, "update_article", || {
            let modified = Utc::now();

            let changed = self
                .conn
                .execute(
                    "UPDATE articles
                     SET
                        body = ?2,
                        headline = ?3,
                        promo = ?4,
                        byline = ?5,
                        article_type = ?6,
                        featured_image_url = ?7,
                        featured_image_name = ?8,
                        static_page = ?9,
                        path = ?10,
                        created = ?11,
                        publish_at = ?12,
                        modified = ?13,
                        disclosure = ?14
                     WHERE id = ?1;",
                    params![
                        article.id.to_string(),
                        article.body.as_str(),
                        article.headline.as_str(),
                        article.promo.as_str(),
                        article.byline.as_str(),
                        article.article_type.as_str(),
                        article.featured_image_url.as_str(),
                        article.featured_image_name.as_deref(),
                        bool_to_int(article.static_page),
                        article.path.as_str(),
                        timestamp_to_db(&article.created),
                        timestamp_to_db(&article.publish_at),
                        timestamp_to_db(&modified),
                        article.disclosure.as_deref(),
                    ],
                )
                .map_err(|err| map_write_error(EntityKind::Article, err))?;

            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: EntityKind::Article,
                    id: article.id,
                });
            }

            debug!(
                "event=article_update module=repo status=ok id={} path={}",
                article.id, article.path
            );
            self.get_article(article.id)
        })
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Article> {
        self.collect(
            &format!("{ARTICLE_SELECT_SQL} WHERE id = ?;"),
            vec![Value::Text(id.to_string())],
        )?
        .into_iter()
        .next()
        .ok_or(RepoError::NotFound {
            kind: EntityKind::Article,
            id,
        })
    }

    fn find_article_by_path(&self, path: &str) -> RepoResult<Option<Article>> {
        Ok(self
            .collect(
                &format!("{ARTICLE_SELECT_SQL} WHERE path = ?;"),
                vec![Value::Text(path.to_string())],
            )?
            .into_iter()
            .next())
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        let mut sql = format!("{ARTICLE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(article_type) = query.article_type {
            sql.push_str(" AND article_type = ?");
            bind_values.push(Value::Text(article_type.as_str().to_string()));
        }
        if let Some(exclude_id) = query.exclude_id {
            sql.push_str(" AND id <> ?");
            bind_values.push(Value::Text(exclude_id.to_string()));
        }
        if let Some(byline) = query.byline.as_ref() {
            sql.push_str(" AND byline = ?");
            bind_values.push(Value::Text(byline.clone()));
        }

        sql.push_str(ARTICLE_ORDER_SQL);
        query.page.push_sql(&mut sql, &mut bind_values);
        self.collect(&sql, bind_values)
    }

    fn latest_published(&self, article_type: ArticleType) -> RepoResult<Option<Article>> {
        let query = ArticleListQuery {
            article_type: Some(article_type),
            page: Page {
                limit: Some(1),
                offset: 0,
            },
            ..ArticleListQuery::default()
        };
        Ok(self.list_articles(&query)?.into_iter().next())
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id_text: String = row.get("id")?;
    let type_text: String = row.get("article_type")?;
    let article_type = ArticleType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid article type `{type_text}` in articles.article_type"
        ))
    })?;
    let created: String = row.get("created")?;
    let publish_at: String = row.get("publish_at")?;
    let modified: String = row.get("modified")?;

    let article = Article {
        id: parse_uuid(&id_text, "articles.id")?,
        body: row.get("body")?,
        headline: row.get("headline")?,
        promo: row.get("promo")?,
        byline: row.get("byline")?,
        article_type,
        featured_image_url: row.get("featured_image_url")?,
        featured_image_name: row.get("featured_image_name")?,
        static_page: parse_bool(row.get("static_page")?, "articles.static_page")?,
        path: row.get("path")?,
        created: parse_timestamp(&created, "articles.created")?,
        publish_at: parse_timestamp(&publish_at, "articles.publish_at")?,
        modified: parse_timestamp(&modified, "articles.modified")?,
        disclosure: row.get("disclosure")?,
    };
    article
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("article {}: {err}", article.id)))?;
    Ok(article)
}
