//! Tag and instrument repositories.
//!
//! Both tables hold identity only, so one SQLite implementation backs the two
//! contracts.

use crate::model::reserved::{Instrument, InstrumentId, Tag, TagId};
use crate::model::validation::require_id;
use crate::model::EntityKind;
use crate::repo::{ensure_table_ready, map_write_error, parse_uuid, RepoError, RepoResult};
use rusqlite::Connection;
use uuid::Uuid;

pub trait TagRepository {
    fn create_tag(&self, tag: &Tag) -> RepoResult<Tag>;
    fn get_tag(&self, id: TagId) -> RepoResult<Tag>;
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

pub trait InstrumentRepository {
    fn create_instrument(&self, instrument: &Instrument) -> RepoResult<Instrument>;
    fn get_instrument(&self, id: InstrumentId) -> RepoResult<Instrument>;
    fn list_instruments(&self) -> RepoResult<Vec<Instrument>>;
}

#[derive(Debug)]
pub struct SqliteReservedRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReservedRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "tags", &["id"])?;
        ensure_table_ready(conn, "instruments", &["id"])?;
        Ok(Self { conn })
    }

    fn insert_id(&self, kind: EntityKind, id: Uuid) -> RepoResult<()> {
        require_id(kind, id)?;
        self.conn
            .execute(
                &format!("INSERT INTO {} (id) VALUES (?1);", table_for(kind)),
                [id.to_string()],
            )
            .map_err(|err| map_write_error(kind, err))?;
        Ok(())
    }

    fn require_existing(&self, kind: EntityKind, id: Uuid) -> RepoResult<Uuid> {
        let exists: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
                table_for(kind)
            ),
            [id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            Ok(id)
        } else {
            Err(RepoError::NotFound { kind, id })
        }
    }

    fn list_ids(&self, kind: EntityKind) -> RepoResult<Vec<Uuid>> {
        let table = table_for(kind);
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id FROM {table} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            ids.push(parse_uuid(&text, &format!("{table}.id"))?);
        }
        Ok(ids)
    }
}

impl TagRepository for SqliteReservedRepository<'_> {
    fn create_tag(&self, tag: &Tag) -> RepoResult<Tag> {
        self.insert_id(EntityKind::Tag, tag.id)?;
        self.get_tag(tag.id)
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Tag> {
        let id = self.require_existing(EntityKind::Tag, id)?;
        Ok(Tag { id })
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        Ok(self
            .list_ids(EntityKind::Tag)?
            .into_iter()
            .map(|id| Tag { id })
            .collect())
    }
}

impl InstrumentRepository for SqliteReservedRepository<'_> {
    fn create_instrument(&self, instrument: &Instrument) -> RepoResult<Instrument> {
        self.insert_id(EntityKind::Instrument, instrument.id)?;
        self.get_instrument(instrument.id)
    }

    fn get_instrument(&self, id: InstrumentId) -> RepoResult<Instrument> {
        let id = self.require_existing(EntityKind::Instrument, id)?;
        Ok(Instrument { id })
    }

    fn list_instruments(&self) -> RepoResult<Vec<Instrument>> {
        Ok(self
            .list_ids(EntityKind::Instrument)?
            .into_iter()
            .map(|id| Instrument { id })
            .collect())
    }
}

fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Tag => "tags",
        EntityKind::Instrument => "instruments",
        EntityKind::Author | EntityKind::Article | EntityKind::Quote => {
            unreachable!("{kind} is not a reserved entity")
        }
    }
}
