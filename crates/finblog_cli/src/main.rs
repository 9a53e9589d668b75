//! Command-line probe over `finblog_core`.
//!
//! # Responsibility
//! - Verify core linkage (`sanity`) and load content bundles (`import`).
//! - Print front page, article page and quote samples as JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use finblog_core::db::open_db;
use finblog_core::{
    default_log_level, ingest_bundle, init_logging, load_bundle, SampleMode, SelectionService,
    SqliteArticleRepository, SqliteQuoteRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_SAMPLE_COUNT: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "finblog", version, about = "Finance blog content store")]
struct Cli {
    #[arg(long, global = true, env = "FINBLOG_DB", default_value = "finblog.db")]
    db: PathBuf,
    /// Absolute directory for rolling log files; logging stays off when unset.
    #[arg(long, global = true, env = "FINBLOG_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// Only meaningful together with `--log-dir`.
    #[arg(long, global = true, env = "FINBLOG_LOG_LEVEL", requires = "log_dir")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the install confirmation message.
    Sanity,
    /// Load a JSON content bundle into the database.
    Import { bundle: PathBuf },
    /// Latest featured article plus sampled other articles.
    FrontPage {
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        count: usize,
        /// Never repeat an article in the sample.
        #[arg(long, default_value_t = false)]
        distinct: bool,
    },
    /// One article plus sampled quotes.
    Article {
        id: Uuid,
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        quotes: usize,
    },
    /// Sample more quotes.
    Quotes {
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, log_dir)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    match cli.command {
        Commands::Sanity => {
            println!("{}", finblog_core::sanity_check());
            Ok(())
        }
        Commands::Import { bundle } => {
            let mut conn = connect(&cli.db)?;
            let content = load_bundle(&bundle)?;
            let report = ingest_bundle(&mut conn, &content)?;
            print_json(&report)
        }
        Commands::FrontPage { count, distinct } => {
            let conn = connect(&cli.db)?;
            let mode = if distinct {
                SampleMode::Distinct
            } else {
                SampleMode::WithReplacement
            };
            let mut selection = selection_for(&conn)?.with_sample_mode(mode);
            print_json(&selection.front_page(count)?)
        }
        Commands::Article { id, quotes } => {
            let conn = connect(&cli.db)?;
            print_json(&selection_for(&conn)?.article_page(id, quotes)?)
        }
        Commands::Quotes { count } => {
            let conn = connect(&cli.db)?;
            print_json(&selection_for(&conn)?.sample_quotes(count)?)
        }
    }
}

fn connect(path: &Path) -> Result<Connection> {
    open_db(path).with_context(|| format!("failed to open `{}`", path.display()))
}

fn selection_for(
    conn: &Connection,
) -> Result<SelectionService<SqliteArticleRepository<'_>, SqliteQuoteRepository<'_>>> {
    Ok(SelectionService::new(
        SqliteArticleRepository::try_new(conn)?,
        SqliteQuoteRepository::try_new(conn)?,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_level_without_log_dir_is_rejected() {
        let err = Cli::try_parse_from(["finblog", "--log-level", "debug", "sanity"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn log_level_with_log_dir_parses() {
        let cli = Cli::try_parse_from([
            "finblog",
            "--log-dir",
            "/tmp/finblog-logs",
            "--log-level",
            "debug",
            "front-page",
            "--count",
            "5",
            "--distinct",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Commands::FrontPage {
                count: 5,
                distinct: true
            }
        ));
    }
}
