//! FaithFocus command-line front end.
//!
//! Browses versions, books and chapters upstream and reads chapter text
//! through the on-disk chapter cache.

pub mod config;
pub mod error;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use faithfocus_client::ScriptureApiClient;
use faithfocus_core::{Book, Chapter, ChapterBody, ContentClient, ContentVersion};
use faithfocus_storage::{CacheOutcome, CacheRead, ChapterCache, LmdbStore};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "faithfocus")]
#[command(about = "FaithFocus - read scripture from the command line", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (falls back to FAITHFOCUS_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available versions
    Versions {
        /// Only show versions in this language (case-insensitive)
        #[arg(short = 'l', long)]
        language: Option<String>,
    },
    /// List the books of a version
    Books {
        /// Version id, e.g. ENGKJV
        version: String,
    },
    /// List the chapters of a book
    Chapters {
        /// Version id
        version: String,
        /// Book id, e.g. JHN
        book: String,
    },
    /// Print a chapter, using the local cache
    Read {
        /// Version id
        version: String,
        /// Chapter id, e.g. JHN.1
        chapter: String,
    },
}

/// Execute a parsed command against the configured upstream.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config)?;
    let client = Arc::new(ScriptureApiClient::new(&config.api)?);
    debug!(base_url = %client.base_url(), "client ready");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Versions { language } => {
            let versions = client.list_versions().await?;
            write_versions(&mut out, &filter_by_language(versions, language.as_deref()))?;
        }
        Command::Books { version } => {
            write_books(&mut out, &client.list_books(&version).await?)?;
        }
        Command::Chapters { version, book } => {
            write_chapters(&mut out, &client.list_chapters(&version, &book).await?)?;
        }
        Command::Read { version, chapter } => {
            let store = Arc::new(LmdbStore::open(
                &config.cache.path,
                config.cache.max_size_mb,
            )?);
            let cache = ChapterCache::new(client, store, config.cache_config());
            let read = cache.read_chapter_body(&version, &chapter).await?;
            write_chapter_body(&mut out, read.value())?;
            write_outcome(&mut std::io::stderr(), &read)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Keep versions whose language matches `language`, or all of them when `None`.
pub fn filter_by_language(
    versions: Vec<ContentVersion>,
    language: Option<&str>,
) -> Vec<ContentVersion> {
    match language {
        Some(language) => versions
            .into_iter()
            .filter(|v| v.is_in_language(language))
            .collect(),
        None => versions,
    }
}

pub fn write_versions<W: Write>(out: &mut W, versions: &[ContentVersion]) -> std::io::Result<()> {
    for version in versions {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            version.id,
            version.abbreviation.as_deref().unwrap_or("-"),
            version.name,
            version.language.name
        )?;
    }
    Ok(())
}

pub fn write_books<W: Write>(out: &mut W, books: &[Book]) -> std::io::Result<()> {
    for book in books {
        writeln!(out, "{}\t{}", book.id, book.name)?;
    }
    Ok(())
}

pub fn write_chapters<W: Write>(out: &mut W, chapters: &[Chapter]) -> std::io::Result<()> {
    for chapter in chapters {
        writeln!(out, "{}\t{}", chapter.id, chapter.reference)?;
    }
    Ok(())
}

pub fn write_chapter_body<W: Write>(out: &mut W, body: &ChapterBody) -> std::io::Result<()> {
    if let Some(reference) = &body.reference {
        writeln!(out, "{}", reference)?;
        writeln!(out)?;
    }
    writeln!(out, "{}", body.content)?;
    if let Some(copyright) = &body.copyright {
        writeln!(out)?;
        writeln!(out, "{}", copyright)?;
    }
    Ok(())
}

pub fn write_outcome<W: Write, T>(err: &mut W, read: &CacheRead<T>) -> std::io::Result<()> {
    let what = match read.outcome() {
        CacheOutcome::Hit => "cache hit",
        CacheOutcome::Cached => "fetched and cached",
        CacheOutcome::Uncached => "fetched, cache write failed",
    };
    writeln!(err, "[{}, stored at {}]", what, read.stored_at().to_rfc3339())
}
