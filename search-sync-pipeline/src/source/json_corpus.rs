//! File-backed content source.
//!
//! Reads a JSON export of the site corpus shaped as
//! `{ "posts": [ ... ], "pages": [ ... ] }`. At least one of the two lists
//! must be present and no other top-level key is accepted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use super::{ContentSource, SourceError};
use search_sync_shared::ContentRecord;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorpusExport {
    posts: Option<Vec<ContentRecord>>,
    pages: Option<Vec<ContentRecord>>,
}

#[derive(Debug, Default)]
struct Corpus {
    posts: Vec<ContentRecord>,
    pages: Vec<ContentRecord>,
}

/// Content source over a corpus export.
///
/// A source created with [`JsonCorpusSource::at`] reads its file on first
/// access, so nothing touches the file before the run asks for content.
#[derive(Debug)]
pub struct JsonCorpusSource {
    path: Option<PathBuf>,
    corpus: OnceCell<Corpus>,
}

impl JsonCorpusSource {
    /// Create a source from already loaded records.
    pub fn new(posts: Vec<ContentRecord>, pages: Vec<ContentRecord>) -> Self {
        Self {
            path: None,
            corpus: OnceCell::from(Corpus { posts, pages }),
        }
    }

    /// Create a source over the export file at `path`, read on first access.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            corpus: OnceCell::new(),
        }
    }

    /// Parse a corpus export. `origin` names the input in error messages.
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, SourceError> {
        let corpus = parse_export(text, origin)?;
        Ok(Self::new(corpus.posts, corpus.pages))
    }

    async fn corpus(&self) -> Result<&Corpus, SourceError> {
        self.corpus
            .get_or_try_init(|| async {
                match &self.path {
                    Some(path) => read_export(path).await,
                    None => Ok(Corpus::default()),
                }
            })
            .await
    }
}

#[instrument]
async fn read_export(path: &Path) -> Result<Corpus, SourceError> {
    let origin = path.display().to_string();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SourceError::read(&origin, e.to_string()))?;
    let corpus = parse_export(&text, &origin)?;
    info!(
        origin = %origin,
        posts = corpus.posts.len(),
        pages = corpus.pages.len(),
        "Read corpus export"
    );
    Ok(corpus)
}

fn parse_export(text: &str, origin: &str) -> Result<Corpus, SourceError> {
    let export: CorpusExport =
        serde_json::from_str(text).map_err(|e| SourceError::parse(origin, e.to_string()))?;

    if export.posts.is_none() && export.pages.is_none() {
        return Err(SourceError::parse(
            origin,
            "expected a \"posts\" or \"pages\" list at the top level",
        ));
    }

    let corpus = Corpus {
        posts: export.posts.unwrap_or_default(),
        pages: export.pages.unwrap_or_default(),
    };
    debug!(
        origin = origin,
        posts = corpus.posts.len(),
        pages = corpus.pages.len(),
        "Parsed corpus export"
    );
    Ok(corpus)
}

#[async_trait]
impl ContentSource for JsonCorpusSource {
    async fn published_articles(&self) -> Result<Vec<ContentRecord>, SourceError> {
        let corpus = self.corpus().await?;
        Ok(corpus.posts.iter().filter(|post| post.published).cloned().collect())
    }

    async fn pages(&self, layouts: &[String]) -> Result<Vec<ContentRecord>, SourceError> {
        let corpus = self.corpus().await?;
        Ok(corpus
            .pages
            .iter()
            .filter(|page| {
                page.layout
                    .as_ref()
                    .is_some_and(|layout| layouts.contains(layout))
            })
            .cloned()
            .collect())
    }
}
