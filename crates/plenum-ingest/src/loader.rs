//! Directory ingestion into a [`Corpus`].
//!
//! [`CorpusLoader`] walks a directory of protocol files, parses every speech
//! and merges the results into one corpus:
//!
//! - speakers are deduplicated by key, the first record wins;
//! - groups are deduplicated by canonical name;
//! - every document contributes its session once;
//! - speeches without a speaker or session are dropped.
//!
//! A failing document is logged and counted. It never aborts the load.

use plenum_graph::{Corpus, NewSpeaker, NewSpeech, Session, SessionId, SpeakerId, UNAFFILIATED};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::options::IngestOptions;
use crate::schema::{TAG_PROCEEDINGS, TAG_SPEECH};
use crate::session::SessionContext;
use crate::speech::{parse_speech, ParsedSpeaker, ParsedSpeech};
use crate::tree::{TreeError, XmlTree};

// ============================================================================
// Errors and reports
// ============================================================================

/// Failure to ingest one document.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document {}: {source}", path.display())]
    Tree {
        path: PathBuf,
        #[source]
        source: TreeError,
    },
    #[error("{} is {size} bytes, over the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Counters for one or more `load` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Candidate files with a matching extension.
    pub files_seen: usize,
    /// Files that had a proceedings section.
    pub files_loaded: usize,
    /// Oversized files and files without proceedings.
    pub files_skipped: usize,
    /// Unreadable or malformed files.
    pub files_failed: usize,
    pub speeches_added: usize,
    /// Speeches lacking a speaker or a session.
    pub speeches_dropped: usize,
}

impl LoadReport {
    pub fn merge(&mut self, other: &LoadReport) {
        self.files_seen += other.files_seen;
        self.files_loaded += other.files_loaded;
        self.files_skipped += other.files_skipped;
        self.files_failed += other.files_failed;
        self.speeches_added += other.speeches_added;
        self.speeches_dropped += other.speeches_dropped;
    }
}

/// Result of ingesting one parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document has no `sitzungsverlauf` element.
    NoProceedings,
    Loaded {
        speeches_added: usize,
        speeches_dropped: usize,
    },
}

// ============================================================================
// Loader
// ============================================================================

/// Accumulates documents into a corpus.
#[derive(Debug, Default)]
pub struct CorpusLoader {
    options: IngestOptions,
    corpus: Corpus,
}

impl CorpusLoader {
    pub fn new(options: IngestOptions) -> Self {
        Self {
            options,
            corpus: Corpus::new(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }

    /// Ingest every matching file directly inside `dir`.
    pub fn load(&mut self, dir: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "input directory does not exist");
            return report;
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(path = %dir.display(), error = %err, "failed to list entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.options.accepts(entry.path()) {
                continue;
            }
            report.files_seen += 1;

            match self.load_file(entry.path()) {
                Ok(DocumentOutcome::Loaded {
                    speeches_added,
                    speeches_dropped,
                }) => {
                    report.files_loaded += 1;
                    report.speeches_added += speeches_added;
                    report.speeches_dropped += speeches_dropped;
                }
                Ok(DocumentOutcome::NoProceedings) => {
                    tracing::debug!(path = %entry.path().display(), "no proceedings section");
                    report.files_skipped += 1;
                }
                Err(err @ IngestError::TooLarge { .. }) => {
                    tracing::warn!(error = %err, "skipping file");
                    report.files_skipped += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to ingest file");
                    report.files_failed += 1;
                }
            }
        }

        tracing::info!(
            path = %dir.display(),
            files = report.files_loaded,
            speeches = report.speeches_added,
            dropped = report.speeches_dropped,
            "loaded protocols"
        );
        report
    }

    /// Read and ingest one file.
    pub fn load_file(&mut self, path: &Path) -> Result<DocumentOutcome, IngestError> {
        let size = std::fs::metadata(path)
            .map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size > self.options.max_file_bytes {
            return Err(IngestError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.options.max_file_bytes,
            });
        }

        let xml = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.ingest_document(&xml).map_err(|source| IngestError::Tree {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Ingest one document given as text.
    pub fn ingest_document(&mut self, xml: &str) -> Result<DocumentOutcome, TreeError> {
        let tree = XmlTree::parse(xml)?;
        let root = tree.root();
        let Some(proceedings) = root.first_descendant(TAG_PROCEEDINGS) else {
            return Ok(DocumentOutcome::NoProceedings);
        };

        let mut ctx = SessionContext::new();
        let mut registered: Option<(Arc<Session>, SessionId)> = None;
        let mut speeches_added = 0;
        let mut speeches_dropped = 0;

        for rede in proceedings.descendants_named(TAG_SPEECH) {
            let parsed = parse_speech(rede, root, &mut ctx);
            if self.add_speech(parsed, &mut registered) {
                speeches_added += 1;
            } else {
                speeches_dropped += 1;
            }
        }

        Ok(DocumentOutcome::Loaded {
            speeches_added,
            speeches_dropped,
        })
    }

    fn add_speech(
        &mut self,
        parsed: ParsedSpeech,
        registered: &mut Option<(Arc<Session>, SessionId)>,
    ) -> bool {
        let (Some(speaker), Some(session)) = (parsed.speaker, parsed.session) else {
            tracing::debug!(speech = %parsed.key, "dropping speech without speaker or session");
            return false;
        };

        let speaker_id = match self.resolve_speaker(speaker) {
            Some(id) => id,
            None => return false,
        };
        let session_id = self.resolve_session(session, registered);

        match self.corpus.push_speech(NewSpeech {
            key: parsed.key,
            speaker: speaker_id,
            session: session_id,
            text: parsed.text,
            comments: parsed.comments,
        }) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "rejected speech");
                false
            }
        }
    }

    fn resolve_speaker(&mut self, speaker: ParsedSpeaker) -> Option<SpeakerId> {
        if let Some(id) = self.corpus.speaker_id(&speaker.key) {
            return Some(id);
        }

        let group = self
            .corpus
            .intern_group(speaker.group.as_deref().unwrap_or(UNAFFILIATED));
        match self.corpus.insert_speaker(NewSpeaker {
            key: speaker.key,
            title: speaker.title,
            first_name: speaker.first_name,
            last_name: speaker.last_name,
            group,
        }) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(error = %err, "rejected speaker");
                None
            }
        }
    }

    fn resolve_session(
        &mut self,
        session: Arc<Session>,
        registered: &mut Option<(Arc<Session>, SessionId)>,
    ) -> SessionId {
        if let Some((known, id)) = registered.as_ref() {
            if Arc::ptr_eq(known, &session) {
                return *id;
            }
        }

        let id = self.corpus.push_session((*session).clone());
        *registered = Some((session, id));
        id
    }
}

/// Load every protocol in `dir` into a fresh corpus.
pub fn load_corpus(dir: &Path, options: &IngestOptions) -> Corpus {
    let mut loader = CorpusLoader::new(options.clone());
    loader.load(dir);
    loader.into_corpus()
}
