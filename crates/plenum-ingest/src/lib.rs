//! Plenary protocol ingestion for Plenum
//!
//! Reads Bundestag plenary protocols (`dbtplenarprotokoll` XML) and merges
//! them into a [`plenum_graph::Corpus`]:
//!
//! - [`tree`]: element tree built from `quick-xml` events
//! - [`normalize`]: faction name normalization
//! - [`session`]: session metadata and the per-document session cache
//! - [`speech`]: speaker, body and comment extraction for one `rede`
//! - [`loader`]: directory walk, deduplication and corpus assembly
//!
//! Malformed documents are reported per file and never abort a load. Fields
//! that fail to parse (dates, times) are left empty with a warning.

pub mod loader;
pub mod normalize;
pub mod options;
pub mod schema;
pub mod session;
pub mod speech;
pub mod tree;

pub use loader::{load_corpus, CorpusLoader, DocumentOutcome, IngestError, LoadReport};
pub use normalize::{normalize_group, CANONICAL_GROUPS, GROUP_RULES, UNAFFILIATED};
pub use options::IngestOptions;
pub use session::{parse_session, Fingerprint, SessionContext};
pub use speech::{
    extract_text, find_speaker, parse_speaker, parse_speech, parse_speech_uncached, ParsedSpeaker,
    ParsedSpeech,
};
pub use tree::{Element, TreeError, XmlTree};
