//! Plenum corpus graph
//!
//! Append-only arena holding everything ingested from plenary protocols:
//!
//! - **Speakers**, deduplicated by their source key (first record wins)
//! - **Groups** (parliamentary factions), deduplicated by canonical name
//! - **Sessions**, one per ingested document
//! - **Speeches**, each pointing at exactly one speaker and one session
//! - **Comments**, attached to a speech in document order
//!
//! Entities refer to each other through compact typed ids instead of shared
//! pointers. Ids are only minted by the [`Corpus`] that owns the entity, and the
//! append operations reject ids that do not resolve, so a loaded corpus never
//! contains dangling references.
//!
//! The graph is write-once: after ingestion it is only read through the query
//! surface in [`query`], the aggregates in [`stats`] and the serialisable views
//! in [`view`].

pub mod model;
pub mod query;
pub mod stats;
pub mod view;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

pub use model::{Comment, Group, NewSpeaker, NewSpeech, Session, Speaker, Speech};
pub use stats::{CorpusStats, SpeakerActivity};
pub use view::{CommentView, GroupView, SessionView, SpeakerRef, SpeakerView, SpeechView};

/// Canonical name of the sentinel group for speakers without a faction.
pub const UNAFFILIATED: &str = "Fraktionslos";

// ============================================================================
// Typed ids
// ============================================================================

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn raw(self) -> u32 {
                self.0
            }

            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a [`Speaker`] inside its corpus.
    SpeakerId
);
arena_id!(
    /// Index of a [`Group`] inside its corpus.
    GroupId
);
arena_id!(
    /// Index of a [`Session`] inside its corpus.
    SessionId
);
arena_id!(
    /// Index of a [`Speech`] inside its corpus.
    SpeechId
);
arena_id!(
    /// Index of a [`Comment`] inside its corpus.
    CommentId
);

// ============================================================================
// Errors
// ============================================================================

/// Rejected append operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown group id {0:?}")]
    UnknownGroup(GroupId),
    #[error("unknown speaker id {0:?}")]
    UnknownSpeaker(SpeakerId),
    #[error("unknown session id {0:?}")]
    UnknownSession(SessionId),
}

// ============================================================================
// Corpus arena
// ============================================================================

/// The ingested object graph.
#[derive(Debug, Default)]
pub struct Corpus {
    speakers: Vec<Speaker>,
    groups: Vec<Group>,
    sessions: Vec<Session>,
    speeches: Vec<Speech>,
    comments: Vec<Comment>,
    /// Speaker key -> canonical speaker
    speaker_index: AHashMap<String, SpeakerId>,
    /// Canonical group name -> group
    group_index: AHashMap<String, GroupId>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been ingested yet.
    pub fn is_empty(&self) -> bool {
        self.speeches.is_empty()
            && self.speakers.is_empty()
            && self.sessions.is_empty()
            && self.groups.is_empty()
    }

    // ------------------------------------------------------------------------
    // Append operations
    // ------------------------------------------------------------------------

    /// Register a group by canonical name, returning the existing id if the
    /// name is already known.
    pub fn intern_group(&mut self, name: &str) -> GroupId {
        if let Some(id) = self.group_index.get(name) {
            return *id;
        }

        let id = GroupId::from_index(self.groups.len());
        self.groups.push(Group {
            name: name.to_string(),
        });
        self.group_index.insert(name.to_string(), id);
        id
    }

    /// Look up the canonical speaker registered for `key`.
    pub fn speaker_id(&self, key: &str) -> Option<SpeakerId> {
        self.speaker_index.get(key).copied()
    }

    /// Register a speaker. When a speaker with the same key already exists the
    /// new record is discarded and the existing id is returned.
    pub fn insert_speaker(&mut self, speaker: NewSpeaker) -> Result<SpeakerId, GraphError> {
        if let Some(id) = self.speaker_index.get(&speaker.key) {
            return Ok(*id);
        }
        if self.groups.get(speaker.group.index()).is_none() {
            return Err(GraphError::UnknownGroup(speaker.group));
        }

        let id = SpeakerId::from_index(self.speakers.len());
        self.speaker_index.insert(speaker.key.clone(), id);
        self.speakers.push(Speaker {
            key: speaker.key,
            title: speaker.title,
            first_name: speaker.first_name,
            last_name: speaker.last_name,
            group: speaker.group,
        });
        Ok(id)
    }

    /// Append a session. Sessions are not deduplicated.
    pub fn push_session(&mut self, session: Session) -> SessionId {
        let id = SessionId::from_index(self.sessions.len());
        self.sessions.push(session);
        id
    }

    /// Append a speech together with all of its comments.
    ///
    /// Every comment is attributed to the speech's speaker and snapshots that
    /// speaker's group. The comment list is complete once this returns.
    pub fn push_speech(&mut self, speech: NewSpeech) -> Result<SpeechId, GraphError> {
        let group = self
            .speakers
            .get(speech.speaker.index())
            .map(|s| s.group)
            .ok_or(GraphError::UnknownSpeaker(speech.speaker))?;
        if self.sessions.get(speech.session.index()).is_none() {
            return Err(GraphError::UnknownSession(speech.session));
        }

        let speech_id = SpeechId::from_index(self.speeches.len());
        let mut comment_ids = Vec::with_capacity(speech.comments.len());
        for text in speech.comments {
            let comment_id = CommentId::from_index(self.comments.len());
            self.comments.push(Comment {
                text,
                speaker: speech.speaker,
                speech: speech_id,
                group,
            });
            comment_ids.push(comment_id);
        }

        self.speeches.push(Speech {
            key: speech.key,
            speaker: speech.speaker,
            session: speech.session,
            text: speech.text,
            comments: comment_ids,
        });
        Ok(speech_id)
    }

    // ------------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------------

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn speeches(&self) -> &[Speech] {
        &self.speeches
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn speaker_entries(&self) -> impl Iterator<Item = (SpeakerId, &Speaker)> + '_ {
        self.speakers
            .iter()
            .enumerate()
            .map(|(i, s)| (SpeakerId::from_index(i), s))
    }

    pub fn group_entries(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId::from_index(i), g))
    }

    pub fn session_entries(&self) -> impl Iterator<Item = (SessionId, &Session)> + '_ {
        self.sessions
            .iter()
            .enumerate()
            .map(|(i, s)| (SessionId::from_index(i), s))
    }

    pub fn speech_entries(&self) -> impl Iterator<Item = (SpeechId, &Speech)> + '_ {
        self.speeches
            .iter()
            .enumerate()
            .map(|(i, s)| (SpeechId::from_index(i), s))
    }

    // ------------------------------------------------------------------------
    // Lookup by id
    // ------------------------------------------------------------------------

    pub fn speaker(&self, id: SpeakerId) -> Option<&Speaker> {
        self.speakers.get(id.index())
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(id.index())
    }

    pub fn speech(&self, id: SpeechId) -> Option<&Speech> {
        self.speeches.get(id.index())
    }

    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(id.index())
    }

    /// Name of the group a speaker belongs to.
    pub fn group_name_of(&self, speaker: SpeakerId) -> Option<&str> {
        self.speaker(speaker)
            .and_then(|s| self.group(s.group))
            .map(|g| g.name.as_str())
    }
}
