//! Entities stored in the corpus arena.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{CommentId, GroupId, SessionId, SpeakerId, SpeechId};

/// A parliamentary group (faction), identified by its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
}

/// A member of parliament (or government) who gave at least one speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Source identifier, unique across the corpus.
    pub key: String,
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub group: GroupId,
}

impl Speaker {
    /// Display name including an academic title when present.
    pub fn full_name(&self) -> String {
        let name = self.name();
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => format!("{title} {name}"),
            _ => name,
        }
    }

    /// First and last name.
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One sitting of the parliament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub election_period: String,
    pub number: String,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl Session {
    /// `"<election period>_<number>"`, the key used to filter speeches by session.
    pub fn key(&self) -> String {
        format!("{}_{}", self.election_period, self.number)
    }
}

/// One recorded contribution by one speaker within one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speech {
    pub key: String,
    pub speaker: SpeakerId,
    pub session: SessionId,
    pub text: String,
    /// Document order.
    pub comments: Vec<CommentId>,
}

impl Speech {
    /// Length of the speech body in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// An audience reaction recorded within or right after a speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// The speaker of the speech the comment belongs to.
    pub speaker: SpeakerId,
    pub speech: SpeechId,
    /// Group of `speaker` at the time the comment was recorded.
    pub group: GroupId,
}

/// Input for [`crate::Corpus::insert_speaker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpeaker {
    pub key: String,
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub group: GroupId,
}

/// Input for [`crate::Corpus::push_speech`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpeech {
    pub key: String,
    pub speaker: SpeakerId,
    pub session: SessionId,
    pub text: String,
    /// Comment texts in document order.
    pub comments: Vec<String>,
}
