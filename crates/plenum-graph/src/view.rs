//! Serialisable views that resolve ids into names.
//!
//! These are what presentation layers (CLI, HTTP, templates) render; the arena
//! types themselves only carry ids.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::{CommentId, Corpus, GroupId, SessionId, SpeakerId, SpeechId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerRef {
    pub key: String,
    pub name: String,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerView {
    pub key: String,
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub group: String,
    pub speeches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub name: String,
    pub speakers: usize,
    pub speeches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub key: String,
    pub election_period: String,
    pub number: String,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub text: String,
    pub text_len: usize,
    pub speech: String,
    pub speaker: String,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechView {
    pub key: String,
    pub speaker: SpeakerRef,
    pub session: SessionView,
    pub text: String,
    pub text_len: usize,
    pub comments: Vec<CommentView>,
}

impl Corpus {
    pub fn speaker_ref(&self, id: SpeakerId) -> Option<SpeakerRef> {
        let speaker = self.speaker(id)?;
        Some(SpeakerRef {
            key: speaker.key.clone(),
            name: speaker.name(),
            group: self.group_name_of(id).unwrap_or_default().to_string(),
        })
    }

    pub fn speaker_view(&self, id: SpeakerId) -> Option<SpeakerView> {
        let speaker = self.speaker(id)?;
        Some(SpeakerView {
            key: speaker.key.clone(),
            title: speaker.title.clone(),
            first_name: speaker.first_name.clone(),
            last_name: speaker.last_name.clone(),
            full_name: speaker.full_name(),
            group: self.group_name_of(id).unwrap_or_default().to_string(),
            speeches: self.speeches().iter().filter(|s| s.speaker == id).count(),
        })
    }

    pub fn group_view(&self, id: GroupId) -> Option<GroupView> {
        let group = self.group(id)?;
        let speakers = self.speakers_in_group(id);
        let speeches = self
            .speeches()
            .iter()
            .filter(|s| speakers.contains(&s.speaker))
            .count();
        Some(GroupView {
            name: group.name.clone(),
            speakers: speakers.len(),
            speeches,
        })
    }

    pub fn session_view(&self, id: SessionId) -> Option<SessionView> {
        let session = self.session(id)?;
        Some(SessionView {
            key: session.key(),
            election_period: session.election_period.clone(),
            number: session.number.clone(),
            location: session.location.clone(),
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
        })
    }

    pub fn comment_view(&self, id: CommentId) -> Option<CommentView> {
        let comment = self.comment(id)?;
        Some(CommentView {
            text: comment.text.clone(),
            text_len: comment.text.chars().count(),
            speech: self.speech(comment.speech)?.key.clone(),
            speaker: self.speaker(comment.speaker)?.key.clone(),
            group: self.group(comment.group)?.name.clone(),
        })
    }

    pub fn speech_view(&self, id: SpeechId) -> Option<SpeechView> {
        let speech = self.speech(id)?;
        Some(SpeechView {
            key: speech.key.clone(),
            speaker: self.speaker_ref(speech.speaker)?,
            session: self.session_view(speech.session)?,
            text: speech.text.clone(),
            text_len: speech.text_len(),
            comments: speech
                .comments
                .iter()
                .filter_map(|c| self.comment_view(*c))
                .collect(),
        })
    }
}
