//! Linear read-only predicates over a loaded corpus.
//!
//! Consumers do their own sorting and pagination; these helpers only select.

use crate::{CommentId, Corpus, GroupId, SpeakerId, SpeechId};

impl Corpus {
    pub fn speaker_by_key(&self, key: &str) -> Option<SpeakerId> {
        self.speaker_id(key)
    }

    /// First speech with the given source key.
    pub fn speech_by_key(&self, key: &str) -> Option<SpeechId> {
        self.speech_entries()
            .find(|(_, speech)| speech.key == key)
            .map(|(id, _)| id)
    }

    /// Case-insensitive group lookup.
    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        let needle = name.trim().to_lowercase();
        self.group_entries()
            .find(|(_, group)| group.name.to_lowercase() == needle)
            .map(|(id, _)| id)
    }

    /// Speakers whose first, last or full name contains `term` (case-insensitive).
    /// An empty term matches every speaker.
    pub fn search_speakers(&self, term: &str) -> Vec<SpeakerId> {
        let needle = term.trim().to_lowercase();
        self.speaker_entries()
            .filter(|(_, speaker)| {
                needle.is_empty()
                    || speaker.first_name.to_lowercase().contains(&needle)
                    || speaker.last_name.to_lowercase().contains(&needle)
                    || speaker.name().to_lowercase().contains(&needle)
            })
            .map(|(id, _)| id)
            .collect()
    }

    pub fn speakers_in_group(&self, group: GroupId) -> Vec<SpeakerId> {
        self.speaker_entries()
            .filter(|(_, speaker)| speaker.group == group)
            .map(|(id, _)| id)
            .collect()
    }

    /// Speaker ids ordered by last name, then first name.
    pub fn speakers_sorted_by_name(&self) -> Vec<SpeakerId> {
        let mut ids: Vec<SpeakerId> = self.speaker_entries().map(|(id, _)| id).collect();
        ids.sort_by_cached_key(|id| {
            self.speaker(*id)
                .map(|s| (s.last_name.clone(), s.first_name.clone()))
                .unwrap_or_default()
        });
        ids
    }

    pub fn speeches_by_speaker(&self, speaker: SpeakerId) -> Vec<SpeechId> {
        self.speech_entries()
            .filter(|(_, speech)| speech.speaker == speaker)
            .map(|(id, _)| id)
            .collect()
    }

    /// Speeches given by members of the named group (case-insensitive).
    pub fn speeches_by_group(&self, name: &str) -> Vec<SpeechId> {
        let Some(group) = self.group_by_name(name) else {
            return Vec::new();
        };
        self.speech_entries()
            .filter(|(_, speech)| {
                self.speaker(speech.speaker)
                    .is_some_and(|speaker| speaker.group == group)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Speeches of every session whose `"<period>_<number>"` key equals `key`.
    pub fn speeches_by_session_key(&self, key: &str) -> Vec<SpeechId> {
        self.speech_entries()
            .filter(|(_, speech)| {
                self.session(speech.session)
                    .is_some_and(|session| session.key() == key)
            })
            .map(|(id, _)| id)
            .collect()
    }

    pub fn comments_for_speech(&self, speech: SpeechId) -> &[CommentId] {
        self.speech(speech)
            .map(|s| s.comments.as_slice())
            .unwrap_or(&[])
    }
}
