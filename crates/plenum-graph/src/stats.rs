//! Corpus-wide aggregates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Corpus;

/// Speech and comment counts of one speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerActivity {
    pub key: String,
    pub name: String,
    pub group: String,
    pub speeches: usize,
    pub comments: usize,
}

/// Totals over a loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub speeches: usize,
    pub speakers: usize,
    pub sessions: usize,
    pub groups: usize,
    pub comments: usize,
    /// Sum of all speech body lengths in characters.
    pub speech_chars: usize,
    pub speakers_per_group: BTreeMap<String, usize>,
    pub speeches_per_group: BTreeMap<String, usize>,
    /// Most active speakers, by speech count (ties broken by key).
    pub top_speakers: Vec<SpeakerActivity>,
}

impl Corpus {
    /// Aggregate statistics; `top` limits the length of `top_speakers`.
    pub fn stats(&self, top: usize) -> CorpusStats {
        let mut speakers_per_group: BTreeMap<String, usize> = BTreeMap::new();
        for (id, _) in self.speaker_entries() {
            let group = self.group_name_of(id).unwrap_or_default().to_string();
            *speakers_per_group.entry(group).or_default() += 1;
        }

        let mut per_speaker = vec![(0usize, 0usize); self.speakers().len()];
        let mut speeches_per_group: BTreeMap<String, usize> = BTreeMap::new();
        let mut speech_chars = 0usize;
        for speech in self.speeches() {
            speech_chars += speech.text_len();
            if let Some(slot) = per_speaker.get_mut(speech.speaker.raw() as usize) {
                slot.0 += 1;
                slot.1 += speech.comments.len();
            }
            let group = self.group_name_of(speech.speaker).unwrap_or_default();
            *speeches_per_group.entry(group.to_string()).or_default() += 1;
        }

        let mut top_speakers: Vec<SpeakerActivity> = self
            .speaker_entries()
            .map(|(id, speaker)| {
                let (speeches, comments) = per_speaker[id.raw() as usize];
                SpeakerActivity {
                    key: speaker.key.clone(),
                    name: speaker.full_name(),
                    group: self.group_name_of(id).unwrap_or_default().to_string(),
                    speeches,
                    comments,
                }
            })
            .collect();
        top_speakers.sort_by(|a, b| b.speeches.cmp(&a.speeches).then_with(|| a.key.cmp(&b.key)));
        top_speakers.truncate(top);

        CorpusStats {
            speeches: self.speeches().len(),
            speakers: self.speakers().len(),
            sessions: self.sessions().len(),
            groups: self.groups().len(),
            comments: self.comments().len(),
            speech_chars,
            speakers_per_group,
            speeches_per_group,
            top_speakers,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Corpus, NewSpeaker, NewSpeech, Session};

    #[test]
    fn counts_per_group_and_speaker() {
        let mut corpus = Corpus::new();
        let spd = corpus.intern_group("SPD");
        let none = corpus.intern_group(crate::UNAFFILIATED);
        let session = corpus.push_session(Session {
            election_period: "19".to_string(),
            number: "3".to_string(),
            location: None,
            date: None,
            start_time: None,
            end_time: None,
        });

        let a = corpus
            .insert_speaker(NewSpeaker {
                key: "A".to_string(),
                title: None,
                first_name: "Ann".to_string(),
                last_name: "A".to_string(),
                group: spd,
            })
            .unwrap();
        let b = corpus
            .insert_speaker(NewSpeaker {
                key: "B".to_string(),
                title: None,
                first_name: "Bert".to_string(),
                last_name: "B".to_string(),
                group: none,
            })
            .unwrap();

        for (key, speaker, comments) in [("1", a, 2), ("2", a, 0), ("3", b, 1)] {
            corpus
                .push_speech(NewSpeech {
                    key: key.to_string(),
                    speaker,
                    session,
                    text: "äöü".to_string(),
                    comments: vec!["(Beifall)".to_string(); comments],
                })
                .unwrap();
        }

        let stats = corpus.stats(1);
        assert_eq!(stats.speeches, 3);
        assert_eq!(stats.comments, 3);
        assert_eq!(stats.speech_chars, 9);
        assert_eq!(stats.speakers_per_group.get("SPD"), Some(&1));
        assert_eq!(stats.speeches_per_group.get("SPD"), Some(&2));
        assert_eq!(stats.speeches_per_group.get(crate::UNAFFILIATED), Some(&1));
        assert_eq!(stats.top_speakers.len(), 1);
        assert_eq!(stats.top_speakers[0].key, "A");
        assert_eq!(stats.top_speakers[0].comments, 2);
    }
}
