//! Plenum CLI
//!
//! Loads a directory of plenary protocols and answers read-only questions
//! about the resulting corpus:
//! - corpus statistics
//! - speakers, groups and sessions
//! - speeches filtered by speaker, group or session
//!
//! Every command accepts `--json` for machine-readable output on stdout.
//! Diagnostics go to stderr (`PLENUM_LOG`, default `warn`).

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use plenum_graph::{Corpus, SpeakerId, SpeechId};
use plenum_ingest::{CorpusLoader, IngestOptions};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

mod render;

#[derive(Parser)]
#[command(name = "plenum")]
#[command(
    author,
    version,
    about = "Plenum: deduplicated corpus of Bundestag plenary protocols"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
struct CorpusArgs {
    /// Directory containing protocol XML files
    dir: PathBuf,
    /// Ingest options (JSON, see `IngestOptions`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SpeakerSort {
    /// Load order
    Key,
    /// Last name, then first name
    Name,
}

#[derive(Subcommand)]
enum Commands {
    /// Corpus totals and the most active speakers
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Number of speakers in the top list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// List speakers
    Speakers {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
        /// Only members of this group (case-insensitive)
        #[arg(long)]
        group: Option<String>,
        #[arg(long, value_enum, default_value_t = SpeakerSort::Key)]
        sort: SpeakerSort,
    },

    /// List speeches
    Speeches {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Speaker key
        #[arg(long)]
        speaker: Option<String>,
        /// Group name (case-insensitive)
        #[arg(long)]
        group: Option<String>,
        /// Session key, `<election period>_<number>`
        #[arg(long)]
        session: Option<String>,
    },

    /// Show one speech with its comments
    Speech {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Speech key
        key: String,
    },

    /// List groups with member and speech counts
    Groups {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// List sessions
    Sessions {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { corpus, top } => cmd_stats(&corpus, top),
        Commands::Speakers {
            corpus,
            search,
            group,
            sort,
        } => cmd_speakers(&corpus, search.as_deref(), group.as_deref(), sort),
        Commands::Speeches {
            corpus,
            speaker,
            group,
            session,
        } => cmd_speeches(
            &corpus,
            speaker.as_deref(),
            group.as_deref(),
            session.as_deref(),
        ),
        Commands::Speech { corpus, key } => cmd_speech(&corpus, &key),
        Commands::Groups { corpus } => cmd_groups(&corpus),
        Commands::Sessions { corpus } => cmd_sessions(&corpus),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PLENUM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// Loading and output
// ============================================================================

fn load(args: &CorpusArgs) -> Result<Corpus> {
    let options = match &args.config {
        Some(path) => IngestOptions::from_json_file(path)?,
        None => IngestOptions::default(),
    };

    let mut loader = CorpusLoader::new(options);
    let report = loader.load(&args.dir);
    tracing::debug!(?report, "load finished");

    if !args.json {
        eprintln!(
            "{} {} speeches from {} files ({} skipped, {} failed)",
            "Loaded".green().bold(),
            report.speeches_added,
            report.files_loaded,
            report.files_skipped,
            report.files_failed,
        );
    }
    Ok(loader.into_corpus())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_stats(args: &CorpusArgs, top: usize) -> Result<()> {
    let corpus = load(args)?;
    let stats = corpus.stats(top);
    if args.json {
        return print_json(&stats);
    }
    render::stats(&stats);
    Ok(())
}

fn select_speakers(
    corpus: &Corpus,
    search: Option<&str>,
    group: Option<&str>,
    sort: SpeakerSort,
) -> Vec<SpeakerId> {
    let mut ids = match sort {
        SpeakerSort::Key => corpus.speaker_entries().map(|(id, _)| id).collect(),
        SpeakerSort::Name => corpus.speakers_sorted_by_name(),
    };

    if let Some(term) = search {
        let matches: BTreeSet<SpeakerId> = corpus.search_speakers(term).into_iter().collect();
        ids.retain(|id| matches.contains(id));
    }
    if let Some(name) = group {
        match corpus.group_by_name(name) {
            Some(group) => ids.retain(|id| corpus.speaker(*id).is_some_and(|s| s.group == group)),
            None => ids.clear(),
        }
    }
    ids
}

fn cmd_speakers(
    args: &CorpusArgs,
    search: Option<&str>,
    group: Option<&str>,
    sort: SpeakerSort,
) -> Result<()> {
    let corpus = load(args)?;
    let views: Vec<_> = select_speakers(&corpus, search, group, sort)
        .into_iter()
        .filter_map(|id| corpus.speaker_view(id))
        .collect();
    if args.json {
        return print_json(&views);
    }
    render::speakers(&views);
    Ok(())
}

fn select_speeches(
    corpus: &Corpus,
    speaker: Option<&str>,
    group: Option<&str>,
    session: Option<&str>,
) -> Vec<SpeechId> {
    let mut ids: Vec<SpeechId> = match speaker {
        Some(key) => corpus
            .speaker_by_key(key)
            .map(|id| corpus.speeches_by_speaker(id))
            .unwrap_or_default(),
        None => corpus.speech_entries().map(|(id, _)| id).collect(),
    };

    if let Some(name) = group {
        let in_group: BTreeSet<SpeechId> = corpus.speeches_by_group(name).into_iter().collect();
        ids.retain(|id| in_group.contains(id));
    }
    if let Some(key) = session {
        let in_session: BTreeSet<SpeechId> =
            corpus.speeches_by_session_key(key).into_iter().collect();
        ids.retain(|id| in_session.contains(id));
    }
    ids
}

fn cmd_speeches(
    args: &CorpusArgs,
    speaker: Option<&str>,
    group: Option<&str>,
    session: Option<&str>,
) -> Result<()> {
    let corpus = load(args)?;
    let views: Vec<_> = select_speeches(&corpus, speaker, group, session)
        .into_iter()
        .filter_map(|id| corpus.speech_view(id))
        .collect();
    if args.json {
        return print_json(&views);
    }
    render::speeches(&views);
    Ok(())
}

fn cmd_speech(args: &CorpusArgs, key: &str) -> Result<()> {
    let corpus = load(args)?;
    let view = corpus
        .speech_by_key(key)
        .and_then(|id| corpus.speech_view(id))
        .ok_or_else(|| anyhow!("no speech with key `{key}`"))?;
    if args.json {
        return print_json(&view);
    }
    render::speech(&view);
    Ok(())
}

fn cmd_groups(args: &CorpusArgs) -> Result<()> {
    let corpus = load(args)?;
    let views: Vec<_> = corpus
        .group_entries()
        .filter_map(|(id, _)| corpus.group_view(id))
        .collect();
    if args.json {
        return print_json(&views);
    }
    render::groups(&views);
    Ok(())
}

fn cmd_sessions(args: &CorpusArgs) -> Result<()> {
    let corpus = load(args)?;
    let views: Vec<_> = corpus
        .session_entries()
        .filter_map(|(id, _)| corpus.session_view(id))
        .collect();
    if args.json {
        return print_json(&views);
    }
    render::sessions(&views);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plenum_graph::{NewSpeaker, NewSpeech, Session};

    fn corpus() -> Corpus {
        let mut corpus = Corpus::new();
        let spd = corpus.intern_group("SPD");
        let fdp = corpus.intern_group("FDP");
        let mut speakers = Vec::new();
        for (key, first, last, group) in [
            ("1", "Zoe", "Adler", spd),
            ("2", "Ben", "Zander", fdp),
            ("3", "Ada", "Adler", spd),
        ] {
            speakers.push(
                corpus
                    .insert_speaker(NewSpeaker {
                        key: key.to_string(),
                        title: None,
                        first_name: first.to_string(),
                        last_name: last.to_string(),
                        group,
                    })
                    .unwrap(),
            );
        }
        for number in ["1", "2"] {
            let session = corpus.push_session(Session {
                election_period: "20".to_string(),
                number: number.to_string(),
                location: None,
                date: None,
                start_time: None,
                end_time: None,
            });
            for speaker in &speakers {
                corpus
                    .push_speech(NewSpeech {
                        key: format!("R{number}-{}", speaker.raw()),
                        speaker: *speaker,
                        session,
                        text: String::new(),
                        comments: Vec::new(),
                    })
                    .unwrap();
            }
        }
        corpus
    }

    fn keys(corpus: &Corpus, ids: &[SpeakerId]) -> Vec<String> {
        ids.iter()
            .map(|id| corpus.speaker(*id).unwrap().key.clone())
            .collect()
    }

    #[test]
    fn speaker_filters_combine() {
        let corpus = corpus();
        let sorted = select_speakers(&corpus, None, None, SpeakerSort::Name);
        assert_eq!(keys(&corpus, &sorted), vec!["3", "1", "2"]);

        let adler_spd = select_speakers(&corpus, Some("adler"), Some("spd"), SpeakerSort::Key);
        assert_eq!(keys(&corpus, &adler_spd), vec!["1", "3"]);

        assert!(select_speakers(&corpus, None, Some("CDU/CSU"), SpeakerSort::Key).is_empty());
    }

    #[test]
    fn speech_filters_intersect() {
        let corpus = corpus();
        assert_eq!(select_speeches(&corpus, None, None, None).len(), 6);
        assert_eq!(select_speeches(&corpus, Some("1"), None, None).len(), 2);
        assert_eq!(select_speeches(&corpus, None, Some("spd"), Some("20_2")).len(), 2);
        assert_eq!(select_speeches(&corpus, Some("2"), Some("SPD"), None).len(), 0);
        assert!(select_speeches(&corpus, Some("missing"), None, None).is_empty());
    }

    #[test]
    fn cli_parses_shared_flags() {
        let cli = Cli::try_parse_from([
            "plenum", "speakers", "data", "--json", "--search", "adler", "--sort", "name",
        ])
        .unwrap();
        match cli.command {
            Commands::Speakers {
                corpus,
                search,
                sort,
                ..
            } => {
                assert!(corpus.json);
                assert_eq!(corpus.dir, PathBuf::from("data"));
                assert_eq!(search.as_deref(), Some("adler"));
                assert_eq!(sort, SpeakerSort::Name);
            }
            _ => panic!("expected speakers command"),
        }
    }
}
