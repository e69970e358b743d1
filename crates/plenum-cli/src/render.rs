//! Human-readable terminal output.

use colored::Colorize;
use plenum_graph::{CorpusStats, GroupView, SessionView, SpeakerView, SpeechView};

const PREVIEW_CHARS: usize = 80;

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn stats(stats: &CorpusStats) {
    println!("{}", "Corpus".bold());
    println!("  speeches   {}", stats.speeches);
    println!("  speakers   {}", stats.speakers);
    println!("  groups     {}", stats.groups);
    println!("  sessions   {}", stats.sessions);
    println!("  comments   {}", stats.comments);
    println!("  characters {}", stats.speech_chars);

    if !stats.speakers_per_group.is_empty() {
        println!("{}", "Groups".bold());
        for (group, speakers) in &stats.speakers_per_group {
            let speeches = stats.speeches_per_group.get(group).copied().unwrap_or(0);
            println!("  {group:<24} {speakers:>5} speakers {speeches:>6} speeches");
        }
    }

    if !stats.top_speakers.is_empty() {
        println!("{}", "Most active speakers".bold());
        for activity in &stats.top_speakers {
            println!(
                "  {:>5}  {} {} ({} comments)",
                activity.speeches,
                activity.name,
                format!("[{}]", activity.group).dimmed(),
                activity.comments,
            );
        }
    }
}

pub fn speakers(views: &[SpeakerView]) {
    for view in views {
        println!(
            "{:>10}  {} {}  {} speeches",
            view.key.cyan(),
            view.full_name,
            format!("[{}]", view.group).dimmed(),
            view.speeches,
        );
    }
    if views.is_empty() {
        println!("{}", "no matching speakers".yellow());
    }
}

pub fn speeches(views: &[SpeechView]) {
    for view in views {
        println!(
            "{}  {}  {} {}  {} chars, {} comments",
            view.key.cyan(),
            view.session.key,
            view.speaker.name,
            format!("[{}]", view.speaker.group).dimmed(),
            view.text_len,
            view.comments.len(),
        );
    }
    if views.is_empty() {
        println!("{}", "no matching speeches".yellow());
    }
}

pub fn speech(view: &SpeechView) {
    println!(
        "{} {} {}",
        view.key.cyan().bold(),
        view.speaker.name.bold(),
        format!("[{}]", view.speaker.group).dimmed(),
    );
    println!(
        "session {} ({}, {})",
        view.session.key,
        or_dash(view.session.date),
        or_dash(view.session.location.as_deref()),
    );
    println!();
    println!("{}", view.text);

    if !view.comments.is_empty() {
        println!();
        println!("{}", "Comments".bold());
        for comment in &view.comments {
            println!("  {} {}", "→".yellow(), preview(&comment.text));
        }
    }
}

pub fn groups(views: &[GroupView]) {
    for view in views {
        println!(
            "{:<24} {:>5} speakers {:>6} speeches",
            view.name.bold(),
            view.speakers,
            view.speeches,
        );
    }
}

pub fn sessions(views: &[SessionView]) {
    for view in views {
        println!(
            "{:<8} {}  {}-{}  {}",
            view.key.cyan(),
            or_dash(view.date),
            or_dash(view.start_time.map(|t| t.format("%H:%M"))),
            or_dash(view.end_time.map(|t| t.format("%H:%M"))),
            or_dash(view.location.as_deref()),
        );
    }
}
