//! Text rendering for terminal output.

use colored::{ColoredString, Colorize};
use popt_sdk::{short_id, Entry, Score, ScoreBand, Segment, Snapshot, Template, WordDiff};

/// Score colored by band, or a dimmed placeholder when unscored.
pub fn score(score: Option<Score>) -> ColoredString {
    let text = Score::describe(score);
    match score.map(Score::band) {
        Some(ScoreBand::Good) => text.green().bold(),
        Some(ScoreBand::Fair) => text.yellow().bold(),
        Some(ScoreBand::Poor) => text.red().bold(),
        None => text.dimmed(),
    }
}

/// First line of `text`, cut to `max` characters with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    let mut out: String = line.chars().take(max).collect();
    if line.chars().count() > max || text.trim().lines().count() > 1 {
        out.push('…');
    }
    out
}

/// Human label for a position in an entry's version chain.
pub fn version_label(index: usize, current: usize) -> String {
    if index == current {
        "current".to_string()
    } else {
        format!("v{}", index + 1)
    }
}

pub fn entry_line(entry: &Entry) -> String {
    let mut line = format!(
        "{}  {}  {}",
        short_id(&entry.id).yellow(),
        score(entry.score),
        truncate(&entry.original, 60),
    );
    if !entry.versions.is_empty() {
        line.push_str(&format!("  {}", format!("({} versions)", entry.versions.len() + 1).dimmed()));
    }
    if !entry.tags.is_empty() {
        line.push_str(&format!("  {}", entry.tags.join(", ").cyan()));
    }
    line
}

pub fn entry_detail(entry: &Entry, states: &[Snapshot<'_>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "Entry".bold(), entry.id.yellow()));
    out.push_str(&format!("  Created: {}\n", entry.created_at));
    if let Some(updated) = &entry.updated_at {
        out.push_str(&format!("  Updated: {updated}\n"));
    }
    if !entry.tags.is_empty() {
        out.push_str(&format!("  Tags: {}\n", entry.tags.join(", ").cyan()));
    }
    if !entry.templates_used.is_empty() {
        out.push_str(&format!("  Templates: {}\n", entry.templates_used.join(", ")));
    }
    out.push_str(&format!("\n{}\n{}\n", "Original".bold(), entry.original));
    out.push_str(&format!("\n{}  {}\n{}\n", "Optimized".bold(), score(entry.score), entry.optimized));
    if !entry.explanation.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", "Why".bold(), entry.explanation));
    }
    if !entry.related.is_empty() {
        out.push_str(&format!("\n{}\n", "Related".bold()));
        for r in &entry.related {
            out.push_str(&format!("  - {r}\n"));
        }
    }
    if states.len() > 1 {
        let current = entry.versions.len();
        out.push_str(&format!("\n{}\n", "Versions".bold()));
        for s in states {
            out.push_str(&format!(
                "  {:>8}  {}  {}  {}\n",
                version_label(s.index, current),
                s.created_at.as_str().dimmed(),
                score(s.score),
                truncate(s.optimized, 50),
            ));
        }
    }
    out
}

pub fn template_line(template: &Template) -> String {
    format!(
        "{}  {}  {}",
        template.id.yellow(),
        template.name.bold(),
        truncate(&template.content, 50).dimmed(),
    )
}

/// Inline word diff: removals struck through in red, additions in green.
pub fn diff(diff: &WordDiff) -> String {
    diff.segments
        .iter()
        .map(|s| match s {
            Segment::Equal(t) => t.normal().to_string(),
            Segment::Removed(t) => t.red().strikethrough().to_string(),
            Segment::Added(t) => t.green().underline().to_string(),
        })
        .collect()
}
