use anyhow::{Context, Result};
use std::fmt::Write as _;

use crate::persistence::{ScoreEntry, ScoreStore};

/// Print the stored high score and local top scores
pub fn print_scores(store: &dyn ScoreStore) -> Result<()> {
    let high_score = store
        .load_high_score()
        .context("Failed to load high score")?;
    let scores = store
        .load_top_scores()
        .context("Failed to load top scores")?;
    print!("{}", format_scores(high_score, &scores));
    Ok(())
}

pub fn format_scores(high_score: u32, scores: &[ScoreEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "High Score: {}", high_score);
    let _ = writeln!(out, "{}", "=".repeat(50));

    if scores.is_empty() {
        let _ = writeln!(out, "No submitted scores yet.");
        return out;
    }

    for (rank, entry) in scores.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<20} {:>6}  {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.date.format("%Y-%m-%d %H:%M")
        );
    }
    out
}
