// Line-oriented draft prompt.
//
// Each round prints the ranked table and tier summary, reads one line, and
// either finishes (exit token or end of input) or submits it as a draft
// query. Works over any async line source so it can be driven from tests.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use draftpick_core::draft::{DraftOutcome, SessionHandle};
use draftpick_core::protocol::DraftSnapshot;
use draftpick_core::valuation::scarcity::TierStatus;

/// Inputs that end the draft, compared case-insensitively.
pub const EXIT_TOKENS: &[&str] = &["exit", "done", "quit"];

pub fn is_exit_token(input: &str) -> bool {
    let trimmed = input.trim();
    EXIT_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(trimmed))
}

/// Options for the text loop.
#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    pub top_n: usize,
    pub low_tier_warning: usize,
}

/// Run the prompt until an exit token or end of input.
pub async fn run<R, W>(
    handle: &SessionHandle,
    input: R,
    out: &mut W,
    options: TextOptions,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(out, "--- Fantasy Draft Picker ---")?;
    writeln!(
        out,
        "Scarcity is calculated from the top tiers of each tracked position."
    )?;

    loop {
        let snapshot = handle.snapshot();
        write!(out, "{}", render_round(&snapshot, options))?;
        write!(
            out,
            "\nEnter the player you want to draft (or type 'exit'): "
        )?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            info!("Input closed; ending draft");
            break;
        };
        if is_exit_token(&line) {
            break;
        }

        let outcome = handle.draft(&line).await;
        writeln!(out, "{}", format_outcome(&outcome))?;
    }

    writeln!(out, "\nDraft finished!")?;
    out.flush()?;
    Ok(())
}

/// Ranking table, tier summary, and any low-tier warnings for one round.
pub fn render_round(snapshot: &DraftSnapshot, options: TextOptions) -> String {
    let mut text = String::new();
    text.push('\n');
    text.push_str(&render_ranking(snapshot, options.top_n));
    text.push('\n');
    text.push_str(&render_tier_summary(&snapshot.tiers));
    for tier in snapshot.low_tiers(options.low_tier_warning) {
        text.push_str(&format!(
            "!!! {} top tier nearly gone: {} of {} left\n",
            tier.position, tier.remaining, tier.total
        ));
    }
    text
}

/// The top `top_n` available players: name, position label, adjusted score.
pub fn render_ranking(snapshot: &DraftSnapshot, top_n: usize) -> String {
    let rows = &snapshot.ranking[..top_n.min(snapshot.ranking.len())];
    let mut text = format!(
        "--- Top {} Available Players (Adjusted for Scarcity) ---\n",
        top_n
    );
    if rows.is_empty() {
        text.push_str("No players left.\n");
        return text;
    }

    let name_width = rows
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());

    text.push_str(&format!(
        "{:>3}  {:<name_width$}  {:<5}  {:>13}\n",
        "#", "Player", "POS", "AdjValueScore"
    ));
    for (i, p) in rows.iter().enumerate() {
        text.push_str(&format!(
            "{:>3}  {:<name_width$}  {:<5}  {:>13.3}\n",
            i + 1,
            p.name,
            p.position_label,
            p.adjusted_value_score
        ));
    }
    text
}

/// One "POS: remaining/total" line per tracked position.
pub fn render_tier_summary(tiers: &[TierStatus]) -> String {
    let mut text = String::from("--- Remaining Players in Top Tier ---\n");
    for tier in tiers {
        text.push_str(&format!(
            "{}: {}/{}\n",
            tier.position, tier.remaining, tier.total
        ));
    }
    text
}

pub fn format_outcome(outcome: &DraftOutcome) -> String {
    match outcome {
        DraftOutcome::Drafted { .. } => format!("\n>>> {outcome} <<<"),
        _ => format!("--- {outcome} ---"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_handle;

    const OPTIONS: TextOptions = TextOptions {
        top_n: 15,
        low_tier_warning: 3,
    };

    async fn run_with_input(input: &str) -> (SessionHandle, String) {
        let handle = sample_handle();
        let mut out = Vec::new();
        run(&handle, input.as_bytes(), &mut out, OPTIONS)
            .await
            .unwrap();
        (handle, String::from_utf8(out).unwrap())
    }

    #[test]
    fn exit_tokens_are_case_insensitive() {
        assert!(is_exit_token("exit"));
        assert!(is_exit_token("DONE"));
        assert!(is_exit_token("  Quit \n"));
        assert!(!is_exit_token("exiting"));
        assert!(!is_exit_token(""));
    }

    #[tokio::test]
    async fn exit_ends_immediately() {
        let (handle, out) = run_with_input("exit\n").await;
        assert!(out.contains("--- Top 15 Available Players"));
        assert!(out.contains("--- Remaining Players in Top Tier ---"));
        assert!(out.trim_end().ends_with("Draft finished!"));
        assert_eq!(handle.snapshot().pick_count, 0);
    }

    #[tokio::test]
    async fn end_of_input_finishes_draft() {
        let (_, out) = run_with_input("").await;
        assert!(out.contains("Draft finished!"));
    }

    #[tokio::test]
    async fn drafts_and_reports_outcomes() {
        let (handle, out) =
            run_with_input("Bijan\nnobody at all\nSmith\nbijan robinson\nquit\n").await;

        assert!(out.contains(">>> Bijan Robinson has been drafted. <<<"));
        assert!(out.contains("--- Player 'nobody at all' not found. Please try again. ---"));
        assert!(out.contains("Please be more specific. ---"));
        assert!(out.contains("--- Bijan Robinson has already been drafted. ---"));
        assert_eq!(handle.snapshot().pick_count, 1);
    }

    #[tokio::test]
    async fn summary_reflects_picks() {
        let (_, out) = run_with_input("Bijan\ndone\n").await;
        // Before and after the pick
        assert!(out.contains("RB: 3/3"));
        assert!(out.contains("RB: 2/3"));
        assert!(out.contains("!!! RB top tier nearly gone: 2 of 3 left"));
    }

    #[test]
    fn ranking_table_lists_top_n() {
        let handle = sample_handle();
        let snapshot = handle.snapshot();
        let table = render_ranking(&snapshot, 2);
        let lines: Vec<&str> = table.lines().collect();
        // Title, header, two rows
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Player"));
        assert!(lines[1].contains("POS"));
        assert!(lines[2].contains(&snapshot.ranking[0].name));
        assert!(lines[3].contains(&snapshot.ranking[1].name));
    }

    #[test]
    fn ranking_table_handles_empty_pool() {
        let table = render_ranking(&DraftSnapshot::default(), 15);
        assert!(table.contains("No players left."));
    }

    #[test]
    fn tier_summary_format() {
        let handle = sample_handle();
        let summary = render_tier_summary(&handle.snapshot().tiers);
        assert!(summary.contains("QB: 2/2"));
        assert!(summary.contains("RB: 3/3"));
        assert!(summary.contains("WR: 3/3"));
    }
}
