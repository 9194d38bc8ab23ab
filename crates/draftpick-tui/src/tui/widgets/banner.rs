// Tier banner: calls out positions whose top tier is nearly gone.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use draftpick_core::valuation::scarcity::TierStatus;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let low = state.snapshot.low_tiers(state.low_tier_warning);

    let (line, border) = if low.is_empty() {
        (
            Line::from(Span::styled(
                "Top tiers healthy",
                Style::default().fg(Color::Green),
            )),
            Style::default(),
        )
    } else {
        let mut spans = vec![Span::styled(
            "Running low: ",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::styled(
            warning_text(&low),
            Style::default().fg(Color::Yellow),
        ));
        (Line::from(spans), Style::default().fg(Color::Red))
    };

    let paragraph = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(paragraph, area);
}

/// "RB 2/25, TE gone" for the given tiers.
pub fn warning_text(low: &[&TierStatus]) -> String {
    low.iter()
        .map(|t| {
            if t.depleted {
                format!("{} gone", t.position)
            } else {
                format!("{} {}/{}", t.position, t.remaining, t.total)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
