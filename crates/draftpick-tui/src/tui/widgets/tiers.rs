// Top-tier widget: remaining/total per tracked position.
//
// One row per position with a text bar, the remaining count, and the
// current scarcity multiplier. Color tracks how much of the tier is left.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use draftpick_core::valuation::scarcity::TierStatus;

use crate::tui::ViewState;

const BAR_WIDTH: usize = 10;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Top Tiers");

    if state.snapshot.tiers.is_empty() {
        let paragraph = Paragraph::new("  No tracked positions.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .snapshot
        .tiers
        .iter()
        .map(|tier| format_tier(tier, state.low_tier_warning))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn format_tier<'a>(tier: &TierStatus, low_threshold: usize) -> ListItem<'a> {
    let color = tier_color(tier, low_threshold);
    let multiplier_style = if tier.depleted {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    };

    let spans = vec![
        Span::styled(
            format!("{:>3} ", tier.position.display_str()),
            Style::default().fg(Color::White),
        ),
        Span::styled(tier_bar(tier), Style::default().fg(color)),
        Span::raw(format!(" {:>2}/{:<2}", tier.remaining, tier.total)),
        Span::styled(format!(" x{:.2}", tier.multiplier), multiplier_style),
    ];
    ListItem::new(Line::from(spans))
}

/// Red once depleted or at/below the warning threshold, yellow under half,
/// green otherwise.
pub fn tier_color(tier: &TierStatus, low_threshold: usize) -> Color {
    if tier.depleted || tier.is_low(low_threshold) {
        Color::Red
    } else if tier.remaining_ratio() < 0.5 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// `[######----]`, filled in proportion to the remaining share.
pub fn tier_bar(tier: &TierStatus) -> String {
    let filled = (tier.remaining_ratio() * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
