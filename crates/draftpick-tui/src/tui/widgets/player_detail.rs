// Player detail widget: season line, weekly analytics, and photo link for
// the selected player.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use draftpick_core::catalog::PlayerRecord;
use draftpick_core::valuation::analytics::PlayerAnalytics;
use draftpick_core::valuation::scarcity::RankedPlayer;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Player");

    let Some(ranked) = state.selected_player() else {
        let paragraph = Paragraph::new("  No player selected.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };
    let Some(record) = state.catalog.get(ranked.id) else {
        frame.render_widget(block, area);
        return;
    };

    let photo = state.photos.get(&ranked.id).map(String::as_str);
    let paragraph = Paragraph::new(detail_lines(ranked, record, photo)).block(block);
    frame.render_widget(paragraph, area);
}

fn detail_lines(
    ranked: &RankedPlayer,
    record: &PlayerRecord,
    photo: Option<&str>,
) -> Vec<Line<'static>> {
    let stats = PlayerAnalytics::for_player(record);
    let label = Style::default().fg(Color::DarkGray);
    let bye = record
        .bye_week
        .map_or_else(|| "-".to_string(), |b| b.to_string());

    vec![
        Line::from(vec![
            Span::styled(
                record.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", record.position_label)),
            Span::styled(
                if ranked.in_top_tier { "  top tier" } else { "" },
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("ADP ", label),
            Span::raw(format!("{:.1}", record.adp)),
            Span::styled("  Points ", label),
            Span::raw(format!("{:.1}", record.season_points)),
            Span::styled("  Bye ", label),
            Span::raw(bye),
        ]),
        Line::from(vec![
            Span::styled("Value ", label),
            Span::raw(format!("{:.2}", ranked.value_score)),
            Span::styled("  Adjusted ", label),
            Span::raw(format!("{:.2}", ranked.adjusted_value_score)),
        ]),
        Line::from(vec![
            Span::styled("Weekly avg ", label),
            Span::raw(format!("{:.1}", stats.mean)),
            Span::styled("  Std dev ", label),
            Span::raw(format!("{:.1}", stats.consistency)),
            Span::styled("  Boom ", label),
            Span::raw(format!("{:.0}%", stats.boom_rate * 100.0)),
            Span::styled("  Bust ", label),
            Span::raw(format!("{:.0}%", stats.bust_rate * 100.0)),
        ]),
        Line::from(vec![
            Span::styled("Photo ", label),
            Span::raw(photo.unwrap_or("loading...").to_string()),
        ]),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
