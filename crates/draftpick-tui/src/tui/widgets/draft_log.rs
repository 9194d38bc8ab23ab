// Draft log widget: completed picks, newest first.
//
// Each: "#{pick} {HH:MM} {player} ({label}) {adjusted value at pick}"

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use draftpick_core::draft::DraftedEntry;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let drafted = &state.snapshot.drafted;

    if drafted.is_empty() {
        let paragraph = Paragraph::new("  No picks yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Draft Log"));
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = drafted.len();

    let items: Vec<ListItem> = drafted
        .iter()
        .rev()
        .take(visible_rows.max(1))
        .map(|entry| ListItem::new(Line::from(Span::raw(format_entry(entry)))))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Draft Log ({total})")),
    );
    frame.render_widget(list, area);

    if total > visible_rows {
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(visible_rows));
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

pub fn format_entry(entry: &DraftedEntry) -> String {
    format!(
        "#{} {} {} ({}) {:.2}",
        entry.pick_number,
        entry.drafted_at.format("%H:%M"),
        entry.name,
        entry.position_label,
        entry.adjusted_value_at_pick
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Local, TimeZone};
    use draftpick_core::catalog::{PlayerId, Position};
    use draftpick_core::protocol::DraftSnapshot;

    use crate::test_support::sample_session;
    use crate::tui::tests::{sample_view, view_of};
    use crate::tui::widgets::test_util::render_to_string;

    #[test]
    fn format_entry_basic() {
        let entry = DraftedEntry {
            pick_number: 3,
            player_id: PlayerId(1),
            name: "Bijan Robinson".into(),
            position_label: "RB1".into(),
            position: Position::RunningBack,
            adjusted_value_at_pick: 150.0,
            drafted_at: Local.with_ymd_and_hms(2025, 8, 30, 19, 5, 0).unwrap(),
        };
        assert_eq!(format_entry(&entry), "#3 19:05 Bijan Robinson (RB1) 150.00");
    }

    #[test]
    fn renders_placeholder_before_first_pick() {
        let state = sample_view();
        let screen = render_to_string(50, 8, |frame| render(frame, frame.area(), &state));
        assert!(screen.contains("No picks yet."));
    }

    #[test]
    fn newest_pick_is_listed_first() {
        let mut session = sample_session();
        session.draft("Chase");
        session.draft("Allen");
        let state = view_of(&session);

        let screen = render_to_string(60, 8, |frame| render(frame, frame.area(), &state));
        let allen = screen.find("Josh Allen").unwrap();
        let chase = screen.find("Ja'Marr Chase").unwrap();
        assert!(allen < chase);
        assert!(screen.contains("Draft Log (2)"));
    }

    #[test]
    fn overflow_does_not_panic() {
        let mut session = sample_session();
        for name in ["Chase", "Bijan", "Saquon", "Gibbs", "Henry", "Puka"] {
            session.draft(name);
        }
        let mut state = sample_view();
        state.snapshot = Arc::new(DraftSnapshot::from_session(&session));
        render_to_string(60, 5, |frame| render(frame, frame.area(), &state));
    }
}
