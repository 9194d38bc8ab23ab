// Available players widget: paged table of undrafted players.
//
// Columns: Rank, Name, Pos, Value, Adj. Rank is the player's place in the
// filtered list, so it keeps counting across pages. Top-tier players are
// bold; the selected row is highlighted.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use draftpick_core::catalog::Position;
use draftpick_core::valuation::scarcity::RankedPlayer;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = state.filtered_players();
    let first_rank = state.page * state.page_size;

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Pos"),
        Cell::from("Value"),
        Cell::from("Adj"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .page_rows()
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if p.in_top_tier {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", first_rank + i + 1)),
                Cell::from(p.name.clone()),
                Cell::from(p.position_label.clone()),
                Cell::from(format!("{:.2}", p.value_score)),
                Cell::from(format!("{:.2}", p.adjusted_value_score)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state, filtered.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !filtered.is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Filter players by position and name text (case-insensitive).
pub fn filter_players<'a>(
    players: &'a [RankedPlayer],
    position_filter: Option<Position>,
    filter_text: &str,
) -> Vec<&'a RankedPlayer> {
    let text_lower = filter_text.trim().to_lowercase();

    players
        .iter()
        .filter(|p| position_filter.map_or(true, |pos| p.position == pos))
        .filter(|p| text_lower.is_empty() || p.name.to_lowercase().contains(&text_lower))
        .collect()
}

/// Title with filter info, match count, and page indicator.
fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Available Players");
    if let Some(pos) = state.position_filter {
        title.push_str(&format!(" [{}]", pos.display_str()));
    }
    if !state.filter_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(
        " ({}) page {}/{}",
        filtered_count,
        state.page + 1,
        state.page_count()
    ));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_view;
    use crate::tui::widgets::test_util::render_to_string;

    #[test]
    fn filter_no_filters() {
        let state = sample_view();
        let result = filter_players(&state.snapshot.ranking, None, "");
        assert_eq!(result.len(), 13);
    }

    #[test]
    fn filter_by_position() {
        let state = sample_view();
        let result = filter_players(&state.snapshot.ranking, Some(Position::Quarterback), "");
        let names: Vec<&str> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Josh Allen", "Lamar Jackson", "Jalen Hurts"]);
    }

    #[test]
    fn filter_by_text_ignores_case() {
        let state = sample_view();
        let result = filter_players(&state.snapshot.ranking, None, "SMITH");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn filter_by_position_and_text() {
        let state = sample_view();
        let result =
            filter_players(&state.snapshot.ranking, Some(Position::WideReceiver), "smith");
        assert_eq!(result.len(), 2);
        let result =
            filter_players(&state.snapshot.ranking, Some(Position::RunningBack), "smith");
        assert!(result.is_empty());
    }

    #[test]
    fn filter_keeps_ranking_order() {
        let state = sample_view();
        let result = filter_players(&state.snapshot.ranking, Some(Position::RunningBack), "");
        for pair in result.windows(2) {
            assert!(pair[0].adjusted_value_score >= pair[1].adjusted_value_score);
        }
    }

    #[test]
    fn title_shows_filters_and_page() {
        let mut state = sample_view();
        state.position_filter = Some(Position::WideReceiver);
        state.filter_text = "smith".into();
        let title = build_title(&state, 2).to_string();
        assert_eq!(title, "Available Players [WR] \"smith\" (2) page 1/1");
    }

    #[test]
    fn renders_first_page_only() {
        let state = sample_view();
        let screen = render_to_string(100, 12, |frame| render(frame, frame.area(), &state));
        assert!(screen.contains("Ja'Marr Chase"));
        assert!(screen.contains(">> "));
        // Page size is five; the kicker sits on the last page
        assert!(!screen.contains("Brandon Aubrey"));
    }

    #[test]
    fn rank_continues_across_pages() {
        let mut state = sample_view();
        state.page = 2;
        let screen = render_to_string(100, 12, |frame| render(frame, frame.area(), &state));
        assert!(screen.contains("11"));
        assert!(screen.contains("13"));
        assert!(screen.contains("Brandon Aubrey"));
    }

    #[test]
    fn render_does_not_panic_with_no_rows() {
        let mut state = sample_view();
        state.filter_text = "nobody".into();
        render_to_string(100, 12, |frame| render(frame, frame.area(), &state));
    }
}
