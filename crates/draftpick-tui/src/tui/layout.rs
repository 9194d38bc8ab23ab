// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Tier Banner (3 rows)                              |
// +-------------------------+------------------------+
// | Available Players (fill) | Sidebar (35%)          |
// |                          | +- Top Tiers (40%) ---+|
// +--------------------------+                       ||
// | Player Detail (8 rows)   | +- Draft Log (60%) ---+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: pick count, players left, last result.
    pub status_bar: Rect,
    /// Low-tier warnings.
    pub banner: Rect,
    /// Paged table of available players.
    pub main_panel: Rect,
    /// Stats and photo for the selected player.
    pub detail: Rect,
    /// Remaining/total and multiplier per tracked position.
    pub tiers: Rect,
    /// Picks so far, newest first.
    pub draft_log: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | banner(3) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let banner = vertical[1];
    let middle = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: main column (65%) | sidebar (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    let main_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(8)])
        .split(horizontal[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        banner,
        main_panel: main_column[0],
        detail: main_column[1],
        tiers: sidebar[0],
        draft_log: sidebar[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
