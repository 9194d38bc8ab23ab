// TUI widget modules for each dashboard panel.

pub mod available;
pub mod banner;
pub mod draft_log;
pub mod player_detail;
pub mod status_bar;
pub mod tiers;
