// Terminal front-ends for the draft assistant: the line-oriented prompt and
// the full-screen dashboard.

pub mod text;
pub mod tui;
