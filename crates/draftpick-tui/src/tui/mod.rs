// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` built from the latest published
// `DraftSnapshot`. Snapshots arrive on the session's watch channel; photo
// lookups and other background results arrive as `UiUpdate`s over an mpsc
// channel. Rendering happens on a ~30 fps tick.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use draftpick_core::catalog::{Catalog, PlayerId, Position};
use draftpick_core::draft::{DraftOutcome, SessionHandle};
use draftpick_core::photo::PhotoResolver;
use draftpick_core::protocol::DraftSnapshot;
use draftpick_core::valuation::scarcity::RankedPlayer;

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Background results delivered to the TUI loop.
#[derive(Debug)]
pub enum UiUpdate {
    /// A freshly published session snapshot.
    Snapshot(Arc<DraftSnapshot>),
    /// Photo URL resolved for a player (placeholder on failure).
    /// `retry` marks a transport failure worth asking about again.
    Photo {
        id: PlayerId,
        url: String,
        retry: bool,
    },
}

/// Actions the operator asks for that leave the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Draft(PlayerId),
    Quit,
}

/// Dashboard settings taken from the display config.
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    pub page_size: usize,
    pub low_tier_warning: usize,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the latest snapshot plus everything the operator has
/// set up on screen (filters, page, selection).
pub struct ViewState {
    /// Latest published snapshot.
    pub snapshot: Arc<DraftSnapshot>,
    /// Static player data for the detail pane.
    pub catalog: Arc<Catalog>,
    /// Rows per page in the available-players grid.
    pub page_size: usize,
    /// Remaining-count threshold for the low-tier banner.
    pub low_tier_warning: usize,
    /// Zero-based page into the filtered player list.
    pub page: usize,
    /// Selected row within the current page.
    pub selected: usize,
    /// Current filter/search text.
    pub filter_text: String,
    /// Whether the filter input is active.
    pub filter_mode: bool,
    /// Position filter for the available players grid.
    pub position_filter: Option<Position>,
    /// Quit confirmation prompt is showing.
    pub confirm_quit: bool,
    /// Result of the last draft attempt.
    pub status_message: Option<String>,
    /// Resolved photo URLs by player.
    pub photos: HashMap<PlayerId, String>,
    /// Players with a photo lookup in flight.
    pub photos_pending: HashSet<PlayerId>,
    /// Players whose last lookup failed in transport.
    pub photos_retry: HashSet<PlayerId>,
}

impl ViewState {
    pub fn new(catalog: Arc<Catalog>, snapshot: Arc<DraftSnapshot>, options: DashboardOptions) -> Self {
        ViewState {
            snapshot,
            catalog,
            page_size: options.page_size.max(1),
            low_tier_warning: options.low_tier_warning,
            page: 0,
            selected: 0,
            filter_text: String::new(),
            filter_mode: false,
            position_filter: None,
            confirm_quit: false,
            status_message: None,
            photos: HashMap::new(),
            photos_pending: HashSet::new(),
            photos_retry: HashSet::new(),
        }
    }

    /// No lookup in flight and no settled URL yet.
    pub fn wants_photo(&self, id: PlayerId) -> bool {
        !self.photos_pending.contains(&id)
            && (!self.photos.contains_key(&id) || self.photos_retry.contains(&id))
    }

    /// Available players after the position and text filters, best-first.
    pub fn filtered_players(&self) -> Vec<&RankedPlayer> {
        widgets::available::filter_players(
            &self.snapshot.ranking,
            self.position_filter,
            &self.filter_text,
        )
    }

    /// Number of pages for the current filter (at least 1).
    pub fn page_count(&self) -> usize {
        let rows = self.filtered_players().len();
        rows.div_ceil(self.page_size).max(1)
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&RankedPlayer> {
        self.filtered_players()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn selected_player(&self) -> Option<&RankedPlayer> {
        self.page_rows().into_iter().nth(self.selected)
    }

    /// Keep page and selection inside the current filtered list.
    pub fn clamp_selection(&mut self) {
        let pages = self.page_count();
        if self.page >= pages {
            self.page = pages - 1;
        }
        let rows = self.page_rows().len();
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    /// Go back to the first row of the first page (after a filter change).
    pub fn reset_paging(&mut self) {
        self.page = 0;
        self.selected = 0;
    }

    pub fn apply_snapshot(&mut self, snapshot: Arc<DraftSnapshot>) {
        self.snapshot = snapshot;
        self.clamp_selection();
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(snapshot),
        UiUpdate::Photo { id, url, retry } => {
            state.photos_pending.remove(&id);
            state.photos.insert(id, url);
            if retry {
                state.photos_retry.insert(id);
            } else {
                state.photos_retry.remove(&id);
            }
        }
    }
}

fn apply_outcome(state: &mut ViewState, outcome: &DraftOutcome) {
    state.status_message = Some(outcome.to_string());
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::banner::render(frame, layout.banner, state);
    widgets::available::render(frame, layout.main_panel, state);
    widgets::player_detail::render(frame, layout.detail, state);
    widgets::tiers::render(frame, layout.tiers, state);
    widgets::draft_log::render(frame, layout.draft_log, state);
    render_help_bar(frame, &layout, state);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = if state.confirm_quit {
        " Quit the draft? y:Yes | n:No"
    } else if state.filter_mode {
        " Type to filter | Enter:Keep | Esc:Clear"
    } else {
        " q:Quit | Enter:Draft | j/k:Move | h/l:Page | p:Position | /:Filter | Esc:Clear"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Photo requests
// ---------------------------------------------------------------------------

/// Start a photo lookup when the selection lands on a player that still
/// needs one. Returns whether a lookup was started.
///
/// `last_selected` holds the player seen on the previous call, so a failed
/// lookup is retried on the next selection rather than on every tick.
fn request_photo(
    state: &mut ViewState,
    last_selected: &mut Option<PlayerId>,
    photos: &Arc<PhotoResolver>,
    ui_tx: &mpsc::Sender<UiUpdate>,
) -> bool {
    let Some(player) = state.selected_player() else {
        *last_selected = None;
        return false;
    };
    let id = player.id;
    if last_selected.replace(id) == Some(id) || !state.wants_photo(id) {
        return false;
    }
    let name = player.name.clone();
    state.photos_pending.insert(id);

    let photos = Arc::clone(photos);
    let tx = ui_tx.clone();
    tokio::spawn(async move {
        let lookup = photos.lookup(&name).await;
        let _ = tx
            .send(UiUpdate::Photo {
                id,
                url: lookup.url,
                retry: lookup.retry,
            })
            .await;
    });
    true
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the dashboard until the operator quits.
///
/// 1. Initializes the terminal and installs a panic hook that restores it.
/// 2. Selects over published snapshots, background updates, keyboard
///    input, and the render tick.
/// 3. Restores the terminal on exit.
pub async fn run(
    handle: SessionHandle,
    photos: Arc<PhotoResolver>,
    options: DashboardOptions,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut snapshots = handle.subscribe();
    let mut view_state = ViewState::new(handle.catalog(), handle.snapshot(), options);

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiUpdate>(64);
    let mut photo_target = None;

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        request_photo(&mut view_state, &mut photo_target, &photos, &ui_tx);

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = Arc::clone(&snapshots.borrow_and_update());
                apply_ui_update(&mut view_state, UiUpdate::Snapshot(snapshot));
            }

            Some(update) = ui_rx.recv() => {
                apply_ui_update(&mut view_state, update);
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match input::handle_key(key_event, &mut view_state) {
                            Some(UserCommand::Quit) => {
                                info!("Operator quit the dashboard");
                                break;
                            }
                            Some(UserCommand::Draft(id)) => {
                                let outcome = handle.draft_player(id).await;
                                apply_outcome(&mut view_state, &outcome);
                            }
                            None => {}
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws
                    }
                    Some(Err(e)) => {
                        warn!("Terminal input error: {e}");
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
