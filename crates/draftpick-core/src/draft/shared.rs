// Shared access to one draft session.
//
// A single writer lock serializes draft actions. Each successful action
// recomputes the ranking and then publishes a fresh snapshot on a watch
// channel while the lock is still held, so subscribers never observe a
// partially updated state and publishes arrive in pick order.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use super::{DraftOutcome, DraftSession};
use crate::catalog::{Catalog, PlayerId};
use crate::protocol::DraftSnapshot;

#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<DraftSession>>,
    catalog: Arc<Catalog>,
    published: Arc<watch::Sender<Arc<DraftSnapshot>>>,
}

impl SessionHandle {
    pub fn new(session: DraftSession) -> Self {
        let catalog = session.catalog_arc();
        let (tx, _rx) = watch::channel(Arc::new(DraftSnapshot::from_session(&session)));
        SessionHandle {
            session: Arc::new(Mutex::new(session)),
            catalog,
            published: Arc::new(tx),
        }
    }

    /// The immutable catalog; readable without taking the session lock.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Draft by name query.
    pub async fn draft(&self, query: &str) -> DraftOutcome {
        let mut session = self.session.lock().await;
        let outcome = session.draft(query);
        self.publish_if_changed(&session, &outcome);
        outcome
    }

    /// Draft a specific player by id.
    pub async fn draft_player(&self, id: PlayerId) -> DraftOutcome {
        let mut session = self.session.lock().await;
        let outcome = session.draft_player(id);
        self.publish_if_changed(&session, &outcome);
        outcome
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<DraftSnapshot> {
        Arc::clone(&self.published.borrow())
    }

    /// Receive every future snapshot. The current one is marked seen.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DraftSnapshot>> {
        self.published.subscribe()
    }

    fn publish_if_changed(&self, session: &DraftSession, outcome: &DraftOutcome) {
        if !outcome.is_drafted() {
            return;
        }
        let snapshot = DraftSnapshot::from_session(session);
        debug!("Publishing snapshot after pick {}", snapshot.pick_count);
        self.published.send_replace(Arc::new(snapshot));
    }
}
