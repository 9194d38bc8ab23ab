// Draft state: availability, query matching, session and shared handle.

pub mod query;
pub mod session;
pub mod shared;

use crate::catalog::PlayerId;

pub use session::{DraftOutcome, DraftSession, DraftedEntry};
pub use shared::SessionHandle;

/// Which catalog players are still available.
///
/// Flags only ever go from available to drafted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    flags: Vec<bool>,
}

impl Availability {
    /// Every one of `len` players available.
    pub fn all(len: usize) -> Self {
        Availability {
            flags: vec![true; len],
        }
    }

    /// Unknown ids are reported as unavailable.
    pub fn is_available(&self, id: PlayerId) -> bool {
        self.flags.get(id.0).copied().unwrap_or(false)
    }

    /// Mark a player drafted. Returns true only if the flag changed.
    pub fn mark_drafted(&mut self, id: PlayerId) -> bool {
        match self.flags.get_mut(id.0) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        }
    }

    pub fn available_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}
