//! Per-view accumulation of asynchronously resolved rosters
//!
//! The allies view fetches one roster per allied army and shows them as they
//! arrive. Fetches can't be cancelled, so every request is tagged with the
//! session that issued it and completions from an ended session are dropped
//! instead of leaking into the next view.

use serde::Serialize;

use crate::roster::ResolvedRoster;

/// Token identifying one visit to a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u64);

/// An allied army's roster, resolved with the ally as composition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllyRoster {
    pub ally: String,
    pub roster: ResolvedRoster,
}

/// Append-only, session-scoped collection of ally rosters
#[derive(Debug, Default)]
pub struct AllyAccumulator {
    session: SessionId,
    entries: Vec<AllyRoster>,
}

impl AllyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the current session and start a fresh, empty one
    pub fn begin(&mut self) -> SessionId {
        self.session = SessionId(self.session.0 + 1);
        self.entries.clear();
        tracing::debug!(session = self.session.0, "Started ally session");
        self.session
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Record a completed ally roster
    ///
    /// Returns false when the completion belongs to an ended session or the
    /// ally is already present; nothing is recorded in either case.
    pub fn accept(&mut self, session: SessionId, ally: &str, roster: ResolvedRoster) -> bool {
        if session != self.session {
            tracing::warn!(
                stale = session.0,
                current = self.session.0,
                ally,
                "Discarding ally roster from ended session"
            );
            return false;
        }

        if self.entries.iter().any(|entry| entry.ally == ally) {
            tracing::warn!(ally, "Ignoring duplicate ally roster");
            return false;
        }

        self.entries.push(AllyRoster {
            ally: ally.to_string(),
            roster,
        });
        true
    }

    /// Accepted rosters in arrival order
    pub fn entries(&self) -> &[AllyRoster] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every expected ally has arrived
    pub fn is_complete(&self, expected: &[String]) -> bool {
        expected
            .iter()
            .all(|ally| self.entries.iter().any(|entry| &entry.ally == ally))
    }
}
