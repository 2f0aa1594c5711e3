//! Conversation History
//!
//! Ordered storage of completed chat turns. The store may retain the whole
//! session for audit purposes, but context assembly only ever sees the most
//! recent K turns via [`ConversationStore::recent`].
//!
//! Persistence is an external collaborator concern: the store hands out a
//! versioned [`StoreSnapshot`] and can be rebuilt from one, without assuming
//! anything about how the collaborator stores the bytes.

use super::types::ConversationTurn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bump when the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {0} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u32),
}

/// Ordered, append-only sequence of conversation turns.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: Vec<ConversationTurn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed turn. Insertion order is significant.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// At most the `k` most recent turns, oldest first.
    pub fn recent(&self, k: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(k);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.turns.last().map(|turn| turn.timestamp)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: SNAPSHOT_VERSION,
            turns: self.turns.clone(),
        }
    }

    pub fn restore(snapshot: StoreSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(Self {
            turns: snapshot.turns,
        })
    }
}

/// Serializable image of a store, owned by the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub turns: Vec<ConversationTurn>,
}
