//! Linear undo/redo over scene revisions.
//!
//! The history stores whole [`Scene`] snapshots. A commit whose result equals
//! the current revision is dropped, so callers may commit freely on every
//! pointer sample without flooding the stack with duplicates.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::scene::Scene;

/// Default maximum number of retained revisions.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Scene>,
    cursor: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Scene::default(), DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// One-entry history holding `initial`. A zero `limit` is treated as one.
    #[must_use]
    pub fn new(initial: Scene, limit: usize) -> Self {
        Self { entries: vec![initial], cursor: 0, limit: limit.max(1) }
    }

    /// The scene at the cursor.
    #[must_use]
    pub fn current(&self) -> &Scene {
        // The entry list is never empty and the cursor always indexes into it.
        &self.entries[self.cursor]
    }

    /// Apply `updater` to the current scene and record the result.
    ///
    /// Returns `false` when the result equals the current scene; nothing is
    /// recorded in that case. Otherwise any redo branch is discarded and the
    /// oldest revisions are evicted beyond the limit.
    pub fn commit(&mut self, updater: impl FnOnce(&Scene) -> Scene) -> bool {
        let next = updater(self.current());
        if next == *self.current() {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(next);
        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(0..overflow);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Step back one revision. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one revision. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history holds at least one revision.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Replace everything with a single revision holding `scene`.
    pub fn reset(&mut self, scene: Scene) {
        self.entries = vec![scene];
        self.cursor = 0;
    }
}
