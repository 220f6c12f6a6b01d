//! Undo/redo history over scene snapshots.

use crate::element::{Element, ElementId};
use std::collections::VecDeque;

/// Default maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Deep copy of the scene, the selection and the id counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<Element>,
    pub selection: Vec<ElementId>,
    pub counter: u64,
}

/// Linear undo/redo stacks with a bounded undo side.
///
/// A tagged checkpoint whose tag matches the previous one is dropped, so a
/// burst of edits to the same field (typing into a panel input) collapses
/// into a single undo step. Any untagged checkpoint, undo or redo ends the
/// burst.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    capacity: usize,
    last_tag: Option<String>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create a history keeping at most `capacity` undo states (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            last_tag: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push the pre-change state. Clears the redo stack and evicts the
    /// oldest entry when over capacity.
    pub fn checkpoint(&mut self, snapshot: Snapshot) {
        self.last_tag = None;
        self.push(snapshot);
    }

    /// Like [`History::checkpoint`], but skipped when the previous
    /// checkpoint carried the same tag. Returns whether a state was pushed.
    pub fn checkpoint_tagged(&mut self, snapshot: Snapshot, tag: &str) -> bool {
        if self.last_tag.as_deref() == Some(tag) {
            return false;
        }
        self.push(snapshot);
        self.last_tag = Some(tag.to_string());
        true
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Swap `current` for the most recent checkpoint. Returns the state to
    /// restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        self.last_tag = None;
        Some(snapshot)
    }

    /// Swap `current` for the most recently undone state.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        self.last_tag = None;
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo states held.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all states, e.g. after loading a different scene.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_tag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(counter: u64) -> Snapshot {
        Snapshot {
            elements: Vec::new(),
            selection: Vec::new(),
            counter,
        }
    }

    #[test]
    fn test_undo_redo_swaps_states() {
        let mut history = History::new(10);
        history.checkpoint(snap(1));
        assert_eq!(history.undo(snap(2)), Some(snap(1)));
        assert!(history.can_redo());
        assert_eq!(history.redo(snap(1)), Some(snap(2)));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::default();
        assert_eq!(history.undo(snap(0)), None);
        assert_eq!(history.redo(snap(0)), None);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_checkpoint_truncates_redo() {
        let mut history = History::new(10);
        history.checkpoint(snap(1));
        history.undo(snap(2));
        history.checkpoint(snap(3));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(3);
        for n in 0..5 {
            history.checkpoint(snap(n));
        }
        assert_eq!(history.len(), 3);
        let mut seen = Vec::new();
        while let Some(s) = history.undo(snap(99)) {
            seen.push(s.counter);
        }
        assert_eq!(seen, vec![4, 3, 2]);
    }

    #[test]
    fn test_tagged_checkpoints_coalesce() {
        let mut history = History::new(10);
        assert!(history.checkpoint_tagged(snap(1), "el_1:width"));
        assert!(!history.checkpoint_tagged(snap(2), "el_1:width"));
        assert!(history.checkpoint_tagged(snap(3), "el_1:height"));
        history.checkpoint(snap(4));
        assert!(history.checkpoint_tagged(snap(5), "el_1:height"));
        assert_eq!(history.len(), 4);
    }
}
