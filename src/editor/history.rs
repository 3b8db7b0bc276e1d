//! Build snapshots and the bounded undo/redo stack.
//!
//! A snapshot is the pure-data serialization of the build list: an ordered
//! sequence of `{x, y, r, i}` tuples.  That layout is the save/load interop
//! format and must be reproduced bit-for-bit.
//!
//! The stack is a cursor over retained snapshots: pushing truncates any
//! redo tail and evicts the oldest entries beyond the limit; undo/redo past
//! the ends return `None` and never fail.

use serde::{Deserialize, Serialize};

use crate::constants::BUILD_MAX_UNDO;

use super::build::PlacedPart;

/// One packed part: the wire form of a [`PlacedPart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedPart {
    pub x: f32,
    pub y: f32,
    /// Rotation in radians.
    pub r: f32,
    /// Catalog id.
    pub i: String,
}

impl PackedPart {
    pub fn from_part(part: &PlacedPart) -> Self {
        Self {
            x: part.x,
            y: part.y,
            r: part.rotation,
            i: part.id.clone(),
        }
    }
}

/// An immutable point-in-time copy of the build list.
pub type BuildSnapshot = Vec<PackedPart>;

/// Pack a build list into a snapshot.
pub fn pack_build(build: &[PlacedPart]) -> BuildSnapshot {
    build.iter().map(PackedPart::from_part).collect()
}

/// Bounded-depth history of build snapshots with a cursor.
#[derive(Debug, Clone)]
pub struct UndoRedoStack {
    states: Vec<BuildSnapshot>,
    /// Index of the current state in `states`; `None` while empty.
    cursor: Option<usize>,
    limit: usize,
}

impl Default for UndoRedoStack {
    fn default() -> Self {
        Self::with_limit(BUILD_MAX_UNDO)
    }
}

impl UndoRedoStack {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            states: Vec::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Push a snapshot: truncate the redo tail, append, evict the oldest
    /// entry when over the limit.
    pub fn push(&mut self, snapshot: BuildSnapshot) {
        if let Some(cursor) = self.cursor {
            self.states.truncate(cursor + 1);
        }
        self.states.push(snapshot);
        if self.states.len() > self.limit {
            self.states.remove(0);
        }
        self.cursor = Some(self.states.len() - 1);
    }

    /// Step back one state, returning the snapshot to restore.
    /// `None` when there is nothing earlier — a no-op, never an error.
    pub fn undo(&mut self) -> Option<&BuildSnapshot> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.states.get(cursor - 1)
    }

    /// Step forward one state, returning the snapshot to restore.
    /// `None` at the newest state.
    pub fn redo(&mut self) -> Option<&BuildSnapshot> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.states.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.states.get(cursor + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: f32) -> BuildSnapshot {
        vec![PackedPart {
            x: tag,
            y: 0.0,
            r: 0.0,
            i: "FuelTankNormal".into(),
        }]
    }

    #[test]
    fn undo_returns_previous_then_redo_returns_next() {
        let mut stack = UndoRedoStack::default();
        stack.push(snap(0.0));
        stack.push(snap(1.0));

        assert_eq!(stack.undo().unwrap()[0].x, 0.0);
        assert_eq!(stack.redo().unwrap()[0].x, 1.0);
    }

    #[test]
    fn undo_past_the_start_is_none() {
        let mut stack = UndoRedoStack::default();
        assert!(stack.undo().is_none(), "empty stack");

        stack.push(snap(0.0));
        assert!(stack.undo().is_none(), "single state has nothing earlier");
    }

    #[test]
    fn redo_without_an_undo_is_none() {
        let mut stack = UndoRedoStack::default();
        stack.push(snap(0.0));
        assert!(stack.redo().is_none());
    }

    #[test]
    fn push_after_undo_discards_the_redo_tail() {
        let mut stack = UndoRedoStack::default();
        stack.push(snap(0.0));
        stack.push(snap(1.0));
        stack.undo();

        stack.push(snap(2.0));

        assert!(stack.redo().is_none(), "old future must be gone");
        assert_eq!(stack.undo().unwrap()[0].x, 0.0);
        assert_eq!(stack.redo().unwrap()[0].x, 2.0);
    }

    #[test]
    fn limit_evicts_oldest_first() {
        let limit = 10;
        let mut stack = UndoRedoStack::with_limit(limit);
        for i in 0..(limit + 5) {
            stack.push(snap(i as f32));
        }
        assert_eq!(stack.len(), limit);

        // Walk back to the very start: the oldest survivor is snapshot 5.
        let mut last = f32::NAN;
        while let Some(s) = stack.undo() {
            last = s[0].x;
        }
        assert_eq!(last, 5.0);
    }

    #[test]
    fn double_undo_restores_first_of_three() {
        let mut stack = UndoRedoStack::default();
        for i in 0..3 {
            stack.push(snap(i as f32));
        }
        stack.undo();
        let state = stack.undo().unwrap();
        assert_eq!(state[0].x, 0.0);
    }

    #[test]
    fn packed_part_serializes_as_x_y_r_i() {
        let packed = PackedPart {
            x: 78.0,
            y: 104.0,
            r: 1.5707964,
            i: "FuelTankSmall".into(),
        };
        let doc = toml::to_string(&packed).unwrap();
        assert!(doc.contains("x = 78.0"), "doc: {doc}");
        assert!(doc.contains("y = 104.0"), "doc: {doc}");
        assert!(doc.contains('r'), "doc: {doc}");
        assert!(doc.contains("i = \"FuelTankSmall\""), "doc: {doc}");

        let back: PackedPart = toml::from_str(&doc).unwrap();
        assert_eq!(back, packed);
    }
}
