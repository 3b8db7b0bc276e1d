//! The current build: placed parts, containment/overlap queries, and the
//! placement / deletion / selection operations over them.
//!
//! All coordinates are center-anchored editor pixels.  A part's footprint is
//! rotation-aware: width and height swap when its rotation is an odd multiple
//! of 90°.  The build list is owned exclusively by [`super::EditorState`];
//! every mutation flows through the functions here so the selection flag and
//! the undo stack stay consistent.

use crate::catalog::{PartCatalog, PartCatalogEntry};
use crate::constants::{is_180_rotation, normalize_angle, PLACEMENT_EROSION};

use super::snap::{snap_to_grid, SnapMode};
use super::EditorState;

/// One part placed in the editor.
///
/// Physical data is copied out of the catalog at placement time so queries
/// and transforms never need a catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPart {
    /// Catalog id this part was created from.
    pub id: String,
    /// Stable identity for the sprite-reconciliation layer.
    pub uid: u64,
    /// Center position (px).
    pub x: f32,
    pub y: f32,
    /// Rotation in radians, kept normalized into [0, 2π).
    pub rotation: f32,
    pub selected: bool,
    /// Footprint at 0° rotation (px).
    pub width: f32,
    pub height: f32,
    /// Snap multipliers at 0° rotation.
    pub min_snap_x: f32,
    pub min_snap_y: f32,
    pub can_overlap: bool,
}

impl PlacedPart {
    /// Build a part from its catalog entry at a position/rotation.
    pub fn from_entry(entry: &PartCatalogEntry, uid: u64, x: f32, y: f32, rotation: f32) -> Self {
        Self {
            id: entry.id.clone(),
            uid,
            x,
            y,
            rotation: normalize_angle(rotation),
            selected: false,
            width: entry.width,
            height: entry.height,
            min_snap_x: entry.min_snap_multiplier_x,
            min_snap_y: entry.min_snap_multiplier_y,
            can_overlap: entry.can_overlap,
        }
    }

    /// Footprint width after accounting for rotation.
    pub fn real_width(&self) -> f32 {
        if is_180_rotation(self.rotation) {
            self.width
        } else {
            self.height
        }
    }

    /// Footprint height after accounting for rotation.
    pub fn real_height(&self) -> f32 {
        if is_180_rotation(self.rotation) {
            self.height
        } else {
            self.width
        }
    }

    /// X snap multiplier after accounting for rotation.
    pub fn snap_x(&self) -> f32 {
        if is_180_rotation(self.rotation) {
            self.min_snap_x
        } else {
            self.min_snap_y
        }
    }

    /// Y snap multiplier after accounting for rotation.
    pub fn snap_y(&self) -> f32 {
        if is_180_rotation(self.rotation) {
            self.min_snap_y
        } else {
            self.min_snap_x
        }
    }

    /// Rotation-aware AABB as `(x1, y1, x2, y2)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let hw = self.real_width() / 2.0;
        let hh = self.real_height() / 2.0;
        (self.x - hw, self.y - hh, self.x + hw, self.y + hh)
    }

    /// Is the point inside this part's rotation-aware bounds?
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let (x1, y1, x2, y2) = self.bounds();
        x1 <= x && x <= x2 && y1 <= y && y <= y2
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn move_relative(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

// ── AABB queries ──────────────────────────────────────────────────────────────

/// Do two axis-aligned rectangles overlap?
///
/// `strict` treats touching edges as non-overlapping; non-strict counts a
/// shared edge as overlap.  Placement uses non-strict plus a 1 px erosion on
/// both rectangles, so adjacent parts may share an edge without a false
/// positive.
pub fn rect_intersect(
    ax1: f32,
    ay1: f32,
    ax2: f32,
    ay2: f32,
    bx1: f32,
    by1: f32,
    bx2: f32,
    by2: f32,
    strict: bool,
) -> bool {
    if strict {
        !(bx1 >= ax2 || bx2 <= ax1 || by1 >= ay2 || by2 <= ay1)
    } else {
        !(bx1 > ax2 || bx2 < ax1 || by1 > ay2 || by2 < ay1)
    }
}

/// Find the first part at `(x, y)` in build order, optionally skipping parts
/// that are already selected (used to avoid re-picking a part mid-drag).
///
/// A part whose position exactly matches the point wins before any bounds
/// test; removing that short-circuit could change first-match tie-breaking.
pub fn get_part_at(build: &[PlacedPart], x: f32, y: f32, only_unselected: bool) -> Option<usize> {
    for (i, part) in build.iter().enumerate() {
        if only_unselected && part.selected {
            continue;
        }
        if x == part.x && y == part.y {
            return Some(i);
        }
        if part.contains_point(x, y) {
            return Some(i);
        }
    }
    None
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Unselect every part.
pub fn unselect_all(editor: &mut EditorState) {
    for part in &mut editor.build {
        part.selected = false;
    }
}

/// Select the topmost unselected part at `(x, y)`.
///
/// Without the multi-select modifier the existing selection is replaced;
/// clicking empty space deselects everything.
pub fn select_part(editor: &mut EditorState, x: f32, y: f32, multi_select: bool) {
    match get_part_at(&editor.build, x, y, true) {
        Some(i) => {
            if !multi_select {
                unselect_all(editor);
            }
            editor.build[i].selected = true;
        }
        None => unselect_all(editor),
    }
}

/// Select every part whose rotation-aware AABB intersects the rectangle
/// spanned by two corners (any corner order).  Touching edges count.
pub fn select_parts_bounding_box(editor: &mut EditorState, x1: f32, y1: f32, x2: f32, y2: f32) {
    let (lo_x, hi_x) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
    let (lo_y, hi_y) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };

    for part in &mut editor.build {
        let (bx1, by1, bx2, by2) = part.bounds();
        if rect_intersect(lo_x, lo_y, hi_x, hi_y, bx1, by1, bx2, by2, false) {
            part.selected = true;
        }
    }
}

// ── Placement / deletion ──────────────────────────────────────────────────────

/// Add the currently selected catalog part at `(x, y)` with a rotation.
///
/// Returns `false` (and leaves the build untouched) when nothing is selected
/// to place, or when overlap rules reject the position.  On success the part
/// is appended and, when `record_undo` is set, a snapshot is pushed.
pub fn add_part(
    editor: &mut EditorState,
    catalog: &PartCatalog,
    x: f32,
    y: f32,
    rotation: f32,
    force: bool,
    record_undo: bool,
) -> bool {
    let Some(id) = editor.current_select_build.clone() else {
        return false; // Nothing selected
    };
    let Some(entry) = catalog.get(&id) else {
        return false;
    };

    let uid = editor.next_uid();
    let mut part = PlacedPart::from_entry(entry, uid, x, y, normalize_angle(rotation));

    // Snap the corner to the part's (rotation-aware) grid, then re-center.
    let snapped = snap_to_grid(x, y, part.snap_x(), part.snap_y(), SnapMode::Floor);
    part.move_to(
        snapped.x + part.real_width() / 2.0,
        snapped.y + part.real_height() / 2.0,
    );

    if !part.can_overlap && !force {
        let (ax1, ay1, ax2, ay2) = part.bounds();
        for other in &editor.build {
            let (bx1, by1, bx2, by2) = other.bounds();
            // Erode so parts in adjacent cells may touch edges.
            if rect_intersect(
                ax1 + PLACEMENT_EROSION,
                ay1 + PLACEMENT_EROSION,
                ax2 - PLACEMENT_EROSION,
                ay2 - PLACEMENT_EROSION,
                bx1 + PLACEMENT_EROSION,
                by1 + PLACEMENT_EROSION,
                bx2 - PLACEMENT_EROSION,
                by2 - PLACEMENT_EROSION,
                false,
            ) {
                return false;
            }
        }
    }

    editor.build.push(part);
    if record_undo {
        editor.push_state();
    }
    true
}

/// Delete every selected part, preserving the relative order of survivors.
/// No-ops (without recording history) when nothing is selected.
pub fn delete_selection(editor: &mut EditorState) {
    if !editor.build.iter().any(|p| p.selected) {
        return;
    }
    editor.build.retain(|p| !p.selected);
    editor.push_state();
}

/// Empty the build and selection.  `record_undo = false` is used while
/// restoring history so the restore itself leaves no trace.
pub fn delete_all(editor: &mut EditorState, record_undo: bool) {
    editor.build.clear();
    if record_undo {
        editor.push_state();
    }
}

/// Clamp every selected part back inside the build-area boundary.
pub fn snap_out_of_bounds(editor: &mut EditorState, boundary: f32) {
    for part in editor.build.iter_mut().filter(|p| p.selected) {
        part.x = part.x.clamp(-boundary, boundary);
        part.y = part.y.clamp(-boundary, boundary);
    }
}
