//! The rocket editor: build state, manipulation engine, input controller and
//! sprite reconciliation.
//!
//! All build mutation goes through [`build`], [`transform`] and the state
//! methods here; the controller only translates input events into those
//! operations, and [`graphics`] mirrors the resulting build list into sprites.

pub mod build;
pub mod controller;
pub mod graphics;
pub mod history;
pub mod snap;
pub mod transform;

use bevy::prelude::*;

use crate::app_state::GameState;
use crate::catalog::PartCatalog;

use build::PlacedPart;
use history::{pack_build, BuildSnapshot, PackedPart, UndoRedoStack};

/// Everything the editor owns: the current build, the pending part to place,
/// clipboard, history and camera focus.
///
/// An explicit context object threaded to every operation — no ambient
/// globals.  External code must not splice `build` directly; use the
/// operations in [`build`] and [`transform`].
#[derive(Resource, Debug)]
pub struct EditorState {
    /// Ordered list of placed parts.  Insertion order is z-order for picking.
    pub build: Vec<PlacedPart>,
    /// Catalog id of the part currently selected for placement, if any.
    pub current_select_build: Option<String>,
    /// Pending placement rotation in 90° steps (`rotation = n · π/2`).
    pub placement_rotation: i32,
    /// Packed parts captured by copy/cut, pasted relative to camera focus.
    pub clipboard: Vec<PackedPart>,
    pub stack: UndoRedoStack,
    /// When true a pointer drag is a rectangle select; otherwise camera move.
    pub swipe: bool,
    pub camera_focus: Vec2,
    pub camera_focus_before_drag: Vec2,
    next_uid: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            build: Vec::new(),
            current_select_build: None,
            placement_rotation: 0,
            clipboard: Vec::new(),
            stack: UndoRedoStack::default(),
            swipe: false,
            camera_focus: Vec2::ZERO,
            camera_focus_before_drag: Vec2::ZERO,
            next_uid: 0,
        }
    }
}

impl EditorState {
    /// Hand out the next stable part identity.
    pub fn next_uid(&mut self) -> u64 {
        let uid = self.next_uid;
        self.next_uid += 1;
        uid
    }

    /// Record the current build as an undo state.  Call after every mutation
    /// that should be reversible.
    pub fn push_state(&mut self) {
        self.stack.push(pack_build(&self.build));
    }

    /// Replace the build with a snapshot's contents.
    ///
    /// Deliberately does NOT record history: applying an undo must not itself
    /// generate undo history.  Unknown part ids are skipped with a warning
    /// (the catalog is the authority on what exists).
    pub fn restore_state(&mut self, snapshot: &BuildSnapshot, catalog: &PartCatalog) {
        build::delete_all(self, false);
        for packed in snapshot {
            self.unpack(packed, catalog, Vec2::ZERO, false);
        }
        self.current_select_build = None;
    }

    /// Re-instantiate one packed part at an offset, optionally selecting it.
    pub fn unpack(&mut self, packed: &PackedPart, catalog: &PartCatalog, offset: Vec2, select: bool) {
        let Some(entry) = catalog.get(&packed.i) else {
            warn!("snapshot references unknown part '{}'; skipped", packed.i);
            return;
        };
        let uid = self.next_uid();
        let mut part =
            PlacedPart::from_entry(entry, uid, packed.x + offset.x, packed.y + offset.y, packed.r);
        part.selected = select;
        self.build.push(part);
    }

    /// Copy the selection into the clipboard.
    pub fn copy_selection(&mut self) {
        self.clipboard = self
            .build
            .iter()
            .filter(|p| p.selected)
            .map(PackedPart::from_part)
            .collect();
    }

    /// Copy the selection, then delete it.
    pub fn cut_selection(&mut self) {
        self.copy_selection();
        build::delete_selection(self);
    }

    /// Paste the clipboard near the camera focus, snapped to the whole grid.
    /// Pasted parts become the new selection; records one undo state.
    pub fn paste_clipboard(&mut self, catalog: &PartCatalog) {
        if self.clipboard.is_empty() {
            return;
        }
        build::unselect_all(self);

        let at = snap::snap_to_grid(
            self.camera_focus.x,
            self.camera_focus.y,
            1.0,
            1.0,
            snap::SnapMode::Floor,
        );
        let clipboard = std::mem::take(&mut self.clipboard);
        for packed in &clipboard {
            self.unpack(packed, catalog, at, true);
        }
        self.clipboard = clipboard;
        self.push_state();
    }

    /// Drop everything the editor holds; used after the build is handed off
    /// to the simulation as a rocket.
    pub fn reset(&mut self) {
        self.build.clear();
        self.clipboard.clear();
        self.stack = UndoRedoStack::default();
        self.current_select_build = None;
        self.placement_rotation = 0;
    }
}

/// Registers the editor resource, input controller and sprite sync.
pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorState>()
            .init_resource::<controller::PointerDrag>()
            .add_systems(
                Update,
                (
                    controller::editor_pointer_system,
                    controller::editor_keyboard_system,
                    controller::editor_clipboard_system,
                    controller::editor_scroll_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Editor)),
            )
            .add_systems(
                Update,
                (
                    graphics::sync_part_sprites_system,
                    graphics::ghost_icon_system,
                    graphics::selection_rectangle_system,
                    graphics::build_grid_gizmo_system,
                )
                    .run_if(in_state(GameState::Editor)),
            )
            .add_systems(OnExit(GameState::Editor), graphics::cleanup_editor_graphics);
    }
}
