//! Editor input controller.
//!
//! Translates pointer and keyboard events into build operations.  Contains no
//! manipulation logic of its own: every mutation is one of the documented
//! operations in [`super::build`], [`super::transform`] or the state methods.
//!
//! ## Pointer protocol
//!
//! A press records the anchor; movement past a small pixel threshold turns
//! the gesture into a drag.  What a drag means depends on the swipe toggle:
//! rectangle select when on, camera move when off.  A release below the
//! threshold is a click: try to place the pending part, otherwise pick.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::f32::consts::FRAC_PI_2;

use crate::catalog::PartCatalog;
use crate::config::GameConfig;
use crate::sim::rocket::LaunchRequest;

use super::{build, transform, EditorState};

/// Pixel distance a pointer must travel before a press becomes a drag.
const DRAG_THRESHOLD: f32 = 5.0;

/// Per-gesture pointer state.
#[derive(Resource, Debug, Default)]
pub struct PointerDrag {
    /// Screen position of the press anchoring the gesture.
    pub down_screen: Option<Vec2>,
    /// World position of the press.
    pub down_world: Option<Vec2>,
    /// True once the pointer has moved past [`DRAG_THRESHOLD`].
    pub dragging: bool,
}

/// Current cursor position in world coordinates, if the cursor is on-window.
pub fn cursor_world(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    let cursor = window.cursor_position()?;
    camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

fn ctrl_held(keys: &ButtonInput<KeyCode>) -> bool {
    keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight)
}

/// Pointer handling: press/drag/release for placement, picking, box select
/// and camera drag.
pub fn editor_pointer_system(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut drag: ResMut<PointerDrag>,
    mut editor: ResMut<EditorState>,
    catalog: Res<PartCatalog>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        drag.down_screen = window.cursor_position();
        drag.down_world = cursor_world(window, camera, camera_transform);
        drag.dragging = false;
        editor.camera_focus_before_drag = editor.camera_focus;
    }

    if buttons.pressed(MouseButton::Left) && !drag.dragging {
        if let (Some(down), Some(now)) = (drag.down_screen, window.cursor_position()) {
            if down.distance(now) > DRAG_THRESHOLD {
                drag.dragging = true;
            }
        }
    }

    // Camera drag follows the pointer continuously, not just on release.
    if buttons.pressed(MouseButton::Left) && drag.dragging && !editor.swipe {
        if let (Some(down), Some(now)) = (
            drag.down_world,
            cursor_world(window, camera, camera_transform),
        ) {
            let boundary = crate::constants::BUILD_AREA_BOUNDARY;
            let focus = editor.camera_focus_before_drag + (down - now);
            editor.camera_focus = focus.clamp(
                Vec2::splat(-boundary / 2.0),
                Vec2::splat(boundary / 2.0),
            );
        }
    }

    if buttons.just_released(MouseButton::Left) {
        let up_world = cursor_world(window, camera, camera_transform);

        if drag.dragging {
            if editor.swipe {
                if let (Some(a), Some(b)) = (drag.down_world, up_world) {
                    if !ctrl_held(&keys) {
                        build::unselect_all(&mut editor);
                    }
                    build::select_parts_bounding_box(&mut editor, a.x, a.y, b.x, b.y);
                }
            }
            // Camera drags already applied their focus while moving.
        } else if let Some(at) = up_world {
            let rotation = FRAC_PI_2 * editor.placement_rotation as f32;
            let placed = build::add_part(&mut editor, &catalog, at.x, at.y, rotation, false, true);

            // Failed to place and nothing pending: this click is a pick.
            // Otherwise — placed, or blocked with a part still pending —
            // the click clears the selection.
            if !placed && editor.current_select_build.is_none() {
                build::select_part(&mut editor, at.x, at.y, ctrl_held(&keys));
            } else {
                build::unselect_all(&mut editor);
            }
        }

        drag.down_screen = None;
        drag.down_world = None;
        drag.dragging = false;
    }

    // Right click cancels the pending placement part.
    if buttons.just_pressed(MouseButton::Right) {
        editor.current_select_build = None;
        editor.placement_rotation = 0;
    }
}

/// Keyboard handling: delete, rotate, nudge, select-all, undo/redo, swipe
/// toggle, mirror, and the launch handoff.
pub fn editor_keyboard_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut editor: ResMut<EditorState>,
    catalog: Res<PartCatalog>,
    config: Res<GameConfig>,
    mut launch: MessageWriter<LaunchRequest>,
) {
    let ctrl = ctrl_held(&keys);

    if keys.just_pressed(KeyCode::Delete) || keys.just_pressed(KeyCode::Backspace) {
        build::delete_selection(&mut editor);
    }

    // Q/E rotate the selection; the pending ghost part rotates with them.
    for (key, direction) in [(KeyCode::KeyQ, -1.0_f32), (KeyCode::KeyE, 1.0_f32)] {
        if keys.just_pressed(key) {
            transform::rotate_selection(&mut editor, direction * FRAC_PI_2);
            if editor.current_select_build.is_some() {
                editor.placement_rotation += if direction > 0.0 { 1 } else { -1 };
            }
        }
    }

    // Ctrl+A selects everything; bare movement keys nudge the selection by
    // its coarsest snap step.
    if ctrl && keys.just_pressed(KeyCode::KeyA) {
        for part in &mut editor.build {
            part.selected = true;
        }
    } else if let Some((dx, dy)) = nudge_direction(&keys) {
        let selected: Vec<&build::PlacedPart> =
            editor.build.iter().filter(|p| p.selected).collect();
        if !selected.is_empty() {
            let step_x = selected
                .iter()
                .map(|p| p.snap_x())
                .fold(0.0_f32, f32::max)
                * config.build_grid_size;
            let step_y = selected
                .iter()
                .map(|p| p.snap_y())
                .fold(0.0_f32, f32::max)
                * config.build_grid_size;
            drop(selected);

            for part in editor.build.iter_mut().filter(|p| p.selected) {
                part.move_relative(dx * step_x, dy * step_y);
            }
            build::snap_out_of_bounds(&mut editor, config.build_area_boundary);
            editor.push_state();
        }
    }

    // Undo / redo
    if ctrl && keys.just_pressed(KeyCode::KeyZ) {
        if let Some(state) = editor.stack.undo().cloned() {
            editor.restore_state(&state, &catalog);
        }
    }
    if ctrl && keys.just_pressed(KeyCode::KeyY) {
        if let Some(state) = editor.stack.redo().cloned() {
            editor.restore_state(&state, &catalog);
        }
    }

    // Swipe toggle: drag selects instead of moving the camera.
    if keys.just_pressed(KeyCode::KeyT) {
        editor.swipe = !editor.swipe;
        info!(
            "Swipe {}",
            if editor.swipe { "enabled" } else { "disabled" }
        );
    }

    // Mirror (F = vertical, G = horizontal)
    if ctrl && keys.just_pressed(KeyCode::KeyF) {
        transform::mirror_selection(&mut editor, true);
    }
    if ctrl && keys.just_pressed(KeyCode::KeyG) {
        transform::mirror_selection(&mut editor, false);
    }

    if keys.just_pressed(KeyCode::Escape) {
        editor.current_select_build = None;
        editor.placement_rotation = 0;
        build::unselect_all(&mut editor);
    }

    // Hand the build to the simulation.
    if keys.just_pressed(KeyCode::Space) && !editor.build.is_empty() {
        launch.write(LaunchRequest);
    }
}

/// Clipboard events: Ctrl+C copy, Ctrl+X cut, Ctrl+V paste.
pub fn editor_clipboard_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut editor: ResMut<EditorState>,
    catalog: Res<PartCatalog>,
) {
    if !ctrl_held(&keys) {
        return;
    }
    if keys.just_pressed(KeyCode::KeyC) {
        editor.copy_selection();
    }
    if keys.just_pressed(KeyCode::KeyX) {
        editor.cut_selection();
    }
    if keys.just_pressed(KeyCode::KeyV) {
        editor.paste_clipboard(&catalog);
    }
}

/// Scroll wheel zooms the editor camera within its bounds.  The ghost icon
/// follows automatically because it lives in world space.
pub fn editor_scroll_system(
    mut wheel: MessageReader<bevy::input::mouse::MouseWheel>,
    mut cameras: Query<&mut Projection, With<Camera2d>>,
) {
    let delta: f32 = wheel.read().map(|event| event.y).sum();
    if delta == 0.0 {
        return;
    }
    if let Ok(mut projection) = cameras.single_mut() {
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scale = (ortho.scale * (1.0 - delta * 0.1))
                .clamp(crate::constants::MIN_ZOOM, crate::constants::MAX_ZOOM);
        }
    }
}

/// Map movement keys to a unit nudge direction, if any is freshly pressed.
fn nudge_direction(keys: &ButtonInput<KeyCode>) -> Option<(f32, f32)> {
    let mapping = [
        (KeyCode::KeyA, (-1.0, 0.0)),
        (KeyCode::ArrowLeft, (-1.0, 0.0)),
        (KeyCode::KeyD, (1.0, 0.0)),
        (KeyCode::ArrowRight, (1.0, 0.0)),
        (KeyCode::KeyW, (0.0, 1.0)),
        (KeyCode::ArrowUp, (0.0, 1.0)),
        (KeyCode::KeyS, (0.0, -1.0)),
        (KeyCode::ArrowDown, (0.0, -1.0)),
    ];
    for (key, d) in mapping {
        if keys.just_pressed(key) {
            return Some(d);
        }
    }
    None
}
