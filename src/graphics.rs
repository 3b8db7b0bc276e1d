//! Camera setup and per-state camera behaviour.

use bevy::prelude::*;

use crate::app_state::GameState;
use crate::editor::EditorState;
use crate::sim::planet::tracked_rocket_position;
use crate::sim::rocket::Rocket;

/// Setup camera for 2D rendering.
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d with default scale shows roughly the full window area
    commands.spawn(Camera2d);
    info!("Camera spawned");
}

/// Keep the camera on the editor's focus point while building.
pub fn editor_camera_system(
    editor: Res<EditorState>,
    state: Res<State<GameState>>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    if *state.get() != GameState::Editor {
        return;
    }
    if let Ok(mut transform) = cameras.single_mut() {
        transform.translation.x = editor.camera_focus.x;
        transform.translation.y = editor.camera_focus.y;
    }
}

/// Follow the tracked rocket in flight.
pub fn flight_camera_system(
    state: Res<State<GameState>>,
    rockets: Query<(&Transform, &Rocket)>,
    mut cameras: Query<&mut Transform, (With<Camera2d>, Without<Rocket>)>,
) {
    if *state.get() != GameState::Flight {
        return;
    }
    let Some(pos) = tracked_rocket_position(&rockets) else {
        return;
    };
    if let Ok(mut transform) = cameras.single_mut() {
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }
}
