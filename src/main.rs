use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

mod app_state;
mod catalog;
mod config;
mod constants;
mod editor;
mod error;
mod graphics;
mod sim;

use app_state::GameState;
use config::GameConfig;

/// Configure Rapier physics: disable ambient gravity — planets pull rockets
/// through the force integrator, not a global down vector.
fn setup_physics_config(mut rapier_config: Query<&mut RapierConfiguration>) {
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::ZERO;
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Apogee".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Insert GameConfig with compiled defaults; load_game_config will
        // overwrite it from assets/game.toml (if present) in Startup.
        .insert_resource(GameConfig::default())
        // pixels_per_meter(1.0) keeps world units identical to editor pixels.
        // Larger values shrink collider mass in physics-space quadratically
        // and throw off the hand-tuned gravity constant.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .init_state::<GameState>()
        .add_plugins(editor::EditorPlugin)
        .add_plugins(sim::SimulationPlugin)
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the
                // final values.
                config::load_game_config,
                catalog::load_part_catalog.after(config::load_game_config),
                graphics::setup_camera.after(config::load_game_config),
                setup_physics_config,
            ),
        )
        .add_systems(
            Update,
            (graphics::editor_camera_system, graphics::flight_camera_system),
        )
        .run();
}
