//! Flight simulation: planets, terrain sectors, gravity/drag integration and
//! rocket control.

pub mod gravity;
pub mod planet;
pub mod rocket;
pub mod terrain;

use bevy::prelude::*;

use crate::app_state::GameState;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<rocket::LaunchRequest>()
            .add_systems(Startup, planet::spawn_earth)
            .add_systems(
                Update,
                rocket::launch_system.run_if(in_state(GameState::Editor)),
            )
            .add_systems(
                Update,
                // Sector maintenance strictly precedes force integration:
                // new sectors must exist before gravity/collision reference
                // them within the same tick.
                (
                    planet::update_sectors_system,
                    planet::update_graphic_sectors_system,
                    gravity::clear_rocket_forces_system,
                    gravity::gravity_system,
                    gravity::atmosphere_drag_system,
                    rocket::throttle_input_system,
                    rocket::thruster_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Flight)),
            );
    }
}
