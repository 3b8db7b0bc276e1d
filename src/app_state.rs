//! Top-level game state machine.

use bevy::prelude::*;

/// Where the player is: building a rocket, or flying it.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// The grid editor; all build manipulation happens here.
    #[default]
    Editor,
    /// Live physics simulation of the constructed rocket.
    Flight,
}
