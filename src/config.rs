//! Runtime configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the tuneable constants
//! in [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.gravity_const`, `config.sector_amount`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable editor, physics and terrain configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Editor: build grid ────────────────────────────────────────────────────
    pub build_grid_size: f32,
    pub build_area_boundary: f32,
    pub build_max_undo: usize,

    // ── Physics: gravity & atmosphere ─────────────────────────────────────────
    pub gravity_const: f32,
    pub atmosphere_drag: f32,

    // ── Terrain sectors ───────────────────────────────────────────────────────
    pub sector_size: f32,
    pub sector_sample_inc: f32,
    pub sector_amount: i64,
    pub sector_floor_margin: f32,
    pub sector_flush_threshold: usize,
    pub sector_flush_chance: f64,
    pub sector_activation_margin: f32,
    pub graphic_sector_size: f32,
    pub graphic_sector_retention: f32,

    // ── Rocket ────────────────────────────────────────────────────────────────
    pub launch_pad_x: f32,
    pub launch_pad_y: f32,
    pub throttle_step: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Editor
            build_grid_size: BUILD_GRID_SIZE,
            build_area_boundary: BUILD_AREA_BOUNDARY,
            build_max_undo: BUILD_MAX_UNDO,
            // Gravity & atmosphere
            gravity_const: GRAVITY_CONST,
            atmosphere_drag: ATMOSPHERE_DRAG,
            // Terrain sectors
            sector_size: SECTOR_SIZE,
            sector_sample_inc: SECTOR_SAMPLE_INC,
            sector_amount: SECTOR_AMOUNT,
            sector_floor_margin: SECTOR_FLOOR_MARGIN,
            sector_flush_threshold: SECTOR_FLUSH_THRESHOLD,
            sector_flush_chance: SECTOR_FLUSH_CHANCE,
            sector_activation_margin: SECTOR_ACTIVATION_MARGIN,
            graphic_sector_size: GRAPHIC_SECTOR_SIZE,
            graphic_sector_retention: GRAPHIC_SECTOR_RETENTION,
            // Rocket
            launch_pad_x: LAUNCH_PAD_X,
            launch_pad_y: LAUNCH_PAD_Y,
            throttle_step: THROTTLE_STEP,
        }
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are logged
/// but do not abort the game.  A missing file is silently ignored (defaults
/// are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("No {path} found; using compiled defaults");
        }
    }
}
