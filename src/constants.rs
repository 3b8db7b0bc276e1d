//! Centralised physics, editor and terrain constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes the observable consequence of changing it.  Runtime
//! overrides come from `assets/game.toml` via [`crate::config::GameConfig`];
//! this file remains the authoritative default source.

use std::f32::consts::PI;

// ── Unit conversion ───────────────────────────────────────────────────────────

/// World pixels per metre.  10 px = 1 m; one build-grid cell is ~5.2 m.
pub const PIXELS_PER_METER: f32 = 10.0;

/// Divisor converting kilograms to world mass units.
///
/// Planetary masses are astronomically large; dividing keeps them inside the
/// comfortable f32 range for the force integrator.
pub const KG_PER_WORLD_MASS: f32 = 5.972e14;

/// Convert metres to world pixels.
pub const fn meters_to_px(m: f32) -> f32 {
    m * PIXELS_PER_METER
}

// ── Editor: build grid ────────────────────────────────────────────────────────

/// Side length of one build-grid cell (px).
///
/// Every part dimension in the catalog is a multiple or simple fraction of
/// this.  Changing it rescales the whole editor coordinate space.
pub const BUILD_GRID_SIZE: f32 = 52.0;

/// Half-extent of the editable build area (px).  Parts nudged past this are
/// snapped back by the controller.
pub const BUILD_AREA_BOUNDARY: f32 = BUILD_GRID_SIZE * 20.0;

/// Maximum retained undo states.  Oldest states are evicted beyond this.
pub const BUILD_MAX_UNDO: usize = 30;

/// Inward erosion (px) applied to both AABBs in the placement overlap test so
/// adjacent parts may share an edge without being rejected.
pub const PLACEMENT_EROSION: f32 = 1.0;

// ── Physics: gravity & atmosphere ─────────────────────────────────────────────

/// Gravitational constant for the planet↔rocket force law
/// `F = G · M · m / r²`.
///
/// Higher values pull rockets down harder everywhere.  At 2000 a default
/// rocket at the Earth surface radius feels roughly 1 g.
pub const GRAVITY_CONST: f32 = 2000.0;

/// Linear damping applied to a rocket inside an atmosphere shell.
/// Outside every atmosphere the damping is exactly 0.
pub const ATMOSPHERE_DRAG: f32 = 0.01;

// ── Terrain sectors ───────────────────────────────────────────────────────────

/// Angular span of one collision sector (rad).
///
/// At the Earth radius this is roughly 1.6 km of arc per sector.  Smaller
/// sectors mean finer-grained windowing but more body churn.
pub const SECTOR_SIZE: f32 = 0.523599 / 40960.0 * 10.0;

/// Angular increment between terrain height samples within a sector (rad).
/// Smaller = smoother collision geometry, more vertices per body.
pub const SECTOR_SAMPLE_INC: f32 = 0.00001;

/// Window half-width in sectors kept active around the tracked rocket.
pub const SECTOR_AMOUNT: i64 = 2;

/// How far (px) below the lowest sampled terrain height the sector floor edge
/// sits.  Keeps the polygon closed and strictly below the surface.
pub const SECTOR_FLOOR_MARGIN: f32 = 200.0;

/// Pending-removal queue length that forces a batched physics-world flush.
pub const SECTOR_FLUSH_THRESHOLD: usize = 30;

/// Per-tick probability of flushing the pending-removal queue early, so quiet
/// frames still drain the queue eventually.
pub const SECTOR_FLUSH_CHANCE: f64 = 0.05;

/// Distance margin (px) beyond the planet radius at which sector windowing
/// activates for a tracked rocket.
pub const SECTOR_ACTIVATION_MARGIN: f32 = 10_000.0;

/// Angular span of one graphical terrain tile (rad).  Independent of the
/// collision sector size; tiles are pure rendering side-effects.
pub const GRAPHIC_SECTOR_SIZE: f32 = 0.523599 / 40960.0 * 200.0;

/// Graphic tile retention radius, in multiples of [`GRAPHIC_SECTOR_SIZE`].
pub const GRAPHIC_SECTOR_RETENTION: f32 = 7.0;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Zoom bounds for the editor camera (projection scale; smaller = closer).
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 4.0;

// ── Rocket ────────────────────────────────────────────────────────────────────

/// Launch pad world coordinates a freshly constructed rocket is moved to.
pub const LAUNCH_PAD_X: f32 = 90.0;
pub const LAUNCH_PAD_Y: f32 = -100.0;

/// Throttle change per key press (0–1 scale).
pub const THROTTLE_STEP: f32 = 0.1;

// ── Angles ────────────────────────────────────────────────────────────────────

/// Normalize an angle into [0, 2π).
pub fn normalize_angle(mut angle: f32) -> f32 {
    let two_pi = 2.0 * PI;
    while angle < 0.0 {
        angle += two_pi;
    }
    while angle >= two_pi {
        angle -= two_pi;
    }
    angle
}

/// True when a rotation is an even multiple of 90° (0° or 180°), i.e. the
/// part's width/height are NOT swapped.
pub fn is_180_rotation(rotation: f32) -> bool {
    ((rotation / (PI / 2.0)).round() as i64).rem_euclid(2) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_angle_wraps_negative_into_range() {
        let a = normalize_angle(-PI / 2.0);
        assert!((a - 3.0 * PI / 2.0).abs() < 1e-6, "got {a}");
    }

    #[test]
    fn normalize_angle_wraps_large_angles() {
        let a = normalize_angle(5.0 * PI);
        assert!((a - PI).abs() < 1e-5, "got {a}");
    }

    #[test]
    fn normalize_angle_identity_in_range() {
        assert_eq!(normalize_angle(1.0), 1.0);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn is_180_rotation_even_multiples() {
        assert!(is_180_rotation(0.0));
        assert!(is_180_rotation(PI));
        assert!(is_180_rotation(2.0 * PI));
        // Small float drift must not flip the answer
        assert!(is_180_rotation(PI + 1e-4));
    }

    #[test]
    fn is_180_rotation_odd_multiples() {
        assert!(!is_180_rotation(PI / 2.0));
        assert!(!is_180_rotation(3.0 * PI / 2.0));
        assert!(!is_180_rotation(-PI / 2.0));
    }
}
