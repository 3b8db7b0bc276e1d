//! Terrain models: surface height and biome as pure functions of angle.
//!
//! A planet's surface is `height_at(angle) → radial distance` plus
//! `biome_at(angle) → biome`.  Both must be pure and total over every real
//! angle input (periodic with period 2π; unnormalized input is fine).  No
//! continuity is guaranteed across biome boundaries — a large discontinuity
//! simply manifests as a cliff, which the mountain biome leans into.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use std::f32::consts::{PI, TAU};

use crate::constants::{meters_to_px, normalize_angle};

/// Surface classification, keyed by angle around the planet.
///
/// Friction pairs feed straight into the sector colliders, so a biome choice
/// is felt physically: ice barely grips, mountains bite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    /// Flat icy terrain, very low friction.
    Polar,
    /// Rough rocky / frozen surface.  Somewhat low friction, still rough.
    Tundra,
    /// Very rough and high terrain, somewhat high friction.
    Mountain,
    /// Default lowland.
    Flat,
}

impl Biome {
    /// Kinetic friction for sector colliders in this biome.
    pub fn friction(self) -> f32 {
        match self {
            Biome::Polar => 0.01,
            Biome::Tundra => 0.06,
            Biome::Mountain => 0.15,
            Biome::Flat => 0.1,
        }
    }

    /// Static friction for sector colliders in this biome.
    pub fn friction_static(self) -> f32 {
        match self {
            Biome::Polar => 0.05,
            Biome::Tundra => 0.4,
            Biome::Mountain => 0.6,
            Biome::Flat => 0.5,
        }
    }

    /// Surface temperature (K); informational.
    pub fn temperature(self) -> f32 {
        match self {
            Biome::Polar => -40.0 + 273.15,
            Biome::Tundra => -20.0 + 273.15,
            Biome::Mountain => 3.0 + 273.15,
            Biome::Flat => 15.0 + 273.15,
        }
    }
}

/// A planet's surface model.
///
/// Implementations must be pure: no side effects, defined for all angles.
pub trait TerrainModel: Send + Sync {
    /// Radial distance from the planet center to the surface at `angle` (px).
    fn height_at(&self, angle: f32) -> f32;

    /// Biome at `angle`.
    fn biome_at(&self, angle: f32) -> Biome;
}

/// Is `angle` (rad, any value) within `[lo, hi]` degrees after normalizing?
fn angle_between_deg(angle: f32, lo: f32, hi: f32) -> bool {
    let deg = normalize_angle(angle) / PI * 180.0;
    lo <= deg && deg <= hi
}

/// Triangle wave with period 2π and range [0, 1].
fn triangle_wave(x: f32) -> f32 {
    2.0 * (x / TAU - (x / TAU + 0.5).floor()).abs()
}

// ── Earth ─────────────────────────────────────────────────────────────────────

/// Procedural Earth surface: polar caps, tundra bands, two mountain ranges,
/// flat lowland everywhere else.
pub struct EarthTerrain {
    radius: f32,
    noise: FastNoiseLite,
}

impl EarthTerrain {
    pub fn new(radius: f32, seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        Self { radius, noise }
    }

    /// Perlin sample mapped into [0, 1].
    fn noise01(&self, t: f32) -> f32 {
        (self.noise.get_noise_2d(t, 0.0) + 1.0) * 0.5
    }
}

impl TerrainModel for EarthTerrain {
    fn height_at(&self, angle: f32) -> f32 {
        match self.biome_at(angle) {
            Biome::Polar => self.radius + meters_to_px(100.0),
            Biome::Tundra => self.radius + meters_to_px(40.0) * self.noise01(10_000.0 * angle),
            Biome::Mountain => {
                // Zero the envelope at the range edges so mountains rise out
                // of the surrounding terrain instead of starting on a cliff.
                let dtheta = if angle_between_deg(angle, 130.0, 145.0) {
                    130.0 / 180.0 * PI
                } else {
                    310.0 / 180.0 * PI
                };
                // Larger multiplier = more peaks across the range.
                let envelope = triangle_wave(150.0 * (angle - dtheta)).abs();

                self.radius
                    + meters_to_px(12_000.0) * self.noise01(100.0 * angle) * envelope
                    + meters_to_px(500.0) * self.noise01(10_000.0 * angle) * envelope
            }
            Biome::Flat => self.radius,
        }
    }

    fn biome_at(&self, angle: f32) -> Biome {
        if angle_between_deg(angle, 80.0, 100.0) || angle_between_deg(angle, 260.0, 280.0) {
            return Biome::Polar;
        }
        if angle_between_deg(angle, 70.0, 110.0) || angle_between_deg(angle, 250.0, 290.0) {
            return Biome::Tundra;
        }
        if angle_between_deg(angle, 130.0, 145.0) || angle_between_deg(angle, 310.0, 330.0) {
            return Biome::Mountain;
        }
        Biome::Flat
    }
}

/// Simplest possible surface: a sine ripple around a base radius.
/// Used as the template for moons and test planets.
pub struct SinusoidTerrain {
    pub radius: f32,
    pub amplitude: f32,
}

impl TerrainModel for SinusoidTerrain {
    fn height_at(&self, angle: f32) -> f32 {
        self.radius + (angle * 10.0).sin() * self.amplitude
    }

    fn biome_at(&self, _angle: f32) -> Biome {
        Biome::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> EarthTerrain {
        EarthTerrain::new(meters_to_px(1_274_000.0), 1337)
    }

    #[test]
    fn biome_bands_cover_expected_angles() {
        let e = earth();
        assert_eq!(e.biome_at(90.0_f32.to_radians()), Biome::Polar);
        assert_eq!(e.biome_at(75.0_f32.to_radians()), Biome::Tundra);
        assert_eq!(e.biome_at(137.0_f32.to_radians()), Biome::Mountain);
        assert_eq!(e.biome_at(0.0), Biome::Flat);
        assert_eq!(e.biome_at(200.0_f32.to_radians()), Biome::Flat);
    }

    #[test]
    fn polar_band_shadows_the_wider_tundra_band() {
        // 80–100° satisfies both predicates; polar wins by check order.
        let e = earth();
        assert_eq!(e.biome_at(85.0_f32.to_radians()), Biome::Polar);
        assert_eq!(e.biome_at(105.0_f32.to_radians()), Biome::Tundra);
    }

    #[test]
    fn height_is_pure_and_periodic_friendly() {
        let e = earth();
        for angle in [0.0, 1.0, 90.0_f32.to_radians(), -3.0, 17.5] {
            assert_eq!(e.height_at(angle), e.height_at(angle), "must be deterministic");
        }
        // Unnormalized input maps to the same biome as its normalized twin.
        assert_eq!(e.biome_at(90.0_f32.to_radians() + TAU), Biome::Polar);
        assert_eq!(e.biome_at(90.0_f32.to_radians() - TAU), Biome::Polar);
    }

    #[test]
    fn polar_cap_is_flat_and_raised() {
        let e = earth();
        let h1 = e.height_at(85.0_f32.to_radians());
        let h2 = e.height_at(95.0_f32.to_radians());
        assert_eq!(h1, h2, "polar cap has constant height");
        assert!(h1 > e.radius, "cap sits above the base radius");
    }

    #[test]
    fn flat_biome_is_exactly_the_radius() {
        let e = earth();
        assert_eq!(e.height_at(0.0), e.radius);
    }

    #[test]
    fn mountains_rise_above_lowland() {
        let e = earth();
        let peak = (0..200)
            .map(|i| e.height_at((130.0 + i as f32 * 0.075).to_radians()))
            .fold(0.0_f32, f32::max);
        assert!(
            peak > e.radius + meters_to_px(100.0),
            "mountain range should clear the polar cap height, got {peak}"
        );
    }

    #[test]
    fn tundra_stays_within_its_noise_band() {
        let e = earth();
        for i in 0..100 {
            let angle = (70.0 + i as f32 * 0.09).to_radians();
            let h = e.height_at(angle);
            assert!(
                h >= e.radius && h <= e.radius + meters_to_px(40.0),
                "tundra height {h} outside [radius, radius + 40 m]"
            );
        }
    }

    #[test]
    fn triangle_wave_is_periodic_and_bounded() {
        for i in 0..50 {
            let x = i as f32 * 0.7 - 10.0;
            let v = triangle_wave(x);
            assert!((0.0..=1.0).contains(&v), "value {v} at {x}");
            assert!((triangle_wave(x + TAU) - v).abs() < 1e-4, "period 2π");
        }
        assert!(triangle_wave(0.0).abs() < 1e-6);
        assert!((triangle_wave(PI) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn biome_friction_pairs_are_ordered_sensibly() {
        assert!(Biome::Polar.friction() < Biome::Flat.friction());
        assert!(Biome::Mountain.friction() > Biome::Flat.friction());
        for b in [Biome::Polar, Biome::Tundra, Biome::Mountain, Biome::Flat] {
            assert!(b.friction() < b.friction_static(), "{b:?} static ≥ kinetic");
        }
    }

    #[test]
    fn sinusoid_oscillates_around_radius() {
        let s = SinusoidTerrain {
            radius: 1000.0,
            amplitude: 100.0,
        };
        let mut above = false;
        let mut below = false;
        for i in 0..100 {
            let h = s.height_at(i as f32 * 0.1);
            above |= h > 1000.0;
            below |= h < 1000.0;
        }
        assert!(above && below);
    }
}
