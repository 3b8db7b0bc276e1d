//! Per-tick gravity and atmospheric drag integration.
//!
//! Newtonian-style attraction from every planet to every rocket,
//! `F = G · M · m / r²`, applied at the rocket's center of mass; plus an
//! altitude-gated air-friction coefficient from the first planet whose
//! atmosphere contains the rocket.  Runs after sector maintenance and before
//! thrust, chained in the flight schedule.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::GameConfig;

use super::planet::Planet;
use super::rocket::Rocket;

/// Zero rocket forces at the start of every flight frame.
///
/// Gravity and thrust both accumulate into `ExternalForce`; a single ordered
/// reset keeps the accumulation well-defined.
pub fn clear_rocket_forces_system(mut rockets: Query<&mut ExternalForce, With<Rocket>>) {
    for mut force in rockets.iter_mut() {
        force.force = Vec2::ZERO;
        force.torque = 0.0;
    }
}

/// Apply planet→rocket gravity to every pair.
pub fn gravity_system(
    config: Res<GameConfig>,
    planets: Query<(&Transform, &Planet)>,
    mut rockets: Query<(&Transform, &ReadMassProperties, &mut ExternalForce), With<Rocket>>,
) {
    for (rocket_transform, mass_props, mut force) in rockets.iter_mut() {
        let rocket_pos = rocket_transform.translation.truncate();

        for (planet_transform, planet) in planets.iter() {
            let planet_pos = planet_transform.translation.truncate();
            let dx = planet_pos.x - rocket_pos.x;
            let dy = planet_pos.y - rocket_pos.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq == 0.0 {
                continue;
            }

            let force_mag = config.gravity_const * planet.mass * mass_props.get().mass / dist_sq;
            let angle = dy.atan2(dx);
            force.force += Vec2::new(force_mag * angle.cos(), force_mag * angle.sin());
        }
    }
}

/// Set each rocket's air friction from the atmosphere it is inside, if any.
///
/// Only the first matching planet in iteration order contributes — no
/// summation across overlapping atmospheres.
pub fn atmosphere_drag_system(
    config: Res<GameConfig>,
    planets: Query<(&Transform, &Planet)>,
    mut rockets: Query<(&Transform, &mut Damping), With<Rocket>>,
) {
    for (rocket_transform, mut damping) in rockets.iter_mut() {
        let rocket_pos = rocket_transform.translation.truncate();
        damping.linear_damping = 0.0;

        for (planet_transform, planet) in planets.iter() {
            let distance = planet_transform.translation.truncate().distance(rocket_pos);
            if distance <= planet.radius + planet.atmosphere_height {
                damping.linear_damping = planet.drag_at(distance, config.atmosphere_drag);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The force law itself, extracted for direct verification.
    fn gravity_force(g: f32, planet_pos: Vec2, planet_mass: f32, rocket_pos: Vec2, rocket_mass: f32) -> Vec2 {
        let d = planet_pos - rocket_pos;
        let dist_sq = d.length_squared();
        let force_mag = g * planet_mass * rocket_mass / dist_sq;
        let angle = d.y.atan2(d.x);
        Vec2::new(force_mag * angle.cos(), force_mag * angle.sin())
    }

    #[test]
    fn force_points_from_rocket_toward_planet() {
        let planet_pos = Vec2::new(0.0, -1000.0);
        let rocket_pos = Vec2::new(90.0, -100.0);
        let f = gravity_force(2000.0, planet_pos, 1e8, rocket_pos, 3.0);

        let toward = planet_pos - rocket_pos;
        assert!(f.dot(toward) > 0.0, "force must pull toward the planet");
    }

    #[test]
    fn force_follows_inverse_square() {
        let planet_pos = Vec2::ZERO;
        let near = gravity_force(2000.0, planet_pos, 1e8, Vec2::new(1000.0, 0.0), 1.0);
        let far = gravity_force(2000.0, planet_pos, 1e8, Vec2::new(2000.0, 0.0), 1.0);
        let ratio = near.length() / far.length();
        assert!((ratio - 4.0).abs() < 1e-3, "doubling distance quarters force, got {ratio}");
    }

    #[test]
    fn force_scales_linearly_with_both_masses() {
        let planet_pos = Vec2::ZERO;
        let rocket_pos = Vec2::new(0.0, 1500.0);
        let base = gravity_force(2000.0, planet_pos, 1e8, rocket_pos, 1.0);
        let heavy = gravity_force(2000.0, planet_pos, 2e8, rocket_pos, 3.0);
        let ratio = heavy.length() / base.length();
        assert!((ratio - 6.0).abs() < 1e-3, "got {ratio}");
    }

    #[test]
    fn diagonal_force_components_match_the_angle() {
        let f = gravity_force(1.0, Vec2::new(100.0, 100.0), 1.0, Vec2::ZERO, 1.0);
        assert!((f.x - f.y).abs() < 1e-9, "45° pull has equal components");
        assert!(f.x > 0.0 && f.y > 0.0);
    }
}
