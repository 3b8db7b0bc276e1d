//! Rockets: constructed from an editor build, flown as one rigid body.
//!
//! The aggregate body is a single dynamic Rapier body with one cuboid
//! collider per part (a compound collider), so the physics engine sees the
//! merged footprint while the part list stays available for per-kind
//! behaviour.  Parts are plain data owned by the [`Rocket`] component; they
//! never outlive it and hold no back-reference to it.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::app_state::GameState;
use crate::catalog::{PartCatalog, PartKind};
use crate::config::GameConfig;
use crate::editor::build::PlacedPart;
use crate::editor::EditorState;

/// Matter-like default collider density: mass comes from footprint area, the
/// way the original bodies were massed, not from catalog kilograms.
const PART_COLLIDER_DENSITY: f32 = 0.001;

/// The editor asked for the current build to be launched.
#[derive(Message, Debug, Clone, Copy)]
pub struct LaunchRequest;

/// One part of a constructed rocket, in rocket-local coordinates.
#[derive(Debug, Clone)]
pub struct RocketPart {
    pub kind: PartKind,
    /// Offset of the part center from the aggregate center.
    pub offset: Vec2,
    /// Part-local rotation (rad).
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// Catalog mass (kg); bookkeeping data, not the physics mass.
    pub mass: f32,
}

/// A flyable rocket: ordered part list, control flag, throttle setting.
#[derive(Component, Debug, Clone)]
pub struct Rocket {
    pub parts: Vec<RocketPart>,
    /// Is this the rocket the player is flying?
    pub control: bool,
    /// Thrust setting in [0, 1].
    pub throttle: f32,
}

/// Convert a build list into rocket parts around their common center.
///
/// Returns `None` for an empty build — there is nothing to launch.
pub fn parts_from_build(build: &[PlacedPart], catalog: &PartCatalog) -> Option<Vec<RocketPart>> {
    if build.is_empty() {
        return None;
    }

    // Aggregate center = center of the parts' merged bounding box.
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for part in build {
        let (x1, y1, x2, y2) = part.bounds();
        min = min.min(Vec2::new(x1, y1));
        max = max.max(Vec2::new(x2, y2));
    }
    let center = (min + max) / 2.0;

    let parts = build
        .iter()
        .filter_map(|part| {
            let entry = catalog.get(&part.id)?;
            Some(RocketPart {
                kind: entry.kind.clone(),
                offset: Vec2::new(part.x, part.y) - center,
                rotation: part.rotation,
                width: part.width,
                height: part.height,
                mass: entry.mass,
            })
        })
        .collect();
    Some(parts)
}

/// Spawn the aggregate physics body for a part list at a position.
pub fn spawn_rocket(commands: &mut Commands, parts: Vec<RocketPart>, at: Vec2) -> Entity {
    let shapes: Vec<(Vec2, f32, Collider)> = parts
        .iter()
        .map(|part| {
            // Collider extents follow the unrotated footprint; the per-shape
            // rotation carries the part's orientation.
            (
                part.offset,
                part.rotation,
                Collider::cuboid(part.width / 2.0, part.height / 2.0),
            )
        })
        .collect();

    commands
        .spawn((
            Rocket {
                parts,
                control: true,
                throttle: 0.0,
            },
            RigidBody::Dynamic,
            Collider::compound(shapes),
            ColliderMassProperties::Density(PART_COLLIDER_DENSITY),
            ReadMassProperties::default(),
            Velocity::zero(),
            ExternalForce::default(),
            Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            Transform::from_translation(at.extend(0.1)),
            GlobalTransform::default(),
            Visibility::default(),
        ))
        .id()
}

/// Consume a [`LaunchRequest`]: construct the rocket from the current build,
/// reset the editor, move to the pad, and enter flight.
pub fn launch_system(
    mut commands: Commands,
    mut requests: MessageReader<LaunchRequest>,
    mut editor: ResMut<EditorState>,
    catalog: Res<PartCatalog>,
    config: Res<GameConfig>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let Some(parts) = parts_from_build(&editor.build, &catalog) else {
        return;
    };
    let count = parts.len();
    let pad = Vec2::new(config.launch_pad_x, config.launch_pad_y);
    spawn_rocket(&mut commands, parts, pad);

    // The build now lives in the simulation; the editor starts fresh.
    editor.reset();
    next_state.set(GameState::Flight);
    info!("Rocket launched with {count} parts");
}

/// Apply thrust from every thruster part of controlled rockets.
///
/// Thrust acts along the rocket's up axis and is applied at each thruster's
/// nozzle (the bottom edge of the part), so off-center engines produce the
/// torque you would expect.
pub fn thruster_system(
    mut rockets: Query<(
        &Rocket,
        &Transform,
        &ReadMassProperties,
        &mut ExternalForce,
    )>,
) {
    for (rocket, transform, mass_props, mut force) in rockets.iter_mut() {
        if !rocket.control || rocket.throttle <= 0.0 {
            continue;
        }
        let position = transform.translation.truncate();
        let rotation = transform.rotation;
        let up = (rotation * Vec3::Y).truncate();
        let center_of_mass =
            position + (rotation * mass_props.get().local_center_of_mass.extend(0.0)).truncate();

        for part in &rocket.parts {
            let magnitude = part.kind.thrust_force_at(rocket.throttle);
            if magnitude == 0.0 {
                continue;
            }
            let nozzle_local = part.offset - Vec2::new(0.0, part.height / 2.0);
            let nozzle = position + (rotation * nozzle_local.extend(0.0)).truncate();
            *force += ExternalForce::at_point(up * magnitude, nozzle, center_of_mass);
        }
    }
}

/// Throttle keys for the controlled rocket: ↑/↓ step, Z full, X cut.
pub fn throttle_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut rockets: Query<&mut Rocket>,
) {
    for mut rocket in rockets.iter_mut() {
        if !rocket.control {
            continue;
        }
        if keys.just_pressed(KeyCode::ArrowUp) {
            rocket.throttle = (rocket.throttle + config.throttle_step).min(1.0);
        }
        if keys.just_pressed(KeyCode::ArrowDown) {
            rocket.throttle = (rocket.throttle - config.throttle_step).max(0.0);
        }
        if keys.just_pressed(KeyCode::KeyZ) {
            rocket.throttle = 1.0;
        }
        if keys.just_pressed(KeyCode::KeyX) {
            rocket.throttle = 0.0;
        }
    }
}
