//! Planets and the sliding window of terrain collision sectors.
//!
//! A planet's full collision geometry at planetary radii is far too large to
//! keep in the physics world; instead a window of angular sectors around the
//! tracked rocket is materialized on demand and torn down as it drifts away,
//! bounding per-tick physics cost to O(window) regardless of circumference.
//!
//! Teardown is two-phase: an evicted sector's collider is disabled and the
//! entity queued immediately (so lookups no longer find it), but the actual
//! physics-world removal is batched — flushed when the queue passes a size
//! threshold or by a small per-tick chance — to avoid a cost spike when many
//! sectors churn at once during fast travel.

use std::collections::HashMap;
use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::{meters_to_px, KG_PER_WORLD_MASS};

use super::rocket::Rocket;
use super::terrain::{Biome, EarthTerrain, TerrainModel};

/// A planetary body: bulk physical data plus its surface model.
#[derive(Component)]
pub struct Planet {
    /// Nominal surface radius (px).
    pub radius: f32,
    /// Mass in world units.
    pub mass: f32,
    /// Atmosphere shell thickness above the radius (px); 0 = airless.
    pub atmosphere_height: f32,
    /// Pure surface height/biome model.
    pub surface: Box<dyn TerrainModel>,
}

impl Planet {
    /// Atmospheric drag coefficient at a radial distance from the center.
    /// Constant inside the shell, exactly 0 outside.
    pub fn drag_at(&self, distance: f32, drag: f32) -> f32 {
        if distance > self.radius + self.atmosphere_height {
            0.0
        } else {
            drag
        }
    }
}

/// Per-planet sector bookkeeping.
///
/// `sectors` holds only present-and-active buckets; an evicted bucket moves
/// to `pending_removal` and disappears from the map in the same tick.
#[derive(Component, Default)]
pub struct SectorWindow {
    pub sectors: HashMap<i64, Entity>,
    pub texture_sectors: HashMap<i64, Entity>,
    pub pending_removal: Vec<Entity>,
}

/// One terrain collision sector.
#[derive(Component, Debug, Clone, Copy)]
pub struct Sector {
    pub bucket: i64,
    pub biome: Biome,
    /// Informational: Rapier has a single friction coefficient, so the
    /// biome's static friction is carried here rather than on the collider.
    pub friction_static: f32,
}

/// One graphical terrain tile; rendering-only, never in the physics world.
#[derive(Component, Debug, Clone, Copy)]
pub struct GraphicSector {
    pub bucket: i64,
}

/// Startup: spawn Earth with its center one radius below the launch site.
pub fn spawn_earth(mut commands: Commands) {
    let radius = meters_to_px(1_274_000.0);
    let mass = 5.972e22 / KG_PER_WORLD_MASS;

    commands.spawn((
        Planet {
            radius,
            mass,
            atmosphere_height: meters_to_px(100_000.0),
            surface: Box::new(EarthTerrain::new(radius, 1337)),
        },
        SectorWindow::default(),
        Transform::from_translation(Vec3::new(0.0, -radius, 0.0)),
        GlobalTransform::default(),
    ));
    info!("Earth spawned (radius {radius} px)");
}

/// Position of the body the sector window tracks: the controlled rocket,
/// falling back to any rocket.
pub fn tracked_rocket_position(rockets: &Query<(&Transform, &Rocket)>) -> Option<Vec2> {
    let mut fallback = None;
    for (transform, rocket) in rockets.iter() {
        let pos = transform.translation.truncate();
        if rocket.control {
            return Some(pos);
        }
        fallback.get_or_insert(pos);
    }
    fallback
}

/// Shortest angular distance between two angles.
fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Maintain each planet's collision-sector window around the tracked rocket.
///
/// Runs before force integration so new sectors exist before gravity or
/// collisions can reference them.
pub fn update_sectors_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    rockets: Query<(&Transform, &Rocket)>,
    mut planets: Query<(&Transform, &Planet, &mut SectorWindow)>,
) {
    let Some(rocket_pos) = tracked_rocket_position(&rockets) else {
        return;
    };
    let mut rng = rand::thread_rng();

    for (planet_transform, planet, mut window) in planets.iter_mut() {
        let center = planet_transform.translation.truncate();

        // Windowing only matters near the surface.
        if center.distance(rocket_pos) >= planet.radius + config.sector_activation_margin {
            continue;
        }

        let angle = (rocket_pos.y - center.y).atan2(rocket_pos.x - center.x);
        let base = (angle / config.sector_size).floor() as i64;

        // Materialize every bucket in the window that isn't already active.
        for i in -config.sector_amount..=config.sector_amount {
            let bucket = base + i;
            if window.sectors.contains_key(&bucket) {
                continue;
            }
            let entity = spawn_sector(&mut commands, planet, center, bucket, &config);
            window.sectors.insert(bucket, entity);
        }

        // Evict buckets whose center drifted outside the retention radius.
        let retention = config.sector_size * config.sector_amount as f32;
        let stale: Vec<i64> = window
            .sectors
            .keys()
            .copied()
            .filter(|&bucket| {
                let bucket_center = (bucket as f32 + 0.5) * config.sector_size;
                angular_distance(angle, bucket_center) > retention
            })
            .collect();
        for bucket in stale {
            if let Some(entity) = window.sectors.remove(&bucket) {
                // Stop simulating now; the world removal comes with the batch.
                commands.entity(entity).insert(ColliderDisabled);
                window.pending_removal.push(entity);
            }
        }

        // Batched physical removal.
        if window.pending_removal.len() > config.sector_flush_threshold
            || rng.gen_bool(config.sector_flush_chance)
        {
            for entity in window.pending_removal.drain(..) {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Build and spawn the static collision body for one bucket.
fn spawn_sector(
    commands: &mut Commands,
    planet: &Planet,
    center: Vec2,
    bucket: i64,
    config: &GameConfig,
) -> Entity {
    let vertices = sector_vertices(
        planet.surface.as_ref(),
        bucket,
        config.sector_size,
        config.sector_sample_inc,
        config.sector_floor_margin,
    );
    let bucket_center_angle = (bucket as f32 + 0.5) * config.sector_size;
    let biome = planet.surface.biome_at(bucket_center_angle);

    commands
        .spawn((
            Sector {
                bucket,
                biome,
                friction_static: biome.friction_static(),
            },
            RigidBody::Fixed,
            Collider::polyline(vertices, None),
            Friction::coefficient(biome.friction()),
            Transform::from_translation(center.extend(0.0)),
            GlobalTransform::default(),
        ))
        .id()
}

/// Sample the terrain across a bucket's angular span and close the polygon
/// with a floor edge below the lowest sample.
///
/// Vertices are planet-local; the sector entity sits at the planet center.
pub fn sector_vertices(
    surface: &dyn TerrainModel,
    bucket: i64,
    sector_size: f32,
    sample_inc: f32,
    floor_margin: f32,
) -> Vec<Vec2> {
    let start = bucket as f32 * sector_size;
    let end = start + sector_size;

    let mut vertices = Vec::new();
    let mut min_height = f32::INFINITY;
    let mut angle = start;
    while angle < end {
        let height = surface.height_at(angle);
        min_height = min_height.min(height);
        vertices.push(Vec2::new(angle.cos() * height, angle.sin() * height));
        angle += sample_inc;
    }

    // Floor edge strictly below the surface, then close the loop.
    let floor = min_height - floor_margin;
    vertices.push(Vec2::new(end.cos() * floor, end.sin() * floor));
    vertices.push(Vec2::new(start.cos() * floor, start.sin() * floor));
    vertices.push(vertices[0]);
    vertices
}

/// Maintain the graphical tile window.  Pure rendering side-effects with an
/// independently parameterized, wider window; no physics membership, no
/// batched teardown.
pub fn update_graphic_sectors_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    rockets: Query<(&Transform, &Rocket)>,
    mut planets: Query<(&Transform, &Planet, &mut SectorWindow)>,
) {
    let Some(rocket_pos) = tracked_rocket_position(&rockets) else {
        return;
    };

    for (planet_transform, planet, mut window) in planets.iter_mut() {
        let center = planet_transform.translation.truncate();
        if center.distance(rocket_pos) >= planet.radius + config.sector_activation_margin {
            continue;
        }

        let angle = (rocket_pos.y - center.y).atan2(rocket_pos.x - center.x);
        let base = (angle / config.graphic_sector_size).floor() as i64;

        for i in -3..=3 {
            let bucket = base + i;
            if window.texture_sectors.contains_key(&bucket) {
                continue;
            }
            let tile_angle = (bucket as f32 + 0.5) * config.graphic_sector_size;
            let height = planet.surface.height_at(tile_angle);
            let entity = commands
                .spawn((
                    GraphicSector { bucket },
                    Transform::from_translation(
                        (center + Vec2::new(tile_angle.cos(), tile_angle.sin()) * height)
                            .extend(0.5),
                    ),
                    Visibility::default(),
                ))
                .id();
            window.texture_sectors.insert(bucket, entity);
        }

        let retention = config.graphic_sector_size * config.graphic_sector_retention;
        let stale: Vec<i64> = window
            .texture_sectors
            .keys()
            .copied()
            .filter(|&bucket| {
                let tile_center = (bucket as f32 + 0.5) * config.graphic_sector_size;
                angular_distance(angle, tile_center) > retention
            })
            .collect();
        for bucket in stale {
            if let Some(entity) = window.texture_sectors.remove(&bucket) {
                commands.entity(entity).despawn();
            }
        }
    }
}
