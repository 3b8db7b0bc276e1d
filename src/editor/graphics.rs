//! Editor rendering glue: mirrors the build list into sprite entities.
//!
//! The manipulation engine never touches rendering.  Each frame this module
//! reconciles sprites against the build list by part uid — spawn what is
//! missing, move/retint what exists, despawn what is gone — and draws the
//! transient feedback (ghost part, selection rectangle, build grid).

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::catalog::PartCatalog;
use crate::constants::{BUILD_AREA_BOUNDARY, BUILD_GRID_SIZE};

use super::controller::{cursor_world, PointerDrag};
use super::EditorState;

/// Tint for selected parts and the selection rectangle.
const SELECT_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);

/// Sprite entity mirroring one placed part, keyed by its uid.
#[derive(Component, Debug, Clone, Copy)]
pub struct PartSprite(pub u64);

/// The semi-transparent preview of the part pending placement.
#[derive(Component, Debug, Clone, Copy)]
pub struct GhostIcon;

/// The translucent drag-select rectangle.
#[derive(Component, Debug, Clone, Copy)]
pub struct SelectionRectangle;

/// Reconcile sprite entities with the build list.
pub fn sync_part_sprites_system(
    mut commands: Commands,
    editor: Res<EditorState>,
    catalog: Res<PartCatalog>,
    asset_server: Res<AssetServer>,
    mut sprites: Query<(Entity, &PartSprite, &mut Transform, &mut Sprite)>,
) {
    let mut by_uid: HashMap<u64, &super::build::PlacedPart> =
        editor.build.iter().map(|p| (p.uid, p)).collect();

    // Update or despawn existing sprites.
    for (entity, marker, mut transform, mut sprite) in sprites.iter_mut() {
        match by_uid.remove(&marker.0) {
            Some(part) => {
                transform.translation = Vec3::new(part.x, part.y, 1.0);
                transform.rotation = Quat::from_rotation_z(part.rotation);
                sprite.color = if part.selected {
                    SELECT_COLOR
                } else {
                    Color::WHITE
                };
            }
            None => commands.entity(entity).despawn(),
        }
    }

    // Whatever remains has no sprite yet.
    for (uid, part) in by_uid {
        let Some(entry) = catalog.get(&part.id) else {
            continue;
        };
        commands.spawn((
            PartSprite(uid),
            Sprite {
                image: asset_server.load(entry.image_path.clone()),
                custom_size: Some(Vec2::new(part.width, part.height)),
                ..default()
            },
            Transform::from_translation(Vec3::new(part.x, part.y, 1.0))
                .with_rotation(Quat::from_rotation_z(part.rotation)),
        ));
    }
}

/// Keep the ghost preview of the pending part under the cursor.
pub fn ghost_icon_system(
    mut commands: Commands,
    editor: Res<EditorState>,
    catalog: Res<PartCatalog>,
    asset_server: Res<AssetServer>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut ghosts: Query<(Entity, &mut Transform, &mut Sprite), With<GhostIcon>>,
) {
    let at = windows
        .single()
        .ok()
        .zip(cameras.single().ok())
        .and_then(|(window, (camera, camera_transform))| {
            cursor_world(window, camera, camera_transform)
        });

    let pending = editor
        .current_select_build
        .as_deref()
        .and_then(|id| catalog.get(id));

    match (pending, at) {
        (Some(entry), Some(at)) => {
            let rotation = FRAC_PI_2 * editor.placement_rotation as f32;
            match ghosts.single_mut() {
                Ok((_, mut transform, mut sprite)) => {
                    transform.translation = Vec3::new(at.x, at.y, 2.0);
                    transform.rotation = Quat::from_rotation_z(rotation);
                    sprite.image = asset_server.load(entry.image_path.clone());
                    sprite.custom_size = Some(Vec2::new(entry.width, entry.height));
                }
                Err(_) => {
                    commands.spawn((
                        GhostIcon,
                        Sprite {
                            image: asset_server.load(entry.image_path.clone()),
                            custom_size: Some(Vec2::new(entry.width, entry.height)),
                            color: Color::srgba(1.0, 1.0, 1.0, 0.5),
                            ..default()
                        },
                        Transform::from_translation(Vec3::new(at.x, at.y, 2.0))
                            .with_rotation(Quat::from_rotation_z(rotation)),
                    ));
                }
            }
        }
        _ => {
            for (entity, _, _) in ghosts.iter() {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Draw (and tear down) the drag-select rectangle while a swipe drag is live.
pub fn selection_rectangle_system(
    mut commands: Commands,
    editor: Res<EditorState>,
    drag: Res<PointerDrag>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut rectangles: Query<(Entity, &mut Transform, &mut Sprite), With<SelectionRectangle>>,
) {
    let live = editor.swipe && drag.dragging && buttons.pressed(MouseButton::Left);
    let corners = windows
        .single()
        .ok()
        .zip(cameras.single().ok())
        .and_then(|(window, (camera, camera_transform))| {
            Some((
                drag.down_world?,
                cursor_world(window, camera, camera_transform)?,
            ))
        });

    match (live, corners) {
        (true, Some((a, b))) => {
            let center = (a + b) / 2.0;
            let size = (a - b).abs().max(Vec2::splat(1.0));
            match rectangles.single_mut() {
                Ok((_, mut transform, mut sprite)) => {
                    transform.translation = center.extend(3.0);
                    sprite.custom_size = Some(size);
                }
                Err(_) => {
                    commands.spawn((
                        SelectionRectangle,
                        Sprite {
                            color: SELECT_COLOR.with_alpha(0.3),
                            custom_size: Some(size),
                            ..default()
                        },
                        Transform::from_translation(center.extend(3.0)),
                    ));
                }
            }
        }
        _ => {
            for (entity, _, _) in rectangles.iter() {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Faint build-grid lines over the editable area.
pub fn build_grid_gizmo_system(mut gizmos: Gizmos) {
    let bound = BUILD_AREA_BOUNDARY;
    let color = Color::srgba(0.87, 0.87, 0.87, 0.1);

    let mut i = -bound;
    while i <= bound {
        gizmos.line_2d(Vec2::new(i, -bound), Vec2::new(i, bound), color);
        gizmos.line_2d(Vec2::new(-bound, i), Vec2::new(bound, i), color);
        i += BUILD_GRID_SIZE;
    }
}

/// Despawn every editor-owned graphic when leaving the editor.
pub fn cleanup_editor_graphics(
    mut commands: Commands,
    sprites: Query<Entity, With<PartSprite>>,
    ghosts: Query<Entity, With<GhostIcon>>,
    rectangles: Query<Entity, With<SelectionRectangle>>,
) {
    for entity in sprites.iter().chain(ghosts.iter()).chain(rectangles.iter()) {
        commands.entity(entity).despawn();
    }
}
