//! Rotation and mirroring of a part selection around its shared pivot.
//!
//! Parts only ever rotate in 90° steps, so the rotation transform is the
//! closed-form quadrant shortcut `(x, y) → (-(y - cy) + cx, (x - cx) + cy)`
//! rather than a trig rotation matrix — no trigonometric rounding error to
//! re-snap away.  Arbitrary input angles are normalized and decomposed into
//! repeated 90° applications.
//!
//! After transforming, the group is re-aligned to the grid as a rigid body:
//! one correction delta is computed from the extremal-footprint parts and
//! applied to every part, so relative offsets inside the selection survive
//! exactly.  Snapping each part independently would tear the group apart at
//! sub-grid-multiple boundaries.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::Vec2;

use crate::constants::{is_180_rotation, normalize_angle};

use super::build::PlacedPart;
use super::snap::{snap_to_grid, SnapMode};
use super::EditorState;

/// Shared pivot and snap granularity for a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionData {
    /// Arithmetic mean of part centers, rounded to whole pixels.
    pub center: Vec2,
    /// Coarsest snap multiplier present in the selection, per axis.  Snapping
    /// the group to anything finer would misalign its coarsest member.
    pub largest_snap: Vec2,
}

/// Compute the pivot and snap data for a set of parts.
pub fn selection_data(parts: &[&PlacedPart]) -> SelectionData {
    let mut center = Vec2::ZERO;
    let mut largest_snap = Vec2::ZERO;

    for part in parts {
        center += Vec2::new(part.x, part.y);
        largest_snap.x = largest_snap.x.max(part.snap_x());
        largest_snap.y = largest_snap.y.max(part.snap_y());
    }

    center = (center / parts.len() as f32).round();
    SelectionData {
        center,
        largest_snap,
    }
}

/// Rotate the selected parts by an angle; records one undo state.
/// Silently no-ops when nothing is selected.
pub fn rotate_selection(editor: &mut EditorState, angle: f32) {
    let indices: Vec<usize> = selected_indices(&editor.build);
    if indices.is_empty() {
        return;
    }
    rotate_parts(&mut editor.build, &indices, angle);
    editor.push_state();
}

/// Mirror the selected parts across their center; records one undo state.
/// `vertical = true` flips y, otherwise x.  Silently no-ops when empty.
pub fn mirror_selection(editor: &mut EditorState, vertical: bool) {
    let indices: Vec<usize> = selected_indices(&editor.build);
    if indices.is_empty() {
        return;
    }
    mirror_parts(&mut editor.build, &indices, vertical);
    editor.push_state();
}

fn selected_indices(build: &[PlacedPart]) -> Vec<usize> {
    build
        .iter()
        .enumerate()
        .filter(|(_, p)| p.selected)
        .map(|(i, _)| i)
        .collect()
}

/// Rotate `indices` of `build` by an arbitrary angle.
///
/// The angle is normalized into [0, 2π) and applied as repeated 90°
/// quantized steps with a final ≤ 90° remainder.  A normalized angle of
/// exactly 0 is a no-op.
pub fn rotate_parts(build: &mut [PlacedPart], indices: &[usize], angle: f32) {
    let mut angle = normalize_angle(angle);
    if indices.is_empty() || angle == 0.0 {
        return;
    }
    while angle > FRAC_PI_2 {
        angle -= FRAC_PI_2;
        rotate_once(build, indices, FRAC_PI_2);
    }
    rotate_once(build, indices, angle);
}

/// One 90°-quantized rotation application about the selection pivot.
fn rotate_once(build: &mut [PlacedPart], indices: &[usize], angle: f32) {
    let parts: Vec<&PlacedPart> = indices.iter().map(|&i| &build[i]).collect();
    let SelectionData {
        center,
        largest_snap,
    } = selection_data(&parts);

    // Dry run: rotate each part to find the extremal post-rotation footprints
    // and where they land.  These anchor the group's single grid correction.
    let mut largest_width = (0.0_f32, 0.0_f32); // (width, rotated x)
    let mut largest_height = (0.0_f32, 0.0_f32); // (height, rotated y)

    for &i in indices {
        let part = &build[i];
        let rotated = rotate_point_90(part.x, part.y, center);
        let next_rotation = normalize_angle(part.rotation + angle);
        let (w, h) = footprint_at(part, next_rotation);

        if w > largest_width.0 {
            largest_width = (w, rotated.x);
        }
        if h > largest_height.0 {
            largest_height = (h, rotated.y);
        }
    }

    let delta = snap_correction(largest_width, largest_height, largest_snap);

    // Rotate for real: every part gets the same correction, so the group
    // moves as a rigid body.
    for &i in indices {
        let part = &mut build[i];
        let rotated = rotate_point_90(part.x, part.y, center);
        part.move_to(rotated.x + delta.x, rotated.y + delta.y);
        part.rotation = normalize_angle(part.rotation + angle);
    }
}

/// Mirror `indices` of `build` across the selection center on one axis.
///
/// Rotation angles are deliberately left unchanged: mirrored parts are only
/// repositioned, not visually flipped.
pub fn mirror_parts(build: &mut [PlacedPart], indices: &[usize], vertical: bool) {
    if indices.is_empty() {
        return;
    }
    let parts: Vec<&PlacedPart> = indices.iter().map(|&i| &build[i]).collect();
    let SelectionData {
        center,
        largest_snap,
    } = selection_data(&parts);

    let mut largest_width = (0.0_f32, 0.0_f32);
    let mut largest_height = (0.0_f32, 0.0_f32);

    for &i in indices {
        let part = &build[i];
        let mirrored = mirror_point(part.x, part.y, center, vertical);
        let (w, h) = (part.real_width(), part.real_height());

        if w > largest_width.0 {
            largest_width = (w, mirrored.x);
        }
        if h > largest_height.0 {
            largest_height = (h, mirrored.y);
        }
    }

    let delta = snap_correction(largest_width, largest_height, largest_snap);

    for &i in indices {
        let part = &mut build[i];
        let mirrored = mirror_point(part.x, part.y, center, vertical);
        part.move_to(mirrored.x + delta.x, mirrored.y + delta.y);
    }
}

/// The +90° quadrant rotation of a point about a pivot.
fn rotate_point_90(x: f32, y: f32, center: Vec2) -> Vec2 {
    Vec2::new(-(y - center.y) + center.x, (x - center.x) + center.y)
}

/// Reflect a point across the pivot on one axis.
fn mirror_point(x: f32, y: f32, center: Vec2, vertical: bool) -> Vec2 {
    if vertical {
        Vec2::new(x, 2.0 * center.y - y)
    } else {
        Vec2::new(2.0 * center.x - x, y)
    }
}

/// Footprint of a part at a hypothetical rotation.
fn footprint_at(part: &PlacedPart, rotation: f32) -> (f32, f32) {
    if is_180_rotation(rotation) {
        (part.width, part.height)
    } else {
        (part.height, part.width)
    }
}

/// Grid-alignment delta for the whole group, anchored on the extremal parts.
fn snap_correction(
    largest_width: (f32, f32),
    largest_height: (f32, f32),
    largest_snap: Vec2,
) -> Vec2 {
    let anchor = Vec2::new(
        largest_width.1 + largest_width.0 / 2.0,
        largest_height.1 + largest_height.0 / 2.0,
    );
    let snapped = snap_to_grid(
        anchor.x,
        anchor.y,
        largest_snap.x,
        largest_snap.y,
        SnapMode::Round,
    );
    snapped - anchor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PartCatalog;
    use crate::editor::build::add_part;
    use std::f32::consts::PI;

    fn editor_with_parts(positions: &[(f32, f32)]) -> (EditorState, PartCatalog) {
        let mut editor = EditorState::default();
        let catalog = PartCatalog::builtin().unwrap();
        editor.current_select_build = Some("FuelTankNormal".into());
        for &(x, y) in positions {
            assert!(add_part(&mut editor, &catalog, x, y, 0.0, false, true));
        }
        for part in &mut editor.build {
            part.selected = true;
        }
        (editor, catalog)
    }

    #[test]
    fn selection_data_averages_and_takes_coarsest_snap() {
        let (editor, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 200.0)]);
        let parts: Vec<&PlacedPart> = editor.build.iter().collect();
        let data = selection_data(&parts);
        let expected = Vec2::new(
            ((editor.build[0].x + editor.build[1].x) / 2.0).round(),
            ((editor.build[0].y + editor.build[1].y) / 2.0).round(),
        );
        assert_eq!(data.center, expected);
        assert_eq!(data.largest_snap, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn rotation_round_trips_after_four_quarter_turns() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 60.0), (200.0, 200.0)]);
        let original: Vec<(f32, f32, f32)> =
            editor.build.iter().map(|p| (p.x, p.y, p.rotation)).collect();

        for _ in 0..4 {
            rotate_selection(&mut editor, FRAC_PI_2);
        }

        for (part, &(x, y, r)) in editor.build.iter().zip(&original) {
            assert!(
                (part.x - x).abs() <= 1.0 && (part.y - y).abs() <= 1.0,
                "part {} drifted: ({}, {}) vs ({x}, {y})",
                part.uid,
                part.x,
                part.y
            );
            let dr = normalize_angle(part.rotation - r);
            assert!(
                dr.abs() < 1e-4 || (dr - 2.0 * PI).abs() < 1e-4,
                "rotation did not return mod 2π: {dr}"
            );
        }
    }

    #[test]
    fn rotation_preserves_pairwise_offsets() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 60.0), (60.0, 200.0)]);
        let before: Vec<Vec2> = editor.build.iter().map(|p| Vec2::new(p.x, p.y)).collect();

        rotate_selection(&mut editor, FRAC_PI_2);

        let after: Vec<Vec2> = editor.build.iter().map(|p| Vec2::new(p.x, p.y)).collect();
        // Under a rigid +90° rotation, the pairwise delta (dx, dy) maps to
        // (-dy, dx) exactly — the shared snap correction cancels.
        for i in 0..before.len() {
            for j in (i + 1)..before.len() {
                let d0 = before[j] - before[i];
                let d1 = after[j] - after[i];
                assert!(
                    (d1.x + d0.y).abs() < 1e-3 && (d1.y - d0.x).abs() < 1e-3,
                    "pair ({i},{j}) sheared: {d0:?} → {d1:?}"
                );
            }
        }
    }

    #[test]
    fn rotated_parts_swap_footprint() {
        let mut editor = EditorState::default();
        let catalog = PartCatalog::builtin().unwrap();
        editor.current_select_build = Some("FuelTankTall".into());
        assert!(add_part(&mut editor, &catalog, 60.0, 60.0, 0.0, false, true));
        editor.build[0].selected = true;
        let (w0, h0) = (editor.build[0].real_width(), editor.build[0].real_height());

        rotate_selection(&mut editor, FRAC_PI_2);

        assert_eq!(editor.build[0].real_width(), h0);
        assert_eq!(editor.build[0].real_height(), w0);
    }

    #[test]
    fn full_turn_decomposes_to_identity_rotation() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 60.0)]);
        let before: Vec<(f32, f32)> = editor.build.iter().map(|p| (p.x, p.y)).collect();

        rotate_selection(&mut editor, 2.0 * PI);

        for (part, &(x, y)) in editor.build.iter().zip(&before) {
            assert!((part.x - x).abs() <= 1.0 && (part.y - y).abs() <= 1.0);
            assert!(part.rotation.abs() < 1e-4 || (part.rotation - 2.0 * PI).abs() < 1e-4);
        }
    }

    #[test]
    fn negative_quarter_turn_equals_three_positive_turns() {
        let (mut editor_a, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 200.0)]);
        let (mut editor_b, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 200.0)]);

        rotate_selection(&mut editor_a, -FRAC_PI_2);
        for _ in 0..3 {
            rotate_selection(&mut editor_b, FRAC_PI_2);
        }

        for (a, b) in editor_a.build.iter().zip(editor_b.build.iter()) {
            assert!((a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3);
            assert!((normalize_angle(a.rotation - b.rotation)).abs() < 1e-4);
        }
    }

    #[test]
    fn rotate_with_empty_selection_is_a_noop() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0)]);
        for part in &mut editor.build {
            part.selected = false;
        }
        let before = editor.build.clone();
        let depth = editor.stack.len();

        rotate_selection(&mut editor, FRAC_PI_2);

        assert_eq!(editor.build, before);
        assert_eq!(editor.stack.len(), depth, "no-op must not record history");
    }

    #[test]
    fn vertical_mirror_flips_y_and_keeps_rotation() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0), (60.0, 300.0)]);
        let ys: Vec<f32> = editor.build.iter().map(|p| p.y).collect();
        let rotations: Vec<f32> = editor.build.iter().map(|p| p.rotation).collect();

        mirror_selection(&mut editor, true);

        // The two parts swap vertical order; x is untouched.
        assert!(editor.build[0].y > editor.build[1].y, "order must flip");
        assert_eq!(editor.build[0].x, 78.0);
        let span_before = (ys[1] - ys[0]).abs();
        let span_after = (editor.build[1].y - editor.build[0].y).abs();
        assert!((span_before - span_after).abs() < 1e-3, "span preserved");
        for (part, r) in editor.build.iter().zip(&rotations) {
            assert_eq!(part.rotation, *r, "mirroring must not change rotation");
        }
    }

    #[test]
    fn horizontal_mirror_flips_x_only() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0), (300.0, 60.0)]);
        let before: Vec<Vec2> = editor.build.iter().map(|p| Vec2::new(p.x, p.y)).collect();

        mirror_selection(&mut editor, false);

        assert!(editor.build[0].x > editor.build[1].x);
        for (part, v) in editor.build.iter().zip(&before) {
            assert_eq!(part.y, v.y, "vertical position untouched by horizontal mirror");
        }
    }

    #[test]
    fn double_mirror_restores_positions() {
        let (mut editor, _) = editor_with_parts(&[(60.0, 60.0), (200.0, 150.0)]);
        let before: Vec<Vec2> = editor.build.iter().map(|p| Vec2::new(p.x, p.y)).collect();

        mirror_selection(&mut editor, true);
        mirror_selection(&mut editor, true);

        for (part, v) in editor.build.iter().zip(&before) {
            assert!(
                (part.x - v.x).abs() <= 1.0 && (part.y - v.y).abs() <= 1.0,
                "double mirror drifted: ({}, {}) vs {v:?}",
                part.x,
                part.y
            );
        }
    }
}
