//! Rocket-part catalog.
//!
//! The catalog is the read-only source of truth for part physical data:
//! footprint, snapping, overlap policy, mass, drag and per-kind behaviour
//! data.  It is assembled once at startup from the built-in part set, with an
//! optional `assets/parts.toml` overlay, and never mutated afterwards.
//!
//! Part behaviour is a flat data-plus-kind model: [`PartKind`] is a closed sum
//! type carrying per-kind static data, and kind-specific behaviour lives in
//! small functions on it (no inheritance tree, no abstract bases — an
//! unconstructible base category is simply not representable).

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use crate::constants::BUILD_GRID_SIZE;
use crate::error::{GameError, GameResult};

/// Per-face drag multipliers for a part.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DragFaces {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Which kind of part this is, with kind-specific static data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum PartKind {
    /// Carries fuel; dead weight once drained.
    FuelTank {
        /// Fuel capacity (kg).
        fuel: f32,
    },
    /// Produces thrust along the rocket's axis.
    Thruster {
        /// Force magnitude at full throttle.
        thrust: f32,
        /// Fuel consumed per frame at full throttle (kg).
        burn_rate: f32,
    },
    /// Aerodynamic cap; no active behaviour.
    NoseCone,
}

impl PartKind {
    /// Thrust force magnitude this kind produces at the given throttle
    /// setting, or 0 for kinds that do not thrust.
    pub fn thrust_force_at(&self, throttle: f32) -> f32 {
        match self {
            PartKind::Thruster { thrust, .. } => thrust * throttle.clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// One immutable catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PartCatalogEntry {
    /// Unique part id, referenced by [`crate::editor::build::PlacedPart`].
    pub id: String,
    /// Footprint width at 0° rotation (px).
    pub width: f32,
    /// Footprint height at 0° rotation (px).
    pub height: f32,
    /// May this part share space with others?
    pub can_overlap: bool,
    /// Grid-snap granularity per axis: 1 = whole cell, 0.5 = half cell.
    pub min_snap_multiplier_x: f32,
    pub min_snap_multiplier_y: f32,
    /// Sprite asset path, relative to `assets/`.
    pub image_path: String,
    pub kind: PartKind,
    /// Mass in kg (fuel mass included for tanks).
    pub mass: f32,
    pub drag: DragFaces,
    /// Volume in m³.
    pub volume: f32,
    /// Density in kg/m³.
    pub density: f32,
    pub category: String,
    pub description: String,
}

impl PartCatalogEntry {
    /// Validate the physical properties the simulation depends on.
    ///
    /// A part that fails here is refused at registration; there is no
    /// per-operation recovery from a malformed entry.
    fn validate(&self) -> GameResult<()> {
        let fail = |field| {
            Err(GameError::MissingPartField {
                part_id: self.id.clone(),
                field,
            })
        };
        if self.id.is_empty() {
            return fail("id");
        }
        if self.width <= 0.0 {
            return fail("width");
        }
        if self.height <= 0.0 {
            return fail("height");
        }
        if self.mass <= 0.0 {
            return fail("mass");
        }
        if self.volume <= 0.0 {
            return fail("volume");
        }
        if self.density <= 0.0 {
            return fail("density");
        }
        if self.category.is_empty() {
            return fail("category");
        }
        if self.min_snap_multiplier_x <= 0.0 {
            return fail("min_snap_multiplier_x");
        }
        if self.min_snap_multiplier_y <= 0.0 {
            return fail("min_snap_multiplier_y");
        }
        Ok(())
    }
}

/// Valid part categories.  An unknown category is logged, not fatal.
pub const CATEGORIES: &[&str] = &[
    "Command",
    "Fuel",
    "Thruster",
    "Structural",
    "Coupling",
    "Payload",
    "Aerodynamics",
    "Thermal",
    "Electrical",
    "Communication",
    "Utility",
    "Habitat",
];

/// The assembled catalog, keyed by part id.  Loaded once; read-only after.
#[derive(Resource, Debug, Clone, Default)]
pub struct PartCatalog {
    entries: HashMap<String, PartCatalogEntry>,
}

impl PartCatalog {
    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&PartCatalogEntry> {
        self.entries.get(id)
    }

    /// Look up an entry, producing a structured error for unknown ids.
    pub fn require(&self, id: &str) -> GameResult<&PartCatalogEntry> {
        self.entries.get(id).ok_or_else(|| GameError::UnknownPart {
            part_id: id.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register one entry after validating it.  Duplicate ids are a
    /// registration refusal, the same as a missing field.
    pub fn register(&mut self, entry: PartCatalogEntry) -> GameResult<()> {
        entry.validate()?;
        if !CATEGORIES.contains(&entry.category.as_str()) {
            warn!(
                "part '{}' does not belong to any valid category (category: '{}')",
                entry.id, entry.category
            );
        }
        if self.entries.contains_key(&entry.id) {
            return Err(GameError::MissingPartField {
                part_id: entry.id,
                field: "id (duplicate)",
            });
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Assemble the built-in part set.
    pub fn builtin() -> GameResult<Self> {
        let mut catalog = Self::default();

        let tank_drag = |scale: f32| DragFaces {
            top: 10.8,
            left: 27.5 * scale,
            right: 27.5 * scale,
            bottom: 10.8,
        };

        catalog.register(PartCatalogEntry {
            id: "FuelTankSmall".into(),
            width: BUILD_GRID_SIZE,
            height: BUILD_GRID_SIZE / 2.0,
            can_overlap: false,
            min_snap_multiplier_x: 1.0,
            min_snap_multiplier_y: 0.5,
            image_path: "parts/fuel-tank/fuel-tank.png".into(),
            kind: PartKind::FuelTank { fuel: 2000.0 },
            mass: 2000.0 + 2250.0,
            drag: tank_drag(1.0),
            volume: 80.21,
            density: 52.98,
            category: "Fuel".into(),
            description: "A fuel tank carrying liquid fuel and oxygen. Explosive.".into(),
        })?;

        catalog.register(PartCatalogEntry {
            id: "FuelTankNormal".into(),
            width: BUILD_GRID_SIZE,
            height: BUILD_GRID_SIZE,
            can_overlap: false,
            min_snap_multiplier_x: 1.0,
            min_snap_multiplier_y: 1.0,
            image_path: "parts/fuel-tank/fuel-tank.png".into(),
            kind: PartKind::FuelTank { fuel: 4000.0 },
            mass: (2000.0 + 2250.0) * 2.0,
            drag: tank_drag(2.0),
            volume: 80.21 * 2.0,
            density: 52.98,
            category: "Fuel".into(),
            description: "A fuel tank carrying liquid fuel and oxygen. Explosive.".into(),
        })?;

        catalog.register(PartCatalogEntry {
            id: "FuelTankTall".into(),
            width: BUILD_GRID_SIZE,
            height: BUILD_GRID_SIZE * 2.0,
            can_overlap: false,
            min_snap_multiplier_x: 1.0,
            min_snap_multiplier_y: 1.0,
            image_path: "parts/fuel-tank/fuel-tank.png".into(),
            kind: PartKind::FuelTank { fuel: 8000.0 },
            mass: (2000.0 + 2250.0) * 4.0,
            drag: tank_drag(4.0),
            volume: 80.21 * 4.0,
            density: 52.98,
            category: "Fuel".into(),
            description: "A fuel tank carrying liquid fuel and oxygen. Explosive.".into(),
        })?;

        catalog.register(PartCatalogEntry {
            id: "ThrusterNormal".into(),
            width: BUILD_GRID_SIZE,
            height: BUILD_GRID_SIZE,
            can_overlap: false,
            min_snap_multiplier_x: 1.0,
            min_snap_multiplier_y: 1.0,
            image_path: "parts/thruster/thruster-normal.png".into(),
            kind: PartKind::Thruster {
                thrust: 0.01,
                burn_rate: 0.1,
            },
            mass: 2250.0,
            drag: tank_drag(2.0),
            volume: 80.21 * 2.0,
            density: 52.98,
            category: "Thruster".into(),
            description: "A high thrust, low efficiency engine. Normally used in the lower stages of a rocket.".into(),
        })?;

        catalog.register(PartCatalogEntry {
            id: "NoseConeBasic".into(),
            width: BUILD_GRID_SIZE,
            height: BUILD_GRID_SIZE,
            can_overlap: false,
            min_snap_multiplier_x: 1.0,
            min_snap_multiplier_y: 1.0,
            image_path: "parts/aerodynamics/nosecone-normal.png".into(),
            kind: PartKind::NoseCone,
            mass: 2250.0,
            drag: tank_drag(2.0),
            volume: 80.21 * 2.0,
            density: 52.98,
            category: "Aerodynamics".into(),
            description: "A nose cone to streamline the top of a ship.".into(),
        })?;

        Ok(catalog)
    }
}

// ── TOML overlay ──────────────────────────────────────────────────────────────

/// On-disk shape of one `assets/parts.toml` entry.  Snap multipliers and the
/// overlap flag default the same way the built-in set does.
#[derive(Debug, Deserialize)]
struct PartToml {
    id: String,
    width: f32,
    height: f32,
    #[serde(default)]
    can_overlap: bool,
    #[serde(default = "default_snap")]
    min_snap_multiplier_x: f32,
    #[serde(default = "default_snap")]
    min_snap_multiplier_y: f32,
    image_path: String,
    #[serde(flatten)]
    kind: PartKind,
    mass: f32,
    drag: DragFaces,
    volume: f32,
    density: f32,
    category: String,
    #[serde(default)]
    description: String,
}

fn default_snap() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct PartsFile {
    #[serde(default)]
    part: Vec<PartToml>,
}

impl PartCatalog {
    /// Register every part described by a `parts.toml` document on top of the
    /// current set.  Any invalid entry aborts the whole load.
    pub fn register_toml(&mut self, contents: &str) -> GameResult<()> {
        let file: PartsFile = toml::from_str(contents).map_err(|e| {
            warn!("parts.toml did not parse: {e}");
            GameError::MissingPartField {
                part_id: "<parts.toml>".into(),
                field: "valid TOML",
            }
        })?;
        for p in file.part {
            self.register(PartCatalogEntry {
                id: p.id,
                width: p.width,
                height: p.height,
                can_overlap: p.can_overlap,
                min_snap_multiplier_x: p.min_snap_multiplier_x,
                min_snap_multiplier_y: p.min_snap_multiplier_y,
                image_path: p.image_path,
                kind: p.kind,
                mass: p.mass,
                drag: p.drag,
                volume: p.volume,
                density: p.density,
                category: p.category,
                description: p.description,
            })?;
        }
        Ok(())
    }
}

/// Startup system: build the catalog and insert it as a resource.
///
/// A malformed built-in set or overlay file is fatal — the game cannot run
/// with parts whose physical data is incomplete.
pub fn load_part_catalog(mut commands: Commands) {
    let mut catalog = match PartCatalog::builtin() {
        Ok(c) => c,
        Err(e) => panic!("built-in part catalog is invalid: {e}"),
    };

    let path = "assets/parts.toml";
    if let Ok(contents) = std::fs::read_to_string(path) {
        if let Err(e) = catalog.register_toml(&contents) {
            panic!("failed to load {path}: {e}");
        }
        info!("Loaded extra parts from {path}");
    }

    info!("Part catalog ready ({} parts)", catalog.len());
    commands.insert_resource(catalog);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_contains_expected_parts() {
        let c = PartCatalog::builtin().unwrap();
        for id in [
            "FuelTankSmall",
            "FuelTankNormal",
            "FuelTankTall",
            "ThrusterNormal",
            "NoseConeBasic",
        ] {
            assert!(c.get(id).is_some(), "missing builtin part {id}");
        }
    }

    #[test]
    fn fuel_tank_small_snaps_to_half_cell_vertically() {
        let c = PartCatalog::builtin().unwrap();
        let e = c.get("FuelTankSmall").unwrap();
        assert_eq!(e.min_snap_multiplier_y, 0.5);
        assert_eq!(e.height, BUILD_GRID_SIZE / 2.0);
    }

    #[test]
    fn register_refuses_missing_mass() {
        let mut c = PartCatalog::default();
        let mut entry = PartCatalog::builtin()
            .unwrap()
            .get("NoseConeBasic")
            .unwrap()
            .clone();
        entry.id = "Broken".into();
        entry.mass = 0.0;
        let err = c.register(entry).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Broken") && msg.contains("mass"), "got: {msg}");
        assert!(c.is_empty(), "invalid part must not be registered");
    }

    #[test]
    fn register_refuses_duplicate_ids() {
        let mut c = PartCatalog::builtin().unwrap();
        let dup = c.get("NoseConeBasic").unwrap().clone();
        assert!(c.register(dup).is_err());
    }

    #[test]
    fn require_reports_unknown_part() {
        let c = PartCatalog::builtin().unwrap();
        let err = c.require("NotAPart").unwrap_err();
        assert!(err.to_string().contains("NotAPart"));
    }

    #[test]
    fn thrust_force_scales_with_throttle_and_clamps() {
        let kind = PartKind::Thruster {
            thrust: 0.01,
            burn_rate: 0.1,
        };
        assert_eq!(kind.thrust_force_at(0.0), 0.0);
        assert!((kind.thrust_force_at(0.5) - 0.005).abs() < 1e-9);
        assert_eq!(kind.thrust_force_at(2.0), 0.01, "throttle clamps to 1");
        assert_eq!(PartKind::NoseCone.thrust_force_at(1.0), 0.0);
    }

    #[test]
    fn toml_overlay_registers_parts() {
        let mut c = PartCatalog::builtin().unwrap();
        let before = c.len();
        c.register_toml(
            r#"
            [[part]]
            id = "StrutBasic"
            width = 52.0
            height = 52.0
            image_path = "parts/structural/strut.png"
            kind = "NoseCone"
            mass = 100.0
            volume = 1.0
            density = 100.0
            category = "Structural"
            drag = { top = 1.0, left = 1.0, right = 1.0, bottom = 1.0 }
            "#,
        )
        .unwrap();
        assert_eq!(c.len(), before + 1);
        assert!(c.get("StrutBasic").is_some());
    }
}
