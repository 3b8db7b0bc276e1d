//! Apogee — a 2D rocket-construction and orbital-physics sandbox.
//!
//! Assemble a rocket on the grid editor, launch it into a physics simulation
//! with planetary gravity, procedural terrain and atmospheric drag.

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod graphics;
pub mod sim;
