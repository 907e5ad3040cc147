//! Parametric box construction and scene composition.

/// Gift box geometry and material construction, including the bow mesh.
pub mod box_builder;

/// Orbit viewport camera with showcase auto-rotation.
pub mod camera;

/// Rebuild-from-scratch scene composition and asset lifecycle.
pub mod composer;

/// Box configuration values, input coercion, and summary introspection.
pub mod config;

/// Procedural pattern texture generation.
pub mod pattern;
