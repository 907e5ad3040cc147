//! Decal placement resolution.
//!
//! Pure mapping from box dimensions plus a decal's own configuration to a
//! face anchor transform and an in-plane local transform. Re-invoked for
//! every decal whenever the box dimensions or the decal config change.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::constants::{FACE_STANDOFF, LID_HEIGHT};
use crate::engine::config::BoxDimensions;

/// Addressable box surfaces. The bottom face is not addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFace {
    #[default]
    Front,
    Back,
    Left,
    Right,
    Top,
}

impl BoxFace {
    pub const ALL: [BoxFace; 5] = [
        BoxFace::Front,
        BoxFace::Back,
        BoxFace::Left,
        BoxFace::Right,
        BoxFace::Top,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
        }
    }

    /// Next face in enumeration order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Per-decal placement controls, in local face-plane units. Preserved
/// verbatim across box rebuilds; only the resolved anchor moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalConfig {
    pub face: BoxFace,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
    pub rotation_degrees: f32,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            face: BoxFace::Front,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

/// Resolved decal placement: the face anchor (parent) and the in-plane
/// offset/scale/rotation (child plane mesh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalPlacement {
    pub anchor: Transform,
    pub local: Transform,
}

/// Resolve a decal's 3D placement against the given box dimensions.
/// Pure and idempotent for identical inputs.
pub fn resolve_placement(dims: BoxDimensions, config: &DecalConfig) -> DecalPlacement {
    let anchor = face_anchor(dims, config.face);
    // Positive rotation turns the decal clockwise as seen by a viewer
    // facing the decal's face.
    let local = Transform {
        translation: Vec3::new(config.offset_x, config.offset_y, 0.0),
        rotation: Quat::from_rotation_z(-config.rotation_degrees.to_radians()),
        scale: Vec3::new(config.scale, config.scale, 1.0),
    };
    DecalPlacement { anchor, local }
}

/// Anchor position and face-aligned orientation, with a small standoff so
/// the decal never sits coplanar with the surface. The top anchor clears
/// the lid.
fn face_anchor(dims: BoxDimensions, face: BoxFace) -> Transform {
    let standoff = FACE_STANDOFF;
    match face {
        BoxFace::Front => Transform::from_xyz(0.0, 0.0, dims.length / 2.0 + standoff),
        BoxFace::Back => Transform::from_xyz(0.0, 0.0, -dims.length / 2.0 - standoff)
            .with_rotation(Quat::from_rotation_y(PI)),
        BoxFace::Left => Transform::from_xyz(-dims.width / 2.0 - standoff, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(-FRAC_PI_2)),
        BoxFace::Right => Transform::from_xyz(dims.width / 2.0 + standoff, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        BoxFace::Top => Transform::from_xyz(0.0, dims.height / 2.0 + LID_HEIGHT + standoff, 0.0)
            .with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
    }
}
