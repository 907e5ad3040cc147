/// Shared proportions for gift box construction and decal placement
use bevy::prelude::*;

/// Resolution of generated pattern textures (square, logical units)
pub const PATTERN_TEXTURE_SIZE: usize = 512;

/// Height of the lid solid
pub const LID_HEIGHT: f32 = 3.0;

/// How far the lid overhangs the body on each horizontal axis
pub const LID_OVERLAP: f32 = 0.6;

/// Width of each ribbon strip
pub const RIBBON_WIDTH: f32 = 4.0;

/// Thickness added so ribbons sit proud of the box surface
pub const RIBBON_THICKNESS: f32 = 0.2;

/// Bow torus-knot proportions (curve radius, tube radius, tessellation)
pub const BOW_RADIUS: f32 = 2.5;
pub const BOW_TUBE: f32 = 0.7;
pub const BOW_TUBULAR_SEGMENTS: usize = 64;
pub const BOW_RADIAL_SEGMENTS: usize = 8;

/// Standoff between a decal plane and its face to avoid coplanar flicker
pub const FACE_STANDOFF: f32 = 0.05;

/// Base edge length of a freshly added decal plane (height; width scales by aspect)
pub const DECAL_BASE_SIZE: f32 = 10.0;

/// Fallback for unparsable or non-positive dimension input
pub const DEFAULT_DIMENSION: f32 = 10.0;

/// Initial viewport camera position
pub const CAMERA_START: Vec3 = Vec3::new(40.0, 35.0, 40.0);

/// Orbit auto-rotate rate in radians per second (one turn per minute)
pub const AUTO_ROTATE_SPEED: f32 = std::f32::consts::TAU / 60.0;
