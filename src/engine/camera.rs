use bevy::prelude::*;

use crate::constants::{AUTO_ROTATE_SPEED, CAMERA_START};

/// Orbit camera focused on the origin, with the slow showcase
/// auto-rotation the configurator idles in.
#[derive(Resource)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub auto_rotate: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(CAMERA_START)
    }
}

impl OrbitCamera {
    pub fn from_position(position: Vec3) -> Self {
        let radius = position.length();
        Self {
            yaw: position.x.atan2(position.z),
            pitch: (position.y / radius).asin(),
            radius,
            auto_rotate: true,
        }
    }

    /// World transform for the current orbit state, looking at the origin.
    pub fn transform(&self) -> Transform {
        let horizontal = self.radius * self.pitch.cos();
        let position = Vec3::new(
            horizontal * self.yaw.sin(),
            self.radius * self.pitch.sin(),
            horizontal * self.yaw.cos(),
        );
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y)
    }

    /// Return to the start position, keeping the auto-rotate setting.
    pub fn reset(&mut self) {
        let auto_rotate = self.auto_rotate;
        *self = Self::from_position(CAMERA_START);
        self.auto_rotate = auto_rotate;
    }
}

/// Advance auto-rotation and keep the viewport camera on its orbit.
pub fn camera_controller(
    time: Res<Time>,
    mut orbit: ResMut<OrbitCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if orbit.auto_rotate {
        orbit.yaw += AUTO_ROTATE_SPEED * time.delta_secs();
    }
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    *transform = orbit.transform();
}
