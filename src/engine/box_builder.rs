//! Gift box model construction.
//!
//! Builds a fresh body + lid (+ ribbon strips and bow) entity tree from a
//! `BoxConfig`. Every rebuild produces new meshes and materials; the
//! returned `GiftBoxAssets` owns the handles so the composer can release
//! them when the model is replaced.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::constants::{
    BOW_RADIAL_SEGMENTS, BOW_RADIUS, BOW_TUBE, BOW_TUBULAR_SEGMENTS, LID_HEIGHT, LID_OVERLAP,
    RIBBON_THICKNESS, RIBBON_WIDTH,
};
use crate::engine::config::{BoxConfig, BoxDimensions, Pattern};
use crate::engine::pattern::generate_pattern_texture;

/// Marker for the root entity of the current box model.
#[derive(Component)]
pub struct GiftBoxRoot;

/// Handles owned by one box model generation. Released wholesale when the
/// model is replaced.
pub struct GiftBoxAssets {
    pub body_mesh: Handle<Mesh>,
    pub lid_mesh: Handle<Mesh>,
    pub vertical_ribbon_mesh: Option<Handle<Mesh>>,
    pub horizontal_ribbon_mesh: Option<Handle<Mesh>>,
    pub bow_mesh: Option<Handle<Mesh>>,
    pub box_material: Handle<StandardMaterial>,
    pub ribbon_material: Option<Handle<StandardMaterial>>,
    pub pattern_texture: Option<Handle<Image>>,
}

impl GiftBoxAssets {
    /// Explicitly drop every asset this model generation owns.
    pub fn release(
        self,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        images: &mut Assets<Image>,
    ) {
        meshes.remove(&self.body_mesh);
        meshes.remove(&self.lid_mesh);
        for handle in [
            self.vertical_ribbon_mesh,
            self.horizontal_ribbon_mesh,
            self.bow_mesh,
        ]
        .into_iter()
        .flatten()
        {
            meshes.remove(&handle);
        }
        materials.remove(&self.box_material);
        if let Some(handle) = self.ribbon_material {
            materials.remove(&handle);
        }
        if let Some(handle) = self.pattern_texture {
            images.remove(&handle);
        }
    }
}

/// Spawn a new gift box model. Never mutates a previously returned model.
pub fn spawn_gift_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    config: &BoxConfig,
) -> (Entity, GiftBoxAssets) {
    let dims = config.dimensions();

    let pattern_texture = (config.pattern != Pattern::None).then(|| {
        images.add(generate_pattern_texture(
            config.pattern,
            config.box_color,
            config.pattern_color,
        ))
    });

    // Pattern takes precedence: the texture already carries the base
    // colour, so the tint resets to white underneath it.
    let box_material = materials.add(StandardMaterial {
        base_color: if pattern_texture.is_some() {
            Color::WHITE
        } else {
            config.box_color
        },
        base_color_texture: pattern_texture.clone(),
        perceptual_roughness: 0.6,
        metallic: 0.1,
        alpha_mode: AlphaMode::Opaque,
        ..default()
    });

    let body_mesh = meshes.add(body_cuboid(dims));
    let lid_mesh = meshes.add(lid_cuboid(dims));

    let root = commands
        .spawn((Transform::IDENTITY, Visibility::default(), GiftBoxRoot))
        .id();
    commands.spawn((
        Mesh3d(body_mesh.clone()),
        MeshMaterial3d(box_material.clone()),
        Transform::IDENTITY,
        ChildOf(root),
    ));
    commands.spawn((
        Mesh3d(lid_mesh.clone()),
        MeshMaterial3d(box_material.clone()),
        Transform::from_translation(lid_position(dims)),
        ChildOf(root),
    ));

    let mut assets = GiftBoxAssets {
        body_mesh,
        lid_mesh,
        vertical_ribbon_mesh: None,
        horizontal_ribbon_mesh: None,
        bow_mesh: None,
        box_material,
        ribbon_material: None,
        pattern_texture,
    };

    if config.has_ribbon {
        // Thin geometry, visible from both sides.
        let ribbon_material = materials.add(StandardMaterial {
            base_color: config.ribbon_color,
            perceptual_roughness: 0.4,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        let vertical = meshes.add(vertical_ribbon_cuboid(dims));
        let horizontal = meshes.add(horizontal_ribbon_cuboid(dims));
        let bow = meshes.add(torus_knot_mesh(
            BOW_RADIUS,
            BOW_TUBE,
            BOW_TUBULAR_SEGMENTS,
            BOW_RADIAL_SEGMENTS,
        ));

        commands.spawn((
            Mesh3d(vertical.clone()),
            MeshMaterial3d(ribbon_material.clone()),
            Transform::from_translation(ribbon_position()),
            ChildOf(root),
        ));
        commands.spawn((
            Mesh3d(horizontal.clone()),
            MeshMaterial3d(ribbon_material.clone()),
            Transform::from_translation(ribbon_position()),
            ChildOf(root),
        ));
        commands.spawn((
            Mesh3d(bow.clone()),
            MeshMaterial3d(ribbon_material.clone()),
            bow_transform(dims),
            ChildOf(root),
        ));

        assets.vertical_ribbon_mesh = Some(vertical);
        assets.horizontal_ribbon_mesh = Some(horizontal);
        assets.bow_mesh = Some(bow);
        assets.ribbon_material = Some(ribbon_material);
    }

    (root, assets)
}

/// Body solid, centred at the origin.
pub fn body_cuboid(dims: BoxDimensions) -> Cuboid {
    Cuboid::new(dims.width, dims.height, dims.length)
}

/// Lid solid, overhanging the body on both horizontal axes.
pub fn lid_cuboid(dims: BoxDimensions) -> Cuboid {
    Cuboid::new(
        dims.width + LID_OVERLAP,
        LID_HEIGHT,
        dims.length + LID_OVERLAP,
    )
}

/// Lid centre; its base rests exactly on the body's top.
pub fn lid_position(dims: BoxDimensions) -> Vec3 {
    Vec3::new(0.0, dims.height / 2.0 + LID_HEIGHT / 2.0, 0.0)
}

/// Vertical ribbon strip: spans the full box + lid height and wraps the
/// length axis.
pub fn vertical_ribbon_cuboid(dims: BoxDimensions) -> Cuboid {
    Cuboid::new(
        RIBBON_WIDTH,
        dims.height + LID_HEIGHT + RIBBON_THICKNESS,
        dims.length + LID_OVERLAP + RIBBON_THICKNESS,
    )
}

/// Horizontal ribbon strip wrapping the width axis.
pub fn horizontal_ribbon_cuboid(dims: BoxDimensions) -> Cuboid {
    Cuboid::new(
        dims.width + LID_OVERLAP + RIBBON_THICKNESS,
        dims.height + LID_HEIGHT + RIBBON_THICKNESS,
        RIBBON_WIDTH,
    )
}

/// Both ribbon strips centre on the lid's vertical midpoint.
pub fn ribbon_position() -> Vec3 {
    Vec3::new(0.0, LID_HEIGHT / 2.0, 0.0)
}

/// Bow ornament placement: above the lid, laid flat, squashed along its
/// own axis.
pub fn bow_transform(dims: BoxDimensions) -> Transform {
    Transform::from_xyz(0.0, dims.height / 2.0 + LID_HEIGHT + 1.5, 0.0)
        .with_rotation(Quat::from_rotation_x(FRAC_PI_2))
        .with_scale(Vec3::new(1.0, 1.0, 0.5))
}

/// Tube mesh swept along a (2,3) torus knot, used for the bow ornament.
pub fn torus_knot_mesh(
    radius: f32,
    tube: f32,
    tubular_segments: usize,
    radial_segments: usize,
) -> Mesh {
    let p = 2.0_f32;
    let q = 3.0_f32;

    let vertex_count = (tubular_segments + 1) * (radial_segments + 1);
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(tubular_segments * radial_segments * 6);

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p * TAU;
        let point = knot_point(u, radius, p, q);
        let ahead = knot_point(u + 0.01, radius, p, q);

        // Frenet-style frame from adjacent curve samples.
        let tangent = ahead - point;
        let mut normal = ahead + point;
        let binormal = tangent.cross(normal).normalize();
        normal = binormal.cross(tangent).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let pos = point + cx * normal + cy * binormal;
            positions.push([pos.x, pos.y, pos.z]);
            let n = (pos - point).normalize();
            normals.push([n.x, n.y, n.z]);
            uvs.push([
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ]);
        }
    }

    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = ((radial_segments + 1) * (j - 1) + (i - 1)) as u32;
            let b = ((radial_segments + 1) * j + (i - 1)) as u32;
            let c = ((radial_segments + 1) * j + i) as u32;
            let d = ((radial_segments + 1) * (j - 1) + i) as u32;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Point on the (p,q) torus knot curve.
fn knot_point(u: f32, radius: f32, p: f32, q: f32) -> Vec3 {
    let cu = u.cos();
    let su = u.sin();
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: f32, height: f32, length: f32) -> BoxDimensions {
        BoxDimensions {
            width,
            height,
            length,
        }
    }

    #[test]
    fn body_matches_configured_dimensions() {
        let cuboid = body_cuboid(dims(20.0, 15.0, 25.0));
        assert_eq!(cuboid.half_size, Vec3::new(10.0, 7.5, 12.5));
    }

    #[test]
    fn lid_overhangs_and_rests_on_the_body() {
        let box_dims = dims(20.0, 15.0, 25.0);
        let cuboid = lid_cuboid(box_dims);
        assert!(cuboid.half_size.abs_diff_eq(Vec3::new(10.3, 1.5, 12.8), 1e-5));
        // Centre at h/2 + lidH/2 puts the lid base exactly at y = h/2.
        let position = lid_position(box_dims);
        assert_eq!(position.y - 1.5, 7.5);
    }

    #[test]
    fn ribbons_span_box_and_lid() {
        let box_dims = dims(20.0, 15.0, 20.0);
        let vertical = vertical_ribbon_cuboid(box_dims);
        assert!((vertical.half_size * 2.0).abs_diff_eq(Vec3::new(4.0, 18.2, 20.8), 1e-5));
        let horizontal = horizontal_ribbon_cuboid(box_dims);
        assert!((horizontal.half_size * 2.0).abs_diff_eq(Vec3::new(20.8, 18.2, 4.0), 1e-5));
        assert_eq!(ribbon_position().y, 1.5);
    }

    #[test]
    fn bow_sits_above_the_lid() {
        let transform = bow_transform(dims(20.0, 15.0, 20.0));
        assert_eq!(transform.translation, Vec3::new(0.0, 12.0, 0.0));
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn torus_knot_mesh_has_expected_structure() {
        let mesh = torus_knot_mesh(2.5, 0.7, 64, 8);
        assert_eq!(mesh.count_vertices(), 65 * 9);
        let indices = mesh.indices().expect("bow mesh is indexed");
        assert_eq!(indices.len(), 64 * 8 * 6);
        assert_eq!(indices.len() % 3, 0);
    }

    #[test]
    fn torus_knot_stays_within_its_radii() {
        let mesh = torus_knot_mesh(2.5, 0.7, 32, 6);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
            .expect("position attribute");
        let bound = 2.5 * 1.5 + 0.7 + 1e-3;
        for p in positions {
            let len = Vec3::from_array(*p).length();
            assert!(len <= bound, "vertex {p:?} outside bound {bound}");
        }
    }
}
