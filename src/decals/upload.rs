//! Asynchronous image ingestion for decals.
//!
//! Upload byte buffers are decoded off the main schedule; each decal
//! materialises as soon as its own decode completes, so concurrent
//! uploads land in non-deterministic order. Decode failures are surfaced
//! and the upload is dropped; there is no retry and no cancellation.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::tasks::futures_lite::future;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use thiserror::Error;

use crate::decals::registry::{DecalAnchor, DecalPlane, DecalRegistry, ImageDecal, plane_size};
use crate::decals::transform::{DecalConfig, resolve_placement};
use crate::engine::camera::OrbitCamera;
use crate::engine::composer::SceneRoots;
use crate::engine::config::{BoxConfig, BoxDimensions};

/// Request to turn a raw image byte buffer into a decal. The byte buffer
/// comes from an external file-picking collaborator; the core never reads
/// files itself.
#[derive(Event)]
pub struct UploadRequested {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DecalDecodeError {
    #[error("unreadable image data: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded upload, ready to become a texture.
pub struct DecodedDecalImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// In-flight decode task for one upload.
#[derive(Component)]
pub struct PendingDecode {
    name: String,
    task: Task<Result<DecodedDecalImage, DecalDecodeError>>,
}

/// Decode an upload into RGBA8 pixels.
pub fn decode_upload(name: String, bytes: Vec<u8>) -> Result<DecodedDecalImage, DecalDecodeError> {
    let decoded = image::load_from_memory(&bytes)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedDecalImage {
        name,
        width,
        height,
        data: rgba.into_raw(),
    })
}

/// Kick off one decode task per upload request.
pub fn start_decode_tasks(mut events: EventReader<UploadRequested>, mut commands: Commands) {
    let pool = AsyncComputeTaskPool::get();
    for event in events.read() {
        let name = event.name.clone();
        let bytes = event.bytes.clone();
        debug!("decoding upload '{}' ({} bytes)", name, bytes.len());
        let task = pool.spawn(async move { decode_upload(name, bytes) });
        commands.spawn(PendingDecode {
            name: event.name.clone(),
            task,
        });
    }
}

/// Drain finished decode tasks: successful decodes become decals on the
/// front face and take the active selection; failures are logged and
/// dropped.
pub fn poll_decode_tasks(
    mut commands: Commands,
    mut pending: Query<(Entity, &mut PendingDecode)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut registry: ResMut<DecalRegistry>,
    mut camera: ResMut<OrbitCamera>,
    roots: Res<SceneRoots>,
    config: Res<BoxConfig>,
) {
    for (entity, mut decode) in &mut pending {
        let Some(result) = future::block_on(future::poll_once(&mut decode.task)) else {
            continue;
        };
        commands.entity(entity).despawn();
        match result {
            Ok(decoded) => {
                spawn_decal(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &mut images,
                    &mut registry,
                    roots.decal_layer,
                    config.dimensions(),
                    decoded,
                );
                // Selecting a decal for editing stops the showcase spin.
                camera.auto_rotate = false;
            }
            Err(err) => warn!("discarding upload '{}': {}", decode.name, err),
        }
    }
}

/// Materialise a decoded image as a decal: texture, plane mesh sized by
/// aspect ratio, anchor + plane entities under the decal layer, registry
/// entry marked active.
fn spawn_decal(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    registry: &mut DecalRegistry,
    layer: Option<Entity>,
    dims: BoxDimensions,
    decoded: DecodedDecalImage,
) {
    let aspect_ratio = decoded.width as f32 / decoded.height as f32;
    let texture = images.add(decal_image(decoded.width, decoded.height, decoded.data));
    let size = plane_size(aspect_ratio);
    let mesh = meshes.add(Rectangle::new(size.x, size.y));
    // Drawn over the box surface: unlit, blended, visible from both sides.
    let material = materials.add(StandardMaterial {
        base_color_texture: Some(texture.clone()),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        depth_bias: 1.0,
        ..default()
    });

    let id = registry.allocate_id();
    let decal_config = DecalConfig::default();
    let placement = resolve_placement(dims, &decal_config);

    let mut anchor_entity = commands.spawn((placement.anchor, Visibility::default(), DecalAnchor(id)));
    if let Some(layer) = layer {
        anchor_entity.insert(ChildOf(layer));
    }
    let anchor = anchor_entity.id();
    let plane = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            placement.local,
            DecalPlane(id),
            ChildOf(anchor),
        ))
        .id();

    info!(
        "decal '{}' attached ({}x{})",
        decoded.name, decoded.width, decoded.height
    );
    registry.insert(ImageDecal {
        id,
        name: decoded.name,
        aspect_ratio,
        config: decal_config,
        anchor,
        plane,
        mesh,
        material,
        texture,
    });
}

/// Build the decal texture from decoded RGBA8 pixels.
fn decal_image(width: u32, height: u32, data: Vec<u8>) -> Image {
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode test png");
        bytes
    }

    #[test]
    fn decode_recovers_dimensions_and_pixels() {
        let decoded = decode_upload("photo".into(), tiny_png(4, 2)).unwrap();
        assert_eq!(decoded.name, "photo");
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.data.len(), 4 * 2 * 4);
        assert_eq!(&decoded.data[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let result = decode_upload("broken".into(), b"definitely not an image".to_vec());
        assert!(matches!(result, Err(DecalDecodeError::Decode(_))));
    }

    #[test]
    fn decal_texture_matches_decoded_size() {
        let image = decal_image(4, 2, vec![0; 4 * 2 * 4]);
        assert_eq!(image.texture_descriptor.size.width, 4);
        assert_eq!(image.texture_descriptor.size.height, 2);
    }
}
