//! Scene composition: rebuild-from-scratch on every configuration change.
//!
//! The previous box model is discarded wholesale and its assets released
//! explicitly; surviving decals are re-parented to the fresh decal layer
//! and their placements re-resolved. This guarantees no stale geometry or
//! material references outlive a configuration edit.

use bevy::prelude::*;

use crate::decals::registry::DecalRegistry;
use crate::engine::box_builder::{GiftBoxAssets, spawn_gift_box};
use crate::engine::config::BoxConfig;

/// Fired after any configuration-affecting edit.
#[derive(Event)]
pub struct RebuildBox;

/// Marker for the grouping entity that holds every decal anchor.
#[derive(Component)]
pub struct DecalLayer;

/// Tracks the live box model generation: its root entity, the decal
/// grouping, and the owned asset handles pending release on replacement.
#[derive(Resource, Default)]
pub struct SceneRoots {
    pub box_root: Option<Entity>,
    pub decal_layer: Option<Entity>,
    pub assets: Option<GiftBoxAssets>,
}

/// Rebuild the gift box model in response to `RebuildBox` events: spawn
/// the new model, move existing decals across, then despawn the previous
/// generation and release its assets.
pub fn rebuild_gift_box(
    mut events: EventReader<RebuildBox>,
    mut commands: Commands,
    config: Res<BoxConfig>,
    registry: Res<DecalRegistry>,
    mut roots: ResMut<SceneRoots>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    debug!("rebuilding gift box: {}", config.product_details());

    let (box_root, assets) =
        spawn_gift_box(&mut commands, &mut meshes, &mut materials, &mut images, &config);
    let decal_layer = commands
        .spawn((Transform::IDENTITY, Visibility::default(), DecalLayer))
        .id();

    // Re-attach surviving decals before the old layer goes away; their
    // configs are untouched and their placements refresh this frame.
    for decal in registry.decals() {
        commands.entity(decal.anchor).insert(ChildOf(decal_layer));
    }

    if let Some(previous) = roots.box_root.take() {
        commands.entity(previous).despawn();
    }
    if let Some(previous) = roots.decal_layer.take() {
        commands.entity(previous).despawn();
    }
    if let Some(previous) = roots.assets.take() {
        previous.release(&mut meshes, &mut materials, &mut images);
    }

    roots.box_root = Some(box_root);
    roots.decal_layer = Some(decal_layer);
    roots.assets = Some(assets);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::box_builder::{body_cuboid, lid_cuboid, torus_knot_mesh};
    use crate::engine::config::{BoxDimensions, Pattern};
    use crate::engine::pattern::generate_pattern_texture;

    #[test]
    fn release_empties_the_asset_stores() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let mut images = Assets::<Image>::default();

        let dims = BoxDimensions {
            width: 20.0,
            height: 15.0,
            length: 20.0,
        };
        let assets = GiftBoxAssets {
            body_mesh: meshes.add(body_cuboid(dims)),
            lid_mesh: meshes.add(lid_cuboid(dims)),
            vertical_ribbon_mesh: None,
            horizontal_ribbon_mesh: None,
            bow_mesh: Some(meshes.add(torus_knot_mesh(2.5, 0.7, 8, 4))),
            box_material: materials.add(StandardMaterial::default()),
            ribbon_material: Some(materials.add(StandardMaterial::default())),
            pattern_texture: Some(images.add(generate_pattern_texture(
                Pattern::Dots,
                Color::WHITE,
                Color::BLACK,
            ))),
        };
        assert_eq!(meshes.len(), 3);
        assert_eq!(materials.len(), 2);
        assert_eq!(images.len(), 1);

        assets.release(&mut meshes, &mut materials, &mut images);
        assert_eq!(meshes.len(), 0);
        assert_eq!(materials.len(), 0);
        assert_eq!(images.len(), 0);
    }

    // Decals spawned later in the same frame parent to this layer, so a
    // single rebuild pass must leave it populated.
    #[test]
    fn rebuild_materialises_the_decal_layer_within_one_frame() {
        let mut app = App::new();
        app.insert_resource(Assets::<Mesh>::default());
        app.insert_resource(Assets::<StandardMaterial>::default());
        app.insert_resource(Assets::<Image>::default());
        app.init_resource::<BoxConfig>();
        app.init_resource::<DecalRegistry>();
        app.init_resource::<SceneRoots>();
        app.add_event::<RebuildBox>();
        app.add_systems(Update, rebuild_gift_box);

        app.world_mut().send_event(RebuildBox);
        app.update();

        let roots = app.world().resource::<SceneRoots>();
        assert!(roots.box_root.is_some());
        assert!(roots.decal_layer.is_some());
        assert!(roots.assets.is_some());
    }
}
