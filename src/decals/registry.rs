//! Decal collection ownership and the active-selection model.
//!
//! The registry exclusively owns every decal entity's handles and config.
//! Operations on missing entities are silent no-ops, never errors.

use bevy::prelude::*;

use crate::constants::DECAL_BASE_SIZE;
use crate::decals::transform::{BoxFace, DecalConfig, resolve_placement};
use crate::engine::config::BoxConfig;

pub type DecalId = u64;

/// Marker for a decal's face-anchor entity.
#[derive(Component)]
pub struct DecalAnchor(pub DecalId);

/// Marker for a decal's textured plane entity (child of the anchor).
#[derive(Component)]
pub struct DecalPlane(pub DecalId);

/// A user image mapped onto one box face, together with the rendering
/// resources the registry owns on its behalf.
pub struct ImageDecal {
    pub id: DecalId,
    pub name: String,
    pub aspect_ratio: f32,
    pub config: DecalConfig,
    pub anchor: Entity,
    pub plane: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub texture: Handle<Image>,
}

/// Field edits applicable to the active decal.
#[derive(Debug, Clone, Copy)]
pub enum DecalEdit {
    Face(BoxFace),
    OffsetX(f32),
    OffsetY(f32),
    Scale(f32),
    Rotation(f32),
}

/// Resource owning the ordered decal collection (insertion order is
/// display order) and the single active selection.
#[derive(Resource, Default)]
pub struct DecalRegistry {
    decals: Vec<ImageDecal>,
    active: Option<DecalId>,
    next_id: DecalId,
}

impl DecalRegistry {
    /// Reserve a fresh id for a decal being materialised. Ids are unique
    /// for the registry's lifetime and increase in allocation order; a
    /// plain counter stands in for a creation timestamp without the
    /// same-instant collision risk.
    pub fn allocate_id(&mut self) -> DecalId {
        self.next_id += 1;
        self.next_id
    }

    /// Append a decal and make it the active selection.
    pub fn insert(&mut self, decal: ImageDecal) -> DecalId {
        let id = decal.id;
        self.decals.push(decal);
        self.active = Some(id);
        id
    }

    /// Detach a decal so the caller can despawn its entities and release
    /// its assets. Unknown ids are a no-op. Removing the active decal
    /// clears the selection.
    pub fn remove(&mut self, id: DecalId) -> Option<ImageDecal> {
        let index = self.decals.iter().position(|d| d.id == id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Some(self.decals.remove(index))
    }

    /// Mark a decal active. Unknown ids leave the selection untouched.
    pub fn set_active(&mut self, id: DecalId) -> bool {
        if self.decals.iter().any(|d| d.id == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Move the selection to the next decal in display order, starting
    /// from the first when nothing is selected.
    pub fn cycle_active(&mut self) -> Option<DecalId> {
        if self.decals.is_empty() {
            return None;
        }
        let next = match self.active {
            Some(current) => {
                let index = self.decals.iter().position(|d| d.id == current).unwrap_or(0);
                self.decals[(index + 1) % self.decals.len()].id
            }
            None => self.decals[0].id,
        };
        self.active = Some(next);
        self.active
    }

    /// Apply a field edit to the active decal. Returns the edited decal's
    /// id so the caller can re-resolve its placement immediately; `None`
    /// (no-op) when nothing is active.
    pub fn apply_edit(&mut self, edit: DecalEdit) -> Option<DecalId> {
        let active = self.active?;
        let decal = self.decals.iter_mut().find(|d| d.id == active)?;
        match edit {
            DecalEdit::Face(face) => decal.config.face = face,
            DecalEdit::OffsetX(value) => decal.config.offset_x = value,
            DecalEdit::OffsetY(value) => decal.config.offset_y = value,
            DecalEdit::Scale(value) => decal.config.scale = value,
            DecalEdit::Rotation(value) => decal.config.rotation_degrees = value,
        }
        Some(active)
    }

    pub fn active_id(&self) -> Option<DecalId> {
        self.active
    }

    pub fn active_decal(&self) -> Option<&ImageDecal> {
        let active = self.active?;
        self.decals.iter().find(|d| d.id == active)
    }

    pub fn decals(&self) -> &[ImageDecal] {
        &self.decals
    }

    pub fn is_empty(&self) -> bool {
        self.decals.is_empty()
    }
}

/// Plane extents for a freshly added decal: base height, width scaled by
/// the source image aspect ratio.
pub fn plane_size(aspect_ratio: f32) -> Vec2 {
    Vec2::new(DECAL_BASE_SIZE * aspect_ratio, DECAL_BASE_SIZE)
}

/// Re-resolve every decal placement whenever the box dimensions or any
/// decal config changed. Placements are applied immediately, unbatched;
/// each decal's own config is preserved verbatim.
pub fn sync_decal_placements(
    config: Res<BoxConfig>,
    registry: Res<DecalRegistry>,
    mut transforms: Query<&mut Transform>,
) {
    if !config.is_changed() && !registry.is_changed() {
        return;
    }
    let dims = config.dimensions();
    for decal in registry.decals() {
        let placement = resolve_placement(dims, &decal.config);
        if let Ok(mut transform) = transforms.get_mut(decal.anchor) {
            *transform = placement.anchor;
        }
        if let Ok(mut transform) = transforms.get_mut(decal.plane) {
            *transform = placement.local;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_decal(registry: &mut DecalRegistry, name: &str) -> DecalId {
        let id = registry.allocate_id();
        registry.insert(ImageDecal {
            id,
            name: name.to_string(),
            aspect_ratio: 1.0,
            config: DecalConfig::default(),
            anchor: Entity::PLACEHOLDER,
            plane: Entity::PLACEHOLDER,
            mesh: Handle::default(),
            material: Handle::default(),
            texture: Handle::default(),
        })
    }

    #[test]
    fn insert_activates_the_new_decal() {
        let mut registry = DecalRegistry::default();
        let first = stub_decal(&mut registry, "a");
        assert_eq!(registry.active_id(), Some(first));
        let second = stub_decal(&mut registry, "b");
        assert_eq!(registry.active_id(), Some(second));
        assert_eq!(registry.decals().len(), 2);
    }

    #[test]
    fn add_then_remove_returns_to_empty() {
        let mut registry = DecalRegistry::default();
        let id = stub_decal(&mut registry, "a");
        assert!(registry.remove(id).is_some());
        assert!(registry.is_empty());
        assert_eq!(registry.active_id(), None);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut registry = DecalRegistry::default();
        stub_decal(&mut registry, "a");
        assert!(registry.remove(999).is_none());
        assert_eq!(registry.decals().len(), 1);
    }

    #[test]
    fn removing_inactive_decal_keeps_selection() {
        let mut registry = DecalRegistry::default();
        let first = stub_decal(&mut registry, "a");
        let second = stub_decal(&mut registry, "b");
        registry.remove(first);
        assert_eq!(registry.active_id(), Some(second));
    }

    #[test]
    fn set_active_ignores_unknown_ids() {
        let mut registry = DecalRegistry::default();
        let id = stub_decal(&mut registry, "a");
        assert!(!registry.set_active(42));
        assert_eq!(registry.active_id(), Some(id));
    }

    #[test]
    fn edits_without_active_decal_are_no_ops() {
        let mut registry = DecalRegistry::default();
        assert!(registry.apply_edit(DecalEdit::Scale(2.0)).is_none());
    }

    #[test]
    fn edits_mutate_only_the_named_field() {
        let mut registry = DecalRegistry::default();
        let id = stub_decal(&mut registry, "a");
        assert_eq!(registry.apply_edit(DecalEdit::OffsetX(3.5)), Some(id));
        registry.apply_edit(DecalEdit::Face(BoxFace::Top));
        let config = registry.active_decal().unwrap().config;
        assert_eq!(config.offset_x, 3.5);
        assert_eq!(config.face, BoxFace::Top);
        assert_eq!(config.offset_y, 0.0);
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn cycle_walks_insertion_order() {
        let mut registry = DecalRegistry::default();
        let first = stub_decal(&mut registry, "a");
        let second = stub_decal(&mut registry, "b");
        // Insertion left the second active.
        assert_eq!(registry.cycle_active(), Some(first));
        assert_eq!(registry.cycle_active(), Some(second));
        assert_eq!(registry.cycle_active(), Some(first));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = DecalRegistry::default();
        let first = stub_decal(&mut registry, "a");
        registry.remove(first);
        let second = stub_decal(&mut registry, "b");
        assert_ne!(first, second);
    }

    #[test]
    fn plane_size_follows_aspect_ratio() {
        assert_eq!(plane_size(2.0), Vec2::new(20.0, 10.0));
        assert_eq!(plane_size(0.5), Vec2::new(5.0, 10.0));
    }
}
