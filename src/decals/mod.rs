//! User-image decals: placement, ownership, and ingestion.

/// Decal collection ownership and active-selection tracking.
pub mod registry;

/// Pure face-anchor and in-plane transform resolution.
pub mod transform;

/// Asynchronous upload decoding and decal materialisation.
pub mod upload;
