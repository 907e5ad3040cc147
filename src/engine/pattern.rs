//! Procedural pattern texture generation.
//!
//! Pure rasteriser: (pattern kind, base colour, pattern colour) → a square
//! RGBA8 image suitable for tiling onto the box faces through the default
//! cuboid UV mapping.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::constants::PATTERN_TEXTURE_SIZE;
use crate::engine::config::Pattern;

/// Stripe band width and repeat period
const STRIPE_WIDTH: f32 = 20.0;
const STRIPE_PERIOD: f32 = 40.0;

/// Dot radius, centred on a square grid
const DOT_RADIUS: f32 = 10.0;
const DOT_GRID: f32 = 50.0;

/// Heart glyph tiling: grid pitch with x/y phase, glyph half-extent
const HEART_GRID: f32 = 60.0;
const HEART_PHASE_X: f32 = 20.0;
const HEART_PHASE_Y: f32 = 40.0;
const HEART_SIZE: f32 = 9.0;

/// Generate the pattern raster. The pattern colour is composited over the
/// base fill with its own alpha (source-over), matching a translucent
/// overlay ink on solid paper. `Pattern::None` yields a flat base fill;
/// callers normally skip generation entirely for that kind.
pub fn generate_pattern_texture(kind: Pattern, base: Color, pattern_color: Color) -> Image {
    let size = PATTERN_TEXTURE_SIZE;
    let base_texel = srgba_bytes(base.to_srgba());
    let overlay_texel = composite_over(pattern_color.to_srgba(), base.to_srgba());

    let mut data = Vec::with_capacity(size * size * 4);
    for y in 0..size {
        for x in 0..size {
            // Sample at the texel centre, as a canvas fill would cover it.
            let covered = covers(kind, x as f32 + 0.5, y as f32 + 0.5);
            data.extend_from_slice(if covered { &overlay_texel } else { &base_texel });
        }
    }

    Image::new(
        Extent3d {
            width: size as u32,
            height: size as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// Whether the pattern ink covers the given raster point.
fn covers(kind: Pattern, x: f32, y: f32) -> bool {
    match kind {
        Pattern::None => false,
        Pattern::StripesV => x.rem_euclid(STRIPE_PERIOD) < STRIPE_WIDTH,
        Pattern::StripesH => diagonal_band(x, y),
        Pattern::Dots => {
            let dx = x - (x / DOT_GRID).round() * DOT_GRID;
            let dy = y - (y / DOT_GRID).round() * DOT_GRID;
            dx * dx + dy * dy <= DOT_RADIUS * DOT_RADIUS
        }
        Pattern::Hearts => heart_glyph_covers(x, y),
    }
}

/// Bands drawn in a plane rotated 45° about the raster centre. The name
/// says horizontal; the output is diagonal.
fn diagonal_band(x: f32, y: f32) -> bool {
    let half = PATTERN_TEXTURE_SIZE as f32 / 2.0;
    let (sin, cos) = std::f32::consts::FRAC_PI_4.sin_cos();
    let u = cos * (x - half) + sin * (y - half) + half;
    let v = -sin * (x - half) + cos * (y - half) + half;
    // The rotated fill rects span v ∈ [0, 768); the corner wedge below
    // v = 0 stays unpainted.
    v >= 0.0 && (u + half).rem_euclid(STRIPE_PERIOD) < STRIPE_WIDTH
}

/// Heart glyphs on a 60×60 grid. Each glyph is the implicit sextic heart
/// curve scaled to the footprint of a 40 px text glyph.
fn heart_glyph_covers(x: f32, y: f32) -> bool {
    // Glyph centres: x phase 20 plus half the glyph width, y phase 40
    // (a text baseline) minus half the glyph height above it.
    let cx_origin = HEART_PHASE_X + 11.0;
    let cy_origin = HEART_PHASE_Y - 13.0;
    let col = ((x - cx_origin) / HEART_GRID).round().clamp(0.0, 8.0);
    let row = ((y - cy_origin) / HEART_GRID).round().clamp(0.0, 7.0);
    let hx = (x - (cx_origin + col * HEART_GRID)) / HEART_SIZE;
    let hy = ((cy_origin + row * HEART_GRID) - y) / HEART_SIZE;
    if hx.abs() > 1.5 || hy.abs() > 1.5 {
        return false;
    }
    let r = hx * hx + hy * hy - 1.0;
    r * r * r - hx * hx * hy * hy * hy <= 0.0
}

/// Source-over composite of the pattern ink on the base fill. The output
/// texture is opaque.
fn composite_over(src: Srgba, dst: Srgba) -> [u8; 4] {
    let a = src.alpha.clamp(0.0, 1.0);
    srgba_bytes(Srgba::new(
        src.red * a + dst.red * (1.0 - a),
        src.green * a + dst.green * (1.0 - a),
        src.blue * a + dst.blue * (1.0 - a),
        1.0,
    ))
}

fn srgba_bytes(c: Srgba) -> [u8; 4] {
    [
        (c.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}
