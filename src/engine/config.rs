use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DIMENSION;

/// Procedural surface pattern applied to the box in place of a flat colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    #[default]
    None,
    StripesH,
    StripesV,
    Dots,
    Hearts,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::None,
        Pattern::StripesH,
        Pattern::StripesV,
        Pattern::Dots,
        Pattern::Hearts,
    ];

    /// Convert string identifier to a pattern. Unknown values silently
    /// behave as `None`.
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "stripes_h" => Self::StripesH,
            "stripes_v" => Self::StripesV,
            "dots" => Self::Dots,
            "hearts" => Self::Hearts,
            _ => Self::None,
        }
    }

    /// Convert pattern to string identifier for summaries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::StripesH => "stripes_h",
            Self::StripesV => "stripes_v",
            Self::Dots => "dots",
            Self::Hearts => "hearts",
        }
    }

    /// Next pattern in presentation order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Box dimensions in centimetres. Always positive finite numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

/// Resource holding the full gift box configuration. Every field edit is
/// followed by a wholesale scene rebuild.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct BoxConfig {
    pub width: f32,
    pub height: f32,
    pub length: f32,
    pub box_color: Color,
    pub ribbon_color: Color,
    pub has_ribbon: bool,
    pub pattern: Pattern,
    pub pattern_color: Color,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 15.0,
            length: 20.0,
            box_color: Color::WHITE,
            ribbon_color: Color::srgb_u8(0xef, 0x44, 0x44),
            has_ribbon: true,
            pattern: Pattern::None,
            pattern_color: Color::srgba(0.0, 0.0, 0.0, 0.15),
        }
    }
}

impl BoxConfig {
    pub fn dimensions(&self) -> BoxDimensions {
        BoxDimensions {
            width: self.width,
            height: self.height,
            length: self.length,
        }
    }

    /// Human-readable configuration summary for order export.
    pub fn product_details(&self) -> String {
        let ribbon = if self.has_ribbon {
            color_to_hex(self.ribbon_color)
        } else {
            String::from("none")
        };
        format!(
            "Size: {}x{}x{}cm, Box colour: {}, Ribbon: {}, Pattern: {}",
            self.width,
            self.height,
            self.length,
            color_to_hex(self.box_color),
            ribbon,
            self.pattern.as_str(),
        )
    }
}

/// Coerce raw dimension input to a positive finite value. Unparsable,
/// non-finite, or non-positive text yields the default instead of an error.
pub fn parse_dimension(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => DEFAULT_DIMENSION,
    }
}

/// Parse a `#rrggbb` / `#rrggbbaa` colour swatch value, falling back to
/// white for malformed input.
pub fn parse_color(raw: &str) -> Color {
    Srgba::hex(raw.trim()).map(Color::Srgba).unwrap_or(Color::WHITE)
}

fn color_to_hex(color: Color) -> String {
    format!("#{}", color.to_srgba().to_hex().trim_start_matches('#')).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_dimension_coerces_to_default() {
        assert_eq!(parse_dimension("abc"), 10.0);
        assert_eq!(parse_dimension(""), 10.0);
        assert_eq!(parse_dimension("NaN"), 10.0);
        assert_eq!(parse_dimension("inf"), 10.0);
    }

    #[test]
    fn non_positive_dimension_coerces_to_default() {
        assert_eq!(parse_dimension("0"), 10.0);
        assert_eq!(parse_dimension("-5"), 10.0);
    }

    #[test]
    fn valid_dimension_passes_through() {
        assert_eq!(parse_dimension("22.5"), 22.5);
        assert_eq!(parse_dimension(" 30 "), 30.0);
    }

    #[test]
    fn unknown_pattern_behaves_as_none() {
        assert_eq!(Pattern::from_string("zigzag"), Pattern::None);
        assert_eq!(Pattern::from_string(""), Pattern::None);
    }

    #[test]
    fn pattern_round_trips_through_names() {
        for pattern in Pattern::ALL {
            assert_eq!(Pattern::from_string(pattern.as_str()), pattern);
        }
    }

    #[test]
    fn pattern_cycle_visits_every_kind() {
        let mut pattern = Pattern::None;
        let mut seen = Vec::new();
        for _ in 0..Pattern::ALL.len() {
            seen.push(pattern);
            pattern = pattern.next();
        }
        assert_eq!(pattern, Pattern::None);
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn malformed_color_falls_back_to_white() {
        assert_eq!(parse_color("not-a-colour"), Color::WHITE);
    }

    #[test]
    fn hex_color_parses_with_alpha() {
        let color = parse_color("#00000026").to_srgba();
        assert_eq!(color.red, 0.0);
        assert!((color.alpha - 0.15).abs() < 0.01);
    }

    #[test]
    fn product_details_is_complete() {
        let config = BoxConfig::default();
        let details = config.product_details();
        assert!(details.contains("20x15x20cm"));
        assert!(details.contains("#ffffff"));
        assert!(details.contains("#ef4444"));
        assert!(details.contains("none"));
    }

    #[test]
    fn product_details_reports_disabled_ribbon() {
        let config = BoxConfig {
            has_ribbon: false,
            ..default()
        };
        assert!(config.product_details().contains("Ribbon: none"));
    }
}
