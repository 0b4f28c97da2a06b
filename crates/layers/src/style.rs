use std::fmt;

use serde::{Deserialize, Serialize};

/// Default point color for new layers.
pub const DEFAULT_POINT_COLOR: &str = "#12939A";

/// Visual configuration of a layer on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub name: String,
    /// `#rrggbb` hex string.
    pub point_color: String,
    pub legend: String,
    pub description: String,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            name: String::new(),
            point_color: DEFAULT_POINT_COLOR.to_string(),
            legend: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    InvalidColor(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::InvalidColor(raw) => write!(f, "invalid point color: {raw}"),
        }
    }
}

impl std::error::Error for StyleError {}

impl LayerStyle {
    /// Parse the point color into normalized rgba, alpha fixed to 1.
    pub fn rgba(&self) -> Result<[f32; 4], StyleError> {
        let [r, g, b] = parse_hex_color(&self.point_color)
            .ok_or_else(|| StyleError::InvalidColor(self.point_color.clone()))?;
        Ok([
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ])
    }
}

fn parse_hex_color(raw: &str) -> Option<[u8; 3]> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}
