//! Color assignment for compiled diagrams.
//!
//! Every function here is pure: the same node id always lands on the same
//! palette slot, regardless of the order nodes are visited.

use serde::{Deserialize, Serialize};

/// Background and border color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub background: &'static str,
    pub border: &'static str,
}

const fn swatch(background: &'static str, border: &'static str) -> Swatch {
    Swatch { background, border }
}

const COLORFUL: [Swatch; 8] = [
    swatch("#60A5FA", "#1E40AF"),
    swatch("#34D399", "#065F46"),
    swatch("#A78BFA", "#4C1D95"),
    swatch("#F59E0B", "#92400E"),
    swatch("#FB7185", "#981B1B"),
    swatch("#F97316", "#C2410C"),
    swatch("#06B6D4", "#075985"),
    swatch("#F472B6", "#BE185D"),
];

const SERIOUS: [Swatch; 8] = [
    swatch("#2563EB", "#0B3B8C"),
    swatch("#0F766E", "#064E40"),
    swatch("#6D28D9", "#3B1F6B"),
    swatch("#92400E", "#6B2F0A"),
    swatch("#7C2D12", "#5C1F1A"),
    swatch("#334155", "#1F2937"),
    swatch("#0F172A", "#071833"),
    swatch("#374151", "#111827"),
];

/// Outline depth colors, indexed by `min(level, 5)`.
const LEVELS: [Swatch; 6] = [
    swatch("#3B82F6", "#1E40AF"),
    swatch("#10B981", "#047857"),
    swatch("#F59E0B", "#D97706"),
    swatch("#8B5CF6", "#6D28D9"),
    swatch("#EC4899", "#BE185D"),
    swatch("#06B6D4", "#0891B2"),
];

const DARK_TEXT: &str = "#0f172a";
const LIGHT_TEXT: &str = "#ffffff";
const LUMINANCE_THRESHOLD: f64 = 0.6;

/// Named palette used when a node has no explicit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    #[default]
    Colorful,
    Serious,
}

impl StylePreset {
    #[must_use]
    pub fn swatches(self) -> &'static [Swatch] {
        match self {
            Self::Colorful => &COLORFUL,
            Self::Serious => &SERIOUS,
        }
    }

    /// Deterministic swatch for a node id.
    #[must_use]
    pub fn swatch_for(self, id: &str) -> Swatch {
        let swatches = self.swatches();
        swatches[palette_index(id, swatches.len())]
    }
}

impl std::str::FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colorful" => Ok(Self::Colorful),
            "serious" => Ok(Self::Serious),
            other => Err(format!("unknown style preset: {other}")),
        }
    }
}

/// FNV-1a over the UTF-16 code units of `id`, reduced to `0..len`.
#[must_use]
pub fn palette_index(id: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let mut hash: u32 = 2_166_136_261;
    for unit in id.encode_utf16() {
        hash ^= u32::from(unit);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash as usize % len
}

/// Swatch for an outline depth. Depths past the palette reuse the last entry.
#[must_use]
pub fn level_swatch(level: usize) -> Swatch {
    LEVELS[level.min(LEVELS.len() - 1)]
}

/// Near-black on light backgrounds, white on dark ones.
///
/// Colors that are not `#rrggbb` are treated as dark.
#[must_use]
pub fn readable_text_color(background: &str) -> &'static str {
    match relative_luminance(background) {
        Some(l) if l > LUMINANCE_THRESHOLD => DARK_TEXT,
        _ => LIGHT_TEXT,
    }
}

fn relative_luminance(hex: &str) -> Option<f64> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<f64> {
        match u8::from_str_radix(digits.get(i..i + 2)?, 16) {
            Ok(v) => Some(f64::from(v) / 255.0),
            Err(_) => None,
        }
    };
    Some(0.2126 * channel(0)? + 0.7152 * channel(2)? + 0.0722 * channel(4)?)
}

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;
