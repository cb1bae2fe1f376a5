// Series color model and per-session color assignment
use super::observation::{Manufacturer, Metric};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Intel: indigo through light blue
const INTEL_PALETTE: [Color; 7] = [
    Color::rgb(0x08, 0x10, 0x40),
    Color::rgb(0x01, 0x23, 0xfa),
    Color::rgb(0x1e, 0x88, 0xe5),
    Color::rgb(0x0d, 0xf0, 0xff),
    Color::rgb(0x05, 0xa6, 0x97),
    Color::rgb(0x00, 0x70, 0x9b),
    Color::rgb(0x81, 0xe0, 0xff),
];

// AMD: burgundy through red
const AMD_PALETTE: [Color; 7] = [
    Color::rgb(0x54, 0x09, 0x09),
    Color::rgb(0xc1, 0x22, 0x48),
    Color::rgb(0xff, 0x00, 0x3e),
    Color::rgb(0xff, 0x06, 0x00),
    Color::rgb(0xff, 0x59, 0x00),
    Color::rgb(0xef, 0x53, 0x50),
    Color::rgb(0xb7, 0x00, 0x56),
];

const GENERIC_PALETTE: [Color; 6] = [
    Color::rgb(0x2e, 0x8b, 0x57),
    Color::rgb(0xff, 0x8c, 0x00),
    Color::rgb(0x99, 0x32, 0xcc),
    Color::rgb(0x00, 0x8b, 0x8b),
    Color::rgb(0x8f, 0xbc, 0x8f),
    Color::rgb(0xd2, 0x69, 0x1e),
];

/// Display key for a processor/metric pair, used when each metric line gets its own color.
pub fn variant_key(processor: &str, metric: Metric) -> String {
    format!("{} - {}", processor, metric.label())
}

/// Stable color lookup for display keys.
///
/// The first request for a key takes the next unused color of its manufacturer's
/// palette. Once that palette is used up the key falls back to the generic palette,
/// which cycles. Keys of unknown manufacturers draw from the generic palette directly.
/// Later requests for the same key return the cached color.
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    assigned: HashMap<String, Color>,
    intel_next: usize,
    amd_next: usize,
    generic_next: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, key: &str, manufacturer: Manufacturer) -> Color {
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }

        let color = match manufacturer {
            Manufacturer::Intel => Self::take(&INTEL_PALETTE, &mut self.intel_next)
                .unwrap_or_else(|| self.next_generic()),
            Manufacturer::Amd => Self::take(&AMD_PALETTE, &mut self.amd_next)
                .unwrap_or_else(|| self.next_generic()),
            Manufacturer::Other => self.next_generic(),
        };

        tracing::debug!("Assigned color {} to '{}'", color, key);
        self.assigned.insert(key.to_string(), color);
        color
    }

    /// Number of keys that have been given a color so far
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    fn take(palette: &[Color], next: &mut usize) -> Option<Color> {
        let color = palette.get(*next).copied()?;
        *next += 1;
        Some(color)
    }

    fn next_generic(&mut self) -> Color {
        let color = GENERIC_PALETTE[self.generic_next % GENERIC_PALETTE.len()];
        self.generic_next += 1;
        color
    }
}
