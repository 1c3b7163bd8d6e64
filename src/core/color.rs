use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

/// 8-bit RGBA color parsed from a canvas paint string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    pub fn parse(paint: &str) -> ExtractResult<Self> {
        let paint = paint.trim();
        if let Some(hex) = paint.strip_prefix('#') {
            return parse_hex_digits(hex).ok_or_else(|| invalid(paint));
        }
        if let Some(body) = paint
            .strip_prefix("rgba(")
            .or_else(|| paint.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body).ok_or_else(|| invalid(paint));
        }
        parse_hex_digits(paint).ok_or_else(|| invalid(paint))
    }

    /// Chromatic colors are anything but grays, black and white.
    #[must_use]
    pub fn is_colorful(&self) -> bool {
        !(self.red == self.green && self.green == self.blue)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Channels normalized to `0..=1`, as expected by vector backends.
    #[must_use]
    pub fn to_unit(&self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.alpha].map(|c| f64::from(c) / 255.0)
    }
}

/// Converts a hex (or `rgb()`) paint string into its RGB triple.
pub fn color_hex_to_rgb(paint: &str) -> ExtractResult<[u8; 3]> {
    let color = Rgba::parse(paint)?;
    Ok([color.red, color.green, color.blue])
}

/// Unparseable paints (gradients, patterns) are never considered colorful.
#[must_use]
pub fn is_colorful(paint: &str) -> bool {
    Rgba::parse(paint).is_ok_and(|color| color.is_colorful())
}

fn invalid(paint: &str) -> ExtractError {
    ExtractError::InvalidData(format!("unsupported paint color `{paint}`"))
}

fn parse_hex_digits(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    let short = |index: usize| {
        let digit = u8::from_str_radix(hex.get(index..=index)?, 16).ok()?;
        Some(digit * 17)
    };
    match hex.len() {
        3 => Some(Rgba::rgb(short(0)?, short(1)?, short(2)?)),
        6 => Some(Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Rgba {
            alpha: channel(6..8)?,
            ..Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)
        }),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let byte = |part: &str| -> Option<u8> {
        let value: f64 = part.parse().ok()?;
        (0.0..=255.0).contains(&value).then(|| value.round() as u8)
    };
    match parts.as_slice() {
        [r, g, b] => Some(Rgba::rgb(byte(r)?, byte(g)?, byte(b)?)),
        [r, g, b, a] => {
            let alpha: f64 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            Some(Rgba {
                alpha: (alpha * 255.0).round() as u8,
                ..Rgba::rgb(byte(r)?, byte(g)?, byte(b)?)
            })
        }
        _ => None,
    }
}
