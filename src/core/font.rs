use serde::{Deserialize, Serialize};

/// Canvas-style font descriptor, e.g. parsed from `"bold 12px Arial"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_owned(),
            size_px: 10.0,
            bold: false,
            italic: false,
        }
    }
}

impl FontDescriptor {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            ..Self::default()
        }
    }

    /// Parses the CSS shorthand used by canvas contexts. Unknown tokens are
    /// ignored; missing parts fall back to `10px sans-serif`.
    #[must_use]
    pub fn from_css(css: &str) -> Self {
        let mut font = Self::default();
        let mut tokens = css.split_whitespace();
        let mut family = Vec::new();
        while let Some(token) = tokens.next() {
            match token {
                "bold" | "bolder" => font.bold = true,
                "italic" | "oblique" => font.italic = true,
                _ => {
                    let size = token.split('/').next().unwrap_or(token);
                    if let Some(px) = size.strip_suffix("px").and_then(|v| v.parse::<f64>().ok()) {
                        font.size_px = px;
                        family.extend(tokens.by_ref());
                        break;
                    }
                }
            }
        }
        if !family.is_empty() {
            font.family = family.join(" ").replace(['"', '\''], "");
        }
        font
    }

    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if self.italic {
            css.push_str("italic ");
        }
        if self.bold {
            css.push_str("bold ");
        }
        css.push_str(&format!("{}px {}", self.size_px, self.family));
        css
    }
}

/// Ink extents of a text run measured from its anchor point, with the same
/// meaning as the canvas `actualBoundingBox*` metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub left: f64,
    pub right: f64,
    pub ascent: f64,
    pub descent: f64,
}

/// Measures text runs so their bounding boxes can be computed.
pub trait FontMetrics {
    fn measure(&self, text: &str, font: &FontDescriptor) -> TextExtents;
}

/// Backend-free metrics based on fixed em ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    pub advance_ratio: f64,
    pub ascent_ratio: f64,
    pub descent_ratio: f64,
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            ascent_ratio: 0.75,
            descent_ratio: 0.2,
        }
    }
}

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, text: &str, font: &FontDescriptor) -> TextExtents {
        let chars = text.chars().count() as f64;
        TextExtents {
            left: 0.0,
            right: chars * font.size_px * self.advance_ratio,
            ascent: font.size_px * self.ascent_ratio,
            descent: font.size_px * self.descent_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canvas_shorthand() {
        let font = FontDescriptor::from_css("italic bold 12px \"Helvetica Neue\"");
        assert!(font.bold && font.italic);
        assert_eq!(font.size_px, 12.0);
        assert_eq!(font.family, "Helvetica Neue");
    }

    #[test]
    fn falls_back_to_canvas_default() {
        let font = FontDescriptor::from_css("garbage");
        assert_eq!(font, FontDescriptor::default());
    }
}
