//! Reconstruction of lines and words from individually positioned glyphs.
//!
//! Glyph boxes are compared in their de-rotated ("aligned") frame so rotated
//! axis labels group the same way as horizontal ones.

pub mod ocr;

use glam::DVec2;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::{Rect, ShapeCommand, Transform};
use crate::error::{ExtractError, ExtractResult};
use crate::render::Rasterizer;

pub use ocr::{NoOcr, OcrEngine, OcrSymbol};

/// Default OCR language hint.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// A glyph, or several merged glyphs forming a word.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    /// Box in page space.
    pub rect: Rect,
    /// Box in the glyph's own de-rotated frame.
    pub aligned_rect: Rect,
}

impl TextChunk {
    /// `None` for path shapes.
    #[must_use]
    pub fn from_shape(shape: &ShapeCommand) -> Option<Self> {
        let run = shape.text_run()?;
        Some(Self {
            text: run.text.clone(),
            rect: shape.bbox(),
            aligned_rect: aligned_bounds(shape),
        })
    }

    /// Maps an OCR symbol from bitmap space back to page space.
    #[must_use]
    pub fn from_symbol(symbol: OcrSymbol, origin: DVec2) -> Self {
        let rect = symbol.bbox.translated(origin.x, origin.y);
        Self {
            text: symbol.text,
            rect,
            aligned_rect: rect,
        }
    }

    /// Average glyph width of the chunk.
    #[must_use]
    pub fn letter_width(&self) -> f64 {
        let chars = self.text.chars().count().max(1);
        self.aligned_rect.width / chars as f64
    }

    fn absorb(&mut self, other: &TextChunk) {
        self.text.push_str(&other.text);
        self.rect = self.rect.union(&other.rect);
        self.aligned_rect = self.aligned_rect.union(&other.aligned_rect);
    }
}

/// Bounding box rotated back by the shape's own rotation.
///
/// The page-space box is rotated, not the glyph's local box, so this is exact
/// only for multiples of 90 degrees. Other angles give an inflated box.
#[must_use]
pub fn aligned_bounds(shape: &ShapeCommand) -> Rect {
    let bounds = shape.bbox();
    let angle = shape.transform().rotation_angle();
    if angle == 0.0 {
        return bounds;
    }
    Transform::rotation(-angle).map_rect(&bounds)
}

#[derive(Debug)]
struct TextLine {
    chunks: Vec<TextChunk>,
    aligned_rect: Rect,
    total_letter_width: f64,
}

impl TextLine {
    fn new(chunk: TextChunk) -> Self {
        Self {
            aligned_rect: chunk.aligned_rect,
            total_letter_width: chunk.letter_width(),
            chunks: vec![chunk],
        }
    }

    fn accepts(&self, chunk: &TextChunk) -> bool {
        self.aligned_rect.vertical_overlap(&chunk.aligned_rect) > 0.0
    }

    fn push(&mut self, chunk: TextChunk) {
        self.aligned_rect = self.aligned_rect.union(&chunk.aligned_rect);
        self.total_letter_width += chunk.letter_width();
        self.chunks.push(chunk);
    }

    /// Splits wherever the gap to the current word reaches the line's average
    /// glyph width.
    fn into_words(self) -> Vec<TextChunk> {
        let average = self.total_letter_width / self.chunks.len().max(1) as f64;
        let mut words: Vec<TextChunk> = Vec::new();
        for chunk in self.chunks {
            match words.last_mut() {
                Some(word) if chunk.aligned_rect.x - word.aligned_rect.right() < average => {
                    word.absorb(&chunk);
                }
                _ => words.push(chunk),
            }
        }
        words
    }
}

/// Groups chunks into lines (top to bottom) of words (left to right).
#[must_use]
pub fn chunks_to_lines(mut chunks: Vec<TextChunk>) -> Vec<Vec<TextChunk>> {
    chunks.sort_by_key(|chunk| OrderedFloat(chunk.aligned_rect.x));

    let mut lines: Vec<TextLine> = Vec::new();
    for chunk in chunks {
        match lines.iter_mut().rev().find(|line| line.accepts(&chunk)) {
            Some(line) => line.push(chunk),
            None => lines.push(TextLine::new(chunk)),
        }
    }
    lines.sort_by_key(|line| OrderedFloat(line.aligned_rect.y));
    lines.into_iter().map(TextLine::into_words).collect()
}

/// Lines of words built from native text shapes; `None` without any.
#[must_use]
pub fn texts_from_text_shapes<'a>(
    shapes: impl IntoIterator<Item = &'a ShapeCommand>,
) -> Option<Vec<Vec<TextChunk>>> {
    let chunks: Vec<TextChunk> = shapes.into_iter().filter_map(TextChunk::from_shape).collect();
    if chunks.is_empty() {
        return None;
    }
    Some(chunks_to_lines(chunks))
}

/// Flattens lines of words into one string.
#[must_use]
pub fn join_text(lines: &[Vec<TextChunk>], word_separator: &str, line_separator: &str) -> String {
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|word| word.text.as_str())
                .collect::<Vec<_>>()
                .join(word_separator)
        })
        .collect::<Vec<_>>()
        .join(line_separator)
}

/// Text extraction with an OCR fallback for selections that carry no native
/// text runs (outlined or rasterized glyphs).
#[derive(Debug, Clone)]
pub struct TextMerger<R, O> {
    rasterizer: R,
    ocr: O,
    language: String,
}

impl<R: Rasterizer, O: OcrEngine> TextMerger<R, O> {
    #[must_use]
    pub fn new(rasterizer: R, ocr: O) -> Self {
        Self {
            rasterizer,
            ocr,
            language: DEFAULT_OCR_LANGUAGE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Native text when present, otherwise OCR when `allow_ocr` is set.
    /// Fails with `NothingExtracted` when neither yields a single glyph.
    pub async fn texts_from_shapes(
        &self,
        shapes: &[ShapeCommand],
        allow_ocr: bool,
    ) -> ExtractResult<Vec<Vec<TextChunk>>> {
        if let Some(lines) = texts_from_text_shapes(shapes) {
            return Ok(lines);
        }
        if !allow_ocr {
            return Err(ExtractError::nothing_extracted("no text shapes in selection"));
        }
        let chunks = self.recognize_rendered(shapes).await?;
        if chunks.is_empty() {
            return Err(ExtractError::nothing_extracted("ocr found no text in selection"));
        }
        Ok(chunks_to_lines(chunks))
    }

    /// Rasterizes the union of the shapes' boxes and maps recognized symbols
    /// back to page space.
    pub async fn recognize_rendered(&self, shapes: &[ShapeCommand]) -> ExtractResult<Vec<TextChunk>> {
        let Some(region) = shapes
            .iter()
            .map(ShapeCommand::bbox)
            .reduce(|acc, rect| acc.union(&rect))
        else {
            return Ok(Vec::new());
        };
        let image = self.rasterizer.rasterize(shapes, region)?;
        let symbols = self.ocr.recognize(&image, &self.language).await?;
        debug!(
            symbol_count = symbols.len(),
            width = image.width(),
            height = image.height(),
            "ocr pass finished"
        );
        let origin = DVec2::new(region.x, region.y);
        Ok(symbols
            .into_iter()
            .map(|symbol| TextChunk::from_symbol(symbol, origin))
            .collect())
    }

    /// Words joined by a space and lines by a newline.
    pub async fn text_from_shapes(&self, shapes: &[ShapeCommand], allow_ocr: bool) -> ExtractResult<String> {
        let lines = self.texts_from_shapes(shapes, allow_ocr).await?;
        Ok(join_text(&lines, " ", "\n"))
    }
}
