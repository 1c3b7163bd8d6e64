use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::font::{FontDescriptor, FontMetrics};
use crate::core::geometry::{Rect, Transform};

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one captured drawing command. Clones keep the id; sub-shapes
/// receive fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(u64);

impl ShapeId {
    fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathOp {
    Begin,
    Close,
    MoveTo(DVec2),
    LineTo(DVec2),
    CurveTo { c1: DVec2, c2: DVec2, end: DVec2 },
}

impl PathOp {
    #[must_use]
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::MoveTo(DVec2::new(x, y))
    }

    #[must_use]
    pub fn line_to(x: f64, y: f64) -> Self {
        Self::LineTo(DVec2::new(x, y))
    }

    #[must_use]
    pub fn curve_to(c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) -> Self {
        Self::CurveTo {
            c1: DVec2::new(c1.0, c1.1),
            c2: DVec2::new(c2.0, c2.1),
            end: DVec2::new(end.0, end.1),
        }
    }

    /// Pen position after the operation, for ops that move the pen.
    #[must_use]
    pub fn end_point(&self) -> Option<DVec2> {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(*p),
            Self::CurveTo { end, .. } => Some(*end),
            Self::Begin | Self::Close => None,
        }
    }
}

/// Untransformed extent of a path. `MoveTo` only relocates the pen; `LineTo`
/// and `CurveTo` expand the box over the previous pen position and their own
/// points (control points included, which over-approximates curves).
#[must_use]
pub fn path_extent(ops: &[PathOp]) -> Option<Rect> {
    let mut last = DVec2::ZERO;
    let mut points: SmallVec<[DVec2; 16]> = SmallVec::new();
    for op in ops {
        match *op {
            PathOp::MoveTo(p) => last = p,
            PathOp::LineTo(p) => {
                points.extend([last, p]);
                last = p;
            }
            PathOp::CurveTo { c1, c2, end } => {
                points.extend([last, c1, c2, end]);
                last = end;
            }
            PathOp::Begin | PathOp::Close => {}
        }
    }
    Rect::enclosing(points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Paint state captured alongside a drawing command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub filled: bool,
    pub fill_color: String,
    pub stroke_color: String,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Vec<f64>,
    pub global_alpha: f64,
    pub composite_operation: String,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            filled: false,
            fill_color: "#000".to_owned(),
            stroke_color: "#000".to_owned(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            line_dash: Vec::new(),
            global_alpha: 1.0,
            composite_operation: "source-over".to_owned(),
        }
    }
}

impl ShapeStyle {
    #[must_use]
    pub fn stroked(color: impl Into<String>) -> Self {
        Self {
            stroke_color: color.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filled(color: impl Into<String>) -> Self {
        Self {
            filled: true,
            fill_color: color.into(),
            ..Self::default()
        }
    }

    /// Fill color for filled shapes, stroke color otherwise.
    #[must_use]
    pub fn paint_color(&self) -> &str {
        if self.filled {
            &self.fill_color
        } else {
            &self.stroke_color
        }
    }
}

/// Clip path in effect when the command was drawn, with its own transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRegion {
    pub path: Vec<PathOp>,
    pub transform: Transform,
}

impl ClipRegion {
    #[must_use]
    pub fn new(path: Vec<PathOp>, transform: Transform) -> Self {
        Self { path, transform }
    }

    /// Closed rectangular clip in its local coordinates.
    #[must_use]
    pub fn rect(rect: Rect, transform: Transform) -> Self {
        let path = vec![
            PathOp::Begin,
            PathOp::move_to(rect.x, rect.y),
            PathOp::line_to(rect.right(), rect.y),
            PathOp::line_to(rect.right(), rect.bottom()),
            PathOp::line_to(rect.x, rect.bottom()),
            PathOp::Close,
        ];
        Self::new(path, transform)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        path_extent(&self.path).map(|extent| self.transform.map_rect(&extent))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub anchor: DVec2,
    pub font: FontDescriptor,
}

impl TextRun {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, font: FontDescriptor) -> Self {
        Self {
            text: text.into(),
            anchor: DVec2::new(x, y),
            font,
        }
    }
}

/// A drawing command is either a path or a text run, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Path(Vec<PathOp>),
    Text(TextRun),
}

/// One captured drawing command with its style, transform, clips and a
/// bounding box cached in transformed page space.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCommand {
    id: ShapeId,
    kind: ShapeKind,
    style: ShapeStyle,
    transform: Transform,
    clips: Vec<ClipRegion>,
    unclipped: Rect,
    bbox: Rect,
}

impl ShapeCommand {
    #[must_use]
    pub fn path(ops: Vec<PathOp>, style: ShapeStyle, transform: Transform) -> Self {
        let unclipped = path_extent(&ops)
            .map(|extent| transform.map_rect(&extent))
            .unwrap_or_else(|| {
                let pen = ops.iter().rev().find_map(PathOp::end_point).unwrap_or(DVec2::ZERO);
                Rect::from_corners(transform.apply(pen), transform.apply(pen))
            });
        Self {
            id: ShapeId::next(),
            kind: ShapeKind::Path(ops),
            style,
            transform,
            clips: Vec::new(),
            unclipped,
            bbox: unclipped,
        }
    }

    /// Text runs need font metrics: the ink box around the anchor is measured
    /// then mapped through `transform`.
    #[must_use]
    pub fn text(
        run: TextRun,
        style: ShapeStyle,
        transform: Transform,
        metrics: &dyn FontMetrics,
    ) -> Self {
        let extents = metrics.measure(&run.text, &run.font);
        let local = Rect::from_corners(
            DVec2::new(run.anchor.x - extents.left, run.anchor.y - extents.ascent),
            DVec2::new(run.anchor.x + extents.right, run.anchor.y + extents.descent),
        );
        let unclipped = transform.map_rect(&local);
        Self {
            id: ShapeId::next(),
            kind: ShapeKind::Text(run),
            style,
            transform,
            clips: Vec::new(),
            unclipped,
            bbox: unclipped,
        }
    }

    /// Appends a clip region; the box only ever narrows.
    #[must_use]
    pub fn with_clip(mut self, clip: ClipRegion) -> Self {
        if let Some(bounds) = clip.bounds() {
            self.bbox = self.bbox.intersect(&bounds);
        }
        self.clips.push(clip);
        self
    }

    #[must_use]
    pub fn with_clips(self, clips: impl IntoIterator<Item = ClipRegion>) -> Self {
        clips.into_iter().fold(self, Self::with_clip)
    }

    /// New command sharing style, transform and clips but drawing `ops`.
    #[must_use]
    pub fn sub_shape(&self, ops: Vec<PathOp>) -> Self {
        Self::path(ops, self.style.clone(), self.transform).with_clips(self.clips.iter().cloned())
    }

    #[must_use]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[must_use]
    pub fn path_ops(&self) -> Option<&[PathOp]> {
        match &self.kind {
            ShapeKind::Path(ops) => Some(ops),
            ShapeKind::Text(_) => None,
        }
    }

    #[must_use]
    pub fn text_run(&self) -> Option<&TextRun> {
        match &self.kind {
            ShapeKind::Text(run) => Some(run),
            ShapeKind::Path(_) => None,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ShapeKind::Text(_))
    }

    #[must_use]
    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[must_use]
    pub fn clips(&self) -> &[ClipRegion] {
        &self.clips
    }

    /// Box in page space after clipping.
    #[must_use]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Box in page space ignoring clip regions.
    #[must_use]
    pub fn unclipped_bbox(&self) -> Rect {
        self.unclipped
    }

    /// Strict containment: touching any edge of `rect` is not contained.
    #[must_use]
    pub fn is_contained(&self, rect: &Rect) -> bool {
        rect.strictly_contains(&self.bbox)
    }
}

/// Shapes of `shapes` strictly inside `selection`, in input order.
#[must_use]
pub fn select_contained<'a>(shapes: &'a [ShapeCommand], selection: &Rect) -> Vec<&'a ShapeCommand> {
    shapes.iter().filter(|shape| shape.is_contained(selection)).collect()
}
