use cairo::{Context, Format, ImageSurface, Matrix};
use pango::FontDescription;

use crate::core::shape::{LineCap, LineJoin};
use crate::core::{
    ApproximateFontMetrics, FontDescriptor, FontMetrics, PathOp, Rect, Rgba, ShapeCommand,
    ShapeKind, TextExtents, Transform,
};
use crate::error::{ExtractError, ExtractResult};
use crate::render::{RasterImage, Rasterizer};

/// Cairo + Pango rasterizer replaying captured commands off-screen.
#[derive(Debug, Clone, Copy)]
pub struct CairoRasterizer {
    background: Rgba,
}

impl Default for CairoRasterizer {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(255, 255, 255),
        }
    }
}

impl CairoRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_background(background: Rgba) -> Self {
        Self { background }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    fn draw_shape(&self, context: &Context, shape: &ShapeCommand) -> ExtractResult<()> {
        context
            .save()
            .map_err(|err| map_backend_error("failed to save context", err))?;
        let base = context.matrix();

        for clip in shape.clips() {
            context.set_matrix(base);
            context.transform(to_matrix(clip.transform));
            append_path(context, &clip.path);
            context.clip();
        }
        context.set_matrix(base);
        context.transform(to_matrix(shape.transform()));

        let style = shape.style();
        let paint = Rgba::parse(style.paint_color()).unwrap_or(Rgba::rgb(0, 0, 0));
        let [red, green, blue, alpha] = paint.to_unit();
        context.set_source_rgba(red, green, blue, alpha * style.global_alpha.clamp(0.0, 1.0));
        context.set_line_width(style.line_width);
        context.set_line_cap(match style.line_cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        });
        context.set_line_join(match style.line_join {
            LineJoin::Miter => cairo::LineJoin::Miter,
            LineJoin::Round => cairo::LineJoin::Round,
            LineJoin::Bevel => cairo::LineJoin::Bevel,
        });
        context.set_miter_limit(style.miter_limit);
        context.set_dash(&style.line_dash, 0.0);

        match shape.kind() {
            ShapeKind::Path(ops) => {
                append_path(context, ops);
                if style.filled {
                    context
                        .fill()
                        .map_err(|err| map_backend_error("failed to fill path", err))?;
                } else {
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke path", err))?;
                }
            }
            ShapeKind::Text(run) => {
                let layout = pangocairo::functions::create_layout(context);
                layout.set_font_description(Some(&font_description(&run.font)));
                layout.set_text(&run.text);
                let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
                context.move_to(run.anchor.x, run.anchor.y - baseline);
                pangocairo::functions::show_layout(context, &layout);
            }
        }

        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))
    }
}

impl Rasterizer for CairoRasterizer {
    fn rasterize(&self, shapes: &[ShapeCommand], region: Rect) -> ExtractResult<RasterImage> {
        let (width, height) = RasterImage::size_for(&region)?;
        let surface_width = i32::try_from(width)
            .map_err(|_| ExtractError::Raster(format!("width {width} exceeds cairo limits")))?;
        let surface_height = i32::try_from(height)
            .map_err(|_| ExtractError::Raster(format!("height {height} exceeds cairo limits")))?;

        let mut surface = ImageSurface::create(Format::ARgb32, surface_width, surface_height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("failed to create cairo context", err))?;
            let [red, green, blue, alpha] = self.background.to_unit();
            context.set_source_rgba(red, green, blue, alpha);
            context
                .paint()
                .map_err(|err| map_backend_error("failed to clear surface", err))?;
            context.translate(-region.x, -region.y);
            for shape in shapes {
                self.draw_shape(&context, shape)?;
            }
        }
        surface.flush();

        let stride = usize::try_from(surface.stride())
            .map_err(|_| ExtractError::Raster("negative surface stride".to_owned()))?;
        let data = surface
            .data()
            .map_err(|err| ExtractError::Raster(format!("failed to read surface: {err}")))?;
        let mut gray = Vec::with_capacity(width as usize * height as usize);
        for row in data.chunks(stride).take(height as usize) {
            // ARGB32 is stored as native-endian u32, i.e. B, G, R, A bytes on little endian.
            for pixel in row.chunks_exact(4).take(width as usize) {
                let argb = u32::from_ne_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
                let red = f64::from((argb >> 16) & 0xff);
                let green = f64::from((argb >> 8) & 0xff);
                let blue = f64::from(argb & 0xff);
                gray.push((0.299 * red + 0.587 * green + 0.114 * blue).round() as u8);
            }
        }
        RasterImage::from_pixels(width, height, gray)
    }
}

/// Font metrics measured with Pango ink extents.
///
/// Falls back to [`ApproximateFontMetrics`] if a measuring surface cannot be
/// created.
#[derive(Debug, Default, Clone, Copy)]
pub struct PangoFontMetrics {
    fallback: ApproximateFontMetrics,
}

impl PangoFontMetrics {
    fn try_measure(&self, text: &str, font: &FontDescriptor) -> ExtractResult<TextExtents> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measuring surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create measuring context", err))?;
        let layout = pangocairo::functions::create_layout(&context);
        layout.set_font_description(Some(&font_description(font)));
        layout.set_text(text);

        let (ink, _logical) = layout.pixel_extents();
        let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
        let top = f64::from(ink.y());
        let bottom = f64::from(ink.y() + ink.height());
        Ok(TextExtents {
            left: -f64::from(ink.x()),
            right: f64::from(ink.x() + ink.width()),
            ascent: baseline - top,
            descent: bottom - baseline,
        })
    }
}

impl FontMetrics for PangoFontMetrics {
    fn measure(&self, text: &str, font: &FontDescriptor) -> TextExtents {
        self.try_measure(text, font)
            .unwrap_or_else(|_| self.fallback.measure(text, font))
    }
}

fn font_description(font: &FontDescriptor) -> FontDescription {
    let mut description = FontDescription::new();
    description.set_family(&font.family);
    description.set_absolute_size(font.size_px * f64::from(pango::SCALE));
    if font.bold {
        description.set_weight(pango::Weight::Bold);
    }
    if font.italic {
        description.set_style(pango::Style::Italic);
    }
    description
}

fn to_matrix(transform: Transform) -> Matrix {
    let [a, b, c, d, e, f] = transform.coefficients();
    Matrix::new(a, b, c, d, e, f)
}

fn append_path(context: &Context, ops: &[PathOp]) {
    context.new_path();
    for op in ops {
        match *op {
            PathOp::Begin => context.new_sub_path(),
            PathOp::Close => context.close_path(),
            PathOp::MoveTo(p) => context.move_to(p.x, p.y),
            PathOp::LineTo(p) => context.line_to(p.x, p.y),
            PathOp::CurveTo { c1, c2, end } => {
                context.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
            }
        }
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ExtractError {
    ExtractError::Raster(format!("{prefix}: {err}"))
}
