//! Preview rendering for the drag overlay
//!
//! Rasterises the preview frame (translucent fill plus border) and an optional
//! message line into a `tiny_skia::Pixmap` the size of the preview rectangle.
//! Layout calculation is kept apart from drawing so it can be tested without
//! pixels.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect as SkiaRect, Stroke, Transform};
use tracing::debug;

use crate::domain::core::Rect;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: i32, height: i32 },
    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Font data could not be parsed")]
    InvalidFont,
}

/// Colours and sizes of the preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewStyle {
    pub fill: Color,
    pub border: Color,
    pub border_width: f32,
    pub text: Color,
    pub text_background: Color,
    pub font_size: f32,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            fill: Color::from_rgba8(40, 120, 255, 60),
            border: Color::from_rgba8(40, 120, 255, 220),
            border_width: 3.0,
            text: Color::from_rgba8(255, 255, 255, 255),
            text_background: Color::from_rgba8(0, 0, 0, 160),
            font_size: 28.0,
        }
    }
}

/// Message line placement inside the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLayout {
    pub text: String,
    /// Backdrop behind the text, canvas coordinates
    pub backdrop: SkiaRect,
    /// Left end of the baseline
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
}

/// Pre-calculated geometry for one preview frame
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Border path, inset by half the border width so the stroke stays inside
    pub frame: SkiaRect,
    pub message: Option<MessageLayout>,
}

/// Renderer for the drag preview
pub struct PreviewRenderer {
    style: PreviewStyle,
    font: Option<FontVec>,
}

impl PreviewRenderer {
    /// Creates a renderer without a font; messages are then not drawn
    pub fn new(style: PreviewStyle) -> Self {
        Self { style, font: None }
    }

    pub fn with_font_bytes(style: PreviewStyle, bytes: Vec<u8>) -> Result<Self, RendererError> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| RendererError::InvalidFont)?;
        Ok(Self {
            style,
            font: Some(font),
        })
    }

    pub fn with_font_file(style: PreviewStyle, path: &Path) -> Result<Self, RendererError> {
        let bytes = std::fs::read(path).map_err(|source| RendererError::FontRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::with_font_bytes(style, bytes)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Computes the layout for a preview of `rect` with an optional message
    pub fn layout(&self, rect: Rect, message: Option<&str>) -> Result<PreviewLayout, RendererError> {
        let (width, height) = (rect.width(), rect.height());
        if width <= 0 || height <= 0 {
            return Err(RendererError::PixmapCreationFailed { width, height });
        }
        let (w, h) = (width as f32, height as f32);

        let inset = (self.style.border_width / 2.0).min(w / 2.0).min(h / 2.0);
        let frame = SkiaRect::from_ltrb(inset, inset, w - inset, h - inset)
            .or_else(|| SkiaRect::from_xywh(0.0, 0.0, w, h))
            .ok_or(RendererError::PixmapCreationFailed { width, height })?;

        let message = match (message, &self.font) {
            (Some(text), Some(font)) if !text.is_empty() => self.message_layout(font, text, w, h),
            (Some(_), None) => {
                debug!("no font configured, skipping preview message");
                None
            }
            _ => None,
        };

        Ok(PreviewLayout {
            canvas_width: width as u32,
            canvas_height: height as u32,
            frame,
            message,
        })
    }

    fn message_layout(&self, font: &FontVec, text: &str, width: f32, height: f32) -> Option<MessageLayout> {
        let font_size = self.style.font_size;
        let scaled = font.as_scaled(PxScale::from(font_size));
        let text_width: f32 = text.chars().map(|ch| scaled.h_advance(scaled.glyph_id(ch))).sum();
        let text_height = scaled.ascent() - scaled.descent();
        let padding = font_size / 2.0;

        let x = (width - text_width) / 2.0;
        let top = (height - text_height) / 2.0;
        let backdrop = SkiaRect::from_xywh(
            x - padding,
            top - padding / 2.0,
            text_width + padding * 2.0,
            text_height + padding,
        )?;

        Some(MessageLayout {
            text: text.to_string(),
            backdrop,
            x,
            baseline: top + scaled.ascent(),
            font_size,
        })
    }

    /// Draws a layout into a fresh pixmap
    pub fn render(&self, layout: &PreviewLayout) -> Result<Pixmap, RendererError> {
        let mut pixmap = Pixmap::new(layout.canvas_width, layout.canvas_height).ok_or(
            RendererError::PixmapCreationFailed {
                width: layout.canvas_width as i32,
                height: layout.canvas_height as i32,
            },
        )?;
        pixmap.fill(Color::TRANSPARENT);

        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.set_color(self.style.fill);
        pixmap.fill_rect(layout.frame, &paint, Transform::identity(), None);

        let border = PathBuilder::from_rect(layout.frame);
        paint.set_color(self.style.border);
        let stroke = Stroke {
            width: self.style.border_width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&border, &paint, &stroke, Transform::identity(), None);

        if let (Some(message), Some(font)) = (&layout.message, &self.font) {
            paint.set_color(self.style.text_background);
            pixmap.fill_rect(message.backdrop, &paint, Transform::identity(), None);
            draw_text(&mut pixmap, font, message, self.style.text);
        }

        Ok(pixmap)
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(PreviewStyle::default())
    }
}

fn draw_text(pixmap: &mut Pixmap, font: &FontVec, message: &MessageLayout, color: Color) {
    let scale = PxScale::from(message.font_size);
    let scaled = font.as_scaled(scale);
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    let pixels = pixmap.pixels_mut();

    let mut caret = message.x;
    for ch in message.text.chars() {
        let id = scaled.glyph_id(ch);
        let glyph = id.with_scale_and_position(scale, point(caret, message.baseline));
        caret += scaled.h_advance(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let index = (y * width + x) as usize;
            pixels[index] = blend_over(pixels[index], color, coverage);
        });
    }
}

/// Source-over blend of `color` at `coverage` onto a premultiplied pixel
fn blend_over(dst: PremultipliedColorU8, color: Color, coverage: f32) -> PremultipliedColorU8 {
    let alpha = (color.alpha() * coverage.clamp(0.0, 1.0)).clamp(0.0, 1.0);
    let inverse = 1.0 - alpha;
    let channel = |src: f32, dst: u8| -> u8 { (src * alpha * 255.0 + dst as f32 * inverse).round().clamp(0.0, 255.0) as u8 };

    let a = channel(1.0, dst.alpha());
    // Premultiplied channels never exceed alpha
    let r = channel(color.red(), dst.red()).min(a);
    let g = channel(color.green(), dst.green()).min(a);
    let b = channel(color.blue(), dst.blue()).min(a);
    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(dst)
}

/// Premultiplied BGRA bytes, the layout a 32-bit top-down DIB expects
pub fn to_bgra_premultiplied(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = pixmap.data().to_vec();
    for pixel in data.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    data
}
