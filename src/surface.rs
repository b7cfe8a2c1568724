//! The 2D drawing surface shared by batch synthesis and the editor renderer.
//!
//! A [`Surface`] is a square tiny_skia pixmap with the handful of operations
//! the pipeline needs: solid and rounded-rectangle fills, stretch and
//! transformed bitmap draws, a glow silhouette pass, and PNG encoding. All
//! drawing is synchronous and deterministic; identical call sequences produce
//! byte-identical PNG output.

use crate::error::RenderError;
use image::{ImageFormat, Rgba, RgbaImage};
use palette::Srgb;
use resvg::tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Transform,
};
use std::io::Cursor;

/// Circular-arc approximation constant for cubic corner segments.
const KAPPA: f32 = 0.552_284_75;

// ============================================================================
// Color helpers
// ============================================================================

/// Parses a `#rrggbb` (or shorthand `#rgb`) hex string into an opaque pixel.
///
/// Returns `None` for anything unparsable, including `"transparent"`;
/// callers decide what an absent fill means.
pub fn parse_hex(input: &str) -> Option<Rgba<u8>> {
    let rgb: Srgb<u8> = input.trim().parse().ok()?;
    Some(Rgba([rgb.red, rgb.green, rgb.blue, 255]))
}

fn to_color(pixel: Rgba<u8>) -> Color {
    Color::from_rgba8(pixel[0], pixel[1], pixel[2], pixel[3])
}

// ============================================================================
// Pixmap conversions
// ============================================================================

/// Converts a premultiplied tiny_skia pixmap to a straight-alpha RGBA image.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (src, dst) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    img
}

/// Converts a straight-alpha RGBA image to a premultiplied pixmap.
///
/// Returns `None` only for zero-sized input.
pub fn rgba_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (src, dst) in img.pixels().zip(pixmap.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

// ============================================================================
// Surface
// ============================================================================

/// A square working surface of side `size`, initially fully transparent.
pub struct Surface {
    pixmap: Pixmap,
    size: u32,
}

impl Surface {
    /// Allocates a transparent `size`×`size` surface.
    ///
    /// Allocation failure maps to [`RenderError::Unsupported`]: there is no
    /// environment to draw in, which is fatal and non-retryable.
    pub fn new(size: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(size, size).ok_or(RenderError::Unsupported { size })?;
        Ok(Self { pixmap, size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Resets the surface to fully transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Fills the surface edge-to-edge with a solid color.
    pub fn fill(&mut self, color: Rgba<u8>) {
        self.pixmap.fill(to_color(color));
    }

    /// Fills a rounded rectangle covering the whole surface, with the given
    /// corner radius in pixels.
    pub fn fill_rounded(&mut self, color: Rgba<u8>, radius: f32) {
        let side = self.size as f32;
        let Some(path) = rounded_rect_path(side, radius) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(to_color(color));
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Draws `src` stretched into the axis-aligned rectangle at `(x, y)` with
    /// dimensions `w`×`h`, ignoring the source aspect ratio.
    pub fn draw_bitmap_rect(&mut self, src: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        let transform = Transform::from_translate(x, y);
        self.draw_bitmap_transformed(src, transform, w, h);
    }

    /// Draws `src` scaled to `w`×`h` under an arbitrary transform.
    ///
    /// The transform maps the rectangle `(0, 0)..(w, h)` onto the surface;
    /// sampling is bilinear.
    pub fn draw_bitmap_transformed(&mut self, src: &RgbaImage, transform: Transform, w: f32, h: f32) {
        if src.width() == 0 || src.height() == 0 || w <= 0.0 || h <= 0.0 {
            return;
        }
        let Some(pixmap) = rgba_to_pixmap(src) else {
            return;
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let full = transform.pre_scale(w / src.width() as f32, h / src.height() as f32);
        self.pixmap.draw_pixmap(0, 0, pixmap.as_ref(), &paint, full, None);
    }

    /// Returns the surface contents as a straight-alpha RGBA image.
    pub fn to_rgba(&self) -> RgbaImage {
        pixmap_to_rgba(&self.pixmap)
    }

    /// Encodes the surface to PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let img = self.to_rgba();
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}

/// Builds a rounded-rectangle path from the origin with side `size`.
///
/// Corners are cubic arcs (circular to within the standard kappa
/// approximation), matching 2D-canvas rounded rectangles.
fn rounded_rect_path(size: f32, radius: f32) -> Option<Path> {
    let r = radius.clamp(0.0, size / 2.0);
    if r <= 0.0 {
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        pb.line_to(size, 0.0);
        pb.line_to(size, size);
        pb.line_to(0.0, size);
        pb.close();
        return pb.finish();
    }

    let k = r * (1.0 - KAPPA);
    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(size - r, 0.0);
    pb.cubic_to(size - k, 0.0, size, k, size, r);
    pb.line_to(size, size - r);
    pb.cubic_to(size, size - k, size - k, size, size - r, size);
    pb.line_to(r, size);
    pb.cubic_to(k, size, 0.0, size - k, 0.0, size - r);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, k, k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

// ============================================================================
// Glow silhouette
// ============================================================================

/// Builds the halo for the glow-outline style: a blurred, uniformly tinted
/// silhouette of `src`, with a transparent margin wide enough for the blur
/// to bleed into.
///
/// `blur` follows 2D-canvas shadow-blur semantics; the gaussian is
/// approximated with three separable box-blur passes.
pub fn glow_silhouette(src: &RgbaImage, tint: Rgba<u8>, blur: f32) -> RgbaImage {
    let margin = glow_margin(blur);
    let width = src.width() + 2 * margin;
    let height = src.height() + 2 * margin;

    // Alpha plane with the source silhouette centered in the margin
    let mut plane = vec![0.0f32; (width * height) as usize];
    for (x, y, pixel) in src.enumerate_pixels() {
        let idx = ((y + margin) * width + x + margin) as usize;
        plane[idx] = pixel[3] as f32 / 255.0;
    }

    let radius = ((blur / 2.0).round() as u32).max(1);
    for _ in 0..3 {
        box_blur_horizontal(&mut plane, width, height, radius);
        box_blur_vertical(&mut plane, width, height, radius);
    }

    let mut out = RgbaImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let alpha = (plane[(y * width + x) as usize] * 255.0).round().min(255.0) as u8;
        pixel.0 = [tint[0], tint[1], tint[2], alpha];
    }
    out
}

/// The transparent margin [`glow_silhouette`] adds on each side.
pub fn glow_margin(blur: f32) -> u32 {
    ((blur * 1.5).ceil() as u32).max(1)
}

fn box_blur_horizontal(plane: &mut [f32], width: u32, height: u32, radius: u32) {
    let (w, r) = (width as i64, radius as i64);
    let window = (2 * r + 1) as f32;
    let mut row_out = vec![0.0f32; width as usize];

    for y in 0..height as i64 {
        let row = &plane[(y * w) as usize..(y * w + w) as usize];
        let mut acc: f32 = 0.0;
        for x in -r..=r {
            acc += row[x.clamp(0, w - 1) as usize];
        }
        for x in 0..w {
            row_out[x as usize] = acc / window;
            let leaving = row[(x - r).clamp(0, w - 1) as usize];
            let entering = row[(x + r + 1).clamp(0, w - 1) as usize];
            acc += entering - leaving;
        }
        plane[(y * w) as usize..(y * w + w) as usize].copy_from_slice(&row_out);
    }
}

fn box_blur_vertical(plane: &mut [f32], width: u32, height: u32, radius: u32) {
    let (w, h, r) = (width as i64, height as i64, radius as i64);
    let window = (2 * r + 1) as f32;
    let mut col_out = vec![0.0f32; height as usize];

    for x in 0..w {
        let at = |y: i64| plane[(y.clamp(0, h - 1) * w + x) as usize];
        let mut acc: f32 = 0.0;
        for y in -r..=r {
            acc += at(y);
        }
        for y in 0..h {
            col_out[y as usize] = acc / window;
            acc += at(y + r + 1) - at(y - r);
        }
        for y in 0..h {
            plane[(y * w + x) as usize] = col_out[y as usize];
        }
    }
}
