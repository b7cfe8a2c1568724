//! The editor's transform renderer.
//!
//! A pure function from an [`EditorState`] to a PNG raster: background fill,
//! then the source drawn scaled, rotated about the icon center and offset.
//! Unlike batch synthesis this renderer preserves the source aspect ratio, so
//! a logo never distorts while the user is adjusting it.

use crate::editor::EditorState;
use crate::error::RenderError;
use crate::surface::{self, Surface};
use resvg::tiny_skia::Transform;

/// Renders the current editor state into a PNG of the target size.
///
/// The state is clamp-normalized first, so out-of-range field values render
/// the same as their clamped equivalents. Identical states produce
/// byte-identical output.
pub fn render(state: &EditorState) -> Result<Vec<u8>, RenderError> {
    let state = state.clone().clamped();
    let size = state.target_size;
    let mut surface = Surface::new(size)?;

    if let Some(background) = surface::parse_hex(&state.background_color) {
        if state.border_radius > 0.0 {
            let radius = size as f32 * state.border_radius / 100.0;
            surface.fill_rounded(background, radius);
        } else {
            surface.fill(background);
        }
    }

    let src = image::load_from_memory(&state.source_raster)
        .map_err(|e| RenderError::ImageDecode(e.to_string()))?
        .to_rgba8();

    let side = size as f32;
    let available = (side - 2.0 * state.padding).max(1.0) * state.scale;
    let (dw, dh) = fit_within(src.width(), src.height(), available);

    // Rotation pivots on the icon center; the position offset moves the
    // pivot, matching how a drag handle feels in the editor
    let transform = Transform::from_translate(
        side / 2.0 + state.position_x,
        side / 2.0 + state.position_y,
    )
    .pre_concat(Transform::from_rotate(state.rotation))
    .pre_translate(-dw / 2.0, -dh / 2.0);

    surface.draw_bitmap_transformed(&src, transform, dw, dh);
    surface.encode_png()
}

/// Largest `w`×`h` with the source aspect ratio fitting in an
/// `available`-sided square.
fn fit_within(src_w: u32, src_h: u32, available: f32) -> (f32, f32) {
    let ratio = src_w as f32 / src_h as f32;
    if ratio >= 1.0 {
        (available, available / ratio)
    } else {
        (available * ratio, available)
    }
}
