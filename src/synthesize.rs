//! Batch synthesis: one pass over the catalog producing a [`FaviconSet`].
//!
//! Every catalog entry is rendered from the same decoded source with the same
//! analysis-derived styling, group by group in catalog order. The pass is
//! deterministic: the same source, analysis and style options yield
//! byte-identical rasters on every run. Cancellation is checked between
//! groups and is not an error; a cancelled batch simply yields no set.

use crate::analysis::BrandAnalysis;
use crate::cancel::CancelToken;
use crate::catalog::{self, IconGroup, IconSpec};
use crate::error::RenderError;
use crate::icon::{self, FaviconSet, IconResult};
use crate::loader::SourceImage;
use crate::sanitize::sanitize_file_name;
use crate::surface::{self, Surface};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Padding percentage applied when the analysis suggests none.
pub const DEFAULT_PADDING_PERCENTAGE: u8 = 12;
/// Corner radius of rounded backgrounds, as a fraction of the icon side.
pub const ROUNDED_RADIUS_RATIO: f32 = 0.22;
/// Accepted glow intensity range.
pub const OUTLINE_INTENSITY_RANGE: (u8, u8) = (1, 25);

// ============================================================================
// Style options
// ============================================================================

/// Background shape drawn beneath the logo on non-favicon groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderType {
    /// No background fill at all.
    None,
    /// Rounded rectangle, app-icon style.
    #[default]
    Rounded,
    /// Edge-to-edge square fill.
    Square,
}

/// Glow outline drawn behind the logo silhouette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineStyle {
    /// Hex tint of the halo. An unparsable color disables the effect.
    pub color: String,
    /// Halo strength, 1-25; scales with the icon side.
    pub intensity: u8,
}

/// User-selected styling applied uniformly across the batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    pub border: BorderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<OutlineStyle>,
}

// ============================================================================
// Batch outcome
// ============================================================================

/// Progress report emitted after each completed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub group: IconGroup,
    /// Icons finished so far, across all groups.
    pub completed: usize,
    pub total: usize,
}

/// Result of a batch run. Cancellation is a normal outcome, not an error.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Completed(FaviconSet),
    Cancelled,
}

// ============================================================================
// Synthesis
// ============================================================================

/// Renders the full catalog into a [`FaviconSet`].
///
/// Icons come out in catalog order. The cancel token is checked before each
/// group; once a batch is cancelled no partial set is returned. `on_progress`
/// fires once per finished group.
pub fn synthesize(
    source: &SourceImage,
    analysis: &BrandAnalysis,
    style: &StyleOptions,
    id: String,
    original_file_name: &str,
    cancel: &CancelToken,
    mut on_progress: impl FnMut(Progress),
) -> Result<BatchOutcome, RenderError> {
    let total = catalog::catalog_len();
    let mut icons = Vec::with_capacity(total);

    for group in IconGroup::all() {
        if cancel.is_cancelled() {
            return Ok(BatchOutcome::Cancelled);
        }
        for &size in group.sizes() {
            let spec = IconSpec { size, group };
            let raster = render_icon(source, spec, analysis, style)?;
            icons.push(IconResult::new(spec, raster));
        }
        on_progress(Progress {
            group,
            completed: icons.len(),
            total,
        });
    }

    let file_name = sanitize_file_name(original_file_name);
    let manifest_json = icon::manifest_json(&file_name, &analysis.theme_color);
    Ok(BatchOutcome::Completed(FaviconSet {
        id,
        original_file_name: file_name,
        icons,
        html_snippet: icon::integration_snippet(),
        manifest_json,
        created_at: Utc::now(),
    }))
}

/// Renders one catalog entry.
///
/// Layering, bottom to top: background fill (non-favicon groups only, per
/// the border type), glow halo when an outline is styled, then the source
/// stretched into the padded square. The stretch intentionally ignores the
/// source aspect ratio; that is what fills small favicons edge to edge.
fn render_icon(
    source: &SourceImage,
    spec: IconSpec,
    analysis: &BrandAnalysis,
    style: &StyleOptions,
) -> Result<Vec<u8>, RenderError> {
    let size = spec.size;
    let mut surface = Surface::new(size)?;

    if spec.group != IconGroup::Favicon {
        if let Some(background) = background_fill(analysis) {
            match style.border {
                BorderType::None => {}
                BorderType::Rounded => {
                    surface.fill_rounded(background, ROUNDED_RADIUS_RATIO * size as f32);
                }
                BorderType::Square => surface.fill(background),
            }
        }
    }

    let padding_pct = analysis
        .padding_percentage
        .unwrap_or(DEFAULT_PADDING_PERCENTAGE);
    let pad = size as f32 * padding_pct as f32 / 100.0;
    let inner = size as f32 - 2.0 * pad;

    if let Some(outline) = &style.outline {
        if let Some(tint) = surface::parse_hex(&outline.color) {
            draw_with_glow(&mut surface, source, outline, tint, pad, inner);
            return surface.encode_png();
        }
    }

    surface.draw_bitmap_rect(source.bitmap(), pad, pad, inner, inner);
    surface.encode_png()
}

fn background_fill(analysis: &BrandAnalysis) -> Option<image::Rgba<u8>> {
    surface::parse_hex(analysis.background_color.as_deref()?)
}

/// Glow pass: a blurred tinted silhouette beneath the logo, with the logo
/// drawn twice on top so its own body reads at full strength over the halo.
fn draw_with_glow(
    surface: &mut Surface,
    source: &SourceImage,
    outline: &OutlineStyle,
    tint: image::Rgba<u8>,
    pad: f32,
    inner: f32,
) {
    let intensity = outline
        .intensity
        .clamp(OUTLINE_INTENSITY_RANGE.0, OUTLINE_INTENSITY_RANGE.1);
    let blur = intensity as f32 * surface.size() as f32 / 100.0;

    // Silhouette of the source as it will appear: stretched into the inner
    // square, so the halo hugs the rendered shape rather than the original
    let stretched = stretch_to_square(source, inner);
    let halo = surface::glow_silhouette(&stretched, tint, blur);
    let margin = surface::glow_margin(blur) as f32;
    surface.draw_bitmap_rect(
        &halo,
        pad - margin,
        pad - margin,
        halo.width() as f32,
        halo.height() as f32,
    );

    surface.draw_bitmap_rect(source.bitmap(), pad, pad, inner, inner);
    surface.draw_bitmap_rect(source.bitmap(), pad, pad, inner, inner);
}

fn stretch_to_square(source: &SourceImage, side: f32) -> image::RgbaImage {
    let px = side.round().max(1.0) as u32;
    image::imageops::resize(
        source.bitmap(),
        px,
        px,
        image::imageops::FilterType::Triangle,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{self, Upload};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn source_image(width: u32, height: u32, pixel: Rgba<u8>) -> SourceImage {
        let img = RgbaImage::from_pixel(width, height, pixel);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        loader::load(Upload {
            file_name: "logo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: buf.into_inner(),
        })
        .unwrap()
    }

    fn run_default(source: &SourceImage, style: &StyleOptions) -> FaviconSet {
        let outcome = synthesize(
            source,
            &BrandAnalysis::default(),
            style,
            "set-1".to_string(),
            "logo.png",
            &CancelToken::new(),
            |_| {},
        )
        .unwrap();
        match outcome {
            BatchOutcome::Completed(set) => set,
            BatchOutcome::Cancelled => panic!("unexpected cancellation"),
        }
    }

    fn decode(raster: &[u8]) -> RgbaImage {
        image::load_from_memory(raster).unwrap().to_rgba8()
    }

    #[test]
    fn produces_full_catalog_in_order() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let set = run_default(&source, &StyleOptions::default());

        assert_eq!(set.icons.len(), catalog::catalog_len());
        let labels: Vec<String> = set.icons.iter().map(|i| i.label.clone()).collect();
        let expected: Vec<String> = catalog::catalog().iter().map(IconSpec::label).collect();
        assert_eq!(labels, expected);
        assert_eq!(set.original_file_name, "logo.png");
        assert!(set.html_snippet.contains("favicon-32x32.png"));
        assert!(set.manifest_json.contains("\"theme_color\""));
    }

    #[test]
    fn rasters_are_deterministic_across_runs() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let first = run_default(&source, &StyleOptions::default());
        let second = run_default(&source, &StyleOptions::default());

        for (a, b) in first.icons.iter().zip(&second.icons) {
            assert_eq!(a.raster, b.raster, "raster differs for {}", a.label);
        }
    }

    #[test]
    fn every_raster_decodes_at_its_size() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let set = run_default(&source, &StyleOptions::default());

        for icon in &set.icons {
            let img = decode(&icon.raster);
            assert_eq!(img.width(), icon.size);
            assert_eq!(img.height(), icon.size);
        }
    }

    #[test]
    fn favicon_group_is_never_background_filled() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let set = run_default(&source, &StyleOptions::default());

        // Default analysis has padding 15%, so favicon corners are bare
        let favicon = set.icon("favicon-64x64.png").unwrap();
        let img = decode(&favicon.raster);
        assert_eq!(img.get_pixel(1, 1)[3], 0);

        // Apple icon of the same batch carries the white rounded background
        let apple = set.icon("apple-180x180.png").unwrap();
        let img = decode(&apple.raster);
        assert_eq!(img.get_pixel(90, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rounded_border_leaves_corners_transparent_square_fills_them() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));

        let rounded = run_default(&source, &StyleOptions::default());
        let img = decode(&rounded.icon("apple-180x180.png").unwrap().raster);
        assert_eq!(img.get_pixel(0, 0)[3], 0);

        let square = run_default(
            &source,
            &StyleOptions {
                border: BorderType::Square,
                outline: None,
            },
        );
        let img = decode(&square.icon("apple-180x180.png").unwrap().raster);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn none_border_skips_the_fill_entirely() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let set = run_default(
            &source,
            &StyleOptions {
                border: BorderType::None,
                outline: None,
            },
        );
        let img = decode(&set.icon("apple-180x180.png").unwrap().raster);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(90, 2)[3], 0);
    }

    #[test]
    fn wide_source_is_stretched_to_the_padded_square() {
        // 2:1 source; with 15% padding on a 192 icon the content square is
        // roughly 29..163 on both axes
        let source = source_image(128, 64, Rgba([0, 128, 0, 255]));
        let set = run_default(
            &source,
            &StyleOptions {
                border: BorderType::None,
                outline: None,
            },
        );
        let img = decode(&set.icon("android-192x192.png").unwrap().raster);

        let center = img.get_pixel(96, 96);
        assert_eq!(center.0, [0, 128, 0, 255]);
        // Filled near the top and bottom of the square despite the 2:1 source
        assert!(img.get_pixel(96, 35)[3] > 0);
        assert!(img.get_pixel(96, 157)[3] > 0);
        // Bare inside the padding band
        assert_eq!(img.get_pixel(96, 10)[3], 0);
    }

    #[test]
    fn glow_outline_bleeds_past_the_logo() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let style = StyleOptions {
            border: BorderType::None,
            outline: Some(OutlineStyle {
                color: "#8b5cf6".to_string(),
                intensity: 10,
            }),
        };
        let set = run_default(&source, &style);
        let img = decode(&set.icon("android-192x192.png").unwrap().raster);

        // With 15% padding the logo starts near x=29; the halo reaches into
        // the padding band where the plain render is transparent
        let in_band = img.get_pixel(20, 96);
        assert!(in_band[3] > 0);

        let plain = run_default(
            &source,
            &StyleOptions {
                border: BorderType::None,
                outline: None,
            },
        );
        let img = decode(&plain.icon("android-192x192.png").unwrap().raster);
        assert_eq!(img.get_pixel(20, 96)[3], 0);
    }

    #[test]
    fn unparsable_outline_color_disables_the_effect() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let styled = run_default(
            &source,
            &StyleOptions {
                border: BorderType::None,
                outline: Some(OutlineStyle {
                    color: "glowing".to_string(),
                    intensity: 10,
                }),
            },
        );
        let plain = run_default(
            &source,
            &StyleOptions {
                border: BorderType::None,
                outline: None,
            },
        );
        for (a, b) in styled.icons.iter().zip(&plain.icons) {
            assert_eq!(a.raster, b.raster);
        }
    }

    #[test]
    fn cancelled_before_start_yields_no_partial_set() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut events = 0usize;
        let outcome = synthesize(
            &source,
            &BrandAnalysis::default(),
            &StyleOptions::default(),
            "set-1".to_string(),
            "logo.png",
            &cancel,
            |_| events += 1,
        )
        .unwrap();

        assert!(matches!(outcome, BatchOutcome::Cancelled));
        assert_eq!(events, 0);
    }

    #[test]
    fn cancelling_mid_batch_discards_the_partial_results() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let cancel = CancelToken::new();

        // Cancel from the progress callback once two of four groups are done
        let mut events = Vec::new();
        let outcome = synthesize(
            &source,
            &BrandAnalysis::default(),
            &StyleOptions::default(),
            "set-1".to_string(),
            "logo.png",
            &cancel,
            |p| {
                events.push(p);
                if events.len() == 2 {
                    cancel.cancel();
                }
            },
        )
        .unwrap();

        assert!(matches!(outcome, BatchOutcome::Cancelled));
        assert_eq!(events.len(), 2);
        assert_eq!(events.last().unwrap().group, IconGroup::Apple);
    }

    #[test]
    fn progress_fires_once_per_group() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let mut events = Vec::new();
        let outcome = synthesize(
            &source,
            &BrandAnalysis::default(),
            &StyleOptions::default(),
            "set-1".to_string(),
            "logo.png",
            &CancelToken::new(),
            |p| events.push(p),
        )
        .unwrap();
        assert!(matches!(outcome, BatchOutcome::Completed(_)));

        assert_eq!(events.len(), IconGroup::all().len());
        let groups: Vec<IconGroup> = events.iter().map(|p| p.group).collect();
        assert_eq!(groups, IconGroup::all());
        assert_eq!(events.last().unwrap().completed, catalog::catalog_len());
        assert!(events.iter().all(|p| p.total == catalog::catalog_len()));
    }

    #[test]
    fn file_name_is_sanitized_into_the_set() {
        let source = source_image(64, 64, Rgba([0, 128, 0, 255]));
        let outcome = synthesize(
            &source,
            &BrandAnalysis::default(),
            &StyleOptions::default(),
            "set-1".to_string(),
            "../<evil> logo.png",
            &CancelToken::new(),
            |_| {},
        )
        .unwrap();
        let BatchOutcome::Completed(set) = outcome else {
            panic!("unexpected cancellation");
        };
        assert!(!set.original_file_name.contains(".."));
        assert!(!set.original_file_name.contains('<'));
    }
}
