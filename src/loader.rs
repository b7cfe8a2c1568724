//! Upload validation and decoding into an in-memory source bitmap.
//!
//! The loader is the only entry point for user-supplied image data. It
//! enforces the MIME allow-list, the file-size ceiling and the pixel
//! dimension range, and bounds the decode wait so a pathological file cannot
//! stall the pipeline. Vector (SVG) sources are rasterized once here and
//! exempt from the dimension check.

use crate::error::LoadError;
use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Upload size ceiling: 10 MB.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
/// Smallest accepted pixel dimension on either axis.
pub const MIN_DIMENSION: u32 = 32;
/// Largest accepted pixel dimension on either axis.
pub const MAX_DIMENSION: u32 = 8192;
/// Bounded wait for the decode step.
pub const DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// Larger axis of a rasterized vector source. SVGs carry no meaningful
/// intrinsic pixel size, so they are rendered once at a resolution
/// comfortably above the largest catalog output (512px).
const VECTOR_RASTER_SIZE: f32 = 1024.0;

const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/svg+xml",
];

// ============================================================================
// Upload
// ============================================================================

/// A raw uploaded file: name, declared content type and bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    /// Content type declared by the transport, if any. When absent the type
    /// is inferred from the filename extension.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Maps a filename extension to a MIME type, for uploads with no declared
/// content type.
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

// ============================================================================
// SourceImage
// ============================================================================

/// An immutable decoded source bitmap plus its natural dimensions.
///
/// Owned by the session that uploaded it; replaced wholesale on a new upload.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bitmap: RgbaImage,
    byte_len: u64,
    vector: bool,
}

impl SourceImage {
    /// The decoded RGBA bitmap.
    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    /// Natural pixel width (rasterized width for vector sources).
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    /// Natural pixel height (rasterized height for vector sources).
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Original upload size in bytes.
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// True when the upload was a vector (SVG) source.
    pub fn is_vector(&self) -> bool {
        self.vector
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Validates and decodes an upload into a [`SourceImage`].
///
/// Checks, in order: MIME allow-list, size ceiling, decode (bounded to
/// [`DECODE_TIMEOUT`]), pixel dimension range. Vector sources skip the
/// dimension check but must still parse.
pub fn load(upload: Upload) -> Result<SourceImage, LoadError> {
    let mime = upload
        .content_type
        .as_deref()
        .map(str::to_ascii_lowercase)
        .or_else(|| mime_from_extension(&upload.file_name).map(str::to_string))
        .unwrap_or_default();

    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(LoadError::UnsupportedType { mime });
    }

    let byte_len = upload.bytes.len() as u64;
    if byte_len > MAX_FILE_BYTES {
        return Err(LoadError::FileTooLarge {
            size: byte_len,
            limit: MAX_FILE_BYTES,
        });
    }
    if byte_len == 0 {
        return Err(LoadError::DecodeFailure("empty file".to_string()));
    }

    let vector = mime == "image/svg+xml";
    let bitmap = decode_with_timeout(upload.bytes, vector)?;

    if !vector {
        let (width, height) = (bitmap.width(), bitmap.height());
        let in_range = |d| (MIN_DIMENSION..=MAX_DIMENSION).contains(&d);
        if !in_range(width) || !in_range(height) {
            return Err(LoadError::InvalidDimensions {
                width,
                height,
                min: MIN_DIMENSION,
                max: MAX_DIMENSION,
            });
        }
    }

    Ok(SourceImage {
        bitmap,
        byte_len,
        vector,
    })
}

/// Runs the decode on a worker thread and waits at most [`DECODE_TIMEOUT`].
///
/// A timeout is reported distinctly from corrupt data so callers can suggest
/// a smaller file rather than a different one.
fn decode_with_timeout(bytes: Vec<u8>, vector: bool) -> Result<RgbaImage, LoadError> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = if vector {
            rasterize_svg(&bytes)
        } else {
            image::load_from_memory(&bytes)
                .map(|img| img.to_rgba8())
                .map_err(|e| e.to_string())
        };
        let _ = tx.send(result);
    });

    match rx.recv_timeout(DECODE_TIMEOUT) {
        Ok(Ok(bitmap)) => Ok(bitmap),
        Ok(Err(message)) => Err(LoadError::DecodeFailure(message)),
        Err(_) => Err(LoadError::DecodeTimeout {
            seconds: DECODE_TIMEOUT.as_secs(),
        }),
    }
}

/// Rasterizes an SVG to an RGBA bitmap with its larger axis at
/// [`VECTOR_RASTER_SIZE`], preserving aspect ratio.
fn rasterize_svg(bytes: &[u8]) -> Result<RgbaImage, String> {
    let svg_data = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
    let opts = Options::default();
    let tree = Tree::from_str(svg_data, &opts).map_err(|e| e.to_string())?;

    let svg_size = tree.size();
    let scale = VECTOR_RASTER_SIZE / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| "zero-sized SVG".to_string())?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(crate::surface::pixmap_to_rgba(&pixmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_upload(width: u32, height: u32) -> Upload {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        Upload {
            file_name: "logo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: buf.into_inner(),
        }
    }

    #[test]
    fn loads_valid_png() {
        let source = load(png_upload(64, 64)).unwrap();
        assert_eq!(source.width(), 64);
        assert_eq!(source.height(), 64);
        assert!(!source.is_vector());
        assert!(source.byte_len() > 0);
    }

    #[test]
    fn rejects_unknown_type() {
        let upload = Upload {
            file_name: "notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(
            load(upload),
            Err(LoadError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_oversized_file() {
        let upload = Upload {
            file_name: "big.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0u8; MAX_FILE_BYTES as usize + 1],
        };
        assert!(matches!(load(upload), Err(LoadError::FileTooLarge { .. })));
    }

    #[test]
    fn rejects_below_dimension_floor() {
        // 16x16 is below the 32px floor; no synthesis should be attempted
        assert!(matches!(
            load(png_upload(16, 16)),
            Err(LoadError::InvalidDimensions { width: 16, .. })
        ));
    }

    #[test]
    fn rejects_corrupt_data() {
        let upload = Upload {
            file_name: "bad.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0xde, 0xad, 0xbe, 0xef],
        };
        assert!(matches!(load(upload), Err(LoadError::DecodeFailure(_))));
    }

    #[test]
    fn infers_type_from_extension() {
        assert_eq!(mime_from_extension("a.PNG"), Some("image/png"));
        assert_eq!(mime_from_extension("a.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("a.svg"), Some("image/svg+xml"));
        assert_eq!(mime_from_extension("a.gif"), None);

        let mut upload = png_upload(64, 64);
        upload.content_type = None;
        assert!(load(upload).is_ok());
    }

    #[test]
    fn rasterizes_svg_without_dimension_check() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="5"><rect width="10" height="5" fill="#ff0000"/></svg>"##;
        let upload = Upload {
            file_name: "logo.svg".to_string(),
            content_type: Some("image/svg+xml".to_string()),
            bytes: svg.as_bytes().to_vec(),
        };
        let source = load(upload).unwrap();
        assert!(source.is_vector());
        // Larger axis rasterized to 1024, aspect preserved
        assert_eq!(source.width(), 1024);
        assert_eq!(source.height(), 512);
    }
}
