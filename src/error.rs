//! Error taxonomy for the icon pipeline.
//!
//! Each stage of the pipeline has its own error enum so callers can tell
//! user-correctable failures (bad upload) apart from environment failures
//! (no drawing surface) and external-dependency failures (brand analysis).
//! Cancellation is deliberately *not* an error; see
//! [`BatchOutcome`](crate::synthesize::BatchOutcome).

use thiserror::Error;

/// Failures while validating and decoding an uploaded source image.
///
/// All variants are terminal for the current upload: the user must supply a
/// different (or smaller) file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The declared or inferred MIME type is not in the allow-list.
    #[error("unsupported file type {mime:?}; expected PNG, JPEG, WEBP or SVG")]
    UnsupportedType { mime: String },

    /// The upload exceeds the size ceiling.
    #[error("file is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// Decoded pixel dimensions fall outside the accepted range.
    #[error("image is {width}x{height}px; both axes must be within {min}..={max}px")]
    InvalidDimensions {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },

    /// Decoding did not finish within the bounded wait.
    #[error("image decode did not finish within {seconds}s")]
    DecodeTimeout { seconds: u64 },

    /// The image data itself is corrupt or unreadable.
    #[error("image could not be decoded: {0}")]
    DecodeFailure(String),
}

/// Failures while compositing or encoding an icon raster.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No drawing surface could be allocated. Fatal and non-retryable.
    #[error("no {size}x{size} drawing surface available")]
    Unsupported { size: u32 },

    /// The icon's stored raster could not be decoded back into a bitmap.
    /// Non-retryable without new input.
    #[error("icon raster could not be decoded: {0}")]
    ImageDecode(String),

    /// PNG encoding of the finished surface failed.
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failures reported by a [`BrandAnalyzer`](crate::analysis::BrandAnalyzer).
///
/// These never escape the analysis boundary: transient failures are retried
/// with backoff and anything else collapses into the fallback
/// [`BrandAnalysis`](crate::analysis::BrandAnalysis) defaults.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Rate-limited or network-flaky; worth retrying.
    #[error("brand analyzer temporarily unavailable: {0}")]
    Transient(String),

    /// Unreachable, misconfigured or returned garbage; not worth retrying.
    #[error("brand analysis failed: {0}")]
    Failed(String),
}

/// Failures while packaging a finished set for download.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("zip write failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
