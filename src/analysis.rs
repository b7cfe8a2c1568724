//! The Brand Analyzer boundary.
//!
//! Brand analysis is an external, AI-backed capability: given the uploaded
//! image it suggests a theme color, a background color and a padding
//! percentage. The core consumes it through the [`BrandAnalyzer`] trait and
//! never blocks on its availability: transient failures are retried with
//! exponential backoff and anything terminal collapses into fixed fallback
//! defaults, so synthesis always completes when the image itself is valid.
//!
//! Credentials and transport belong to the trait implementor; the core never
//! reads ambient configuration.

use crate::cancel::CancelToken;
use crate::error::AnalysisError;
use crate::sanitize::sanitize_text;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound accepted for an analyzer-suggested padding percentage.
pub const MAX_PADDING_PERCENTAGE: u8 = 40;

// ============================================================================
// BrandAnalysis
// ============================================================================

/// The typed result of a brand analysis call.
///
/// Serializes with the wire field names used by the analyzer service
/// (`themeColor`, `paddingPercentage`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandAnalysis {
    /// Dominant brand color as a hex string, used for the web manifest.
    pub theme_color: String,

    /// Contrasting background fill for non-favicon groups. `None` leaves
    /// those surfaces unfilled.
    pub background_color: Option<String>,

    /// Suggested padding as a percentage of the icon side, 0-40.
    pub padding_percentage: Option<u8>,

    /// One-sentence description of the brand identity.
    #[serde(default)]
    pub short_description: String,

    /// Contrast tips for designers using the logo.
    #[serde(default)]
    pub contrast_advice: String,
}

impl Default for BrandAnalysis {
    /// The fixed fallback applied whenever analysis fails or returns an
    /// invalid structure.
    fn default() -> Self {
        Self {
            theme_color: "#6366f1".to_string(),
            background_color: Some("#ffffff".to_string()),
            padding_percentage: Some(15),
            short_description: "A modern, high-performance digital identity.".to_string(),
            contrast_advice: "Ensure sufficient contrast when layering over complex backgrounds."
                .to_string(),
        }
    }
}

impl BrandAnalysis {
    /// Validates and normalizes an analyzer response.
    ///
    /// Colors must parse as hex; padding outside 0-40 is clamped. Returns
    /// `None` when the structure is unusable, which callers treat as failure.
    pub fn validated(mut self) -> Option<Self> {
        self.theme_color.parse::<Srgb<u8>>().ok()?;
        if let Some(bg) = &self.background_color {
            bg.parse::<Srgb<u8>>().ok()?;
        }
        if let Some(padding) = self.padding_percentage {
            self.padding_percentage = Some(padding.min(MAX_PADDING_PERCENTAGE));
        }
        Some(self)
    }
}

// ============================================================================
// BrandAnalyzer
// ============================================================================

/// An injectable brand-analysis capability.
///
/// Implementations own their credentials and transport. The core only calls
/// [`analyze`](Self::analyze) through [`analyze_or_default`].
pub trait BrandAnalyzer {
    /// Analyzes the source image bytes, with the sanitized filename as a
    /// hint for the service.
    fn analyze(
        &self,
        image_bytes: &[u8],
        file_name_hint: &str,
    ) -> Result<BrandAnalysis, AnalysisError>;
}

/// Retry schedule for transient analyzer failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before the first retry; doubles per subsequent retry.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Calls the analyzer, retrying transient failures per `policy`, and falls
/// back to [`BrandAnalysis::default`] on terminal failure, exhausted retries,
/// invalid response structure or cancellation.
///
/// This function never returns an error: analysis unavailability must not
/// block synthesis.
pub fn analyze_or_default(
    analyzer: &dyn BrandAnalyzer,
    image_bytes: &[u8],
    file_name_hint: &str,
    policy: RetryPolicy,
    cancel: &CancelToken,
) -> BrandAnalysis {
    // The hint ends up in a prompt; strip markup-significant characters
    let hint = sanitize_text(file_name_hint, 120);
    let mut delay = policy.initial_delay;

    for attempt in 0..=policy.retries {
        if cancel.is_cancelled() {
            break;
        }
        match analyzer.analyze(image_bytes, &hint) {
            Ok(analysis) => match analysis.validated() {
                Some(valid) => return valid,
                None => break,
            },
            Err(AnalysisError::Transient(_)) if attempt < policy.retries => {
                thread::sleep(delay);
                delay *= 2;
            }
            Err(_) => break,
        }
    }

    BrandAnalysis::default()
}

// ============================================================================
// PacedAnalyzer
// ============================================================================

/// Wraps an analyzer with a bounded-concurrency scheduler: at most one call
/// in flight, with a minimum spacing between consecutive calls.
///
/// This guards the external service's rate limits; it is owned by the
/// analyzer boundary, not the rendering pipeline.
pub struct PacedAnalyzer<A> {
    inner: A,
    min_spacing: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl<A> PacedAnalyzer<A> {
    /// Default spacing between consecutive analyzer calls.
    pub const DEFAULT_SPACING: Duration = Duration::from_secs(1);

    pub fn new(inner: A) -> Self {
        Self::with_spacing(inner, Self::DEFAULT_SPACING)
    }

    pub fn with_spacing(inner: A, min_spacing: Duration) -> Self {
        Self {
            inner,
            min_spacing,
            last_call: Mutex::new(None),
        }
    }
}

impl<A: BrandAnalyzer> BrandAnalyzer for PacedAnalyzer<A> {
    fn analyze(
        &self,
        image_bytes: &[u8],
        file_name_hint: &str,
    ) -> Result<BrandAnalysis, AnalysisError> {
        // Holding the lock across the call serializes in-flight requests
        let mut last = self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_spacing {
                thread::sleep(self.min_spacing - elapsed);
            }
        }

        let result = self.inner.analyze(image_bytes, file_name_hint);
        *last = Some(Instant::now());
        result
    }
}
