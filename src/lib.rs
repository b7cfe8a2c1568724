//! favigen: Favicon set generation library
//!
//! This crate turns a single uploaded logo into the full catalog of favicon
//! and platform icon variants: validation and decode, AI-assisted brand
//! analysis with safe fallbacks, deterministic batch rendering, a per-icon
//! transform editor, and ZIP export.
//!
//! # Example
//!
//! ```no_run
//! use favigen::{
//!     analyze_or_default, bundle_zip, load, synthesize, BatchOutcome, BrandAnalyzer,
//!     CancelToken, RetryPolicy, StyleOptions, Upload,
//! };
//!
//! # fn run(analyzer: &dyn BrandAnalyzer) -> Result<(), Box<dyn std::error::Error>> {
//! let upload = Upload {
//!     file_name: "logo.png".to_string(),
//!     content_type: Some("image/png".to_string()),
//!     bytes: std::fs::read("logo.png")?,
//! };
//! let source = load(upload)?;
//!
//! let cancel = CancelToken::new();
//! let analysis = analyze_or_default(
//!     analyzer,
//!     &[],
//!     "logo.png",
//!     RetryPolicy::default(),
//!     &cancel,
//! );
//!
//! let outcome = synthesize(
//!     &source,
//!     &analysis,
//!     &StyleOptions::default(),
//!     "set-1".to_string(),
//!     "logo.png",
//!     &cancel,
//!     |progress| println!("{}/{}", progress.completed, progress.total),
//! )?;
//!
//! if let BatchOutcome::Completed(set) = outcome {
//!     std::fs::write("favicons.zip", bundle_zip(&set)?)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Editing a single icon
//!
//! Open an [`EditSession`] on one icon of a completed set, adjust the
//! transform, render a preview with [`render`], and commit:
//!
//! ```no_run
//! use favigen::{render, EditSession, EditorStateUpdate, FaviconSet};
//!
//! # fn edit(set: &mut FaviconSet) -> Result<(), Box<dyn std::error::Error>> {
//! let icon = set.icon_mut("apple-180x180.png").ok_or("missing icon")?;
//! let mut session = EditSession::open(icon);
//! session.update(EditorStateUpdate {
//!     rotation: Some(15.0),
//!     scale: Some(1.2),
//!     ..EditorStateUpdate::default()
//! });
//! let preview = render(session.state())?;
//! session.commit(preview, icon);
//! # Ok(())
//! # }
//! ```

mod analysis;
mod cancel;
mod catalog;
mod editor;
mod error;
mod export;
mod icon;
mod loader;
mod render;
mod sanitize;
mod surface;
mod synthesize;

pub use analysis::{
    analyze_or_default, BrandAnalysis, BrandAnalyzer, PacedAnalyzer, RetryPolicy,
    MAX_PADDING_PERCENTAGE,
};
pub use cancel::CancelToken;
pub use catalog::{
    catalog, catalog_len, IconGroup, IconSpec, ANDROID_SIZES, APPLE_SIZES, FAVICON_SIZES,
    MS_SIZES,
};
pub use editor::{
    EditSession, EditorState, EditorStateUpdate, BORDER_RADIUS_RANGE, PADDING_RANGE,
    POSITION_RANGE, SCALE_RANGE,
};
pub use error::{AnalysisError, ExportError, LoadError, RenderError};
pub use export::{bundle_zip, push_recent, ArchiveStore, ARCHIVE_CAP};
pub use icon::{integration_snippet, manifest_json, FaviconSet, IconResult};
pub use loader::{
    load, mime_from_extension, SourceImage, Upload, DECODE_TIMEOUT, MAX_DIMENSION,
    MAX_FILE_BYTES, MIN_DIMENSION,
};
pub use render::render;
pub use sanitize::{file_stem, sanitize_file_name, sanitize_text};
pub use surface::{parse_hex, Surface};
pub use synthesize::{
    synthesize, BatchOutcome, BorderType, OutlineStyle, Progress, StyleOptions,
    DEFAULT_PADDING_PERCENTAGE,
};
