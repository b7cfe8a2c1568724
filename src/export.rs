//! Set export: ZIP bundling and the bounded recent-sets archive.

use crate::error::ExportError;
use crate::icon::FaviconSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Most recent sets kept in the archive.
pub const ARCHIVE_CAP: usize = 15;

/// Name of the manifest entry in the bundle.
pub const MANIFEST_ENTRY: &str = "manifest.json";
/// Name of the HTML snippet entry in the bundle.
pub const SNIPPET_ENTRY: &str = "favicon-snippet.html";

// ============================================================================
// ZIP bundling
// ============================================================================

/// Bundles a set into ZIP bytes: one entry per icon named by its label,
/// preferring the edited raster, plus the manifest and the HTML snippet.
pub fn bundle_zip(set: &FaviconSet) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for icon in &set.icons {
        writer.start_file(icon.label.as_str(), options)?;
        writer.write_all(icon.display_raster())?;
    }

    writer.start_file(MANIFEST_ENTRY, options)?;
    writer.write_all(set.manifest_json.as_bytes())?;

    writer.start_file(SNIPPET_ENTRY, options)?;
    writer.write_all(set.html_snippet.as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

// ============================================================================
// Recent-sets archive
// ============================================================================

/// Prepends a set to the archive, most-recent-first, evicting the oldest
/// entries beyond [`ARCHIVE_CAP`].
pub fn push_recent(recent: &mut Vec<FaviconSet>, set: FaviconSet) {
    recent.insert(0, set);
    recent.truncate(ARCHIVE_CAP);
}

/// A persistence boundary for the recent-sets archive.
///
/// The core keeps the archive in memory and hands the whole list to the
/// store; where and how it lands (disk, browser storage, a database) is the
/// implementor's concern.
pub trait ArchiveStore {
    /// Persists the archive, replacing whatever was stored before.
    fn persist(&mut self, recent: &[FaviconSet]) -> Result<(), ExportError>;

    /// Restores the archive, most-recent-first. An empty store yields an
    /// empty list.
    fn restore(&self) -> Result<Vec<FaviconSet>, ExportError>;
}
