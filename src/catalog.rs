//! The fixed catalog of required icon output variants.
//!
//! Four platform groups, each with its own size list. The catalog order is
//! stable: groups in the order favicon, apple, android, ms; sizes ascending
//! within a group. Every synthesized [`FaviconSet`](crate::icon::FaviconSet)
//! contains exactly one icon per catalog entry, in catalog order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Required favicon sizes (browser tabs, bookmark bars).
pub const FAVICON_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];
/// Required Apple touch icon sizes.
pub const APPLE_SIZES: [u32; 4] = [120, 152, 167, 180];
/// Required Android/PWA icon sizes.
pub const ANDROID_SIZES: [u32; 2] = [192, 512];
/// Required Microsoft tile sizes.
pub const MS_SIZES: [u32; 3] = [144, 150, 310];

// ============================================================================
// IconGroup
// ============================================================================

/// One of the four platform groups, each with its own styling defaults.
///
/// The favicon group is never given a background fill; the other groups are
/// filled with the analyzed background color when one is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconGroup {
    Favicon,
    Apple,
    Android,
    Ms,
}

impl IconGroup {
    /// The group name as used in output filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favicon => "favicon",
            Self::Apple => "apple",
            Self::Android => "android",
            Self::Ms => "ms",
        }
    }

    /// All groups in catalog order.
    pub fn all() -> [IconGroup; 4] {
        [Self::Favicon, Self::Apple, Self::Android, Self::Ms]
    }

    /// The required sizes for this group, ascending.
    pub fn sizes(&self) -> &'static [u32] {
        match self {
            Self::Favicon => &FAVICON_SIZES,
            Self::Apple => &APPLE_SIZES,
            Self::Android => &ANDROID_SIZES,
            Self::Ms => &MS_SIZES,
        }
    }
}

impl fmt::Display for IconGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// IconSpec
// ============================================================================

/// A single (size, group) catalog entry. Static, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub group: IconGroup,
}

impl IconSpec {
    /// The derived output filename, e.g. `apple-180x180.png`.
    pub fn label(&self) -> String {
        format!("{}-{}x{}.png", self.group, self.size, self.size)
    }
}

/// Returns the full catalog in stable order.
///
/// Group order favicon, apple, android, ms; ascending size within a group.
pub fn catalog() -> Vec<IconSpec> {
    IconGroup::all()
        .into_iter()
        .flat_map(|group| group.sizes().iter().map(move |&size| IconSpec { size, group }))
        .collect()
}

/// Total number of catalog entries.
pub fn catalog_len() -> usize {
    IconGroup::all().iter().map(|g| g.sizes().len()).sum()
}
