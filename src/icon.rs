//! Synthesized icon results and the aggregate favicon set.

use crate::catalog::{IconGroup, IconSpec};
use crate::editor::EditorState;
use crate::sanitize::file_stem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// IconResult
// ============================================================================

/// One synthesized output raster.
///
/// Created by batch synthesis, one per catalog [`IconSpec`]; never resized or
/// regrouped afterwards. The only permitted mutation is attaching an edited
/// raster plus the editor state that produced it, via
/// [`EditSession::commit`](crate::editor::EditSession::commit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconResult {
    pub size: u32,
    /// Derived filename, e.g. `favicon-32x32.png`.
    pub label: String,
    pub group: IconGroup,
    /// The batch-synthesized PNG.
    pub raster: Vec<u8>,
    /// Edited PNG, present once the user has committed an edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_raster: Option<Vec<u8>>,
    /// The editor state that produced `edited_raster`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_state: Option<EditorState>,
}

impl IconResult {
    /// Creates an unedited result for a catalog entry.
    pub fn new(spec: IconSpec, raster: Vec<u8>) -> Self {
        Self {
            size: spec.size,
            label: spec.label(),
            group: spec.group,
            raster,
            edited_raster: None,
            editor_state: None,
        }
    }

    /// The raster to display or export: the edited one when present,
    /// otherwise the original.
    pub fn display_raster(&self) -> &[u8] {
        self.edited_raster.as_deref().unwrap_or(&self.raster)
    }
}

// ============================================================================
// FaviconSet
// ============================================================================

/// The complete batch of synthesized icons plus integration artifacts for
/// one source upload. The unit of export and of archival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaviconSet {
    /// Caller-supplied identifier; generated outside synthesis so the batch
    /// itself stays deterministic.
    pub id: String,
    pub original_file_name: String,
    /// One entry per catalog spec, in catalog order.
    pub icons: Vec<IconResult>,
    /// Static HTML `<link>` block for site integration.
    pub html_snippet: String,
    /// Pretty-printed web app manifest.
    pub manifest_json: String,
    pub created_at: DateTime<Utc>,
}

impl FaviconSet {
    /// Finds an icon by its label.
    pub fn icon(&self, label: &str) -> Option<&IconResult> {
        self.icons.iter().find(|icon| icon.label == label)
    }

    pub fn icon_mut(&mut self, label: &str) -> Option<&mut IconResult> {
        self.icons.iter_mut().find(|icon| icon.label == label)
    }

    /// All icons in one group, in catalog order.
    pub fn group(&self, group: IconGroup) -> impl Iterator<Item = &IconResult> {
        self.icons.iter().filter(move |icon| icon.group == group)
    }
}

// ============================================================================
// Integration artifacts
// ============================================================================

/// The static integration snippet referencing the fixed filenames.
pub fn integration_snippet() -> String {
    concat!(
        "<!-- FaviconGen Generated Assets -->\n",
        "<link rel=\"icon\" type=\"image/png\" sizes=\"32x32\" href=\"/favicon-32x32.png\">\n",
        "<link rel=\"apple-touch-icon\" sizes=\"180x180\" href=\"/apple-touch-icon.png\">",
    )
    .to_string()
}

/// Builds the web app manifest for a set: at minimum `name` (the sanitized
/// file stem) and `theme_color`.
pub fn manifest_json(file_name: &str, theme_color: &str) -> String {
    let manifest = serde_json::json!({
        "name": file_stem(file_name),
        "theme_color": theme_color,
    });
    // json! maps are ordered; pretty-printing cannot fail on them
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}
