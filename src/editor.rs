//! Per-icon edit sessions: transform state and its lifecycle.
//!
//! An [`EditSession`] binds to exactly one [`IconResult`] and walks the state
//! machine `Closed → Open → Dirty → {Committed | Discarded} → Closed`. The
//! terminal transitions consume the session, so a committed or discarded
//! session cannot be reused. Every update clamps fields to their declared
//! ranges before the next render sees them.

use crate::catalog::IconGroup;
use crate::icon::IconResult;
use serde::{Deserialize, Serialize};

/// Scale range: 10% to 200%.
pub const SCALE_RANGE: (f32, f32) = (0.1, 2.0);
/// Padding range in pixels.
pub const PADDING_RANGE: (f32, f32) = (0.0, 50.0);
/// Position offset range in pixels, both axes.
pub const POSITION_RANGE: (f32, f32) = (-100.0, 100.0);
/// Corner radius range as a percentage of the icon side.
pub const BORDER_RADIUS_RANGE: (f32, f32) = (0.0, 50.0);

// ============================================================================
// EditorState
// ============================================================================

/// The continuous transform/style parameters for one icon edit session.
///
/// The numeric fields are always clamped to their declared ranges before
/// rendering; rotation is normalized into `[0, 360)`, which makes a 360°
/// turn equivalent to none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub scale: f32,
    pub padding: f32,
    pub rotation: f32,
    pub position_x: f32,
    pub position_y: f32,
    /// Hex color or `"transparent"`.
    pub background_color: String,
    pub border_radius: f32,

    /// The raster being edited: always the original batch output, never a
    /// previously edited one, so edits never compound.
    pub source_raster: Vec<u8>,
    pub target_size: u32,
    pub target_group: IconGroup,
}

impl EditorState {
    /// Default transform bound to a specific icon's raster and target.
    pub fn defaults_for(icon: &IconResult) -> Self {
        Self {
            scale: 1.0,
            padding: 0.0,
            rotation: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            background_color: "transparent".to_string(),
            border_radius: 0.0,
            source_raster: icon.raster.clone(),
            target_size: icon.size,
            target_group: icon.group,
        }
    }

    /// Returns a copy with every numeric field clamped to its range and
    /// rotation normalized into `[0, 360)`.
    pub fn clamped(mut self) -> Self {
        self.scale = self.scale.clamp(SCALE_RANGE.0, SCALE_RANGE.1);
        self.padding = self.padding.clamp(PADDING_RANGE.0, PADDING_RANGE.1);
        self.rotation = self.rotation.rem_euclid(360.0);
        self.position_x = self.position_x.clamp(POSITION_RANGE.0, POSITION_RANGE.1);
        self.position_y = self.position_y.clamp(POSITION_RANGE.0, POSITION_RANGE.1);
        self.border_radius = self
            .border_radius
            .clamp(BORDER_RADIUS_RANGE.0, BORDER_RADIUS_RANGE.1);
        self
    }
}

/// A partial field set merged into the current state by
/// [`EditSession::update`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorStateUpdate {
    pub scale: Option<f32>,
    pub padding: Option<f32>,
    pub rotation: Option<f32>,
    pub position_x: Option<f32>,
    pub position_y: Option<f32>,
    pub background_color: Option<String>,
    pub border_radius: Option<f32>,
}

// ============================================================================
// EditSession
// ============================================================================

/// An open edit session bound to one icon.
///
/// Obtain one with [`open`](Self::open); finish it with
/// [`commit`](Self::commit) or [`discard`](Self::discard), both of which
/// consume the session.
#[derive(Debug, Clone)]
pub struct EditSession {
    state: EditorState,
    dirty: bool,
}

impl EditSession {
    /// Opens a session for `icon`, restoring its saved editor state when one
    /// exists and seeding defaults otherwise.
    ///
    /// The source raster is always the icon's original batch output; the
    /// previously edited raster is never re-edited.
    pub fn open(icon: &IconResult) -> Self {
        let state = match &icon.editor_state {
            Some(saved) => EditorState {
                source_raster: icon.raster.clone(),
                target_size: icon.size,
                target_group: icon.group,
                ..saved.clone()
            },
            None => EditorState::defaults_for(icon),
        };
        Self {
            state,
            dirty: false,
        }
    }

    /// The current (clamp-normalized) state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// True once any update or reset has been applied.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Merges a partial update into the state, clamping every field, and
    /// returns the new state for the caller to re-render.
    pub fn update(&mut self, update: EditorStateUpdate) -> &EditorState {
        let mut next = self.state.clone();
        if let Some(v) = update.scale {
            next.scale = v;
        }
        if let Some(v) = update.padding {
            next.padding = v;
        }
        if let Some(v) = update.rotation {
            next.rotation = v;
        }
        if let Some(v) = update.position_x {
            next.position_x = v;
        }
        if let Some(v) = update.position_y {
            next.position_y = v;
        }
        if let Some(v) = update.background_color {
            next.background_color = v;
        }
        if let Some(v) = update.border_radius {
            next.border_radius = v;
        }
        self.state = next.clamped();
        self.dirty = true;
        &self.state
    }

    /// Restores the default transform while keeping the bound source raster
    /// and target untouched.
    pub fn reset(&mut self) -> &EditorState {
        self.state = EditorState {
            scale: 1.0,
            padding: 0.0,
            rotation: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            background_color: "transparent".to_string(),
            border_radius: 0.0,
            source_raster: std::mem::take(&mut self.state.source_raster),
            target_size: self.state.target_size,
            target_group: self.state.target_group,
        };
        self.dirty = true;
        &self.state
    }

    /// Writes the rendered raster and the current state onto the bound icon.
    ///
    /// Reopening a session for the same icon afterwards restores exactly
    /// this state.
    pub fn commit(self, rendered_raster: Vec<u8>, icon: &mut IconResult) {
        icon.edited_raster = Some(rendered_raster);
        icon.editor_state = Some(self.state);
    }

    /// Ends the session without mutating the bound icon.
    pub fn discard(self) {}
}
