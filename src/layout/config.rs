//! Wire format of the client-side layout protocol.
//!
//! The grid renderer describes each layout to the client as data: a
//! [`GridConfig`] with per-section stretch, resize and minimum size, and
//! per-cell span, alignment and dirty state. The client sizing algorithm
//! consumes these through [`LayoutCommand`]s and must accept a full config
//! patch ([`LayoutCommand::UpdateConfig`]) as well as bare re-measure
//! requests ([`LayoutCommand::SetDirty`], [`LayoutCommand::Adjust`]).

use serde::{Deserialize, Serialize};

/// `dirty` value of a cell the client must re-measure.
pub const ITEM_DIRTY: u8 = 2;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Resize behaviour of a row or column.
///
/// Serialized untagged: `0` for a fixed section, `[-1]` for a resizable
/// section starting at its natural size, `[px]` for a pixel start size and
/// `[pct, 1]` for a percentage start size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResizeConfig {
    Disabled(u8),
    Size([i32; 1]),
    Percentage(f64, u8),
}

impl ResizeConfig {
    pub const DISABLED: ResizeConfig = ResizeConfig::Disabled(0);
    pub const AUTO: ResizeConfig = ResizeConfig::Size([-1]);

    pub fn is_resizable(&self) -> bool {
        !matches!(self, ResizeConfig::Disabled(_))
    }
}

/// `[stretch, resize, minimum]` of one row or column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig(pub i32, pub ResizeConfig, pub i32);

impl SectionConfig {
    pub fn stretch(&self) -> i32 {
        self.0
    }

    pub fn resize(&self) -> ResizeConfig {
        self.1
    }

    pub fn minimum(&self) -> i32 {
        self.2
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One occupied cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    /// `[col_span, row_span]`, omitted for 1x1 items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<[usize; 2]>,
    /// Alignment bits, omitted when the item fills its cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<u32>,
    pub dirty: u8,
    /// DOM id of the item's element.
    pub id: String,
}

/// Full structural description of one layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: Vec<SectionConfig>,
    pub cols: Vec<SectionConfig>,
    /// Row-major, one entry per cell; `None` for empty or covered cells.
    pub items: Vec<Option<ItemConfig>>,
}

impl GridConfig {
    /// The cell at `(row, col)`.
    pub fn item(&self, row: usize, col: usize) -> Option<&ItemConfig> {
        if col >= self.cols.len() {
            return None;
        }
        self.items.get(row * self.cols.len() + col)?.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A message for the client sizing algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum LayoutCommand {
    /// Register a freshly created layout element.
    Add {
        id: String,
        /// Enclosing layout, for nested layouts.
        parent: Option<String>,
        fit_width: bool,
        fit_height: bool,
        progressive: bool,
        max_width: i32,
        max_height: i32,
        /// `[spacing, margin_left, margin_right]`
        horizontal: [i32; 3],
        /// `[spacing, margin_top, margin_bottom]`
        vertical: [i32; 3],
        config: GridConfig,
    },
    /// Replace the configuration of an existing layout.
    UpdateConfig { id: String, config: GridConfig },
    /// Re-measure every cell.
    SetDirty { id: String },
    /// Re-measure only these `[row, col]` cells.
    Adjust { id: String, cells: Vec<[usize; 2]> },
}

impl LayoutCommand {
    /// DOM id of the layout the command addresses.
    pub fn layout_id(&self) -> &str {
        match self {
            LayoutCommand::Add { id, .. }
            | LayoutCommand::UpdateConfig { id, .. }
            | LayoutCommand::SetDirty { id }
            | LayoutCommand::Adjust { id, .. } => id,
        }
    }
}
