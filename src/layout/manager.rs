//! Layout managers: grid and box layouts owning a [`Grid`].

use slotmap::new_key_type;

use super::grid::Grid;
use crate::geometry::Spacing;
use crate::widget::{TreeError, WidgetId};

new_key_type! {
    /// Unique identifier for a layout in a [`WidgetTree`](crate::widget::WidgetTree).
    pub struct LayoutId;
}

// ---------------------------------------------------------------------------
// LayoutError
// ---------------------------------------------------------------------------

/// Errors raised by layout operations. Like tree errors, these are caller
/// bugs and leave the layout unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown layout {0:?}")]
    UnknownLayout(LayoutId),
    #[error("item is already placed in a layout")]
    AlreadyInLayout,
    #[error("cell ({row}, {col}) already holds an item")]
    CellOccupied { row: usize, col: usize },
    #[error("cell ({row}, {col}) is covered by the item at ({owner_row}, {owner_col})")]
    CellReserved {
        row: usize,
        col: usize,
        owner_row: usize,
        owner_col: usize,
    },
    #[error("row and column spans must be at least 1")]
    InvalidSpan,
    #[error("item is not part of this layout")]
    ItemNotFound,
    #[error("widget {0:?} already has a layout")]
    AlreadyHasLayout(WidgetId),
    #[error("widget {0:?} still has children of its own")]
    ContainerNotEmpty(WidgetId),
    #[error("{0:?} is not a box layout")]
    NotABoxLayout(LayoutId),
    #[error("{0:?} is not a grid layout")]
    NotAGridLayout(LayoutId),
    #[error("placing layout {0:?} there would nest it inside itself")]
    LayoutCycle(LayoutId),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Direction in which a box layout stacks its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }

    /// Whether new items go in front of the existing ones.
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::RightToLeft | Direction::BottomToTop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Grid,
    Box(Direction),
}

/// Something a layout places in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutItem {
    Widget(WidgetId),
    Layout(LayoutId),
}

// ---------------------------------------------------------------------------
// RendererState
// ---------------------------------------------------------------------------

/// Incremental-update bookkeeping of a layout's renderer.
///
/// Drained exactly once per render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererState {
    /// Some cells must be re-measured by the client.
    pub need_adjust: bool,
    /// The parent resized; the client must re-measure everything.
    pub need_remeasure: bool,
    /// Structure changed; the client configuration must be resent.
    pub need_config_update: bool,
    /// Items placed since the element was created.
    pub added_items: Vec<LayoutItem>,
    /// DOM ids of items taken out since the element was created.
    pub removed_items: Vec<String>,
    /// Whether the client has acknowledged the layout's element.
    pub rendered: bool,
}

impl RendererState {
    /// Whether the next pass has anything to send for this layout.
    pub fn has_pending(&self) -> bool {
        self.need_adjust || self.need_remeasure || self.need_config_update
    }

    /// Forget pending changes; the element is about to be created afresh.
    pub(crate) fn reset(&mut self) {
        self.need_adjust = false;
        self.need_remeasure = false;
        self.need_config_update = false;
        self.added_items.clear();
        self.removed_items.clear();
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// A layout manager.
#[derive(Debug, Clone)]
pub struct Layout {
    pub(crate) kind: LayoutKind,
    pub(crate) grid: Grid,
    /// Contents margins; `None` uses the tree default.
    pub(crate) margins: Option<Spacing>,
    /// Hints given before the layout was installed on a container.
    pub(crate) pending_hints: Vec<(String, String)>,
    pub(crate) parent_layout: Option<LayoutId>,
    /// The container whose children this layout (or its outermost
    /// ancestor) places.
    pub(crate) container: Option<WidgetId>,
    pub(crate) dom_id: String,
    pub(crate) renderer: RendererState,
}

impl Layout {
    pub(crate) fn new(kind: LayoutKind, dom_id: String) -> Self {
        Self {
            kind,
            grid: Grid::new(),
            margins: None,
            pending_hints: Vec::new(),
            parent_layout: None,
            container: None,
            dom_id,
            renderer: RendererState::default(),
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }

    pub fn parent_layout(&self) -> Option<LayoutId> {
        self.parent_layout
    }

    pub fn container(&self) -> Option<WidgetId> {
        self.container
    }

    pub fn renderer(&self) -> &RendererState {
        &self.renderer
    }

    /// Hints waiting for the layout to be installed.
    pub fn pending_hints(&self) -> &[(String, String)] {
        &self.pending_hints
    }

    /// Contents margins, falling back to `default` on every side.
    pub fn contents_margins(&self, default: i32) -> Spacing {
        self.margins.unwrap_or(Spacing::all(default))
    }
}
