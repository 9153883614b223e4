//! Layout operations on the widget tree.
//!
//! Layouts live in the tree's layout arena. Installing one on a container
//! makes every widget it places (directly or through nested layouts) a
//! child of that container. Structural changes after the layout's element
//! reached the client are recorded in its [`RendererState`] so the next
//! render pass can patch the client instead of re-creating the layout.
//!
//! [`RendererState`]: super::RendererState

use super::alignment::Alignment;
use super::grid::{Grid, Section};
use super::manager::{Direction, Layout, LayoutError, LayoutId, LayoutItem, LayoutKind};
use crate::geometry::{Length, Spacing};
use crate::widget::{DirtyFlags, TreeError, WidgetId, WidgetKind, WidgetTree};

impl WidgetTree {
    // ── Creation ─────────────────────────────────────────────────────

    /// Create an empty grid layout, not yet installed anywhere.
    pub fn create_grid_layout(&mut self) -> LayoutId {
        let dom_id = self.next_dom_id('l');
        self.layouts.insert(Layout::new(LayoutKind::Grid, dom_id))
    }

    /// Create an empty box layout stacking items in `direction`.
    pub fn create_box_layout(&mut self, direction: Direction) -> LayoutId {
        let dom_id = self.next_dom_id('l');
        self.layouts.insert(Layout::new(LayoutKind::Box(direction), dom_id))
    }

    pub fn layout(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(id)
    }

    pub(crate) fn layout_ref(&self, id: LayoutId) -> Result<&Layout, LayoutError> {
        self.layouts.get(id).ok_or(LayoutError::UnknownLayout(id))
    }

    pub(crate) fn layout_mut(&mut self, id: LayoutId) -> Result<&mut Layout, LayoutError> {
        self.layouts.get_mut(id).ok_or(LayoutError::UnknownLayout(id))
    }

    /// `layout` followed by every layout nested in it, in grid order.
    pub(crate) fn layout_family(&self, layout: LayoutId) -> Vec<LayoutId> {
        let mut result = Vec::new();
        let mut stack = vec![layout];
        while let Some(current) = stack.pop() {
            let Some(l) = self.layouts.get(current) else { continue };
            result.push(current);
            let nested: Vec<_> = l
                .grid
                .placed_items()
                .filter_map(|(_, _, cell)| match cell.item {
                    Some(LayoutItem::Layout(n)) => Some(n),
                    _ => None,
                })
                .collect();
            stack.extend(nested.into_iter().rev());
        }
        result
    }

    /// Every widget placed by `layout` or the layouts nested in it.
    pub fn layout_widgets(&self, layout: LayoutId) -> Vec<WidgetId> {
        self.layout_family(layout)
            .into_iter()
            .filter_map(|l| self.layouts.get(l))
            .flat_map(|l| {
                l.grid
                    .placed_items()
                    .filter_map(|(_, _, cell)| match cell.item {
                        Some(LayoutItem::Widget(w)) => Some(w),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    // ── Installation ─────────────────────────────────────────────────

    /// Let `layout` place the children of `container`.
    ///
    /// The container must be an empty plain container without a layout, and
    /// the layout must not be installed or nested anywhere yet. Hints given
    /// to the layout so far are applied now.
    pub fn set_layout(&mut self, container: WidgetId, layout: LayoutId) -> Result<(), LayoutError> {
        let node = self.node(container)?;
        if !matches!(node.kind, WidgetKind::Container(_)) {
            return Err(TreeError::NotAContainer(container).into());
        }
        if node.layout.is_some() {
            return Err(LayoutError::AlreadyHasLayout(container));
        }
        if !self.children(container).is_empty() {
            return Err(LayoutError::ContainerNotEmpty(container));
        }
        let l = self.layout_ref(layout)?;
        if l.container.is_some() || l.parent_layout.is_some() {
            return Err(LayoutError::AlreadyInLayout);
        }
        for widget in self.layout_widgets(layout) {
            self.check_no_cycle(container, widget)?;
        }

        let node = self.node_mut(container)?;
        node.layout = Some(layout);
        let rendered = node.rendered;
        self.bind_container(layout, container)?;
        if rendered {
            self.mark_full_rerender(container)?;
        } else {
            self.mark(container, DirtyFlags::CHILDREN);
        }
        tracing::debug!(?container, ?layout, "layout installed");
        Ok(())
    }

    fn check_no_cycle(&self, container: WidgetId, widget: WidgetId) -> Result<(), TreeError> {
        if widget == container || self.ancestors(container).contains(&widget) {
            return Err(TreeError::CycleDetected {
                parent: container,
                child: widget,
            });
        }
        Ok(())
    }

    /// Record `container` on `layout` and its nested layouts and attach
    /// their widgets to it.
    fn bind_container(&mut self, layout: LayoutId, container: WidgetId) -> Result<(), TreeError> {
        for member in self.layout_family(layout) {
            if let Some(l) = self.layouts.get_mut(member) {
                l.container = Some(container);
                for (name, _) in std::mem::take(&mut l.pending_hints) {
                    report_hint(&l.dom_id, &name);
                }
            }
        }
        for widget in self.layout_widgets(layout) {
            self.attach(container, usize::MAX, widget)?;
        }
        Ok(())
    }

    /// Undo [`bind_container`](Self::bind_container): the layout and its
    /// widgets leave the container and lose their client-side state.
    fn unbind_container(&mut self, layout: LayoutId) {
        for member in self.layout_family(layout) {
            if let Some(l) = self.layouts.get_mut(member) {
                l.container = None;
                l.renderer.rendered = false;
                l.renderer.reset();
            }
            self.in_flight.created_layouts.retain(|&id| id != member);
        }
        for widget in self.layout_widgets(layout) {
            self.unlink(widget);
            self.forget_rendered(widget);
        }
    }

    // ── Placement ────────────────────────────────────────────────────

    /// Place `widget` in a grid layout at `(row, col)`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_widget_to_grid(
        &mut self,
        layout: LayoutId,
        widget: WidgetId,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        alignment: Alignment,
    ) -> Result<(), LayoutError> {
        self.place_in_grid(layout, LayoutItem::Widget(widget), row, col, row_span, col_span, alignment)
    }

    /// Nest `nested` in a grid layout at `(row, col)`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_layout_to_grid(
        &mut self,
        layout: LayoutId,
        nested: LayoutId,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        alignment: Alignment,
    ) -> Result<(), LayoutError> {
        self.place_in_grid(layout, LayoutItem::Layout(nested), row, col, row_span, col_span, alignment)
    }

    #[allow(clippy::too_many_arguments)]
    fn place_in_grid(
        &mut self,
        layout: LayoutId,
        item: LayoutItem,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        alignment: Alignment,
    ) -> Result<(), LayoutError> {
        if self.layout_ref(layout)?.kind != LayoutKind::Grid {
            return Err(LayoutError::NotAGridLayout(layout));
        }
        self.check_placeable(layout, item)?;
        self.layout_mut(layout)?
            .grid
            .add_item(item, row, col, row_span, col_span, alignment)?;
        self.adopt_item(layout, item)
    }

    /// Append `item` to a box layout, or prepend it for reversed
    /// directions.
    pub fn add_to_box(
        &mut self,
        layout: LayoutId,
        item: LayoutItem,
        stretch: i32,
        alignment: Alignment,
    ) -> Result<(), LayoutError> {
        let LayoutKind::Box(direction) = self.layout_ref(layout)?.kind else {
            return Err(LayoutError::NotABoxLayout(layout));
        };
        self.check_placeable(layout, item)?;

        let grid = &mut self.layout_mut(layout)?.grid;
        let section = Section::new(stretch);
        if direction.is_horizontal() {
            let index = if direction.is_reversed() { 0 } else { grid.column_count() };
            grid.expand(1, 0);
            grid.insert_column(index, section);
            grid.add_item(item, 0, index, 1, 1, alignment)?;
        } else {
            let index = if direction.is_reversed() { 0 } else { grid.row_count() };
            grid.expand(0, 1);
            grid.insert_row(index, section);
            grid.add_item(item, index, 0, 1, 1, alignment)?;
        }
        self.adopt_item(layout, item)
    }

    /// Everything that must hold before `item` may enter `layout`.
    fn check_placeable(&self, layout: LayoutId, item: LayoutItem) -> Result<(), LayoutError> {
        let container = self.layout_ref(layout)?.container;
        match item {
            LayoutItem::Widget(widget) => {
                let node = self.node(widget)?;
                if node.in_layout.is_some() {
                    return Err(LayoutError::AlreadyInLayout);
                }
                if self.parent(widget).is_some() || self.root() == Some(widget) {
                    return Err(TreeError::AlreadyAttached { child: widget }.into());
                }
                if let Some(container) = container {
                    self.check_no_cycle(container, widget)?;
                }
            }
            LayoutItem::Layout(nested) => {
                let n = self.layout_ref(nested)?;
                if n.parent_layout.is_some() || n.container.is_some() {
                    return Err(LayoutError::AlreadyInLayout);
                }
                let mut current = Some(layout);
                while let Some(l) = current {
                    if l == nested {
                        return Err(LayoutError::LayoutCycle(nested));
                    }
                    current = self.layouts.get(l).and_then(|l| l.parent_layout);
                }
                if let Some(container) = container {
                    for widget in self.layout_widgets(nested) {
                        self.check_no_cycle(container, widget)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Link a freshly placed item to its layout and, when installed, to
    /// the container.
    fn adopt_item(&mut self, layout: LayoutId, item: LayoutItem) -> Result<(), LayoutError> {
        let container = self.layout_ref(layout)?.container;
        match item {
            LayoutItem::Widget(widget) => {
                self.node_mut(widget)?.in_layout = Some(layout);
                if let Some(container) = container {
                    self.attach(container, usize::MAX, widget)?;
                }
            }
            LayoutItem::Layout(nested) => {
                self.layout_mut(nested)?.parent_layout = Some(layout);
                if let Some(container) = container {
                    self.bind_container(nested, container)?;
                }
            }
        }

        let l = self.layout_mut(layout)?;
        if l.renderer.rendered {
            l.renderer.added_items.push(item);
            l.renderer.need_config_update = true;
            self.schedule_layout(layout);
        }
        Ok(())
    }

    /// Take `item` out of `layout`. The item survives, detached.
    pub fn remove_layout_item(&mut self, layout: LayoutId, item: LayoutItem) -> Result<(), LayoutError> {
        let l = self.layout_mut(layout)?;
        let (row, col) = l.grid.remove_item(item).ok_or(LayoutError::ItemNotFound)?;
        if let LayoutKind::Box(direction) = l.kind {
            if direction.is_horizontal() {
                l.grid.remove_column(col);
            } else {
                l.grid.remove_row(row);
            }
        }

        let dom_id = match item {
            LayoutItem::Widget(widget) => {
                let node = self.node_mut(widget)?;
                node.in_layout = None;
                let dom_id = node.dom_id.clone();
                self.unlink(widget);
                self.forget_rendered(widget);
                dom_id
            }
            LayoutItem::Layout(nested) => {
                let n = self.layout_mut(nested)?;
                n.parent_layout = None;
                let dom_id = n.dom_id.clone();
                self.unbind_container(nested);
                dom_id
            }
        };

        let l = self.layout_mut(layout)?;
        if l.renderer.rendered {
            let before = l.renderer.added_items.len();
            l.renderer.added_items.retain(|&added| added != item);
            if l.renderer.added_items.len() == before {
                l.renderer.removed_items.push(dom_id);
            }
            l.renderer.need_config_update = true;
            self.schedule_layout(layout);
        }
        Ok(())
    }

    /// Take a widget about to be destroyed out of its layout.
    pub(crate) fn detach_from_layout(&mut self, widget: WidgetId) {
        let Some(layout) = self.nodes.get(widget).and_then(|n| n.in_layout) else {
            return;
        };
        if let Err(err) = self.remove_layout_item(layout, LayoutItem::Widget(widget)) {
            tracing::warn!(?widget, %err, "widget not found in its layout");
        }
    }

    /// Drop `layout` and every layout nested in it from the arena.
    pub(crate) fn destroy_layout(&mut self, layout: LayoutId) {
        for member in self.layout_family(layout) {
            self.layouts.remove(member);
            self.in_flight.created_layouts.retain(|&id| id != member);
            self.in_flight.updated_layouts.retain(|&id| id != member);
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    pub fn set_row_stretch(&mut self, layout: LayoutId, row: usize, stretch: i32) -> Result<(), LayoutError> {
        self.update_grid(layout, |grid| {
            grid.expand(row + 1, 0);
            grid.rows[row].stretch = stretch;
        })
    }

    pub fn set_column_stretch(
        &mut self,
        layout: LayoutId,
        column: usize,
        stretch: i32,
    ) -> Result<(), LayoutError> {
        self.update_grid(layout, |grid| {
            grid.expand(0, column + 1);
            grid.columns[column].stretch = stretch;
        })
    }

    /// Let the user drag the boundary below `row`, starting from
    /// `initial_size`.
    pub fn set_row_resizable(
        &mut self,
        layout: LayoutId,
        row: usize,
        resizable: bool,
        initial_size: Length,
    ) -> Result<(), LayoutError> {
        self.update_grid(layout, |grid| {
            grid.expand(row + 1, 0);
            grid.rows[row].resizable = resizable;
            grid.rows[row].initial_size = initial_size;
        })
    }

    pub fn set_column_resizable(
        &mut self,
        layout: LayoutId,
        column: usize,
        resizable: bool,
        initial_size: Length,
    ) -> Result<(), LayoutError> {
        self.update_grid(layout, |grid| {
            grid.expand(0, column + 1);
            grid.columns[column].resizable = resizable;
            grid.columns[column].initial_size = initial_size;
        })
    }

    /// Change a section or item property carried by the client
    /// configuration.
    fn update_grid(&mut self, layout: LayoutId, f: impl FnOnce(&mut Grid)) -> Result<(), LayoutError> {
        let l = self.layout_mut(layout)?;
        f(&mut l.grid);
        if l.renderer.rendered {
            l.renderer.need_config_update = true;
            self.schedule_layout(layout);
        }
        Ok(())
    }

    /// Spacing between cells, in pixels.
    pub fn set_spacing(&mut self, layout: LayoutId, horizontal: i32, vertical: i32) -> Result<(), LayoutError> {
        let l = self.layout_mut(layout)?;
        if l.grid.horizontal_spacing == horizontal && l.grid.vertical_spacing == vertical {
            return Ok(());
        }
        l.grid.horizontal_spacing = horizontal;
        l.grid.vertical_spacing = vertical;
        self.recreate_layout(layout)
    }

    /// Margins between the container's edge and the outer cells. Only
    /// top-level layouts use them.
    pub fn set_contents_margins(&mut self, layout: LayoutId, margins: Spacing) -> Result<(), LayoutError> {
        let l = self.layout_mut(layout)?;
        if l.margins == Some(margins) {
            return Ok(());
        }
        l.margins = Some(margins);
        self.recreate_layout(layout)
    }

    /// Spacing and margins travel with the layout's registration, so a
    /// rendered layout has to be created again.
    fn recreate_layout(&mut self, layout: LayoutId) -> Result<(), LayoutError> {
        let l = self.layout_ref(layout)?;
        if let (true, Some(container)) = (l.renderer.rendered, l.container) {
            self.mark_full_rerender(container)?;
        }
        Ok(())
    }

    /// Pass a renderer-specific hint. Hints given before the layout is
    /// installed are kept until then.
    pub fn set_layout_hint(&mut self, layout: LayoutId, name: &str, value: &str) -> Result<(), LayoutError> {
        let l = self.layout_mut(layout)?;
        if l.container.is_none() {
            l.pending_hints.push((name.to_owned(), value.to_owned()));
        } else {
            report_hint(&l.dom_id, name);
        }
        Ok(())
    }

    // ── Resize notifications ─────────────────────────────────────────

    /// The size of `item` may have changed. Returns whether this marked its
    /// cell for re-measuring; a cell already marked is left alone.
    pub fn item_resized(&mut self, layout: LayoutId, item: LayoutItem) -> bool {
        let Some(l) = self.layouts.get_mut(layout) else {
            return false;
        };
        let Some((row, col)) = l.grid.find(item) else {
            return false;
        };
        let Some(cell) = l.grid.item_mut(row, col) else {
            return false;
        };
        if cell.update {
            return false;
        }
        cell.update = true;
        l.renderer.need_adjust = true;
        self.schedule_layout(layout);
        true
    }

    /// The container of `layout` changed size. Returns whether this is a
    /// new request to re-measure the whole layout.
    pub fn parent_resized(&mut self, layout: LayoutId) -> bool {
        let Some(l) = self.layouts.get_mut(layout) else {
            return false;
        };
        if l.renderer.need_remeasure {
            return false;
        }
        l.renderer.need_remeasure = true;
        self.schedule_layout(layout);
        true
    }

    /// Make sure the render pass visits the container of `layout`.
    fn schedule_layout(&mut self, layout: LayoutId) {
        if let Some(container) = self.layouts.get(layout).and_then(|l| l.container) {
            self.schedule(container);
        }
    }

    // ── Minimum size ─────────────────────────────────────────────────

    /// Sum of the column minimums plus the spacing between columns.
    pub fn layout_minimum_width(&self, layout: LayoutId) -> i32 {
        let Some(l) = self.layouts.get(layout) else {
            return 0;
        };
        let columns = l.grid.column_count();
        let total: i32 = (0..columns).map(|c| self.column_minimum_width(l, c)).sum();
        total + columns.saturating_sub(1) as i32 * l.grid.horizontal_spacing
    }

    /// Sum of the row minimums plus the spacing between rows.
    pub fn layout_minimum_height(&self, layout: LayoutId) -> i32 {
        let Some(l) = self.layouts.get(layout) else {
            return 0;
        };
        let rows = l.grid.row_count();
        let total: i32 = (0..rows).map(|r| self.row_minimum_height(l, r)).sum();
        total + rows.saturating_sub(1) as i32 * l.grid.vertical_spacing
    }

    pub(crate) fn column_minimum_width(&self, layout: &Layout, col: usize) -> i32 {
        (0..layout.grid.row_count())
            .filter_map(|r| layout.grid.item(r, col).and_then(|cell| cell.item))
            .map(|item| match item {
                LayoutItem::Widget(w) => self.nodes.get(w).map_or(0, |n| n.min_width.to_pixels()),
                LayoutItem::Layout(n) => self.layout_minimum_width(n),
            })
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn row_minimum_height(&self, layout: &Layout, row: usize) -> i32 {
        (0..layout.grid.column_count())
            .filter_map(|c| layout.grid.item(row, c).and_then(|cell| cell.item))
            .map(|item| match item {
                LayoutItem::Widget(w) => self.nodes.get(w).map_or(0, |n| n.min_height.to_pixels()),
                LayoutItem::Layout(n) => self.layout_minimum_height(n),
            })
            .max()
            .unwrap_or(0)
    }
}

/// The grid renderer understands no hints; they are reported and ignored.
fn report_hint(layout: &str, name: &str) {
    tracing::error!(layout, "unrecognized hint '{name}'");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Container, Text};
    use pretty_assertions::assert_eq;

    fn tree_with_container() -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let root = tree.create(Container::new());
        tree.set_root(root).unwrap();
        (tree, root)
    }

    #[test]
    fn set_layout_attaches_placed_widgets() {
        let (mut tree, root) = tree_with_container();
        let layout = tree.create_grid_layout();
        let a = tree.create(Text::new("a"));
        let b = tree.create(Text::new("b"));
        tree.add_widget_to_grid(layout, a, 0, 0, 1, 1, Alignment::empty()).unwrap();
        tree.add_widget_to_grid(layout, b, 1, 0, 1, 1, Alignment::empty()).unwrap();
        assert_eq!(tree.parent(a), None);

        tree.set_layout(root, layout).unwrap();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.get(a).unwrap().in_layout(), Some(layout));
        assert_eq!(tree.layout(layout).unwrap().container(), Some(root));
    }

    #[test]
    fn layout_rejects_second_container() {
        let (mut tree, root) = tree_with_container();
        let other = tree.create(Container::new());
        let layout = tree.create_grid_layout();
        tree.set_layout(root, layout).unwrap();
        assert_eq!(tree.set_layout(other, layout), Err(LayoutError::AlreadyInLayout));
        let second = tree.create_grid_layout();
        assert_eq!(tree.set_layout(root, second), Err(LayoutError::AlreadyHasLayout(root)));
    }

    #[test]
    fn only_empty_plain_containers_take_layouts() {
        let (mut tree, root) = tree_with_container();
        let text = tree.create(Text::new("x"));
        tree.add_child(root, text).unwrap();
        let layout = tree.create_grid_layout();
        assert_eq!(tree.set_layout(root, layout), Err(LayoutError::ContainerNotEmpty(root)));
        assert_eq!(
            tree.set_layout(text, layout),
            Err(LayoutError::Tree(TreeError::NotAContainer(text)))
        );
    }

    #[test]
    fn widget_in_two_layouts_is_rejected() {
        let mut tree = WidgetTree::new();
        let first = tree.create_grid_layout();
        let second = tree.create_grid_layout();
        let w = tree.create(Text::new("w"));
        tree.add_widget_to_grid(first, w, 0, 0, 1, 1, Alignment::empty()).unwrap();
        assert_eq!(
            tree.add_widget_to_grid(second, w, 0, 0, 1, 1, Alignment::empty()),
            Err(LayoutError::AlreadyInLayout)
        );
        assert_eq!(
            tree.add_to_box(second, LayoutItem::Widget(w), 0, Alignment::empty()),
            Err(LayoutError::NotABoxLayout(second))
        );
    }

    #[test]
    fn attached_widget_cannot_be_placed() {
        let (mut tree, root) = tree_with_container();
        let w = tree.create(Text::new("w"));
        tree.add_child(root, w).unwrap();
        let layout = tree.create_grid_layout();
        assert_eq!(
            tree.add_widget_to_grid(layout, w, 0, 0, 1, 1, Alignment::empty()),
            Err(LayoutError::Tree(TreeError::AlreadyAttached { child: w }))
        );
    }

    #[test]
    fn layout_cannot_nest_itself() {
        let mut tree = WidgetTree::new();
        let outer = tree.create_grid_layout();
        let inner = tree.create_grid_layout();
        tree.add_layout_to_grid(outer, inner, 0, 0, 1, 1, Alignment::empty()).unwrap();
        assert_eq!(
            tree.add_layout_to_grid(inner, outer, 0, 0, 1, 1, Alignment::empty()),
            Err(LayoutError::LayoutCycle(outer))
        );
        assert_eq!(
            tree.add_layout_to_grid(outer, outer, 1, 0, 1, 1, Alignment::empty()),
            Err(LayoutError::LayoutCycle(outer))
        );
        let other = tree.create_grid_layout();
        assert_eq!(
            tree.add_layout_to_grid(other, inner, 0, 0, 1, 1, Alignment::empty()),
            Err(LayoutError::AlreadyInLayout)
        );
    }

    #[test]
    fn nested_layout_widgets_join_the_container() {
        let (mut tree, root) = tree_with_container();
        let outer = tree.create_grid_layout();
        let inner = tree.create_box_layout(Direction::TopToBottom);
        let w = tree.create(Text::new("w"));
        tree.add_to_box(inner, LayoutItem::Widget(w), 1, Alignment::empty()).unwrap();
        tree.add_layout_to_grid(outer, inner, 0, 0, 1, 1, Alignment::empty()).unwrap();
        tree.set_layout(root, outer).unwrap();
        assert_eq!(tree.children(root), &[w]);
        assert_eq!(tree.layout(inner).unwrap().container(), Some(root));
        assert_eq!(tree.layout_family(outer), vec![outer, inner]);
    }

    #[test]
    fn reversed_box_prepends() {
        let mut tree = WidgetTree::new();
        let layout = tree.create_box_layout(Direction::RightToLeft);
        let a = tree.create(Text::new("a"));
        let b = tree.create(Text::new("b"));
        tree.add_to_box(layout, LayoutItem::Widget(a), 0, Alignment::empty()).unwrap();
        tree.add_to_box(layout, LayoutItem::Widget(b), 2, Alignment::empty()).unwrap();
        let grid = tree.layout(layout).unwrap().grid();
        assert_eq!(grid.find(LayoutItem::Widget(b)), Some((0, 0)));
        assert_eq!(grid.find(LayoutItem::Widget(a)), Some((0, 1)));
        assert_eq!(grid.columns()[0].stretch, 2);
    }

    #[test]
    fn removing_from_box_drops_the_section() {
        let mut tree = WidgetTree::new();
        let layout = tree.create_box_layout(Direction::TopToBottom);
        let a = tree.create(Text::new("a"));
        let b = tree.create(Text::new("b"));
        tree.add_to_box(layout, LayoutItem::Widget(a), 0, Alignment::empty()).unwrap();
        tree.add_to_box(layout, LayoutItem::Widget(b), 0, Alignment::empty()).unwrap();
        tree.remove_layout_item(layout, LayoutItem::Widget(a)).unwrap();
        let grid = tree.layout(layout).unwrap().grid();
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.find(LayoutItem::Widget(b)), Some((0, 0)));
        assert_eq!(tree.get(a).unwrap().in_layout(), None);
        assert_eq!(
            tree.remove_layout_item(layout, LayoutItem::Widget(a)),
            Err(LayoutError::ItemNotFound)
        );
    }

    #[test]
    fn hints_wait_for_installation() {
        let (mut tree, root) = tree_with_container();
        let layout = tree.create_grid_layout();
        tree.set_layout_hint(layout, "table-layout", "fixed").unwrap();
        assert_eq!(tree.layout(layout).unwrap().pending_hints().len(), 1);
        tree.set_layout(root, layout).unwrap();
        assert!(tree.layout(layout).unwrap().pending_hints().is_empty());
        tree.set_layout_hint(layout, "anything", "x").unwrap();
        assert!(tree.layout(layout).unwrap().pending_hints().is_empty());
    }

    #[test]
    fn item_resized_marks_once() {
        let (mut tree, root) = tree_with_container();
        let layout = tree.create_grid_layout();
        let w = tree.create(Text::new("w"));
        tree.add_widget_to_grid(layout, w, 0, 0, 1, 1, Alignment::empty()).unwrap();
        tree.set_layout(root, layout).unwrap();

        assert!(tree.item_resized(layout, LayoutItem::Widget(w)));
        assert!(!tree.item_resized(layout, LayoutItem::Widget(w)));
        assert!(tree.layout(layout).unwrap().renderer().need_adjust);
        assert!(tree.parent_resized(layout));
        assert!(!tree.parent_resized(layout));
    }

    #[test]
    fn minimum_size_sums_columns_and_spacing() {
        let mut tree = WidgetTree::new();
        let layout = tree.create_grid_layout();
        let sizes = [(0, 0, 40.0), (1, 0, 60.0), (0, 1, 30.0)];
        for (row, col, width) in sizes {
            let w = tree.create(Text::new("w"));
            tree.set_minimum_size(w, Length::px(width), Length::px(10.0)).unwrap();
            tree.add_widget_to_grid(layout, w, row, col, 1, 1, Alignment::empty()).unwrap();
        }
        // max(40, 60) + 30 + one gap of 6
        assert_eq!(tree.layout_minimum_width(layout), 96);
        // 10 + 10 + one gap of 6
        assert_eq!(tree.layout_minimum_height(layout), 26);
        let empty = tree.create_grid_layout();
        assert_eq!(tree.layout_minimum_width(empty), 0);
    }

    #[test]
    fn minimum_width_is_monotonic() {
        let mut tree = WidgetTree::new();
        let layout = tree.create_grid_layout();
        let a = tree.create(Text::new("a"));
        let b = tree.create(Text::new("b"));
        tree.add_widget_to_grid(layout, a, 0, 0, 1, 1, Alignment::empty()).unwrap();
        tree.add_widget_to_grid(layout, b, 1, 0, 1, 1, Alignment::empty()).unwrap();

        let mut previous = tree.layout_minimum_width(layout);
        for width in [10.0, 5.0, 50.0, 80.0] {
            let current_a = tree.get(a).unwrap().minimum_width().to_pixels() as f64;
            tree.set_minimum_size(a, Length::px(current_a.max(width)), Length::Auto).unwrap();
            let now = tree.layout_minimum_width(layout);
            assert!(now >= previous);
            previous = now;
        }
        assert_eq!(previous, 80);
    }

    #[test]
    fn nested_layout_minimum_counts_inner_spacing() {
        let mut tree = WidgetTree::new();
        let outer = tree.create_grid_layout();
        let inner = tree.create_box_layout(Direction::LeftToRight);
        for _ in 0..2 {
            let w = tree.create(Text::new("w"));
            tree.set_minimum_size(w, Length::px(20.0), Length::Auto).unwrap();
            tree.add_to_box(inner, LayoutItem::Widget(w), 0, Alignment::empty()).unwrap();
        }
        tree.add_layout_to_grid(outer, inner, 0, 0, 1, 1, Alignment::empty()).unwrap();
        assert_eq!(tree.layout_minimum_width(outer), 46);
    }
}
