//! Grid layout renderer.
//!
//! Turns a layout's grid into DOM elements plus a [`LayoutCommand::Add`]
//! registering it with the client sizing algorithm, and afterwards patches
//! the client incrementally from the layout's [`RendererState`].
//!
//! Clients with script support get a bare DIV whose items the client
//! positions itself. Other clients get a table: column widths follow the
//! stretch factors, cell padding carries the spacing, and alignment is
//! expressed with floats, `text-align` and a centering table.
//!
//! [`RendererState`]: super::RendererState

use super::alignment::{HAlign, VAlign};
use super::config::{GridConfig, ItemConfig, LayoutCommand, ResizeConfig, SectionConfig, ITEM_DIRTY};
use super::grid::{Grid, Section};
use super::manager::{Layout, LayoutId, LayoutItem};
use crate::dom::{DomElement, DomElementType, Instruction, Property};
use crate::geometry::{round_css, Length, Spacing};
use crate::render::RenderContext;
use crate::widget::WidgetTree;

impl WidgetTree {
    /// Create the element for `layout`.
    ///
    /// Resets the layout's pending changes: the new element reflects the
    /// current grid. The registration command for the client goes to
    /// `after`, to be sent once the element exists.
    pub(crate) fn create_layout_element(
        &mut self,
        layout: LayoutId,
        fit_width: bool,
        fit_height: bool,
        ctx: &RenderContext,
        after: &mut Vec<Instruction>,
    ) -> Option<DomElement> {
        let l = self.layouts.get_mut(layout)?;
        l.renderer.reset();
        let snapshot = l.clone();
        let grid = &snapshot.grid;
        let progressive = !ctx.environment.ajax;

        let top_level = snapshot.parent_layout.is_none();
        let mut margins = Spacing::ZERO;
        let (mut max_width, mut max_height) = (0, 0);
        if top_level {
            margins = snapshot.contents_margins(self.default_contents_margin);
            if let Some(node) = snapshot.container.and_then(|c| self.nodes.get(c)) {
                max_width = node.max_width.to_pixels();
                max_height = node.max_height.to_pixels();
            }
        }

        let parent = snapshot
            .parent_layout
            .and_then(|p| self.layouts.get(p))
            .map(|p| p.dom_id.clone());
        let config = self.grid_config(layout);

        let mut div = DomElement::create_new(DomElementType::Div).with_id(snapshot.dom_id.clone());
        div.set_property(Property::StylePosition, "relative");

        if progressive {
            let table = self.create_table(&snapshot, margins, max_width, max_height, ctx, after);
            div.add_child(table);
        } else {
            for (_, _, cell) in grid.placed_items() {
                if let Some(item) = cell.item {
                    if let Some(mut element) = self.create_item_element(item, ctx, after) {
                        element.set_property(Property::StyleVisibility, "hidden");
                        div.add_child(element);
                    }
                }
            }
        }

        after.push(Instruction::Layout {
            command: LayoutCommand::Add {
                id: snapshot.dom_id.clone(),
                parent,
                fit_width,
                fit_height,
                progressive,
                max_width,
                max_height,
                horizontal: [grid.horizontal_spacing, margins.left, margins.right],
                vertical: [grid.vertical_spacing, margins.top, margins.bottom],
                config,
            },
        });
        self.in_flight.created_layouts.push(layout);
        Some(div)
    }

    fn create_item_element(
        &mut self,
        item: LayoutItem,
        ctx: &RenderContext,
        after: &mut Vec<Instruction>,
    ) -> Option<DomElement> {
        match item {
            LayoutItem::Widget(widget) => self.create_widget_element(widget, ctx, after),
            LayoutItem::Layout(nested) => self.create_layout_element(nested, true, true, ctx, after),
        }
    }

    /// The table structure used for clients without script support.
    fn create_table(
        &mut self,
        layout: &Layout,
        margins: Spacing,
        max_width: i32,
        max_height: i32,
        ctx: &RenderContext,
        after: &mut Vec<Instruction>,
    ) -> DomElement {
        let grid = &layout.grid;
        let rows = grid.row_count();
        let cols = grid.column_count();

        let mut table = DomElement::create_new(DomElementType::Table);
        let mut style = String::new();
        if max_width != 0 {
            style.push_str(&format!("max-width: {max_width}px;"));
        }
        if max_height != 0 {
            style.push_str(&format!("max-height: {max_height}px;"));
        }
        style.push_str("width: 100%;");
        table.set_property(Property::Style, style);

        let total_stretch: i32 = grid.columns.iter().map(|c| c.stretch.max(0)).sum();
        for column in &grid.columns {
            let mut col = DomElement::create_new(DomElementType::Col);
            let stretch = column.stretch.max(0);
            if stretch != 0 || total_stretch == 0 {
                let pct = if total_stretch == 0 {
                    100.0 / cols as f64
                } else {
                    100.0 * stretch as f64 / total_stretch as f64
                };
                col.set_property(Property::Style, format!("width:{}%;", round_css(pct, 2)));
            }
            table.add_child(col);
        }

        let mut tbody = DomElement::create_new(DomElementType::Tbody);
        let mut over_spanned = vec![false; rows * cols];
        let mut prev_row_with_item: Option<usize> = None;

        for row in 0..rows {
            let mut tr = DomElement::create_new(DomElementType::Tr);
            let mut row_visible = false;
            let mut prev_col_with_item: Option<usize> = None;

            for col in 0..cols {
                if over_spanned[row * cols + col] {
                    continue;
                }
                let Some(cell) = grid.item(row, col).copied() else { continue };
                for i in 0..cell.row_span {
                    for j in 0..cell.col_span {
                        if i + j > 0 && row + i < rows && col + j < cols {
                            over_spanned[(row + i) * cols + col + j] = true;
                        }
                    }
                }

                let h_align = cell.alignment.horizontal().unwrap_or(HAlign::Justify);
                let v_align = cell.alignment.vertical();

                let mut td = DomElement::create_new(DomElementType::Td);
                let item_visible = self.has_visible_item(grid, row, col);
                row_visible |= item_visible;
                if item_visible {
                    let next_row = next_row_with_item(self, grid, row, col);
                    let next_col = next_column_with_item(self, grid, row, col);
                    let padding = cell_padding(
                        grid,
                        margins,
                        prev_row_with_item.is_none(),
                        next_row == rows,
                        prev_col_with_item.is_none(),
                        next_col == cols,
                    );
                    let padding = if ctx.is_right_to_left() { padding.mirrored() } else { padding };

                    let mut style = padding.css_padding();
                    match v_align {
                        Some(VAlign::Top) => style.push_str("vertical-align:top;"),
                        Some(VAlign::Middle) => style.push_str("vertical-align:middle;"),
                        Some(VAlign::Bottom) => style.push_str("vertical-align:bottom;"),
                        None => {}
                    }
                    td.set_property(Property::Style, style);
                    if cell.row_span != 1 {
                        td.set_property(Property::RowSpan, cell.row_span.to_string());
                    }
                    if cell.col_span != 1 {
                        td.set_property(Property::ColSpan, cell.col_span.to_string());
                    }
                    prev_col_with_item = Some(col);
                }

                let element = match cell.item {
                    Some(item) => self.create_item_element(item, ctx, after),
                    None => None,
                };
                if let Some(mut element) = element {
                    element.set_property(Property::StyleBoxSizing, "border-box");
                    match h_align {
                        HAlign::Center => element = center_wrap(element, v_align.is_none()),
                        HAlign::Right | HAlign::Left => {
                            let side = if h_align == HAlign::Right { "right" } else { "left" };
                            if element.is_default_inline() {
                                td.set_property(Property::StyleTextAlign, side);
                            } else {
                                element.set_property(Property::StyleFloat, side);
                            }
                        }
                        HAlign::Justify => {}
                    }
                    td.add_child(element);
                }
                tr.add_child(td);
            }

            if row_visible {
                prev_row_with_item = Some(row);
            } else {
                tr.set_property(Property::StyleDisplay, "hidden");
            }
            tbody.add_child(tr);
        }

        table.add_child(tbody);
        table
    }

    /// Whether `(row, col)` anchors an item that takes up space: a layout,
    /// or a widget that is not hidden.
    fn has_visible_item(&self, grid: &Grid, row: usize, col: usize) -> bool {
        match grid.item(row, col).and_then(|cell| cell.item) {
            Some(LayoutItem::Widget(w)) => self.nodes.get(w).is_some_and(|n| !n.hidden),
            Some(LayoutItem::Layout(_)) => true,
            None => false,
        }
    }

    /// The client configuration of `layout`. Reading it consumes the
    /// per-cell re-measure flags: they travel as `dirty`.
    pub(crate) fn grid_config(&mut self, layout: LayoutId) -> GridConfig {
        let Some(l) = self.layouts.get(layout) else {
            return GridConfig::default();
        };
        let rows = (0..l.grid.row_count())
            .map(|r| section_config(&l.grid.rows[r], self.row_minimum_height(l, r)))
            .collect();
        let cols = (0..l.grid.column_count())
            .map(|c| section_config(&l.grid.columns[c], self.column_minimum_width(l, c)))
            .collect();

        let mut items = Vec::with_capacity(l.grid.row_count() * l.grid.column_count());
        for row in &l.grid.items {
            for cell in row {
                let config = cell.item.and_then(|item| {
                    let id = self.item_dom_id(item)?;
                    let bits = cell.alignment.client_bits();
                    Some(ItemConfig {
                        span: (cell.row_span != 1 || cell.col_span != 1)
                            .then_some([cell.col_span, cell.row_span]),
                        align: (bits != 0).then_some(bits),
                        dirty: if cell.update { ITEM_DIRTY } else { 0 },
                        id,
                    })
                });
                items.push(config);
            }
        }

        if let Some(l) = self.layouts.get_mut(layout) {
            for cell in l.grid.items.iter_mut().flatten() {
                cell.update = false;
            }
        }
        GridConfig { rows, cols, items }
    }

    fn item_dom_id(&self, item: LayoutItem) -> Option<String> {
        match item {
            LayoutItem::Widget(w) => self.nodes.get(w).map(|n| n.dom_id.clone()),
            LayoutItem::Layout(n) => self.layouts.get(n).map(|l| l.dom_id.clone()),
        }
    }

    /// Send the changes recorded since `layout` was created, then recurse
    /// into nested layouts in grid order.
    pub(crate) fn update_layout_dom(
        &mut self,
        layout: LayoutId,
        ctx: &RenderContext,
        out: &mut Vec<Instruction>,
    ) {
        let Some(l) = self.layouts.get_mut(layout) else { return };
        let dom_id = l.dom_id.clone();
        let mut drained = false;

        if l.renderer.need_config_update {
            l.renderer.need_config_update = false;
            let added = std::mem::take(&mut l.renderer.added_items);
            let removed = std::mem::take(&mut l.renderer.removed_items);
            for item in added {
                let mut after = Vec::new();
                if let Some(mut element) = self.create_item_element(item, ctx, &mut after) {
                    element.set_property(Property::StyleVisibility, "hidden");
                    out.push(Instruction::Create {
                        parent: dom_id.clone(),
                        before: None,
                        element,
                    });
                }
                out.append(&mut after);
            }
            for id in removed {
                out.push(Instruction::Remove { id });
            }
            let config = self.grid_config(layout);
            out.push(Instruction::Layout {
                command: LayoutCommand::UpdateConfig { id: dom_id.clone(), config },
            });
            if let Some(l) = self.layouts.get_mut(layout) {
                l.renderer.need_remeasure = false;
                l.renderer.need_adjust = false;
            }
            drained = true;
        }

        let Some(l) = self.layouts.get_mut(layout) else { return };
        if l.renderer.need_remeasure {
            l.renderer.need_remeasure = false;
            out.push(Instruction::Layout {
                command: LayoutCommand::SetDirty { id: dom_id.clone() },
            });
            drained = true;
        }

        if l.renderer.need_adjust {
            l.renderer.need_adjust = false;
            let mut cells = Vec::new();
            for (r, row) in l.grid.items.iter_mut().enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    if cell.update {
                        cell.update = false;
                        cells.push([r, c]);
                    }
                }
            }
            out.push(Instruction::Layout {
                command: LayoutCommand::Adjust { id: dom_id, cells },
            });
            drained = true;
        }

        let nested: Vec<LayoutId> = l
            .grid
            .placed_items()
            .filter_map(|(_, _, cell)| match cell.item {
                Some(LayoutItem::Layout(n)) => Some(n),
                _ => None,
            })
            .collect();
        if drained {
            self.in_flight.updated_layouts.push(layout);
        }
        for n in nested {
            self.update_layout_dom(n, ctx, out);
        }
    }
}

fn section_config(section: &Section, minimum: i32) -> SectionConfig {
    let resize = if !section.resizable {
        ResizeConfig::DISABLED
    } else {
        match section.initial_size {
            Length::Auto => ResizeConfig::AUTO,
            Length::Percentage(pct) => ResizeConfig::Percentage(pct, 1),
            Length::Pixels(_) => ResizeConfig::Size([section.initial_size.to_pixels()]),
        }
    };
    SectionConfig(section.stretch, resize, minimum)
}

/// Padding of a table cell: the full margin on the grid's outer edge,
/// half the spacing towards a neighbouring item. For odd spacing the
/// earlier cell's trailing side gets the extra pixel.
fn cell_padding(
    grid: &Grid,
    margins: Spacing,
    first_row: bool,
    last_row: bool,
    first_col: bool,
    last_col: bool,
) -> Spacing {
    let vs = grid.vertical_spacing;
    let hs = grid.horizontal_spacing;
    Spacing {
        top: if first_row { margins.top } else { vs / 2 },
        bottom: if last_row { margins.bottom } else { (vs + 1) / 2 },
        left: if first_col { margins.left } else { hs / 2 },
        right: if last_col { margins.right } else { (hs + 1) / 2 },
    }
}

/// First row below the item at `(row, col)` holding a visible item, or
/// the row count.
fn next_row_with_item(tree: &WidgetTree, grid: &Grid, row: usize, col: usize) -> usize {
    let span = grid.item(row, col).map_or(1, |cell| cell.row_span);
    let rows = grid.row_count();
    for r in (row + span)..rows {
        let mut c = 0;
        while c < grid.column_count() {
            if tree.has_visible_item(grid, r, c) {
                return r;
            }
            c += grid.item(r, c).map_or(1, |cell| cell.col_span.max(1));
        }
    }
    rows
}

/// First column right of the item at `(row, col)` holding a visible item
/// in any row, or the column count.
fn next_column_with_item(tree: &WidgetTree, grid: &Grid, row: usize, col: usize) -> usize {
    let cols = grid.column_count();
    let mut c = col;
    loop {
        c += grid.item(row, c).map_or(1, |cell| cell.col_span.max(1));
        if c >= cols {
            return cols;
        }
        if (0..grid.row_count()).any(|r| tree.has_visible_item(grid, r, c)) {
            return c;
        }
    }
}

/// Wrap `element` in the centering table.
fn center_wrap(element: DomElement, fill_height: bool) -> DomElement {
    let mut table = DomElement::create_new(DomElementType::Table);
    table.set_property(Property::Class, "Wt-hcenter");
    let mut tr = DomElement::create_new(DomElementType::Tr);
    let mut td = DomElement::create_new(DomElementType::Td);
    if fill_height {
        table.set_property(Property::Style, "height:100%;");
        td.set_property(Property::Style, "height:100%;");
    }
    td.add_child(element);
    tr.add_child(td);
    table.add_child(tr);
    table
}
