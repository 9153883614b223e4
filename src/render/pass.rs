//! The render pass: turns pending changes in a widget tree into one batch.
//!
//! The pass walks the tree in pre-order so that every instruction can refer
//! to elements created earlier in the same batch. A widget the client has
//! never seen is created together with its whole subtree; a widget flagged
//! for full re-render is replaced; any other dirty widget gets an update
//! carrying only what its flags imply. Everything emitted moves to the
//! rendering state until the batch is acknowledged or reported lost.

use crate::dom::{DomElement, Instruction, Property, RenderBatch};
use crate::widget::{DirtyFlags, WidgetId, WidgetNode, WidgetTree};

use super::context::RenderContext;

/// DOM id of the element the root widget is created in.
pub const ROOT_PARENT: &str = "body";

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Runs render passes over a [`WidgetTree`].
#[derive(Debug, Default)]
pub struct Renderer {
    passes: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes that produced a batch.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Collect every pending change into one batch.
    ///
    /// The repaint queue only decides whether a pass runs: a pass walks
    /// the whole tree from the root and each widget's own state decides
    /// what it emits. With nothing scheduled the batch is empty and no
    /// widget changes state. A previous batch still waiting for
    /// acknowledgment is considered delivered.
    pub fn render(&mut self, tree: &mut WidgetTree, ctx: &RenderContext) -> RenderBatch {
        let mut batch = RenderBatch::new();
        if !tree.needs_render() {
            return batch;
        }
        if !tree.in_flight.is_empty() {
            tracing::warn!("previous batch was never acknowledged, assuming it was delivered");
            tree.propagate_render_ok(&batch);
        }

        let drained = tree.repaint.drain();
        for id in drained.removals {
            tree.in_flight.removals.push(id.clone());
            batch.push(Instruction::Remove { id });
        }

        if let Some(root) = tree.root() {
            tree.render_widget(root, ctx, &mut batch.instructions);
        }

        self.passes += 1;
        tracing::debug!(
            pass = self.passes,
            scheduled = drained.scheduled.len(),
            instructions = batch.len(),
            "render pass"
        );
        batch
    }
}

// ---------------------------------------------------------------------------
// Tree walk
// ---------------------------------------------------------------------------

impl WidgetTree {
    fn render_widget(&mut self, id: WidgetId, ctx: &RenderContext, out: &mut Vec<Instruction>) {
        let Some(node) = self.nodes.get(id) else { return };

        if !node.rendered {
            let parent = match self.parent(id) {
                Some(p) => self.nodes.get(p).map_or_else(String::new, |n| n.dom_id.clone()),
                None => ROOT_PARENT.to_owned(),
            };
            let before = self.next_rendered_sibling(id);
            let mut after = Vec::new();
            if let Some(element) = self.create_widget_element(id, ctx, &mut after) {
                out.push(Instruction::Create { parent, before, element });
            }
            out.append(&mut after);
            return;
        }

        if node.full_rerender {
            let dom_id = node.dom_id.clone();
            let mut after = Vec::new();
            if let Some(element) = self.create_widget_element(id, ctx, &mut after) {
                out.push(Instruction::Replace { id: dom_id, element });
            }
            out.append(&mut after);
            return;
        }

        if let Some(element) = self.update_widget_element(id) {
            if !element.is_empty_update() {
                out.push(Instruction::Update { element });
            }
        }

        let layout = self.nodes.get(id).and_then(|n| n.layout);
        if let Some(layout) = layout {
            if self.layouts.get(layout).is_some_and(|l| l.renderer.rendered) {
                self.update_layout_dom(layout, ctx, out);
            }
        }

        for child in self.children(id).to_vec() {
            if self.defers_child(id, child) {
                continue;
            }
            // New layout items are created by their layout's update.
            let managed = self
                .nodes
                .get(child)
                .is_some_and(|n| n.in_layout.is_some() && !n.rendered);
            if managed {
                continue;
            }
            self.render_widget(child, ctx, out);
        }
    }

    /// The first sibling after `id` that already exists on the client.
    fn next_rendered_sibling(&self, id: WidgetId) -> Option<String> {
        let parent = self.parent(id)?;
        self.children(parent)
            .iter()
            .skip_while(|&&sibling| sibling != id)
            .skip(1)
            .filter_map(|&sibling| self.nodes.get(sibling))
            .find(|n| n.rendered)
            .map(|n| n.dom_id.clone())
    }

    /// Full element for `id` and its subtree. Every widget included moves
    /// to the rendering state; layout registrations go to `after`.
    pub(crate) fn create_widget_element(
        &mut self,
        id: WidgetId,
        ctx: &RenderContext,
        after: &mut Vec<Instruction>,
    ) -> Option<DomElement> {
        let node = self.nodes.get_mut(id)?;
        node.state.begin_full_render();
        let mut element = DomElement::create_new(node.kind.dom_type()).with_id(node.dom_id.clone());
        apply_common(node, &mut element, DirtyFlags::all(), true);
        node.kind.update_dom(&mut element, DirtyFlags::all(), true);
        let layout = node.layout;
        self.in_flight.widgets.push(id);

        if let Some(layout) = layout {
            if let Some(child) = self.create_layout_element(layout, true, true, ctx, after) {
                element.add_child(child);
            }
        } else {
            for child in self.children(id).to_vec() {
                if self.defers_child(id, child) {
                    continue;
                }
                if let Some(child) = self.create_widget_element(child, ctx, after) {
                    element.add_child(child);
                }
            }
        }
        Some(element)
    }

    /// Incremental update for a dirty widget, or `None` when it is clean.
    fn update_widget_element(&mut self, id: WidgetId) -> Option<DomElement> {
        let node = self.nodes.get_mut(id)?;
        let flags = node.state.begin_render()?;
        let mut element = DomElement::get_for_update(node.dom_id.clone(), node.kind.dom_type());
        apply_common(node, &mut element, flags, false);
        node.kind.update_dom(&mut element, flags, false);
        self.in_flight.widgets.push(id);
        Some(element)
    }
}

/// Fields every widget carries regardless of its kind.
fn apply_common(node: &WidgetNode, element: &mut DomElement, flags: DirtyFlags, all: bool) {
    if all || flags.contains(DirtyFlags::VISIBILITY) {
        if node.hidden {
            element.set_property(Property::StyleDisplay, "none");
        } else if !all {
            element.set_property(Property::StyleDisplay, "");
        }
    }

    if all || flags.contains(DirtyFlags::STYLE) {
        if !all || !node.style_class.is_empty() {
            element.set_property(Property::Class, node.style_class.clone());
        }
        let sizes = [
            (Property::StyleWidth, node.width),
            (Property::StyleHeight, node.height),
            (Property::StyleMinWidth, node.min_width),
            (Property::StyleMinHeight, node.min_height),
        ];
        for (property, length) in sizes {
            match length.css_text() {
                Some(css) => element.set_property(property, css),
                None if !all => element.set_property(property, ""),
                None => {}
            }
        }
    }

    if all || flags.contains(DirtyFlags::ATTRIBUTES) {
        for (name, value) in &node.attributes {
            element.set_attribute(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementMode;
    use crate::geometry::Length;
    use crate::widgets::{Button, Container, Text};
    use pretty_assertions::assert_eq;

    fn rendered_tree() -> (WidgetTree, Renderer, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let mut renderer = Renderer::new();
        let root = tree.create(Container::new());
        let label = tree.create(Text::new("hello"));
        tree.set_root(root).unwrap();
        tree.add_child(root, label).unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        tree.propagate_render_ok(&batch);
        (tree, renderer, root, label)
    }

    #[test]
    fn first_pass_creates_the_whole_tree_once() {
        let mut tree = WidgetTree::new();
        let root = tree.create(Container::new());
        let label = tree.create(Text::new("hello"));
        tree.set_root(root).unwrap();
        tree.add_child(root, label).unwrap();

        let batch = Renderer::new().render(&mut tree, &RenderContext::default());
        assert_eq!(batch.len(), 1);
        let Instruction::Create { parent, before, element } = &batch.instructions[0] else {
            panic!("expected a create instruction");
        };
        assert_eq!(parent, ROOT_PARENT);
        assert_eq!(before, &None);
        assert_eq!(element.to_html(), r#"<div id="w1"><span id="w2">hello</span></div>"#);
        assert!(tree.get(label).unwrap().state().is_rendering());
    }

    #[test]
    fn clean_tree_renders_nothing() {
        let (mut tree, mut renderer, root, label) = rendered_tree();
        assert!(tree.get(label).unwrap().state().is_clean());
        let batch = renderer.render(&mut tree, &RenderContext::default());
        assert!(batch.is_empty());
        assert!(tree.get(root).unwrap().state().is_clean());
        assert_eq!(renderer.passes(), 1);
    }

    #[test]
    fn update_carries_only_flagged_fields() {
        let (mut tree, mut renderer, _root, label) = rendered_tree();
        tree.set_text(label, "bye").unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        let Instruction::Update { element } = &batch.instructions[0] else {
            panic!("expected an update");
        };
        assert_eq!(element.mode, ElementMode::Update);
        assert_eq!(element.property(Property::InnerHtml), "bye");
        assert!(!element.has_property(Property::StyleDisplay));
        assert!(!element.has_property(Property::Class));
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn style_update_resets_auto_sizes() {
        let (mut tree, mut renderer, _root, label) = rendered_tree();
        tree.resize(label, Length::px(80.0), Length::Auto).unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        let Instruction::Update { element } = &batch.instructions[0] else {
            panic!("expected an update");
        };
        assert_eq!(element.property(Property::StyleWidth), "80px");
        assert!(element.has_property(Property::StyleHeight));
        assert_eq!(element.property(Property::StyleHeight), "");
    }

    #[test]
    fn new_child_is_created_before_rendered_sibling() {
        let (mut tree, mut renderer, root, _label) = rendered_tree();
        let first = tree.create(Button::new("first"));
        tree.insert_child(root, 0, first).unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        assert_eq!(batch.len(), 1);
        let Instruction::Create { parent, before, .. } = &batch.instructions[0] else {
            panic!("expected a create instruction");
        };
        assert_eq!(parent, "w1");
        assert_eq!(before.as_deref(), Some("w2"));
    }

    #[test]
    fn full_rerender_replaces() {
        let (mut tree, mut renderer, root, _label) = rendered_tree();
        tree.mark_full_rerender(root).unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        assert!(matches!(&batch.instructions[0], Instruction::Replace { id, .. } if id == "w1"));
        tree.propagate_render_ok(&batch);
        assert!(!tree.get(root).unwrap().needs_full_rerender());
    }

    #[test]
    fn removal_precedes_other_instructions() {
        let (mut tree, mut renderer, root, label) = rendered_tree();
        tree.remove(label).unwrap();
        tree.set_style_class(root, "main").unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        assert_eq!(batch.instructions[0], Instruction::Remove { id: "w2".into() });
        assert!(matches!(&batch.instructions[1], Instruction::Update { .. }));
    }

    #[test]
    fn failed_batch_is_sent_again() {
        let (mut tree, mut renderer, _root, label) = rendered_tree();
        tree.set_text(label, "again").unwrap();
        let first = renderer.render(&mut tree, &RenderContext::default());
        tree.render_failed();
        let second = renderer.render(&mut tree, &RenderContext::default());
        assert_eq!(first, second);
    }

    #[test]
    fn mutation_during_flight_survives_acknowledgment() {
        let (mut tree, mut renderer, _root, label) = rendered_tree();
        tree.set_text(label, "one").unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        tree.set_text(label, "two").unwrap();
        tree.propagate_render_ok(&batch);
        assert!(tree.get(label).unwrap().state().is_dirty());
        let next = renderer.render(&mut tree, &RenderContext::default());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn lost_batch_is_resent_after_mutation_during_flight() {
        let (mut tree, mut renderer, _root, label) = rendered_tree();
        tree.set_text(label, "changed").unwrap();
        renderer.render(&mut tree, &RenderContext::default());
        tree.set_hidden(label, true).unwrap();
        tree.render_failed();

        let batch = renderer.render(&mut tree, &RenderContext::default());
        let Instruction::Update { element } = &batch.instructions[0] else {
            panic!("expected an update");
        };
        assert_eq!(element.property(Property::InnerHtml), "changed");
        assert_eq!(element.property(Property::StyleDisplay), "none");
    }

    #[test]
    fn detached_widgets_are_not_rendered() {
        let (mut tree, mut renderer, ..) = rendered_tree();
        let loose = tree.create(Text::new("loose"));
        tree.set_text(loose, "still loose").unwrap();
        let batch = renderer.render(&mut tree, &RenderContext::default());
        assert!(batch.is_empty());
        assert!(tree.get(loose).unwrap().state().is_dirty());
    }
}
