//! Component tree - structure, invalidation, layout and the draw walk.
//!
//! The tree owns every node through a [`Registry`]; containers hold child
//! ids and each node keeps a non-owning parent id. Every structural change
//! goes through this type so the parent/child links always agree: after
//! `add_component(c, n)`, `parent(n) == Some(c)` and `contains(c, n)`; after
//! `remove_component(c, n)`, neither holds.
//!
//! # Invalidation
//!
//! `invalidate(n)` only marks `n` itself. Structural changes (attach,
//! detach, resize) mark the container and its direct children. `is_invalid`
//! is an OR over the subtree, so asking the root answers "does anything need
//! redrawing".
//!
//! # Example
//!
//! ```
//! use spark_panes::engine::{ComponentTree, Widget};
//! use spark_panes::layout::LinearLayout;
//! use spark_panes::Size;
//!
//! struct Label(&'static str);
//!
//! impl Widget for Label {
//!     fn preferred_size(&self) -> Size {
//!         Size::new(self.0.len() as u16, 1)
//!     }
//! }
//!
//! let mut tree = ComponentTree::new();
//! let column = tree.create_container(LinearLayout::vertical());
//! let label = tree.create_leaf(Label("hello"));
//! tree.add_component(column, label).unwrap();
//!
//! tree.layout(column, Size::new(20, 3)).unwrap();
//! assert_eq!(tree.size(label).unwrap(), Size::new(5, 1));
//! ```

use tracing::debug;

use crate::config::ThemeId;
use crate::error::{Error, Result};
use crate::layout::{LayoutChild, LayoutData, LayoutManager};
use crate::renderer::{SubSurface, Surface};
use crate::state::input::InputEvent;
use crate::state::lookup::SpatialLookupMap;
use crate::types::{Position, Rect, Size};

use super::node::{Decorator, DrawContext, Node, NodeKind, Plain, Widget};
use super::registry::{NodeId, Registry};

#[derive(Default)]
pub struct ComponentTree {
    nodes: Registry<Node>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Whether `id` refers to a live node.
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::StaleNode(id))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    pub fn create_leaf(&mut self, widget: impl Widget + 'static) -> NodeId {
        self.nodes.allocate(Node::new(NodeKind::Leaf(Box::new(widget))))
    }

    pub fn create_container(&mut self, layout: impl LayoutManager + 'static) -> NodeId {
        self.nodes.allocate(Node::new(NodeKind::Container {
            children: Vec::new(),
            layout: Box::new(layout),
            filter: None,
        }))
    }

    /// Composite with no decoration.
    pub fn create_composite(&mut self) -> NodeId {
        self.create_decorated(Plain)
    }

    pub fn create_decorated(&mut self, decorator: impl Decorator + 'static) -> NodeId {
        self.nodes.allocate(Node::new(NodeKind::Composite {
            child: None,
            decorator: Box::new(decorator),
        }))
    }

    /// Detach `id` from its parent and free it together with its subtree.
    /// Every freed id becomes stale.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.detach(id)?;

        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.release(current) {
                stack.extend_from_slice(node.kind.children());
                freed += 1;
            }
        }
        debug!(node = %id, freed, "destroyed subtree");
        Ok(())
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to a container. `None` is accepted and does nothing.
    pub fn add_component(
        &mut self,
        container: NodeId,
        child: impl Into<Option<NodeId>>,
    ) -> Result<()> {
        let len = match &self.node(container)?.kind {
            NodeKind::Container { children, .. } => children.len(),
            _ => return Err(Error::NotAContainer(container)),
        };
        let Some(child) = child.into() else {
            return Ok(());
        };
        let index = if self.contains(container, child) { len - 1 } else { len };
        self.insert_component(container, index, child)
    }

    /// Insert `child` at `index` in a container's child list. A child that
    /// already has a parent is detached from it first.
    pub fn insert_component(
        &mut self,
        container: NodeId,
        index: usize,
        child: impl Into<Option<NodeId>>,
    ) -> Result<()> {
        let len = match &self.node(container)?.kind {
            NodeKind::Container { children, .. } => children.len(),
            _ => return Err(Error::NotAContainer(container)),
        };
        let Some(child) = child.into() else {
            return Ok(());
        };
        self.node(child)?;
        if child == container || self.is_ancestor(child, container) {
            return Err(Error::CycleRejected { parent: container, child });
        }

        // Moving within the same container: the slot it leaves doesn't count
        let len = if self.contains(container, child) { len - 1 } else { len };
        if index > len {
            return Err(Error::ChildIndexOutOfRange { node: container, index, len });
        }

        self.detach(child)?;
        if let NodeKind::Container { children, .. } = &mut self.node_mut(container)?.kind {
            children.insert(index, child);
        }
        self.node_mut(child)?.parent = Some(container);
        self.invalidate_structure(container);
        debug!(%container, %child, index, "attached child");
        Ok(())
    }

    /// Detach `child` from `container`. Fails if `child` is not one of its
    /// children.
    pub fn remove_component(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        if !self.node(container)?.kind.children().contains(&child) {
            return Err(Error::NotAChild { container, child });
        }
        self.detach(child)
    }

    /// Detach every child of a container or composite, returning them in
    /// their former order.
    pub fn remove_all_components(&mut self, container: NodeId) -> Result<Vec<NodeId>> {
        let children = self.node(container)?.kind.children().to_vec();
        for &child in &children {
            self.detach(child)?;
        }
        Ok(children)
    }

    /// Put `child` into a composite, replacing what was there. Returns the
    /// previous child, now detached.
    pub fn set_component(
        &mut self,
        composite: NodeId,
        child: impl Into<Option<NodeId>>,
    ) -> Result<Option<NodeId>> {
        let current = match &self.node(composite)?.kind {
            NodeKind::Composite { child, .. } => *child,
            _ => return Err(Error::NotAComposite(composite)),
        };
        let child = child.into();
        if child.is_some() && child == current {
            return Ok(None);
        }

        if let Some(child) = child {
            self.node(child)?;
            if child == composite || self.is_ancestor(child, composite) {
                return Err(Error::CycleRejected { parent: composite, child });
            }
            self.detach(child)?;
        }
        if let Some(previous) = current {
            self.detach(previous)?;
        }
        if let Some(child) = child {
            if let NodeKind::Composite { child: slot, .. } = &mut self.node_mut(composite)?.kind {
                *slot = Some(child);
            }
            self.node_mut(child)?.parent = Some(composite);
            self.invalidate_structure(composite);
        }
        Ok(current)
    }

    /// Unlink `child` from whatever parent it has, invalidating that parent.
    fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(parent) = self.node(child)?.parent else {
            return Ok(());
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            match &mut node.kind {
                NodeKind::Container { children, .. } => children.retain(|c| *c != child),
                NodeKind::Composite { child: slot, .. } => {
                    if *slot == Some(child) {
                        *slot = None;
                    }
                }
                NodeKind::Leaf(_) => {}
            }
        }
        self.node_mut(child)?.parent = None;
        self.invalidate_structure(parent);
        debug!(%parent, %child, "detached child");
        Ok(())
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.kind.children())
    }

    pub fn child_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.children(id)?.len())
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Result<NodeId> {
        let children = self.children(id)?;
        children
            .get(index)
            .copied()
            .ok_or(Error::ChildIndexOutOfRange { node: id, index, len: children.len() })
    }

    /// Whether `child` is a direct child of `container`.
    pub fn contains(&self, container: NodeId, child: NodeId) -> bool {
        self.nodes
            .get(child)
            .is_some_and(|node| node.parent == Some(container))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Strict ancestry: a node is not its own ancestor.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Topmost ancestor of `id` (itself if detached).
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_leaf)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Position relative to the parent.
    pub fn position(&self, id: NodeId) -> Result<Position> {
        Ok(self.node(id)?.position)
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.position != position {
            node.position = position;
            node.invalid = true;
        }
        Ok(())
    }

    pub fn size(&self, id: NodeId) -> Result<Size> {
        Ok(self.node(id)?.size)
    }

    /// Resizing invalidates the node and its direct children.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.size != size {
            node.size = size;
            self.invalidate_structure(id);
        }
        Ok(())
    }

    /// Override (or with `None`, stop overriding) the computed preferred size.
    pub fn set_preferred_size(&mut self, id: NodeId, size: Option<Size>) -> Result<()> {
        self.node_mut(id)?.preferred_override = size;
        self.invalidate_parent_of(id);
        Ok(())
    }

    pub fn is_visible(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.visible)
    }

    /// Hidden nodes take no space and are skipped when drawing and when
    /// looking for focus candidates.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.visible != visible {
            node.visible = visible;
            node.invalid = true;
            self.invalidate_parent_of(id);
        }
        Ok(())
    }

    pub fn layout_data(&self, id: NodeId) -> Result<Option<&LayoutData>> {
        Ok(self.node(id)?.layout_data.as_ref())
    }

    pub fn set_layout_data(
        &mut self,
        id: NodeId,
        data: impl Into<Option<LayoutData>>,
    ) -> Result<()> {
        self.node_mut(id)?.layout_data = data.into();
        self.invalidate_parent_of(id);
        Ok(())
    }

    pub fn set_layout_manager(
        &mut self,
        container: NodeId,
        manager: impl LayoutManager + 'static,
    ) -> Result<()> {
        match &mut self.node_mut(container)?.kind {
            NodeKind::Container { layout, .. } => *layout = Box::new(manager),
            _ => return Err(Error::NotAContainer(container)),
        }
        self.invalidate_structure(container);
        Ok(())
    }

    /// Install a hook offered events that a focused descendant left
    /// unhandled. Replaces any previous filter.
    pub fn set_input_filter(
        &mut self,
        container: NodeId,
        filter: impl FnMut(&InputEvent) -> bool + 'static,
    ) -> Result<()> {
        match &mut self.node_mut(container)?.kind {
            NodeKind::Container { filter: slot, .. } => *slot = Some(Box::new(filter)),
            _ => return Err(Error::NotAContainer(container)),
        }
        Ok(())
    }

    pub fn clear_input_filter(&mut self, container: NodeId) -> Result<()> {
        match &mut self.node_mut(container)?.kind {
            NodeKind::Container { filter, .. } => *filter = None,
            _ => return Err(Error::NotAContainer(container)),
        }
        Ok(())
    }

    /// Run a container's input filter. `None` when it has none.
    pub(crate) fn run_input_filter(&mut self, container: NodeId, event: &InputEvent) -> Option<bool> {
        match &mut self.nodes.get_mut(container)?.kind {
            NodeKind::Container { filter: Some(filter), .. } => Some(filter(event)),
            _ => None,
        }
    }

    pub fn theme(&self, id: NodeId) -> Result<Option<&ThemeId>> {
        Ok(self.node(id)?.theme.as_ref())
    }

    pub fn set_theme(&mut self, id: NodeId, theme: Option<ThemeId>) -> Result<()> {
        let node = self.node_mut(id)?;
        node.theme = theme;
        node.invalid = true;
        Ok(())
    }

    /// Nearest theme override walking up from `id`, else `fallback`.
    pub fn resolve_theme(&self, id: NodeId, fallback: Option<&ThemeId>) -> Option<ThemeId> {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(id)) {
            if let Some(theme) = &node.theme {
                return Some(theme.clone());
            }
            current = node.parent;
        }
        fallback.cloned()
    }

    pub fn is_enabled(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.enabled)
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.enabled != enabled {
            node.enabled = enabled;
            node.invalid = true;
        }
        Ok(())
    }

    pub fn is_focusable(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.focusable)
    }

    /// Only leaves can hold focus; setting this on other nodes is stored but
    /// has no effect on focus.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) -> Result<()> {
        self.node_mut(id)?.focusable = focusable;
        Ok(())
    }

    /// Whether this node currently holds its pane's focus.
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.focused)
    }

    pub(crate) fn set_focused_mirror(&mut self, id: NodeId, focused: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.focused = focused;
            node.invalid = true;
        }
    }

    pub fn widget(&self, id: NodeId) -> Option<&dyn Widget> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Leaf(widget) => Some(widget.as_ref()),
            _ => None,
        }
    }

    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut (dyn Widget + 'static)> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Leaf(widget) => Some(widget.as_mut()),
            _ => None,
        }
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Mark `id` as needing a redraw. Idempotent; does not touch children.
    pub fn invalidate(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.invalid = true;
        Ok(())
    }

    /// Mark a node and its direct children.
    fn invalidate_structure(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.invalid = true;
        let children = node.kind.children().to_vec();
        for child in children {
            if let Some(child) = self.nodes.get_mut(child) {
                child.invalid = true;
            }
        }
    }

    fn invalidate_parent_of(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.invalidate_structure(parent);
        }
    }

    /// True if `id` or anything visible below it is invalid. Stale ids
    /// report false.
    pub fn is_invalid(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        node.invalid
            || node.kind.children().iter().any(|&child| {
                self.nodes.get(child).is_some_and(|n| n.visible) && self.is_invalid(child)
            })
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Map a position local to `id` into the coordinates of its root.
    pub fn to_global(&self, id: NodeId, local: Position) -> Result<Position> {
        let mut position = local.offset_by(self.node(id)?.position);
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let node = self.node(parent)?;
            position = position.offset_by(node.position);
            current = node.parent;
        }
        Ok(position)
    }

    /// Inverse of [`ComponentTree::to_global`]; `None` if `global` lies above
    /// or left of the node.
    pub fn from_global(&self, id: NodeId, global: Position) -> Result<Option<Position>> {
        let origin = self.to_global(id, Position::ORIGIN)?;
        Ok(global.relative_to(origin))
    }

    /// The node's rect in root coordinates.
    pub fn global_rect(&self, id: NodeId) -> Result<Rect> {
        Ok(Rect::new(self.to_global(id, Position::ORIGIN)?, self.node(id)?.size))
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Preferred size: the explicit override if set, else the widget's for
    /// leaves, the layout manager's over visible children for containers,
    /// and the decorated child's for composites.
    pub fn preferred_size(&self, id: NodeId) -> Result<Size> {
        self.node(id)?;
        Ok(self.measure(id))
    }

    fn measure(&self, id: NodeId) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        if let Some(size) = node.preferred_override {
            return size;
        }
        match &node.kind {
            NodeKind::Leaf(widget) => widget.preferred_size(),
            NodeKind::Container { children, layout, .. } => {
                let visible = self.visible_children(children);
                let preferred: Vec<Size> = visible.iter().map(|&c| self.measure(c)).collect();
                let layout_children = self.layout_children(&visible, &preferred);
                layout.preferred_size(&layout_children)
            }
            NodeKind::Composite { child, decorator } => {
                let content = child
                    .filter(|&c| self.nodes.get(c).is_some_and(|n| n.visible))
                    .map_or(Size::ZERO, |c| self.measure(c));
                decorator.wrap_size(content)
            }
        }
    }

    fn visible_children(&self, children: &[NodeId]) -> Vec<NodeId> {
        children
            .iter()
            .copied()
            .filter(|&c| self.nodes.get(c).is_some_and(|n| n.visible))
            .collect()
    }

    fn layout_children<'a>(&'a self, ids: &[NodeId], preferred: &[Size]) -> Vec<LayoutChild<'a>> {
        ids.iter()
            .zip(preferred)
            .filter_map(|(&id, &size)| {
                let node = self.nodes.get(id)?;
                let child = LayoutChild::new(size).with_current(node.rect());
                Some(match &node.layout_data {
                    Some(data) => child.with_data(data),
                    None => child,
                })
            })
            .collect()
    }

    /// Give `id` the size `size` and place its subtree. Invisible children
    /// end up at the origin with zero size.
    pub fn layout(&mut self, id: NodeId, size: Size) -> Result<()> {
        self.node(id)?;
        debug!(node = %id, %size, "layout pass");
        self.layout_node(id, size);
        Ok(())
    }

    fn layout_node(&mut self, id: NodeId, size: Size) {
        if self.set_size(id, size).is_err() {
            return;
        }

        let placements: Vec<(NodeId, Rect)> = {
            let Some(node) = self.nodes.get(id) else {
                return;
            };
            match &node.kind {
                NodeKind::Leaf(_) => return,
                NodeKind::Container { children, layout, .. } => {
                    let visible = self.visible_children(children);
                    let preferred: Vec<Size> = visible.iter().map(|&c| self.measure(c)).collect();
                    let rects = layout.place(size, &self.layout_children(&visible, &preferred));

                    let hidden = children.iter().filter(|c| !visible.contains(c));
                    visible
                        .iter()
                        .copied()
                        .zip(rects)
                        .chain(hidden.map(|&c| (c, Rect::EMPTY)))
                        .collect()
                }
                NodeKind::Composite { child: Some(child), decorator } => {
                    let visible = self.nodes.get(*child).is_some_and(|n| n.visible);
                    let area = Rect::new(Position::ORIGIN, size);
                    let content = decorator
                        .content_area(size)
                        .intersect(&area)
                        .filter(|_| visible)
                        .unwrap_or(Rect::EMPTY);
                    vec![(*child, content)]
                }
                NodeKind::Composite { child: None, .. } => return,
            }
        };

        for (child, rect) in placements {
            if self.set_position(child, rect.position).is_ok() {
                self.layout_node(child, rect.size);
            }
        }
    }

    // =========================================================================
    // Focus order
    // =========================================================================

    /// Visible nodes under `root` in pre-order. Hidden subtrees are skipped.
    fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            order.push(id);
            stack.extend(node.kind.children().iter().rev());
        }
        order
    }

    fn is_candidate(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.is_leaf() && n.enabled && n.focusable && n.visible)
    }

    /// Whether `id` could take focus in the pane rooted at `root`: a live,
    /// enabled, focusable leaf that is visible all the way up to `root`.
    pub fn is_focus_candidate(&self, root: NodeId, id: NodeId) -> bool {
        if !self.is_candidate(id) {
            return false;
        }
        let mut current = id;
        while current != root {
            match self.parent(current) {
                Some(parent) if self.nodes.get(parent).is_some_and(|n| n.visible) => {
                    current = parent
                }
                _ => return false,
            }
        }
        true
    }

    /// First focus candidate after `from` in pre-order, or the first one
    /// overall when `from` is `None` or not found. Does not wrap.
    pub fn next_focus(&self, root: NodeId, from: Option<NodeId>) -> Option<NodeId> {
        let order = self.preorder(root);
        let start = from
            .and_then(|from| order.iter().position(|&id| id == from))
            .map_or(0, |index| index + 1);
        order[start..].iter().copied().find(|&id| self.is_candidate(id))
    }

    /// Last focus candidate before `from` in pre-order, or the last one
    /// overall when `from` is `None` or not found. Does not wrap.
    pub fn previous_focus(&self, root: NodeId, from: Option<NodeId>) -> Option<NodeId> {
        let order = self.preorder(root);
        let end = from
            .and_then(|from| order.iter().position(|&id| id == from))
            .unwrap_or(order.len());
        order[..end].iter().rev().copied().find(|&id| self.is_candidate(id))
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw the visible subtree under `root` and register every enabled,
    /// focusable leaf in `map` at its clipped global rect.
    ///
    /// `root` is drawn at its own position on `surface`. Each node gets a
    /// sub-surface offset to its position and clipped to its parent; its
    /// invalid flag is cleared once its draw call returns.
    pub fn draw(
        &mut self,
        root: NodeId,
        surface: &mut dyn Surface,
        map: &mut SpatialLookupMap,
        fallback_theme: Option<&ThemeId>,
    ) -> Result<()> {
        let node = self.node(root)?;
        if !node.visible {
            return Ok(());
        }
        let rect = node.rect();
        let clip = Rect::new(Position::ORIGIN, surface.size()).intersect(&rect);
        let mut sub = SubSurface::new(surface, rect);
        self.draw_node(root, &mut sub, rect.position, clip, map, fallback_theme);
        Ok(())
    }

    fn draw_node(
        &mut self,
        id: NodeId,
        surface: &mut dyn Surface,
        origin: Position,
        clip: Option<Rect>,
        map: &mut SpatialLookupMap,
        fallback_theme: Option<&ThemeId>,
    ) {
        let theme = self.resolve_theme(id, fallback_theme);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let ctx = DrawContext {
            focused: node.focused,
            enabled: node.enabled,
            theme,
        };

        match &mut node.kind {
            NodeKind::Leaf(widget) => widget.draw(surface, &ctx),
            NodeKind::Composite { decorator, .. } => decorator.draw(surface, &ctx),
            NodeKind::Container { .. } => {}
        }
        node.invalid = false;

        if node.is_leaf() && node.enabled && node.focusable {
            if let Some(area) = clip {
                map.register(id, area);
            }
        }

        let children = node.kind.children().to_vec();
        for child in children {
            let Some(rect) = self.nodes.get(child).filter(|n| n.visible).map(Node::rect) else {
                continue;
            };
            let global = Rect::new(origin.offset_by(rect.position), rect.size);
            let child_clip = clip.and_then(|clip| clip.intersect(&global));
            let mut sub = SubSurface::new(surface, rect);
            self.draw_node(child, &mut sub, global.position, child_clip, map, fallback_theme);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
