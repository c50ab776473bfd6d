// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! Retained view handles.
//!
//! These types stand in for the host GUI toolkit's view objects: a [`View`] is
//! a cheap-to-clone handle to a retained node with visibility, optional text,
//! an optional click handler, and child views. Everything is single-threaded;
//! shared ownership goes through `Rc`, and anything that must not keep a view
//! alive holds a [`WeakView`].

use std::cell::RefCell;
use std::num::NonZeroU64;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier of a view node.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct ViewId(NonZeroU64);

impl ViewId {
    /// Allocate a new unique id.
    pub fn next() -> Self {
        static VIEW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = VIEW_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).unwrap())
    }
}

/// Whether a view takes part in display.
///
/// A `Hidden` view is skipped entirely, as if it were not in the tree.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Visibility {
    /// The view is displayed.
    Visible,
    /// The view is not displayed and takes up no space.
    Hidden,
}

/// Marker naming a node's role within a template, so that code customizing an
/// inflated view tree can locate the nodes it cares about.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct SlotId(pub &'static str);

/// A click callback attached to a view.
pub type ClickHandler = Rc<dyn Fn()>;

/// How a view is sized along one axis.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sizing {
    /// Fill the parent.
    Fill,
    /// Wrap the view's own content.
    Wrap,
    /// A fixed size in display units.
    Fixed(u32),
}

/// Per-child layout parameters, as supplied when a child is attached.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LayoutParams {
    /// Horizontal sizing.
    pub width: Sizing,
    /// Vertical sizing.
    pub height: Sizing,
}

impl LayoutParams {
    /// Fill the parent along both axes. The default for a bare child.
    pub const FILL: Self = Self {
        width: Sizing::Fill,
        height: Sizing::Fill,
    };

    /// Wrap content along both axes.
    pub const WRAP: Self = Self {
        width: Sizing::Wrap,
        height: Sizing::Wrap,
    };

    /// Fixed size along both axes.
    pub fn fixed(width: u32, height: u32) -> Self {
        Self {
            width: Sizing::Fixed(width),
            height: Sizing::Fixed(height),
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::FILL
    }
}

struct ViewNode {
    id: ViewId,
    slot: Option<SlotId>,
    visibility: Visibility,
    text: Option<String>,
    on_click: Option<ClickHandler>,
    layout: LayoutParams,
    children: Vec<View>,
}

/// A handle to a retained view node.
///
/// Cloning a `View` clones the handle, not the node: all clones refer to the
/// same node, and [`same`] tells two handles to one node apart from handles to
/// two equal-looking nodes.
///
/// [`same`]: View::same
#[derive(Clone)]
pub struct View {
    node: Rc<RefCell<ViewNode>>,
}

impl View {
    /// Create a new visible view with no children.
    pub fn new() -> Self {
        Self {
            node: Rc::new(RefCell::new(ViewNode {
                id: ViewId::next(),
                slot: None,
                visibility: Visibility::Visible,
                text: None,
                on_click: None,
                layout: LayoutParams::default(),
                children: Vec::new(),
            })),
        }
    }

    /// Create a new visible view carrying the given text.
    pub fn label(text: impl Into<String>) -> Self {
        let view = Self::new();
        view.set_text(text);
        view
    }

    /// Builder-style method to mark this view as filling the given slot.
    pub fn with_slot(self, slot: SlotId) -> Self {
        self.node.borrow_mut().slot = Some(slot);
        self
    }

    /// Builder-style method to append a child view.
    pub fn with_child(self, child: Self) -> Self {
        self.add_child(child);
        self
    }

    /// Builder-style method to set layout parameters.
    pub fn with_layout(self, layout: LayoutParams) -> Self {
        self.node.borrow_mut().layout = layout;
        self
    }

    /// This view's unique id.
    pub fn id(&self) -> ViewId {
        self.node.borrow().id
    }

    /// The slot this view fills within its template, if any.
    pub fn slot(&self) -> Option<SlotId> {
        self.node.borrow().slot
    }

    /// Whether two handles refer to the same node.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// A non-owning handle to this node.
    pub fn downgrade(&self) -> WeakView {
        WeakView {
            node: Rc::downgrade(&self.node),
        }
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.node.borrow().visibility
    }

    /// Shorthand for `visibility() == Visibility::Visible`.
    pub fn is_visible(&self) -> bool {
        self.visibility() == Visibility::Visible
    }

    /// Set this view's visibility.
    pub fn set_visibility(&self, visibility: Visibility) {
        self.node.borrow_mut().visibility = visibility;
    }

    /// This view's text, if it carries any.
    pub fn text(&self) -> Option<String> {
        self.node.borrow().text.clone()
    }

    /// Set this view's text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.node.borrow_mut().text = Some(text.into());
    }

    /// Install or clear the click handler.
    pub fn set_on_click(&self, handler: Option<ClickHandler>) {
        self.node.borrow_mut().on_click = handler;
    }

    /// Dispatch a click to this view's handler, if one is installed.
    pub fn click(&self) {
        // Drop the borrow before running the handler; it may re-enter the view.
        let handler = self.node.borrow().on_click.clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    /// This view's layout parameters.
    pub fn layout_params(&self) -> LayoutParams {
        self.node.borrow().layout
    }

    /// Set this view's layout parameters.
    pub fn set_layout_params(&self, layout: LayoutParams) {
        self.node.borrow_mut().layout = layout;
    }

    /// Append a child view.
    pub fn add_child(&self, child: Self) {
        self.node.borrow_mut().children.push(child);
    }

    /// Insert a child view at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is larger than the current child count.
    pub fn add_child_at(&self, index: usize, child: Self) {
        self.node.borrow_mut().children.insert(index, child);
    }

    /// Handles to this view's children, in order.
    pub fn children(&self) -> Vec<Self> {
        self.node.borrow().children.clone()
    }

    /// The number of direct children.
    pub fn child_count(&self) -> usize {
        self.node.borrow().children.len()
    }

    /// Whether the given view is already a direct child of this one.
    pub fn has_child(&self, child: &Self) -> bool {
        self.node.borrow().children.iter().any(|c| c.same(child))
    }

    /// Depth-first search for the view filling the given slot, starting at
    /// this view itself.
    pub fn find_slot(&self, slot: SlotId) -> Option<Self> {
        if self.node.borrow().slot == Some(slot) {
            return Some(self.clone());
        }
        let children = self.children();
        for child in children {
            if let Some(found) = child.find_slot(slot) {
                return Some(found);
            }
        }
        None
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("View")
            .field("id", &node.id)
            .field("slot", &node.slot)
            .field("visibility", &node.visibility)
            .field("text", &node.text)
            .field("children", &node.children.len())
            .finish()
    }
}

/// A non-owning handle to a view node.
///
/// Deferred work that targets a view must hold one of these rather than a
/// [`View`], so a queued task can never extend the life of a torn-down tree.
#[derive(Clone)]
pub struct WeakView {
    node: Weak<RefCell<ViewNode>>,
}

impl WeakView {
    /// Attempt to recover a strong handle. Returns `None` if the node is gone.
    pub fn upgrade(&self) -> Option<View> {
        self.node.upgrade().map(|node| View { node })
    }
}

impl std::fmt::Debug for WeakView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakView")
            .field("alive", &(self.node.strong_count() > 0))
            .finish()
    }
}
