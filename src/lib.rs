// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! A container view that wraps a single "content" child and hides or shows it
//! based on the current display state.
//!
//! Most screens that load data repeat the same plumbing in one screen region:
//! show a spinner while a request is in flight, an error view with a
//! tap-to-retry affordance when it fails, an empty-state message when it
//! succeeds with nothing to show, and the real content otherwise.
//! [`StateContainer`] owns that plumbing. The host supplies exactly one
//! content view; the container lazily builds and caches a view for each other
//! state from configurable templates, and guarantees that at most one of them
//! is visible at a time.
//!
//! When the state changes, the incoming view is shown synchronously but the
//! outgoing view is hidden on the *next* turn of the UI queue, so a swap never
//! produces a pass in which both views are gone. The container's
//! configuration and current state survive a host save/restore cycle as an
//! opaque snapshot; the cached views themselves are always rebuilt from
//! templates on demand.
//!
//! The crate is not tied to a particular renderer: the [`core`] module
//! provides the small retained-view layer ([`View`], [`UiQueue`],
//! [`UiContext`]) the container is written against, and a host embeds the
//! container by attaching its [`StateContainer::view`] frame and draining the
//! queue it activates the container with.
//!
//! # Example
//!
//! ```
//! use multistate::{ContentState, StateContainer, UiContext, UiQueue, View};
//!
//! let ctx = UiContext::new();
//! let queue = UiQueue::new();
//!
//! let mut container = StateContainer::new(&ctx, None, None);
//! container.activate(&queue);
//!
//! let content = View::label("Inbox");
//! container.set_content_view(content.clone());
//!
//! container.set_state(ContentState::Loading);
//! queue.run_until_idle();
//! assert!(!content.is_visible());
//!
//! container.set_state(ContentState::Content);
//! queue.run_until_idle();
//! assert!(content.is_visible());
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod util;

mod tracing_backend;

pub mod core;
pub mod templates;
pub mod testing;
pub mod widgets;

pub use crate::core::attributes::Attributes;
pub use crate::core::context::{StringRes, TemplateFn, TemplateId, UiContext};
pub use crate::core::instance_state::SavedState;
pub use crate::core::queue::{TaskId, UiQueue};
pub use crate::core::view::{
    ClickHandler, LayoutParams, Sizing, SlotId, View, ViewId, Visibility, WeakView,
};
pub use crate::tracing_backend::try_init_tracing;
pub use crate::widgets::{
    ContainerConfig, ContentState, StateContainer, StateTag, StateViewProvider,
};
