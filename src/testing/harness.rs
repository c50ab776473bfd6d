// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! A headless environment to test the container in.

use crate::core::attributes::Attributes;
use crate::core::context::UiContext;
use crate::core::queue::UiQueue;
use crate::core::view::View;
use crate::tracing_backend::try_init_test_tracing;
use crate::widgets::StateContainer;

/// A headless environment to exercise a [`StateContainer`] in.
///
/// The harness owns a [`UiContext`], a [`UiQueue`], and an activated
/// container, playing the roles the host GUI environment normally would. The
/// basic workflow:
///
/// - Create a harness, attach a content view.
/// - Drive transitions through [`container_mut`](Self::container_mut).
/// - Drain the queue, as the host's UI thread would between passes.
/// - Check the visibility of the views involved.
pub struct TestHarness {
    ctx: UiContext,
    queue: UiQueue,
    container: StateContainer,
}

impl TestHarness {
    /// Build a harness with a default-configured container.
    pub fn create() -> Self {
        Self::create_with_attrs(Attributes::new())
    }

    /// Build a harness with the given construction attributes.
    pub fn create_with_attrs(attrs: Attributes) -> Self {
        Self::create_with_context(UiContext::new(), attrs)
    }

    /// Build a harness around an existing context, for tests that register
    /// their own templates or string resources first.
    pub fn create_with_context(ctx: UiContext, attrs: Attributes) -> Self {
        let _ = try_init_test_tracing();
        let queue = UiQueue::new();
        let mut container = StateContainer::new(&ctx, Some(&attrs), None);
        container.activate(&queue);
        Self {
            ctx,
            queue,
            container,
        }
    }

    /// The host context.
    pub fn context(&self) -> &UiContext {
        &self.ctx
    }

    /// The queue the container is activated against.
    pub fn queue(&self) -> &UiQueue {
        &self.queue
    }

    /// The container under test.
    pub fn container(&self) -> &StateContainer {
        &self.container
    }

    /// Mutable access to the container under test.
    pub fn container_mut(&mut self) -> &mut StateContainer {
        &mut self.container
    }

    /// Attach a fresh content view and return a handle to it.
    pub fn attach_content(&mut self) -> View {
        let content = View::label("content");
        self.container.set_content_view(content.clone());
        content
    }

    /// Run deferred tasks until the queue is idle, as the host UI thread
    /// would between passes. Returns how many tasks ran.
    pub fn drain_queue(&self) -> usize {
        self.queue.run_until_idle()
    }

    /// Re-activate the container against the harness queue after a
    /// [`deactivate`](StateContainer::deactivate).
    pub fn reactivate(&mut self) {
        self.container.activate(&self.queue);
    }

    /// The frame children that are currently visible.
    pub fn visible_children(&self) -> Vec<View> {
        self.container
            .view()
            .children()
            .into_iter()
            .filter(|child| child.is_visible())
            .collect()
    }
}

impl std::fmt::Debug for TestHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHarness")
            .field("container", &self.container)
            .field("pending_tasks", &self.queue.pending())
            .finish()
    }
}
