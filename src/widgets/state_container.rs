// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! A container that wraps one content view and swaps between display states.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::attributes::Attributes;
use crate::core::context::{StringRes, TemplateId, UiContext};
use crate::core::instance_state::SavedState;
use crate::core::queue::{TaskId, UiQueue};
use crate::core::view::{ClickHandler, LayoutParams, View, Visibility};
use crate::templates;
use crate::util::debug_panic;
use crate::widgets::content_state::{ContentState, StateTag};

const DEFAULT_NETWORK_ERROR_TITLE: &str = "Unable to connect to the network";
const DEFAULT_GENERAL_ERROR_TITLE: &str = "An unknown error occurred";
const DEFAULT_TAP_TO_RETRY: &str = "Tap to retry";
const DEFAULT_EMPTY_MESSAGE: &str = "No content to display";

/// The container's configuration: templates, display strings, and the current
/// state tag.
///
/// This record is resolved once at construction and mutated by the setters on
/// [`StateContainer`]. It is also the unit of save/restore: the whole record
/// serializes into the container's instance-state payload, with the state tag
/// encoded as a raw integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    custom_error: Option<String>,
    loading_template: TemplateId,
    general_error_template: TemplateId,
    network_error_template: TemplateId,
    empty_template: TemplateId,
    network_error_title: String,
    general_error_title: String,
    tap_to_retry: String,
    empty_message: String,
    state: StateTag,
}

impl ContainerConfig {
    /// The custom error override string, if set.
    pub fn custom_error(&self) -> Option<&str> {
        self.custom_error.as_deref()
    }

    /// Template inflated for the loading state.
    pub fn loading_template(&self) -> TemplateId {
        self.loading_template
    }

    /// Template inflated for the general-error state.
    pub fn general_error_template(&self) -> TemplateId {
        self.general_error_template
    }

    /// Template inflated for the network-error state.
    pub fn network_error_template(&self) -> TemplateId {
        self.network_error_template
    }

    /// Template inflated for the empty state.
    pub fn empty_template(&self) -> TemplateId {
        self.empty_template
    }

    /// Title shown in the network-error state.
    pub fn network_error_title(&self) -> &str {
        &self.network_error_title
    }

    /// Title shown in the general-error state, before any custom override.
    pub fn general_error_title(&self) -> &str {
        &self.general_error_title
    }

    /// Label shown on the tap-to-retry element of both error states.
    pub fn tap_to_retry(&self) -> &str {
        &self.tap_to_retry
    }

    /// Message shown in the empty state.
    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    /// The general-error title actually displayed: the custom override when
    /// one is set, the general-error title otherwise.
    pub fn display_error_title(&self) -> &str {
        self.custom_error
            .as_deref()
            .unwrap_or(&self.general_error_title)
    }

    /// The current state tag.
    pub fn state(&self) -> StateTag {
        self.state
    }
}

/// Custom view construction for a state tag.
///
/// Registering a provider lets a host add states beyond [`ContentState`], or
/// replace the built-in construction for one of them, without the container
/// knowing anything about the new state beyond its tag. The provider is
/// consulted in preference to the built-in template path.
pub trait StateViewProvider {
    /// Build the view for this state. Called at most once per container; the
    /// result is cached like any other state view.
    fn build_view(&self, ctx: &UiContext) -> View;

    /// Called each time the view is about to become visible.
    fn prepare_view(&self, view: &View, config: &ContainerConfig) {
        let _ = (view, config);
    }
}

/// A container view that wraps a single "content" child and hides or shows it
/// based on the current display state.
///
/// A screen region that loads data typically cycles between a spinner, an
/// error view, and the real content. `StateContainer` owns that cycle: the
/// host supplies exactly one content view, and the container lazily builds,
/// caches, and toggles the auxiliary views for the other states
/// ([`ContentState::Loading`], [`ContentState::NetworkError`],
/// [`ContentState::GeneralError`], [`ContentState::Empty`]).
///
/// At most one state view is visible at a time. When the state changes, the
/// incoming view is shown synchronously but the outgoing view is hidden on the
/// next turn of the bound [`UiQueue`], so the swap never produces a frame in
/// which both views are gone. A transition requested before any content view
/// is attached is ignored; the container has nothing to show yet.
///
/// Auxiliary views are built once, from the configured templates, and reused
/// for the container's whole life. Strings are resolved at construction from
/// the attribute bag, the style defaults, the context's string resources, and
/// literal fallbacks, in that order; plain setters only affect views built
/// afterwards.
pub struct StateContainer {
    ctx: UiContext,
    frame: View,
    config: ContainerConfig,
    content: Option<View>,
    state_views: HashMap<StateTag, View>,
    providers: HashMap<StateTag, Box<dyn StateViewProvider>>,
    retry_handler: Option<ClickHandler>,
    queue: Option<UiQueue>,
    pending_hides: SmallVec<[(StateTag, TaskId); 2]>,
}

// --- MARK: CONSTRUCTION
impl StateContainer {
    /// Create a container from the host context, an optional attribute bag,
    /// and optional style defaults.
    ///
    /// The configuration is fully resolved here: for each option the attribute
    /// bag wins, then the style defaults, then (for strings) the context's
    /// string resources, then the library's own fallbacks. The initial state
    /// defaults to [`ContentState::Content`].
    pub fn new(ctx: &UiContext, attrs: Option<&Attributes>, style: Option<&Attributes>) -> Self {
        let template = |pick: fn(&Attributes) -> Option<TemplateId>, fallback: TemplateId| {
            attrs
                .and_then(pick)
                .or_else(|| style.and_then(pick))
                .unwrap_or(fallback)
        };
        let string = |pick: fn(&Attributes) -> Option<&String>, res: StringRes, fallback: &str| {
            attrs
                .and_then(pick)
                .or_else(|| style.and_then(pick))
                .cloned()
                .or_else(|| ctx.string(res))
                .unwrap_or_else(|| fallback.to_owned())
        };

        let config = ContainerConfig {
            custom_error: None,
            loading_template: template(|a| a.loading_template, templates::LOADING),
            general_error_template: template(|a| a.general_error_template, templates::GENERAL_ERROR),
            network_error_template: template(|a| a.network_error_template, templates::NETWORK_ERROR),
            empty_template: template(|a| a.empty_template, templates::EMPTY),
            network_error_title: string(
                |a| a.network_error_title.as_ref(),
                StringRes::NetworkErrorTitle,
                DEFAULT_NETWORK_ERROR_TITLE,
            ),
            general_error_title: string(
                |a| a.general_error_title.as_ref(),
                StringRes::GeneralErrorTitle,
                DEFAULT_GENERAL_ERROR_TITLE,
            ),
            tap_to_retry: string(
                |a| a.tap_to_retry.as_ref(),
                StringRes::TapToRetry,
                DEFAULT_TAP_TO_RETRY,
            ),
            empty_message: string(
                |a| a.empty_message.as_ref(),
                StringRes::EmptyMessage,
                DEFAULT_EMPTY_MESSAGE,
            ),
            state: attrs
                .and_then(|a| a.initial_state)
                .or_else(|| style.and_then(|s| s.initial_state))
                .map(StateTag)
                .unwrap_or(ContentState::Content.tag()),
        };

        Self {
            ctx: ctx.clone(),
            frame: View::new(),
            config,
            content: None,
            state_views: HashMap::new(),
            providers: HashMap::new(),
            retry_handler: None,
            queue: None,
            pending_hides: SmallVec::new(),
        }
    }

    /// The container's root frame view, which the host attaches into its own
    /// hierarchy. Content and auxiliary views become children of this frame.
    pub fn view(&self) -> View {
        self.frame.clone()
    }
}

// --- MARK: STATE
impl StateContainer {
    /// The current state tag. Never unset; defaults to
    /// [`ContentState::Content`]'s tag.
    pub fn state(&self) -> StateTag {
        self.config.state
    }

    /// Transition to the given state.
    ///
    /// A transition to the current state is a complete no-op, as is any
    /// transition before a content view has been attached. Otherwise the
    /// target view is built if needed and shown immediately, and the previous
    /// state's view is hidden on the next turn of the bound queue, so the two
    /// are never simultaneously gone within one pass. If the container is not
    /// activated, the previous view is hidden immediately instead; nothing is
    /// on screen, so there is no frame to protect.
    pub fn set_state(&mut self, target: impl Into<StateTag>) {
        let target = target.into();
        if target == self.config.state {
            trace!("already in state {:?}", target);
            return;
        }
        if self.content.is_none() {
            trace!("content not yet set, waiting");
            return;
        }

        let previous = self.config.state;
        self.config.state = target;
        trace!("transition {:?} -> {:?}", previous, target);

        // A stale hide aimed at either endpoint of this transition would break
        // the one-visible-view invariant once it fired.
        self.cancel_pending_hides(previous);
        self.cancel_pending_hides(target);

        match self.state_view(target) {
            Some(view) => {
                self.prepare_for_show(target, &view);
                view.set_visibility(Visibility::Visible);
            }
            None => {
                debug_panic!("no view available for state {:?}", target);
            }
        }

        if let Some(previous_view) = self.built_state_view(previous) {
            self.schedule_hide(previous, &previous_view);
        }
    }

    /// The view for the given state, building and caching it on first access.
    ///
    /// For [`ContentState::Content`] this is the host-supplied content view,
    /// as-is. For any other tag, the first access inflates the configured
    /// template (or asks the registered provider), fills in the template's
    /// slots from the live configuration, wires the retry handler, attaches
    /// the result to the frame hidden, and caches it for the container's
    /// remaining life. Returns `None` for a tag with neither a buildable
    /// template nor a provider, or for `Content` before any content is set.
    pub fn state_view(&mut self, tag: StateTag) -> Option<View> {
        if tag == ContentState::Content.tag() {
            return self.content.clone();
        }
        if let Some(view) = self.state_views.get(&tag) {
            return Some(view.clone());
        }

        let view = self.build_state_view(tag)?;
        view.set_visibility(Visibility::Hidden);
        self.frame.add_child(view.clone());
        self.state_views.insert(tag, view.clone());
        Some(view)
    }

    /// Register a view provider for a state tag.
    ///
    /// The provider is consulted in preference to the built-in template path
    /// the next time the view for `tag` has to be built. A view already built
    /// and cached for that tag is left as it is.
    pub fn set_view_provider(&mut self, tag: StateTag, provider: impl StateViewProvider + 'static) {
        self.providers.insert(tag, Box::new(provider));
    }

    fn build_state_view(&self, tag: StateTag) -> Option<View> {
        if let Some(provider) = self.providers.get(&tag) {
            return Some(provider.build_view(&self.ctx));
        }

        let state = ContentState::from_tag(tag)?;
        let view = match state {
            // Content is supplied by the host, never built.
            ContentState::Content => return None,
            ContentState::Loading => self.inflate(self.config.loading_template)?,
            ContentState::NetworkError => {
                let view = self.inflate(self.config.network_error_template)?;
                self.fill_error_template(&view, &self.config.network_error_title);
                view
            }
            ContentState::GeneralError => {
                let view = self.inflate(self.config.general_error_template)?;
                self.fill_error_template(&view, &self.config.general_error_title);
                view
            }
            ContentState::Empty => {
                let view = self.inflate(self.config.empty_template)?;
                if let Some(slot) = view.find_slot(templates::MESSAGE) {
                    slot.set_text(self.config.empty_message.clone());
                }
                view
            }
        };
        Some(view)
    }

    fn inflate(&self, template: TemplateId) -> Option<View> {
        let view = self.ctx.inflate(template);
        if view.is_none() {
            debug_panic!("no template registered under {:?}", template);
        }
        view
    }

    fn fill_error_template(&self, view: &View, title: &str) {
        // A replacement template may drop either slot; skip what isn't there.
        if let Some(slot) = view.find_slot(templates::ERROR_TITLE) {
            slot.set_text(title);
        }
        if let Some(slot) = view.find_slot(templates::TAP_TO_RETRY) {
            slot.set_text(self.config.tap_to_retry.clone());
        }
        view.set_on_click(self.retry_handler.clone());
    }

    fn prepare_for_show(&self, tag: StateTag, view: &View) {
        if let Some(provider) = self.providers.get(&tag) {
            provider.prepare_view(view, &self.config);
        } else if tag == ContentState::GeneralError.tag() {
            // The displayed title can change after the view is built, so it is
            // re-read from the live configuration on every show.
            if let Some(slot) = view.find_slot(templates::ERROR_TITLE) {
                slot.set_text(self.config.display_error_title().to_owned());
            }
        }
    }

    /// The materialized view for a tag, without building anything.
    fn built_state_view(&self, tag: StateTag) -> Option<View> {
        if tag == ContentState::Content.tag() {
            return self.content.clone();
        }
        self.state_views.get(&tag).cloned()
    }

    /// Make visibility consistent with the current tag, immediately.
    ///
    /// Used when content is first attached and after a restore: this is first
    /// layout, not a transition between two on-screen views, so no hide is
    /// deferred.
    fn sync_current_state(&mut self) {
        if self.content.is_none() {
            return;
        }
        let current = self.config.state;
        match self.state_view(current) {
            Some(view) => {
                self.prepare_for_show(current, &view);
                view.set_visibility(Visibility::Visible);
            }
            None => {
                debug_panic!("no view available for state {:?}", current);
            }
        }
        if current != ContentState::Content.tag() {
            if let Some(content) = &self.content {
                content.set_visibility(Visibility::Hidden);
            }
        }
        for (tag, view) in &self.state_views {
            if *tag != current {
                view.set_visibility(Visibility::Hidden);
            }
        }
    }
}

// --- MARK: DEFERRED HIDES
impl StateContainer {
    fn schedule_hide(&mut self, tag: StateTag, view: &View) {
        let Some(queue) = &self.queue else {
            view.set_visibility(Visibility::Hidden);
            return;
        };
        // The task must not keep the view (or anything owning it) alive.
        let weak = view.downgrade();
        let task = queue.post(move || {
            if let Some(view) = weak.upgrade() {
                view.set_visibility(Visibility::Hidden);
            }
        });
        self.pending_hides.push((tag, task));
    }

    fn cancel_pending_hides(&mut self, tag: StateTag) {
        let queue = self.queue.clone();
        self.pending_hides.retain(|(pending_tag, task)| {
            if *pending_tag != tag {
                return true;
            }
            if let Some(queue) = &queue {
                queue.cancel(*task);
            }
            false
        });
    }

    /// Bind the deferred-hide mechanism to the host's live UI-thread queue.
    ///
    /// Called by the host when the container reaches the active display.
    pub fn activate(&mut self, queue: &UiQueue) {
        self.queue = Some(queue.clone());
    }

    /// Cancel every pending deferred hide and unbind from the queue.
    ///
    /// Called by the host when the container leaves the active display. After
    /// this, no previously scheduled task will run against the container's
    /// views, and nothing in the queue retains them.
    pub fn deactivate(&mut self) {
        if let Some(queue) = self.queue.take() {
            for (_, task) in self.pending_hides.drain(..) {
                queue.cancel(task);
            }
        }
        self.pending_hides.clear();
    }
}

// --- MARK: CONTENT
impl StateContainer {
    /// The host-supplied content view, if one has been attached.
    ///
    /// Never returns an internally maintained view such as the loading layout.
    pub fn content_view(&self) -> Option<View> {
        self.content.clone()
    }

    /// Attach the single content view.
    ///
    /// Equivalent to [`add_child`](Self::add_child).
    pub fn set_content_view(&mut self, view: View) {
        self.add_child(view);
    }

    /// Attach a child view.
    ///
    /// # Panics
    ///
    /// Panics if a different content view is already attached; the container
    /// can only host one content child. Re-attaching the same instance is a
    /// no-op that re-syncs state visibility.
    pub fn add_child(&mut self, child: View) {
        self.add_child_impl(child, None, None);
    }

    /// Attach a child view at the given position.
    ///
    /// # Panics
    ///
    /// Panics if a different content view is already attached.
    pub fn add_child_at(&mut self, child: View, index: usize) {
        self.add_child_impl(child, Some(index), None);
    }

    /// Attach a child view with an explicit fixed size.
    ///
    /// # Panics
    ///
    /// Panics if a different content view is already attached.
    pub fn add_child_sized(&mut self, child: View, width: u32, height: u32) {
        self.add_child_impl(child, None, Some(LayoutParams::fixed(width, height)));
    }

    /// Attach a child view with the given layout parameters.
    ///
    /// # Panics
    ///
    /// Panics if a different content view is already attached.
    pub fn add_child_with_params(&mut self, child: View, params: LayoutParams) {
        self.add_child_impl(child, None, Some(params));
    }

    /// Attach a child view at the given position with the given layout
    /// parameters.
    ///
    /// # Panics
    ///
    /// Panics if a different content view is already attached.
    pub fn add_child_at_with_params(&mut self, child: View, index: usize, params: LayoutParams) {
        self.add_child_impl(child, Some(index), Some(params));
    }

    fn add_child_impl(&mut self, child: View, index: Option<usize>, params: Option<LayoutParams>) {
        if let Some(params) = params {
            child.set_layout_params(params);
        }
        if self.is_internal(&child) {
            // Auxiliary views normally attach themselves when built; a host
            // re-adding one through the generic entry points is tolerated.
            if !self.frame.has_child(&child) {
                match index {
                    Some(index) => self.frame.add_child_at(index, child),
                    None => self.frame.add_child(child),
                }
            }
            return;
        }
        self.attach_content(child, index);
    }

    fn attach_content(&mut self, child: View, index: Option<usize>) {
        if let Some(existing) = &self.content {
            if !existing.same(&child) {
                panic!("StateContainer can only host one content view");
            }
            self.sync_current_state();
            return;
        }
        self.content = Some(child.clone());
        match index {
            Some(index) => self.frame.add_child_at(index, child),
            None => self.frame.add_child(child),
        }
        self.sync_current_state();
    }

    fn is_internal(&self, view: &View) -> bool {
        self.state_views.values().any(|internal| internal.same(view))
    }
}

// --- MARK: CONFIGURATION
impl StateContainer {
    /// The live configuration.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Title shown in the network-error state.
    pub fn network_error_title(&self) -> &str {
        &self.config.network_error_title
    }

    /// Set the network-error title. Only affects a view built afterwards.
    pub fn set_network_error_title(&mut self, title: impl Into<String>) {
        self.config.network_error_title = title.into();
    }

    /// Title shown in the general-error state, before any custom override.
    pub fn general_error_title(&self) -> &str {
        &self.config.general_error_title
    }

    /// Set the general-error title. Re-read from the configuration each time
    /// the general-error view is shown.
    pub fn set_general_error_title(&mut self, title: impl Into<String>) {
        self.config.general_error_title = title.into();
    }

    /// Label shown on the tap-to-retry element of both error states.
    pub fn tap_to_retry(&self) -> &str {
        &self.config.tap_to_retry
    }

    /// Set the tap-to-retry label. Only affects a view built afterwards.
    pub fn set_tap_to_retry(&mut self, label: impl Into<String>) {
        self.config.tap_to_retry = label.into();
    }

    /// Message shown in the empty state.
    pub fn empty_message(&self) -> &str {
        &self.config.empty_message
    }

    /// Set the empty-state message. Only affects a view built afterwards.
    pub fn set_empty_message(&mut self, message: impl Into<String>) {
        self.config.empty_message = message.into();
    }

    /// The custom error override string, if set.
    pub fn custom_error(&self) -> Option<&str> {
        self.config.custom_error.as_deref()
    }

    /// Set a custom error string overriding the general-error title.
    ///
    /// Unlike the plain setters, this is pushed into an already-built
    /// general-error view immediately.
    pub fn set_custom_error(&mut self, error: impl Into<String>) {
        self.config.custom_error = Some(error.into());
        self.push_general_error_title();
    }

    /// Clear the custom error string, restoring the general-error title.
    pub fn clear_custom_error(&mut self) {
        self.config.custom_error = None;
        self.push_general_error_title();
    }

    fn push_general_error_title(&self) {
        if let Some(view) = self.state_views.get(&ContentState::GeneralError.tag()) {
            if let Some(slot) = view.find_slot(templates::ERROR_TITLE) {
                slot.set_text(self.config.display_error_title().to_owned());
            }
        }
    }

    /// Template inflated for the loading state.
    pub fn loading_template(&self) -> TemplateId {
        self.config.loading_template
    }

    /// Set the loading template. Only affects a view built afterwards.
    pub fn set_loading_template(&mut self, id: TemplateId) {
        self.config.loading_template = id;
    }

    /// Template inflated for the network-error state.
    pub fn network_error_template(&self) -> TemplateId {
        self.config.network_error_template
    }

    /// Set the network-error template. Only affects a view built afterwards.
    pub fn set_network_error_template(&mut self, id: TemplateId) {
        self.config.network_error_template = id;
    }

    /// Template inflated for the general-error state.
    pub fn general_error_template(&self) -> TemplateId {
        self.config.general_error_template
    }

    /// Set the general-error template. Only affects a view built afterwards.
    pub fn set_general_error_template(&mut self, id: TemplateId) {
        self.config.general_error_template = id;
    }

    /// Template inflated for the empty state.
    pub fn empty_template(&self) -> TemplateId {
        self.config.empty_template
    }

    /// Set the empty-state template. Only affects a view built afterwards.
    pub fn set_empty_template(&mut self, id: TemplateId) {
        self.config.empty_template = id;
    }

    /// Install the tap-to-retry click handler.
    ///
    /// Applied to both error-state views, retroactively if they are already
    /// built.
    pub fn set_tap_to_retry_handler(&mut self, handler: impl Fn() + 'static) {
        let handler: ClickHandler = Rc::new(handler);
        self.retry_handler = Some(handler.clone());
        for state in [ContentState::NetworkError, ContentState::GeneralError] {
            if let Some(view) = self.state_views.get(&state.tag()) {
                view.set_on_click(Some(handler.clone()));
            }
        }
    }
}

// --- MARK: SAVE/RESTORE
impl StateContainer {
    /// Capture the configuration and current state into an opaque snapshot,
    /// composed with the frame layer's own saved state.
    pub fn save_state(&self) -> SavedState {
        let payload = match serde_json::to_value(&self.config) {
            Ok(value) => value,
            Err(err) => {
                debug_panic!("failed to encode container state: {}", err);
                serde_json::Value::Null
            }
        };
        SavedState::wrap(payload, self.save_base_state())
    }

    fn save_base_state(&self) -> SavedState {
        SavedState::leaf(serde_json::json!({ "frame_visible": self.frame.is_visible() }))
    }

    /// Restore a snapshot produced by [`save_state`](Self::save_state).
    ///
    /// A payload with the expected shape replaces every configuration field,
    /// pushes restored strings into any already-built auxiliary views (the
    /// view instances themselves are kept, never rebuilt), re-syncs visibility
    /// to the restored state tag if content is attached, and hands the nested
    /// base state to the frame layer. Any other payload is passed through to
    /// the frame layer untouched; this is never an error.
    pub fn restore_state(&mut self, saved: SavedState) {
        let parsed = serde_json::from_value::<ContainerConfig>(saved.payload().clone());
        match parsed {
            Ok(config) => {
                trace!("restoring state {:?}", config.state);
                self.apply_restored_config(config);
                let (_, base) = saved.into_parts();
                if let Some(base) = base {
                    self.restore_base_state(base);
                }
            }
            Err(_) => self.restore_base_state(saved),
        }
    }

    fn restore_base_state(&mut self, saved: SavedState) {
        let (payload, _) = saved.into_parts();
        if let Some(visible) = payload.get("frame_visible").and_then(|v| v.as_bool()) {
            self.frame.set_visibility(if visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            });
        }
    }

    fn apply_restored_config(&mut self, config: ContainerConfig) {
        self.config = config;

        // Views built before the restore keep their instances but take the
        // restored strings.
        if let Some(view) = self.state_views.get(&ContentState::NetworkError.tag()) {
            if let Some(slot) = view.find_slot(templates::ERROR_TITLE) {
                slot.set_text(self.config.network_error_title.clone());
            }
            if let Some(slot) = view.find_slot(templates::TAP_TO_RETRY) {
                slot.set_text(self.config.tap_to_retry.clone());
            }
        }
        if let Some(view) = self.state_views.get(&ContentState::GeneralError.tag()) {
            if let Some(slot) = view.find_slot(templates::ERROR_TITLE) {
                slot.set_text(self.config.display_error_title().to_owned());
            }
            if let Some(slot) = view.find_slot(templates::TAP_TO_RETRY) {
                slot.set_text(self.config.tap_to_retry.clone());
            }
        }
        if let Some(view) = self.state_views.get(&ContentState::Empty.tag()) {
            if let Some(slot) = view.find_slot(templates::MESSAGE) {
                slot.set_text(self.config.empty_message.clone());
            }
        }

        if self.content.is_some() {
            self.sync_current_state();
        }
    }
}

// --- MARK: DEBUG
impl StateContainer {
    /// Trace the current state and each frame child's role and visibility,
    /// warning if more than one child is visible. Does nothing in release
    /// builds.
    pub fn dump_state(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        trace!("/-- start state dump ---");
        trace!("| current state = {:?}", self.config.state);
        trace!("| children: {}", self.frame.child_count());

        let mut visible = 0;
        for (i, child) in self.frame.children().iter().enumerate() {
            let role = if self.content.as_ref().is_some_and(|c| c.same(child)) {
                "content".to_owned()
            } else {
                self.state_views
                    .iter()
                    .find(|(_, view)| view.same(child))
                    .map(|(tag, _)| format!("{tag:?}"))
                    .unwrap_or_else(|| "unknown".to_owned())
            };
            if child.is_visible() {
                visible += 1;
            }
            trace!("| - #{}: {} -> {:?}", i, role, child.visibility());
        }

        if visible > 1 {
            tracing::warn!("StateContainer has multiple visible children");
        }
        trace!("\\-- end state dump ---");
    }
}

impl std::fmt::Debug for StateContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateContainer")
            .field("state", &self.config.state)
            .field("has_content", &self.content.is_some())
            .field("built_views", &self.state_views.len())
            .field("activated", &self.queue.is_some())
            .field("pending_hides", &self.pending_hides.len())
            .finish()
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::testing::TestHarness;

    #[test]
    fn state_pairs_settle_to_one_visible_view() {
        for from in ContentState::ALL {
            for to in ContentState::ALL {
                if from == to {
                    continue;
                }
                let mut harness = TestHarness::create();
                harness.attach_content();
                harness.container_mut().set_state(from);
                harness.drain_queue();
                harness.container_mut().set_state(to);
                harness.drain_queue();

                let from_view = harness.container_mut().state_view(from.tag()).unwrap();
                let to_view = harness.container_mut().state_view(to.tag()).unwrap();
                assert!(to_view.is_visible(), "{from:?} -> {to:?}");
                assert!(!from_view.is_visible(), "{from:?} -> {to:?}");
                assert_eq!(harness.visible_children().len(), 1, "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn transition_to_current_state_is_a_complete_noop() {
        let mut harness = TestHarness::create();
        let content = harness.attach_content();
        harness.container_mut().set_state(ContentState::Loading);
        harness.drain_queue();

        harness.container_mut().set_state(ContentState::Loading);
        assert_eq!(harness.queue().pending(), 0);
        assert!(!content.is_visible());
        assert_eq!(harness.visible_children().len(), 1);
    }

    #[test]
    fn transition_before_content_is_ignored() {
        let mut harness = TestHarness::create();
        harness.container_mut().set_state(ContentState::Loading);

        assert_eq!(harness.container().state(), ContentState::Content.tag());
        assert_eq!(harness.container().view().child_count(), 0);
        assert_eq!(harness.queue().pending(), 0);
    }

    #[test]
    fn loading_cycle_toggles_and_reuses_the_cached_view() {
        let mut harness = TestHarness::create();
        let content = harness.attach_content();
        assert!(content.is_visible());

        harness.container_mut().set_state(ContentState::Loading);
        let loading = harness
            .container_mut()
            .state_view(ContentState::Loading.tag())
            .unwrap();
        assert!(loading.is_visible());
        // The hide of the content view only lands on the next queue turn.
        assert!(content.is_visible());
        harness.drain_queue();
        assert!(!content.is_visible());

        harness.container_mut().set_state(ContentState::Content);
        harness.drain_queue();
        assert!(content.is_visible());
        assert!(!loading.is_visible());

        // Still the same cached instance, not a rebuild.
        let again = harness
            .container_mut()
            .state_view(ContentState::Loading.tag())
            .unwrap();
        assert!(again.same(&loading));
    }

    #[test]
    fn back_to_back_transitions_cancel_stale_hides() {
        let mut harness = TestHarness::create();
        harness.attach_content();

        harness.container_mut().set_state(ContentState::NetworkError);
        harness.container_mut().set_state(ContentState::GeneralError);
        harness.drain_queue();

        let network = harness
            .container_mut()
            .state_view(ContentState::NetworkError.tag())
            .unwrap();
        let general = harness
            .container_mut()
            .state_view(ContentState::GeneralError.tag())
            .unwrap();
        assert!(general.is_visible());
        assert!(!network.is_visible());
        assert_eq!(harness.visible_children().len(), 1);
    }

    #[test]
    fn toggling_back_cancels_the_hide_aimed_at_the_new_target() {
        let mut harness = TestHarness::create();
        let content = harness.attach_content();

        // The hide of the content view scheduled here must not fire once the
        // container has already switched back to showing it.
        harness.container_mut().set_state(ContentState::Loading);
        harness.container_mut().set_state(ContentState::Content);
        harness.drain_queue();

        assert!(content.is_visible());
        let loading = harness
            .container_mut()
            .state_view(ContentState::Loading.tag())
            .unwrap();
        assert!(!loading.is_visible());
        assert_eq!(harness.visible_children().len(), 1);
    }

    #[test]
    fn rapid_chain_of_transitions_settles_cleanly() {
        let mut harness = TestHarness::create();
        let content = harness.attach_content();

        // Three transitions land on the queue before any of their hides run;
        // the last one re-shows the content the first one scheduled away.
        harness.container_mut().set_state(ContentState::Loading);
        harness.container_mut().set_state(ContentState::NetworkError);
        harness.container_mut().set_state(ContentState::Content);
        harness.drain_queue();

        assert!(content.is_visible());
        for state in [ContentState::Loading, ContentState::NetworkError] {
            let view = harness.container_mut().state_view(state.tag()).unwrap();
            assert!(!view.is_visible(), "{state:?} still visible");
        }
        assert_eq!(harness.visible_children().len(), 1);
    }

    #[test]
    #[should_panic(expected = "one content view")]
    fn second_content_view_is_rejected() {
        let mut harness = TestHarness::create();
        harness.attach_content();
        harness.container_mut().set_content_view(View::label("other"));
    }

    #[test]
    fn reattaching_the_same_content_is_a_noop_refresh() {
        let mut harness = TestHarness::create();
        let content = harness.attach_content();
        harness.container_mut().set_state(ContentState::Loading);
        harness.drain_queue();

        harness.container_mut().set_content_view(content.clone());
        assert_eq!(harness.container().view().child_count(), 2);
        assert!(!content.is_visible());
        assert_eq!(harness.container().state(), ContentState::Loading.tag());
    }

    #[test]
    fn every_attach_entry_point_validates_content() {
        let mut harness = TestHarness::create();
        let content = View::label("content");
        harness
            .container_mut()
            .add_child_at_with_params(content.clone(), 0, LayoutParams::WRAP);
        assert_eq!(content.layout_params(), LayoutParams::WRAP);
        assert!(harness.container().content_view().unwrap().same(&content));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            harness
                .container_mut()
                .add_child_sized(View::label("other"), 100, 40);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn initial_state_attribute_takes_effect_on_attach() {
        let attrs = Attributes::new().with_initial_state(ContentState::Loading.tag().0);
        let mut harness = TestHarness::create_with_attrs(attrs);
        assert_eq!(harness.container().state(), ContentState::Loading.tag());

        let content = harness.attach_content();
        assert!(!content.is_visible());
        let loading = harness
            .container_mut()
            .state_view(ContentState::Loading.tag())
            .unwrap();
        assert!(loading.is_visible());
    }

    #[test]
    fn strings_resolve_attribute_then_style_then_context_then_fallback() {
        let ctx = UiContext::new();
        ctx.set_string(StringRes::NetworkErrorTitle, "From context");

        let attrs = Attributes::new().with_network_error_title("From attribute");
        let style = Attributes::new()
            .with_network_error_title("From style")
            .with_general_error_title("Style general");

        let container = StateContainer::new(&ctx, Some(&attrs), Some(&style));
        assert_eq!(container.network_error_title(), "From attribute");
        assert_eq!(container.general_error_title(), "Style general");
        assert_eq!(container.tap_to_retry(), DEFAULT_TAP_TO_RETRY);

        let container = StateContainer::new(&ctx, None, None);
        assert_eq!(container.network_error_title(), "From context");
        assert_eq!(container.empty_message(), DEFAULT_EMPTY_MESSAGE);
    }

    #[test]
    fn error_views_are_populated_from_configuration() {
        let attrs = Attributes::new()
            .with_network_error_title("No connection")
            .with_tap_to_retry("Try again");
        let mut harness = TestHarness::create_with_attrs(attrs);
        harness.attach_content();

        let view = harness
            .container_mut()
            .state_view(ContentState::NetworkError.tag())
            .unwrap();
        let title = view.find_slot(templates::ERROR_TITLE).unwrap();
        let retry = view.find_slot(templates::TAP_TO_RETRY).unwrap();
        assert_eq!(title.text().as_deref(), Some("No connection"));
        assert_eq!(retry.text().as_deref(), Some("Try again"));
    }

    #[test]
    fn general_error_title_refreshes_on_every_show() {
        let mut harness = TestHarness::create();
        harness.attach_content();
        harness.container_mut().set_state(ContentState::GeneralError);
        harness.drain_queue();

        let view = harness
            .container_mut()
            .state_view(ContentState::GeneralError.tag())
            .unwrap();
        let title = view.find_slot(templates::ERROR_TITLE).unwrap();
        assert_eq!(title.text().as_deref(), Some(DEFAULT_GENERAL_ERROR_TITLE));

        // The custom override is pushed into the built view immediately.
        harness.container_mut().set_custom_error("Request timed out");
        assert_eq!(title.text().as_deref(), Some("Request timed out"));

        // And it survives a round trip away from and back to the state.
        harness.container_mut().set_state(ContentState::Content);
        harness.drain_queue();
        harness.container_mut().set_state(ContentState::GeneralError);
        harness.drain_queue();
        assert_eq!(title.text().as_deref(), Some("Request timed out"));

        harness.container_mut().clear_custom_error();
        assert_eq!(title.text().as_deref(), Some(DEFAULT_GENERAL_ERROR_TITLE));
    }

    #[test]
    fn retry_handler_applies_retroactively() {
        let mut harness = TestHarness::create();
        harness.attach_content();
        let view = harness
            .container_mut()
            .state_view(ContentState::NetworkError.tag())
            .unwrap();

        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        harness
            .container_mut()
            .set_tap_to_retry_handler(move || counter.set(counter.get() + 1));

        view.click();
        assert_eq!(clicks.get(), 1);

        // A view built after the handler was installed is wired at build time.
        let general = harness
            .container_mut()
            .state_view(ContentState::GeneralError.tag())
            .unwrap();
        general.click();
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn save_restore_round_trips_configuration_and_state() {
        let attrs = Attributes::new()
            .with_network_error_title("No net")
            .with_tap_to_retry("Retry now")
            .with_empty_message("Nothing here");
        let mut harness = TestHarness::create_with_attrs(attrs);
        harness.attach_content();
        harness.container_mut().set_custom_error("Server unreachable");
        harness.container_mut().set_state(ContentState::NetworkError);
        harness.drain_queue();

        let saved = harness.container().save_state();

        // The state tag is persisted as a raw integer, not a variant name.
        let encoded = serde_json::to_value(&saved).unwrap();
        assert_eq!(encoded["payload"]["state"], json!(2));

        let mut restored = TestHarness::create();
        let content = restored.attach_content();
        // Build one auxiliary view up front to check the restore reaches it.
        let network = restored
            .container_mut()
            .state_view(ContentState::NetworkError.tag())
            .unwrap();

        restored.container_mut().restore_state(saved);

        let container = restored.container();
        assert_eq!(container.network_error_title(), "No net");
        assert_eq!(container.tap_to_retry(), "Retry now");
        assert_eq!(container.empty_message(), "Nothing here");
        assert_eq!(container.custom_error(), Some("Server unreachable"));
        assert_eq!(container.state(), ContentState::NetworkError.tag());

        let title = network.find_slot(templates::ERROR_TITLE).unwrap();
        assert_eq!(title.text().as_deref(), Some("No net"));
        assert!(network.is_visible());
        assert!(!content.is_visible());
    }

    #[test]
    fn unrecognized_snapshot_passes_through_untouched() {
        let mut harness = TestHarness::create();
        harness.attach_content();
        let before = harness.container().config().clone();

        harness
            .container_mut()
            .restore_state(SavedState::leaf(json!({"someone": "else"})));

        assert_eq!(harness.container().config(), &before);
        assert_eq!(harness.container().state(), ContentState::Content.tag());
    }

    #[test]
    fn deactivate_cancels_pending_hides() {
        let mut harness = TestHarness::create();
        let content = harness.attach_content();
        harness.container_mut().set_state(ContentState::Loading);
        assert_eq!(harness.queue().pending(), 1);

        harness.container_mut().deactivate();
        assert_eq!(harness.queue().pending(), 0);
        assert_eq!(harness.drain_queue(), 0);
        // The hide never ran; reactivating and transitioning settles things.
        harness.reactivate();
        harness.container_mut().set_state(ContentState::Content);
        harness.drain_queue();
        assert!(content.is_visible());
    }

    #[test]
    fn pending_hide_does_not_outlive_the_container() {
        let ctx = UiContext::new();
        let queue = UiQueue::new();
        let mut container = StateContainer::new(&ctx, None, None);
        container.activate(&queue);
        container.set_content_view(View::label("content"));
        container.set_state(ContentState::Loading);
        assert_eq!(queue.pending(), 1);

        drop(container);
        // The task runs against a dead weak handle and does nothing.
        assert_eq!(queue.run_until_idle(), 1);
    }

    #[test]
    fn detached_transition_hides_the_previous_view_immediately() {
        let ctx = UiContext::new();
        let mut container = StateContainer::new(&ctx, None, None);
        let content = View::label("content");
        container.set_content_view(content.clone());

        container.set_state(ContentState::Loading);
        assert!(!content.is_visible());
        let loading = container.state_view(ContentState::Loading.tag()).unwrap();
        assert!(loading.is_visible());
    }

    #[test]
    fn template_without_expected_slots_builds_anyway() {
        let ctx = UiContext::new();
        let bare = TemplateId(70);
        ctx.register_template(bare, |_| View::label("bare"));

        let attrs = Attributes::new().with_general_error_template(bare);
        let mut harness = TestHarness::create_with_context(ctx, attrs);
        harness.attach_content();
        harness.container_mut().set_state(ContentState::GeneralError);
        harness.drain_queue();

        let view = harness
            .container_mut()
            .state_view(ContentState::GeneralError.tag())
            .unwrap();
        assert!(view.is_visible());
        assert_eq!(view.text().as_deref(), Some("bare"));
    }

    struct CountingProvider {
        built: Rc<Cell<u32>>,
        prepared: Rc<Cell<u32>>,
    }

    impl StateViewProvider for CountingProvider {
        fn build_view(&self, _ctx: &UiContext) -> View {
            self.built.set(self.built.get() + 1);
            View::label("provided")
        }

        fn prepare_view(&self, view: &View, config: &ContainerConfig) {
            self.prepared.set(self.prepared.get() + 1);
            view.set_text(format!("provided: {}", config.tap_to_retry()));
        }
    }

    #[test]
    fn provider_backed_custom_state_builds_once_and_prepares_each_show() {
        const BADGE: StateTag = StateTag(32);

        let built = Rc::new(Cell::new(0));
        let prepared = Rc::new(Cell::new(0));

        let mut harness = TestHarness::create();
        harness.attach_content();
        harness.container_mut().set_view_provider(
            BADGE,
            CountingProvider {
                built: built.clone(),
                prepared: prepared.clone(),
            },
        );

        harness.container_mut().set_state(BADGE);
        harness.drain_queue();
        let view = harness.container_mut().state_view(BADGE).unwrap();
        assert!(view.is_visible());
        assert_eq!(view.text().as_deref(), Some("provided: Tap to retry"));
        assert_eq!(built.get(), 1);
        assert_eq!(prepared.get(), 1);

        harness.container_mut().set_state(ContentState::Content);
        harness.drain_queue();
        harness.container_mut().set_state(BADGE);
        harness.drain_queue();
        assert_eq!(built.get(), 1);
        assert_eq!(prepared.get(), 2);
        assert_eq!(harness.visible_children().len(), 1);
    }
}
