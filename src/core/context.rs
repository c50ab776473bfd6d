// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! The host context handed to a widget at construction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::view::View;

/// Identifier of a registered view template.
///
/// Template ids are plain integers so they can travel through attribute bags
/// and saved state unchanged. The built-in templates claim the low ids (see
/// [`crate::templates`]); hosts registering their own should pick ids of their
/// own choosing and treat collisions as a configuration error.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub u32);

/// A template builder: produces a fresh view tree each time it is inflated.
pub type TemplateFn = Rc<dyn Fn(&UiContext) -> View>;

/// Keys for host-provided default strings.
///
/// A string resource sits between an explicit attribute and the library's
/// literal fallback when the container resolves its configuration.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum StringRes {
    /// Default title for the network-error state.
    NetworkErrorTitle,
    /// Default title for the general-error state.
    GeneralErrorTitle,
    /// Default tap-to-retry label for both error states.
    TapToRetry,
    /// Default message for the empty state.
    EmptyMessage,
}

struct ContextState {
    templates: HashMap<TemplateId, TemplateFn>,
    strings: HashMap<StringRes, String>,
}

/// A handle to the host environment: the template registry and the host's
/// default strings.
///
/// Widgets keep a clone of the context they were constructed with, so they can
/// inflate templates lazily long after construction. All clones share state.
#[derive(Clone)]
pub struct UiContext {
    state: Rc<RefCell<ContextState>>,
}

impl UiContext {
    /// Create a context with the built-in templates registered.
    pub fn new() -> Self {
        let ctx = Self {
            state: Rc::new(RefCell::new(ContextState {
                templates: HashMap::new(),
                strings: HashMap::new(),
            })),
        };
        crate::templates::register_builtins(&ctx);
        ctx
    }

    /// Register (or replace) the template under the given id.
    pub fn register_template(&self, id: TemplateId, build: impl Fn(&Self) -> View + 'static) {
        self.state
            .borrow_mut()
            .templates
            .insert(id, Rc::new(build));
    }

    /// Whether a template is registered under the given id.
    pub fn has_template(&self, id: TemplateId) -> bool {
        self.state.borrow().templates.contains_key(&id)
    }

    /// Build a fresh view tree from the template registered under `id`.
    ///
    /// Returns `None` if no template is registered under that id.
    pub fn inflate(&self, id: TemplateId) -> Option<View> {
        // Don't hold the borrow while the builder runs; it may use the context.
        let build = self.state.borrow().templates.get(&id).cloned();
        build.map(|build| build(self))
    }

    /// Set a host-provided default string.
    pub fn set_string(&self, res: StringRes, value: impl Into<String>) {
        self.state.borrow_mut().strings.insert(res, value.into());
    }

    /// Look up a host-provided default string.
    pub fn string(&self, res: StringRes) -> Option<String> {
        self.state.borrow().strings.get(&res).cloned()
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("UiContext")
            .field("templates", &state.templates.len())
            .field("strings", &state.strings.len())
            .finish()
    }
}
