// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! The construction-time attribute bag.

use crate::core::context::TemplateId;

/// Options a host supplies when constructing a widget, read once.
///
/// Every field is optional; the widget fills in anything left unset from its
/// style defaults, the context's string resources, and finally its own literal
/// fallbacks. A second `Attributes` value can be passed at construction as the
/// style-default layer, consulted after the attribute bag itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub(crate) loading_template: Option<TemplateId>,
    pub(crate) network_error_template: Option<TemplateId>,
    pub(crate) general_error_template: Option<TemplateId>,
    pub(crate) empty_template: Option<TemplateId>,
    pub(crate) network_error_title: Option<String>,
    pub(crate) general_error_title: Option<String>,
    pub(crate) tap_to_retry: Option<String>,
    pub(crate) empty_message: Option<String>,
    pub(crate) initial_state: Option<u32>,
}

impl Attributes {
    /// An empty bag; every option falls through to the next layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Template inflated for the loading state.
    pub fn with_loading_template(mut self, id: TemplateId) -> Self {
        self.loading_template = Some(id);
        self
    }

    /// Template inflated for the network-error state.
    pub fn with_network_error_template(mut self, id: TemplateId) -> Self {
        self.network_error_template = Some(id);
        self
    }

    /// Template inflated for the general-error state.
    pub fn with_general_error_template(mut self, id: TemplateId) -> Self {
        self.general_error_template = Some(id);
        self
    }

    /// Template inflated for the empty state.
    pub fn with_empty_template(mut self, id: TemplateId) -> Self {
        self.empty_template = Some(id);
        self
    }

    /// Title shown in the network-error state.
    pub fn with_network_error_title(mut self, title: impl Into<String>) -> Self {
        self.network_error_title = Some(title.into());
        self
    }

    /// Title shown in the general-error state.
    pub fn with_general_error_title(mut self, title: impl Into<String>) -> Self {
        self.general_error_title = Some(title.into());
        self
    }

    /// Label shown on the tap-to-retry element of both error states.
    pub fn with_tap_to_retry(mut self, label: impl Into<String>) -> Self {
        self.tap_to_retry = Some(label.into());
        self
    }

    /// Message shown in the empty state.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }

    /// State the container starts in, as a raw tag.
    pub fn with_initial_state(mut self, tag: u32) -> Self {
        self.initial_state = Some(tag);
        self
    }
}
