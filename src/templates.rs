// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! Built-in state templates.
//!
//! Each template id names a small view tree that a [`UiContext`] can inflate,
//! and each slot id names a node within those trees that the container
//! customizes after inflation (a title to fill in, a retry label, a message).
//! Hosts can register their own templates under their own ids and point the
//! container at them through its attributes; a replacement template only needs
//! to carry the slots it wants customized.

use crate::core::context::{TemplateId, UiContext};
use crate::core::view::{LayoutParams, SlotId, View};

/// Template for the loading state: a centered progress indicator.
pub const LOADING: TemplateId = TemplateId(1);
/// Template for the network-error state: title plus tap-to-retry label.
pub const NETWORK_ERROR: TemplateId = TemplateId(2);
/// Template for the general-error state: title plus tap-to-retry label.
pub const GENERAL_ERROR: TemplateId = TemplateId(3);
/// Template for the empty state: a single message label.
pub const EMPTY: TemplateId = TemplateId(4);

/// The title label of an error template.
pub const ERROR_TITLE: SlotId = SlotId("error_title");
/// The tap-to-retry label of an error template.
pub const TAP_TO_RETRY: SlotId = SlotId("tap_to_retry");
/// The message label of the empty template.
pub const MESSAGE: SlotId = SlotId("message");
/// The progress indicator of the loading template.
pub const PROGRESS: SlotId = SlotId("progress");

pub(crate) fn register_builtins(ctx: &UiContext) {
    ctx.register_template(LOADING, |_| loading());
    ctx.register_template(NETWORK_ERROR, |_| error());
    ctx.register_template(GENERAL_ERROR, |_| error());
    ctx.register_template(EMPTY, |_| empty());
}

fn loading() -> View {
    View::new().with_child(
        View::new()
            .with_slot(PROGRESS)
            .with_layout(LayoutParams::WRAP),
    )
}

// Both error states share one structure; only the text differs, and the
// container fills that in from its configuration.
fn error() -> View {
    View::new()
        .with_child(
            View::label("")
                .with_slot(ERROR_TITLE)
                .with_layout(LayoutParams::WRAP),
        )
        .with_child(
            View::label("")
                .with_slot(TAP_TO_RETRY)
                .with_layout(LayoutParams::WRAP),
        )
}

fn empty() -> View {
    View::new().with_child(
        View::label("")
            .with_slot(MESSAGE)
            .with_layout(LayoutParams::WRAP),
    )
}
