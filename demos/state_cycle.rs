// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! Drives a container through a full load cycle headlessly, logging what is
//! visible after each transition settles.

use multistate::{
    Attributes, ContentState, StateContainer, UiContext, UiQueue, View, try_init_tracing,
};
use tracing::info;

fn visible_summary(container: &StateContainer) -> String {
    let labels: Vec<String> = container
        .view()
        .children()
        .iter()
        .filter(|child| child.is_visible())
        .map(|child| child.text().unwrap_or_else(|| format!("{child:?}")))
        .collect();
    labels.join(", ")
}

fn main() {
    let _ = try_init_tracing();

    let ctx = UiContext::new();
    let queue = UiQueue::new();

    let attrs = Attributes::new()
        .with_network_error_title("You appear to be offline")
        .with_empty_message("No messages yet");
    let mut container = StateContainer::new(&ctx, Some(&attrs), None);
    container.activate(&queue);
    container.set_tap_to_retry_handler(|| info!("retry requested"));

    let content = View::label("42 messages");
    container.set_content_view(content.clone());
    info!(showing = %visible_summary(&container), "attached content");

    for state in [
        ContentState::Loading,
        ContentState::NetworkError,
        ContentState::Empty,
        ContentState::Content,
    ] {
        container.set_state(state);
        let ran = queue.run_until_idle();
        info!(
            ?state,
            deferred_tasks = ran,
            showing = %visible_summary(&container),
            "transition settled",
        );
    }

    // Simulate a tap on the network-error view's retry affordance.
    container.set_state(ContentState::NetworkError);
    queue.run_until_idle();
    container.dump_state();
    if let Some(error_view) = container.state_view(ContentState::NetworkError.tag()) {
        error_view.click();
    }

    container.set_state(ContentState::Content);
    queue.run_until_idle();
    info!(
        content_visible = content.is_visible(),
        "cycle finished, content restored"
    );
}
