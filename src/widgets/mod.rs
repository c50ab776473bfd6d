// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! The widgets of this crate.

mod content_state;
mod state_container;

pub use content_state::{ContentState, StateTag};
pub use state_container::{ContainerConfig, StateContainer, StateViewProvider};
