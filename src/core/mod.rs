// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! The host-view primitives the widget is built on: retained view handles,
//! the single-threaded task queue, the host context, the attribute bag, and
//! generic instance state.

pub mod attributes;
pub mod context;
pub mod instance_state;
pub mod queue;
pub mod view;
