// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! Tools and infrastructure for testing the container.

mod harness;

pub use harness::TestHarness;
