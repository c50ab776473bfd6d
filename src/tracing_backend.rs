// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! Configures a suitable default [`tracing`] implementation.
//!
//! This uses a default filter which can be overwritten using `RUST_LOG`, and
//! will include all [`DEBUG`](tracing::Level::DEBUG) messages in debug mode
//! and all [`INFO`](tracing::Level::INFO) level messages in release mode.
//!
//! If a `tracing` backend is already configured, this will not overwrite that.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

fn try_init_layered_tracing(default_level: LevelFilter) -> Result<(), SetGlobalDefaultError> {
    // Use EnvFilter to allow the user to override the log level without recompiling.
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    // We skip the target: in a widget library it only gives you the module a
    // log was defined in, which is rarely useful; the message is much more
    // helpful for finding a log's location.
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(console_layer);
    tracing::dispatcher::set_global_default(registry.into())
}

/// Initialise tracing for a unit test.
/// This ignores most messages to limit noise.
pub(crate) fn try_init_test_tracing() -> Result<(), SetGlobalDefaultError> {
    // For unit tests we want to suppress most messages.
    try_init_layered_tracing(LevelFilter::WARN)
}

/// Initialise tracing for an end-user application.
///
/// Default level is DEBUG in `--dev`, INFO in `--release`, unless a level is
/// passed through `RUST_LOG`.
pub fn try_init_tracing() -> Result<(), SetGlobalDefaultError> {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    try_init_layered_tracing(default_level)
}
