// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opt-in `tracing` subscriber setup.
//!
//! Every crate in this workspace emits structured events via `tracing` but
//! none of them install a subscriber — that is a decision for the binary
//! embedding the core, matching `spec.md` §6's "CLI / config surface: out of
//! scope (external collaborator)". Call [`init_default_subscriber`] from a
//! `main` or test harness that wants STARK's events on stderr.

/// Install a `tracing-subscriber` `fmt` layer honoring `RUST_LOG`
/// (`EnvFilter::from_default_env`), defaulting to `info` when unset.
///
/// Returns `Err` if a global subscriber is already installed; callers that
/// don't care (tests run more than once in the same process) can ignore it.
pub fn init_default_subscriber() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
}
