// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared error enum for the STARK core.
//!
//! All fallible operations in the core surface one of these variants; none of
//! them are recovered from internally (per `spec.md` §7, propagation is the
//! caller's decision).

/// Errors raised by the STARK spatial partitioning and indexing core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StarkError {
    /// A coordinate fell outside the declared universe, a dimension was
    /// negative, or an operation required a non-empty dataset and received
    /// an empty one.
    #[error("domain error: {message} (coords: {coords:?})")]
    Domain {
        /// Human-readable description of the violation.
        message: String,
        /// The offending coordinates, if applicable.
        coords: Option<(f64, f64)>,
    },

    /// A partitioner or index parameter was invalid (`maxCost <= 0`,
    /// `cellSide <= 0`, `k == 0`, inconsistent universe, ...).
    #[error("config error: invalid `{parameter}`: {reason}")]
    Config {
        /// The name of the offending parameter.
        parameter: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// An operation was attempted on an index in the wrong lifecycle state
    /// (e.g. `insert` after `build()`).
    #[error("usage error: {message}")]
    Usage {
        /// Human-readable description of the misuse.
        message: String,
    },

    /// A geometry failed to parse or contained non-finite coordinates.
    #[error("geometry error: {message}")]
    Geometry {
        /// Human-readable description of the geometry failure.
        message: String,
    },

    /// Cancellation was observed mid-operation.
    #[error("interrupted at partition {partition_id:?}")]
    Interrupted {
        /// The partition being processed when cancellation was observed, if known.
        partition_id: Option<u32>,
    },
}

impl StarkError {
    /// Build a [`StarkError::Domain`] for an out-of-universe coordinate.
    pub fn out_of_universe(x: f64, y: f64) -> Self {
        Self::Domain {
            message: "coordinate is outside the declared universe".to_string(),
            coords: Some((x, y)),
        }
    }

    /// Build a [`StarkError::Domain`] for an operation requiring non-empty input.
    pub fn empty_dataset(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
            coords: None,
        }
    }

    /// Build a [`StarkError::Config`] for an invalid parameter.
    pub fn config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StarkError::Usage`] error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the STARK crates.
pub type StarkResult<T> = Result<T, StarkError>;
