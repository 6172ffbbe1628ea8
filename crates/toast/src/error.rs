//! Error types for configuration and name parsing.
//!
//! Queue operations themselves never fail: invalid references are no-ops.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading queue configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown option value.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// `max-visible` was zero.
	#[error("max-visible must be at least 1")]
	ZeroCapacity,

	/// A duration option was zero.
	#[error("{0} must be greater than zero")]
	ZeroDuration(&'static str),
}

/// A kind name did not match any [`Kind`](crate::Kind).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown notification kind: {0} (expected success, error, warning, info, loading or custom)")]
pub struct ParseKindError(pub String);

/// An anchor name did not match any [`Anchor`](crate::Anchor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown anchor: {0} (expected top-left, top-right, top-center, bottom-left, bottom-right or bottom-center)")]
pub struct ParseAnchorError(pub String);

/// Text was not a notification id such as `toast-3`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid notification id: {0}")]
pub struct ParseIdError(pub String);

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
