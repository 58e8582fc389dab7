// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the cache stores.
//!
//! None of these ever reach an end user. The memory and durable stores report
//! them so that the failure is visible in the type signature, and the policy
//! layer logs and discards them (a failed cache write degrades to "not cached").

/// Errors that can occur while reading or writing cache infrastructure.
///
/// # Examples
///
/// ```rust
/// use fxcache::CacheError;
///
/// let err = CacheError::cache_io(
///     "/var/cache/fx/ab12.json",
///     "permission denied",
///     std::io::Error::from(std::io::ErrorKind::PermissionDenied),
/// );
/// assert!(err.to_string().contains("ab12.json"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure while touching a durable cache entry.
    #[error("Cache I/O error at {path}: {details}")]
    CacheIo {
        /// Path of the entry or directory that failed
        path: String,
        /// Details about the failure
        details: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A value could not be converted to or from its stored representation.
    #[error("Serialization error: {details}")]
    Serialization {
        /// Details about the serialization failure
        details: String,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// The cache root exists but is not a usable directory.
    #[error("Cache directory unavailable: {path}")]
    DirectoryUnavailable {
        /// Path of the configured cache root
        path: String,
    },
}

impl CacheError {
    /// Create a `CacheIo` error from a path and an I/O error.
    pub fn cache_io(
        path: impl Into<String>,
        details: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        CacheError::CacheIo {
            path: path.into(),
            details: details.into(),
            source,
        }
    }

    /// Create a `Serialization` error from a serde error.
    pub fn serialization(details: impl Into<String>, source: serde_json::Error) -> Self {
        CacheError::Serialization {
            details: details.into(),
            source,
        }
    }

    /// Create a `DirectoryUnavailable` error.
    pub fn directory_unavailable(path: impl Into<String>) -> Self {
        CacheError::DirectoryUnavailable { path: path.into() }
    }
}
