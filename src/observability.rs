//! Logging infrastructure for appmatrix.
//!
//! appmatrix uses `tracing` for structured logging. All events use target
//! "appmatrix" and include an `event` field for filtering.
//!
//! ## Library Integration
//!
//! The library never initializes a global subscriber. The `appmatrix` binary
//! installs a `tracing_subscriber::fmt` subscriber; embedding applications
//! configure their own.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: module/subsystem (e.g., "filter", "matrix", "session")
//! - Use `%` for Display, `?` for Debug formatting
//! - Never log cell values; log counts and column names only

/// Target for all appmatrix log events.
pub(crate) const APPMATRIX_TARGET: &str = "appmatrix";

/// Macro for info-level log events.
///
/// # Example
/// ```ignore
/// log_info!(
///     component = "export",
///     event = "matrix_written",
///     path = %path.display(),
///     columns = matrix.column_count(),
/// );
/// ```
macro_rules! log_info {
    ($($field:tt)*) => {
        ::tracing::info!(target: $crate::observability::APPMATRIX_TARGET, $($field)*)
    };
}

/// Macro for debug-level log events.
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::APPMATRIX_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::APPMATRIX_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
