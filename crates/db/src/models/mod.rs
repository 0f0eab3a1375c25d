//! Database row structs.
//!
//! Each submodule contains a `FromRow` struct matching the table columns and
//! an explicit conversion into the matching `skillstack_core` entity. Rows
//! are never handed to the engine directly: the conversion parses status
//! strings and sanitizes numeric columns at this boundary.

pub mod certificate;
pub mod session;
pub mod skill;
pub mod subtopic;
pub mod user;

use skillstack_core::error::CoreError;

/// Hour values that are NaN or infinite are stored garbage; treat them as zero.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Wrap a row-mapping failure as a storage error.
pub(crate) fn corrupt_row(table: &str, column: &str, err: CoreError) -> CoreError {
    CoreError::Persistence(format!("Invalid value in {table}.{column}: {err}"))
}
