//! Result and error types for Pagina.

use thiserror::Error;

/// Result type for Pagina operations
pub type PaginaResult<T> = Result<T, PaginaError>;

/// Errors that can occur in Pagina
#[derive(Debug, Error)]
pub enum PaginaError {
    /// Malformed or ambiguous locator, wait keyword, or URL argument
    #[error("Invalid arguments: {message}")]
    InvalidArguments {
        /// Error message
        message: String,
    },

    /// Assignment to a field kind that does not accept writes
    #[error("Unsupported operation: {message}")]
    Unsupported {
        /// Error message
        message: String,
    },

    /// Wait expired before its condition became true (or false)
    #[error("Timed out after {ms}ms waiting for {condition}{}", fmt_timeout_note(.message))]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the polled condition
        condition: String,
        /// Caller-supplied annotation, empty when none was given
        message: String,
    },

    /// Element lookup matched nothing
    #[error("No such element: {locator}")]
    NoSuchElement {
        /// Locator that matched nothing
        locator: String,
    },

    /// Element handle refers to a node no longer attached to the page
    #[error("Stale element reference: {message}")]
    StaleElement {
        /// Error message
        message: String,
    },

    /// Alert interaction attempted while no alert is open
    #[error("No alert is present")]
    NoAlert,

    /// Get/set on a field name the page never registered
    #[error("Unknown page field: {name}")]
    UnknownField {
        /// Field name that was looked up
        name: String,
    },

    /// Optional driver capability not implemented by this backend
    #[error("Driver does not support {operation}")]
    NotSupported {
        /// Name of the missing operation
        operation: String,
    },

    /// Any other failure reported by the underlying driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },
}

fn fmt_timeout_note(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}
