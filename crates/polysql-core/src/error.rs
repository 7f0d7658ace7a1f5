//! Error types for statement compilation.

/// Errors raised while configuring or compiling a statement.
///
/// These are usage errors: they point at a mistake in the calling code, never
/// at a runtime condition of a database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A terminal call was made before a target table (or view) was set.
    #[error("no table specified for {statement} statement")]
    MissingTable {
        /// The statement kind that was being compiled (e.g. `SELECT`).
        statement: &'static str,
    },

    /// A column option could not be interpreted.
    #[error("invalid column option '{key}': '{value}'")]
    InvalidOption {
        /// The option key.
        key: String,
        /// The rejected value.
        value: String,
    },
}

/// Result type for statement compilation.
pub type Result<T> = std::result::Result<T, BuildError>;
