//! Error types for cell identifiers, navigation and covering configuration

use thiserror::Error;

/// Errors reported by checked constructors and navigation operations
///
/// Geometric queries on values that are already valid never fail; only
/// operations that accept caller-supplied levels, faces, positions, tokens or
/// raw identifiers return these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    /// Level outside `[0, 30]`, or not reachable from the identifier in the requested direction
    #[error("invalid level {level}: {reason}")]
    InvalidLevel {
        /// The rejected level
        level: i32,
        /// Why the level was rejected
        reason: &'static str,
    },

    /// Face index outside `[0, 6)`
    #[error("invalid face: {0}")]
    InvalidFace(u8),

    /// Identifier with no sentinel bit, a face above 5, or a misplaced sentinel
    #[error("malformed cell id: {0:#018x}")]
    MalformedCellId(u64),

    /// Child position outside `[0, 4)`
    #[error("invalid child position: {0}")]
    InvalidChildPosition(u8),

    /// Token that is empty, too long, or not hexadecimal
    #[error("invalid cell token: {0:?}")]
    InvalidToken(String),

    /// Coverer configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for cell operations
pub type Result<T> = std::result::Result<T, CellError>;
