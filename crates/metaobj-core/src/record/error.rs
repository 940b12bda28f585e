use thiserror::Error;

use super::object::AttributeKind;

/// Errors returned by meta-object decoding and encoding.
///
/// Every malformed buffer is reported with the field that failed; nothing
/// is auto-corrected or silently truncated.
#[derive(Debug, Error)]
pub enum MetaObjectError {
    #[error("meta-object header truncated: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
    #[error("{field} truncated: need {needed} bytes, {remaining} remain")]
    TruncatedAttribute {
        field: AttributeKind,
        needed: usize,
        remaining: usize,
    },
    #[error("{field} too large: declared {declared} bytes, capacity {capacity}")]
    AttributeTooLarge {
        field: AttributeKind,
        declared: u16,
        capacity: usize,
    },
}
