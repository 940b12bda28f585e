//! Core library for inspecting exported PKCS#11 meta-objects.
//!
//! A meta-object is a compact binary record describing the provenance and
//! identity attributes (CKA_ID / CKA_LABEL, plus the public-key pair where
//! one exists) of an object whose payload is stored opaquely inside an HSM.
//! This crate implements the offline pipeline used by the CLI: an opaque
//! source supplies the raw export, the record layer decodes it
//! (layout/reader/parser), and the inspect layer assembles a versioned
//! report. Decoding is byte-oriented and side-effect free; all I/O is
//! isolated in the `source` module.
//!
//! Invariants:
//! - The decoder never reads past the supplied buffer and returns a fully
//!   owned record or a field-specific error, never a partial record.
//! - Attribute lengths are capped per field; over-capacity declarations are
//!   rejected, not truncated.
//! - An all-zero header decodes successfully and is surfaced as the
//!   "no target" flag for presenters to message.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use metaobj_core::inspect_opaque_file;
//!
//! let report = inspect_opaque_file(Path::new("opaque.bin"))?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod inspect;
mod record;
mod source;

pub use inspect::{InspectError, inspect_opaque_file, inspect_source};
pub use record::layout::{
    ATTRIBUTE_MAX_LEN, HEADER_LEN, LENGTH_PREFIX_LEN, MAX_RECORD_LEN, MIN_RECORD_LEN,
};
pub use record::{
    AttributeKind, MetaAttribute, MetaObject, MetaObjectError, encode_meta_object,
    parse_meta_object,
};
pub use source::{OpaqueFileSource, OpaqueSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the generation time cannot be formatted.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Inspection report for one decoded meta-object export.
///
/// # Examples
/// ```
/// use metaobj_core::{MetaObject, make_report};
///
/// let report = make_report("opaque.bin", 14, &MetaObject::default());
/// assert_eq!(report.report_version, metaobj_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the record format version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input export metadata.
    pub input: InputInfo,

    /// The decoded record.
    pub object: ObjectReport,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use metaobj_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "metaobj".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "metaobj");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "metaobj").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input export metadata embedded in reports.
///
/// # Examples
/// ```
/// use metaobj_core::InputInfo;
///
/// let input = InputInfo {
///     path: "opaque.bin".to_string(),
///     bytes: 17,
/// };
/// assert_eq!(input.bytes, 17);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the inspector.
    pub path: String,
    /// Bytes actually read from the source.
    pub bytes: u64,
}

/// Decoded record fields in report form.
///
/// # Examples
/// ```
/// use metaobj_core::{MetaObject, make_report};
///
/// let report = make_report("opaque.bin", 14, &MetaObject::default());
/// assert!(!report.object.has_target);
/// assert_eq!(report.object.attributes.len(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectReport {
    /// False exactly when the record is the all-zero "no target" placeholder.
    pub has_target: bool,
    /// ID of the original object this record describes.
    pub target_id: u8,
    /// Object type/class of the original object.
    pub target_type: u8,
    /// Version counter distinguishing re-created objects with the same ID.
    pub target_sequence: u32,
    /// One entry per attribute field, in wire order.
    pub attributes: Vec<AttributeReport>,
}

/// Single attribute field in report form.
///
/// # Examples
/// ```
/// use metaobj_core::AttributeReport;
///
/// let attribute = AttributeReport {
///     name: "CKA_ID".to_string(),
///     len: 3,
///     hex: Some("41 42 43".to_string()),
/// };
/// assert_eq!(attribute.len, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeReport {
    /// Attribute label (e.g., "CKA_ID", "public key CKA_LABEL").
    pub name: String,
    /// Value length in bytes; zero means the attribute is absent.
    pub len: usize,
    /// Lowercase spaced hex rendering, omitted for absent attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

/// Build a report for a decoded record, with a placeholder timestamp.
///
/// # Examples
/// ```
/// use metaobj_core::{MetaObject, make_report};
///
/// let report = make_report("opaque.bin", 14, &MetaObject::default());
/// assert_eq!(report.input.path, "opaque.bin");
/// assert_eq!(report.generated_at, metaobj_core::DEFAULT_GENERATED_AT);
/// ```
pub fn make_report(input_path: &str, input_bytes: u64, object: &MetaObject) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "metaobj".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        object: ObjectReport {
            has_target: object.has_target(),
            target_id: object.target_id,
            target_type: object.target_type,
            target_sequence: object.target_sequence,
            attributes: AttributeKind::ALL
                .iter()
                .map(|&kind| {
                    let attribute = object.attribute(kind);
                    AttributeReport {
                        name: kind.to_string(),
                        len: attribute.len(),
                        hex: (!attribute.is_empty()).then(|| attribute.to_hex()),
                    }
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_hex_for_absent_attributes() {
        let object = MetaObject {
            target_id: 1,
            target_type: 2,
            target_sequence: 5,
            cka_id: MetaAttribute::new(*b"ABC"),
            ..MetaObject::default()
        };
        let report = make_report("opaque.bin", 17, &object);

        let value = serde_json::to_value(&report).expect("report json");
        assert_eq!(value["object"]["has_target"], true);

        let attributes = value["object"]["attributes"]
            .as_array()
            .expect("attributes array");
        assert_eq!(attributes.len(), 4);
        assert_eq!(attributes[0]["name"], "CKA_ID");
        assert_eq!(attributes[0]["hex"], "41 42 43");
        assert!(attributes[1].get("hex").is_none());
        assert!(attributes[3].get("hex").is_none());
    }

    #[test]
    fn report_attribute_order_is_wire_order() {
        let report = make_report("opaque.bin", 14, &MetaObject::default());
        let names: Vec<_> = report
            .object
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "CKA_ID",
                "CKA_LABEL",
                "public key CKA_ID",
                "public key CKA_LABEL",
            ]
        );
    }
}
