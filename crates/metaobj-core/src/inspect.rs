use std::path::Path;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::record::error::MetaObjectError;
use crate::record::parse_meta_object;
use crate::source::{OpaqueFileSource, OpaqueSource, SourceError};
use crate::{DEFAULT_GENERATED_AT, Report, make_report};

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Decode error: {0}")]
    Decode(#[from] MetaObjectError),
}

/// Read the opaque export at `path` and decode it into a report.
pub fn inspect_opaque_file(path: &Path) -> Result<Report, InspectError> {
    let source = OpaqueFileSource::open(path)?;
    inspect_source(path, source)
}

/// Decode one export from an arbitrary source.
///
/// `path` only labels the report input; all bytes come from `source`.
pub fn inspect_source<S: OpaqueSource>(path: &Path, mut source: S) -> Result<Report, InspectError> {
    let value = source.read_value()?;
    let object = parse_meta_object(&value)?;

    let mut report = make_report(&path.display().to_string(), value.len() as u64, &object);
    report.generated_at = now_rfc3339();
    Ok(report)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{InspectError, inspect_source};
    use crate::REPORT_VERSION;
    use crate::record::object::{MetaAttribute, MetaObject};
    use crate::record::{encode_meta_object, layout};
    use crate::source::{OpaqueSource, SourceError};

    struct MemorySource(Vec<u8>);

    impl OpaqueSource for MemorySource {
        fn read_value(&mut self) -> Result<Vec<u8>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn inspect_decodes_a_real_target() {
        let object = MetaObject {
            target_id: 0x42,
            target_type: 5,
            target_sequence: 2,
            cka_id: MetaAttribute::new(vec![0xAB, 0xCD]),
            cka_label: MetaAttribute::new(*b"rsa key"),
            ..MetaObject::default()
        };
        let encoded = encode_meta_object(&object).unwrap();
        let bytes = encoded.len() as u64;

        let report = inspect_source(Path::new("export.bin"), MemorySource(encoded)).unwrap();
        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.input.path, "export.bin");
        assert_eq!(report.input.bytes, bytes);
        assert!(report.object.has_target);
        assert_eq!(report.object.target_id, 0x42);
        assert_eq!(report.object.attributes[0].hex.as_deref(), Some("ab cd"));
        assert_eq!(report.object.attributes[1].len, 7);
        assert!(report.object.attributes[2].hex.is_none());
    }

    #[test]
    fn inspect_flags_the_sentinel() {
        let report = inspect_source(
            Path::new("empty.bin"),
            MemorySource(vec![0u8; layout::MIN_RECORD_LEN]),
        )
        .unwrap();
        assert!(!report.object.has_target);
        assert!(report.object.attributes.iter().all(|a| a.len == 0));
    }

    #[test]
    fn inspect_surfaces_decode_errors() {
        let err = inspect_source(Path::new("cut.bin"), MemorySource(vec![0x01, 0x02]))
            .unwrap_err();
        assert!(matches!(err, InspectError::Decode(_)));
        assert!(err.to_string().contains("header truncated"));
    }
}
