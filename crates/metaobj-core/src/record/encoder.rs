use super::error::MetaObjectError;
use super::layout;
use super::object::{AttributeKind, MetaObject};

/// Encode a record into the wire layout consumed by
/// [`parse_meta_object`](super::parser::parse_meta_object).
///
/// The only rejected input is an attribute built by hand above
/// [`layout::ATTRIBUTE_MAX_LEN`]; decoded records are always in range.
pub fn encode_meta_object(object: &MetaObject) -> Result<Vec<u8>, MetaObjectError> {
    let mut out = Vec::with_capacity(object.encoded_len());
    out.push(object.target_id);
    out.push(object.target_type);
    out.extend_from_slice(&object.target_sequence.to_be_bytes());

    for kind in AttributeKind::ALL {
        let attribute = object.attribute(kind);
        if attribute.len() > layout::ATTRIBUTE_MAX_LEN {
            return Err(MetaObjectError::AttributeTooLarge {
                field: kind,
                declared: u16::try_from(attribute.len()).unwrap_or(u16::MAX),
                capacity: layout::ATTRIBUTE_MAX_LEN,
            });
        }
        out.extend_from_slice(&(attribute.len() as u16).to_be_bytes());
        out.extend_from_slice(attribute.as_bytes());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::encode_meta_object;
    use crate::record::error::MetaObjectError;
    use crate::record::layout;
    use crate::record::object::{AttributeKind, MetaAttribute, MetaObject};
    use crate::record::parser::parse_meta_object;

    #[test]
    fn encode_known_record() {
        let object = MetaObject {
            target_id: 1,
            target_type: 2,
            target_sequence: 5,
            cka_id: MetaAttribute::new(*b"ABC"),
            ..MetaObject::default()
        };
        let encoded = encode_meta_object(&object).unwrap();
        assert_eq!(
            encoded,
            [
                0x01, 0x02, 0x00, 0x00, 0x00, 0x05, 0x00, 0x03, 0x41, 0x42, 0x43, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00,
            ]
        );
        assert_eq!(encoded.len(), object.encoded_len());
    }

    #[test]
    fn encode_then_parse_round_trips() {
        let object = MetaObject {
            target_id: 0xFE,
            target_type: 5,
            target_sequence: u32::MAX,
            cka_id: MetaAttribute::new(vec![0x00, 0xFF]),
            cka_label: MetaAttribute::new(*b"signing key"),
            cka_id_pubkey: MetaAttribute::new(vec![0x00, 0xFF, 0x10]),
            cka_label_pubkey: MetaAttribute::new(*b"signing key pub"),
        };
        let encoded = encode_meta_object(&object).unwrap();
        assert_eq!(parse_meta_object(&encoded).unwrap(), object);
    }

    #[test]
    fn encode_sentinel_round_trips() {
        let object = MetaObject::default();
        let encoded = encode_meta_object(&object).unwrap();
        assert_eq!(encoded.len(), layout::MIN_RECORD_LEN);

        let decoded = parse_meta_object(&encoded).unwrap();
        assert!(!decoded.has_target());
        assert_eq!(decoded, object);
    }

    #[test]
    fn encode_rejects_over_capacity_attribute() {
        let object = MetaObject {
            target_id: 1,
            cka_label: MetaAttribute::new(vec![0x55; layout::ATTRIBUTE_MAX_LEN + 1]),
            ..MetaObject::default()
        };
        let err = encode_meta_object(&object).unwrap_err();
        assert!(matches!(
            err,
            MetaObjectError::AttributeTooLarge {
                field: AttributeKind::CkaLabel,
                ..
            }
        ));
    }
}
