use super::error::MetaObjectError;
use super::layout;
use super::object::{AttributeKind, MetaAttribute, MetaObject};
use super::reader::RecordReader;

/// Decode a meta-object record from a raw export buffer.
///
/// Single-pass, cursor-based, pure. The slice length is the authoritative
/// bound: nothing past it is ever read, and the returned record owns copies
/// of every byte it keeps. Trailing bytes beyond the last attribute are
/// ignored, matching the fixed-capacity container the record is stored in.
///
/// A record whose header fields are all zero is a valid decode, not an
/// error; see [`MetaObject::has_target`].
pub fn parse_meta_object(buf: &[u8]) -> Result<MetaObject, MetaObjectError> {
    let mut reader = RecordReader::new(buf);
    reader.require_header(layout::HEADER_LEN)?;

    let target_id = reader.read_u8()?;
    let target_type = reader.read_u8()?;
    let target_sequence = reader.read_u32_be()?;

    let cka_id = read_attribute(&mut reader, AttributeKind::CkaId)?;
    let cka_label = read_attribute(&mut reader, AttributeKind::CkaLabel)?;
    let cka_id_pubkey = read_attribute(&mut reader, AttributeKind::CkaIdPubkey)?;
    let cka_label_pubkey = read_attribute(&mut reader, AttributeKind::CkaLabelPubkey)?;

    Ok(MetaObject {
        target_id,
        target_type,
        target_sequence,
        cka_id,
        cka_label,
        cka_id_pubkey,
        cka_label_pubkey,
    })
}

fn read_attribute(
    reader: &mut RecordReader<'_>,
    field: AttributeKind,
) -> Result<MetaAttribute, MetaObjectError> {
    let declared = reader.read_length_prefix(field)?;
    // Capacity before remaining bytes: an over-capacity declaration is
    // corrupt no matter how much of the value follows.
    if declared as usize > layout::ATTRIBUTE_MAX_LEN {
        return Err(MetaObjectError::AttributeTooLarge {
            field,
            declared,
            capacity: layout::ATTRIBUTE_MAX_LEN,
        });
    }
    let value = reader.read_attribute_value(field, declared)?;
    Ok(MetaAttribute::new(value))
}
