use std::fmt;

use super::layout;

/// The four PKCS#11-style attribute fields carried by a meta-object, in
/// wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    CkaId,
    CkaLabel,
    CkaIdPubkey,
    CkaLabelPubkey,
}

impl AttributeKind {
    /// Wire order of the attribute fields.
    pub const ALL: [AttributeKind; layout::ATTRIBUTE_COUNT] = [
        AttributeKind::CkaId,
        AttributeKind::CkaLabel,
        AttributeKind::CkaIdPubkey,
        AttributeKind::CkaLabelPubkey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::CkaId => "CKA_ID",
            AttributeKind::CkaLabel => "CKA_LABEL",
            AttributeKind::CkaIdPubkey => "public key CKA_ID",
            AttributeKind::CkaLabelPubkey => "public key CKA_LABEL",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single identity attribute value copied out of the record.
///
/// Zero length means the attribute is absent; that is a valid value, not an
/// error. The decoder and encoder both enforce
/// [`layout::ATTRIBUTE_MAX_LEN`], so values obtained from either side are
/// always in range.
///
/// # Examples
/// ```
/// use metaobj_core::MetaAttribute;
///
/// let attribute = MetaAttribute::new(*b"ABC");
/// assert_eq!(attribute.len(), 3);
/// assert_eq!(attribute.to_hex(), "41 42 43");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaAttribute {
    bytes: Vec<u8>,
}

impl MetaAttribute {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex pairs separated by single spaces.
    pub fn to_hex(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decoded meta-object record.
///
/// Describes the provenance and identity attributes of an object whose
/// payload is stored opaquely elsewhere. Instances come out of
/// [`parse_meta_object`](super::parser::parse_meta_object) fully owned; the
/// record keeps no reference to the input buffer.
///
/// # Examples
/// ```
/// use metaobj_core::{MetaObject, parse_meta_object};
///
/// let object = parse_meta_object(&[
///     0x01, 0x02, 0x00, 0x00, 0x00, 0x05,
///     0x00, 0x03, 0x41, 0x42, 0x43,
///     0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
/// ])?;
/// assert!(object.has_target());
/// assert_eq!(object.cka_id.as_bytes(), b"ABC");
/// # Ok::<(), metaobj_core::MetaObjectError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaObject {
    /// ID of the original object this record describes.
    pub target_id: u8,
    /// Object type/class of the original object.
    pub target_type: u8,
    /// Version counter distinguishing re-created objects with the same ID.
    pub target_sequence: u32,
    pub cka_id: MetaAttribute,
    pub cka_label: MetaAttribute,
    pub cka_id_pubkey: MetaAttribute,
    pub cka_label_pubkey: MetaAttribute,
}

impl MetaObject {
    /// Whether the record points at a real original object.
    ///
    /// A record whose `target_id` and `target_type` are both zero is a
    /// structurally valid placeholder, not a decode failure; presenters are
    /// expected to check this flag and message the case instead of listing
    /// zeroed fields.
    pub fn has_target(&self) -> bool {
        self.target_id != 0 || self.target_type != 0
    }

    pub fn attribute(&self, kind: AttributeKind) -> &MetaAttribute {
        match kind {
            AttributeKind::CkaId => &self.cka_id,
            AttributeKind::CkaLabel => &self.cka_label,
            AttributeKind::CkaIdPubkey => &self.cka_id_pubkey,
            AttributeKind::CkaLabelPubkey => &self.cka_label_pubkey,
        }
    }

    /// Exact byte length of this record's encoding.
    pub fn encoded_len(&self) -> usize {
        layout::HEADER_LEN
            + AttributeKind::ALL
                .iter()
                .map(|&kind| layout::LENGTH_PREFIX_LEN + self.attribute(kind).len())
                .sum::<usize>()
    }
}
