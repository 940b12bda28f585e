use std::fs;
use std::path::{Path, PathBuf};

use metaobj_core::{MIN_RECORD_LEN, MetaAttribute, MetaObject, encode_meta_object};

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/fixtures");
    write_record(
        &root.join("asym_key.bin"),
        &MetaObject {
            target_id: 0x42,
            target_type: 3,
            target_sequence: 1,
            cka_id: MetaAttribute::new(vec![0x01, 0x23, 0x45, 0x67]),
            cka_label: MetaAttribute::new(*b"rsa signing key"),
            cka_id_pubkey: MetaAttribute::new(vec![0x01, 0x23, 0x45, 0x68]),
            cka_label_pubkey: MetaAttribute::new(*b"rsa signing key pub"),
        },
    )?;
    write_record(
        &root.join("opaque_data.bin"),
        &MetaObject {
            target_id: 0x07,
            target_type: 1,
            target_sequence: 12,
            cka_label: MetaAttribute::new(*b"imported blob"),
            ..MetaObject::default()
        },
    )?;
    write_raw(&root.join("no_target.bin"), &[0u8; MIN_RECORD_LEN])?;
    Ok(())
}

fn write_record(path: &Path, object: &MetaObject) -> Result<(), String> {
    let value = encode_meta_object(object)
        .map_err(|err| format!("failed to encode {}: {}", path.display(), err))?;
    write_raw(path, &value)
}

fn write_raw(path: &Path, value: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, value).map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    Ok(())
}
