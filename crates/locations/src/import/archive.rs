use std::io::{Cursor, Read};

use zip::{result::ZipError, ZipArchive};

use super::{ImportError, MAX_ARCHIVE_SIZE, MAX_PAYLOAD_SIZE, METADATA_PREFIX, TEXT_EXTENSION};

/// Extracts the single text file of an archive, decoded as UTF-8. Invalid
/// sequences are replaced rather than rejected.
pub fn read_payload(bytes: &[u8]) -> Result<String, ImportError> {
    if bytes.len() > MAX_ARCHIVE_SIZE {
        return Err(ImportError::TooLarge);
    }

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(ImportError::InvalidArchive)?;

    let text_files = archive
        .file_names()
        .filter(|name| is_payload(name))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    let name = match text_files.as_slice() {
        [] => return Err(ImportError::NoTextFile),
        [name] => name,
        _ => return Err(ImportError::MultipleTextFiles),
    };

    let entry = archive.by_name(name).map_err(ImportError::InvalidArchive)?;
    let mut content = Vec::new();
    entry
        .take(MAX_PAYLOAD_SIZE + 1)
        .read_to_end(&mut content)
        .map_err(|why| ImportError::InvalidArchive(ZipError::Io(why)))?;
    if content.len() as u64 > MAX_PAYLOAD_SIZE {
        return Err(ImportError::TooLarge);
    }

    Ok(String::from_utf8_lossy(&content).into_owned())
}

fn is_payload(name: &str) -> bool {
    name.ends_with(TEXT_EXTENSION) && !name.starts_with(METADATA_PREFIX)
}
