//! Cheap PDF sniffing before handing a file to the parser.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Bytes needed to read `%PDF-x.y`.
const HEADER_LEN: usize = PDF_MAGIC.len() + 3;

/// Check the `%PDF-x.y` header of a byte buffer and return the version.
///
/// ```
/// use pdf_outline::detect::sniff_version;
///
/// assert_eq!(sniff_version(b"%PDF-1.7\n").unwrap(), "1.7");
/// assert!(sniff_version(b"<html>").is_err());
/// ```
pub fn sniff_version(data: &[u8]) -> Result<String> {
    if data.len() < HEADER_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[PDF_MAGIC.len()..HEADER_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Read just the header of a file and check it.
pub fn sniff_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = [0u8; HEADER_LEN];
    File::open(path)?.read_exact(&mut header)?;
    sniff_version(&header)
}

/// Whether a path has a `.pdf` extension, ignoring case.
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
