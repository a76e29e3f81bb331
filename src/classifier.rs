/*!
 * Binary detection and BOM-aware text decoding
 */

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

use crate::error::SkipReason;

/// Number of leading bytes inspected for binary detection
pub const BINARY_SNIFF_LEN: usize = 512;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Error type for reading and classifying file content
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The OS refused access to the file
    #[error("access denied: {0}")]
    AccessDenied(io::Error),

    /// Any other failure to open or read (locked, vanished, I/O error)
    #[error("unreadable: {0}")]
    Unreadable(io::Error),

    /// Fewer bytes were read than the file reported
    #[error("could not fully read file ({read} of {expected} bytes)")]
    Truncated { read: u64, expected: u64 },
}

impl From<io::Error> for ClassifyError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::AccessDenied(err),
            _ => Self::Unreadable(err),
        }
    }
}

impl From<ClassifyError> for SkipReason {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::AccessDenied(e) => SkipReason::AccessDenied(e.to_string()),
            ClassifyError::Unreadable(e) => SkipReason::Unreadable(e.to_string()),
            ClassifyError::Truncated { read, expected } => {
                SkipReason::Truncated { read, expected }
            }
        }
    }
}

/// Text encoding chosen from the byte-order mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// No recognized marker, decoded as UTF-8
    Utf8,
    /// UTF-8 with a leading `EF BB BF`
    Utf8Bom,
    /// UTF-16 little-endian, `FF FE`
    Utf16Le,
    /// UTF-16 big-endian, `FE FF`
    Utf16Be,
}

impl Encoding {
    /// Length of the marker to strip before decoding
    pub fn bom_len(self) -> usize {
        match self {
            Self::Utf8 => 0,
            Self::Utf8Bom => UTF8_BOM.len(),
            Self::Utf16Le | Self::Utf16Be => 2,
        }
    }
}

/// Whether the buffer looks binary.
///
/// Heuristic: a zero byte within the first [`BINARY_SNIFF_LEN`] bytes marks the
/// content as binary. UTF-16 text of ASCII characters will also trip this, as
/// it does for the tools this mirrors.
pub fn is_binary(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    head.contains(&0)
}

/// Read the head of a file and classify it
pub fn sniff_file(path: &Path) -> Result<bool, ClassifyError> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(BINARY_SNIFF_LEN);
    file.take(BINARY_SNIFF_LEN as u64).read_to_end(&mut head)?;
    Ok(is_binary(&head))
}

/// Pick an encoding from the leading byte-order mark
pub fn detect_encoding(bytes: &[u8]) -> Encoding {
    if bytes.starts_with(&UTF8_BOM) {
        Encoding::Utf8Bom
    } else if bytes.starts_with(&UTF16_LE_BOM) {
        Encoding::Utf16Le
    } else if bytes.starts_with(&UTF16_BE_BOM) {
        Encoding::Utf16Be
    } else {
        Encoding::Utf8
    }
}

/// Decode a buffer to text, never failing.
///
/// Malformed UTF-8, unpaired surrogates and a dangling odd UTF-16 byte all
/// become U+FFFD.
pub fn decode_text(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let body = &bytes[encoding.bom_len()..];

    match encoding {
        Encoding::Utf8 | Encoding::Utf8Bom => String::from_utf8_lossy(body).into_owned(),
        Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
    }
}

fn decode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = body.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();

    let mut text: String = char::decode_utf16(chunks.map(|c| unit([c[0], c[1]])))
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();

    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// Read a whole file with a single handle and decode it
pub fn read_text(path: &Path) -> Result<String, ClassifyError> {
    let mut file = File::open(path)?;
    let expected = file.metadata()?.len();

    let mut bytes = Vec::with_capacity(expected as usize);
    file.read_to_end(&mut bytes)?;
    drop(file);

    let read = bytes.len() as u64;
    if read < expected {
        return Err(ClassifyError::Truncated { read, expected });
    }

    Ok(decode_text(&bytes))
}
