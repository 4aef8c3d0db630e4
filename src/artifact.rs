//! Binary envelope for persisted model artifacts.
//!
//! Layout (little-endian):
//!
//! ```text
//! +-------+---------+-------------+-------+-----------------+
//! | magic | version | payload_len | crc32 | bincode payload |
//! | 4 B   | u32     | u64         | u32   | payload_len B   |
//! +-------+---------+-------------+-------+-----------------+
//! ```

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{JarvisError, LoadError, LoadResult, Result};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 8 + 4;

/// The kinds of binary artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A fitted vectorizer.
    Vectorizer,
    /// A fitted classifier.
    Classifier,
}

impl ArtifactKind {
    /// Magic bytes identifying this kind of artifact.
    pub fn magic(&self) -> &'static [u8; 4] {
        match self {
            ArtifactKind::Vectorizer => b"JVEC",
            ArtifactKind::Classifier => b"JCLF",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Vectorizer => "vectorizer",
            ArtifactKind::Classifier => "classifier",
        }
    }
}

/// Serialize `value` into an artifact envelope.
pub fn encode<T: Serialize>(kind: ArtifactKind, value: &T) -> Result<Vec<u8>> {
    let payload = bincode::serialize(value)
        .map_err(|e| JarvisError::other(format!("failed to encode {}: {e}", kind.name())))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(kind.magic());
    bytes.write_u32::<LittleEndian>(FORMAT_VERSION)?;
    bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
    bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Decode an artifact envelope produced by [`encode`].
///
/// `source` names the artifact in error messages (usually its path).
pub fn decode<T: DeserializeOwned>(kind: ArtifactKind, source: &str, bytes: &[u8]) -> LoadResult<T> {
    let corrupt = |reason: String| LoadError::corrupt(source, reason);

    if bytes.len() < HEADER_LEN {
        return Err(corrupt(format!(
            "{} bytes is shorter than the {HEADER_LEN} byte header",
            bytes.len()
        )));
    }

    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    cursor
        .read_exact(&mut magic)
        .map_err(|e| corrupt(e.to_string()))?;
    if &magic != kind.magic() {
        return Err(corrupt(format!("not a {} artifact", kind.name())));
    }

    let version = cursor
        .read_u32::<LittleEndian>()
        .map_err(|e| corrupt(e.to_string()))?;
    if version != FORMAT_VERSION {
        return Err(corrupt(format!("unsupported format version {version}")));
    }

    let payload_len = cursor
        .read_u64::<LittleEndian>()
        .map_err(|e| corrupt(e.to_string()))?;
    let checksum = cursor
        .read_u32::<LittleEndian>()
        .map_err(|e| corrupt(e.to_string()))?;

    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != payload_len {
        return Err(corrupt(format!(
            "payload is {} bytes, header says {payload_len}",
            payload.len()
        )));
    }
    if crc32fast::hash(payload) != checksum {
        return Err(corrupt("checksum mismatch".to_string()));
    }

    bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))
}

/// Encode `value` and write it to `path`.
pub fn write_artifact<T: Serialize>(path: &Path, kind: ArtifactKind, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, encode(kind, value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Payload {
        name: String,
        weights: Vec<f64>,
    }

    fn payload() -> Payload {
        Payload {
            name: "weights".to_string(),
            weights: vec![0.5, -1.25, 3.0],
        }
    }

    #[test]
    fn test_encode_decode() {
        let bytes = encode(ArtifactKind::Classifier, &payload()).unwrap();
        assert_eq!(&bytes[..4], b"JCLF");

        let decoded: Payload = decode(ArtifactKind::Classifier, "mem", &bytes).unwrap();
        assert_eq!(decoded, payload());
    }

    #[test]
    fn test_wrong_kind_is_corrupt() {
        let bytes = encode(ArtifactKind::Vectorizer, &payload()).unwrap();
        let result: LoadResult<Payload> = decode(ArtifactKind::Classifier, "mem", &bytes);
        assert!(matches!(result, Err(LoadError::Corrupt { .. })));
    }

    #[test]
    fn test_flipped_byte_is_corrupt() {
        let mut bytes = encode(ArtifactKind::Classifier, &payload()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let result: LoadResult<Payload> = decode(ArtifactKind::Classifier, "mem", &bytes);
        match result {
            Err(LoadError::Corrupt { reason, .. }) => assert_eq!(reason, "checksum mismatch"),
            other => panic!("expected checksum failure, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_and_garbage_are_corrupt() {
        let bytes = encode(ArtifactKind::Classifier, &payload()).unwrap();
        let inputs: [&[u8]; 3] = [
            &bytes[..3],
            &bytes[..bytes.len() - 2],
            b"not an artifact at all",
        ];
        for input in inputs {
            let result: LoadResult<Payload> = decode(ArtifactKind::Classifier, "mem", input);
            assert!(matches!(result, Err(LoadError::Corrupt { .. })));
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode(ArtifactKind::Vectorizer, &payload()).unwrap();
        bytes[4] = 9;
        let result: LoadResult<Payload> = decode(ArtifactKind::Vectorizer, "mem", &bytes);
        match result {
            Err(LoadError::Corrupt { reason, .. }) => assert!(reason.contains("version 9")),
            other => panic!("expected version failure, got {other:?}"),
        }
    }
}
