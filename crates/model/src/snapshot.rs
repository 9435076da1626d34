//! Versioned binary snapshot format
//!
//! Layout:
//!
//! ```text
//! magic        4 bytes  "HOLO"
//! version      u32      bincode
//! dimension    u64      bincode, bits per hypervector
//! model_id     uuid     bincode
//! created_at   string   bincode, RFC 3339
//! state        ModelState, bincode
//! ```
//!
//! Strings are length-prefixed and each hypervector is stored as its bit
//! count followed by `ceil(D / 8)` bytes, least significant bit first.
//! The header is checked field by field so a snapshot from another format
//! version or vector width is rejected before any state is decoded.

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use holo_core::{HoloError, ModelId, Result};
use holo_hdc::DIMENSION;
use serde::{Deserialize, Serialize};

use crate::state::ModelState;

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"HOLO";
pub const SNAPSHOT_VERSION: u32 = 1;

/// Descriptive snapshot header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub version: u32,
    pub dimension: u64,
    pub model_id: ModelId,
    pub created_at: DateTime<Utc>,
}

impl SnapshotHeader {
    pub fn new(model_id: ModelId) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            dimension: DIMENSION as u64,
            model_id,
            created_at: Utc::now(),
        }
    }
}

/// Write `header` and `state` to `writer`
pub fn write_snapshot<W: Write>(
    mut writer: W,
    header: &SnapshotHeader,
    state: &ModelState,
) -> Result<()> {
    writer.write_all(&SNAPSHOT_MAGIC)?;
    bincode::serialize_into(&mut writer, header)?;
    bincode::serialize_into(&mut writer, state)?;
    writer.flush()?;
    Ok(())
}

/// Read and validate a snapshot from `reader`
pub fn read_snapshot<R: Read>(mut reader: R) -> Result<(SnapshotHeader, ModelState)> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != SNAPSHOT_MAGIC {
        return Err(HoloError::InvalidSnapshot(format!(
            "bad magic bytes {:02x?}",
            magic
        )));
    }

    let version: u32 = bincode::deserialize_from(&mut reader)?;
    if version != SNAPSHOT_VERSION {
        return Err(HoloError::UnsupportedVersion(version));
    }

    let dimension: u64 = bincode::deserialize_from(&mut reader)?;
    if dimension != DIMENSION as u64 {
        return Err(HoloError::DimensionMismatch {
            expected: DIMENSION,
            found: dimension as usize,
        });
    }

    let model_id: ModelId = bincode::deserialize_from(&mut reader)?;
    let created_at: DateTime<Utc> = bincode::deserialize_from(&mut reader)?;
    let state: ModelState = bincode::deserialize_from(&mut reader)?;

    let header = SnapshotHeader {
        version,
        dimension,
        model_id,
        created_at,
    };
    Ok((header, state))
}
