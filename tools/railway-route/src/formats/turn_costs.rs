//! turn_costs.<profile>.bin format - Per-profile turn cost table
//!
//! Format (little-endian):
//!
//! Header (64 bytes):
//!   magic:         u32 = 0x54435354  // "TCST"
//!   version:       u16 = 1
//!   dimension:     u16
//!   count:         u64
//!   profile:       [32]u8            // UTF-8, zero padded, truncated
//!   reserved:      [16]u8
//!
//! Body (count records, sorted by via_node, from_edge, to_edge):
//!   via_node:      u32
//!   from_edge:     u32
//!   to_edge:       u32
//!   cost:          f32               // +inf = forbidden
//!
//! Footer (16 bytes):
//!   body_crc64:    u64
//!   file_crc64:    u64

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use railway_common::{EdgeId, NodeId};

use super::crc::{checksum, Digest};
use crate::profile::TurnCostDimension;
use crate::turns::{TurnCostStore, TurnCostTable};

const MAGIC: u32 = 0x54435354; // "TCST"
const VERSION: u16 = 1;
const HEADER_SIZE: usize = 64; // 4 + 2 + 2 + 8 + 32 + 16
const RECORD_SIZE: usize = 16;
const FOOTER_SIZE: usize = 16;
const NAME_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnCostHeader {
    pub dimension: TurnCostDimension,
    pub profile: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnCostRecord {
    pub via_node: NodeId,
    pub from_edge: EdgeId,
    pub to_edge: EdgeId,
    pub cost: f32,
}

impl TurnCostRecord {
    fn sort_key(&self) -> (NodeId, EdgeId, EdgeId) {
        (self.via_node, self.from_edge, self.to_edge)
    }
}

pub struct TurnCostFile;

impl TurnCostFile {
    pub fn file_name(profile: &str) -> String {
        format!("turn_costs.{profile}.bin")
    }

    /// Records of one dimension, in file order
    pub fn records_from_table(
        table: &TurnCostTable,
        dimension: TurnCostDimension,
    ) -> Vec<TurnCostRecord> {
        table
            .entries_for(dimension)
            .map(|(key, cost)| TurnCostRecord {
                via_node: key.via_node,
                from_edge: key.from_edge,
                to_edge: key.to_edge,
                cost: cost as f32,
            })
            .collect()
    }

    /// Write turn_costs.<profile>.bin
    pub fn write<P: AsRef<Path>>(
        path: P,
        profile: &str,
        dimension: TurnCostDimension,
        records: &[TurnCostRecord],
    ) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        let mut sorted = records.to_vec();
        sorted.sort_by_key(TurnCostRecord::sort_key);

        let header = encode_header(profile, dimension, sorted.len() as u64);
        writer.write_all(&header)?;

        let mut body_digest = Digest::new();
        let mut file_digest = Digest::new();
        file_digest.update(&header);

        for record in &sorted {
            let bytes = encode_record(record);
            body_digest.update(&bytes);
            file_digest.update(&bytes);
            writer.write_all(&bytes)?;
        }

        writer.write_all(&body_digest.finalize().to_le_bytes())?;
        writer.write_all(&file_digest.finalize().to_le_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Read header and records, checking size and both checksums
    pub fn read<P: AsRef<Path>>(path: P) -> Result<(TurnCostHeader, Vec<TurnCostRecord>)> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        let mut bytes = Vec::new();
        BufReader::new(file).read_to_end(&mut bytes)?;
        let (header, records) = decode(&bytes)
            .with_context(|| format!("Invalid turn cost file {}", path.as_ref().display()))?;
        Ok((header, records))
    }

    /// Verify structure and checksums without keeping the records
    pub fn verify<P: AsRef<Path>>(path: P) -> Result<TurnCostHeader> {
        Self::read(path).map(|(header, _)| header)
    }

    /// Read a file into `store` under the file's dimension
    pub fn load_into<P: AsRef<Path>, S: TurnCostStore>(
        path: P,
        store: &mut S,
    ) -> Result<TurnCostHeader> {
        let (header, records) = Self::read(path)?;
        for r in &records {
            store.set(header.dimension, r.from_edge, r.via_node, r.to_edge, r.cost as f64);
        }
        Ok(header)
    }
}

fn encode_header(profile: &str, dimension: TurnCostDimension, count: u64) -> Vec<u8> {
    let mut header = Vec::with_capacity(HEADER_SIZE);
    header.extend_from_slice(&MAGIC.to_le_bytes());
    header.extend_from_slice(&VERSION.to_le_bytes());
    header.extend_from_slice(&dimension.0.to_le_bytes());
    header.extend_from_slice(&count.to_le_bytes());

    let mut name = [0u8; NAME_SIZE];
    let truncated = truncate_utf8(profile, NAME_SIZE);
    name[..truncated.len()].copy_from_slice(truncated.as_bytes());
    header.extend_from_slice(&name);
    header.extend_from_slice(&[0u8; 16]); // reserved

    assert_eq!(header.len(), HEADER_SIZE);
    header
}

fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn encode_record(record: &TurnCostRecord) -> [u8; RECORD_SIZE] {
    let mut out = [0u8; RECORD_SIZE];
    out[0..4].copy_from_slice(&record.via_node.to_le_bytes());
    out[4..8].copy_from_slice(&record.from_edge.to_le_bytes());
    out[8..12].copy_from_slice(&record.to_edge.to_le_bytes());
    out[12..16].copy_from_slice(&record.cost.to_le_bytes());
    out
}

fn decode_record(record: &[u8]) -> Result<TurnCostRecord> {
    anyhow::ensure!(record.len() >= RECORD_SIZE, "Record too small");
    Ok(TurnCostRecord {
        via_node: u32::from_le_bytes(record[0..4].try_into()?),
        from_edge: u32::from_le_bytes(record[4..8].try_into()?),
        to_edge: u32::from_le_bytes(record[8..12].try_into()?),
        cost: f32::from_le_bytes(record[12..16].try_into()?),
    })
}

fn decode(bytes: &[u8]) -> Result<(TurnCostHeader, Vec<TurnCostRecord>)> {
    anyhow::ensure!(
        bytes.len() >= HEADER_SIZE + FOOTER_SIZE,
        "File too small: {} bytes",
        bytes.len()
    );

    let header = &bytes[..HEADER_SIZE];
    let magic = u32::from_le_bytes(header[0..4].try_into()?);
    if magic != MAGIC {
        anyhow::bail!("Invalid magic: expected 0x{:08x}, got 0x{:08x}", MAGIC, magic);
    }
    let version = u16::from_le_bytes(header[4..6].try_into()?);
    if version != VERSION {
        anyhow::bail!("Unsupported version {} (expected {})", version, VERSION);
    }
    let dimension = TurnCostDimension(u16::from_le_bytes(header[6..8].try_into()?));
    let count = u64::from_le_bytes(header[8..16].try_into()?);

    let name_bytes = &header[16..16 + NAME_SIZE];
    let name_len = name_bytes.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE);
    let profile = std::str::from_utf8(&name_bytes[..name_len])
        .context("Profile name is not UTF-8")?
        .to_string();

    let expected_size = (HEADER_SIZE as u64)
        .checked_add(count.checked_mul(RECORD_SIZE as u64).context("Record count overflow")?)
        .and_then(|n| n.checked_add(FOOTER_SIZE as u64))
        .context("Record count overflow")?;
    if bytes.len() as u64 != expected_size {
        anyhow::bail!(
            "Size mismatch: expected {} bytes, got {} bytes",
            expected_size,
            bytes.len()
        );
    }

    let body_end = bytes.len() - FOOTER_SIZE;
    let body = &bytes[HEADER_SIZE..body_end];
    let body_crc = u64::from_le_bytes(bytes[body_end..body_end + 8].try_into()?);
    let file_crc = u64::from_le_bytes(bytes[body_end + 8..].try_into()?);

    if checksum(body) != body_crc {
        anyhow::bail!("Body checksum mismatch");
    }
    if checksum(&bytes[..body_end]) != file_crc {
        anyhow::bail!("File checksum mismatch");
    }

    let records = body
        .chunks_exact(RECORD_SIZE)
        .map(decode_record)
        .collect::<Result<Vec<_>>>()?;

    Ok((
        TurnCostHeader {
            dimension,
            profile,
            count,
        },
        records,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forbidden(via: u32, from: u32, to: u32) -> TurnCostRecord {
        TurnCostRecord {
            via_node: via,
            from_edge: from,
            to_edge: to,
            cost: f32::INFINITY,
        }
    }

    #[test]
    fn test_write_sorts_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TurnCostFile::file_name("freight_diesel"));

        let records = [forbidden(9, 1, 2), forbidden(3, 5, 4), forbidden(3, 4, 5)];
        TurnCostFile::write(&path, "freight_diesel", TurnCostDimension(2), &records).unwrap();

        let (header, read) = TurnCostFile::read(&path).unwrap();
        assert_eq!(header.profile, "freight_diesel");
        assert_eq!(header.dimension, TurnCostDimension(2));
        assert_eq!(header.count, 3);
        assert_eq!(read, vec![forbidden(3, 4, 5), forbidden(3, 5, 4), forbidden(9, 1, 2)]);
        assert!(read.iter().all(|r| r.cost.is_infinite()));
    }

    #[test]
    fn test_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        TurnCostFile::write(&path, "p", TurnCostDimension(0), &[forbidden(1, 2, 3)]).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len as usize, HEADER_SIZE + RECORD_SIZE + FOOTER_SIZE);
    }

    #[test]
    fn test_detects_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        TurnCostFile::write(&path, "p", TurnCostDimension(0), &[forbidden(1, 2, 3)]).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes[HEADER_SIZE] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let err = TurnCostFile::verify(&path).unwrap_err();
        assert!(format!("{err:#}").contains("checksum"), "unexpected error: {err:#}");
    }

    #[test]
    fn test_rejects_wrong_magic_and_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        TurnCostFile::write(&path, "p", TurnCostDimension(0), &[forbidden(1, 2, 3)]).unwrap();
        let bytes = std::fs::read(&path).unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = 0;
        std::fs::write(&path, &bad_magic).unwrap();
        assert!(format!("{:#}", TurnCostFile::verify(&path).unwrap_err()).contains("magic"));

        std::fs::write(&path, &bytes[..bytes.len() - 4]).unwrap();
        assert!(format!("{:#}", TurnCostFile::verify(&path).unwrap_err()).contains("Size mismatch"));
    }

    #[test]
    fn test_long_profile_name_is_truncated() {
        let header = encode_header(&"x".repeat(40), TurnCostDimension(0), 0);
        assert_eq!(header.len(), HEADER_SIZE);
        assert_eq!(truncate_utf8("éé", 3), "é");
    }
}
