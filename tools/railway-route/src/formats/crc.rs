///! CRC-64 checksums shared by the binary formats

use crc::{Crc, CRC_64_GO_ISO};

/// CRC-64/GO-ISO, the checksum of every railway artifact footer
pub static CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

pub fn checksum(data: &[u8]) -> u64 {
    CRC64.checksum(data)
}

/// Running checksum over data written in pieces
pub struct Digest {
    inner: crc::Digest<'static, u64>,
}

impl Digest {
    pub fn new() -> Self {
        Self {
            inner: CRC64.digest(),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    pub fn finalize(self) -> u64 {
        self.inner.finalize()
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_updates_match_one_shot() {
        let record = [7u8, 0, 0, 0, 3, 0, 0, 0, 9, 0, 0, 0, 0, 0, 0x80, 0x7f];
        let mut digest = Digest::new();
        digest.update(&record[..4]);
        digest.update(&record[4..]);
        assert_eq!(digest.finalize(), checksum(&record));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Digest::default().finalize(), checksum(&[]));
    }
}
