use scroll::{Pread, LE};

use crate::device::RawSector;

use super::DiskLayout;

pub const HEADER_LBA: u64 = 1;
pub const SIGNATURE: [u8; 8] = *b"EFI PART";

/// Primary GPT header. Only the signature and the entry count are acted on.
#[allow(dead_code)]
#[derive(Debug, Pread)]
pub struct GptHeader {
    pub signature: [u8; 8], // check only, "EFI PART"
    revision: u32,          // `unused`
    header_size: u32,       // `unused`
    header_crc32: u32,      // `unused`
    reserved: u32,          // `unused`
    current_lba: u64,       // `unused`
    backup_lba: u64,        // `unused`
    first_usable_lba: u64,  // `unused`
    last_usable_lba: u64,   // `unused`
    disk_guid: [u8; 16],    // `unused`
    entries_lba: u64,       // `unused`
    pub num_entries: u32,   // offset 80
    entry_size: u32,        // `unused`
    entries_crc32: u32,     // `unused`
}

impl GptHeader {
    pub fn new(buf: &[u8]) -> Result<Self, scroll::Error> {
        buf.pread_with(0, LE)
    }

    pub fn is_valid(&self) -> bool {
        self.signature == SIGNATURE
    }
}

/// Result when the protective MBR points at a header that cannot be trusted.
pub fn unknown() -> DiskLayout {
    DiskLayout::GptProtected {
        partition_count: 0,
        header_valid: false,
    }
}

pub fn decode_gpt(sector: &RawSector) -> DiskLayout {
    match GptHeader::new(&sector.bytes()[..]) {
        Ok(header) if header.is_valid() => DiskLayout::GptProtected {
            partition_count: header.num_entries,
            header_valid: true,
        },
        _ => unknown(),
    }
}
