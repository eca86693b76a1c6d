use scroll::{Pread, LE};

use crate::device::RawSector;

use super::{DiskLayout, InvalidReason};

pub const TABLE_OFFSET: usize = 446;
pub const ENTRY_SIZE: usize = 16;
pub const ENTRY_COUNT: usize = 4;
pub const BOOT_SIG_OFFSET: usize = 510;
pub const BOOT_SIG: u16 = 0xAA55;

pub const STATUS_ACTIVE: u8 = 0x80;
pub const TYPE_EMPTY: u8 = 0x00;
pub const TYPE_GPT_PROTECTIVE: u8 = 0xEE;

#[allow(dead_code)]
#[derive(Debug, Pread)]
pub struct PartitionEntry {
    pub status: u8,
    first_chs: [u8; 3], // `unused`
    pub typ: u8,
    last_chs: [u8; 3], // `unused`
    pub start_lba: u32, // `unused`
    pub nsecs: u32,
}

impl PartitionEntry {
    pub fn is_present(&self) -> bool {
        self.typ != TYPE_EMPTY
    }

    pub fn is_protective(&self) -> bool {
        self.typ == TYPE_GPT_PROTECTIVE
    }
}

/// A present primary partition, `index` counts slots from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbrPartition {
    pub index: u8,
    pub bootable: bool,
    pub typ: u8,
    pub nsecs: u32,
}

impl MbrPartition {
    fn from_entry(slot: usize, entry: &PartitionEntry) -> Self {
        MbrPartition {
            index: slot as u8 + 1,
            // anything other than 0x80 counts as inactive, including garbage
            bootable: entry.status == STATUS_ACTIVE,
            typ: entry.typ,
            nsecs: entry.nsecs,
        }
    }

    /// Size in MiB assuming 512-byte sectors, truncated.
    pub fn size_mb(&self) -> u32 {
        self.nsecs / 2048
    }
}

/// What sector 0 turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub enum MbrDecode {
    Layout(DiskLayout),
    /// A 0xEE entry was found, the GPT header has to be looked at instead.
    Protective,
}

fn entries(buf: &[u8]) -> Result<Vec<PartitionEntry>, scroll::Error> {
    (0..ENTRY_COUNT)
        .map(|i| -> Result<PartitionEntry, scroll::Error> {
            buf.pread_with(TABLE_OFFSET + i * ENTRY_SIZE, LE)
        })
        .collect()
}

pub fn decode_mbr(sector: &RawSector) -> MbrDecode {
    let buf = &sector.bytes()[..];

    let boot_sig: Result<u16, scroll::Error> = buf.pread_with(BOOT_SIG_OFFSET, LE);
    let boot_sig = match boot_sig {
        Ok(sig) => sig,
        Err(_) => return MbrDecode::Layout(DiskLayout::Invalid(InvalidReason::CannotRead)),
    };
    if boot_sig != BOOT_SIG {
        return MbrDecode::Layout(DiskLayout::Invalid(InvalidReason::BadSignature));
    }

    let entries = match entries(buf) {
        Ok(entries) => entries,
        Err(_) => return MbrDecode::Layout(DiskLayout::Invalid(InvalidReason::CannotRead)),
    };

    if entries.iter().any(PartitionEntry::is_protective) {
        return MbrDecode::Protective;
    }

    let partitions = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_present())
        .map(|(slot, e)| MbrPartition::from_entry(slot, e))
        .collect();
    MbrDecode::Layout(DiskLayout::Mbr {
        entries: partitions,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::device::SECTOR_SIZE;

    pub(crate) fn blank_mbr() -> [u8; SECTOR_SIZE] {
        let mut buf = [0u8; SECTOR_SIZE];
        buf[510] = 0x55;
        buf[511] = 0xAA;
        buf
    }

    pub(crate) fn set_entry(
        buf: &mut [u8; SECTOR_SIZE],
        slot: usize,
        status: u8,
        typ: u8,
        nsecs: u32,
    ) {
        let off = TABLE_OFFSET + slot * ENTRY_SIZE;
        buf[off] = status;
        buf[off + 4] = typ;
        buf[off + 8..off + 12].copy_from_slice(&63u32.to_le_bytes());
        buf[off + 12..off + 16].copy_from_slice(&nsecs.to_le_bytes());
    }

    fn decode(buf: [u8; SECTOR_SIZE]) -> MbrDecode {
        decode_mbr(&RawSector::new(0, buf))
    }

    #[test]
    fn bad_signature_wins_over_content() {
        let mut buf = blank_mbr();
        set_entry(&mut buf, 0, 0x80, 0x83, 4096);
        set_entry(&mut buf, 1, 0x00, 0xEE, 4096);
        buf[511] = 0x00;

        assert_eq!(
            decode(buf),
            MbrDecode::Layout(DiskLayout::Invalid(InvalidReason::BadSignature))
        );
    }

    #[test]
    fn reversed_signature_is_rejected() {
        let mut buf = blank_mbr();
        buf[510] = 0xAA;
        buf[511] = 0x55;

        assert_eq!(
            decode(buf),
            MbrDecode::Layout(DiskLayout::Invalid(InvalidReason::BadSignature))
        );
    }

    #[test]
    fn empty_table_is_valid() {
        assert_eq!(
            decode(blank_mbr()),
            MbrDecode::Layout(DiskLayout::Mbr { entries: vec![] })
        );
    }

    #[test]
    fn single_entry_keeps_its_slot_number() {
        let mut buf = blank_mbr();
        set_entry(&mut buf, 1, 0x00, 0x83, 2048);

        let MbrDecode::Layout(DiskLayout::Mbr { entries }) = decode(buf) else {
            panic!("expected an MBR layout");
        };
        assert_eq!(
            entries,
            vec![MbrPartition {
                index: 2,
                bootable: false,
                typ: 0x83,
                nsecs: 2048,
            }]
        );
        assert_eq!(entries[0].size_mb(), 1);
    }

    #[test]
    fn entries_come_in_slot_order() {
        let mut buf = blank_mbr();
        set_entry(&mut buf, 3, 0x00, 0x07, 10_000);
        set_entry(&mut buf, 0, 0x80, 0x0C, 4095);

        let MbrDecode::Layout(DiskLayout::Mbr { entries }) = decode(buf) else {
            panic!("expected an MBR layout");
        };
        let slots: Vec<u8> = entries.iter().map(|e| e.index).collect();
        assert_eq!(slots, vec![1, 4]);
        assert!(entries[0].bootable);
        assert_eq!(entries[0].size_mb(), 1);
        assert_eq!(entries[1].size_mb(), 4);
    }

    #[test]
    fn odd_status_byte_is_not_bootable() {
        let mut buf = blank_mbr();
        set_entry(&mut buf, 0, 0x7F, 0x83, 2048);
        set_entry(&mut buf, 1, 0x81, 0x83, 2048);

        let MbrDecode::Layout(DiskLayout::Mbr { entries }) = decode(buf) else {
            panic!("expected an MBR layout");
        };
        assert!(entries.iter().all(|e| !e.bootable));
    }

    #[test]
    fn sector_count_is_little_endian() {
        let mut buf = blank_mbr();
        set_entry(&mut buf, 0, 0x00, 0x83, 0x0100_0000);

        let MbrDecode::Layout(DiskLayout::Mbr { entries }) = decode(buf) else {
            panic!("expected an MBR layout");
        };
        assert_eq!(entries[0].nsecs, 0x0100_0000);
        assert_eq!(entries[0].size_mb(), 8192);
    }

    #[test]
    fn protective_marker_in_any_slot_hides_the_table() {
        for slot in 0..ENTRY_COUNT {
            let mut buf = blank_mbr();
            for other in 0..ENTRY_COUNT {
                set_entry(&mut buf, other, 0x80, 0x83, 2048);
            }
            set_entry(&mut buf, slot, 0x00, TYPE_GPT_PROTECTIVE, u32::MAX);

            assert_eq!(decode(buf), MbrDecode::Protective, "slot {}", slot);
        }
    }
}
