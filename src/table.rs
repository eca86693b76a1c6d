pub mod gpt;
pub mod mbr;

use self::mbr::MbrPartition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("Error: Cannot read disk")]
    CannotRead,
    #[error("Error: Invalid disk signature")]
    BadSignature,
}

/// Outcome of classifying the leading sectors of a disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskLayout {
    Mbr {
        entries: Vec<MbrPartition>,
    },
    /// `partition_count` means nothing unless `header_valid` is set.
    GptProtected {
        partition_count: u32,
        header_valid: bool,
    },
    Invalid(InvalidReason),
}
