use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

use tracing::debug;

pub const SECTOR_SIZE: usize = 512;

pub(crate) trait Device: Seek + Read {}

impl<T: AsRef<[u8]>> Device for io::Cursor<T> {}

#[derive(Debug, thiserror::Error)]
pub enum SectorError {
    #[error("cannot open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("short read at sector {index}: got {read} of 512 bytes")]
    ShortRead { index: u64, read: usize },
    #[error("i/o error at sector {index}: {source}")]
    Io { index: u64, source: io::Error },
}

/// One sector as it was read from the device.
#[derive(Debug, Clone)]
pub struct RawSector {
    index: u64,
    bytes: [u8; SECTOR_SIZE],
}

impl RawSector {
    pub fn new(index: u64, bytes: [u8; SECTOR_SIZE]) -> Self {
        RawSector { index, bytes }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn bytes(&self) -> &[u8; SECTOR_SIZE] {
        &self.bytes
    }
}

/// A device opened read-only. The handle is released when this is dropped.
#[derive(Debug)]
pub struct BlkDevice {
    file: File,
}

impl BlkDevice {
    pub fn new(path: &str) -> Result<Self, SectorError> {
        let file = File::options()
            .create(false)
            .write(false)
            .truncate(false)
            .read(true)
            .open(path)
            .map_err(|source| SectorError::Open {
                path: path.to_string(),
                source,
            })?;
        Ok(BlkDevice { file })
    }
}

impl Read for BlkDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for BlkDevice {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Device for BlkDevice {}

/// Reads sector `index` of a device that is already open.
pub(crate) fn read_sector<D: Device + ?Sized>(
    device: &mut D,
    index: u64,
) -> Result<RawSector, SectorError> {
    let io_err = |source| SectorError::Io { index, source };

    device
        .seek(SeekFrom::Start(index * SECTOR_SIZE as u64))
        .map_err(io_err)?;

    let mut bytes = [0u8; SECTOR_SIZE];
    let mut read = 0;
    while read < SECTOR_SIZE {
        match device.read(&mut bytes[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err(e)),
        }
    }
    if read < SECTOR_SIZE {
        return Err(SectorError::ShortRead { index, read });
    }

    debug!(index, "sector read");
    Ok(RawSector::new(index, bytes))
}
