use std::fs;
use std::io::{self, Write};
use std::process::ExitStatus;

use tracing::debug;

use crate::device::{self, BlkDevice, Device, SectorError};
use crate::fallback::{Fallback, FallbackError};
use crate::report::{self, Stream};
use crate::table::gpt::{self, decode_gpt};
use crate::table::mbr::{decode_mbr, MbrDecode};
use crate::table::{DiskLayout, InvalidReason};

#[derive(Debug, thiserror::Error)]
#[error("Error: Device {0} does not exist")]
pub struct DeviceMissing(pub String);

/// How an inspection ended.
#[derive(Debug)]
pub enum Outcome {
    Decoded(DiskLayout),
    Delegated(ExitStatus),
    Missing,
    ToolFailed,
}

/// Reads the partition layout of `path` and writes the report to `out`/`err`.
///
/// When the device cannot be opened for raw reads but exists, the listing is
/// delegated to `fallback` instead.
pub fn inspect(
    path: &str,
    fallback: &Fallback,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Outcome> {
    inspect_with(path, BlkDevice::new, fallback, out, err)
}

pub(crate) fn inspect_with<D, F>(
    path: &str,
    open: F,
    fallback: &Fallback,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Outcome>
where
    D: Device,
    F: FnOnce(&str) -> Result<D, SectorError>,
{
    match open(path) {
        Ok(mut dev) => {
            let layout = classify(&mut dev);
            drop(dev);
            write_report(&layout, out, err)?;
            Ok(Outcome::Decoded(layout))
        }
        Err(SectorError::Open { source, .. }) => {
            debug!(path, error = %source, "raw open failed");
            if fs::metadata(path).is_err() {
                writeln!(out, "{}", DeviceMissing(path.to_string()))?;
                return Ok(Outcome::Missing);
            }
            delegate(path, fallback, out, err)
        }
        Err(e) => {
            debug!(path, error = %e, "device unusable");
            let layout = DiskLayout::Invalid(InvalidReason::CannotRead);
            write_report(&layout, out, err)?;
            Ok(Outcome::Decoded(layout))
        }
    }
}

fn delegate(
    path: &str,
    fallback: &Fallback,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Outcome> {
    match fallback.run(path, out, err) {
        Ok(status) => Ok(Outcome::Delegated(status)),
        Err(e @ FallbackError::Launch { .. }) => {
            debug!(program = fallback.program(), "external tool could not be started");
            writeln!(err, "{}", e)?;
            Ok(Outcome::ToolFailed)
        }
        // our own stream is gone, same as any other failed write
        Err(FallbackError::Output { source, .. }) => Err(source),
    }
}

/// Decodes sector 0, and sector 1 as well when the MBR is only protective.
pub(crate) fn classify<D: Device + ?Sized>(dev: &mut D) -> DiskLayout {
    let sector = match device::read_sector(dev, 0) {
        Ok(sector) => {
            debug!(sector = sector.index(), "decoding MBR");
            sector
        }
        Err(e) => {
            debug!(error = %e, "cannot read MBR");
            return DiskLayout::Invalid(InvalidReason::CannotRead);
        }
    };

    match decode_mbr(&sector) {
        MbrDecode::Layout(layout) => layout,
        MbrDecode::Protective => match device::read_sector(dev, gpt::HEADER_LBA) {
            Ok(header) => {
                debug!(sector = header.index(), "decoding GPT header");
                decode_gpt(&header)
            }
            Err(e) => {
                debug!(error = %e, "cannot read GPT header");
                gpt::unknown()
            }
        },
    }
}

fn write_report(layout: &DiskLayout, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
    let w: &mut dyn Write = match report::stream(layout) {
        Stream::Out => out,
        Stream::Err => err,
    };
    for line in report::render(layout) {
        writeln!(w, "{}", line)?;
    }
    w.flush()
}
