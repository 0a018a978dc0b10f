/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use snafu::Snafu;

#[allow(clippy::module_inception)]
pub mod daf;
pub mod segment;

pub use daf::DAF;
pub use segment::Segment;

/// DAF records are fixed-size blocks of 1024 bytes.
pub(crate) const RCRD_LEN: u64 = 1024;

/// Random-access byte source a DAF can be read from. Blanket-implemented, so
/// `File`, `Cursor<Vec<u8>>`, and any other seekable reader qualifies.
pub trait DafSource: Read + Seek {}

impl<T: Read + Seek> DafSource for T {}

/// Errors associated with parsing and reading double-precision array files.
#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum DAFError {
    #[snafu(display(
        "file tag `{tag}` matches no supported format (DAF/SPK, NAIF/DAF, DAF/PCK)"
    ))]
    UnsupportedFormat { tag: String },
    #[snafu(display("malformed file header: {reason}"))]
    BadHeader { reason: &'static str },
    #[snafu(display(
        "summary record {record} links back to record {got}, expected {expected}"
    ))]
    SummaryOrderMismatch {
        record: usize,
        got: usize,
        expected: usize,
    },
    #[snafu(display(
        "summary chain ends at record {last_walked} but the header advertises record {advertised}"
    ))]
    BadSummaryChain {
        last_walked: usize,
        advertised: usize,
    },
    #[snafu(display("short read while {action}"))]
    UnexpectedEof { action: &'static str },
    #[snafu(display("control word {value} read while {action} is not an integer"))]
    NotInteger { value: f64, action: &'static str },
    #[snafu(display(
        "reading {len} doubles from word {start} crosses the segment boundary ({available} words)"
    ))]
    OutOfRange {
        start: usize,
        len: usize,
        available: usize,
    },
    #[snafu(display("input/output error while {action}: {kind:?}"))]
    IO {
        action: &'static str,
        kind: ErrorKind,
    },
}

pub(crate) fn seek_to(
    src: &mut dyn DafSource,
    position: u64,
    action: &'static str,
) -> Result<(), DAFError> {
    src.seek(SeekFrom::Start(position))
        .map(|_| ())
        .map_err(|err| DAFError::IO {
            action,
            kind: err.kind(),
        })
}

pub(crate) fn fill(
    src: &mut dyn DafSource,
    buf: &mut [u8],
    action: &'static str,
) -> Result<(), DAFError> {
    src.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => DAFError::UnexpectedEof { action },
        kind => DAFError::IO { action, kind },
    })
}

pub(crate) fn read_f64(src: &mut dyn DafSource, action: &'static str) -> Result<f64, DAFError> {
    let mut buf = [0_u8; 8];
    fill(src, &mut buf, action)?;
    Ok(f64::from_le_bytes(buf))
}

pub(crate) fn read_u32(src: &mut dyn DafSource, action: &'static str) -> Result<u32, DAFError> {
    let mut buf = [0_u8; 4];
    fill(src, &mut buf, action)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_i32(src: &mut dyn DafSource, action: &'static str) -> Result<i32, DAFError> {
    let mut buf = [0_u8; 4];
    fill(src, &mut buf, action)?;
    Ok(i32::from_le_bytes(buf))
}

/// Reads a control word: a double that the format mandates to be an exact
/// integer (record links and descriptor counts).
pub(crate) fn read_control_word(
    src: &mut dyn DafSource,
    action: &'static str,
) -> Result<i64, DAFError> {
    let value = read_f64(src, action)?;
    if value.fract() != 0.0 {
        return NotIntegerSnafu { value, action }.fail();
    }
    Ok(value as i64)
}
