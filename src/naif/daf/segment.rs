/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use super::{fill, seek_to, DAFError, DafSource, OutOfRangeSnafu};
use crate::DBL_SIZE;

/// One contiguous ephemeris block of a DAF, addressed in double-words, with
/// the double and integer metadata of its descriptor. Immutable once built;
/// keeps the underlying byte source alive for as long as any evaluator
/// references it.
pub struct Segment {
    /// Word offset of the segment payload within the file.
    offset: usize,
    /// Payload length in double-words.
    length: usize,
    double_params: Vec<f64>,
    int_params: Vec<i32>,
    source: Rc<RefCell<dyn DafSource>>,
}

impl Segment {
    pub(crate) fn new(
        offset: usize,
        length: usize,
        double_params: Vec<f64>,
        int_params: Vec<i32>,
        source: Rc<RefCell<dyn DafSource>>,
    ) -> Self {
        Self {
            offset,
            length,
            double_params,
            int_params,
            source,
        }
    }

    /// Payload length in double-words.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The descriptor's double metadata (conventionally the covered epoch
    /// span in seconds past J2000).
    pub fn double_parameters(&self) -> &[f64] {
        &self.double_params
    }

    /// The descriptor's integer metadata, excluding the two address words.
    pub fn int_parameters(&self) -> &[i32] {
        &self.int_params
    }

    /// Reads `len` little-endian doubles starting `start` words into the
    /// segment payload.
    pub fn read_range(&self, start: usize, len: usize) -> Result<Vec<f64>, DAFError> {
        if start + len > self.length {
            return OutOfRangeSnafu {
                start,
                len,
                available: self.length,
            }
            .fail();
        }

        let mut source = self.source.borrow_mut();
        seek_to(
            &mut *source,
            ((self.offset + start) * DBL_SIZE) as u64,
            "positioning to segment data",
        )?;
        let mut buf = vec![0_u8; len * DBL_SIZE];
        fill(&mut *source, &mut buf, "reading segment data")?;

        let mut values = Vec::with_capacity(len);
        for chunk in buf.chunks_exact(DBL_SIZE) {
            let mut word = [0_u8; DBL_SIZE];
            word.copy_from_slice(chunk);
            values.push(f64::from_le_bytes(word));
        }
        Ok(values)
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("double_params", &self.double_params)
            .field("int_params", &self.int_params)
            .finish()
    }
}
