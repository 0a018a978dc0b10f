/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;
use snafu::ensure;

use super::{
    fill, read_control_word, read_f64, read_i32, read_u32, seek_to, BadHeaderSnafu,
    BadSummaryChainSnafu, DAFError, DafSource, Segment, SummaryOrderMismatchSnafu,
    UnsupportedFormatSnafu, RCRD_LEN,
};
use crate::naif::DafFileType;

/// A parsed double-precision array file: the validated header plus every
/// segment discovered by walking the summary records.
#[derive(Debug)]
pub struct DAF {
    pub file_type: DafFileType,
    /// Doubles per descriptor.
    pub nd: usize,
    /// Integers per descriptor, including the two address words.
    pub ni: usize,
    /// The 60-byte internal file name, retained but not interpreted.
    pub internal_name: String,
    pub segments: Vec<Segment>,
}

impl DAF {
    /// Parses the file header and indexes every segment.
    ///
    /// The summary records form a doubly linked list which is walked twice:
    /// once to validate the back links and the advertised terminal record,
    /// once to collect the descriptors.
    pub fn parse(source: Rc<RefCell<dyn DafSource>>) -> Result<Self, DAFError> {
        let mut src = source.borrow_mut();

        seek_to(&mut *src, 0, "positioning to the file record")?;
        let mut tag = [0_u8; 8];
        fill(&mut *src, &mut tag, "reading the format tag")?;
        let tag = String::from_utf8_lossy(&tag).into_owned();
        let file_type = if tag.contains("DAF/SPK") || tag.contains("NAIF/DAF") {
            DafFileType::Spk
        } else if tag.contains("DAF/PCK") {
            DafFileType::Pck
        } else {
            return UnsupportedFormatSnafu { tag }.fail();
        };

        let nd = read_u32(&mut *src, "reading the descriptor double count")? as usize;
        let ni = read_u32(&mut *src, "reading the descriptor integer count")? as usize;
        ensure!(
            ni >= 2,
            BadHeaderSnafu {
                reason: "descriptor integer count below 2"
            }
        );

        let mut name = [0_u8; 60];
        fill(&mut *src, &mut name, "reading the internal file name")?;
        let internal_name = String::from_utf8_lossy(&name).trim().to_string();

        let first_summary = read_u32(&mut *src, "reading the first summary record number")? as usize;
        let last_summary = read_u32(&mut *src, "reading the last summary record number")? as usize;

        // First pass: check every back link and count the descriptors.
        let mut record = first_summary;
        let mut previous = 0_usize;
        let mut n_descriptors = 0_usize;
        while record != 0 {
            seek_to(
                &mut *src,
                (record as u64 - 1) * RCRD_LEN,
                "positioning to a summary record",
            )?;
            let next = read_control_word(&mut *src, "reading the next-record link")?;
            let prev = read_control_word(&mut *src, "reading the previous-record link")?;
            let count = read_control_word(&mut *src, "reading the descriptor count")?;
            ensure!(
                prev as usize == previous,
                SummaryOrderMismatchSnafu {
                    record,
                    got: prev as usize,
                    expected: previous,
                }
            );
            n_descriptors += count as usize;
            previous = record;
            record = next as usize;
        }
        ensure!(
            previous == last_summary,
            BadSummaryChainSnafu {
                last_walked: previous,
                advertised: last_summary,
            }
        );

        // Second pass: collect the descriptors into segment handles.
        let used_ints = ni - 2;
        let mut segments = Vec::with_capacity(n_descriptors);
        let mut record = first_summary;
        while record != 0 {
            seek_to(
                &mut *src,
                (record as u64 - 1) * RCRD_LEN,
                "positioning to a summary record",
            )?;
            let next = read_control_word(&mut *src, "reading the next-record link")?;
            read_f64(&mut *src, "skipping the previous-record link")?;
            let count = read_control_word(&mut *src, "reading the descriptor count")?;

            for _ in 0..count {
                let mut double_params = Vec::with_capacity(nd);
                for _ in 0..nd {
                    double_params.push(read_f64(&mut *src, "reading a descriptor double")?);
                }
                let mut int_params = Vec::with_capacity(used_ints);
                for _ in 0..used_ints {
                    int_params.push(read_i32(&mut *src, "reading a descriptor integer")?);
                }
                let initial = read_u32(&mut *src, "reading the initial segment address")? as usize;
                let final_addr = read_u32(&mut *src, "reading the final segment address")? as usize;
                if nd % 2 != 0 {
                    let mut pad = [0_u8; 4];
                    fill(&mut *src, &mut pad, "skipping descriptor padding")?;
                }
                ensure!(
                    initial >= 1 && final_addr >= initial,
                    BadHeaderSnafu {
                        reason: "descriptor segment addresses out of order"
                    }
                );

                segments.push(Segment::new(
                    initial - 1,
                    final_addr - initial + 1,
                    double_params,
                    int_params,
                    Rc::clone(&source),
                ));
            }
            record = next as usize;
        }

        trace!(
            "{file_type} `{internal_name}`: {} segments indexed",
            segments.len()
        );

        Ok(Self {
            file_type,
            nd,
            ni,
            internal_name,
            segments,
        })
    }
}
