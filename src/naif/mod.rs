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

pub mod daf;

/// The two double-precision array file flavors this crate evaluates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DafFileType {
    /// Spacecraft and planet kernel: rectangular-state segments.
    Spk,
    /// Planetary constants kernel: orientation (Euler angle) segments.
    Pck,
}

impl fmt::Display for DafFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spk => write!(f, "SPK"),
            Self::Pck => write!(f, "PCK"),
        }
    }
}
