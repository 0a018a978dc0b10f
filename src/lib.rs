#![doc = include_str!("../README.md")]
/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

extern crate hifitime;
extern crate log;

pub mod constants;
pub mod ephemerides;
pub mod math;
pub mod naif;

pub mod prelude {
    pub use crate::constants::celestial_objects::*;
    pub use crate::ephemerides::{Ephemeris, EphemerisError};
    pub use crate::math::units::{DistanceUnit, TimeUnit};
    pub use crate::math::Vector3;
    pub use crate::naif::daf::{DafSource, DAF};
    pub use std::fs::File;
}

/// Defines the number of bytes in a double (prevents magic numbers)
pub(crate) const DBL_SIZE: usize = 8;

/// Integer code identifying a body, a body-fixed frame, or a time-scale
/// difference, following the numbering of the NAIF kernel formats.
pub type NaifId = i32;
