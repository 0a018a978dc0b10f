/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use core::fmt::Display;

use snafu::Snafu;

use crate::constants::{KILOMETERS_PER_AU, SECONDS_PER_DAY};

#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum UnitError {
    #[snafu(display("unknown distance unit code {code} (1 = AU, 2 = km)"))]
    UnknownDistanceCode { code: i32 },
    #[snafu(display("unknown time unit code {code} (3 = seconds, 4 = days)"))]
    UnknownTimeCode { code: i32 },
}

/// Distance units supported for rectangular-coordinate output. Kernel files
/// natively store kilometers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    AstronomicalUnit,
    #[default]
    Kilometer,
}

impl DistanceUnit {
    /// Wire code of this unit in query interfaces.
    pub const fn code(&self) -> i32 {
        match self {
            Self::AstronomicalUnit => 1,
            Self::Kilometer => 2,
        }
    }

    /// Factor applied to kilometer-native values to express them in this
    /// unit.
    pub fn scaling_factor(&self) -> f64 {
        match self {
            Self::AstronomicalUnit => 1.0 / KILOMETERS_PER_AU,
            Self::Kilometer => 1.0,
        }
    }
}

impl TryFrom<i32> for DistanceUnit {
    type Error = UnitError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::AstronomicalUnit),
            2 => Ok(Self::Kilometer),
            code => Err(UnitError::UnknownDistanceCode { code }),
        }
    }
}

impl Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AstronomicalUnit => write!(f, "AU"),
            Self::Kilometer => write!(f, "km"),
        }
    }
}

/// Time units dividing velocity and rate outputs. Kernel evaluation is
/// per-day natively.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TimeUnit {
    #[default]
    Second,
    Day,
}

impl TimeUnit {
    /// Wire code of this unit in query interfaces.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Second => 3,
            Self::Day => 4,
        }
    }

    /// Per-day rates are divided by this factor to express them per this
    /// unit.
    pub fn scaling_factor(&self) -> f64 {
        match self {
            Self::Second => SECONDS_PER_DAY,
            Self::Day => 1.0,
        }
    }
}

impl TryFrom<i32> for TimeUnit {
    type Error = UnitError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            3 => Ok(Self::Second),
            4 => Ok(Self::Day),
            code => Err(UnitError::UnknownTimeCode { code }),
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Second => write!(f, "s"),
            Self::Day => write!(f, "day"),
        }
    }
}
