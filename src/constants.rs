/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

/// Number of kilometers in one astronomical unit (IAU 2012 definition).
///
/// EPM ephemerides older than EPM2015 carry their own astronomical unit; the
/// evaluator honors the file-local value when its distance scale is within
/// 1000 km of this constant.
pub const KILOMETERS_PER_AU: f64 = 149_597_870.7;

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of the J2000 reference epoch (2000-01-01 12:00 TT).
pub const JD_J2000: f64 = 2_451_545.0;

/// Highest Chebyshev polynomial degree a loaded segment may declare.
pub const MAX_CHEBYSHEV_DEGREE: usize = 20;

pub mod celestial_objects {
    use crate::NaifId;

    pub const SOLAR_SYSTEM_BARYCENTER: NaifId = 0;
    pub const MERCURY: NaifId = 1;
    pub const VENUS: NaifId = 2;
    pub const EARTH_MOON_BARYCENTER: NaifId = 3;
    pub const MARS_BARYCENTER: NaifId = 4;
    pub const JUPITER_BARYCENTER: NaifId = 5;
    pub const SATURN_BARYCENTER: NaifId = 6;
    pub const URANUS_BARYCENTER: NaifId = 7;
    pub const NEPTUNE_BARYCENTER: NaifId = 8;
    pub const PLUTO_BARYCENTER: NaifId = 9;
    pub const SUN: NaifId = 10;
    pub const MOON: NaifId = 301;
    pub const EARTH: NaifId = 399;

    pub const fn celestial_name_from_id(id: NaifId) -> Option<&'static str> {
        match id {
            SOLAR_SYSTEM_BARYCENTER => Some("Solar System Barycenter"),
            MERCURY => Some("Mercury"),
            VENUS => Some("Venus"),
            EARTH_MOON_BARYCENTER => Some("Earth-Moon Barycenter"),
            MARS_BARYCENTER => Some("Mars Barycenter"),
            JUPITER_BARYCENTER => Some("Jupiter Barycenter"),
            SATURN_BARYCENTER => Some("Saturn Barycenter"),
            URANUS_BARYCENTER => Some("Uranus Barycenter"),
            NEPTUNE_BARYCENTER => Some("Neptune Barycenter"),
            PLUTO_BARYCENTER => Some("Pluto Barycenter"),
            SUN => Some("Sun"),
            MOON => Some("Moon"),
            EARTH => Some("Earth"),
            _ => None,
        }
    }
}

pub mod time_scales {
    use crate::NaifId;

    /// Tag of the TT−TDB time-scale-difference polynomial carried by some
    /// SPK-shaped files.
    pub const TT_TDB: NaifId = 1_000_000_001;
}

/// Lunar principal-axes frames as numbered by the various ephemeris
/// producers.
pub mod lunar_frames {
    use crate::NaifId;

    pub const MOON_PA_DE403: NaifId = 31_002;
    pub const MOON_PA_DE421: NaifId = 31_006;
    pub const MOON_PA_DE430: NaifId = 32_006;
    pub const MOON_PA_INPOP: NaifId = 1_900_301;
    pub const MOON_PA_EPM2011: NaifId = 1_800_301;
    pub const MOON_PA_EPM2015: NaifId = 1_800_302;
    pub const MOON_PA_EPM2017: NaifId = 1_800_303;

    pub const fn lunar_frame_name_from_id(id: NaifId) -> Option<&'static str> {
        match id {
            MOON_PA_DE403 => Some("Moon principal axes (DE403)"),
            MOON_PA_DE421 => Some("Moon principal axes (DE421)"),
            MOON_PA_DE430 => Some("Moon principal axes (DE430)"),
            MOON_PA_INPOP => Some("Moon principal axes (INPOP)"),
            MOON_PA_EPM2011 => Some("Moon principal axes (EPM2011)"),
            MOON_PA_EPM2015 => Some("Moon principal axes (EPM2015)"),
            MOON_PA_EPM2017 => Some("Moon principal axes (EPM2017)"),
            _ => None,
        }
    }
}
