/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use super::{Ephemeris, EphemerisError};
use crate::constants::celestial_objects::{
    EARTH, EARTH_MOON_BARYCENTER, MERCURY, MOON, SOLAR_SYSTEM_BARYCENTER, SUN,
};
use crate::math::Vector3;
use crate::NaifId;

impl Ephemeris {
    /// Computes the rectangular position of `object` with respect to `basis`
    /// at the two-part Julian date `date1 + date2`, plus its velocity per day
    /// when `with_velocity` is set. Positions come back in the selected
    /// distance unit.
    ///
    /// When no theory stores the pair directly, the answer is composed from
    /// the segments that are loaded: Earth and Moon states are rewritten
    /// through the Earth-Moon barycenter, reversed pairs are negated, and any
    /// remaining pair is taken as the difference of the two barycentric
    /// states. [`EphemerisError::NoTheory`] is raised when no composition
    /// covers the request.
    pub fn calculate_rectangular_coords(
        &mut self,
        object: NaifId,
        basis: NaifId,
        date1: f64,
        date2: f64,
        with_velocity: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        if object == basis {
            return Ok((Vector3::zeros(), Vector3::zeros()));
        }

        if object == EARTH && basis == SOLAR_SYSTEM_BARYCENTER {
            if !self.have_earth_wrt_ssb && self.have_earth_wrt_emb && self.have_emb_wrt_ssb {
                return self.combine_two(
                    (EARTH, EARTH_MOON_BARYCENTER),
                    (EARTH_MOON_BARYCENTER, SOLAR_SYSTEM_BARYCENTER),
                    1.0,
                    1.0,
                    date1,
                    date2,
                    with_velocity,
                );
            }
        } else if object == MOON && basis == SOLAR_SYSTEM_BARYCENTER {
            if self.have_moon_wrt_earth && self.have_earth_wrt_ssb {
                return self.combine_two(
                    (MOON, EARTH),
                    (EARTH_MOON_BARYCENTER, SOLAR_SYSTEM_BARYCENTER),
                    1.0,
                    1.0,
                    date1,
                    date2,
                    with_velocity,
                );
            } else if self.have_moon_wrt_earth && self.have_emb_wrt_ssb {
                return self.combine_two(
                    (MOON, EARTH_MOON_BARYCENTER),
                    (EARTH_MOON_BARYCENTER, SOLAR_SYSTEM_BARYCENTER),
                    1.0,
                    1.0,
                    date1,
                    date2,
                    with_velocity,
                );
            } else if self.have_moon_wrt_earth && self.have_earth_wrt_emb && self.have_emb_wrt_ssb
            {
                return self.combine_three(
                    (MOON, EARTH),
                    (EARTH, EARTH_MOON_BARYCENTER),
                    (EARTH_MOON_BARYCENTER, SOLAR_SYSTEM_BARYCENTER),
                    1.0,
                    1.0,
                    1.0,
                    date1,
                    date2,
                    with_velocity,
                );
            }
        } else if object == MOON && basis == EARTH {
            if !self.have_moon_wrt_earth && self.have_moon_wrt_emb && self.have_earth_wrt_emb {
                return self.combine_two(
                    (MOON, EARTH_MOON_BARYCENTER),
                    (EARTH, EARTH_MOON_BARYCENTER),
                    1.0,
                    -1.0,
                    date1,
                    date2,
                    with_velocity,
                );
            }
        } else if (object == EARTH && basis == EARTH_MOON_BARYCENTER)
            || (object == MOON && basis == EARTH_MOON_BARYCENTER)
            || (object >= MERCURY && object <= SUN && basis == SOLAR_SYSTEM_BARYCENTER)
        {
            // Only a direct theory can serve these pairs.
        } else if (object == SOLAR_SYSTEM_BARYCENTER && basis >= MERCURY && basis <= SUN)
            || (object == SOLAR_SYSTEM_BARYCENTER && (basis == MOON || basis == EARTH))
            || (object == EARTH && basis == MOON)
        {
            let (position, velocity) =
                self.calculate_rectangular_coords(basis, object, date1, date2, with_velocity)?;
            return Ok((-position, -velocity));
        } else if object != SOLAR_SYSTEM_BARYCENTER && basis != SOLAR_SYSTEM_BARYCENTER {
            let (position, velocity) = self.calculate_rectangular_coords(
                object,
                SOLAR_SYSTEM_BARYCENTER,
                date1,
                date2,
                with_velocity,
            )?;
            let (basis_position, basis_velocity) = self.calculate_rectangular_coords(
                basis,
                SOLAR_SYSTEM_BARYCENTER,
                date1,
                date2,
                with_velocity,
            )?;
            return Ok((position - basis_position, velocity - basis_velocity));
        }

        let index = self.find_theory(object, basis, date1, date2)?;
        self.evaluate_theory(index, date1, date2, true, with_velocity)
    }

    /// Same as [`Self::calculate_rectangular_coords`], with the velocity
    /// divided by the time scaling factor so it is expressed per selected
    /// time unit.
    pub fn calculate_rectangular_coords_and_scale_velocity(
        &mut self,
        object: NaifId,
        basis: NaifId,
        date1: f64,
        date2: f64,
        with_velocity: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let (position, mut velocity) =
            self.calculate_rectangular_coords(object, basis, date1, date2, with_velocity)?;
        if with_velocity {
            velocity /= self.time_scaling;
        }
        Ok((position, velocity))
    }

    /// Linear combination of two pairs: `factor1 * first + factor2 * second`.
    #[allow(clippy::too_many_arguments)]
    fn combine_two(
        &mut self,
        first: (NaifId, NaifId),
        second: (NaifId, NaifId),
        factor1: f64,
        factor2: f64,
        date1: f64,
        date2: f64,
        with_velocity: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let (position1, velocity1) =
            self.calculate_rectangular_coords(first.0, first.1, date1, date2, with_velocity)?;
        let (position2, velocity2) =
            self.calculate_rectangular_coords(second.0, second.1, date1, date2, with_velocity)?;
        Ok((
            position1 * factor1 + position2 * factor2,
            velocity1 * factor1 + velocity2 * factor2,
        ))
    }

    /// Linear combination of three pairs.
    #[allow(clippy::too_many_arguments)]
    fn combine_three(
        &mut self,
        first: (NaifId, NaifId),
        second: (NaifId, NaifId),
        third: (NaifId, NaifId),
        factor1: f64,
        factor2: f64,
        factor3: f64,
        date1: f64,
        date2: f64,
        with_velocity: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let (position1, velocity1) =
            self.calculate_rectangular_coords(first.0, first.1, date1, date2, with_velocity)?;
        let (position2, velocity2) =
            self.calculate_rectangular_coords(second.0, second.1, date1, date2, with_velocity)?;
        let (position3, velocity3) =
            self.calculate_rectangular_coords(third.0, third.1, date1, date2, with_velocity)?;
        Ok((
            position1 * factor1 + position2 * factor2 + position3 * factor3,
            velocity1 * factor1 + velocity2 * factor2 + velocity3 * factor3,
        ))
    }
}
