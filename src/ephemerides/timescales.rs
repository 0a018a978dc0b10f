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
use crate::constants::SECONDS_PER_DAY;
use crate::NaifId;

impl Ephemeris {
    /// Evaluates a time-scale-difference polynomial (TT minus TDB, under the
    /// tag [`crate::constants::time_scales::TT_TDB`]) and returns the
    /// difference in days scaled by the selected time unit.
    pub fn calculate_time_difference(
        &mut self,
        code: NaifId,
        date1: f64,
        date2: f64,
    ) -> Result<f64, EphemerisError> {
        let index = self
            .theories
            .iter()
            .position(|t| t.object == code && t.is_date_in_range(date1, date2))
            .ok_or(EphemerisError::NoTimeDifferenceTheory { code })?;

        let (coords, _) = self.evaluate_theory(index, date1, date2, false, false)?;
        // The stored polynomial yields seconds.
        Ok(coords.x * self.time_scaling / SECONDS_PER_DAY)
    }
}
