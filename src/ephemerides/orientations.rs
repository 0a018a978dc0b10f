/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use log::error;

use super::{Ephemeris, EphemerisError};
use crate::math::Vector3;
use crate::naif::DafFileType;
use crate::NaifId;

impl Ephemeris {
    /// Computes the Euler angles of the body-fixed `frame` in radians, plus
    /// their rates per selected time unit when `with_rates` is set.
    ///
    /// When `frame` is 0 and exactly one orientation theory is active at the
    /// date, that theory answers the query; several distinct active
    /// orientation objects make frame 0 ambiguous.
    pub fn calculate_euler_angles(
        &mut self,
        frame: NaifId,
        date1: f64,
        date2: f64,
        with_rates: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let mut chosen = None;
        let mut fallback: Option<usize> = None;
        let mut ambiguous = false;
        for (index, theory) in self.theories.iter().enumerate() {
            if !theory.is_date_in_range(date1, date2) {
                continue;
            }
            if theory.object == frame {
                chosen = Some(index);
                break;
            }
            if frame == 0 && theory.file_type == DafFileType::Pck {
                match fallback {
                    None => fallback = Some(index),
                    Some(first) if self.theories[first].object != theory.object => {
                        ambiguous = true;
                    }
                    Some(_) => {}
                }
            }
        }

        let index = match chosen {
            Some(index) => index,
            None if ambiguous => {
                error!("several orientation theories active, frame {frame} is ambiguous");
                return Err(EphemerisError::AmbiguousOrientation { frame });
            }
            None => fallback.ok_or_else(|| {
                error!("no orientation theory for frame {frame} at {}", date1 + date2);
                EphemerisError::NoOrientationTheory { frame }
            })?,
        };

        let (angles, mut rates) = self.evaluate_theory(index, date1, date2, false, with_rates)?;
        if with_rates {
            rates /= self.time_scaling;
        }
        Ok((angles, rates))
    }
}
