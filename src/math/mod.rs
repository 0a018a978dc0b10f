/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

pub mod chebyshev;
pub mod units;

/// Ordered triple of doubles: a position, a velocity, or Euler angles and
/// their rates depending on the query.
pub type Vector3 = nalgebra::Vector3<f64>;
