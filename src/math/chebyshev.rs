/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Chebyshev polynomials of the first kind and their analytic derivatives
//! and antiderivatives, evaluated by recurrence at a normalized position.

/// Evaluates `T_0 .. T_{count-1}` at `x`, the normalized position within an
/// interpolation interval, in [-1, 1].
pub fn polynomials(count: usize, x: f64) -> Vec<f64> {
    let mut values = vec![0.0; count];
    if let Some(first) = values.first_mut() {
        *first = 1.0;
    }
    if count > 1 {
        values[1] = x;
    }
    for i in 2..count {
        values[i] = 2.0 * x * values[i - 1] - values[i - 2];
    }
    values
}

/// Evaluates the derivatives `dT_i/dx` for `i` in `0 .. count-1`.
///
/// `polys` must hold at least `count` values from [`polynomials`] at the
/// same `x`.
pub fn derivatives(count: usize, x: f64, polys: &[f64]) -> Vec<f64> {
    let mut values = vec![0.0; count];
    if count > 1 {
        values[1] = 1.0;
    }
    for i in 2..count {
        values[i] = 2.0 * x * values[i - 1] + 2.0 * polys[i - 1] - values[i - 2];
    }
    values
}

/// Evaluates the antiderivatives `A_i` of `T_i`, normalized so that
/// `A_i(0) = 0`, for `i` in `0 .. count-1`.
///
/// `polys` must hold at least `count + 1` values from [`polynomials`] at
/// the same `x`: the closed form for `A_{count-1}` reaches into `T_count`.
pub fn antiderivatives(count: usize, x: f64, polys: &[f64]) -> Vec<f64> {
    let mut values = vec![0.0; count];
    if let Some(first) = values.first_mut() {
        *first = x;
    }
    if count > 1 {
        values[1] = (polys[2] + polys[0]) * 0.25;
    }
    for i in 2..count {
        values[i] = 0.5 * (polys[i + 1] / (i + 1) as f64 - polys[i - 1] / (i - 1) as f64);
    }
    // The closed form leaves a nonzero value at x = 0 for the odd indices;
    // fold in the offsets that cancel it, alternating sign starting negative.
    let mut negative = true;
    let mut step = 1;
    let mut i = 3;
    while i < count {
        let offset = 0.25 / step as f64 + 0.25 / (step + 1) as f64;
        values[i] += if negative { -offset } else { offset };
        negative = !negative;
        step += 1;
        i += 2;
    }
    values
}
