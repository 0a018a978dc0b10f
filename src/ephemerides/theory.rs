/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use log::trace;
use snafu::{ensure, ResultExt, Snafu};

use crate::constants::{JD_J2000, KILOMETERS_PER_AU, MAX_CHEBYSHEV_DEGREE, SECONDS_PER_DAY};
use crate::math::{chebyshev, Vector3};
use crate::naif::daf::{DAFError, Segment};
use crate::naif::DafFileType;
use crate::NaifId;

/// Errors raised while converting a raw segment into an evaluator.
#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum TheoryError {
    #[snafu(display("descriptor carries {got} integers but this file type needs {need}"))]
    ShortDescriptor { need: usize, got: usize },
    #[snafu(display("segment of {words} words is too short to carry a trailer"))]
    TruncatedSegment { words: usize },
    #[snafu(display("representation code {code} is not supported (2 = position, 20 = velocity)"))]
    UnsupportedRepresentation { code: i32 },
    #[snafu(display("record size {r_size} is invalid for the {representation:?} representation"))]
    BadRecordSize {
        r_size: usize,
        representation: Representation,
    },
    #[snafu(display("polynomial degree {degree} exceeds the supported maximum"))]
    DegreeLimit { degree: usize },
    #[snafu(display("while decoding the segment trailer: {source}"))]
    Trailer { source: DAFError },
}

/// How a segment stores its Chebyshev coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Representation {
    /// Position polynomials; velocity follows by analytic differentiation.
    PositionOnly,
    /// Velocity polynomials plus one integration constant per component;
    /// position follows by analytic antidifferentiation.
    VelocityOnly,
}

impl Representation {
    pub(crate) fn from_code(code: i32) -> Result<Self, TheoryError> {
        match code {
            2 => Ok(Self::PositionOnly),
            20 => Ok(Self::VelocityOnly),
            code => UnsupportedRepresentationSnafu { code }.fail(),
        }
    }
}

/// Per-query scaling already resolved by the facade before it dispatches to
/// a theory.
#[derive(Copy, Clone, Debug)]
pub(crate) struct EvalOptions {
    pub scale_distance: bool,
    pub with_velocity: bool,
    /// Facade-level distance factor (1 for km, 1/[`KILOMETERS_PER_AU`] for AU).
    pub distance_scaling: f64,
    /// Whether the caller selected astronomical units for distances.
    pub au_output: bool,
}

/// Evaluator built on one segment: decoded trailer metadata, interval
/// lookup, and a single-interval coefficient cache.
#[derive(Debug)]
pub struct Theory {
    segment: Segment,
    pub object: NaifId,
    /// Reference body of the stored states; 0 for orientation theories.
    pub basis: NaifId,
    pub(crate) file_type: DafFileType,
    representation: Representation,
    /// Integer part of the reference epoch, in Julian days.
    epoch_days: f64,
    /// Fractional part of the reference epoch, in days.
    epoch_frac: f64,
    /// Interval length in days.
    interval_len: f64,
    /// Doubles per interval record.
    r_size: usize,
    n_intervals: usize,
    degree: usize,
    d_scale: f64,
    t_scale: f64,
    cached_interval: Option<usize>,
    cached_coefficients: Vec<f64>,
}

impl Theory {
    /// Decodes the segment trailer and builds the evaluator.
    pub fn from_segment(segment: Segment, file_type: DafFileType) -> Result<Self, TheoryError> {
        let ints = segment.int_parameters();
        let (object, basis, code) = match file_type {
            DafFileType::Spk => {
                ensure!(
                    ints.len() >= 4,
                    ShortDescriptorSnafu {
                        need: 4_usize,
                        got: ints.len()
                    }
                );
                (ints[0], ints[1], ints[3])
            }
            DafFileType::Pck => {
                ensure!(
                    ints.len() >= 3,
                    ShortDescriptorSnafu {
                        need: 3_usize,
                        got: ints.len()
                    }
                );
                (ints[0], 0, ints[2])
            }
        };
        let representation = Representation::from_code(code)?;

        let (epoch_days, epoch_frac, interval_len, r_size, n_intervals, d_scale, t_scale) =
            match representation {
                Representation::PositionOnly => {
                    ensure!(
                        segment.length() >= 4,
                        TruncatedSegmentSnafu {
                            words: segment.length()
                        }
                    );
                    let trailer = segment
                        .read_range(segment.length() - 4, 4)
                        .context(TrailerSnafu)?;
                    // The reference epoch arrives as seconds past J2000; split
                    // it into whole days plus a day fraction so the Julian
                    // date arithmetic stays exact.
                    let start_sec = trailer[0];
                    let days = (start_sec / SECONDS_PER_DAY).trunc();
                    let r_size = trailer[2] as usize;
                    ensure!(
                        r_size % 3 == 2 && r_size >= 5,
                        BadRecordSizeSnafu {
                            r_size,
                            representation
                        }
                    );
                    (
                        JD_J2000 + days,
                        (start_sec - days * SECONDS_PER_DAY) / SECONDS_PER_DAY,
                        trailer[1] / SECONDS_PER_DAY,
                        r_size,
                        trailer[3] as usize,
                        1.0,
                        1.0,
                    )
                }
                Representation::VelocityOnly => {
                    ensure!(
                        segment.length() >= 7,
                        TruncatedSegmentSnafu {
                            words: segment.length()
                        }
                    );
                    let trailer = segment
                        .read_range(segment.length() - 7, 7)
                        .context(TrailerSnafu)?;
                    let r_size = trailer[5] as usize;
                    ensure!(
                        r_size % 3 == 0 && r_size >= 6,
                        BadRecordSizeSnafu {
                            r_size,
                            representation
                        }
                    );
                    (
                        trailer[2],
                        trailer[3],
                        trailer[4],
                        r_size,
                        trailer[6] as usize,
                        trailer[0],
                        trailer[1] / SECONDS_PER_DAY,
                    )
                }
            };

        let degree = match representation {
            Representation::PositionOnly => (r_size - 2) / 3 - 1,
            Representation::VelocityOnly => r_size / 3 - 2,
        };
        ensure!(degree <= MAX_CHEBYSHEV_DEGREE, DegreeLimitSnafu { degree });

        Ok(Self {
            segment,
            object,
            basis,
            file_type,
            representation,
            epoch_days,
            epoch_frac,
            interval_len,
            r_size,
            n_intervals,
            degree,
            d_scale,
            t_scale,
            cached_interval: None,
            cached_coefficients: Vec::new(),
        })
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn polynomial_degree(&self) -> usize {
        self.degree
    }

    /// Julian date at which this theory's coverage starts.
    pub fn start_julian_date(&self) -> f64 {
        self.epoch_days + self.epoch_frac
    }

    /// Julian date at which this theory's coverage ends.
    pub fn end_julian_date(&self) -> f64 {
        self.start_julian_date() + self.interval_len * self.n_intervals as f64
    }

    /// Whether `date1 + date2` falls within this theory's coverage.
    pub fn is_date_in_range(&self, date1: f64, date2: f64) -> bool {
        let delta = date1 + date2 - self.epoch_days - self.epoch_frac;
        delta >= 0.0 && delta <= self.n_intervals as f64 * self.interval_len
    }

    /// Maps a two-part Julian date to the interval it falls in and the
    /// normalized position within that interval, in [-1, 1].
    fn find_interval(&self, date1: f64, date2: f64) -> (usize, f64) {
        let delta = date1 + date2 - self.epoch_days - self.epoch_frac;
        let mut interval = (delta / self.interval_len).floor() as i64;
        // A query at the exact right edge of coverage lands in the last
        // record, at normalized position +1.
        if interval >= self.n_intervals as i64 {
            interval = self.n_intervals as i64 - 1;
        }
        let interval = interval.max(0) as usize;
        let within = delta - interval as f64 * self.interval_len;
        (interval, (within / self.interval_len) * 2.0 - 1.0)
    }

    /// Replaces the cached coefficients when `interval` is not the cached
    /// one. A failed read clears the cache so the next call re-issues it.
    fn fill_cache(&mut self, interval: usize, start: usize, len: usize) -> Result<(), DAFError> {
        if self.cached_interval == Some(interval) {
            return Ok(());
        }
        trace!(
            "theory ({}, {}): caching interval {interval}",
            self.object,
            self.basis
        );
        self.cached_interval = None;
        self.cached_coefficients = self.segment.read_range(start, len)?;
        self.cached_interval = Some(interval);
        Ok(())
    }

    /// Evaluates position and (optionally) per-day velocity at the two-part
    /// Julian date, applying the scaling the options carry.
    pub(crate) fn evaluate(
        &mut self,
        date1: f64,
        date2: f64,
        opts: EvalOptions,
    ) -> Result<(Vector3, Vector3), DAFError> {
        let (interval, pos) = self.find_interval(date1, date2);
        match self.representation {
            Representation::PositionOnly => self.evaluate_position_only(interval, pos, opts),
            Representation::VelocityOnly => self.evaluate_velocity_only(interval, pos, opts),
        }
    }

    fn evaluate_position_only(
        &mut self,
        interval: usize,
        pos: f64,
        opts: EvalOptions,
    ) -> Result<(Vector3, Vector3), DAFError> {
        // Interval records lead with their midpoint and radius; only the
        // coefficient blocks are cached.
        self.fill_cache(interval, self.r_size * interval + 2, self.r_size - 2)?;

        let n = self.degree + 1;
        let polys = chebyshev::polynomials(n, pos);
        let coeffs = &self.cached_coefficients;

        let mut position = Vector3::zeros();
        for i in (0..n).rev() {
            position.x += polys[i] * coeffs[i];
            position.y += polys[i] * coeffs[i + n];
            position.z += polys[i] * coeffs[i + 2 * n];
        }
        if opts.scale_distance {
            position *= opts.distance_scaling;
        }

        let mut velocity = Vector3::zeros();
        if opts.with_velocity {
            let derivs = chebyshev::derivatives(n, pos, &polys);
            for i in (0..n).rev() {
                velocity.x += derivs[i] * coeffs[i];
                velocity.y += derivs[i] * coeffs[i + n];
                velocity.z += derivs[i] * coeffs[i + 2 * n];
            }
            // Chain rule for the normalization x = 2 delta / L - 1.
            velocity /= 0.5 * self.interval_len;
            if opts.scale_distance {
                velocity *= opts.distance_scaling;
            }
        }

        Ok((position, velocity))
    }

    fn evaluate_velocity_only(
        &mut self,
        interval: usize,
        pos: f64,
        opts: EvalOptions,
    ) -> Result<(Vector3, Vector3), DAFError> {
        self.fill_cache(interval, self.r_size * interval, self.r_size)?;

        let mut distance_scale = self.d_scale * opts.distance_scaling;
        if opts.scale_distance
            && opts.au_output
            && (self.d_scale - KILOMETERS_PER_AU).abs() < 1000.0
        {
            // The file carries its own astronomical unit: honor it rather
            // than converting twice.
            distance_scale = 1.0;
        }

        let n = self.degree + 1;
        // Each component block holds the velocity coefficients followed by
        // one integration constant.
        let stride = self.degree + 2;
        let polys = chebyshev::polynomials(n + 1, pos);
        let antis = chebyshev::antiderivatives(n, pos, &polys);
        let coeffs = &self.cached_coefficients;

        let mut position = Vector3::zeros();
        for i in (0..n).rev() {
            position.x += antis[i] * coeffs[i];
            position.y += antis[i] * coeffs[i + stride];
            position.z += antis[i] * coeffs[i + 2 * stride];
        }
        position *= 0.5 * self.interval_len;
        position.x += coeffs[n];
        position.y += coeffs[n + stride];
        position.z += coeffs[n + 2 * stride];
        if opts.scale_distance {
            position *= distance_scale;
        }

        let mut velocity = Vector3::zeros();
        if opts.with_velocity {
            for i in (0..n).rev() {
                velocity.x += polys[i] * coeffs[i];
                velocity.y += polys[i] * coeffs[i + stride];
                velocity.z += polys[i] * coeffs[i + 2 * stride];
            }
            if opts.scale_distance {
                velocity *= distance_scale / self.t_scale;
            }
        }

        Ok((position, velocity))
    }
}
