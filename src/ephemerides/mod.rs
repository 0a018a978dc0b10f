/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use std::cell::RefCell;
use std::fs::File;
use std::io::ErrorKind;
use std::rc::Rc;

use hifitime::Epoch;
use log::{error, info};
use snafu::{ResultExt, Snafu};

use crate::constants::celestial_objects::{
    EARTH, EARTH_MOON_BARYCENTER, MOON, SOLAR_SYSTEM_BARYCENTER,
};
use crate::constants::{JD_J2000, SECONDS_PER_DAY};
use crate::math::units::{DistanceUnit, TimeUnit};
use crate::math::Vector3;
use crate::naif::daf::{DAFError, DafSource, DAF};
use crate::naif::DafFileType;
use crate::NaifId;

pub mod orientations;
pub mod theory;
pub mod timescales;
pub mod translations;

use theory::EvalOptions;
pub use theory::{Representation, Theory, TheoryError};

/// Errors raised by ephemeris loading and queries.
#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum EphemerisError {
    #[snafu(display("could not open `{path}`: {kind:?}"))]
    Loading { path: String, kind: ErrorKind },
    #[snafu(display("while parsing the file: {source}"))]
    Parsing { source: DAFError },
    #[snafu(display("segment {index} could not be converted: {source}"))]
    Converting { index: usize, source: TheoryError },
    #[snafu(display(
        "no theory covers object {object} with respect to {basis} at the requested date"
    ))]
    NoTheory { object: NaifId, basis: NaifId },
    #[snafu(display("no orientation theory covers frame {frame} at the requested date"))]
    NoOrientationTheory { frame: NaifId },
    #[snafu(display(
        "several distinct orientation theories are active: frame {frame} is ambiguous"
    ))]
    AmbiguousOrientation { frame: NaifId },
    #[snafu(display("no time-scale-difference theory with tag {code} covers the requested date"))]
    NoTimeDifferenceTheory { code: NaifId },
    #[snafu(display("while reading interval coefficients: {source}"))]
    Reading { source: DAFError },
}

/// The facade over every loaded kernel file: owns the theories, routes
/// (object, basis) queries through the segments actually available, and
/// applies the selected output units.
///
/// Queries take `&mut self` because each theory maintains a single-interval
/// coefficient cache.
pub struct Ephemeris {
    theories: Vec<Theory>,
    distance_unit: DistanceUnit,
    time_unit: TimeUnit,
    distance_scaling: f64,
    time_scaling: f64,
    // Earth/Moon/Earth-Moon-barycenter pairs observed among the loaded
    // segments; these route the composed state queries without rescans.
    pub(crate) have_moon_wrt_earth: bool,
    pub(crate) have_moon_wrt_emb: bool,
    pub(crate) have_earth_wrt_emb: bool,
    pub(crate) have_earth_wrt_ssb: bool,
    pub(crate) have_emb_wrt_ssb: bool,
    coverage: Option<(f64, f64)>,
}

impl Default for Ephemeris {
    fn default() -> Self {
        Self {
            theories: Vec::new(),
            distance_unit: DistanceUnit::default(),
            time_unit: TimeUnit::default(),
            distance_scaling: DistanceUnit::default().scaling_factor(),
            time_scaling: TimeUnit::default().scaling_factor(),
            have_moon_wrt_earth: false,
            have_moon_wrt_emb: false,
            have_earth_wrt_emb: false,
            have_earth_wrt_ssb: false,
            have_emb_wrt_ssb: false,
            coverage: None,
        }
    }
}

impl Ephemeris {
    /// An empty facade in kilometers, with per-second velocities and rates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the file at `path` and loads every segment it carries.
    pub fn load_path(&mut self, path: &str) -> Result<(), EphemerisError> {
        let file = File::open(path).map_err(|err| EphemerisError::Loading {
            path: path.to_string(),
            kind: err.kind(),
        })?;
        let source: Rc<RefCell<dyn DafSource>> = Rc::new(RefCell::new(file));
        self.load_source(source)?;
        info!("loaded `{path}`");
        Ok(())
    }

    /// Loads every segment of an already-opened random-access byte source.
    ///
    /// A source that fails to parse or convert leaves the previously loaded
    /// theories untouched.
    pub fn load_source(&mut self, source: Rc<RefCell<dyn DafSource>>) -> Result<(), EphemerisError> {
        let daf = DAF::parse(source).context(ParsingSnafu)?;
        let file_type = daf.file_type;

        let mut converted = Vec::with_capacity(daf.segments.len());
        for (index, segment) in daf.segments.into_iter().enumerate() {
            converted
                .push(Theory::from_segment(segment, file_type).context(ConvertingSnafu { index })?);
        }

        for theory in &converted {
            if file_type == DafFileType::Spk {
                self.note_pair(theory.object, theory.basis);
            }
            let (start, end) = (theory.start_julian_date(), theory.end_julian_date());
            self.coverage = Some(match self.coverage {
                None => (start, end),
                Some((left, right)) => (left.min(start), right.max(end)),
            });
        }

        info!("indexed {} {file_type} theories", converted.len());
        self.theories.extend(converted);
        Ok(())
    }

    fn note_pair(&mut self, object: NaifId, basis: NaifId) {
        self.have_moon_wrt_earth |= object == MOON && basis == EARTH;
        self.have_moon_wrt_emb |= object == MOON && basis == EARTH_MOON_BARYCENTER;
        self.have_earth_wrt_emb |= object == EARTH && basis == EARTH_MOON_BARYCENTER;
        self.have_earth_wrt_ssb |= object == EARTH && basis == SOLAR_SYSTEM_BARYCENTER;
        self.have_emb_wrt_ssb |= object == EARTH_MOON_BARYCENTER && basis == SOLAR_SYSTEM_BARYCENTER;
    }

    /// Selects the distance unit applied to rectangular coordinates.
    pub fn set_distance_units(&mut self, unit: DistanceUnit) {
        self.distance_unit = unit;
        self.distance_scaling = unit.scaling_factor();
    }

    /// Selects the time unit dividing velocities and rates.
    pub fn set_time_units(&mut self, unit: TimeUnit) {
        self.time_unit = unit;
        self.time_scaling = unit.scaling_factor();
    }

    pub fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Overall `(leftmost, rightmost)` Julian-date coverage across every
    /// loaded theory, or `None` when nothing is loaded.
    pub fn coverage(&self) -> Option<(f64, f64)> {
        self.coverage
    }

    pub fn num_loaded_theories(&self) -> usize {
        self.theories.len()
    }

    /// Splits an epoch into the two-part Julian date the query interfaces
    /// take, keeping the day fraction separate from the J2000 base.
    pub fn julian_date_parts(epoch: Epoch) -> (f64, f64) {
        (JD_J2000, epoch.to_et_seconds() / SECONDS_PER_DAY)
    }

    /// [`Self::calculate_rectangular_coords_and_scale_velocity`] at an epoch.
    pub fn rectangular_coords_at(
        &mut self,
        object: NaifId,
        basis: NaifId,
        epoch: Epoch,
        with_velocity: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let (date1, date2) = Self::julian_date_parts(epoch);
        self.calculate_rectangular_coords_and_scale_velocity(object, basis, date1, date2, with_velocity)
    }

    /// [`Self::calculate_euler_angles`] at an epoch.
    pub fn euler_angles_at(
        &mut self,
        frame: NaifId,
        epoch: Epoch,
        with_rates: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let (date1, date2) = Self::julian_date_parts(epoch);
        self.calculate_euler_angles(frame, date1, date2, with_rates)
    }

    pub(crate) fn find_theory(
        &self,
        object: NaifId,
        basis: NaifId,
        date1: f64,
        date2: f64,
    ) -> Result<usize, EphemerisError> {
        self.theories
            .iter()
            .position(|t| t.object == object && t.basis == basis && t.is_date_in_range(date1, date2))
            .ok_or_else(|| {
                error!("no theory for ({object}, {basis}) at {}", date1 + date2);
                EphemerisError::NoTheory { object, basis }
            })
    }

    pub(crate) fn evaluate_theory(
        &mut self,
        index: usize,
        date1: f64,
        date2: f64,
        scale_distance: bool,
        with_velocity: bool,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let opts = EvalOptions {
            scale_distance,
            with_velocity,
            distance_scaling: self.distance_scaling,
            au_output: self.distance_unit == DistanceUnit::AstronomicalUnit,
        };
        self.theories[index]
            .evaluate(date1, date2, opts)
            .context(ReadingSnafu)
    }
}
