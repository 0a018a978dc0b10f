/*
 * Almagest
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use std::cell::{Cell, RefCell};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::rc::Rc;

use approx::assert_relative_eq;
use hifitime::Epoch;

use almagest::constants::KILOMETERS_PER_AU;
use almagest::math::chebyshev;
use almagest::prelude::*;

use crate::daf_builder::{
    position_only_payload, spk_image, spk_segment, velocity_only_payload, VelocityTrailer,
};

const START_SEC: f64 = -8.0 * 86_400.0;
const END_SEC: f64 = 24.0 * 86_400.0;
const INTERVAL_SEC: f64 = 16.0 * 86_400.0;
const INTERVAL_DAYS: f64 = 16.0;
const JD_J2000: f64 = 2_451_545.0;

const EMB_BASE: f64 = 100.0;
const EARTH_BASE: f64 = 4.0;
const MOON_BASE: f64 = 7.0;
const SUN_BASE: f64 = 11.0;
const VENUS_BASE: f64 = 40.0;
const MARS_BASE: f64 = 60.0;

fn component_blocks(base: f64) -> [[f64; 5]; 3] {
    [
        [base, base / 10.0, base / 100.0, base / 200.0, base / 400.0],
        [2.0 * base, base / 5.0, base / 50.0, base / 100.0, base / 200.0],
        [3.0 * base, base / 4.0, base / 40.0, base / 80.0, base / 160.0],
    ]
}

fn records_for(base: f64) -> Vec<[Vec<f64>; 3]> {
    let blocks = component_blocks(base);
    let record: [Vec<f64>; 3] = [blocks[0].to_vec(), blocks[1].to_vec(), blocks[2].to_vec()];
    vec![record.clone(), record]
}

/// T at 0 is [1, 0, -1, 0, 1]: the value collapses to a three-term sum.
fn value_at_zero(coeffs: &[f64; 5]) -> f64 {
    coeffs[0] - coeffs[2] + coeffs[4]
}

/// dT/dx at 0 is [0, 1, 0, -3, 0], and the chain rule divides by L/2.
fn rate_at_zero(coeffs: &[f64; 5]) -> f64 {
    (coeffs[1] - 3.0 * coeffs[3]) / (0.5 * INTERVAL_DAYS)
}

/// Mirrors the DE-series layout: planets and the Earth-Moon barycenter with
/// respect to the solar-system barycenter, Earth and Moon with respect to
/// the Earth-Moon barycenter.
fn de_style_image() -> Vec<u8> {
    spk_image(vec![
        spk_segment(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(EMB_BASE)),
        ),
        spk_segment(
            EARTH,
            EARTH_MOON_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(EARTH_BASE)),
        ),
        spk_segment(
            MOON,
            EARTH_MOON_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(MOON_BASE)),
        ),
        spk_segment(
            SUN,
            SOLAR_SYSTEM_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(SUN_BASE)),
        ),
        spk_segment(
            VENUS,
            SOLAR_SYSTEM_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(VENUS_BASE)),
        ),
        spk_segment(
            MARS_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(MARS_BASE)),
        ),
    ])
}

/// Mirrors the EPM layout: Moon stored with respect to Earth, Earth with
/// respect to the solar-system barycenter.
fn epm_style_image() -> Vec<u8> {
    spk_image(vec![
        spk_segment(
            MOON,
            EARTH,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(MOON_BASE)),
        ),
        spk_segment(
            EARTH,
            SOLAR_SYSTEM_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(EARTH_BASE)),
        ),
        spk_segment(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            START_SEC,
            END_SEC,
            2,
            position_only_payload(START_SEC, INTERVAL_SEC, &records_for(EMB_BASE)),
        ),
    ])
}

fn facade_over(image: Vec<u8>) -> Ephemeris {
    let mut eph = Ephemeris::new();
    eph.load_source(Rc::new(RefCell::new(Cursor::new(image))))
        .unwrap();
    eph
}

#[test]
fn direct_query_matches_the_closed_form() {
    let _ = pretty_env_logger::try_init();
    let mut eph = facade_over(de_style_image());
    let (position, velocity) = eph
        .calculate_rectangular_coords(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            JD_J2000,
            0.0,
            true,
        )
        .unwrap();

    let blocks = component_blocks(EMB_BASE);
    for axis in 0..3 {
        assert_relative_eq!(
            position[axis],
            value_at_zero(&blocks[axis]),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            velocity[axis],
            rate_at_zero(&blocks[axis]),
            max_relative = 1e-12
        );
    }
}

#[test]
fn identical_endpoints_are_exactly_zero() {
    let mut eph = facade_over(de_style_image());
    let (position, velocity) = eph
        .calculate_rectangular_coords(EARTH, EARTH, JD_J2000, 0.0, true)
        .unwrap();
    assert_eq!(position, Vector3::zeros());
    assert_eq!(velocity, Vector3::zeros());
}

#[test]
fn reversed_pairs_negate() {
    let mut eph = facade_over(de_style_image());
    let (position, velocity) = eph
        .calculate_rectangular_coords(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            JD_J2000,
            0.0,
            true,
        )
        .unwrap();
    let (rev_position, rev_velocity) = eph
        .calculate_rectangular_coords(
            SOLAR_SYSTEM_BARYCENTER,
            EARTH_MOON_BARYCENTER,
            JD_J2000,
            0.0,
            true,
        )
        .unwrap();
    assert_eq!(rev_position, -position);
    assert_eq!(rev_velocity, -velocity);

    // Earth with respect to the Moon reverses the composed Moon query.
    let (moon, moon_vel) = eph
        .calculate_rectangular_coords(MOON, EARTH, JD_J2000, 0.0, true)
        .unwrap();
    let (earth, earth_vel) = eph
        .calculate_rectangular_coords(EARTH, MOON, JD_J2000, 0.0, true)
        .unwrap();
    assert_eq!(earth, -moon);
    assert_eq!(earth_vel, -moon_vel);
}

#[test]
fn barycentric_differences_are_additive() {
    let mut eph = facade_over(de_style_image());
    let (venus_mars, venus_mars_vel) = eph
        .calculate_rectangular_coords(VENUS, MARS_BARYCENTER, JD_J2000, 0.0, true)
        .unwrap();
    let (mars_ssb, mars_ssb_vel) = eph
        .calculate_rectangular_coords(MARS_BARYCENTER, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, true)
        .unwrap();
    let (venus_ssb, venus_ssb_vel) = eph
        .calculate_rectangular_coords(VENUS, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, true)
        .unwrap();

    for axis in 0..3 {
        assert_relative_eq!(
            venus_mars[axis] + mars_ssb[axis],
            venus_ssb[axis],
            max_relative = 1e-9
        );
        assert_relative_eq!(
            venus_mars_vel[axis] + mars_ssb_vel[axis],
            venus_ssb_vel[axis],
            max_relative = 1e-9
        );
    }
}

#[test]
fn earth_is_composed_through_the_barycenter() {
    let mut eph = facade_over(de_style_image());
    let (earth_ssb, earth_ssb_vel) = eph
        .calculate_rectangular_coords(EARTH, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, true)
        .unwrap();

    let earth_blocks = component_blocks(EARTH_BASE);
    let emb_blocks = component_blocks(EMB_BASE);
    for axis in 0..3 {
        assert_relative_eq!(
            earth_ssb[axis],
            value_at_zero(&earth_blocks[axis]) + value_at_zero(&emb_blocks[axis]),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            earth_ssb_vel[axis],
            rate_at_zero(&earth_blocks[axis]) + rate_at_zero(&emb_blocks[axis]),
            max_relative = 1e-12
        );
    }
}

#[test]
fn moon_wrt_earth_is_composed_through_the_barycenter() {
    let mut eph = facade_over(de_style_image());
    let (moon_earth, moon_earth_vel) = eph
        .calculate_rectangular_coords(MOON, EARTH, JD_J2000, 0.0, true)
        .unwrap();

    let moon_blocks = component_blocks(MOON_BASE);
    let earth_blocks = component_blocks(EARTH_BASE);
    for axis in 0..3 {
        assert_relative_eq!(
            moon_earth[axis],
            value_at_zero(&moon_blocks[axis]) - value_at_zero(&earth_blocks[axis]),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            moon_earth_vel[axis],
            rate_at_zero(&moon_blocks[axis]) - rate_at_zero(&earth_blocks[axis]),
            max_relative = 1e-12
        );
    }
}

#[test]
fn moon_wrt_ssb_composes_in_the_epm_layout() {
    let mut eph = facade_over(epm_style_image());
    let (moon_ssb, _) = eph
        .calculate_rectangular_coords(MOON, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, false)
        .unwrap();

    // Moon with respect to Earth, plus the Earth-Moon barycenter with
    // respect to the solar-system barycenter.
    let moon_blocks = component_blocks(MOON_BASE);
    let emb_blocks = component_blocks(EMB_BASE);
    for axis in 0..3 {
        assert_relative_eq!(
            moon_ssb[axis],
            value_at_zero(&moon_blocks[axis]) + value_at_zero(&emb_blocks[axis]),
            max_relative = 1e-12
        );
    }
}

#[test]
fn moon_wrt_ssb_needs_a_path_in_the_de_layout() {
    let mut eph = facade_over(de_style_image());
    assert_eq!(
        eph.calculate_rectangular_coords(MOON, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, false)
            .unwrap_err(),
        EphemerisError::NoTheory {
            object: MOON,
            basis: SOLAR_SYSTEM_BARYCENTER
        }
    );
}

#[test]
fn astronomical_units_scale_positions() {
    let mut eph = facade_over(de_style_image());
    let (km, _) = eph
        .calculate_rectangular_coords(SUN, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, false)
        .unwrap();

    eph.set_distance_units(DistanceUnit::AstronomicalUnit);
    let (au, _) = eph
        .calculate_rectangular_coords(SUN, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, false)
        .unwrap();
    assert_eq!(au, km * DistanceUnit::AstronomicalUnit.scaling_factor());
    assert_relative_eq!(au.norm() * KILOMETERS_PER_AU, km.norm(), max_relative = 1e-14);

    // Switching back recovers the original values.
    eph.set_distance_units(DistanceUnit::Kilometer);
    let (km_again, _) = eph
        .calculate_rectangular_coords(SUN, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, false)
        .unwrap();
    assert_eq!(km_again, km);
}

#[test]
fn velocity_scales_with_the_time_unit() {
    let mut eph = facade_over(de_style_image());
    eph.set_time_units(TimeUnit::Day);
    let (_, per_day) = eph
        .calculate_rectangular_coords_and_scale_velocity(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            JD_J2000,
            0.0,
            true,
        )
        .unwrap();

    eph.set_time_units(TimeUnit::Second);
    let (_, per_sec) = eph
        .calculate_rectangular_coords_and_scale_velocity(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            JD_J2000,
            0.0,
            true,
        )
        .unwrap();

    assert_eq!(per_sec, per_day / 86_400.0);
}

#[test]
fn out_of_coverage_dates_find_no_theory() {
    let mut eph = facade_over(de_style_image());
    assert_eq!(eph.coverage(), Some((2_451_537.0, 2_451_569.0)));
    assert_eq!(
        eph.calculate_rectangular_coords(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            2_451_600.0,
            0.0,
            false
        )
        .unwrap_err(),
        EphemerisError::NoTheory {
            object: EARTH_MOON_BARYCENTER,
            basis: SOLAR_SYSTEM_BARYCENTER
        }
    );
}

#[test]
fn epoch_queries_match_the_two_part_date() {
    let mut eph = facade_over(de_style_image());
    let at_epoch = eph
        .rectangular_coords_at(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            Epoch::from_et_seconds(0.0),
            true,
        )
        .unwrap();
    let manual = eph
        .calculate_rectangular_coords_and_scale_velocity(
            EARTH_MOON_BARYCENTER,
            SOLAR_SYSTEM_BARYCENTER,
            JD_J2000,
            0.0,
            true,
        )
        .unwrap();
    for axis in 0..3 {
        assert_relative_eq!(at_epoch.0[axis], manual.0[axis], max_relative = 1e-9);
        assert_relative_eq!(at_epoch.1[axis], manual.1[axis], max_relative = 1e-9);
    }
}

struct CountingSource<R> {
    inner: R,
    seeks: Rc<Cell<usize>>,
}

impl<R: Read> Read for CountingSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for CountingSource<R> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.seeks.set(self.seeks.get() + 1);
        self.inner.seek(pos)
    }
}

#[test]
fn the_interval_cache_reads_once_per_interval() {
    let seeks = Rc::new(Cell::new(0_usize));
    let source = CountingSource {
        inner: Cursor::new(de_style_image()),
        seeks: Rc::clone(&seeks),
    };
    let mut eph = Ephemeris::new();
    eph.load_source(Rc::new(RefCell::new(source))).unwrap();

    let after_load = seeks.get();
    eph.calculate_rectangular_coords(
        EARTH_MOON_BARYCENTER,
        SOLAR_SYSTEM_BARYCENTER,
        JD_J2000,
        0.0,
        true,
    )
    .unwrap();
    assert_eq!(seeks.get() - after_load, 1, "first query misses the cache");

    eph.calculate_rectangular_coords(
        EARTH_MOON_BARYCENTER,
        SOLAR_SYSTEM_BARYCENTER,
        JD_J2000 + 1.0,
        0.0,
        true,
    )
    .unwrap();
    assert_eq!(seeks.get() - after_load, 1, "same interval hits the cache");

    eph.calculate_rectangular_coords(
        EARTH_MOON_BARYCENTER,
        SOLAR_SYSTEM_BARYCENTER,
        JD_J2000 + 15.0,
        0.0,
        true,
    )
    .unwrap();
    assert_eq!(seeks.get() - after_load, 2, "new interval reads once more");
}

#[test]
fn velocity_representation_honors_the_stored_scales() {
    let d_scale = 149_597_870.691;
    let t_scale_sec = 2.0 * 86_400.0;
    let blocks: [Vec<f64>; 3] = [
        vec![8.0, 2.0, 4.0],
        vec![16.0, 4.0, 8.0],
        vec![24.0, 6.0, 12.0],
    ];
    let constants = [[5.0, 10.0, 15.0], [5.0, 10.0, 15.0]];
    let image = spk_image(vec![spk_segment(
        MERCURY,
        SOLAR_SYSTEM_BARYCENTER,
        START_SEC,
        END_SEC,
        20,
        velocity_only_payload(
            &VelocityTrailer {
                d_scale,
                t_scale_sec,
                jd_int: 2_451_537.0,
                jd_frac: 0.0,
                interval_len_days: INTERVAL_DAYS,
            },
            &[blocks.clone(), blocks.clone()],
            &constants,
        ),
    )]);

    let mut eph = facade_over(image);
    let (position, velocity) = eph
        .calculate_rectangular_coords(MERCURY, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, true)
        .unwrap();

    // At the interval midpoint every antiderivative vanishes: the position
    // is the stored integration constant, distance-scaled.
    assert_relative_eq!(position.x, 5.0 * d_scale, max_relative = 1e-12);
    assert_relative_eq!(position.y, 10.0 * d_scale, max_relative = 1e-12);
    assert_relative_eq!(position.z, 15.0 * d_scale, max_relative = 1e-12);
    // T at 0 is [1, 0, -1]; the time scale is two days.
    assert_relative_eq!(velocity.x, (8.0 - 4.0) * d_scale / 2.0, max_relative = 1e-12);
    assert_relative_eq!(velocity.y, (16.0 - 8.0) * d_scale / 2.0, max_relative = 1e-12);
    assert_relative_eq!(velocity.z, (24.0 - 12.0) * d_scale / 2.0, max_relative = 1e-12);

    // Off the midpoint, the position is the antiderivative accumulation
    // plus the integration constant.
    let (position, _) = eph
        .calculate_rectangular_coords(MERCURY, SOLAR_SYSTEM_BARYCENTER, 2_451_541.0, 0.0, false)
        .unwrap();
    let polys = chebyshev::polynomials(4, -0.5);
    let antis = chebyshev::antiderivatives(3, -0.5, &polys);
    let sum: f64 = (0..3).map(|i| antis[i] * blocks[0][i]).sum();
    assert_relative_eq!(
        position.x,
        (0.5 * INTERVAL_DAYS * sum + 5.0) * d_scale,
        max_relative = 1e-12
    );

    // Under AU output the file's own astronomical unit is honored, so the
    // raw values come back unscaled.
    eph.set_distance_units(DistanceUnit::AstronomicalUnit);
    let (position, velocity) = eph
        .calculate_rectangular_coords(MERCURY, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, true)
        .unwrap();
    assert_relative_eq!(position.x, 5.0, max_relative = 1e-12);
    assert_relative_eq!(velocity.x, (8.0 - 4.0) / 2.0, max_relative = 1e-12);
}

#[test]
fn a_bad_file_leaves_loaded_state_intact() {
    let mut eph = facade_over(de_style_image());
    let loaded = eph.num_loaded_theories();

    // Representation 13 is not supported: the whole file is rejected.
    let bad = spk_image(vec![spk_segment(
        VENUS,
        SOLAR_SYSTEM_BARYCENTER,
        START_SEC,
        END_SEC,
        13,
        position_only_payload(START_SEC, INTERVAL_SEC, &records_for(VENUS_BASE)),
    )]);
    let err = eph
        .load_source(Rc::new(RefCell::new(Cursor::new(bad))))
        .unwrap_err();
    assert!(matches!(err, EphemerisError::Converting { index: 0, .. }));
    assert_eq!(eph.num_loaded_theories(), loaded);

    // The original theories still answer.
    eph.calculate_rectangular_coords(VENUS, SOLAR_SYSTEM_BARYCENTER, JD_J2000, 0.0, false)
        .unwrap();
}
