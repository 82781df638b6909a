mod common;

use std::io::Cursor;

use approx::assert_abs_diff_eq;
use common::{
    assert_angles_close, assert_slices_close, cartesian_copy,
    synthetic_spk::{kernel, SyntheticSegment},
    ElementSet,
};
use nalgebra::Vector3;
use rand::{rngs::StdRng, SeedableRng};
use spacerocks::{
    constants::{J2000_JD, MU_BARY, MU_HELIO, SECONDS_PER_DAY},
    BodyBatch, Frame, JPLEphem, OriginOffset, Quantity, ReferencePlane, SpaceRocksError,
};

fn sun_wobble(epoch: f64) -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError> {
    let phase = (epoch - J2000_JD) / 4332.6 * std::f64::consts::TAU;
    Ok((
        Vector3::new(0.005 * phase.cos(), 0.005 * phase.sin(), 1e-4),
        Vector3::new(-7e-6 * phase.sin(), 7e-6 * phase.cos(), 0.0),
    ))
}

fn rocks(seed: u64) -> (ElementSet, BodyBatch) {
    let mut rng = StdRng::seed_from_u64(seed);
    let elements = ElementSet::random_elliptic(&mut rng, 200);
    let mut batch = elements.batch();
    // spread the epochs over a few repeated dates
    let epochs: Vec<f64> = (0..elements.len())
        .map(|i| J2000_JD + 10.0 * (i % 7) as f64)
        .collect();
    let mut builder = BodyBatch::builder(epochs);
    for q in Quantity::CARTESIAN {
        builder = builder.with(q, batch.get(q).unwrap().to_vec());
    }
    (elements, builder.build().unwrap())
}

#[test]
fn barycentric_round_trip_restores_state_and_elements() {
    let (elements, mut batch) = rocks(1);
    let reference = cartesian_copy(&mut batch);

    batch.to_barycentric(&sun_wobble).unwrap();
    assert_eq!(batch.frame(), Frame::Barycentric);
    assert_eq!(batch.mu(), MU_BARY);
    batch.to_heliocentric(&sun_wobble).unwrap();
    assert_eq!(batch.frame(), Frame::Heliocentric);
    assert_eq!(batch.mu(), MU_HELIO);

    let mut reference = reference;
    common::assert_same_state(&mut batch, &mut reference, 1e-12);
    assert_slices_close(batch.semi_major_axis().unwrap(), &elements.a, 1e-10);
    assert_angles_close(batch.node().unwrap(), &elements.node, 1e-9);
    assert_angles_close(batch.mean_anomaly().unwrap(), &elements.mean_anomaly, 1e-9);
}

#[test]
fn conversion_translates_by_the_offset_and_drops_derived_values() {
    let (_, mut batch) = rocks(2);
    let x_helio = batch.x().unwrap().to_vec();
    let vy_helio = batch.vy().unwrap().to_vec();
    let a_helio = batch.semi_major_axis().unwrap().to_vec();
    let epochs = batch.epoch().to_vec();

    batch.to_barycentric(&sun_wobble).unwrap();
    assert!(!batch.is_materialized(Quantity::SemiMajorAxis));

    for (i, epoch) in epochs.iter().enumerate() {
        let (dr, dv) = sun_wobble(*epoch).unwrap();
        assert_abs_diff_eq!(batch.x().unwrap()[i], x_helio[i] + dr.x, epsilon = 1e-15);
        assert_abs_diff_eq!(batch.vy().unwrap()[i], vy_helio[i] + dv.y, epsilon = 1e-15);
    }
    // elements now use the barycentric state and μ
    let a_bary = batch.semi_major_axis().unwrap();
    assert!(a_bary.iter().zip(&a_helio).any(|(b, h)| (b - h).abs() > 1e-6));
}

#[test]
fn element_driven_batches_convert_too() {
    let mut rng = StdRng::seed_from_u64(3);
    let elements = ElementSet::random_elliptic(&mut rng, 20);
    let mut batch = elements.batch();

    batch.to_barycentric(&sun_wobble).unwrap();
    batch.to_heliocentric(&sun_wobble).unwrap();

    assert_slices_close(batch.semi_major_axis().unwrap(), &elements.a, 1e-10);
    assert_angles_close(batch.arg().unwrap(), &elements.arg, 1e-9);
}

#[test]
fn conversion_is_idempotent() {
    let (_, mut batch) = rocks(4);
    batch.to_barycentric(&sun_wobble).unwrap();
    let once = batch.x().unwrap().to_vec();

    let failing = |_: f64| -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError> {
        panic!("an already barycentric batch must not query the ephemeris")
    };
    batch.to_barycentric(&failing).unwrap();
    assert_eq!(batch.x().unwrap(), once.as_slice());
}

#[test]
fn spk_backed_conversion() {
    let bytes = kernel(
        &[SyntheticSegment::sun(-32.0 * SECONDS_PER_DAY, 16.0 * SECONDS_PER_DAY, 4)],
        false,
        b"LTL-IEEE",
    );
    let ephem = JPLEphem::from_reader(&mut Cursor::new(bytes), ReferencePlane::Ecliptic).unwrap();

    let mut batch = BodyBatch::builder(vec![J2000_JD + 4.0, J2000_JD + 100.0])
        .x(vec![1.0, 2.0])
        .y(vec![0.0, 0.0])
        .z(vec![0.0, 0.0])
        .vx(vec![0.0, 0.0])
        .vy(vec![0.017, 0.012])
        .vz(vec![0.0, 0.0])
        .build()
        .unwrap();

    // the second epoch is outside the kernel: nothing changes
    let err = batch.to_barycentric(&ephem).unwrap_err();
    assert!(matches!(err, SpaceRocksError::EphemerisUnavailable { .. }));
    assert_eq!(batch.frame(), Frame::Heliocentric);
    assert_eq!(batch.x().unwrap(), &[1.0, 2.0]);

    let mut inside = BodyBatch::builder(vec![J2000_JD + 4.0])
        .x(vec![1.0])
        .y(vec![0.0])
        .z(vec![0.0])
        .vx(vec![0.0])
        .vy(vec![0.017])
        .vz(vec![0.0])
        .build()
        .unwrap();
    inside.to_barycentric(&ephem).unwrap();
    let (dr, _) = ephem.origin_offset(J2000_JD + 4.0).unwrap();
    assert_abs_diff_eq!(inside.x().unwrap()[0], 1.0 + dr.x, epsilon = 1e-15);
    assert_abs_diff_eq!(inside.z().unwrap()[0], dr.z, epsilon = 1e-15);
}
