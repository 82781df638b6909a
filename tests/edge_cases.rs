mod common;

use std::f64::consts::{FRAC_PI_2, PI};

use approx::{assert_abs_diff_eq, assert_relative_eq};
use spacerocks::{
    constants::MU_HELIO, BodyBatch, KeplerSolverConfig, Quantity, SpaceRocksError, StateSource,
};

fn earth() -> BodyBatch {
    BodyBatch::builder(vec![2_451_545.0])
        .semi_major_axis(vec![1.0])
        .eccentricity(vec![0.0167])
        .inclination(vec![0.0])
        .node(vec![0.0])
        .arg(vec![102.9_f64.to_radians()])
        .mean_anomaly(vec![0.0])
        .build()
        .unwrap()
}

#[test]
fn earth_at_perihelion() {
    let mut rocks = earth();
    assert_abs_diff_eq!(rocks.radius().unwrap()[0], 0.9833, epsilon = 1e-12);
    assert_abs_diff_eq!(rocks.true_anomaly().unwrap()[0], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(rocks.pericenter().unwrap()[0], 0.9833, epsilon = 1e-12);
    assert_abs_diff_eq!(rocks.apocenter().unwrap()[0], 1.0167, epsilon = 1e-12);

    // at pericenter the velocity is orthogonal to the radius
    assert_abs_diff_eq!(rocks.rrdot().unwrap()[0], 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(rocks.z().unwrap()[0], 0.0, epsilon = 1e-15);

    // one orbit per year, give or take the mass of the Earth
    let period = 2.0 * PI / rocks.mean_motion().unwrap()[0];
    assert_relative_eq!(period, 365.2569, max_relative = 1e-4);
    assert_abs_diff_eq!(rocks.t_peri().unwrap()[0], 2_451_545.0, epsilon = 1e-9);
}

#[test]
fn circular_orbit_has_zero_argument() {
    // circular, inclined by 30°, radius 2 AU
    let r = 2.0;
    let v = (MU_HELIO / r).sqrt();
    let inc = 30.0_f64.to_radians();
    let mut rocks = BodyBatch::builder(vec![2_460_000.5])
        .x(vec![0.0])
        .y(vec![r * inc.cos()])
        .z(vec![r * inc.sin()])
        .vx(vec![-v])
        .vy(vec![0.0])
        .vz(vec![0.0])
        .build()
        .unwrap();

    assert_abs_diff_eq!(rocks.eccentricity().unwrap()[0], 0.0, epsilon = 1e-12);
    assert_eq!(rocks.arg().unwrap(), &[0.0]);
    assert_relative_eq!(rocks.semi_major_axis().unwrap()[0], r, max_relative = 1e-12);
    assert_relative_eq!(rocks.inclination().unwrap()[0], inc, max_relative = 1e-12);
    // the body sits 90° past the ascending node
    assert_abs_diff_eq!(rocks.true_anomaly().unwrap()[0], FRAC_PI_2, epsilon = 1e-12);
}

#[test]
fn equatorial_orbit_has_zero_node() {
    let mut rocks = BodyBatch::builder(vec![2_460_000.5])
        .x(vec![1.2])
        .y(vec![0.4])
        .z(vec![0.0])
        .vx(vec![-0.003])
        .vy(vec![0.016])
        .vz(vec![0.0])
        .build()
        .unwrap();

    assert_eq!(rocks.node().unwrap(), &[0.0]);
    assert_abs_diff_eq!(rocks.inclination().unwrap()[0], 0.0, epsilon = 1e-7);

    // with a null node, varpi and arg coincide
    let arg = rocks.arg().unwrap()[0];
    assert_abs_diff_eq!(rocks.varpi().unwrap()[0], arg, epsilon = 1e-15);
}

#[test]
fn hyperbolic_body() {
    // an 'Oumuamua-like orbit
    let mut rocks = BodyBatch::builder(vec![2_458_080.5])
        .semi_major_axis(vec![-1.272])
        .eccentricity(vec![1.2011])
        .inclination(vec![122.74_f64.to_radians()])
        .node(vec![24.6_f64.to_radians()])
        .arg(vec![241.8_f64.to_radians()])
        .mean_anomaly(vec![-8.0])
        .build()
        .unwrap();

    assert!(rocks.semi_major_axis().unwrap()[0] < 0.0);
    assert!(rocks.apocenter().unwrap()[0].is_infinite());
    assert_relative_eq!(
        rocks.pericenter().unwrap()[0],
        -1.272 * (1.0 - 1.2011),
        max_relative = 1e-12
    );
    // incoming branch: M < 0, moving towards the Sun
    assert!(rocks.eccentric_anomaly().unwrap()[0] < 0.0);
    assert!(rocks.rrdot().unwrap()[0] < 0.0);
    assert_eq!(rocks.mean_anomaly().unwrap(), &[-8.0]);

    // vis-viva: positive energy
    let r = rocks.radius().unwrap()[0];
    let v2: f64 = rocks.velocity().unwrap().norm_squared()[0];
    assert!(v2 / 2.0 - MU_HELIO / r > 0.0);
}

#[test]
fn hyperbolic_non_convergence_names_the_body() {
    let mut rocks = BodyBatch::builder(vec![2_460_000.5; 2])
        .solver_config(KeplerSolverConfig {
            hyperbolic_max_iter: 2,
            ..Default::default()
        })
        .semi_major_axis(vec![2.0, -1.0])
        .eccentricity(vec![0.1, 2.0])
        .inclination(vec![0.1, 0.1])
        .node(vec![0.0, 0.0])
        .arg(vec![0.0, 0.0])
        .mean_anomaly(vec![1.0, 50.0])
        .build()
        .unwrap();

    let err = rocks.x().unwrap_err();
    assert!(matches!(
        err,
        SpaceRocksError::KeplerNonConvergence { index: 1, .. }
    ));
    assert!(!rocks.is_materialized(Quantity::EccentricAnomaly));
    // shape quantities do not need the solver
    assert_relative_eq!(rocks.pericenter().unwrap()[1], 1.0, max_relative = 1e-15);
}

#[test]
fn assignment_invalidates_derived_quantities() {
    let mut rocks = earth();
    let r_before = rocks.radius().unwrap()[0];
    assert!(rocks.is_materialized(Quantity::Radius));

    rocks.set(Quantity::MeanAnomaly, vec![PI]).unwrap();
    assert!(!rocks.is_materialized(Quantity::Radius));
    assert!(!rocks.is_materialized(Quantity::X));
    assert_abs_diff_eq!(rocks.radius().unwrap()[0], 1.0167, epsilon = 1e-12);
    assert!(rocks.radius().unwrap()[0] > r_before);

    // a Cartesian component switches the batch to a Cartesian state
    let y = rocks.y().unwrap().to_vec();
    rocks.set(Quantity::X, vec![-1.0167]).unwrap();
    assert_eq!(rocks.source(), StateSource::Cartesian);
    assert_eq!(rocks.y().unwrap(), y.as_slice());

    rocks.set_by_name("e", vec![0.2]).unwrap();
    assert_eq!(rocks.eccentricity().unwrap(), &[0.2]);
    assert!(matches!(rocks.source(), StateSource::Elements { .. }));
}

#[test]
fn construction_errors() {
    let err = BodyBatch::builder(vec![2_460_000.5])
        .semi_major_axis(vec![1.0])
        .eccentricity(vec![0.1])
        .inclination(vec![0.1])
        .node(vec![0.0])
        .mean_anomaly(vec![0.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, SpaceRocksError::UnderSpecified(_)));

    let err = BodyBatch::builder(vec![2_460_000.5])
        .semi_major_axis(vec![1.0])
        .eccentricity(vec![0.1])
        .inclination(vec![0.1])
        .node(vec![0.0])
        .arg(vec![0.0])
        .mean_anomaly(vec![0.0])
        .true_anomaly(vec![0.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, SpaceRocksError::ConflictingInputs(_)));

    let err = BodyBatch::builder(vec![2_460_000.5, 2_460_001.5])
        .x(vec![1.0, 1.0])
        .y(vec![0.0, 0.0])
        .z(vec![0.0])
        .vx(vec![0.0, 0.0])
        .vy(vec![0.017, 0.017])
        .vz(vec![0.0, 0.0])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        SpaceRocksError::LengthMismatch {
            quantity: "z".into(),
            expected: 2,
            found: 1
        }
    );

    let mut rocks = earth();
    assert_eq!(
        rocks.get_by_name("semi_major"),
        Err(SpaceRocksError::UnknownQuantity("semi_major".into()))
    );
}
