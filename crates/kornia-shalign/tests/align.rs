use approx::assert_relative_eq;
use kornia_shalign::{
    align, align_with_params, covariance::cross_covariance, kmatrix::k_matrix, AlignError,
    AlignParams, CoefficientMatrix, Quaternion,
};
use nalgebra::{UnitQuaternion, Vector3, Vector4};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

fn assert_same_rotation(q: &Quaternion, expected: &Quaternion, epsilon: f64) {
    // q and -q encode the same rotation
    let q = q.aligned_with(expected);
    assert_relative_eq!(q.w, expected.w, epsilon = epsilon);
    assert_relative_eq!(q.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(q.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(q.z, expected.z, epsilon = epsilon);
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_coefficients(
    rng: &mut StdRng,
    n: usize,
) -> Result<CoefficientMatrix, Box<dyn std::error::Error>> {
    let mut row = || (0..n).map(|_| rng.random_range(-1.0..1.0)).collect::<Vec<f64>>();
    Ok(CoefficientMatrix::new([row(), row(), row()])?)
}

fn random_rotation(rng: &mut StdRng) -> Result<Quaternion, Box<dyn std::error::Error>> {
    let axis = [
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
    ];
    let angle = rng.random_range(0.0..std::f64::consts::PI);
    Ok(Quaternion::from_axis_angle(&axis, angle)?)
}

#[test]
fn align_spheres_no_rotation() -> Result<(), Box<dyn std::error::Error>> {
    let from = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ])?;
    let to = from.clone();

    let q = align(&from, &to)?;
    assert_same_rotation(&q, &Quaternion::IDENTITY, 1e-9);
    Ok(())
}

#[test]
fn align_stretched_ellipsoids() -> Result<(), Box<dyn std::error::Error>> {
    // The two rows sets are not an exact rotation of each other, so the result
    // is the least squares optimum and not the 90 degrees of the shapes.
    let from = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 2.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ])?;
    let to = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 1.0],
        vec![0.0, 2.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ])?;

    let res = align_with_params(&from, &to, &AlignParams::default())?;
    let expected = Quaternion::new(
        0.987_272_974_215_819_5,
        0.059_195_843_658_818_17,
        0.059_195_843_658_818_17,
        -0.135_217_523_162_092_15,
    );
    assert_same_rotation(&res.rotation, &expected, 1e-8);
    assert_relative_eq!(res.eigenvalue, 0.970_674_984_938_952, epsilon = 1e-9);
    assert!(!res.degenerate);
    Ok(())
}

#[test]
fn align_stretched_ellipsoids_y_axis() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let from = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 2.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ])?;
    let to = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 2.0, 0.0],
    ])?;

    let res = align_with_params(&from, &to, &AlignParams::default())?;
    let expected = Quaternion::new(
        0.987_272_974_215_819_4,
        -0.059_195_843_658_818_17,
        0.135_217_523_162_092_1,
        -0.059_195_843_658_818_17,
    );
    assert_same_rotation(&res.rotation, &expected, 1e-8);
    assert_relative_eq!(res.eigenvalue, 0.970_674_984_938_952, epsilon = 1e-9);
    assert!(!res.degenerate);

    // the rotation is the dominant eigenvector of K
    let k = k_matrix(&cross_covariance(&from, &to)?);
    let q = Vector4::from(res.rotation.to_array());
    assert_relative_eq!(k * q, q * res.eigenvalue, epsilon = 1e-9);
    Ok(())
}

#[test]
fn align_ellipsoids_cyclic_axes() -> Result<(), Box<dyn std::error::Error>> {
    let from = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 1.0],
        vec![0.0, 2.0, 0.0, 0.0],
        vec![0.0, 0.0, 4.0, 0.0],
    ])?;
    let to = CoefficientMatrix::new([
        vec![0.0, 0.0, 4.0, 0.0],
        vec![0.0, 0.0, 0.0, 1.0],
        vec![0.0, 2.0, 0.0, 0.0],
    ])?;

    let q = align(&from, &to)?;

    // 120 degrees around (1, 1, 1)
    let k = FRAC_PI_3.sin() / 3f64.sqrt();
    let expected = Quaternion::new(FRAC_PI_3.cos(), k, k, k);
    assert_same_rotation(&q, &expected, 1e-9);
    Ok(())
}

#[test]
fn align_wavy_shape() -> Result<(), Box<dyn std::error::Error>> {
    let from = CoefficientMatrix::new([
        vec![0.0, 0.0, 0.0, 1.0, 0.5, 0.0],
        vec![0.0, 2.0, 0.0, 0.0, 1.0, 1.0],
        vec![0.0, 0.0, 3.0, 0.0, 1.0, 0.0],
    ])?;
    let to = CoefficientMatrix::new([
        vec![0.0, 0.0, 3.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 1.0, 0.5, 0.0],
        vec![0.0, 2.0, 0.0, 0.0, 1.0, 1.0],
    ])?;

    let q = align(&from, &to)?;

    let k = FRAC_PI_3.sin() / 3f64.sqrt();
    let expected = Quaternion::new(FRAC_PI_3.cos(), k, k, k);
    assert_same_rotation(&q, &expected, 1e-9);
    Ok(())
}

#[test]
fn align_random_identity() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..10 {
        let m = random_coefficients(&mut rng, 25)?;
        let q = align(&m, &m)?;
        assert_same_rotation(&q, &Quaternion::IDENTITY, 1e-9);
    }
    Ok(())
}

#[test]
fn align_random_known_rotation() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let from = random_coefficients(&mut rng, 25)?;
        let expected = random_rotation(&mut rng)?;
        let to = from.rotated(&expected);

        let res = align_with_params(&from, &to, &AlignParams::default())?;
        assert_same_rotation(&res.rotation, &expected, 1e-9);
        assert_relative_eq!(res.rotation.norm(), 1.0, epsilon = 1e-12);
        assert!(!res.degenerate);
    }
    Ok(())
}

#[test]
fn align_nalgebra_rotation() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    let from = random_coefficients(&mut rng, 16)?;

    let dst_q_src = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_4);
    let to = from.rotated(&dst_q_src.into());

    let q: UnitQuaternion<f64> = align(&from, &to)?.into();
    assert_relative_eq!(q.angle_to(&dst_q_src), 0.0, epsilon = 1e-7);
    Ok(())
}

#[test]
fn align_is_antisymmetric() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..5 {
        let from = random_coefficients(&mut rng, 20)?;
        let to = random_coefficients(&mut rng, 20)?;

        let forward = align(&from, &to)?;
        let backward = align(&to, &from)?;
        assert_same_rotation(&backward, &forward.conjugate(), 1e-9);
    }
    Ok(())
}

#[test]
fn align_rotation_composition() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(11);
    let m0 = random_coefficients(&mut rng, 30)?;
    let a = random_rotation(&mut rng)?;
    let b = random_rotation(&mut rng)?;

    let m1 = m0.rotated(&a);
    let m2 = m1.rotated(&b);

    let q01 = align(&m0, &m1)?;
    let q12 = align(&m1, &m2)?;
    let q02 = align(&m0, &m2)?;
    assert_relative_eq!((q12 * q01).angular_distance(&q02), 0.0, epsilon = 1e-7);
    Ok(())
}

#[test]
fn align_flags_degenerate_input() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    // a single non-constant row leaves the largest eigenvalue repeated
    let from = CoefficientMatrix::new([
        vec![1.0, -1.0, 0.0],
        vec![0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0],
    ])?;
    let res = align_with_params(&from, &from, &AlignParams::default())?;
    assert!(res.degenerate);
    assert_relative_eq!(res.rotation.norm(), 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn align_rejects_overflowing_coefficients() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let m = CoefficientMatrix::new([
        vec![1e300, -1e300],
        vec![1e300, 1e300],
        vec![0.0, 1.0],
    ])?;
    let err = align(&m, &m).unwrap_err();
    assert_eq!(err, AlignError::NonFiniteCovariance);
    assert_eq!(
        err.to_string(),
        "Cross-covariance is not finite, the coefficients are too large"
    );
    Ok(())
}

#[test]
fn align_rejects_invalid_input() -> Result<(), Box<dyn std::error::Error>> {
    let from = CoefficientMatrix::try_from(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])?;
    let to = CoefficientMatrix::try_from(vec![vec![1.0], vec![3.0], vec![5.0]])?;
    let err = align(&from, &to).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Mismatched number of coefficients: from (2) != to (1)"
    );

    let err = CoefficientMatrix::try_from(vec![vec![1.0, 2.0]]).unwrap_err();
    assert_eq!(err.to_string(), "Coefficient matrix must have 3 rows, got 1");
    Ok(())
}
