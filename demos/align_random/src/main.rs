use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};

use kornia_shalign::{align_with_params, AlignParams, CoefficientMatrix, Quaternion};

#[derive(FromArgs)]
/// Recover a known rotation from synthetic spherical harmonics coefficients
struct Args {
    /// number of coefficients per spatial component
    #[argh(option, default = "25")]
    num_coefficients: usize,

    /// rotation angle in degrees
    #[argh(option, default = "30.0")]
    angle: f64,

    /// amplitude of the uniform noise added to the rotated coefficients
    #[argh(option, default = "0.0")]
    noise: f64,

    /// seed of the random generator
    #[argh(option, default = "0")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut row = || {
        (0..args.num_coefficients)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect::<Vec<f64>>()
    };
    let from = CoefficientMatrix::new([row(), row(), row()])?;

    let dst_q_src = Quaternion::from_axis_angle(&[1.0, -0.5, 0.25], args.angle.to_radians())?;
    let rotated = from.rotated(&dst_q_src);

    // perturb the target with uniform noise of the requested scale
    let noisy_rows = rotated.rows().clone().map(|row| {
        row.into_iter()
            .map(|v| v + args.noise * rng.random_range(-1.0..1.0))
            .collect::<Vec<f64>>()
    });
    let to = CoefficientMatrix::new(noisy_rows)?;

    let result = align_with_params(&from, &to, &AlignParams::default())?;
    log::info!("Eigenvalues: {:?}", result.eigenvalues);

    let estimated = result.rotation.aligned_with(&dst_q_src);
    println!("Expected rotation: {:?}", dst_q_src.to_array());
    println!("Estimated rotation: {:?}", estimated.to_array());
    println!(
        "Angular error: {:.3e} deg",
        estimated.angular_distance(&dst_q_src).to_degrees()
    );
    if result.degenerate {
        println!("Warning: the solution is not unique");
    }

    Ok(())
}
