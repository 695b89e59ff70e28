//! Statistical and reproducibility tests for the qubit emulator.

use qrandom_core::{
    BitSource, Bounds, Gate, MeasurementOutcome, QubitEmulator, QubitState, RandomNumberGenerator,
    apply_gate, measure, zero_state,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const TRIALS: usize = 20_000;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[test]
fn hadamard_on_zero_is_equal_superposition() {
    let state = apply_gate(zero_state(), &Gate::hadamard());
    let h = std::f64::consts::FRAC_1_SQRT_2;
    assert!((state.alpha().re - h).abs() < 1e-12);
    assert!((state.beta().re - h).abs() < 1e-12);
    assert!(state.alpha().im.abs() < 1e-12);
    assert!(state.beta().im.abs() < 1e-12);
}

#[test]
fn measure_frequencies_follow_born_rule() {
    // cos²(π/8) ≈ 0.854
    let theta = std::f64::consts::PI / 8.0;
    let state = QubitState::new(theta.cos().into(), theta.sin().into());
    let mut rng = StdRng::seed_from_u64(2024);

    let zeros = (0..TRIALS)
        .filter(|_| measure(state, &mut rng) == MeasurementOutcome::Zero)
        .count();
    let p0 = zeros as f64 / TRIALS as f64;
    assert!((p0 - theta.cos().powi(2)).abs() < 0.02, "p0 = {p0}");
}

// ---------------------------------------------------------------------------
// Emulator
// ---------------------------------------------------------------------------

#[test]
fn emulator_bits_converge_to_half() {
    let mut emulator = QubitEmulator::seeded(7);
    let ones = (0..TRIALS)
        .filter(|_| emulator.flip() == MeasurementOutcome::One)
        .count();
    let p1 = ones as f64 / TRIALS as f64;
    assert!((p1 - 0.5).abs() < 0.02, "p1 = {p1}");
}

#[test]
fn emulator_with_custom_rng() {
    let mut emulator = QubitEmulator::new(StdRng::seed_from_u64(11));
    let mut reference = QubitEmulator::seeded(11);
    for _ in 0..100 {
        assert_eq!(emulator.flip(), reference.flip());
    }
}

#[tokio::test]
async fn seeded_generators_agree() {
    let bounds = Bounds::new(0, 255).unwrap();
    let mut a = RandomNumberGenerator::new(Box::new(QubitEmulator::seeded(3)), 8, bounds).unwrap();
    let mut b = RandomNumberGenerator::new(Box::new(QubitEmulator::seeded(3)), 8, bounds).unwrap();

    let first = a.generate_many(50).await.unwrap();
    let second = b.generate_many(50).await.unwrap();
    assert_eq!(first, second);
    assert!(first.iter().all(|v| bounds.contains(*v)));
}

#[tokio::test]
async fn entropy_emulator_produces_bits() {
    let mut emulator = QubitEmulator::from_entropy();
    assert_eq!(emulator.name(), "pseudo-random");
    for _ in 0..16 {
        emulator.next_bit().await.unwrap();
    }
}
