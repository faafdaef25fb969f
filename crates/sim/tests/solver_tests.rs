//! Flow solver properties on small grids.

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim::audio::AudioFrame;
use sim::config::SimulationConfig;
use sim::impulse;
use sim::kernel::dispatch;
use sim::solver;
use sim::store::FieldStore;

const RESOLUTION: usize = 64;
const DISPLAY: Vec2 = Vec2::new(512.0, 512.0);

fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        gravity: false,
        ..Default::default()
    }
}

#[test]
fn still_fluid_stays_still() {
    let mut store = FieldStore::new(RESOLUTION, 0).unwrap();
    let config = quiet_config();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for _ in 0..5 {
        solver::step(&mut store, &config, AudioFrame::SILENT, DISPLAY, &mut rng);
    }

    for v in store.velocity.front().as_slice() {
        assert_eq!(*v, 0.0, "velocity appeared from nothing");
    }
    for p in store.pressure.front().as_slice() {
        assert_eq!(*p, 0.0, "pressure appeared from nothing");
    }
}

#[test]
fn gravity_pulls_velocity_downward() {
    let mut store = FieldStore::new(RESOLUTION, 0).unwrap();
    let config = SimulationConfig {
        gravity: true,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    solver::step(&mut store, &config, AudioFrame::SILENT, DISPLAY, &mut rng);

    // One step on a uniform field: -9.8 * 0.01, then 0.99 advection decay.
    let expected = -solver::GRAVITY * 0.99;
    let v = store.velocity.front().texel(RESOLUTION / 2, RESOLUTION / 2);
    assert!(
        (v.y - expected).abs() < 1e-4,
        "expected v.y ~ {expected}, got {}",
        v.y
    );
    assert!(v.x.abs() < 1e-4, "gravity must not push sideways: {}", v.x);
}

#[test]
fn injected_velocity_decays_under_viscosity() {
    let mut store = FieldStore::new(128, 0).unwrap();
    let config = SimulationConfig {
        viscosity: 0.015,
        vorticity: 0.0,
        gravity: false,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    // Pointer drag at display (100, 100) with delta (5, 5); the splat center
    // maps to sim texel (25, 25).
    impulse::splat_velocity(&mut store.velocity, Vec2::new(25.0, 25.0), Vec2::new(5.0, 5.0));

    let probe = |store: &FieldStore| {
        let v = store.velocity.front().texel(25, 25);
        Vec2::new(v.x, v.y).length()
    };

    let peak = probe(&store);
    assert!(peak > 60.0, "splat did not register: {peak}");

    let mut previous = peak;
    for i in 0..10 {
        solver::step(&mut store, &config, AudioFrame::SILENT, DISPLAY, &mut rng);
        let current = probe(&store);
        assert!(
            current < previous,
            "step {i}: magnitude rose from {previous} to {current}"
        );
        assert!(current <= peak, "step {i}: magnitude exceeded the peak");
        previous = current;
    }
}

#[test]
fn divergence_free_flow_keeps_pressure_zero() {
    let mut store = FieldStore::new(RESOLUTION, 0).unwrap();
    // A uniform field has zero divergence everywhere, edges included.
    dispatch(store.velocity.front_mut(), |_, _| {
        glam::Vec4::new(0.3, 0.1, 0.0, 0.0)
    });
    let config = SimulationConfig {
        viscosity: 0.0,
        vorticity: 0.0,
        gravity: false,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    solver::step(&mut store, &config, AudioFrame::SILENT, DISPLAY, &mut rng);

    for d in store.divergence.as_slice() {
        assert!(d.abs() < 1e-6, "uniform flow produced divergence {d}");
    }
    for p in store.pressure.front().as_slice() {
        assert_eq!(*p, 0.0, "pressure moved without divergence");
    }
    // Advection dissipation is the only change left.
    let v = store.velocity.front().texel(RESOLUTION / 2, RESOLUTION / 2);
    assert!((v.x - 0.3 * 0.99).abs() < 1e-4);
    assert!((v.y - 0.1 * 0.99).abs() < 1e-4);
}

#[test]
fn low_audio_thresholds_gate_all_reaction() {
    let mut store = FieldStore::new(RESOLUTION, 0).unwrap();
    let config = quiet_config();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    // The fallback frame sits under every band threshold.
    solver::step(&mut store, &config, AudioFrame::FALLBACK, DISPLAY, &mut rng);

    for v in store.velocity.front().as_slice() {
        assert_eq!(*v, 0.0);
    }
    for d in store.density.front().as_slice() {
        assert_eq!(*d, 0.0);
    }
}

#[test]
fn loud_bass_injects_turbulence() {
    let mut store = FieldStore::new(RESOLUTION, 0).unwrap();
    let config = quiet_config();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let loud = AudioFrame {
        low: 0.9,
        mid: 0.0,
        high: 0.0,
        volume: 0.9,
    };
    solver::step(&mut store, &config, loud, DISPLAY, &mut rng);

    let moved = store.velocity.front().as_slice().iter().any(|v| *v != 0.0);
    assert!(moved, "bass above threshold must stir the velocity field");
    // No mid/high content: density stays untouched.
    for d in store.density.front().as_slice() {
        assert_eq!(*d, 0.0);
    }
}
