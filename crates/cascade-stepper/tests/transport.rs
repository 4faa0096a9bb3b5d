//! End-to-end transport scenarios.

use cascade_core::{EventId, MaterialId, ParticleId};
use cascade_geo::{Homogeneous, Navigator, SlabStack, VolumeDef};
use cascade_phys::{EnergyLossTables, HighlandMsc, InteractionModel};
use cascade_stepper::{
    ConfigError, NullCollector, Primary, Stepper, StepperConfig, TransportError, VecCollector,
};
use cascade_test_utils::{copper, flat_xs, kev_cutoffs, mu_pair_model, standard_particles};

fn copper_volume(sensitive: bool) -> VolumeDef {
    VolumeDef {
        label: "cu".into(),
        material: MaterialId(0),
        sensitive,
    }
}

/// A 10 cm copper slab along z, preceded and followed by nothing.
fn copper_slab(sensitive: bool) -> SlabStack {
    SlabStack::new(vec![0.0, 10.0], vec![copper_volume(sensitive)]).unwrap()
}

struct ConfigBuilder {
    navigator: Box<dyn Navigator>,
    models: Vec<Box<dyn InteractionModel>>,
    eloss: EnergyLossTables,
    capacity: usize,
    initializer_capacity: usize,
    secondary_capacity: usize,
    max_steps: u32,
    max_step_length: f64,
    seed: u64,
}

impl ConfigBuilder {
    fn new(navigator: impl Navigator + 'static) -> Self {
        Self {
            navigator: Box::new(navigator),
            models: Vec::new(),
            eloss: EnergyLossTables::default(),
            capacity: 16,
            initializer_capacity: 64,
            secondary_capacity: 32,
            max_steps: 200,
            max_step_length: 1.0,
            seed: 20240719,
        }
    }

    fn build(self) -> Stepper {
        let particles = standard_particles();
        let config = StepperConfig {
            navigator: self.navigator,
            cutoffs: kev_cutoffs(&particles),
            particles,
            materials: copper(),
            models: self.models,
            eloss: self.eloss,
            msc: HighlandMsc::new(),
            capacity: self.capacity,
            initializer_capacity: self.initializer_capacity,
            secondary_capacity: self.secondary_capacity,
            max_steps: self.max_steps,
            max_step_length: self.max_step_length,
            seed: self.seed,
        };
        Stepper::new(config).unwrap()
    }
}

fn muon(energy: f64, z: f64, event: u32) -> Primary {
    let particles = standard_particles();
    Primary {
        particle_id: particles.find("mu-").unwrap(),
        energy,
        position: [0.0, 0.0, z],
        direction: [0.0, 0.0, 1.0],
        event_id: EventId(event),
    }
}

#[test]
fn registry_order_is_fixed() {
    let particles = standard_particles();
    let mut builder = ConfigBuilder::new(copper_slab(false));
    builder.models = vec![Box::new(mu_pair_model(&particles, 1.0))];
    let stepper = builder.build();

    let labels: Vec<_> = stepper
        .registry()
        .iter()
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(
        labels,
        [
            "along-step",
            "mu-pair-production",
            "boundary",
            "step-limit",
            "tracking-cut"
        ]
    );
}

#[test]
fn empty_batch_is_a_noop() {
    let stepper = ConfigBuilder::new(copper_slab(false));
    let mut stepper = stepper.build();
    let result = stepper.transport(&[], &mut NullCollector).unwrap();
    assert_eq!(result.metrics.iterations, 0);
    assert_eq!(result.metrics.primaries, 0);
}

#[test]
fn malformed_primaries_are_fatal_before_stepping() {
    let mut stepper = ConfigBuilder::new(copper_slab(false)).build();

    let bad_particle = Primary {
        particle_id: ParticleId(99),
        ..muon(1e3, 5.0, 0)
    };
    assert!(matches!(
        stepper.transport(&[bad_particle], &mut NullCollector),
        Err(TransportError::UnknownParticle { index: 0, .. })
    ));

    let bad_energy = Primary {
        energy: -5.0,
        ..muon(1e3, 5.0, 0)
    };
    assert!(matches!(
        stepper.transport(&[bad_energy], &mut NullCollector),
        Err(TransportError::InvalidEnergy { index: 0, .. })
    ));

    let bad_direction = Primary {
        direction: [0.0, 0.0, 2.0],
        ..muon(1e3, 5.0, 0)
    };
    assert!(matches!(
        stepper.transport(&[bad_direction], &mut NullCollector),
        Err(TransportError::InvalidDirection { index: 0 })
    ));

    let outside = muon(1e3, -5.0, 0);
    assert!(matches!(
        stepper.transport(&[outside], &mut NullCollector),
        Err(TransportError::OutsideWorld { index: 0 })
    ));
}

#[test]
fn free_streaming_muon_escapes_the_slab() {
    // No physics at all: the muon crosses 10 cm in 1 cm limited steps and
    // leaves through the far face with its full energy.
    let mut stepper = ConfigBuilder::new(copper_slab(false)).build();
    let result = stepper
        .transport(&[muon(1e3, 0.5, 0)], &mut NullCollector)
        .unwrap();

    let m = &result.metrics;
    assert_eq!(m.primaries, 1);
    assert_eq!(m.tracks_created, 1);
    assert_eq!(m.escaped, 1);
    assert_eq!(m.absorbed, 0);
    assert_eq!(m.cut, 0);
    assert_eq!(m.energy_deposited, 0.0);
    assert!((m.energy_escaped - 1e3).abs() < 1e-9);
    // 9.5 cm in 1 cm steps: nine limited steps and a boundary step.
    assert_eq!(m.track_steps, 10);
}

#[test]
fn continuous_loss_stops_the_track_and_deposits_everything() {
    // Flat 10 MeV/cm stopping power, no discrete physics: a 95 MeV muon
    // ranges out inside the slab and the cut deposits the remainder.
    let particles = standard_particles();
    let mu = particles.find("mu-").unwrap();
    let mut builder = ConfigBuilder::new(Homogeneous::new(copper_volume(false)));
    builder.eloss = EnergyLossTables::new(
        vec![(mu, MaterialId(0), flat_xs(1e-1, 1e6, 4, 10.0))],
        1,
    )
    .unwrap();
    let mut stepper = builder.build();

    let result = stepper
        .transport(&[muon(95.0, 0.0, 0)], &mut NullCollector)
        .unwrap();

    let m = &result.metrics;
    assert_eq!(m.escaped, 0);
    assert_eq!(m.cut, 1);
    assert!((m.energy_deposited - 95.0).abs() < 1e-9);
    assert_eq!(m.energy_escaped, 0.0);
    // 9 full steps of 10 MeV plus a final clamped one.
    assert_eq!(m.track_steps, 10);
}

#[test]
fn max_step_cut_terminates_free_loopers() {
    // Nothing can stop this muon physically; the step-count guard kills
    // it and deposits its energy rather than looping forever.
    let mut builder = ConfigBuilder::new(Homogeneous::new(copper_volume(false)));
    builder.max_steps = 5;
    let mut stepper = builder.build();

    let result = stepper
        .transport(&[muon(1e3, 0.0, 0)], &mut NullCollector)
        .unwrap();

    let m = &result.metrics;
    assert_eq!(m.cut, 1);
    assert_eq!(m.track_steps, 5);
    assert!((m.energy_deposited - 1e3).abs() < 1e-9);
    assert_eq!(m.escaped, 0);
}

#[test]
fn pair_production_in_copper_conserves_the_energy_ledger() {
    // 10 GeV muons with a strong flat pair-production cross section:
    // every track ends as escaped or deposited energy, and the ledger
    // balances exactly because the model conserves kinetic energy.
    let particles = standard_particles();
    let n_primaries = 50;
    let mut builder = ConfigBuilder::new(copper_slab(false));
    builder.models = vec![Box::new(mu_pair_model(&particles, 1.0))];
    builder.capacity = 8;
    builder.initializer_capacity = 16;
    builder.max_steps = 500;
    let mut stepper = builder.build();

    let primaries: Vec<Primary> = (0..n_primaries)
        .map(|i| muon(1e4, 0.5, i as u32))
        .collect();
    let result = stepper.transport(&primaries, &mut NullCollector).unwrap();

    let m = &result.metrics;
    assert_eq!(m.primaries, n_primaries as u64);
    // Nearly every muon interacts at least once over ~10 mean free paths.
    assert!(m.secondaries_created >= 2 * (n_primaries as u64) * 9 / 10);
    assert_eq!(m.secondaries_created % 2, 0);
    assert_eq!(
        m.tracks_created,
        n_primaries as u64 + m.secondaries_created
    );

    let input = 1e4 * n_primaries as f64;
    let output = m.energy_deposited + m.energy_escaped;
    assert!(
        ((input - output) / input).abs() < 1e-9,
        "ledger mismatch: in {input}, out {output}"
    );
}

#[test]
fn sensitive_volume_records_every_step() {
    let particles = standard_particles();
    let mut builder = ConfigBuilder::new(copper_slab(true));
    builder.models = vec![Box::new(mu_pair_model(&particles, 0.5))];
    let mut stepper = builder.build();

    let mut collector = VecCollector::new();
    let result = stepper
        .transport(&[muon(1e4, 0.5, 7)], &mut collector)
        .unwrap();

    let records = collector.records();
    assert!(!records.is_empty());
    assert_eq!(result.metrics.track_steps as usize, records.len());
    for r in records {
        assert_eq!(r.event_id, EventId(7));
        assert!(r.pre_energy >= r.post_energy);
        assert!(r.step_length <= 1.0 + 1e-12);
        assert!(r.time > 0.0);
        // The displacement matches the resolved step (up to the
        // relocation bump on boundary steps).
        let d = [
            r.post_position[0] - r.pre_position[0],
            r.post_position[1] - r.pre_position[1],
            r.post_position[2] - r.pre_position[2],
        ];
        let length = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        assert!((length - r.step_length).abs() < 1e-6);
    }
}

#[test]
fn secondary_exhaustion_is_retried_not_dropped() {
    // Room for only one pair per step with several muons in flight: some
    // interactions fail and are resampled later. Nothing is lost either
    // way: the energy ledger still balances and every successful
    // interaction produced exactly two secondaries.
    let particles = standard_particles();
    let mut builder = ConfigBuilder::new(copper_slab(false));
    builder.models = vec![Box::new(mu_pair_model(&particles, 2.0))];
    builder.capacity = 8;
    builder.secondary_capacity = 2;
    builder.max_steps = 500;
    let mut stepper = builder.build();

    let primaries: Vec<Primary> = (0..8).map(|i| muon(1e4, 0.5, i)).collect();
    let result = stepper.transport(&primaries, &mut NullCollector).unwrap();

    let m = &result.metrics;
    assert!(m.failed_interactions > 0, "contention never happened");
    assert_eq!(m.secondaries_created % 2, 0);

    let input = 8.0 * 1e4;
    let output = m.energy_deposited + m.energy_escaped;
    assert!(((input - output) / input).abs() < 1e-9);
}

#[test]
fn primaries_feed_in_capacity_respecting_batches() {
    // Twenty primaries through two slots and a four-deep initializer
    // stack: the pending queue trickles them in without overflow.
    let mut builder = ConfigBuilder::new(copper_slab(false));
    builder.capacity = 2;
    builder.initializer_capacity = 4;
    let mut stepper = builder.build();

    let primaries: Vec<Primary> = (0..20).map(|i| muon(1e3, 0.5, i)).collect();
    let result = stepper.transport(&primaries, &mut NullCollector).unwrap();

    let m = &result.metrics;
    assert_eq!(m.primaries, 20);
    assert_eq!(m.tracks_created, 20);
    assert_eq!(m.escaped, 20);
    assert!((m.energy_escaped - 20.0 * 1e3).abs() < 1e-6);
}

#[test]
fn identical_seeds_give_identical_batches() {
    let particles = standard_particles();
    let run = || {
        let mut builder = ConfigBuilder::new(copper_slab(true));
        builder.models = vec![Box::new(mu_pair_model(&particles, 1.0))];
        let mut stepper = builder.build();
        let mut collector = VecCollector::new();
        let result = stepper
            .transport(&[muon(1e4, 0.5, 0), muon(2e4, 3.0, 1)], &mut collector)
            .unwrap();
        (result.metrics, collector.into_records())
    };

    let (metrics_a, records_a) = run();
    let (metrics_b, records_b) = run();
    assert_eq!(metrics_a, metrics_b);
    assert_eq!(records_a, records_b);
}

#[test]
fn stepper_is_reusable_and_batches_are_independent() {
    let particles = standard_particles();
    let mut builder = ConfigBuilder::new(copper_slab(false));
    builder.models = vec![Box::new(mu_pair_model(&particles, 1.0))];
    let mut stepper = builder.build();

    let first = stepper
        .transport(&[muon(1e4, 0.5, 0)], &mut NullCollector)
        .unwrap();
    let second = stepper
        .transport(&[muon(1e4, 0.5, 0)], &mut NullCollector)
        .unwrap();

    // Track ids and RNG streams restart per batch, so an identical batch
    // reproduces identically.
    assert_eq!(first.metrics, second.metrics);
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let particles = standard_particles();
    let config = StepperConfig {
        navigator: Box::new(copper_slab(false)),
        cutoffs: kev_cutoffs(&particles),
        particles,
        materials: copper(),
        models: vec![],
        eloss: EnergyLossTables::default(),
        msc: HighlandMsc::new(),
        capacity: 0,
        initializer_capacity: 8,
        secondary_capacity: 8,
        max_steps: 10,
        max_step_length: 1.0,
        seed: 0,
    };
    assert!(matches!(
        Stepper::new(config),
        Err(ConfigError::ZeroTrackCapacity)
    ));
}
