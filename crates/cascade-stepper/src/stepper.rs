//! The core stepping loop.
//!
//! One [`Stepper`] owns all per-batch state and drives each iteration
//! through the same phase sequence:
//!
//! 1. **Initialize** — drain the initializer stack into inactive slots.
//! 2. **Pre-step** — recycle killed slots, promote initializing slots,
//!    and for every alive slot pick the step length and post-step action
//!    from the minimum of the physics, boundary, and limiter distances.
//! 3. **Along-step** — move, apply continuous energy loss and multiple
//!    scattering, advance time.
//! 4. **Post-step** — grouped dispatch: each registered action runs over
//!    exactly the slots that selected it.
//! 5. **Tracking cut** — kill under-cutoff, over-stepped, and errored
//!    tracks, depositing their remaining energy locally.
//!
//! The loop over iterations ends when no slot is occupied and no pending
//! track remains. Reproducibility comes from per-slot RNG streams keyed
//! by track id, never from slot execution order.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cascade_core::constants::C_LIGHT;
use cascade_core::vec3::{added, is_soft_unit, scaled};
use cascade_core::{ActionId, EventId, ParticleId, Real3, TrackId, TrackSlotId, VolumeId};
use cascade_geo::Navigator;
use cascade_phys::{
    Applicability, CutoffParams, EnergyLossTables, HighlandMsc, InteractionKind, InteractionModel,
    MaterialParams, ParticleParams, SampleContext,
};
use cascade_track::{
    InitializerStack, SecondaryStack, TrackInitializer, TrackStateVec, TrackStatus,
};

use crate::action::{ActionKind, ActionRegistry, StepPhase};
use crate::config::{ConfigError, StepperConfig};
use crate::metrics::{StepMetrics, TransportMetrics};
use crate::output::{StepCollector, StepRecord};

/// Splitmix increment used to decorrelate per-track seed streams.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Push past a crossed surface before relocating [cm].
const BOUNDARY_BUMP: f64 = 1e-8;

/// One primary particle submitted to [`Stepper::transport`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primary {
    /// Particle type.
    pub particle_id: ParticleId,
    /// Kinetic energy [MeV].
    pub energy: f64,
    /// Starting position [cm]; must lie inside the world.
    pub position: Real3,
    /// Starting direction (unit vector).
    pub direction: Real3,
    /// Event this primary belongs to.
    pub event_id: EventId,
}

/// Validation errors for a submitted batch of primaries.
///
/// Raised before any stepping begins; a batch either starts whole or not
/// at all.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportError {
    /// A primary references an unregistered particle type.
    UnknownParticle {
        /// Index into the submitted batch.
        index: usize,
        /// The unknown particle.
        particle: ParticleId,
    },
    /// A primary's kinetic energy is not positive and finite.
    InvalidEnergy {
        /// Index into the submitted batch.
        index: usize,
        /// The offending energy [MeV].
        energy: f64,
    },
    /// A primary's direction is not a unit vector.
    InvalidDirection {
        /// Index into the submitted batch.
        index: usize,
    },
    /// A primary starts outside the world.
    OutsideWorld {
        /// Index into the submitted batch.
        index: usize,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParticle { index, particle } => {
                write!(f, "primary {index} references unknown particle {particle}")
            }
            Self::InvalidEnergy { index, energy } => {
                write!(f, "primary {index} has invalid energy {energy}")
            }
            Self::InvalidDirection { index } => {
                write!(f, "primary {index} direction is not a unit vector")
            }
            Self::OutsideWorld { index } => {
                write!(f, "primary {index} starts outside the world")
            }
        }
    }
}

impl Error for TransportError {}

/// Result of one transported batch.
#[derive(Clone, Debug, Default)]
pub struct TransportResult {
    /// Accumulated batch metrics.
    pub metrics: TransportMetrics,
}

/// Per-slot scratch captured at the start of a step for record emission.
#[derive(Clone, Copy, Debug, Default)]
struct StepSnapshot {
    stepped: bool,
    position: Real3,
    energy: f64,
    volume: Option<VolumeId>,
    deposit: f64,
}

/// The transport engine core.
///
/// Owns the track state vector, both particle stacks, the action
/// registry, and every physics collaborator. A stepper is reusable:
/// each [`transport`](Self::transport) call runs an independent batch
/// with fresh counters and track ids.
pub struct Stepper {
    registry: ActionRegistry,
    tracks: TrackStateVec,
    secondaries: SecondaryStack,
    initializers: InitializerStack,
    snapshots: Vec<StepSnapshot>,
    xs_scratch: Vec<f64>,

    navigator: Box<dyn Navigator>,
    particles: ParticleParams,
    materials: MaterialParams,
    cutoffs: CutoffParams,
    models: Vec<Box<dyn InteractionModel>>,
    applicabilities: Vec<Vec<Applicability>>,
    model_actions: Vec<ActionId>,
    eloss: EnergyLossTables,
    msc: HighlandMsc,

    along_step_action: ActionId,
    boundary_action: ActionId,
    step_limit_action: ActionId,
    tracking_cut_action: ActionId,

    seed: u64,
    max_steps: u32,
    max_step_length: f64,
    track_counter: u64,
    last_metrics: StepMetrics,
}

impl Stepper {
    /// Validate a configuration and build the stepper.
    ///
    /// Registers the action set: along-step, one discrete action per
    /// model (in model order), boundary, step-limit, tracking-cut.
    pub fn new(config: StepperConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut registry = ActionRegistry::new();
        let along_step_action =
            registry.register("along-step", ActionKind::AlongStep, StepPhase::AlongStep)?;
        let mut model_actions = Vec::with_capacity(config.models.len());
        for (i, model) in config.models.iter().enumerate() {
            let id = registry.register(
                model.label().to_string(),
                ActionKind::Discrete(i),
                StepPhase::PostStep,
            )?;
            model_actions.push(id);
        }
        let boundary_action =
            registry.register("boundary", ActionKind::Boundary, StepPhase::PostStep)?;
        let step_limit_action =
            registry.register("step-limit", ActionKind::StepLimit, StepPhase::PostStep)?;
        let tracking_cut_action = registry.register(
            "tracking-cut",
            ActionKind::TrackingCut,
            StepPhase::TrackingCut,
        )?;

        let applicabilities = config.models.iter().map(|m| m.applicability()).collect();
        let num_models = config.models.len();

        Ok(Self {
            registry,
            tracks: TrackStateVec::new(config.capacity),
            secondaries: SecondaryStack::new(config.secondary_capacity),
            initializers: InitializerStack::new(config.initializer_capacity),
            snapshots: vec![StepSnapshot::default(); config.capacity],
            xs_scratch: vec![0.0; num_models],
            navigator: config.navigator,
            particles: config.particles,
            materials: config.materials,
            cutoffs: config.cutoffs,
            models: config.models,
            applicabilities,
            model_actions,
            eloss: config.eloss,
            msc: config.msc,
            along_step_action,
            boundary_action,
            step_limit_action,
            tracking_cut_action,
            seed: config.seed,
            max_steps: config.max_steps,
            max_step_length: config.max_step_length,
            track_counter: 0,
            last_metrics: StepMetrics::default(),
        })
    }

    /// The action registry built at construction.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Metrics from the most recent stepping iteration.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Number of track slots.
    pub fn capacity(&self) -> usize {
        self.tracks.capacity()
    }

    /// Transport one batch of primaries to completion.
    ///
    /// Validates every primary up front (fatal on malformed input), then
    /// iterates the stepping loop until no track is occupied and nothing
    /// is pending. Step records go to `collector`; physics and numerical
    /// conditions are resolved per slot and never abort the batch.
    pub fn transport(
        &mut self,
        primaries: &[Primary],
        collector: &mut dyn StepCollector,
    ) -> Result<TransportResult, TransportError> {
        let mut pending = self.validate_primaries(primaries)?;

        // Per-batch state: track ids restart so a batch is a pure
        // function of (config, seed, primaries).
        self.track_counter = 0;
        let mut metrics = TransportMetrics {
            primaries: primaries.len() as u64,
            ..TransportMetrics::default()
        };

        loop {
            // Feed pending primaries into whatever room the stack has.
            while self.initializers.available() > 0 {
                match pending.pop_front() {
                    Some(init) => self
                        .initializers
                        .push(init)
                        .expect("available space was checked"),
                    None => break,
                }
            }
            if self.initializers.is_empty() && self.tracks.occupied() == 0 {
                break;
            }

            let step = self.step(collector, &mut metrics);
            metrics.iterations += 1;
            metrics.track_steps += u64::from(step.track_steps);
            metrics.tracks_created += u64::from(step.tracks_initialized);
            metrics.secondaries_created += u64::from(step.secondaries_created);
            metrics.failed_interactions += u64::from(step.failed_interactions);
            self.last_metrics = step;
        }

        // Recycle slots killed on the final iteration so the stepper can
        // run another batch.
        for i in 0..self.tracks.capacity() {
            let slot = TrackSlotId(i as u32);
            if self.tracks.status(slot) == TrackStatus::Killed {
                self.tracks.set_status(slot, TrackStatus::Inactive);
            }
        }

        Ok(TransportResult { metrics })
    }

    fn validate_primaries(
        &self,
        primaries: &[Primary],
    ) -> Result<VecDeque<TrackInitializer>, TransportError> {
        let mut pending = VecDeque::with_capacity(primaries.len());
        for (index, p) in primaries.iter().enumerate() {
            if !self.particles.contains(p.particle_id) {
                return Err(TransportError::UnknownParticle {
                    index,
                    particle: p.particle_id,
                });
            }
            if !(p.energy.is_finite() && p.energy > 0.0) {
                return Err(TransportError::InvalidEnergy {
                    index,
                    energy: p.energy,
                });
            }
            if !is_soft_unit(&p.direction) {
                return Err(TransportError::InvalidDirection { index });
            }
            if self.navigator.locate(&p.position).is_none() {
                return Err(TransportError::OutsideWorld { index });
            }
            pending.push_back(TrackInitializer {
                particle_id: p.particle_id,
                energy: p.energy,
                direction: p.direction,
                position: p.position,
                time: 0.0,
                parent_id: None,
                event_id: p.event_id,
            });
        }
        Ok(pending)
    }

    /// Execute one stepping iteration.
    fn step(&mut self, collector: &mut dyn StepCollector, batch: &mut TransportMetrics) -> StepMetrics {
        let step_start = Instant::now();
        let mut metrics = StepMetrics {
            active_tracks: self.tracks.occupied() as u32,
            ..StepMetrics::default()
        };
        for snapshot in &mut self.snapshots {
            *snapshot = StepSnapshot::default();
        }

        // 1. Initialize: pull pending tracks into inactive slots.
        let phase_start = Instant::now();
        self.initializers.begin_drain();
        for i in 0..self.tracks.capacity() {
            let slot = TrackSlotId(i as u32);
            if self.tracks.status(slot) != TrackStatus::Inactive {
                continue;
            }
            let Some(init) = self.initializers.claim() else {
                break;
            };
            let track_id = TrackId(self.track_counter);
            self.track_counter += 1;
            let rng = ChaCha8Rng::seed_from_u64(self.seed ^ track_id.0.wrapping_mul(SEED_MIX));
            let volume = self.navigator.locate(&init.position);
            self.tracks.occupy(slot, &init, track_id, rng, volume);
            if volume.is_none() {
                // A secondary born on the world edge: nothing to step.
                self.tracks.set_status(slot, TrackStatus::Errored);
            }
            metrics.tracks_initialized += 1;
        }
        self.initializers.compact();
        metrics.initialize_us = phase_start.elapsed().as_micros() as u64;
        metrics.active_tracks += metrics.tracks_initialized;

        // 2. Pre-step: status maintenance, then step selection.
        let phase_start = Instant::now();
        self.pre_step();
        metrics.pre_step_us = phase_start.elapsed().as_micros() as u64;

        // 3. Along-step over every slot that takes a real step.
        let phase_start = Instant::now();
        let moved = self.along_step(batch);
        metrics.track_steps += moved;
        metrics.action_us.push((
            self.registry.get(self.along_step_action).label.clone(),
            phase_start.elapsed().as_micros() as u64,
        ));

        // 4 + 5. Post-step and tracking-cut dispatch, in registry order.
        let post_ids: Vec<ActionId> = self
            .registry
            .phase_actions(StepPhase::PostStep)
            .chain(self.registry.phase_actions(StepPhase::TrackingCut))
            .map(|a| a.id)
            .collect();
        for action_id in post_ids {
            let phase_start = Instant::now();
            let group = self.action_group(action_id);
            if !group.is_empty() {
                self.execute_action(action_id, &group, &mut metrics, batch);
            }
            metrics.action_us.push((
                self.registry.get(action_id).label.clone(),
                phase_start.elapsed().as_micros() as u64,
            ));
        }

        // 6. Emit records for steps that began in a sensitive volume.
        self.emit_records(collector);

        // 7. Reset the per-step secondary stack.
        self.secondaries.clear();

        metrics.total_us = step_start.elapsed().as_micros() as u64;
        metrics
    }

    /// Status maintenance and step-limit selection for every slot.
    fn pre_step(&mut self) {
        for i in 0..self.tracks.capacity() {
            let slot = TrackSlotId(i as u32);
            match self.tracks.status(slot) {
                TrackStatus::Killed => {
                    self.tracks.set_status(slot, TrackStatus::Inactive);
                    continue;
                }
                TrackStatus::Inactive => continue,
                TrackStatus::Errored => {
                    // No step limit: straight to the tracking cut.
                    self.tracks.set_step_length(slot, 0.0);
                    self.tracks
                        .set_post_step_action(slot, Some(self.tracking_cut_action));
                    continue;
                }
                TrackStatus::Initializing => {
                    self.tracks.set_step_length(slot, 0.0);
                    self.tracks.set_post_step_action(slot, None);
                    self.tracks.set_status(slot, TrackStatus::Alive);
                }
                TrackStatus::Alive => {}
            }
            self.select_step(slot);
        }
    }

    /// Compute the three candidate distances for an alive slot and record
    /// the winning step length and post-step action.
    ///
    /// Tie-breaking follows the fixed priority tracking-cut >
    /// discrete-physics > boundary > step-limit: the cut preempts
    /// everything, physics wins a tie against the limiter, and the
    /// boundary only wins by being strictly closer.
    fn select_step(&mut self, slot: TrackSlotId) {
        let particle = self.tracks.particle(slot);
        let energy = self.tracks.energy(slot);
        let position = self.tracks.position(slot);
        let direction = self.tracks.direction(slot);
        let volume = self
            .tracks
            .volume(slot)
            .expect("alive track is located in a volume");
        let material = self.navigator.volume(volume).material;

        // Highest priority: the tracking cut.
        if energy <= self.cutoffs.energy(particle, material)
            || self.tracks.num_steps(slot) >= self.max_steps
        {
            self.tracks.set_step_length(slot, 0.0);
            self.tracks
                .set_post_step_action(slot, Some(self.tracking_cut_action));
            return;
        }

        let mut step = self.max_step_length;
        let mut action = self.step_limit_action;

        // Physics: exponential interarrival from the total macroscopic
        // cross section over the applicable models.
        let mut sigma_total = 0.0;
        for (i, model) in self.models.iter().enumerate() {
            let applies = self.applicabilities[i]
                .iter()
                .any(|a| a.contains(particle, energy));
            let xs = if applies {
                model.macroscopic_xs(material, energy)
            } else {
                0.0
            };
            self.xs_scratch[i] = xs;
            sigma_total += xs;
        }
        if sigma_total > 0.0 {
            let u: f64 = self.tracks.rng_mut(slot).random::<f64>().max(1e-300);
            let distance = -u.ln() / sigma_total;
            if distance <= step {
                step = distance;
                // Partition the total cross section to pick the model.
                let mut remaining = self.tracks.rng_mut(slot).random::<f64>() * sigma_total;
                let mut selected = self.models.len() - 1;
                for (i, &xs) in self.xs_scratch.iter().enumerate() {
                    if remaining < xs {
                        selected = i;
                        break;
                    }
                    remaining -= xs;
                }
                action = self.model_actions[selected];
            }
        }

        // Geometry: the boundary wins only by being strictly closer.
        let next = self
            .navigator
            .find_next_boundary(&position, &direction, step);
        if next.crossed && next.distance < step {
            step = next.distance;
            action = self.boundary_action;
        }

        debug_assert!(step > 0.0, "alive slot resolved a non-positive step");
        self.tracks.set_step_length(slot, step);
        self.tracks.set_post_step_action(slot, Some(action));
    }

    /// Move, lose energy, scatter, and advance time for stepping slots.
    ///
    /// Returns the number of slots that took a step. Cut-selected slots
    /// are snapshotted (their deposit must land in a record) but do not
    /// move.
    fn along_step(&mut self, batch: &mut TransportMetrics) -> u32 {
        let mut moved = 0;
        for i in 0..self.tracks.capacity() {
            let slot = TrackSlotId(i as u32);
            if self.tracks.status(slot) != TrackStatus::Alive {
                continue;
            }

            let energy = self.tracks.energy(slot);
            self.snapshots[i] = StepSnapshot {
                stepped: true,
                position: self.tracks.position(slot),
                energy,
                volume: self.tracks.volume(slot),
                deposit: 0.0,
            };
            if self.tracks.post_step_action(slot) == Some(self.tracking_cut_action) {
                continue;
            }

            let step = self.tracks.step_length(slot);
            let particle = self.tracks.particle(slot);
            let def = self.particles.get(particle);
            let volume = self.tracks.volume(slot).expect("alive track is located");
            let material = self.navigator.volume(volume).material;

            // Move.
            let direction = self.tracks.direction(slot);
            let position = added(&self.tracks.position(slot), &scaled(&direction, step));
            self.tracks.set_position(slot, position);

            // Continuous loss at the step-start stopping power.
            let loss = self.eloss.energy_loss(particle, material, energy, step);
            if loss > 0.0 {
                self.tracks.set_energy(slot, energy - loss);
                self.snapshots[i].deposit += loss;
                batch.energy_deposited += loss;
            }

            // Lab time from the step-start velocity.
            let momentum = (energy * (energy + 2.0 * def.mass)).sqrt();
            let beta = momentum / (energy + def.mass);
            self.tracks.add_time(slot, step / (beta * C_LIGHT));
            self.tracks.increment_num_steps(slot);

            // Condensed-history deflection.
            if def.charge != 0.0 {
                let rad_length = self.materials.get(material).radiation_length();
                let (mass, charge) = (def.mass, def.charge);
                let deflected = self.msc.deflect(
                    &direction,
                    energy,
                    mass,
                    charge,
                    step,
                    rad_length,
                    self.tracks.rng_mut(slot),
                );
                self.tracks.set_direction(slot, deflected);
            }
            moved += 1;
        }
        moved
    }

    /// Slots whose resolved post-step action is `action_id`.
    fn action_group(&self, action_id: ActionId) -> Vec<TrackSlotId> {
        let mut group = Vec::new();
        for i in 0..self.tracks.capacity() {
            let slot = TrackSlotId(i as u32);
            let status = self.tracks.status(slot);
            if !(status == TrackStatus::Alive || status == TrackStatus::Errored) {
                continue;
            }
            if self.tracks.post_step_action(slot) == Some(action_id) {
                group.push(slot);
            }
        }
        group
    }

    fn execute_action(
        &mut self,
        action_id: ActionId,
        group: &[TrackSlotId],
        metrics: &mut StepMetrics,
        batch: &mut TransportMetrics,
    ) {
        let kind = self.registry.get(action_id).kind;
        match kind {
            ActionKind::AlongStep => unreachable!("along-step is not dispatched post-step"),
            ActionKind::Discrete(model_index) => {
                for &slot in group {
                    self.apply_discrete(model_index, slot, metrics, batch);
                }
            }
            ActionKind::Boundary => {
                for &slot in group {
                    self.apply_boundary(slot, batch);
                }
            }
            ActionKind::StepLimit => {
                // The step already happened along-step; nothing discrete.
            }
            ActionKind::TrackingCut => {
                for &slot in group {
                    self.apply_tracking_cut(slot, batch);
                }
            }
        }
    }

    /// Sample and apply one discrete interaction.
    fn apply_discrete(
        &mut self,
        model_index: usize,
        slot: TrackSlotId,
        metrics: &mut StepMetrics,
        batch: &mut TransportMetrics,
    ) {
        let particle = self.tracks.particle(slot);
        let energy = self.tracks.energy(slot);
        if !self.applicabilities[model_index]
            .iter()
            .any(|a| a.contains(particle, energy))
        {
            // Continuous loss during the step dropped the track out of
            // the model's declared range; the next pre-step reselects.
            return;
        }

        let direction = self.tracks.direction(slot);
        let volume = self.tracks.volume(slot).expect("alive track is located");
        let material = self.navigator.volume(volume).material;

        let ctx = SampleContext {
            energy,
            direction,
            particle,
            material,
            materials: &self.materials,
            cutoffs: &self.cutoffs,
            secondaries: &self.secondaries,
        };
        let interaction = self.models[model_index].sample(&ctx, self.tracks.rng_mut(slot));

        if interaction.kind == InteractionKind::Failed {
            metrics.failed_interactions += 1;
            return;
        }

        // Promote secondaries to initializers, inheriting the parent's
        // position, time, and event. If the initializer stack cannot take
        // all of them, surface the whole attempt as failed: the slot
        // stays alive and resamples next iteration.
        let count = interaction.secondaries.len();
        if count > self.initializers.available() {
            metrics.failed_interactions += 1;
            return;
        }
        let position = self.tracks.position(slot);
        let time = self.tracks.time(slot);
        let event_id = self.tracks.event_id(slot);
        let parent = self.tracks.track_id(slot);
        for index in interaction.secondaries.indices() {
            let secondary = self
                .secondaries
                .get(index)
                .expect("sampler filled its reservation");
            self.initializers
                .push(TrackInitializer {
                    particle_id: secondary.particle_id,
                    energy: secondary.energy,
                    direction: secondary.direction,
                    position,
                    time,
                    parent_id: Some(parent),
                    event_id,
                })
                .expect("initializer room was checked");
        }
        metrics.secondaries_created += count as u32;

        match interaction.kind {
            InteractionKind::Scattered => {
                self.tracks.set_energy(slot, interaction.energy);
                self.tracks.set_direction(slot, interaction.direction);
            }
            InteractionKind::Absorbed => {
                let remaining = self.tracks.energy(slot);
                self.snapshots[slot.get()].deposit += remaining;
                batch.energy_deposited += remaining;
                batch.absorbed += 1;
                self.tracks.set_energy(slot, 0.0);
                self.tracks.set_status(slot, TrackStatus::Killed);
            }
            InteractionKind::Failed => unreachable!("handled above"),
        }
    }

    /// Relocate a slot across the boundary it stopped on.
    fn apply_boundary(&mut self, slot: TrackSlotId, batch: &mut TransportMetrics) {
        let direction = self.tracks.direction(slot);
        let position = added(
            &self.tracks.position(slot),
            &scaled(&direction, BOUNDARY_BUMP),
        );
        self.tracks.set_position(slot, position);
        match self.navigator.locate(&position) {
            Some(volume) => {
                self.tracks.set_volume(slot, Some(volume));
            }
            None => {
                // Left the world: the energy escapes rather than deposits.
                batch.energy_escaped += self.tracks.energy(slot);
                batch.escaped += 1;
                self.tracks.set_status(slot, TrackStatus::Killed);
            }
        }
    }

    /// Kill a cut or errored slot, depositing its remaining energy.
    fn apply_tracking_cut(&mut self, slot: TrackSlotId, batch: &mut TransportMetrics) {
        let remaining = self.tracks.energy(slot);
        if self.tracks.status(slot) == TrackStatus::Errored {
            batch.errored += 1;
        }
        if self.tracks.volume(slot).is_some() {
            self.snapshots[slot.get()].deposit += remaining;
            batch.energy_deposited += remaining;
        } else {
            // Never located: there is no volume to deposit into.
            batch.energy_escaped += remaining;
        }
        batch.cut += 1;
        self.tracks.set_energy(slot, 0.0);
        self.tracks.set_status(slot, TrackStatus::Killed);
    }

    /// Emit a record for every snapshotted step that began in a
    /// sensitive volume.
    fn emit_records(&self, collector: &mut dyn StepCollector) {
        for i in 0..self.tracks.capacity() {
            let snapshot = self.snapshots[i];
            if !snapshot.stepped {
                continue;
            }
            let Some(volume) = snapshot.volume else {
                continue;
            };
            if !self.navigator.volume(volume).sensitive {
                continue;
            }
            let slot = TrackSlotId(i as u32);
            let record = StepRecord {
                track_id: self.tracks.track_id(slot),
                event_id: self.tracks.event_id(slot),
                particle_id: self.tracks.particle(slot),
                volume,
                pre_position: snapshot.position,
                post_position: self.tracks.position(slot),
                pre_energy: snapshot.energy,
                post_energy: self.tracks.energy(slot),
                energy_deposit: snapshot.deposit,
                step_length: self.tracks.step_length(slot),
                time: self.tracks.time(slot),
            };
            collector.collect(&record);
        }
    }
}
