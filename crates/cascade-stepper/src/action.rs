//! The action registry: named, ordered units of step behavior.

use indexmap::IndexMap;

use cascade_core::ActionId;

use crate::config::ConfigError;

/// Which part of the step an action participates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPhase {
    /// Continuous transport applied to every alive slot.
    AlongStep,
    /// Discrete behavior selected per slot in pre-step.
    PostStep,
    /// End-of-step kill pass for cut and errored tracks.
    TrackingCut,
}

/// What an action does when dispatched.
///
/// The set of step behaviors is closed, so dispatch is an enum switch
/// keyed by [`ActionId`] rather than a virtual call per slot; the open
/// extension point is the interaction-model trait behind
/// [`ActionKind::Discrete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Move, continuous energy loss, multiple scattering, time update.
    AlongStep,
    /// Sample and apply the interaction model at this index.
    Discrete(usize),
    /// Relocate across a geometry boundary.
    Boundary,
    /// The configured maximum step length limited this step; no discrete
    /// behavior happens.
    StepLimit,
    /// Kill the track and deposit its remaining energy locally.
    TrackingCut,
}

/// One registered action.
#[derive(Clone, Debug)]
pub struct RegisteredAction {
    /// Dense ID assigned at registration.
    pub id: ActionId,
    /// Unique label for diagnostics and metrics.
    pub label: String,
    /// Dispatch tag.
    pub kind: ActionKind,
    /// Phase the action participates in.
    pub phase: StepPhase,
}

/// Ordered, immutable collection of the actions in a stepper.
///
/// Registration happens once at setup; IDs are dense indices into the
/// registration order, which also defines execution order within a phase.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<RegisteredAction>,
    by_label: IndexMap<String, ActionId>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action, assigning the next dense ID.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        kind: ActionKind,
        phase: StepPhase,
    ) -> Result<ActionId, ConfigError> {
        let label = label.into();
        let id = ActionId(self.actions.len() as u32);
        if self.by_label.insert(label.clone(), id).is_some() {
            return Err(ConfigError::DuplicateAction { label });
        }
        self.actions.push(RegisteredAction {
            id,
            label,
            kind,
            phase,
        });
        Ok(id)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Action by ID.
    pub fn get(&self, id: ActionId) -> &RegisteredAction {
        &self.actions[id.0 as usize]
    }

    /// Look up an action by label.
    pub fn find(&self, label: &str) -> Option<ActionId> {
        self.by_label.get(label).copied()
    }

    /// All actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAction> {
        self.actions.iter()
    }

    /// Actions of one phase, in registration order.
    pub fn phase_actions(&self, phase: StepPhase) -> impl Iterator<Item = &RegisteredAction> {
        self.actions.iter().filter(move |a| a.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_in_registration_order() {
        let mut reg = ActionRegistry::new();
        let a = reg
            .register("along-step", ActionKind::AlongStep, StepPhase::AlongStep)
            .unwrap();
        let b = reg
            .register("boundary", ActionKind::Boundary, StepPhase::PostStep)
            .unwrap();
        assert_eq!(a, ActionId(0));
        assert_eq!(b, ActionId(1));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(b).label, "boundary");
        assert_eq!(reg.find("along-step"), Some(a));
        assert_eq!(reg.find("nope"), None);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut reg = ActionRegistry::new();
        reg.register("x", ActionKind::Boundary, StepPhase::PostStep)
            .unwrap();
        let err = reg
            .register("x", ActionKind::StepLimit, StepPhase::PostStep)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateAction { .. }));
    }

    #[test]
    fn phase_filter_preserves_order() {
        let mut reg = ActionRegistry::new();
        reg.register("along-step", ActionKind::AlongStep, StepPhase::AlongStep)
            .unwrap();
        reg.register("model-a", ActionKind::Discrete(0), StepPhase::PostStep)
            .unwrap();
        reg.register("model-b", ActionKind::Discrete(1), StepPhase::PostStep)
            .unwrap();
        reg.register("boundary", ActionKind::Boundary, StepPhase::PostStep)
            .unwrap();
        let post: Vec<_> = reg
            .phase_actions(StepPhase::PostStep)
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(post, ["model-a", "model-b", "boundary"]);
    }
}
