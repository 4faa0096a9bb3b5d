//! Immutable particle, material, and cutoff tables.
//!
//! Built once from validated `Input`/`Def` structs before any stepping,
//! then shared read-only (typically via `Arc`) by every track slot. Import
//! of the underlying physics data from external toolkits is a collaborator
//! concern; these tables only check structural invariants.

use indexmap::IndexMap;
use smallvec::SmallVec;

use cascade_core::{ElementId, MaterialId, ParticleId};

use crate::error::ParamsError;

// ── Particles ──────────────────────────────────────────────────────

/// Static properties of one particle type.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleDef {
    /// Unique name, e.g. `"mu-"`.
    pub name: String,
    /// Rest mass [MeV].
    pub mass: f64,
    /// Charge in units of e.
    pub charge: f64,
}

/// Registry of particle types, indexed by [`ParticleId`].
#[derive(Debug)]
pub struct ParticleParams {
    defs: Vec<ParticleDef>,
    by_name: IndexMap<String, ParticleId>,
}

impl ParticleParams {
    /// Build from definitions; IDs are assigned in input order.
    pub fn new(defs: Vec<ParticleDef>) -> Result<Self, ParamsError> {
        if defs.is_empty() {
            return Err(ParamsError::Empty { what: "particle" });
        }
        let mut by_name = IndexMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if !def.mass.is_finite() || def.mass < 0.0 {
                return Err(ParamsError::InvalidMass {
                    name: def.name.clone(),
                    mass: def.mass,
                });
            }
            if by_name
                .insert(def.name.clone(), ParticleId(i as u32))
                .is_some()
            {
                return Err(ParamsError::DuplicateName {
                    name: def.name.clone(),
                });
            }
        }
        Ok(Self { defs, by_name })
    }

    /// Number of registered particle types.
    pub fn size(&self) -> usize {
        self.defs.len()
    }

    /// Definition for an ID assigned by this registry.
    pub fn get(&self, id: ParticleId) -> &ParticleDef {
        &self.defs[id.0 as usize]
    }

    /// Look up an ID by name.
    pub fn find(&self, name: &str) -> Option<ParticleId> {
        self.by_name.get(name).copied()
    }

    /// Whether an ID belongs to this registry.
    pub fn contains(&self, id: ParticleId) -> bool {
        (id.0 as usize) < self.defs.len()
    }
}

// ── Materials ──────────────────────────────────────────────────────

/// Static properties of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDef {
    /// Chemical symbol, e.g. `"Cu"`.
    pub symbol: String,
    /// Atomic number Z.
    pub atomic_number: u32,
    /// Atomic mass [amu].
    pub atomic_mass: f64,
}

/// Input describing one material's composition.
#[derive(Clone, Debug)]
pub struct MaterialInput {
    /// Unique label, e.g. `"Cu"`.
    pub label: String,
    /// Element composition as (element, number fraction); fractions must
    /// sum to one.
    pub elements: SmallVec<[(ElementId, f64); 4]>,
    /// Atom number density [1/cm^3].
    pub number_density: f64,
    /// Radiation length [cm], used by multiple scattering.
    pub radiation_length: f64,
}

#[derive(Clone, Debug)]
struct MaterialRecord {
    label: String,
    elements: SmallVec<[(ElementId, f64); 4]>,
    number_density: f64,
    radiation_length: f64,
}

/// Registry of elements and materials, indexed by [`MaterialId`].
#[derive(Debug)]
pub struct MaterialParams {
    elements: Vec<ElementDef>,
    materials: Vec<MaterialRecord>,
    by_label: IndexMap<String, MaterialId>,
}

impl MaterialParams {
    /// Build from element definitions and material compositions.
    pub fn new(
        elements: Vec<ElementDef>,
        materials: Vec<MaterialInput>,
    ) -> Result<Self, ParamsError> {
        if elements.is_empty() {
            return Err(ParamsError::Empty { what: "element" });
        }
        if materials.is_empty() {
            return Err(ParamsError::Empty { what: "material" });
        }

        let mut by_label = IndexMap::with_capacity(materials.len());
        let mut records = Vec::with_capacity(materials.len());
        for (i, input) in materials.into_iter().enumerate() {
            let mut sum = 0.0;
            for &(element, fraction) in &input.elements {
                if (element.0 as usize) >= elements.len() {
                    return Err(ParamsError::UnknownElement {
                        element,
                        material: input.label,
                    });
                }
                if !(fraction > 0.0) {
                    return Err(ParamsError::InvalidComposition {
                        material: input.label,
                        sum: fraction,
                    });
                }
                sum += fraction;
            }
            if (sum - 1.0).abs() > 1e-6 {
                return Err(ParamsError::InvalidComposition {
                    material: input.label,
                    sum,
                });
            }
            if !(input.number_density > 0.0 && input.number_density.is_finite()) {
                return Err(ParamsError::InvalidMaterial {
                    material: input.label,
                    reason: "number density must be positive",
                });
            }
            if !(input.radiation_length > 0.0 && input.radiation_length.is_finite()) {
                return Err(ParamsError::InvalidMaterial {
                    material: input.label,
                    reason: "radiation length must be positive",
                });
            }
            if by_label
                .insert(input.label.clone(), MaterialId(i as u32))
                .is_some()
            {
                return Err(ParamsError::DuplicateName { name: input.label });
            }
            records.push(MaterialRecord {
                label: input.label,
                elements: input.elements,
                number_density: input.number_density,
                radiation_length: input.radiation_length,
            });
        }

        Ok(Self {
            elements,
            materials: records,
            by_label,
        })
    }

    /// Number of registered materials.
    pub fn size(&self) -> usize {
        self.materials.len()
    }

    /// Accessor view for a material.
    pub fn get(&self, id: MaterialId) -> MaterialView<'_> {
        MaterialView {
            params: self,
            record: &self.materials[id.0 as usize],
        }
    }

    /// Look up an ID by label.
    pub fn find(&self, label: &str) -> Option<MaterialId> {
        self.by_label.get(label).copied()
    }

    /// Whether an ID belongs to this registry.
    pub fn contains(&self, id: MaterialId) -> bool {
        (id.0 as usize) < self.materials.len()
    }
}

/// Read-only view of one material.
#[derive(Clone, Copy, Debug)]
pub struct MaterialView<'a> {
    params: &'a MaterialParams,
    record: &'a MaterialRecord,
}

impl<'a> MaterialView<'a> {
    /// Material label.
    pub fn label(&self) -> &str {
        &self.record.label
    }

    /// Atom number density [1/cm^3].
    pub fn number_density(&self) -> f64 {
        self.record.number_density
    }

    /// Radiation length [cm].
    pub fn radiation_length(&self) -> f64 {
        self.record.radiation_length
    }

    /// Number of elements in the composition.
    pub fn num_elements(&self) -> usize {
        self.record.elements.len()
    }

    /// Element view by component index.
    pub fn element(&self, component: usize) -> ElementView<'a> {
        let (id, fraction) = self.record.elements[component];
        ElementView {
            def: &self.params.elements[id.0 as usize],
            id,
            fraction,
        }
    }

    /// Select an element component by number fraction with a uniform
    /// deviate in [0, 1).
    ///
    /// Samplers that depend only weakly on Z use this instead of a full
    /// per-element cross-section partition.
    pub fn select_element(&self, xi: f64) -> ElementView<'a> {
        let mut remaining = xi;
        for component in 0..self.num_elements() {
            let view = self.element(component);
            if remaining < view.fraction() {
                return view;
            }
            remaining -= view.fraction();
        }
        // Roundoff at xi ~ 1: fall back to the last component.
        self.element(self.num_elements() - 1)
    }
}

/// Read-only view of one element within a material.
#[derive(Clone, Copy, Debug)]
pub struct ElementView<'a> {
    def: &'a ElementDef,
    id: ElementId,
    fraction: f64,
}

impl ElementView<'_> {
    /// Element ID.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Number fraction within the parent material.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Atomic number Z.
    pub fn z(&self) -> f64 {
        f64::from(self.def.atomic_number)
    }

    /// Z^(1/3), used by pair-production kinematic limits.
    pub fn cbrt_z(&self) -> f64 {
        self.z().cbrt()
    }

    /// ln Z.
    pub fn log_z(&self) -> f64 {
        self.z().ln()
    }
}

// ── Cutoffs ────────────────────────────────────────────────────────

/// Per-particle tracking cutoffs, optionally overridden per material.
///
/// A track whose kinetic energy falls below its cutoff is killed by the
/// tracking-cut action with the remaining energy deposited locally.
#[derive(Debug)]
pub struct CutoffParams {
    /// Default cutoff per particle, indexed by particle ID.
    defaults: Vec<f64>,
    /// Sparse per-(particle, material) overrides.
    overrides: IndexMap<(ParticleId, MaterialId), f64>,
}

impl CutoffParams {
    /// Build with a default cutoff per registered particle.
    ///
    /// `defaults` is `(particle, cutoff energy [MeV])`; unlisted particles
    /// get zero (never cut on energy).
    pub fn new(
        particles: &ParticleParams,
        defaults: Vec<(ParticleId, f64)>,
    ) -> Result<Self, ParamsError> {
        let mut table = vec![0.0; particles.size()];
        for (particle, cutoff) in defaults {
            if !particles.contains(particle) {
                return Err(ParamsError::UnknownParticle { particle });
            }
            if !cutoff.is_finite() || cutoff < 0.0 {
                return Err(ParamsError::InvalidCutoff { particle, cutoff });
            }
            table[particle.0 as usize] = cutoff;
        }
        Ok(Self {
            defaults: table,
            overrides: IndexMap::new(),
        })
    }

    /// Add a per-material override.
    pub fn set_override(
        &mut self,
        particle: ParticleId,
        material: MaterialId,
        cutoff: f64,
    ) -> Result<(), ParamsError> {
        if (particle.0 as usize) >= self.defaults.len() {
            return Err(ParamsError::UnknownParticle { particle });
        }
        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(ParamsError::InvalidCutoff { particle, cutoff });
        }
        self.overrides.insert((particle, material), cutoff);
        Ok(())
    }

    /// Cutoff energy [MeV] for a particle in a material.
    pub fn energy(&self, particle: ParticleId, material: MaterialId) -> f64 {
        if let Some(&cutoff) = self.overrides.get(&(particle, material)) {
            return cutoff;
        }
        self.defaults
            .get(particle.0 as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn test_particles() -> ParticleParams {
        ParticleParams::new(vec![
            ParticleDef {
                name: "e-".into(),
                mass: 0.511,
                charge: -1.0,
            },
            ParticleDef {
                name: "mu-".into(),
                mass: 105.66,
                charge: -1.0,
            },
        ])
        .unwrap()
    }

    fn copper() -> MaterialParams {
        MaterialParams::new(
            vec![ElementDef {
                symbol: "Cu".into(),
                atomic_number: 29,
                atomic_mass: 63.546,
            }],
            vec![MaterialInput {
                label: "Cu".into(),
                elements: smallvec![(ElementId(0), 1.0)],
                number_density: 8.49e22,
                radiation_length: 1.436,
            }],
        )
        .unwrap()
    }

    #[test]
    fn particle_lookup_by_name_and_id() {
        let p = test_particles();
        assert_eq!(p.size(), 2);
        let mu = p.find("mu-").unwrap();
        assert_eq!(mu, ParticleId(1));
        assert_eq!(p.get(mu).mass, 105.66);
        assert!(p.find("nu").is_none());
    }

    #[test]
    fn particle_validation() {
        assert!(matches!(
            ParticleParams::new(vec![]),
            Err(ParamsError::Empty { what: "particle" })
        ));
        let dup = ParticleParams::new(vec![
            ParticleDef {
                name: "e-".into(),
                mass: 0.511,
                charge: -1.0,
            },
            ParticleDef {
                name: "e-".into(),
                mass: 0.511,
                charge: -1.0,
            },
        ]);
        assert!(matches!(dup, Err(ParamsError::DuplicateName { .. })));
        let bad = ParticleParams::new(vec![ParticleDef {
            name: "x".into(),
            mass: f64::NAN,
            charge: 0.0,
        }]);
        assert!(matches!(bad, Err(ParamsError::InvalidMass { .. })));
    }

    #[test]
    fn material_views() {
        let m = copper();
        let id = m.find("Cu").unwrap();
        let view = m.get(id);
        assert_eq!(view.label(), "Cu");
        assert_eq!(view.num_elements(), 1);
        let elem = view.element(0);
        assert_eq!(elem.z(), 29.0);
        assert!((elem.cbrt_z() - 29f64.cbrt()).abs() < 1e-12);
        assert!((elem.log_z() - 29f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn element_selection_by_fraction() {
        let m = MaterialParams::new(
            vec![
                ElementDef {
                    symbol: "H".into(),
                    atomic_number: 1,
                    atomic_mass: 1.008,
                },
                ElementDef {
                    symbol: "O".into(),
                    atomic_number: 8,
                    atomic_mass: 15.999,
                },
            ],
            vec![MaterialInput {
                label: "water".into(),
                elements: smallvec![(ElementId(0), 2.0 / 3.0), (ElementId(1), 1.0 / 3.0)],
                number_density: 1.0e23,
                radiation_length: 36.08,
            }],
        )
        .unwrap();
        let view = m.get(MaterialId(0));
        assert_eq!(view.select_element(0.0).id(), ElementId(0));
        assert_eq!(view.select_element(0.5).id(), ElementId(0));
        assert_eq!(view.select_element(0.7).id(), ElementId(1));
        // Roundoff at the top end falls back to the last component.
        assert_eq!(view.select_element(1.0 - 1e-12).id(), ElementId(1));
    }

    #[test]
    fn material_validation() {
        let bad_fraction = MaterialParams::new(
            vec![ElementDef {
                symbol: "Cu".into(),
                atomic_number: 29,
                atomic_mass: 63.546,
            }],
            vec![MaterialInput {
                label: "Cu".into(),
                elements: smallvec![(ElementId(0), 0.5)],
                number_density: 8.49e22,
                radiation_length: 1.436,
            }],
        );
        assert!(matches!(
            bad_fraction,
            Err(ParamsError::InvalidComposition { .. })
        ));

        let bad_element = MaterialParams::new(
            vec![ElementDef {
                symbol: "Cu".into(),
                atomic_number: 29,
                atomic_mass: 63.546,
            }],
            vec![MaterialInput {
                label: "Cu".into(),
                elements: smallvec![(ElementId(3), 1.0)],
                number_density: 8.49e22,
                radiation_length: 1.436,
            }],
        );
        assert!(matches!(
            bad_element,
            Err(ParamsError::UnknownElement { .. })
        ));
    }

    #[test]
    fn cutoffs_default_and_override() {
        let p = test_particles();
        let e = p.find("e-").unwrap();
        let mu = p.find("mu-").unwrap();
        let mut cuts = CutoffParams::new(&p, vec![(e, 0.001)]).unwrap();
        assert_eq!(cuts.energy(e, MaterialId(0)), 0.001);
        // Unlisted particle: zero cutoff.
        assert_eq!(cuts.energy(mu, MaterialId(0)), 0.0);

        cuts.set_override(e, MaterialId(1), 0.1).unwrap();
        assert_eq!(cuts.energy(e, MaterialId(1)), 0.1);
        assert_eq!(cuts.energy(e, MaterialId(0)), 0.001);
    }

    #[test]
    fn cutoff_validation() {
        let p = test_particles();
        assert!(matches!(
            CutoffParams::new(&p, vec![(ParticleId(9), 0.001)]),
            Err(ParamsError::UnknownParticle { .. })
        ));
        assert!(matches!(
            CutoffParams::new(&p, vec![(ParticleId(0), -1.0)]),
            Err(ParamsError::InvalidCutoff { .. })
        ));
    }
}
