//! Morph target assembly: runs every catalog definition over a base mesh.

use std::collections::BTreeMap;
use std::fmt;

use crossbeam_channel::unbounded;
use glam::DVec3;
use morphforge_catalog::{MorphCatalog, MorphDefinition, MorphName};
use morphforge_config::{Config, ProportionTable};
use morphforge_mesh::{BoundsAnalyzer, GeometryError, Mesh, MeshFrame};

use crate::displacement::DisplacementSynthesizer;
use crate::landmarks::{LandmarkEstimator, Landmarks};
use crate::region::RegionClassifier;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunables for a build run.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildOptions {
    /// Up-axis extent above which an undeclared mesh is read as centimeters.
    pub unit_threshold: f64,
    /// Landmark ratios.
    pub proportions: ProportionTable,
    /// Face morphs touching more than this share of the mesh are reported as excessive.
    pub max_affected_fraction: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl BuildOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            unit_threshold: config.analysis.unit_threshold,
            proportions: config.proportions.clone(),
            max_affected_fraction: config.analysis.max_affected_fraction,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Sparse per-vertex offsets relative to the basis, in mesh axes.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphTarget {
    pub name: MorphName,
    pub deltas: BTreeMap<u32, DVec3>,
}

impl MorphTarget {
    /// Number of displaced vertices.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Coarse sanity grade of a target's coverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plausibility {
    /// No vertex matched the region.
    Empty,
    Plausible,
    /// More of the mesh moved than a local feature should.
    Excessive,
}

/// Coverage of one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphReport {
    pub name: MorphName,
    /// Displaced vertex count.
    pub affected: usize,
    /// `affected / vertex count`.
    pub fraction: f64,
    pub plausibility: Plausibility,
}

/// A morph whose region matched no vertex of a mesh.
///
/// Not fatal: the target is still emitted, empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialMatchWarning {
    pub mesh: String,
    pub morph: MorphName,
}

impl fmt::Display for PartialMatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "morph `{}` affects no vertices of mesh `{}`", self.morph, self.mesh)
    }
}

/// Every target produced for one mesh, in catalog order.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphSet {
    pub mesh: String,
    pub vertex_count: usize,
    pub frame: MeshFrame,
    pub landmarks: Landmarks,
    pub targets: Vec<MorphTarget>,
    pub reports: Vec<MorphReport>,
    pub warnings: Vec<PartialMatchWarning>,
}

impl MorphSet {
    pub fn get(&self, name: MorphName) -> Option<&MorphTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn report(&self, name: MorphName) -> Option<&MorphReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Targets keyed by name.
    pub fn to_map(&self) -> BTreeMap<MorphName, BTreeMap<u32, DVec3>> {
        self.targets
            .iter()
            .map(|t| (t.name, t.deltas.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Produces one [`MorphTarget`] per catalog definition for a base mesh.
///
/// Holds the catalog by reference; building never mutates it or the mesh.
#[derive(Clone, Debug)]
pub struct MorphTargetBuilder<'a> {
    catalog: &'a MorphCatalog,
    analyzer: BoundsAnalyzer,
    estimator: LandmarkEstimator,
    max_affected_fraction: f64,
}

impl<'a> MorphTargetBuilder<'a> {
    pub fn new(catalog: &'a MorphCatalog, options: BuildOptions) -> Self {
        Self {
            catalog,
            analyzer: BoundsAnalyzer::new(options.unit_threshold),
            estimator: LandmarkEstimator::new(options.proportions),
            max_affected_fraction: options.max_affected_fraction,
        }
    }

    /// Build every catalog target for `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the mesh cannot be analyzed. Empty regions
    /// are reported as warnings on the returned set, not as errors.
    pub fn build(&self, mesh: &Mesh) -> Result<MorphSet, GeometryError> {
        let frame = self.analyzer.analyze(mesh)?;
        let landmarks = self.estimator.estimate(&frame);
        let anatomical: Vec<DVec3> = mesh
            .positions
            .iter()
            .map(|&p| frame.to_anatomical(p))
            .collect();

        let vertex_count = mesh.len();
        let mut targets = Vec::with_capacity(self.catalog.len());
        let mut reports = Vec::with_capacity(self.catalog.len());
        let mut warnings = Vec::new();

        for definition in self.catalog.iter() {
            let target = build_target(definition, &frame, &landmarks, &anatomical);
            let report = self.grade(definition, &target, vertex_count);

            match report.plausibility {
                Plausibility::Empty => {
                    let warning = PartialMatchWarning {
                        mesh: mesh.name.clone(),
                        morph: definition.name,
                    };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                }
                Plausibility::Excessive => tracing::warn!(
                    mesh = %mesh.name,
                    morph = %definition.name,
                    affected = report.affected,
                    fraction = report.fraction,
                    "morph moves an implausibly large share of the mesh"
                ),
                Plausibility::Plausible => tracing::debug!(
                    mesh = %mesh.name,
                    morph = %definition.name,
                    affected = report.affected,
                    "built morph target"
                ),
            }

            targets.push(target);
            reports.push(report);
        }

        tracing::info!(
            mesh = %mesh.name,
            vertices = vertex_count,
            targets = targets.len(),
            empty = warnings.len(),
            "built morph set"
        );

        Ok(MorphSet {
            mesh: mesh.name.clone(),
            vertex_count,
            frame,
            landmarks,
            targets,
            reports,
            warnings,
        })
    }

    /// Build several independent meshes in parallel.
    ///
    /// Results come back in input order; one mesh failing does not affect the others.
    pub fn build_batch(&self, meshes: &[Mesh]) -> Vec<Result<MorphSet, GeometryError>> {
        let workers = num_cpus::get().clamp(1, meshes.len().max(1));
        let (task_tx, task_rx) = unbounded::<(usize, &Mesh)>();
        let (result_tx, result_rx) = unbounded();

        for task in meshes.iter().enumerate() {
            // Receiver is alive until the scope below ends.
            let _ = task_tx.send(task);
        }
        drop(task_tx);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    while let Ok((index, mesh)) = task_rx.recv() {
                        let _ = result_tx.send((index, self.build(mesh)));
                    }
                });
            }
        });
        drop(result_tx);

        let mut results: Vec<_> = result_rx.iter().collect();
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    fn grade(
        &self,
        definition: &MorphDefinition,
        target: &MorphTarget,
        vertex_count: usize,
    ) -> MorphReport {
        let affected = target.len();
        let fraction = affected as f64 / vertex_count as f64;
        // Body builds legitimately move most of the mesh.
        let plausibility = if affected == 0 {
            Plausibility::Empty
        } else if definition.region.anchor.is_face() && fraction > self.max_affected_fraction {
            Plausibility::Excessive
        } else {
            Plausibility::Plausible
        };
        MorphReport {
            name: definition.name,
            affected,
            fraction,
            plausibility,
        }
    }
}

fn build_target(
    definition: &MorphDefinition,
    frame: &MeshFrame,
    landmarks: &Landmarks,
    anatomical: &[DVec3],
) -> MorphTarget {
    let region = RegionClassifier::new(&definition.region, landmarks);
    let synthesizer = DisplacementSynthesizer::new(definition, landmarks, region.centre());

    let deltas = anatomical
        .iter()
        .zip(0u32..)
        .filter_map(|(&p, index)| {
            let weight = region.classify(p)?;
            Some((index, frame.to_mesh(synthesizer.synthesize(p, weight))))
        })
        .collect();

    MorphTarget {
        name: definition.name,
        deltas,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
