//! Scope filtering: which entities belong in the requested view.
//!
//! Project scope shows everything. File scope shows the active file's
//! entities plus the entities of imported files that are structurally related
//! to what is already shown. Related means either entity names the other via
//! heritage, a property type or a method signature type, with the same kind
//! rules the relationship analyzer applies: a class extends a class, and
//! `implements` or interface `extends` name an interface. Entities are tracked
//! by id, so same-named entities from different files are kept apart.
//!
//! Imported files are visited breadth-first by import depth, ties broken by
//! file path. Within one file, entities are re-checked until no more can be
//! added, so the result does not depend on declaration order inside a file.

use crate::analysis::{references, TargetKind};
use crate::graph::{reachable_files, DependencyGraph, DEFAULT_MAX_DEPTH};
use classgraph_parser_api::{EntitiesByFile, FileId, TypeEntity};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Instant;

/// Requested view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Scope {
    /// Every entity of every file
    Project,
    /// One file plus what its imports contribute
    File { active_file_id: FileId },
}

impl Scope {
    pub fn file(active_file_id: impl Into<FileId>) -> Self {
        Scope::File {
            active_file_id: active_file_id.into(),
        }
    }
}

/// Why an entity survived filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum InclusionReason {
    /// Declared in the active file
    Local,
    /// Imported and related to a local entity
    Imported {
        /// The file whose import brought the entity's file in
        importing_file_id: FileId,
        has_relationship: bool,
    },
    /// Project scope
    ProjectView,
    /// Imported and related only to another imported entity
    Transitive {
        importing_file_id: FileId,
        /// Name of the included entity it is related to
        via: String,
    },
}

impl InclusionReason {
    pub fn name(&self) -> &'static str {
        match self {
            InclusionReason::Local => "local",
            InclusionReason::Imported { .. } => "imported",
            InclusionReason::ProjectView => "project-view",
            InclusionReason::Transitive { .. } => "transitive",
        }
    }
}

/// Scope filter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilterConfig {
    /// Import hops followed from the active file
    pub max_depth: usize,
}

impl Default for ScopeFilterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ScopeFilterConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Result of [`filter_by_scope`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredEntitySet {
    pub entities: Vec<TypeEntity>,
    /// Keyed by entity name; when names collide the first included entity's reason is kept
    pub inclusion_reasons: BTreeMap<String, InclusionReason>,
    pub total_before_filter: usize,
    pub filter_time_ms: f64,
}

impl FilteredEntitySet {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn reason(&self, entity_name: &str) -> Option<&InclusionReason> {
        self.inclusion_reasons.get(entity_name)
    }
}

/// Filter with the default configuration.
pub fn filter_by_scope(
    all_entities_by_file: &EntitiesByFile,
    scope: &Scope,
    dependency_graph: Option<&DependencyGraph>,
) -> FilteredEntitySet {
    filter_by_scope_with(
        all_entities_by_file,
        scope,
        dependency_graph,
        &ScopeFilterConfig::default(),
    )
}

/// Select the entities visible in `scope`.
///
/// Without a dependency graph, file scope yields only the active file's entities.
pub fn filter_by_scope_with(
    all_entities_by_file: &EntitiesByFile,
    scope: &Scope,
    dependency_graph: Option<&DependencyGraph>,
    config: &ScopeFilterConfig,
) -> FilteredEntitySet {
    let start = Instant::now();
    let total_before_filter = all_entities_by_file.values().map(Vec::len).sum();

    let (entities, inclusion_reasons) = match scope {
        Scope::Project => project_view(all_entities_by_file),
        Scope::File { active_file_id } => {
            let mut inclusion = Inclusion::default();
            for entity in all_entities_by_file.get(active_file_id).into_iter().flatten() {
                inclusion.add_local(entity);
            }
            if let Some(graph) = dependency_graph {
                inclusion.follow_imports(all_entities_by_file, graph, active_file_id, config.max_depth);
            }
            inclusion.finish()
        }
    };

    let filtered = FilteredEntitySet {
        entities,
        inclusion_reasons,
        total_before_filter,
        filter_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    debug!(
        "Scope filter kept {}/{} entities in {:.3}ms",
        filtered.len(),
        total_before_filter,
        filtered.filter_time_ms
    );
    filtered
}

type Selection = (Vec<TypeEntity>, BTreeMap<String, InclusionReason>);

fn project_view(all_entities_by_file: &EntitiesByFile) -> Selection {
    let entities: Vec<TypeEntity> = all_entities_by_file.values().flatten().cloned().collect();
    let mut reasons = BTreeMap::new();
    for entity in &entities {
        reasons
            .entry(entity.name.clone())
            .or_insert(InclusionReason::ProjectView);
    }
    (entities, reasons)
}

/// Growing set of included entities
#[derive(Default)]
struct Inclusion<'e> {
    entities: Vec<&'e TypeEntity>,
    reasons: BTreeMap<String, InclusionReason>,
    /// Ids of the active file's entities
    local: HashSet<&'e str>,
    /// Ids of every included entity
    included: HashSet<&'e str>,
    /// Name → included entities carrying it
    by_name: HashMap<&'e str, Vec<&'e TypeEntity>>,
    /// Referenced name → included entities referencing it, with the kind they accept
    referrers: HashMap<String, Vec<(&'e TypeEntity, TargetKind)>>,
}

impl<'e> Inclusion<'e> {
    fn add_local(&mut self, entity: &'e TypeEntity) {
        if self.add(entity, InclusionReason::Local) {
            self.local.insert(&entity.id);
        }
    }

    fn add(&mut self, entity: &'e TypeEntity, reason: InclusionReason) -> bool {
        if !self.included.insert(&entity.id) {
            return false;
        }
        for (name, kind) in references(entity) {
            self.referrers.entry(name).or_default().push((entity, kind));
        }
        self.by_name.entry(&entity.name).or_default().push(entity);
        self.entities.push(entity);
        self.reasons.entry(entity.name.clone()).or_insert(reason);
        true
    }

    /// An included entity related to `entity`, local ones first
    fn related(&self, entity: &TypeEntity, refs: &BTreeSet<(String, TargetKind)>) -> Option<&'e TypeEntity> {
        let incoming = self
            .referrers
            .get(&entity.name)
            .into_iter()
            .flatten()
            .filter(|(_, kind)| kind.accepts(entity))
            .map(|&(referrer, _)| referrer);
        let outgoing = refs.iter().flat_map(|(name, kind)| {
            self.by_name
                .get(name.as_str())
                .into_iter()
                .flatten()
                .copied()
                .filter(move |target| kind.accepts(target))
        });

        let mut first = None;
        for candidate in incoming.chain(outgoing) {
            if self.local.contains(candidate.id.as_str()) {
                return Some(candidate);
            }
            first.get_or_insert(candidate);
        }
        first
    }

    fn follow_imports(
        &mut self,
        all_entities_by_file: &'e EntitiesByFile,
        graph: &DependencyGraph,
        active_file_id: &str,
        max_depth: usize,
    ) {
        let reached = reachable_files(graph, active_file_id, max_depth);
        debug!("Scope filter visiting {} imported files", reached.len());

        for file in reached {
            let Some(candidates) = all_entities_by_file.get(file.file_id) else {
                continue;
            };
            let mut pending: Vec<(&'e TypeEntity, BTreeSet<(String, TargetKind)>)> = candidates
                .iter()
                .filter(|e| !self.included.contains(e.id.as_str()))
                .map(|e| (e, references(e)))
                .collect();

            // Re-check until nothing new joins
            loop {
                let before = pending.len();
                let mut remaining = Vec::with_capacity(before);
                for (entity, refs) in pending {
                    match self.related(entity, &refs) {
                        Some(via) => {
                            let reason = if self.local.contains(via.id.as_str()) {
                                InclusionReason::Imported {
                                    importing_file_id: file.importer.to_string(),
                                    has_relationship: true,
                                }
                            } else {
                                InclusionReason::Transitive {
                                    importing_file_id: file.importer.to_string(),
                                    via: via.name.clone(),
                                }
                            };
                            trace!("Including {} ({})", entity.name, reason.name());
                            self.add(entity, reason);
                        }
                        None => remaining.push((entity, refs)),
                    }
                }
                pending = remaining;
                if pending.len() == before || pending.is_empty() {
                    break;
                }
            }

            for (entity, _) in &pending {
                trace!("Excluding {} from {}: unrelated", entity.name, file.file_id);
            }
        }
    }

    fn finish(self) -> Selection {
        (self.entities.into_iter().cloned().collect(), self.reasons)
    }
}
