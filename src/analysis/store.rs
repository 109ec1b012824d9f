//! Plan publication and the analysis driver.
//!
//! A type's plan depends on the plans of its generated ancestors, so types
//! are analyzed in waves by base-chain depth. Types within one wave never
//! read each other's plans and run in parallel.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::assemble::assemble;
use super::plan::GenerationPlan;
use crate::config::AnalysisOptions;
use crate::error::{AnalysisError, Result};
use crate::model::{TypeDescriptor, TypeGraph, TypeId};

// ============================================================================
// PLAN STORE
// ============================================================================

/// Publish-once map of finalized plans.
///
/// Once a plan for a type is published it is never replaced; later
/// publications for the same type return the first plan.
#[derive(Default)]
pub struct PlanStore {
    plans: RwLock<FxHashMap<TypeId, Arc<GenerationPlan>>>,
}

impl PlanStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TypeId) -> Option<Arc<GenerationPlan>> {
        self.plans.read().get(id).cloned()
    }

    /// Publish a plan, returning the plan now stored for its type.
    pub fn publish(&self, plan: GenerationPlan) -> Arc<GenerationPlan> {
        // Fast path: already published
        if let Some(existing) = self.plans.read().get(&plan.type_id) {
            return existing.clone();
        }

        let mut plans = self.plans.write();

        // Double-check after acquiring write lock
        if let Some(existing) = plans.get(&plan.type_id) {
            return existing.clone();
        }

        let plan = Arc::new(plan);
        plans.insert(plan.type_id.clone(), plan.clone());
        plan
    }

    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PlanStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanStore")
            .field("count", &self.plans.read().len())
            .finish()
    }
}

// ============================================================================
// ANALYZER
// ============================================================================

/// Entry point: turns a type graph into generation plans.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyze every partial type in the graph.
    ///
    /// Plans are returned in the graph's insertion order.
    pub fn analyze_all(&self, graph: &TypeGraph) -> Result<Vec<Arc<GenerationPlan>>> {
        let store = PlanStore::new();

        let mut waves: Vec<Vec<&TypeDescriptor>> = Vec::new();
        for ty in graph.partial_types() {
            let depth = graph.depth(ty)?;
            if waves.len() <= depth {
                waves.resize_with(depth + 1, Vec::new);
            }
            waves[depth].push(ty);
        }

        for (depth, wave) in waves.iter().enumerate() {
            if wave.is_empty() {
                continue;
            }
            tracing::debug!(depth, types = wave.len(), "analyzing wave");

            // Analyze the wave in parallel
            let results: Vec<_> = wave
                .par_iter()
                .map(|ty| self.analyze_one(graph, &store, ty))
                .collect();

            for plan in results {
                store.publish(plan?);
            }
        }

        graph
            .partial_types()
            .map(|ty| {
                store
                    .get(&ty.id)
                    .ok_or_else(|| AnalysisError::UnknownType(ty.id.clone()))
            })
            .collect()
    }

    /// Analyze one type, first publishing plans for any generated ancestors
    /// missing from `store`.
    pub fn analyze(
        &self,
        graph: &TypeGraph,
        store: &PlanStore,
        id: &TypeId,
    ) -> Result<Arc<GenerationPlan>> {
        if let Some(plan) = store.get(id) {
            return Ok(plan);
        }

        let ty = graph.descriptor(id)?;
        for ancestor in graph.base_chain(ty)? {
            if ancestor.is_partial && store.get(&ancestor.id).is_none() {
                store.publish(self.analyze_one(graph, store, ancestor)?);
            }
        }

        Ok(store.publish(self.analyze_one(graph, store, ty)?))
    }

    fn analyze_one(
        &self,
        graph: &TypeGraph,
        store: &PlanStore,
        ty: &TypeDescriptor,
    ) -> Result<GenerationPlan> {
        let _span = tracing::debug_span!("analyze", ty = %ty.id).entered();
        let chain = graph.base_chain(ty)?;
        let plan = assemble(ty, &chain, store, &self.options);
        tracing::debug!(
            properties = plan.properties.len(),
            diagnostics = plan.diagnostics.len(),
            "plan ready"
        );
        Ok(plan)
    }
}
