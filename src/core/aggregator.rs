//! CB-004: Summary aggregation over the recipe dependency graph.
//!
//! Expands a root entry depth-first. Each recipe's children are its required
//! items, each edge carries a multiplicity, and ingredients are the leaves
//! contributing their cook time and a unit count of themselves.
//!
//! Expansion runs on an explicit frame stack instead of the call stack. The
//! names of the open frames form the in-progress set: re-entering one is a cycle.
//! The number of open frames is bounded by `max_depth`. No results are memoized; every
//! call is a fresh traversal.

use super::registry::Cookbook;
use super::types::*;
use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Summary-time failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("dependency cycle detected at '{0}'")]
    CyclicDependency(String),

    #[error("recipe nesting exceeds {limit} levels at '{name}'")]
    TraversalTooDeep { name: String, limit: usize },

    #[error("quantity overflow while expanding '{0}'")]
    QuantityOverflow(String),
}

/// One recipe being expanded.
struct Frame<'a> {
    recipe: &'a Recipe,
    /// Index of the next required item to visit
    next: usize,
    /// Multiplicity of the child currently being expanded
    pending: u64,
    cook_time: u64,
    counts: IndexMap<&'a str, u64>,
}

impl<'a> Frame<'a> {
    fn new(recipe: &'a Recipe) -> Self {
        Self {
            recipe,
            next: 0,
            pending: 0,
            cook_time: 0,
            counts: IndexMap::new(),
        }
    }

    /// Fold a child's totals into this frame, scaled by `quantity`.
    fn absorb(
        &mut self,
        cook_time: u64,
        counts: impl IntoIterator<Item = (&'a str, u64)>,
        quantity: u64,
    ) -> Result<(), AggregationError> {
        let recipe: &'a Recipe = self.recipe;
        let overflow = || AggregationError::QuantityOverflow(recipe.name.clone());
        self.cook_time = cook_time
            .checked_mul(quantity)
            .and_then(|t| self.cook_time.checked_add(t))
            .ok_or_else(overflow)?;
        for (ingredient, qty) in counts {
            let scaled = qty.checked_mul(quantity).ok_or_else(overflow)?;
            let total = self.counts.entry(ingredient).or_insert(0);
            *total = total.checked_add(scaled).ok_or_else(overflow)?;
        }
        Ok(())
    }
}

fn into_result(cook_time: u64, counts: IndexMap<&str, u64>) -> AggregationResult {
    AggregationResult {
        total_cook_time: cook_time,
        ingredient_totals: counts
            .into_iter()
            .map(|(name, qty)| (name.to_string(), qty))
            .collect(),
    }
}

/// Compute total cook time and flattened ingredient quantities for `root`.
///
/// An ingredient root is a valid summary of itself. A recipe root is expanded
/// through every required item, multiplying quantities along each path and
/// summing totals across duplicate references and sibling branches.
pub fn summarize(
    cookbook: &Cookbook,
    root: &str,
    max_depth: usize,
) -> Result<AggregationResult, AggregationError> {
    let entry = cookbook
        .get(root)
        .ok_or_else(|| AggregationError::UnknownItem(root.to_string()))?;

    let recipe = match entry {
        Entry::Ingredient(ingredient) => {
            let mut counts = IndexMap::new();
            counts.insert(ingredient.name.as_str(), 1);
            return Ok(into_result(ingredient.cook_time, counts));
        }
        Entry::Recipe(recipe) => recipe,
    };

    // `current` is the recipe being expanded; `stack` holds its ancestors.
    let mut stack: Vec<Frame> = Vec::new();
    let mut in_progress: HashSet<&str> = HashSet::new();
    let mut current = enter(&mut in_progress, recipe, 0, max_depth)?;

    loop {
        let recipe = current.recipe;
        if let Some(item) = recipe.required_items.get(current.next) {
            current.next += 1;
            current.pending = item.quantity;

            let child = cookbook.get(&item.name).ok_or_else(|| {
                warn!(recipe = %recipe.name, item = %item.name, "unknown item");
                AggregationError::UnknownItem(item.name.clone())
            })?;

            match child {
                Entry::Ingredient(ingredient) => {
                    current.absorb(
                        ingredient.cook_time,
                        [(ingredient.name.as_str(), 1)],
                        item.quantity,
                    )?;
                }
                Entry::Recipe(sub) => {
                    let frame = enter(&mut in_progress, sub, stack.len() + 1, max_depth)?;
                    stack.push(std::mem::replace(&mut current, frame));
                }
            }
            continue;
        }

        // Every child visited: fold this recipe into its parent.
        in_progress.remove(recipe.name.as_str());
        match stack.pop() {
            Some(mut parent) => {
                let quantity = parent.pending;
                parent.absorb(current.cook_time, current.counts, quantity)?;
                current = parent;
            }
            None => {
                debug!(
                    root,
                    cook_time = current.cook_time,
                    ingredients = current.counts.len(),
                    "summary complete"
                );
                return Ok(into_result(current.cook_time, current.counts));
            }
        }
    }
}

/// Open a frame for `recipe` with `depth` frames already open.
fn enter<'a>(
    in_progress: &mut HashSet<&'a str>,
    recipe: &'a Recipe,
    depth: usize,
    max_depth: usize,
) -> Result<Frame<'a>, AggregationError> {
    if !in_progress.insert(recipe.name.as_str()) {
        warn!(name = %recipe.name, "dependency cycle");
        return Err(AggregationError::CyclicDependency(recipe.name.clone()));
    }
    if depth >= max_depth {
        warn!(name = %recipe.name, limit = max_depth, "traversal too deep");
        return Err(AggregationError::TraversalTooDeep {
            name: recipe.name.clone(),
            limit: max_depth,
        });
    }
    Ok(Frame::new(recipe))
}
