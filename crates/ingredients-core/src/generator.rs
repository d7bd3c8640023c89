use crate::catalog::{Ingredient, Recipe, RecipeCatalog};
use crate::rng::RandomSource;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;
use tracing::debug;

/// Bounds on how many red herrings join the target's ingredients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoyBounds {
    /// Fewest red herrings ever offered
    pub min_decoys: usize,
    /// Most red herrings ever offered
    pub max_decoys: usize,
    /// Preferred lower bound on the whole offered list
    pub min_offered: usize,
    /// Preferred upper bound on the whole offered list
    pub max_offered: usize,
}

impl Default for DecoyBounds {
    fn default() -> Self {
        Self {
            min_decoys: 2,
            max_decoys: 5,
            min_offered: 7,
            max_offered: 10,
        }
    }
}

impl DecoyBounds {
    /// Range the red herring count is drawn from for a target with
    /// `target_len` ingredients.
    ///
    /// When the clamps cross, the range collapses to its lower end.
    pub fn count_range(&self, target_len: usize) -> RangeInclusive<usize> {
        let lo = self.min_decoys.max(self.min_offered.saturating_sub(target_len));
        let hi = self.max_decoys.min(self.max_offered.saturating_sub(target_len));
        lo..=hi.max(lo)
    }
}

/// Chooses red herrings for a target recipe.
///
/// The chosen set never lets the offered ingredients complete any recipe
/// other than the target: before every pick, each recipe that is one
/// ingredient short has that ingredient struck from the pool.
pub struct RedHerringSelector<'a> {
    catalog: &'a RecipeCatalog,
    bounds: DecoyBounds,
}

impl Default for RedHerringSelector<'static> {
    fn default() -> Self {
        Self::new(RecipeCatalog::global())
    }
}

impl<'a> RedHerringSelector<'a> {
    pub fn new(catalog: &'a RecipeCatalog) -> Self {
        Self {
            catalog,
            bounds: DecoyBounds::default(),
        }
    }

    pub fn with_bounds(catalog: &'a RecipeCatalog, bounds: DecoyBounds) -> Self {
        Self { catalog, bounds }
    }

    pub fn bounds(&self) -> DecoyBounds {
        self.bounds
    }

    /// Pick red herrings for `target`, in the order they were chosen.
    ///
    /// May return fewer than the drawn count if the pool runs dry.
    pub fn select<R: RandomSource + ?Sized>(&self, target: &Recipe, rng: &mut R) -> Vec<Ingredient> {
        let target_set = target.ingredient_set();

        // Ingredients each other dish still lacks
        let mut needed: BTreeMap<&'static str, BTreeSet<Ingredient>> = self
            .catalog
            .recipes()
            .iter()
            .filter(|recipe| *recipe != target)
            .map(|recipe| {
                let missing = recipe.ingredient_set().difference(&target_set).copied().collect();
                (recipe.name(), missing)
            })
            .collect();

        // Ingredients not yet offered
        let mut pool: BTreeSet<Ingredient> = Ingredient::ALL
            .into_iter()
            .filter(|ingredient| !target_set.contains(ingredient))
            .collect();

        let range = self.bounds.count_range(target_set.len());
        let count = rng.range_inclusive(*range.start(), *range.end());

        let mut decoys = Vec::with_capacity(count);

        for _ in 0..count {
            // Strike anything that would complete another dish
            let singletons: Vec<&'static str> = needed
                .iter()
                .filter(|(_, missing)| missing.len() == 1)
                .map(|(name, _)| *name)
                .collect();
            for name in singletons {
                if let Some(missing) = needed.remove(name) {
                    for ingredient in missing {
                        debug!(dish = name, %ingredient, "excluding ingredient that would complete another dish");
                        pool.remove(&ingredient);
                    }
                }
            }

            // The pool starts with at least 52 ingredients and loses at
            // most a handful per round, so this is only a safety net.
            if pool.is_empty() {
                break;
            }

            let index = rng.next_usize(pool.len());
            let Some(next) = pool.iter().nth(index).copied() else {
                break;
            };
            pool.remove(&next);
            decoys.push(next);

            for recipe in self.catalog.recipes_containing(next) {
                if let Some(missing) = needed.get_mut(recipe.name()) {
                    missing.remove(&next);
                }
            }
        }

        decoys
    }
}
