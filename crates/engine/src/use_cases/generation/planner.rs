//! Template selection for one quest set.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};

use questforge_domain::{
    GenerationConfig, Granularity, QuestCategory, QuestSystemState, QuestTemplate, TemplateId,
};

use crate::infrastructure::ports::{TemplateCatalog, TemplateFilter};
use crate::selection::{weighted_pick, SeededRng};

/// Result of one planning call.
///
/// `pool_exhausted` is a non-fatal diagnostic: fewer templates were
/// eligible than requested and the set was degraded rather than failed.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub templates: Vec<QuestTemplate>,
    pub pool_exhausted: bool,
}

/// Selects a balanced, varied set of templates from the catalog for one
/// granularity, driven entirely by the caller's seeded generator.
#[derive(Clone)]
pub struct GenerationPlanner {
    catalog: Arc<dyn TemplateCatalog>,
}

impl GenerationPlanner {
    pub fn new(catalog: Arc<dyn TemplateCatalog>) -> Self {
        Self { catalog }
    }

    /// Plan up to `count` templates for `granularity`.
    ///
    /// Guarantees: never the same template twice in one call; output
    /// length never exceeds `count`; category bookkeeping starts fresh on
    /// every call. A pool smaller than `count` degrades to a partial set.
    pub fn plan(
        &self,
        granularity: Granularity,
        count: u32,
        config: &GenerationConfig,
        player_level: u32,
        state: &QuestSystemState,
        now: DateTime<Utc>,
        rng: &mut SeededRng,
    ) -> PlanOutcome {
        let pool = self.eligible_pool(granularity, config, player_level, state, now);

        let mut chosen: Vec<QuestTemplate> = Vec::new();
        let mut chosen_ids: HashSet<TemplateId> = HashSet::new();
        let mut used_categories: HashSet<QuestCategory> = HashSet::new();

        if config.ensure_variety {
            let mut categories: Vec<QuestCategory> = config
                .categories()
                .into_iter()
                .filter(|c| state.is_category_unlocked(*c))
                .collect();
            rng.shuffle(&mut categories);

            for category in categories {
                if chosen.len() as u32 >= count {
                    break;
                }
                if used_categories.contains(&category) {
                    continue;
                }
                let candidates: Vec<&QuestTemplate> = pool
                    .iter()
                    .filter(|t| t.category == category && !chosen_ids.contains(&t.id))
                    .collect();
                let picked = weighted_pick(
                    &candidates,
                    |t| selection_weight(t, &used_categories, config, state),
                    rng,
                );
                if let Some(template) = picked {
                    chosen_ids.insert(template.id.clone());
                    used_categories.insert(template.category);
                    chosen.push((*template).clone());
                }
            }
        }

        // Fill remaining slots from the whole pool, still honoring the
        // first-use category boost.
        while (chosen.len() as u32) < count {
            let candidates: Vec<&QuestTemplate> = pool
                .iter()
                .filter(|t| !chosen_ids.contains(&t.id))
                .collect();
            let picked = weighted_pick(
                &candidates,
                |t| selection_weight(t, &used_categories, config, state),
                rng,
            );
            match picked {
                Some(template) => {
                    chosen_ids.insert(template.id.clone());
                    used_categories.insert(template.category);
                    chosen.push((*template).clone());
                }
                None => break,
            }
        }

        let pool_exhausted = (chosen.len() as u32) < count;
        if pool_exhausted {
            tracing::warn!(
                granularity = %granularity,
                requested = count,
                selected = chosen.len(),
                "template pool exhausted, returning partial quest set"
            );
        } else {
            tracing::debug!(
                granularity = %granularity,
                selected = chosen.len(),
                "planned quest set"
            );
        }

        PlanOutcome {
            templates: chosen,
            pool_exhausted,
        }
    }

    /// Catalog query plus the filters the catalog cannot express: history
    /// avoidance, prerequisites, lifetime completion caps, unlocked
    /// categories, and live event windows.
    fn eligible_pool(
        &self,
        granularity: Granularity,
        config: &GenerationConfig,
        player_level: u32,
        state: &QuestSystemState,
        now: DateTime<Utc>,
    ) -> Vec<QuestTemplate> {
        let mut filter = TemplateFilter::for_granularity(granularity).with_month(now.month());
        if config.adapt_to_player_level {
            filter = filter.with_max_level(player_level);
        }
        let mut pool = self.catalog.list_templates(&filter);

        let recently_completed = if config.consider_player_history {
            state.recently_completed_template_ids(granularity.history_window_days(), now)
        } else {
            HashSet::new()
        };
        let max_difficulty = config.max_difficulty_for(player_level);

        pool.retain(|t| {
            if recently_completed.contains(&t.id) {
                return false;
            }
            if config.adapt_to_player_level && t.difficulty > max_difficulty {
                return false;
            }
            if !state.is_category_unlocked(t.category) {
                return false;
            }
            if !t.prerequisites.iter().all(|p| state.has_completed_template(p)) {
                return false;
            }
            if let Some(max) = t.max_completions {
                if state.completions_of_template(&t.id) >= max {
                    return false;
                }
            }
            if let Some(window) = &t.event_window {
                if !window.contains(now) {
                    return false;
                }
            }
            true
        });
        pool
    }
}

/// Selection weight for one template: catalog weight, category balance,
/// a x2 boost while the category is unused, preference boosts and
/// dampening, and a nudge toward the preferred difficulty.
fn selection_weight(
    template: &QuestTemplate,
    used_categories: &HashSet<QuestCategory>,
    config: &GenerationConfig,
    state: &QuestSystemState,
) -> f64 {
    let prefs = &state.quest_preferences;
    let mut weight = template.weight * config.balance_for(template.category);
    if !used_categories.contains(&template.category) {
        weight *= 2.0;
    }
    if prefs.prefers(template.category) {
        weight *= 1.5;
    }
    if prefs.avoids(template.category) {
        weight *= 0.3;
    }
    if prefs.difficulty_preference == Some(template.difficulty) {
        weight *= 1.25;
    }
    weight
}
