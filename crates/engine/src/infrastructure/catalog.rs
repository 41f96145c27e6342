//! In-memory template catalog adapter.

use questforge_domain::{DomainError, QuestTemplate};

use crate::infrastructure::ports::{TemplateCatalog, TemplateFilter};

/// Catalog backed by a plain vector, validated on construction.
///
/// Catalog order is preserved by queries, which keeps generation
/// deterministic for a fixed data set.
pub struct InMemoryCatalog {
    templates: Vec<QuestTemplate>,
}

impl InMemoryCatalog {
    pub fn new(templates: Vec<QuestTemplate>) -> Result<Self, DomainError> {
        for template in &templates {
            template.validate()?;
        }
        Ok(Self { templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateCatalog for InMemoryCatalog {
    fn list_templates(&self, filter: &TemplateFilter) -> Vec<QuestTemplate> {
        self.templates
            .iter()
            .filter(|t| filter.granularity.is_none_or(|g| t.allows(g)))
            .filter(|t| filter.category.is_none_or(|c| t.category == c))
            .filter(|t| filter.max_level.is_none_or(|l| t.level_requirement <= l))
            .filter(|t| filter.month.is_none_or(|m| t.available_in_month(m)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questforge_domain::{Granularity, QuestCategory};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            QuestTemplate::new("water", "Drink water", "", QuestCategory::Health, 1, 10),
            QuestTemplate::new("run", "Go for a run", "", QuestCategory::Fitness, 2, 25)
                .with_granularities(vec![Granularity::Daily, Granularity::Weekly])
                .with_level_requirement(3),
            QuestTemplate::new("ski", "Hit the slopes", "", QuestCategory::Fitness, 3, 40)
                .with_granularities(vec![Granularity::Weekly])
                .with_seasonal_availability(vec![12, 1, 2]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_invalid_templates() {
        let mut bad = QuestTemplate::new("bad", "Bad", "", QuestCategory::Health, 1, 10);
        bad.weight = -1.0;
        assert!(InMemoryCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn filters_by_granularity() {
        let daily = catalog().list_templates(&TemplateFilter::for_granularity(Granularity::Daily));
        let ids: Vec<&str> = daily.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["water", "run"]);
    }

    #[test]
    fn filters_by_level() {
        let filter = TemplateFilter::for_granularity(Granularity::Daily).with_max_level(1);
        let eligible = catalog().list_templates(&filter);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id.as_str(), "water");
    }

    #[test]
    fn filters_by_month() {
        let winter = TemplateFilter::for_granularity(Granularity::Weekly).with_month(1);
        let summer = TemplateFilter::for_granularity(Granularity::Weekly).with_month(7);
        assert_eq!(catalog().list_templates(&winter).len(), 2);
        assert_eq!(catalog().list_templates(&summer).len(), 1);
    }

    #[test]
    fn filters_by_category() {
        let filter = TemplateFilter {
            category: Some(QuestCategory::Fitness),
            ..TemplateFilter::default()
        };
        let fitness = catalog().list_templates(&filter);
        assert_eq!(fitness.len(), 2);
    }
}
