//! Materializes dated quest instances from templates.

use chrono::{DateTime, Duration, Months, Utc};
use regex_lite::Regex;

use questforge_domain::{
    DomainError, Granularity, Quest, QuestId, QuestTemplate, QuestVariation,
};

use crate::selection::SeededRng;

/// Pick the presentation for an instance: the base template or one of its
/// variations, uniformly, from the seeded generator.
pub fn choose_variation<'t>(
    template: &'t QuestTemplate,
    rng: &mut SeededRng,
) -> Option<&'t QuestVariation> {
    if template.variations.is_empty() {
        return None;
    }
    let idx = rng.pick_index(template.variations.len() + 1)?;
    if idx == 0 {
        None
    } else {
        template.variations.get(idx - 1)
    }
}

/// Builds concrete `Quest` instances: resolves variation text, substitutes
/// personalization placeholders, computes XP and the time window, and
/// derives the stable instance id.
pub struct QuestInstanceFactory;

impl QuestInstanceFactory {
    pub fn materialize(
        template: &QuestTemplate,
        variation: Option<&QuestVariation>,
        granularity: Granularity,
        start_date: DateTime<Utc>,
        rng: &mut SeededRng,
    ) -> Result<Quest, DomainError> {
        let difficulty = {
            let modifier = variation.and_then(|v| v.difficulty_modifier).unwrap_or(0);
            (i16::from(template.difficulty) + i16::from(modifier)).clamp(1, 5) as u8
        };

        let (mut title, mut description) = match variation {
            Some(v) => (v.title.clone(), v.description.clone()),
            None => (template.title.clone(), template.description.clone()),
        };
        if template.is_dynamic {
            substitute_placeholders(&mut title, &mut description, difficulty, rng);
        }

        let xp_modifier = variation.and_then(|v| v.xp_modifier).unwrap_or(1.0);
        let xp = ((f64::from(template.base_xp) * xp_modifier).round() as u32).max(10);

        let end_date = end_date_for(template, granularity, start_date);
        let id = QuestId::derive(&template.id, granularity, start_date.date_naive());

        Quest::new(
            id,
            template.id.clone(),
            title,
            description,
            template.category,
            difficulty,
            xp,
            granularity,
            start_date,
            end_date,
            template.max_completions.unwrap_or(1),
            template.time_limit_minutes,
        )
    }
}

/// Time-window rules per granularity.
///
/// Daily quests end at the last instant of the start's calendar day;
/// weekly after seven days; monthly after one calendar month (clamped by
/// chrono at short month ends); special after thirty days unless the
/// template declares an explicit event window, which wins.
fn end_date_for(
    template: &QuestTemplate,
    granularity: Granularity,
    start_date: DateTime<Utc>,
) -> DateTime<Utc> {
    match granularity {
        Granularity::Daily => start_date
            .date_naive()
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|t| t.and_utc())
            .unwrap_or_else(|| start_date + Duration::days(1)),
        Granularity::Weekly => start_date + Duration::days(7),
        Granularity::Monthly => start_date
            .checked_add_months(Months::new(1))
            .unwrap_or_else(|| start_date + Duration::days(30)),
        Granularity::Special => match &template.event_window {
            Some(window) => window.end,
            None => start_date + Duration::days(30),
        },
    }
}

/// Substitute `{{name}}` tokens in title and description.
///
/// Each placeholder name is resolved once per instance, so the same token
/// carries the same value in both fields. Values are drawn from small
/// difficulty-scaled tables by the seeded generator.
fn substitute_placeholders(
    title: &mut String,
    description: &mut String,
    difficulty: u8,
    rng: &mut SeededRng,
) {
    let Ok(pattern) = Regex::new(r"\{\{(\w+)\}\}") else {
        return;
    };

    let mut names: Vec<String> = Vec::new();
    for text in [&*title, &*description] {
        for capture in pattern.captures_iter(text) {
            if let Some(name) = capture.get(1) {
                let name = name.as_str().to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }

    for name in names {
        let values = placeholder_values(&name, difficulty);
        let Some(idx) = rng.pick_index(values.len()) else {
            continue;
        };
        let token = format!("{{{{{}}}}}", name);
        let value = values[idx].to_string();
        *title = title.replace(&token, &value);
        *description = description.replace(&token, &value);
    }
}

/// Fixed value tables per placeholder name, scaled by difficulty (1-5).
fn placeholder_values(name: &str, difficulty: u8) -> &'static [u32] {
    let rung = difficulty.clamp(1, 5) as usize - 1;
    match name {
        "minutes" => {
            const TABLE: [&[u32]; 5] = [
                &[5, 10, 15],
                &[10, 15, 20],
                &[20, 30, 45],
                &[30, 45, 60],
                &[45, 60, 90],
            ];
            TABLE[rung]
        }
        "distance" => {
            const TABLE: [&[u32]; 5] = [&[1, 2], &[2, 3], &[3, 5], &[5, 8], &[8, 10]];
            TABLE[rung]
        }
        "pages" => {
            const TABLE: [&[u32]; 5] = [
                &[5, 10],
                &[10, 15],
                &[15, 20],
                &[20, 30],
                &[30, 50],
            ];
            TABLE[rung]
        }
        // "amount", "count", and anything unrecognized share one table.
        _ => {
            const TABLE: [&[u32]; 5] = [
                &[1, 2, 3],
                &[2, 3, 5],
                &[3, 5, 8],
                &[5, 8, 10],
                &[8, 10, 15],
            ];
            TABLE[rung]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questforge_domain::QuestCategory;

    use crate::selection::Seed;

    fn rng() -> SeededRng {
        SeededRng::new(Seed::from_date_str("2024-03-01:daily"))
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .into()
    }

    fn template() -> QuestTemplate {
        QuestTemplate::new(
            "water",
            "Drink water",
            "Drink eight glasses of water",
            QuestCategory::Health,
            1,
            10,
        )
    }

    #[test]
    fn materializes_the_reference_daily_quest() {
        let quest = QuestInstanceFactory::materialize(
            &template().with_weight(5.0),
            None,
            Granularity::Daily,
            start(),
            &mut rng(),
        )
        .unwrap();

        assert_eq!(quest.id.as_str(), "water_daily_2024-03-01");
        assert_eq!(quest.xp, 10);
        assert_eq!(
            quest.end_date,
            DateTime::parse_from_rfc3339("2024-03-01T23:59:59.999Z").unwrap()
        );
        assert!(!quest.completed);
        assert_eq!(quest.progress, 0);
    }

    #[test]
    fn xp_floor_is_ten() {
        let mut t = template();
        t.base_xp = 12;
        let variation = QuestVariation {
            title: "Sip water".to_string(),
            description: "Just a little".to_string(),
            xp_modifier: Some(0.25),
            difficulty_modifier: None,
        };
        let quest = QuestInstanceFactory::materialize(
            &t,
            Some(&variation),
            Granularity::Daily,
            start(),
            &mut rng(),
        )
        .unwrap();
        // 12 * 0.25 = 3, floored to the minimum of 10.
        assert_eq!(quest.xp, 10);
        assert_eq!(quest.title, "Sip water");
    }

    #[test]
    fn xp_modifier_rounds_to_nearest() {
        let mut t = template();
        t.base_xp = 25;
        let variation = QuestVariation {
            title: "x".to_string(),
            description: "y".to_string(),
            xp_modifier: Some(1.5),
            difficulty_modifier: None,
        };
        let quest = QuestInstanceFactory::materialize(
            &t,
            Some(&variation),
            Granularity::Daily,
            start(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(quest.xp, 38); // round(37.5)
    }

    #[test]
    fn difficulty_modifier_is_clamped() {
        let mut t = template();
        t.difficulty = 5;
        let up = QuestVariation {
            title: "x".to_string(),
            description: "y".to_string(),
            xp_modifier: None,
            difficulty_modifier: Some(2),
        };
        let quest =
            QuestInstanceFactory::materialize(&t, Some(&up), Granularity::Daily, start(), &mut rng())
                .unwrap();
        assert_eq!(quest.difficulty, 5);

        let down = QuestVariation {
            difficulty_modifier: Some(-7),
            ..up
        };
        let quest = QuestInstanceFactory::materialize(
            &t,
            Some(&down),
            Granularity::Daily,
            start(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(quest.difficulty, 1);
    }

    #[test]
    fn weekly_window_is_seven_days() {
        let quest = QuestInstanceFactory::materialize(
            &template().with_granularities(vec![Granularity::Weekly]),
            None,
            Granularity::Weekly,
            start(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(quest.end_date, start() + Duration::days(7));
        assert_eq!(quest.id.as_str(), "water_weekly_2024-03-01");
    }

    #[test]
    fn monthly_window_adds_one_calendar_month() {
        let jan31: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-01-31T08:00:00Z")
            .unwrap()
            .into();
        let quest = QuestInstanceFactory::materialize(
            &template().with_granularities(vec![Granularity::Monthly]),
            None,
            Granularity::Monthly,
            jan31,
            &mut rng(),
        )
        .unwrap();
        // 2024 is a leap year; chrono clamps Jan 31 + 1 month to Feb 29.
        assert_eq!(
            quest.end_date,
            DateTime::parse_from_rfc3339("2024-02-29T08:00:00Z").unwrap()
        );
    }

    #[test]
    fn special_defaults_to_thirty_days() {
        let quest = QuestInstanceFactory::materialize(
            &template().with_granularities(vec![Granularity::Special]),
            None,
            Granularity::Special,
            start(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(quest.end_date, start() + Duration::days(30));
    }

    #[test]
    fn explicit_event_window_wins_for_special() {
        let window_end: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-03-04T00:00:00Z")
            .unwrap()
            .into();
        let t = template()
            .with_granularities(vec![Granularity::Special])
            .with_event_window(start() - Duration::days(1), window_end);
        let quest =
            QuestInstanceFactory::materialize(&t, None, Granularity::Special, start(), &mut rng())
                .unwrap();
        assert_eq!(quest.end_date, window_end);
    }

    #[test]
    fn placeholders_resolve_consistently_across_fields() {
        let t = QuestTemplate::new(
            "read",
            "Read for {{minutes}} minutes",
            "Set a timer for {{minutes}} minutes and read {{pages}} pages",
            QuestCategory::Learning,
            2,
            20,
        )
        .with_personalized_fields(vec!["minutes".to_string(), "pages".to_string()]);

        let quest =
            QuestInstanceFactory::materialize(&t, None, Granularity::Daily, start(), &mut rng())
                .unwrap();

        assert!(!quest.title.contains("{{"));
        assert!(!quest.description.contains("{{"));

        // The minutes value in the title matches the one in the description.
        let title_minutes = quest
            .title
            .split_whitespace()
            .find(|w| w.parse::<u32>().is_ok())
            .unwrap()
            .to_string();
        assert!(quest
            .description
            .contains(&format!("for {} minutes", title_minutes)));
    }

    #[test]
    fn placeholder_substitution_is_deterministic() {
        let t = QuestTemplate::new(
            "walk",
            "Walk {{distance}} km",
            "Walk {{distance}} km today",
            QuestCategory::Fitness,
            3,
            30,
        )
        .with_personalized_fields(vec!["distance".to_string()]);

        let a = QuestInstanceFactory::materialize(&t, None, Granularity::Daily, start(), &mut rng())
            .unwrap();
        let b = QuestInstanceFactory::materialize(&t, None, Granularity::Daily, start(), &mut rng())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn placeholder_values_scale_with_difficulty() {
        assert_eq!(placeholder_values("minutes", 1), &[5, 10, 15]);
        assert_eq!(placeholder_values("minutes", 5), &[45, 60, 90]);
        // Unknown names fall back to the amount table.
        assert_eq!(placeholder_values("reps", 1), &[1, 2, 3]);
    }

    #[test]
    fn variation_choice_is_seeded_and_in_range() {
        let t = template().with_variations(vec![
            QuestVariation {
                title: "a".to_string(),
                description: "a".to_string(),
                xp_modifier: None,
                difficulty_modifier: None,
            },
            QuestVariation {
                title: "b".to_string(),
                description: "b".to_string(),
                xp_modifier: None,
                difficulty_modifier: None,
            },
        ]);

        let first = choose_variation(&t, &mut rng()).map(|v| v.title.clone());
        let second = choose_variation(&t, &mut rng()).map(|v| v.title.clone());
        assert_eq!(first, second);

        assert!(choose_variation(&template(), &mut rng()).is_none());
    }
}
