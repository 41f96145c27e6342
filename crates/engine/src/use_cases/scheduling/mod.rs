//! Reset scheduling across calendar boundaries.
//!
//! Each granularity runs its own Fresh -> Stale -> regenerate cycle,
//! independent of the others. Staleness is a calendar comparison, never an
//! elapsed-duration check: a daily set generated at 23:50 goes stale ten
//! minutes later.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use questforge_domain::{
    DomainError, GenerationConfig, Granularity, Quest, QuestSystemState,
};

use crate::infrastructure::ports::ClockPort;
use crate::use_cases::generation::{generate_into, GenerationPlanner};

/// Which granularities were regenerated by a `check_and_reset` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetFlags {
    pub daily: bool,
    pub weekly: bool,
    pub monthly: bool,
    pub special: bool,
}

impl ResetFlags {
    pub fn any(&self) -> bool {
        self.daily || self.weekly || self.monthly || self.special
    }

    fn set(&mut self, granularity: Granularity) {
        match granularity {
            Granularity::Daily => self.daily = true,
            Granularity::Weekly => self.weekly = true,
            Granularity::Monthly => self.monthly = true,
            Granularity::Special => self.special = true,
        }
    }
}

/// The most recent Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Calendar staleness for the periodic granularities.
///
/// Special quests are event-driven and handled separately.
fn is_stale(granularity: Granularity, last_reset: Option<NaiveDate>, today: NaiveDate) -> bool {
    let Some(last) = last_reset else {
        return true;
    };
    match granularity {
        Granularity::Daily => last != today,
        Granularity::Weekly => week_start(last) != week_start(today),
        Granularity::Monthly => (last.year(), last.month()) != (today.year(), today.month()),
        Granularity::Special => false,
    }
}

/// Decides which quest sets are stale and rebuilds exactly those.
pub struct ResetScheduler {
    clock: Arc<dyn ClockPort>,
    planner: GenerationPlanner,
}

impl ResetScheduler {
    pub fn new(clock: Arc<dyn ClockPort>, planner: GenerationPlanner) -> Self {
        Self { clock, planner }
    }

    /// Check every granularity and regenerate the stale ones.
    ///
    /// When nothing is stale the state comes back unmodified. Reset dates
    /// recorded in the future are rejected as `StaleState` before any
    /// mutation.
    pub fn check_and_reset(
        &self,
        mut state: QuestSystemState,
        player_level: u32,
        config: &GenerationConfig,
    ) -> Result<(QuestSystemState, ResetFlags, Vec<Quest>), DomainError> {
        let now = self.clock.now();
        let today = self.clock.today();

        for granularity in Granularity::all() {
            if let Some(recorded) = state.last_reset_dates.get(granularity) {
                if recorded > today {
                    tracing::warn!(
                        granularity = %granularity,
                        recorded = %recorded,
                        today = %today,
                        "rejecting state with reset date in the future"
                    );
                    return Err(DomainError::StaleState {
                        granularity,
                        recorded,
                        today,
                    });
                }
            }
        }

        let mut flags = ResetFlags::default();
        let mut new_quests: Vec<Quest> = Vec::new();

        for granularity in [
            Granularity::Daily,
            Granularity::Weekly,
            Granularity::Monthly,
        ] {
            let last_reset = state.last_reset_dates.get(granularity);
            if !is_stale(granularity, last_reset, today) {
                continue;
            }

            if last_reset.is_some() {
                self.roll_streak(&mut state, granularity);
            }
            let removed = state.remove_granularity(granularity);
            let generated =
                generate_into(&self.planner, &mut state, granularity, player_level, config, now)?;
            tracing::info!(
                granularity = %granularity,
                removed = removed.len(),
                generated = generated.len(),
                "reset quest set"
            );
            flags.set(granularity);
            new_quests.extend(generated);
        }

        if self.check_special(&mut state, player_level, config, now, today)? {
            flags.set(Granularity::Special);
            // Collect the freshly generated specials for the caller.
            let generated_specials: Vec<_> = state
                .quests_of(Granularity::Special)
                .into_iter()
                .filter(|q| q.start_date == now)
                .cloned()
                .collect();
            new_quests.extend(generated_specials);
        }

        Ok((state, flags, new_quests))
    }

    /// Event-driven staleness for the special set.
    ///
    /// Stale when an active special quest's window has ended, or when the
    /// set is empty and has not been (re)filled today; at most one fill
    /// attempt per day keeps the call idempotent.
    fn check_special(
        &self,
        state: &mut QuestSystemState,
        player_level: u32,
        config: &GenerationConfig,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<bool, DomainError> {
        let expired: Vec<_> = state
            .quests_of(Granularity::Special)
            .into_iter()
            .filter(|q| q.is_expired(now))
            .map(|q| (q.id.clone(), q.completed))
            .collect();

        let has_expired = !expired.is_empty();
        if has_expired {
            // Only the outgoing (expired) instances count toward the streak.
            if expired.iter().any(|(_, completed)| *completed) {
                state.current_streak.increment(Granularity::Special);
            } else {
                state.current_streak.reset(Granularity::Special);
            }
            for (id, _) in &expired {
                state.active_quests.retain(|q| &q.id != id);
                state.player_quest_states.remove(id);
            }
        }

        let last_reset = state.last_reset_dates.get(Granularity::Special);
        let set_empty = state.quests_of(Granularity::Special).is_empty();
        let attempted_today = last_reset == Some(today);

        if !has_expired && (!set_empty || attempted_today) {
            return Ok(false);
        }

        let generated = generate_into(
            &self.planner,
            state,
            Granularity::Special,
            player_level,
            config,
            now,
        )?;
        tracing::info!(
            removed = expired.len(),
            generated = generated.len(),
            "refreshed special quest set"
        );
        Ok(has_expired || !generated.is_empty())
    }

    /// Streak bookkeeping at a boundary: one completed quest of the
    /// outgoing set keeps the streak alive, none breaks it.
    fn roll_streak(&self, state: &mut QuestSystemState, granularity: Granularity) {
        let any_completed = state
            .quests_of(granularity)
            .into_iter()
            .any(|q| q.completed);
        if any_completed {
            state.current_streak.increment(granularity);
        } else {
            state.current_streak.reset(granularity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use questforge_domain::{QuestCategory, QuestTemplate};

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::InMemoryCatalog;

    fn template(id: &str, category: QuestCategory) -> QuestTemplate {
        QuestTemplate::new(id, format!("Quest {}", id), "", category, 1, 10)
    }

    fn scheduler_at(instant: &str, templates: Vec<QuestTemplate>) -> ResetScheduler {
        let clock = Arc::new(FixedClock::at(instant));
        let planner =
            GenerationPlanner::new(Arc::new(InMemoryCatalog::new(templates).unwrap()));
        ResetScheduler::new(clock, planner)
    }

    fn daily_templates() -> Vec<QuestTemplate> {
        vec![
            template("a", QuestCategory::Health),
            template("b", QuestCategory::Fitness),
            template("c", QuestCategory::Learning),
        ]
    }

    #[test]
    fn first_check_populates_every_granularity() {
        let templates = vec![
            template("a", QuestCategory::Health).with_granularities(vec![
                Granularity::Daily,
                Granularity::Weekly,
                Granularity::Monthly,
            ]),
            template("b", QuestCategory::Fitness).with_granularities(vec![
                Granularity::Daily,
                Granularity::Weekly,
            ]),
        ];
        let scheduler = scheduler_at("2024-03-01T09:00:00Z", templates);
        let (state, flags, new_quests) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();

        assert!(flags.daily && flags.weekly && flags.monthly);
        assert!(!new_quests.is_empty());
        let expected_today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            state.last_reset_dates.get(Granularity::Daily),
            Some(expected_today)
        );
    }

    #[test]
    fn same_day_check_is_a_no_op() {
        let scheduler = scheduler_at("2024-01-01T09:00:00Z", daily_templates());
        let (state, flags, _) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.any());

        let later = scheduler_at("2024-01-01T21:00:00Z", daily_templates());
        let (unchanged, flags, new_quests) = later
            .check_and_reset(state.clone(), 1, &GenerationConfig::default())
            .unwrap();
        assert!(!flags.any());
        assert!(new_quests.is_empty());
        assert_eq!(unchanged, state);
    }

    #[test]
    fn next_day_triggers_only_daily_reset() {
        let scheduler = scheduler_at("2024-01-01T09:00:00Z", daily_templates());
        let (state, _, _) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();
        let weekly_reset_before = state.last_reset_dates.get(Granularity::Weekly);

        // Jan 2nd 2024 is a Tuesday in the same week and month.
        let next_day = scheduler_at("2024-01-02T00:10:00Z", daily_templates());
        let (state, flags, _) = next_day
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();

        assert!(flags.daily);
        assert!(!flags.weekly);
        assert!(!flags.monthly);
        assert_eq!(
            state.last_reset_dates.get(Granularity::Weekly),
            weekly_reset_before
        );
    }

    #[test]
    fn weekly_reset_fires_exactly_on_monday_crossing() {
        let templates: Vec<_> = daily_templates()
            .into_iter()
            .map(|t| t.with_granularities(vec![Granularity::Daily, Granularity::Weekly]))
            .collect();

        // Sunday 2024-01-07.
        let sunday = scheduler_at("2024-01-07T09:00:00Z", templates.clone());
        let (state, _, _) = sunday
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();

        // Monday 2024-01-08: week boundary crossed.
        let monday = scheduler_at("2024-01-08T09:00:00Z", templates.clone());
        let (state, flags, _) = monday
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.weekly);

        // Tuesday same week: no second weekly reset.
        let tuesday = scheduler_at("2024-01-09T09:00:00Z", templates);
        let (_, flags, _) = tuesday
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.daily);
        assert!(!flags.weekly);
    }

    #[test]
    fn monthly_reset_fires_on_month_change() {
        let templates: Vec<_> = daily_templates()
            .into_iter()
            .map(|t| t.with_granularities(vec![Granularity::Monthly]))
            .collect();

        let jan = scheduler_at("2024-01-31T09:00:00Z", templates.clone());
        let (state, _, _) = jan
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();

        let feb = scheduler_at("2024-02-01T09:00:00Z", templates.clone());
        let (state, flags, _) = feb
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.monthly);

        let mid_feb = scheduler_at("2024-02-15T09:00:00Z", templates);
        let (_, flags, _) = mid_feb
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert!(!flags.monthly);
    }

    #[test]
    fn year_change_triggers_monthly_reset() {
        let templates: Vec<_> = daily_templates()
            .into_iter()
            .map(|t| t.with_granularities(vec![Granularity::Monthly]))
            .collect();

        let dec = scheduler_at("2023-12-15T09:00:00Z", templates.clone());
        let (state, _, _) = dec
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();

        let jan = scheduler_at("2024-01-02T09:00:00Z", templates);
        let (_, flags, _) = jan
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.monthly);
    }

    #[test]
    fn reset_replaces_quests_regardless_of_completion() {
        let scheduler = scheduler_at("2024-01-01T09:00:00Z", daily_templates());
        let (mut state, _, new_quests) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();
        let first_ids: Vec<_> = new_quests.iter().map(|q| q.id.clone()).collect();

        // Complete one, leave the rest; everything goes on the boundary.
        let now = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .into();
        if let Some(quest) = state.quest_mut(&first_ids[0]) {
            quest.record_completion(now);
        }

        let next_day = scheduler_at("2024-01-02T09:00:00Z", daily_templates());
        let (state, _, _) = next_day
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();

        for id in &first_ids {
            assert!(!state.contains_quest(id));
        }
    }

    #[test]
    fn future_reset_date_is_rejected_as_stale_state() {
        let scheduler = scheduler_at("2024-03-01T09:00:00Z", daily_templates());
        let mut state = QuestSystemState::new();
        state
            .last_reset_dates
            .set(Granularity::Daily, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let result = scheduler.check_and_reset(state, 1, &GenerationConfig::default());
        assert!(matches!(result, Err(DomainError::StaleState { .. })));
    }

    #[test]
    fn streak_rolls_on_completion_and_breaks_on_neglect() {
        let scheduler = scheduler_at("2024-01-01T09:00:00Z", daily_templates());
        let (mut state, _, new_quests) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();

        let now = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .into();
        let first_id = new_quests[0].id.clone();
        if let Some(quest) = state.quest_mut(&first_id) {
            quest.record_completion(now);
        }

        let day2 = scheduler_at("2024-01-02T09:00:00Z", daily_templates());
        let (state, _, _) = day2
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert_eq!(state.current_streak.get(Granularity::Daily), 1);

        // Nothing completed on day 2: the next boundary breaks the streak.
        let day3 = scheduler_at("2024-01-03T09:00:00Z", daily_templates());
        let (state, _, _) = day3
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert_eq!(state.current_streak.get(Granularity::Daily), 0);
    }

    #[test]
    fn special_set_fills_from_live_event_windows() {
        let start: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .into();
        let end: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-03-05T00:00:00Z")
            .unwrap()
            .into();
        let templates = vec![template("festival", QuestCategory::Social)
            .with_granularities(vec![Granularity::Special])
            .with_event_window(start, end)];

        let scheduler = scheduler_at("2024-03-02T09:00:00Z", templates.clone());
        let (state, flags, _) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.special);
        assert_eq!(state.quests_of(Granularity::Special).len(), 1);

        // After the window closes the instance is swept out.
        let after = scheduler_at("2024-03-06T09:00:00Z", templates);
        let (state, flags, _) = after
            .check_and_reset(state, 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.special);
        assert!(state.quests_of(Granularity::Special).is_empty());
    }

    #[test]
    fn empty_special_pool_attempts_at_most_once_per_day() {
        let scheduler = scheduler_at("2024-03-01T09:00:00Z", daily_templates());
        let (state, flags, _) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();
        // daily templates allow Daily only: the special attempt found nothing.
        assert!(!flags.special);

        let again = scheduler_at("2024-03-01T12:00:00Z", daily_templates());
        let (unchanged, flags, _) = again
            .check_and_reset(state.clone(), 1, &GenerationConfig::default())
            .unwrap();
        assert!(!flags.any());
        assert_eq!(unchanged, state);
    }

    #[test]
    fn scheduler_reads_the_clock_once_per_check() {
        use crate::infrastructure::ports::MockClockPort;

        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).returning(|| {
            DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
                .unwrap()
                .into()
        });
        clock
            .expect_today()
            .times(1)
            .returning(|| NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let planner =
            GenerationPlanner::new(Arc::new(InMemoryCatalog::new(daily_templates()).unwrap()));
        let scheduler = ResetScheduler::new(Arc::new(clock), planner);
        let (_, flags, _) = scheduler
            .check_and_reset(QuestSystemState::new(), 1, &GenerationConfig::default())
            .unwrap();
        assert!(flags.daily);
    }

    #[test]
    fn week_start_is_most_recent_monday() {
        // 2024-01-10 is a Wednesday.
        let wednesday = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            week_start(wednesday),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
        // Monday maps to itself.
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(week_start(monday), monday);
        // Sunday belongs to the week started six days earlier.
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(
            week_start(sunday),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
