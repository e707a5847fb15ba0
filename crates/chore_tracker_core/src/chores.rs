//! crates/chore_tracker_core/src/chores.rs
//!
//! Chore store and scheduler: creation, completion toggling with point
//! effects, recurrence reset, display ordering and removal.

use chrono::{DateTime, Days, FixedOffset, Months, NaiveDate, Utc};
use std::cmp::Reverse;

use crate::domain::{Chore, ChoreId, MemberId, NewChore, PointsLedger, Priority, Repeat};
use crate::error::{HouseholdError, HouseholdResult};

/// Validates the input and builds a pending chore.
///
/// Checks run in order: text, assignee, due date, priority. `member_exists`
/// rejects references to members that are not registered.
pub fn create_chore(
    input: NewChore,
    id: ChoreId,
    created_at: String,
    member_exists: impl Fn(&MemberId) -> bool,
) -> HouseholdResult<Chore> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(HouseholdError::EmptyChoreText);
    }
    let member_id = input.member_id.ok_or(HouseholdError::NoMemberSelected)?;
    let due_date = input.due_date.ok_or(HouseholdError::MissingDueDate)?;
    let priority = match input.priority {
        Some(value) => Priority::new(value)?,
        None => Priority::default(),
    };
    if !member_exists(&member_id) {
        return Err(HouseholdError::UnknownMember(member_id));
    }

    Ok(Chore {
        id,
        text: text.to_string(),
        member_id: Some(member_id),
        frequency: input.frequency,
        priority,
        due_date,
        repeat: input.repeat.unwrap_or_default(),
        status_note: input
            .status_note
            .map(|note| note.trim().to_string())
            .unwrap_or_default(),
        last_completed: None,
        completed: false,
        completion_dates: Vec::new(),
        created_at,
    })
}

/// Result of flipping a chore's completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub chore_id: ChoreId,
    pub completed: bool,
    pub member_id: Option<MemberId>,
    /// Points awarded (on completion) or deducted (on un-completion).
    pub points: u32,
    /// The member's balance afterwards; `None` for unassigned chores.
    pub balance: Option<u32>,
}

/// Flips completion. Completing records `now` and awards `10 + 5 * priority`
/// points; un-completing deducts the same amount, floored at zero. Unassigned
/// chores move no points.
pub fn toggle_completion(
    chores: &mut [Chore],
    ledger: &mut PointsLedger,
    id: ChoreId,
    now: DateTime<Utc>,
) -> HouseholdResult<ToggleOutcome> {
    let chore = chores
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(HouseholdError::UnknownChore(id))?;

    chore.completed = !chore.completed;
    if chore.completed {
        chore.completion_dates.push(now);
        chore.last_completed = Some(now);
    }

    let points = chore.priority.points();
    let balance = chore.member_id.as_ref().map(|member_id| {
        if chore.completed {
            ledger.award(member_id, points)
        } else {
            ledger.deduct(member_id, points)
        }
    });

    Ok(ToggleOutcome {
        chore_id: chore.id,
        completed: chore.completed,
        member_id: chore.member_id.clone(),
        points,
        balance,
    })
}

/// Whether a chore last completed on `last` is due again on `today`.
pub fn should_reset(repeat: Repeat, last: NaiveDate, today: NaiveDate) -> bool {
    match repeat {
        Repeat::None => false,
        Repeat::Daily => last < today,
        Repeat::Weekly => today
            .checked_sub_days(Days::new(7))
            .is_some_and(|threshold| last <= threshold),
        Repeat::Monthly => today
            .checked_sub_months(Months::new(1))
            .is_some_and(|threshold| last <= threshold),
    }
}

/// Marks completed recurring chores pending again once their cadence has
/// elapsed. Only the `completed` flag changes; history and points are kept.
/// Dates are truncated in the household's `offset`. Returns the reset ids.
pub fn reset_recurring(
    chores: &mut [Chore],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<ChoreId> {
    let today = now.with_timezone(&offset).date_naive();
    let mut reset = Vec::new();
    for chore in chores.iter_mut() {
        if !chore.completed || !chore.repeat.is_recurring() {
            continue;
        }
        let Some(last_completed) = chore.last_completed else {
            continue;
        };
        let last = last_completed.with_timezone(&offset).date_naive();
        if should_reset(chore.repeat, last, today) {
            chore.completed = false;
            reset.push(chore.id);
        }
    }
    reset
}

/// Stable display order: pending first, then priority descending, then due date ascending.
pub fn sort_for_display(chores: &mut [Chore]) {
    chores.sort_by_key(|c| (c.completed, Reverse(c.priority), c.due_date));
}

pub fn delete_chore(chores: &mut Vec<Chore>, id: ChoreId) -> HouseholdResult<Chore> {
    let index = chores
        .iter()
        .position(|c| c.id == id)
        .ok_or(HouseholdError::UnknownChore(id))?;
    Ok(chores.remove(index))
}

/// Drops every completed chore, returning how many were removed.
pub fn clear_completed(chores: &mut Vec<Chore>) -> usize {
    let before = chores.len();
    chores.retain(|c| !c.completed);
    before - chores.len()
}

pub fn pending_for<'a>(chores: &'a [Chore], member_id: &MemberId) -> Vec<&'a Chore> {
    chores
        .iter()
        .filter(|c| !c.completed && c.is_assigned_to(member_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Frequency;
    use crate::testing::{chore, date};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn input(text: &str) -> NewChore {
        NewChore {
            text: text.to_string(),
            member_id: Some("a".into()),
            frequency: Frequency::Daily,
            priority: Some(4),
            due_date: Some(date(2024, 5, 2)),
            repeat: None,
            status_note: Some("  in progress ".to_string()),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let created = create_chore(input(" Dishes "), ChoreId(1), "now".into(), |_| true).unwrap();
        assert_eq!(created.text, "Dishes");
        assert_eq!(created.repeat, Repeat::None);
        assert_eq!(created.status_note, "in progress");
        assert!(!created.completed);
        assert!(created.completion_dates.is_empty());
        assert_eq!(created.last_completed, None);

        let mut no_priority = input("Laundry");
        no_priority.priority = None;
        let created = create_chore(no_priority, ChoreId(2), "now".into(), |_| true).unwrap();
        assert_eq!(created.priority.value(), 3);
    }

    #[test]
    fn create_validates_in_order() {
        let mut bad = input("  ");
        bad.member_id = None;
        assert!(matches!(
            create_chore(bad, ChoreId(1), String::new(), |_| true),
            Err(HouseholdError::EmptyChoreText)
        ));

        let mut bad = input("Dishes");
        bad.member_id = None;
        assert!(matches!(
            create_chore(bad, ChoreId(1), String::new(), |_| true),
            Err(HouseholdError::NoMemberSelected)
        ));

        let mut bad = input("Dishes");
        bad.due_date = None;
        assert!(matches!(
            create_chore(bad, ChoreId(1), String::new(), |_| true),
            Err(HouseholdError::MissingDueDate)
        ));

        for priority in [0, 6, -3] {
            let mut bad = input("Dishes");
            bad.priority = Some(priority);
            assert!(matches!(
                create_chore(bad, ChoreId(1), String::new(), |_| true),
                Err(HouseholdError::PriorityOutOfRange(p)) if p == priority
            ));
        }

        assert!(matches!(
            create_chore(input("Dishes"), ChoreId(1), String::new(), |_| false),
            Err(HouseholdError::UnknownMember(_))
        ));
    }

    #[test]
    fn completing_awards_priority_points() {
        let mut chores = vec![chore(1, Some("a"))];
        chores[0].priority = Priority::new(5).unwrap();
        let mut ledger = PointsLedger::default();

        let outcome = toggle_completion(&mut chores, &mut ledger, ChoreId(1), at(2024, 5, 1, 9)).unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.points, 35);
        assert_eq!(outcome.balance, Some(35));
        assert_eq!(chores[0].last_completed, Some(at(2024, 5, 1, 9)));
        assert_eq!(chores[0].completion_dates, vec![at(2024, 5, 1, 9)]);
    }

    #[test]
    fn uncompleting_deducts_and_floors_at_zero() {
        let mut chores = vec![chore(1, Some("a"))];
        let mut ledger = PointsLedger::default();
        let member: MemberId = "a".into();

        toggle_completion(&mut chores, &mut ledger, ChoreId(1), at(2024, 5, 1, 9)).unwrap();
        assert_eq!(ledger.balance(&member), 25);
        ledger.debit(&member, 20).unwrap();

        let outcome = toggle_completion(&mut chores, &mut ledger, ChoreId(1), at(2024, 5, 1, 10)).unwrap();
        assert!(!outcome.completed);
        assert_eq!(outcome.balance, Some(0));
        // History is append-only.
        assert_eq!(chores[0].completion_dates.len(), 1);
    }

    #[test]
    fn unassigned_chore_moves_no_points() {
        let mut chores = vec![chore(1, None)];
        let mut ledger = PointsLedger::default();
        let outcome = toggle_completion(&mut chores, &mut ledger, ChoreId(1), at(2024, 5, 1, 9)).unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.balance, None);
        assert_eq!(ledger.iter().count(), 0);
    }

    #[test]
    fn toggling_unknown_chore_fails() {
        let mut ledger = PointsLedger::default();
        assert!(matches!(
            toggle_completion(&mut [], &mut ledger, ChoreId(9), at(2024, 5, 1, 9)),
            Err(HouseholdError::UnknownChore(ChoreId(9)))
        ));
    }

    #[test]
    fn reset_thresholds_per_cadence() {
        let today = date(2024, 3, 31);
        assert!(should_reset(Repeat::Daily, date(2024, 3, 30), today));
        assert!(!should_reset(Repeat::Daily, today, today));

        assert!(should_reset(Repeat::Weekly, date(2024, 3, 24), today));
        assert!(!should_reset(Repeat::Weekly, date(2024, 3, 25), today));

        // One month before March 31st clamps to February 29th.
        assert!(should_reset(Repeat::Monthly, date(2024, 2, 29), today));
        assert!(!should_reset(Repeat::Monthly, date(2024, 3, 1), today));

        assert!(!should_reset(Repeat::None, date(2000, 1, 1), today));
    }

    #[test]
    fn reset_only_touches_completed_recurring_chores() {
        let mut daily = chore(1, Some("a"));
        daily.repeat = Repeat::Daily;
        daily.completed = true;
        daily.last_completed = Some(at(2024, 5, 1, 23));
        daily.completion_dates = vec![at(2024, 5, 1, 23)];

        let mut never_completed = chore(2, Some("a"));
        never_completed.repeat = Repeat::Daily;

        let mut one_off = chore(3, Some("a"));
        one_off.completed = true;
        one_off.last_completed = Some(at(2024, 4, 1, 8));

        let mut chores = vec![daily, never_completed.clone(), one_off.clone()];
        let reset = reset_recurring(&mut chores, at(2024, 5, 2, 8), utc());

        assert_eq!(reset, vec![ChoreId(1)]);
        assert!(!chores[0].completed);
        assert_eq!(chores[0].last_completed, Some(at(2024, 5, 1, 23)));
        assert_eq!(chores[0].completion_dates.len(), 1);
        assert_eq!(chores[1], never_completed);
        assert_eq!(chores[2], one_off);
    }

    #[test]
    fn reset_truncates_dates_in_household_offset() {
        let mut daily = chore(1, Some("a"));
        daily.repeat = Repeat::Daily;
        daily.completed = true;
        // 23:30 UTC on May 1st is already May 2nd at UTC+2.
        daily.last_completed = Some(Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap());
        let mut chores = vec![daily];

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let reset = reset_recurring(&mut chores, at(2024, 5, 2, 6), plus_two);
        assert!(reset.is_empty());
        assert!(chores[0].completed);
    }

    #[test]
    fn display_order_is_pending_priority_due_date() {
        let mut done_urgent = chore(1, Some("a"));
        done_urgent.completed = true;
        done_urgent.priority = Priority::new(5).unwrap();

        let mut low = chore(2, Some("a"));
        low.priority = Priority::new(1).unwrap();

        let mut high_late = chore(3, Some("a"));
        high_late.priority = Priority::new(5).unwrap();
        high_late.due_date = date(2024, 6, 1);

        let mut high_early = chore(4, Some("a"));
        high_early.priority = Priority::new(5).unwrap();
        high_early.due_date = date(2024, 5, 20);

        let mut chores = vec![done_urgent, low, high_late, high_early];
        sort_for_display(&mut chores);
        let ids: Vec<i64> = chores.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn delete_and_clear_completed() {
        let mut chores = vec![chore(1, None), chore(2, None), chore(3, None)];
        chores[1].completed = true;

        assert_eq!(delete_chore(&mut chores, ChoreId(1)).unwrap().id, ChoreId(1));
        assert!(delete_chore(&mut chores, ChoreId(1)).is_err());
        assert_eq!(clear_completed(&mut chores), 1);
        assert_eq!(chores.len(), 1);
        assert_eq!(chores[0].id, ChoreId(3));
    }

    #[test]
    fn overdue_ignores_completed_chores() {
        let mut c = chore(1, None);
        assert!(c.is_overdue(date(2024, 5, 2)));
        assert!(!c.is_overdue(date(2024, 5, 1)));
        c.completed = true;
        assert!(!c.is_overdue(date(2024, 5, 2)));
    }
}
