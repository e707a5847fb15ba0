//! Builders shared by the unit tests of this crate.

use chrono::NaiveDate;

use crate::domain::{Chore, ChoreId, Frequency, MemberId, Priority, Repeat};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn chore(id: i64, member: Option<&str>) -> Chore {
    Chore {
        id: ChoreId(id),
        text: format!("chore {id}"),
        member_id: member.map(MemberId::from),
        frequency: Frequency::Weekly,
        priority: Priority::default(),
        due_date: date(2024, 5, 1),
        repeat: Repeat::None,
        status_note: String::new(),
        last_completed: None,
        completed: false,
        completion_dates: Vec::new(),
        created_at: String::new(),
    }
}
