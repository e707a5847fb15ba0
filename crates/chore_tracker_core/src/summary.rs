//! crates/chore_tracker_core/src/summary.rs
//!
//! Derived views over chores and members: completion summary and leaderboard.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{Chore, Member, MemberId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// `completed / total * 100`, capped at 100; 0 when there are no chores.
    pub progress_percent: f64,
}

impl Summary {
    pub fn rounded_percent(&self) -> u32 {
        self.progress_percent.round() as u32
    }
}

pub fn summary(chores: &[Chore]) -> Summary {
    let total = chores.len();
    let completed = chores.iter().filter(|c| c.completed).count();
    let progress_percent = if total == 0 {
        0.0
    } else {
        (completed as f64 / total as f64 * 100.0).min(100.0)
    };
    Summary {
        total,
        completed,
        pending: total - completed,
        progress_percent,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub member_id: MemberId,
    pub name: String,
    pub avatar: String,
    pub completed: usize,
}

impl LeaderboardEntry {
    pub fn medal(&self) -> &'static str {
        match self.rank {
            1 => "🥇",
            2 => "🥈",
            _ => "🥉",
        }
    }
}

/// Ranks members by completed chores, descending. Members without completions
/// are left out; ties are ordered by member id.
pub fn leaderboard(chores: &[Chore], members: &[Member]) -> Vec<LeaderboardEntry> {
    let mut counts: HashMap<&MemberId, usize> = HashMap::new();
    for chore in chores.iter().filter(|c| c.completed) {
        if let Some(member_id) = chore.member_id.as_ref() {
            *counts.entry(member_id).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&Member, usize)> = members
        .iter()
        .filter_map(|m| counts.get(&m.id).map(|&count| (m, count)))
        .collect();
    ranked.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.id.cmp(&b.id)));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (member, completed))| LeaderboardEntry {
            rank: index + 1,
            member_id: member.id.clone(),
            name: member.name.clone(),
            avatar: member.avatar.clone(),
            completed,
        })
        .collect()
}
