//! crates/chore_tracker_core/src/members.rs
//!
//! Member registry: registration, removal and display lookups.

use crate::domain::{Chore, Member, MemberId};
use crate::error::{HouseholdError, HouseholdResult};

/// Avatar cycle, picked by `member count mod 8` at registration.
pub const AVATARS: [&str; 8] = ["👨", "👩", "👦", "👧", "👶", "🧒", "👨‍💼", "👩‍💼"];

pub fn avatar_for_index(index: usize) -> &'static str {
    AVATARS[index % AVATARS.len()]
}

/// Registers a member. Names are trimmed and must be unique ignoring case.
pub fn add_member(
    members: &mut Vec<Member>,
    id: MemberId,
    name: &str,
) -> HouseholdResult<Member> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HouseholdError::EmptyName);
    }
    let lowered = name.to_lowercase();
    if members.iter().any(|m| m.name.to_lowercase() == lowered) {
        return Err(HouseholdError::DuplicateMember(name.to_string()));
    }

    let member = Member {
        id,
        name: name.to_string(),
        avatar: avatar_for_index(members.len()).to_string(),
    };
    members.push(member.clone());
    Ok(member)
}

/// Removes a member and clears the assignment of every chore that pointed at it.
/// Returns how many chores were unassigned.
pub fn remove_member(
    members: &mut Vec<Member>,
    chores: &mut [Chore],
    id: &MemberId,
) -> HouseholdResult<usize> {
    let before = members.len();
    members.retain(|m| &m.id != id);
    if members.len() == before {
        return Err(HouseholdError::UnknownMember(id.clone()));
    }

    let mut unassigned = 0;
    for chore in chores.iter_mut().filter(|c| c.is_assigned_to(id)) {
        chore.member_id = None;
        unassigned += 1;
    }
    Ok(unassigned)
}

pub fn find_member<'a>(members: &'a [Member], id: &MemberId) -> Option<&'a Member> {
    members.iter().find(|m| &m.id == id)
}

pub fn member_name<'a>(members: &'a [Member], id: Option<&MemberId>) -> &'a str {
    id.and_then(|id| find_member(members, id))
        .map(|m| m.name.as_str())
        .unwrap_or("Unknown")
}

pub fn member_avatar<'a>(members: &'a [Member], id: Option<&MemberId>) -> &'a str {
    id.and_then(|id| find_member(members, id))
        .map(|m| m.avatar.as_str())
        .unwrap_or("?")
}
