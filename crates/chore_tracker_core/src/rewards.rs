//! crates/chore_tracker_core/src/rewards.rs
//!
//! Rewards ledger: the reward catalog, redemption against point balances and
//! the append-only redemption history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{MemberId, PointsLedger, Redemption, Reward};
use crate::error::{HouseholdError, HouseholdResult};

fn reward(id: &str, emoji: &str, name: &str, description: &str, cost: u32) -> Reward {
    Reward {
        id: id.to_string(),
        emoji: emoji.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        cost,
    }
}

/// Catalog used until a household stores its own.
pub fn default_catalog() -> Vec<Reward> {
    vec![
        reward("movie", "🎬", "Pick the Movie", "Choose tonight's movie", 100),
        reward("snack", "🍿", "Special Snack", "Get a special treat", 75),
        reward("bedtime", "⏰", "Later Bedtime", "Stay up 1 hour later", 150),
        reward("game", "🎮", "Extra Game Time", "30 minutes extra screen time", 120),
        reward("pizza", "🍕", "Pizza Night", "Choose pizza toppings", 200),
        reward("trip", "🚗", "Family Outing", "Plan a small outing", 300),
    ]
}

/// Appends a reward to the catalog after validating it.
pub fn add_reward(catalog: &mut Vec<Reward>, reward: Reward) -> HouseholdResult<()> {
    if reward.id.trim().is_empty() {
        return Err(HouseholdError::InvalidReward("id must not be empty".to_string()));
    }
    if reward.name.trim().is_empty() {
        return Err(HouseholdError::InvalidReward("name must not be empty".to_string()));
    }
    if reward.cost == 0 {
        return Err(HouseholdError::InvalidReward("cost must be positive".to_string()));
    }
    if catalog.iter().any(|r| r.id == reward.id) {
        return Err(HouseholdError::InvalidReward(format!(
            "a reward with id '{}' already exists",
            reward.id
        )));
    }
    catalog.push(reward);
    Ok(())
}

/// Exchanges points for a reward. The balance must cover the full cost;
/// on failure neither the ledger nor the history changes.
pub fn redeem(
    catalog: &[Reward],
    ledger: &mut PointsLedger,
    history: &mut Vec<Redemption>,
    reward_id: &str,
    member_id: Option<&MemberId>,
    now: DateTime<Utc>,
) -> HouseholdResult<Redemption> {
    let reward = catalog
        .iter()
        .find(|r| r.id == reward_id)
        .ok_or_else(|| HouseholdError::UnknownReward(reward_id.to_string()))?;
    let member_id = member_id.ok_or(HouseholdError::NoMemberSelected)?;

    ledger.debit(member_id, reward.cost)?;

    let redemption = Redemption {
        reward_id: reward.id.clone(),
        member_id: member_id.clone(),
        date: now,
        name: reward.name.clone(),
        emoji: reward.emoji.clone(),
    };
    history.push(redemption.clone());
    Ok(redemption)
}

/// A catalog entry annotated with whether a given balance can pay for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardOffer {
    #[serde(flatten)]
    pub reward: Reward,
    pub can_afford: bool,
}

pub fn offers(catalog: &[Reward], balance: u32) -> Vec<RewardOffer> {
    catalog
        .iter()
        .map(|reward| RewardOffer {
            can_afford: balance >= reward.cost,
            reward: reward.clone(),
        })
        .collect()
}

pub fn redemptions_for<'a>(history: &'a [Redemption], member_id: &MemberId) -> Vec<&'a Redemption> {
    history.iter().filter(|r| &r.member_id == member_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn redeem_fails_without_enough_points() {
        let catalog = default_catalog();
        let member: MemberId = "a".into();
        let mut ledger = PointsLedger::default();
        ledger.award(&member, 35);
        let mut history = Vec::new();

        let err = redeem(&catalog, &mut ledger, &mut history, "movie", Some(&member), now()).unwrap_err();

        assert!(matches!(err, HouseholdError::InsufficientPoints { have: 35, need: 100 }));
        assert_eq!(ledger.balance(&member), 35);
        assert!(history.is_empty());
    }

    #[test]
    fn redeem_debits_exactly_the_cost() {
        let catalog = default_catalog();
        let member: MemberId = "a".into();
        let mut ledger = PointsLedger::default();
        ledger.award(&member, 80);
        let mut history = Vec::new();

        let redemption = redeem(&catalog, &mut ledger, &mut history, "snack", Some(&member), now()).unwrap();

        assert_eq!(ledger.balance(&member), 5);
        assert_eq!(redemption.name, "Special Snack");
        assert_eq!(redemption.date, now());
        assert_eq!(history, vec![redemption]);
    }

    #[test]
    fn redeem_requires_member_and_known_reward() {
        let catalog = default_catalog();
        let mut ledger = PointsLedger::default();
        let mut history = Vec::new();
        assert!(matches!(
            redeem(&catalog, &mut ledger, &mut history, "movie", None, now()),
            Err(HouseholdError::NoMemberSelected)
        ));
        assert!(matches!(
            redeem(&catalog, &mut ledger, &mut history, "yacht", Some(&"a".into()), now()),
            Err(HouseholdError::UnknownReward(_))
        ));
    }

    #[test]
    fn catalog_extension_is_validated() {
        let mut catalog = default_catalog();
        let mut extra = reward("park", "🛝", "Park Trip", "An afternoon at the park", 90);
        add_reward(&mut catalog, extra.clone()).unwrap();
        assert_eq!(catalog.len(), 7);

        assert!(add_reward(&mut catalog, extra.clone()).is_err());
        extra.id = "park2".into();
        extra.cost = 0;
        assert!(add_reward(&mut catalog, extra).is_err());
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn offers_lock_unaffordable_rewards() {
        let listed = offers(&default_catalog(), 120);
        let affordable: Vec<&str> = listed
            .iter()
            .filter(|o| o.can_afford)
            .map(|o| o.reward.id.as_str())
            .collect();
        assert_eq!(affordable, vec!["movie", "snack", "game"]);
    }
}
