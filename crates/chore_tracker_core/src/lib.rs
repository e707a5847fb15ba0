pub mod calendar;
pub mod chores;
pub mod commands;
pub mod domain;
pub mod error;
pub mod household;
pub mod members;
pub mod nudge;
pub mod ports;
pub mod rewards;
pub mod store;
pub mod summary;

#[cfg(test)]
mod testing;

pub use commands::{Command, CommandOutcome, CommandResult};
pub use domain::{
    Chore, ChoreId, Frequency, Member, MemberId, NewChore, Notification, NotificationPermission,
    PointsLedger, Priority, Redemption, Repeat, Reward,
};
pub use error::{HouseholdError, HouseholdResult};
pub use household::{ChoreView, Dashboard, Household, MemberBalance};
pub use ports::{Clock, KeyValueStore, NotificationService, PortError, PortResult, SystemClock};
pub use store::{HouseholdStore, InMemoryStore};
