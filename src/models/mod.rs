// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod record;
pub mod stats;

pub use record::{ListRecordsResponse, Record, RecordSet, RecordValue};
pub use stats::{ActivityCounts, ActorStats, FollowPeriodPoint, PunchCardEntry, PunchCardGroup};
