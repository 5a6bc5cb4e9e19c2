// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod aggregator;
pub mod analytics;
pub mod identity;
pub mod repo;

pub use aggregator::StatsAggregator;
pub use identity::{DidDocument, IdentityResolver};
pub use repo::RepoClient;
