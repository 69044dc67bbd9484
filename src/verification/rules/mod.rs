//! Built-in rule categories
//!
//! Every predicate returns `true` when the rule is satisfied. Most rules are
//! written as "no violation": the violation condition is spelled out and
//! negated.

pub mod cash;
pub mod cdd;
pub mod channel;
pub mod correspondent;
pub mod data_quality;
pub mod extension;
pub mod fx;
pub mod purpose;
pub mod record_keeping;
pub mod sanctions;
pub mod suitability;
pub mod suspicion;
pub mod virtual_assets;
pub mod wire;
