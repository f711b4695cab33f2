#![doc = include_str!("../README.md")]

pub mod collector;
mod error;
pub mod forest;
pub mod partition;
pub mod point;
pub mod rtree;
mod r#type;

pub use collector::PointCollector;
pub use error::{ForestError, Result};
pub use forest::{Forest, ForestConfig, Query};
pub use point::{Location, PointRecord, COORDINATE_PRECISION};
pub use r#type::{Indexable, IndexableNum};

#[cfg(test)]
pub(crate) mod test;
