//! Analysis over the in-memory record list.
//!
//! Everything here is a pure function of its inputs: grouping statistics,
//! filtering and pagination never touch the record store directly.

pub mod aggregator;
pub mod filter;
pub mod normalize;
pub mod paginate;

pub use aggregator::*;
pub use filter::*;
pub use paginate::*;
