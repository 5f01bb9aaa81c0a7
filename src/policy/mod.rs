//! Policy trait and implementations.

pub mod axis;
pub mod heuristic;
pub mod random;
pub mod trait_;

pub use axis::AxisPolicy;
pub use heuristic::GroupingHeuristicPolicy;
pub use random::RandomPolicy;
pub use trait_::Policy;
