pub mod aggregators;
pub mod comparator;
pub mod statistical;

pub use aggregators::*;
pub use comparator::*;
pub use statistical::*;
