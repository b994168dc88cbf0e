pub mod sample;
pub mod config;
pub mod assumption;
pub mod verdict;
pub mod summary;

pub use sample::*;
pub use config::*;
pub use assumption::*;
pub use verdict::*;
pub use summary::*;
