pub mod dataset;
pub mod decode;
pub mod geometry;
pub mod naming;

pub use dataset::*;
pub use decode::*;
pub use geometry::*;
