pub mod mercator;
pub mod memo;
pub mod shape;

pub use memo::*;
pub use mercator::*;
pub use shape::*;
