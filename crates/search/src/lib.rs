pub mod dropdown;
pub mod hangul;
pub mod index;
pub mod recent;

pub use dropdown::*;
pub use hangul::*;
pub use index::*;
pub use recent::*;
