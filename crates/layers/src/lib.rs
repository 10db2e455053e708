pub mod choropleth;
pub mod labels;
pub mod polygon;
pub mod theme;

pub use choropleth::*;
pub use labels::*;
pub use polygon::*;
pub use theme::*;
