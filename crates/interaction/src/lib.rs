pub mod long_press;
pub mod transition;
pub mod viewport;

pub use long_press::*;
pub use transition::*;
pub use viewport::*;
