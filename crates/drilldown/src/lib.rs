pub mod constituency;
pub mod filter;
pub mod region;
pub mod state;

pub use constituency::*;
pub use filter::*;
pub use region::*;
pub use state::*;
