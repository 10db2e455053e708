pub mod component;
pub mod config;
pub mod constituency;
pub mod events;
pub mod scene;
pub mod search_panel;

pub use component::*;
pub use config::*;
pub use constituency::*;
pub use events::*;
pub use scene::*;
pub use search_panel::*;
