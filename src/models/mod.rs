mod chat;
mod dashboard;
mod resources;

pub use chat::*;
pub use dashboard::*;
pub use resources::*;
