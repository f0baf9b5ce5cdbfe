pub mod dashboard;
pub mod errors;
pub mod login;

pub use dashboard::Dashboard;
pub use errors::{NotFound, ServerError};
pub use login::Login;
