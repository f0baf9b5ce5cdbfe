pub mod ai_assistant;
pub mod context;
pub mod conversations;
pub mod documents;
pub mod drive;
pub mod external_app;
pub mod files;
pub mod layout;
pub mod markdown;
pub mod meet;
pub mod search_files;
pub mod toast;
pub mod ui;
pub mod widget;
