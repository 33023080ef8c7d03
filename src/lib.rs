pub mod api;
pub mod commands;
pub mod di;
pub mod entity;
pub mod guards;
pub mod interactor;
pub mod pricing;
pub mod router;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use di::ServiceContainer;
pub use entity::*;
pub use router::{Router, TelegramRouter};
pub use services::ConfirmationService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
