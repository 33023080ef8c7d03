pub mod confirmation_service;

pub use confirmation_service::ConfirmationService;
