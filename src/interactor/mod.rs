pub mod db;
pub mod income_interactor;
pub mod send_interactor;
pub mod token_interactor;

pub use income_interactor::{IncomeInteractor, IncomeInteractorImpl};
pub use send_interactor::{SendInteractor, SendInteractorImpl};
pub use token_interactor::{TokenInteractor, TokenInteractorImpl};
