use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::entity::State;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

pub mod callback;
pub mod history;
pub mod income;
pub mod send;
pub mod start;
pub mod tokens;

/// Bot Commands enum for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "show the wallet admin panel")]
    Start,
    #[command(description = "manage tokens")]
    Tokens,
    #[command(description = "record an incoming transaction")]
    Income,
    #[command(description = "create an outgoing transfer")]
    Send,
    #[command(description = "show recent transactions")]
    History,
}

/// Main admin panel keyboard
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "💰 Tokens",
            "tokens",
        )],
        vec![InlineKeyboardButton::callback(
            "➕ Record income",
            "income",
        )],
        vec![InlineKeyboardButton::callback("➖ Create send", "send")],
        vec![InlineKeyboardButton::callback(
            "📜 History",
            "history",
        )],
        vec![InlineKeyboardButton::callback(
            "🧹 Clear history",
            "clear_history",
        )],
    ])
}
