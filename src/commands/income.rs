use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::commands::{main_menu, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{NewIncome, State, TxSource, WalletError};
use crate::utils::{format_balance, parse_date_input, validate_crypto_address};

/// Entry point: pick the token the funds arrived on.
pub async fn show_token_choice(
    bot: &Bot,
    chat_id: ChatId,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let tokens = services.token_interactor().list_tokens().await?;

    let mut rows: Vec<Vec<InlineKeyboardButton>> = tokens
        .iter()
        .filter(|t| t.is_active())
        .map(|t| {
            vec![InlineKeyboardButton::callback(
                format!("{} ({} USD)", t.name, format_balance(t.balance)),
                format!("income_{}", t.id),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", "cancel")]);

    bot.send_message(chat_id, "Which token received funds?")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

pub async fn start_income(
    bot: &Bot,
    chat_id: ChatId,
    token_id: i64,
    dialogue: MyDialogue,
) -> Result<()> {
    dialogue
        .update(State::AwaitingIncomeAmount { token_id })
        .await?;

    bot.send_message(chat_id, "Enter the received amount in USD:")
        .await?;

    Ok(())
}

pub async fn receive_income_amount(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
) -> Result<()> {
    let State::AwaitingIncomeAmount { token_id } = state else {
        return Ok(());
    };

    match msg.text().and_then(|t| t.trim().parse::<f64>().ok()) {
        Some(amount) if amount > 0.0 => {
            dialogue
                .update(State::AwaitingIncomeDate { token_id, amount })
                .await?;
            bot.send_message(
                msg.chat.id,
                "When did it arrive? Send a date like 2025-03-01 14:30, or 'now':",
            )
            .await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Enter a positive number, e.g. 150.50:")
                .await?;
        }
    }

    Ok(())
}

pub async fn receive_income_date(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
) -> Result<()> {
    let State::AwaitingIncomeDate { token_id, amount } = state else {
        return Ok(());
    };

    let text = msg.text().unwrap_or_default().trim().to_string();
    let date = if text.eq_ignore_ascii_case("now") {
        Some(Utc::now())
    } else {
        parse_date_input(&text)
    };

    match date {
        Some(date) => {
            dialogue
                .update(State::AwaitingIncomeFromAddress {
                    token_id,
                    amount,
                    date,
                })
                .await?;
            bot.send_message(msg.chat.id, "Enter the sender's address:")
                .await?;
        }
        None => {
            bot.send_message(
                msg.chat.id,
                "Unrecognized date. Use YYYY-MM-DD [HH:MM], DD.MM.YYYY [HH:MM] or 'now':",
            )
            .await?;
        }
    }

    Ok(())
}

pub async fn receive_income_from_address(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
) -> Result<()> {
    let State::AwaitingIncomeFromAddress {
        token_id,
        amount,
        date,
    } = state
    else {
        return Ok(());
    };

    let address = msg.text().unwrap_or_default().trim().to_string();
    if !validate_crypto_address(&address) {
        bot.send_message(msg.chat.id, "Invalid address format, try again:")
            .await?;
        return Ok(());
    }

    dialogue
        .update(State::AwaitingIncomeTxHash {
            token_id,
            amount,
            date,
            from_address: address,
        })
        .await?;

    bot.send_message(
        msg.chat.id,
        "Enter the transaction hash, or 'auto' to generate one:",
    )
    .await?;

    Ok(())
}

pub async fn receive_income_tx_hash(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
) -> Result<()> {
    let State::AwaitingIncomeTxHash {
        token_id,
        amount,
        date,
        from_address,
    } = state
    else {
        return Ok(());
    };

    let text = msg.text().unwrap_or_default().trim().to_string();
    if text.is_empty() {
        bot.send_message(msg.chat.id, "Send the hash as text, or 'auto':")
            .await?;
        return Ok(());
    }

    let tx_hash = if text.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(text)
    };

    dialogue
        .update(State::AwaitingIncomeFee {
            token_id,
            amount,
            date,
            from_address,
            tx_hash,
        })
        .await?;

    bot.send_message(
        msg.chat.id,
        "Enter the network fee in USD, or 'auto' to estimate:",
    )
    .await?;

    Ok(())
}

pub async fn receive_income_fee(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingIncomeFee {
        token_id,
        amount,
        date,
        from_address,
        tx_hash,
    } = state
    else {
        return Ok(());
    };

    let text = msg.text().unwrap_or_default().trim().to_string();

    let fee_usd = if text.eq_ignore_ascii_case("auto") {
        let token = services.token_interactor().get_token(token_id).await?;
        match services.fee_service().estimate_fee_usd(&token.symbol).await {
            Ok(fee) => fee,
            Err(e) => {
                bot.send_message(
                    msg.chat.id,
                    format!("{}. Enter the fee manually in USD:", e),
                )
                .await?;
                return Ok(());
            }
        }
    } else {
        match text.parse::<f64>() {
            Ok(fee) if fee >= 0.0 => fee,
            _ => {
                bot.send_message(msg.chat.id, "Enter a non-negative number or 'auto':")
                    .await?;
                return Ok(());
            }
        }
    };

    let income = NewIncome {
        token_id,
        amount_usd: amount,
        date,
        from_address,
        tx_hash,
        fee_usd,
        explorer_link: None,
        source: TxSource::Manual,
    };

    match services.income_interactor().create_income(income).await {
        Ok(tx) => {
            dialogue.update(State::Start).await?;
            let token = services.token_interactor().get_token(token_id).await?;
            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Income recorded\n\nToken: {}\nAmount: {:.2} USD\nHash: {}\nNew balance: {} USD",
                    token.name,
                    tx.amount,
                    tx.tx_hash,
                    format_balance(token.balance),
                ),
            )
            .reply_markup(main_menu())
            .await?;
        }
        Err(e @ (WalletError::InvalidAmount | WalletError::InvalidAddress)) => {
            dialogue.update(State::Start).await?;
            bot.send_message(msg.chat.id, format!("❌ {}", e)).await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
