use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::commands::{main_menu, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{NewOutcome, State, TxSource, WalletError};
use crate::utils::format_balance;

/// Entry point: pick the token to send from.
pub async fn show_token_choice(
    bot: &Bot,
    chat_id: ChatId,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let tokens = services.token_interactor().list_tokens().await?;

    let mut rows: Vec<Vec<InlineKeyboardButton>> = tokens
        .iter()
        .filter(|t| t.is_active() && t.balance > 0.0)
        .map(|t| {
            vec![InlineKeyboardButton::callback(
                format!("{} ({} USD)", t.name, format_balance(t.balance)),
                format!("send_{}", t.id),
            )]
        })
        .collect();

    if rows.is_empty() {
        bot.send_message(chat_id, "No token has a balance to send from")
            .reply_markup(main_menu())
            .await?;
        return Ok(());
    }

    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", "cancel")]);

    bot.send_message(chat_id, "Send from which token?")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;

    Ok(())
}

pub async fn start_send(
    bot: &Bot,
    chat_id: ChatId,
    token_id: i64,
    dialogue: MyDialogue,
) -> Result<()> {
    dialogue
        .update(State::AwaitingSendAmount { token_id })
        .await?;

    bot.send_message(chat_id, "Enter the amount to send in USD:")
        .await?;

    Ok(())
}

pub async fn receive_send_amount(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
) -> Result<()> {
    let State::AwaitingSendAmount { token_id } = state else {
        return Ok(());
    };

    match msg.text().and_then(|t| t.trim().parse::<f64>().ok()) {
        Some(amount) if amount > 0.0 => {
            dialogue
                .update(State::AwaitingSendAddress { token_id, amount })
                .await?;
            bot.send_message(msg.chat.id, "Enter the destination address:")
                .await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Enter a positive number, e.g. 95:")
                .await?;
        }
    }

    Ok(())
}

/// Runs the side-effect-free preview and shows the confirmation screen.
/// Nothing is written until the operator presses confirm.
pub async fn receive_send_address(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingSendAddress { token_id, amount } = state else {
        return Ok(());
    };

    let to_address = msg.text().unwrap_or_default().trim().to_string();

    let preview = match services
        .send_interactor()
        .preview_send(token_id, amount, &to_address)
        .await
    {
        Ok(preview) => preview,
        Err(e @ (WalletError::InvalidAddress | WalletError::SelfTransfer)) => {
            bot.send_message(msg.chat.id, format!("{}. Try another address:", e))
                .await?;
            return Ok(());
        }
        Err(WalletError::InsufficientFunds { max_sendable }) => {
            dialogue.update(State::Start).await?;
            bot.send_message(
                msg.chat.id,
                format!(
                    "❌ Insufficient funds: the balance does not even cover the network fee \
                     (max sendable {:.2} USD)",
                    max_sendable
                ),
            )
            .reply_markup(main_menu())
            .await?;
            return Ok(());
        }
        Err(e @ WalletError::ProviderUnavailable(_)) => {
            bot.send_message(msg.chat.id, format!("{}. Send the address again to retry:", e))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let fee_native = preview
        .fee_native
        .map(|f| format!(" (~{:.6} {})", f, preview.fee_currency))
        .unwrap_or_default();

    let mut text = format!(
        "Review the transfer:\n\nToken: {}\nTo: {}\nAmount: {:.2} USD\nNetwork fee: {:.4} USD{}\nTotal debit: {:.2} USD\nBalance: {} USD",
        preview.name,
        preview.to_address,
        preview.final_send_usd,
        preview.fee_usd,
        fee_native,
        preview.total_debit_usd,
        format_balance(preview.balance_usd),
    );

    if preview.was_adjusted {
        text.push_str(&format!(
            "\n\n⚠️ The requested {:.2} USD plus the fee exceeds the balance, so the amount \
             was reduced to the maximum sendable {:.2} USD. Confirm to send the reduced amount.",
            preview.requested_usd, preview.final_send_usd
        ));
    }

    dialogue
        .update(State::AwaitingSendConfirmation {
            token_id,
            amount: preview.final_send_usd,
            to_address,
            fee_usd: preview.fee_usd,
        })
        .await?;

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Confirm", "send_confirm"),
        InlineKeyboardButton::callback("❌ Cancel", "cancel"),
    ]]);

    bot.send_message(msg.chat.id, text)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

/// Final step, reached only from the confirm button.
pub async fn confirm_send(
    bot: &Bot,
    chat_id: ChatId,
    state: State,
    dialogue: MyDialogue,
    services: &Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingSendConfirmation {
        token_id,
        amount,
        to_address,
        fee_usd,
    } = state
    else {
        return Ok(());
    };

    dialogue.update(State::Start).await?;

    let outcome = NewOutcome {
        token_id,
        amount_usd: amount,
        to_address,
        tx_hash: None,
        fee_usd,
        explorer_link: None,
        source: TxSource::Manual,
    };

    match services.send_interactor().confirm_send(outcome).await {
        Ok(tx) => {
            info!("Send committed: tx {} for {:.2} USD", tx.id, tx.amount);
            let token = services.token_interactor().get_token(token_id).await?;
            bot.send_message(
                chat_id,
                format!(
                    "✅ Send created\n\nToken: {}\nAmount: {:.2} USD\nFee: {:.4} USD\nTo: {}\nHash: {}\nNew balance: {} USD",
                    token.name,
                    tx.amount,
                    tx.fee,
                    tx.to_address,
                    tx.tx_hash,
                    format_balance(token.balance),
                ),
            )
            .reply_markup(main_menu())
            .await?;
        }
        Err(WalletError::InsufficientFunds { max_sendable }) => {
            // The balance moved between preview and confirm
            bot.send_message(
                chat_id,
                format!(
                    "❌ Insufficient funds: the balance changed. Maximum sendable is now {:.2} USD",
                    max_sendable
                ),
            )
            .reply_markup(main_menu())
            .await?;
        }
        Err(e) => {
            bot.send_message(chat_id, format!("❌ {}", e))
                .reply_markup(main_menu())
                .await?;
        }
    }

    Ok(())
}
