use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*,
};

use crate::commands::{self, callback::handle_callback, BotCommands, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::guards;

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Telegram update router
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;
        use teloxide::dispatching::UpdateFilterExt;

        let services_tokens = self.services.clone();
        let services_income = self.services.clone();
        let services_send = self.services.clone();
        let services_history = self.services.clone();
        let services_callbacks = self.services.clone();

        let command_handler = teloxide::filter_command::<BotCommands, _>()
            .branch(case![BotCommands::Start].endpoint(
                |bot: Bot, msg: Message, dialogue: MyDialogue| async move {
                    dialogue.update(State::Start).await?;
                    commands::start::handle_start(bot, msg).await
                },
            ))
            .branch(case![BotCommands::Tokens].endpoint(
                move |bot: Bot, msg: Message| {
                    let services = services_tokens.clone();
                    async move {
                        if owner_of(&msg).is_some() {
                            commands::tokens::show_token_list(&bot, msg.chat.id, &services)
                                .await?;
                        }
                        Ok(())
                    }
                },
            ))
            .branch(case![BotCommands::Income].endpoint(
                move |bot: Bot, msg: Message| {
                    let services = services_income.clone();
                    async move {
                        if owner_of(&msg).is_some() {
                            commands::income::show_token_choice(&bot, msg.chat.id, &services)
                                .await?;
                        }
                        Ok(())
                    }
                },
            ))
            .branch(case![BotCommands::Send].endpoint(
                move |bot: Bot, msg: Message| {
                    let services = services_send.clone();
                    async move {
                        if owner_of(&msg).is_some() {
                            commands::send::show_token_choice(&bot, msg.chat.id, &services)
                                .await?;
                        }
                        Ok(())
                    }
                },
            ))
            .branch(case![BotCommands::History].endpoint(
                move |bot: Bot, msg: Message| {
                    let services = services_history.clone();
                    async move {
                        if owner_of(&msg).is_some() {
                            commands::history::show_history(&bot, msg.chat.id, &services)
                                .await?;
                        }
                        Ok(())
                    }
                },
            ));

        let services_dlg_addr = self.services.clone();
        let services_dlg_send_addr = self.services.clone();
        let services_dlg_fee = self.services.clone();

        let message_handler = Update::filter_message()
            .branch(command_handler)
            .branch(
                dptree::entry()
                    .branch(case![State::AwaitingTokenAddress { token_id }].endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_dlg_addr.clone();
                            async move {
                                commands::tokens::receive_token_address(
                                    bot, msg, state, dialogue, services,
                                )
                                .await
                            }
                        },
                    ))
                    .branch(case![State::AwaitingIncomeAmount { token_id }].endpoint(
                        |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| async move {
                            commands::income::receive_income_amount(bot, msg, state, dialogue)
                                .await
                        },
                    ))
                    .branch(case![State::AwaitingIncomeDate { token_id, amount }].endpoint(
                        |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| async move {
                            commands::income::receive_income_date(bot, msg, state, dialogue).await
                        },
                    ))
                    .branch(
                        case![State::AwaitingIncomeFromAddress {
                            token_id,
                            amount,
                            date
                        }]
                        .endpoint(
                            |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| async move {
                                commands::income::receive_income_from_address(
                                    bot, msg, state, dialogue,
                                )
                                .await
                            },
                        ),
                    )
                    .branch(
                        case![State::AwaitingIncomeTxHash {
                            token_id,
                            amount,
                            date,
                            from_address
                        }]
                        .endpoint(
                            |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| async move {
                                commands::income::receive_income_tx_hash(bot, msg, state, dialogue)
                                    .await
                            },
                        ),
                    )
                    .branch(
                        case![State::AwaitingIncomeFee {
                            token_id,
                            amount,
                            date,
                            from_address,
                            tx_hash
                        }]
                        .endpoint(
                            move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                                let services = services_dlg_fee.clone();
                                async move {
                                    commands::income::receive_income_fee(
                                        bot, msg, state, dialogue, services,
                                    )
                                    .await
                                }
                            },
                        ),
                    )
                    .branch(case![State::AwaitingSendAmount { token_id }].endpoint(
                        |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| async move {
                            commands::send::receive_send_amount(bot, msg, state, dialogue).await
                        },
                    ))
                    .branch(case![State::AwaitingSendAddress { token_id, amount }].endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_dlg_send_addr.clone();
                            async move {
                                commands::send::receive_send_address(
                                    bot, msg, state, dialogue, services,
                                )
                                .await
                            }
                        },
                    )),
            );

        let callback_handler = Update::filter_callback_query().endpoint(
            move |bot: Bot, q: CallbackQuery, dialogue: MyDialogue| {
                let services = services_callbacks.clone();
                async move { handle_callback(bot, q, dialogue, services).await }
            },
        );

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}

fn owner_of(msg: &Message) -> Option<i64> {
    let id = msg.from.as_ref().map(|user| user.id.0 as i64)?;
    guards::is_owner(id).then_some(id)
}
