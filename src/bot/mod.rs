//! Bot module for routing Telegram interactions
//!
//! This module is split into several submodules:
//! - `dispatcher`: Classifies events and guards every handler against failure
//! - `message_handler`: Handles slash commands and main-menu text
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats product lists
//! - `telegram`: Decodes Telegram updates and delivers replies through teloxide

use std::future::Future;

pub mod callback_handler;
pub mod dispatcher;
pub mod message_handler;
pub mod telegram;
pub mod ui_builder;

pub use dispatcher::UpdateDispatcher;
pub use telegram::{decode_update, Inbound, TelegramTransport};

/// Decoded inbound user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Slash command such as `/catalog`
    Command { name: String, args: Vec<String> },
    /// Free text, usually a main-menu button label
    TextMessage { body: String },
    /// Inline button press
    CallbackQuery { id: String, data: String },
}

/// Keyboard attached to a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent 2x2 reply keyboard with the menu labels
    MainMenu,
    /// Inline keyboard with one button per category
    CategorySelector,
}

/// Text reply, optionally carrying a keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Outbound side of the chat transport
pub trait Transport: Send + Sync {
    /// Answer a callback query so the client stops showing it as pending
    fn acknowledge(&self, callback_id: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Send a reply into a chat
    fn deliver(&self, chat_id: i64, reply: &Reply) -> impl Future<Output = anyhow::Result<()>> + Send;
}
