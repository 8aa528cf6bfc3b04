//! Telegram side of the bot: turning updates into events and replies into
//! Bot API calls.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, Update, UpdateKind};
use tracing::debug;

use super::ui_builder::render_keyboard;
use super::{Event, Reply, Transport};
use crate::localization::LocalizationManager;
use crate::text_processing::parse_command;

/// Event together with the chat its reply goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: i64,
    pub event: Event,
}

/// Classify a Telegram update
///
/// Returns `None` for updates the bot does not handle (edits, stickers,
/// channel posts, callbacks without data).
pub fn decode_update(update: &Update) -> Option<Inbound> {
    match &update.kind {
        UpdateKind::Message(msg) => {
            let text = msg.text()?;
            let event = match parse_command(text) {
                Some((name, args)) => Event::Command { name, args },
                None => Event::TextMessage {
                    body: text.to_string(),
                },
            };
            Some(Inbound {
                chat_id: msg.chat.id.0,
                event,
            })
        }
        UpdateKind::CallbackQuery(q) => {
            let data = q.data.clone()?;
            let chat_id = q
                .message
                .as_ref()
                .map(|m| m.chat().id.0)
                .unwrap_or(q.from.id.0 as i64);
            Some(Inbound {
                chat_id,
                event: Event::CallbackQuery {
                    id: q.id.to_string(),
                    data,
                },
            })
        }
        other => {
            debug!(kind = ?other, "Unsupported update kind");
            None
        }
    }
}

/// Transport backed by the Telegram Bot API
pub struct TelegramTransport {
    bot: Bot,
    l10n: LocalizationManager,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Result<Self> {
        Ok(Self {
            bot,
            l10n: LocalizationManager::new()?,
        })
    }
}

impl Transport for TelegramTransport {
    async fn acknowledge(&self, callback_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .await?;
        Ok(())
    }

    async fn deliver(&self, chat_id: i64, reply: &Reply) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), reply.text.clone());
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(render_keyboard(keyboard, &self.l10n));
        }
        request.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update_from(value: serde_json::Value) -> Update {
        serde_json::from_str(&value.to_string()).unwrap()
    }

    fn message_update(text: &str) -> Update {
        update_from(json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "chat": { "id": 42, "type": "private", "first_name": "Test" },
                "from": { "id": 42, "is_bot": false, "first_name": "Test" },
                "text": text
            }
        }))
    }

    #[test]
    fn test_decode_command() {
        let inbound = decode_update(&message_update("/catalog")).unwrap();
        assert_eq!(inbound.chat_id, 42);
        assert_eq!(
            inbound.event,
            Event::Command {
                name: "catalog".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_decode_text_message() {
        let inbound = decode_update(&message_update("📞 Aloqa")).unwrap();
        assert_eq!(
            inbound.event,
            Event::TextMessage {
                body: "📞 Aloqa".to_string()
            }
        );
    }

    #[test]
    fn test_decode_callback_query() {
        let update = update_from(json!({
            "update_id": 11,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": 42, "is_bot": false, "first_name": "Test" },
                "chat_instance": "ci",
                "data": "aros_aksessuarlar",
                "message": {
                    "message_id": 2,
                    "date": 1700000000,
                    "chat": { "id": 77, "type": "private", "first_name": "Test" },
                    "text": "Aros.uz katalogini ko'rish uchun kategoriyani tanlang:"
                }
            }
        }));

        let inbound = decode_update(&update).unwrap();
        assert_eq!(inbound.chat_id, 77);
        assert_eq!(
            inbound.event,
            Event::CallbackQuery {
                id: "cb-1".to_string(),
                data: "aros_aksessuarlar".to_string()
            }
        );
    }
}
