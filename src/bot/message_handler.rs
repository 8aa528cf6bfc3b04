//! Message Handler module for slash commands and main-menu text

use anyhow::Result;
use tracing::{debug, info};

use super::dispatcher::UpdateDispatcher;
use super::ui_builder::{format_product_list, MAIN_MENU_KEYS};
use super::{Keyboard, Reply};
use crate::text_processing::normalize_label;

/// Main menu entry selected by a text message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Catalog,
    Buy,
    Contact,
    Help,
}

impl MenuAction {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "menu-catalog" => Some(MenuAction::Catalog),
            "menu-buy" => Some(MenuAction::Buy),
            "menu-contact" => Some(MenuAction::Contact),
            "menu-help" => Some(MenuAction::Help),
            _ => None,
        }
    }
}

/// Match sanitized text against the sanitized menu labels
pub fn match_menu_label(dispatcher: &UpdateDispatcher, body: &str) -> Option<MenuAction> {
    let wanted = normalize_label(body);
    if wanted.is_empty() {
        return None;
    }

    MAIN_MENU_KEYS
        .iter()
        .flatten()
        .find(|key| normalize_label(&dispatcher.l10n().t(key)) == wanted)
        .and_then(|key| MenuAction::from_key(key))
}

/// Handle a slash command. Unknown commands produce no reply.
pub async fn handle_command(dispatcher: &UpdateDispatcher, name: &str) -> Result<Option<Reply>> {
    let l10n = dispatcher.l10n();
    let reply = match name {
        "start" => Reply::text(l10n.t("welcome")).with_keyboard(Keyboard::MainMenu),
        "catalog" => catalog_snapshot(dispatcher).await,
        "buy" => Reply::text(l10n.get_message_with_args(
            "buy-info",
            &[("url", dispatcher.catalog_url())],
        )),
        "contact" => Reply::text(l10n.t("contact-info")),
        _ => {
            debug!(command = name, "Ignoring unknown command");
            return Ok(None);
        }
    };
    Ok(Some(reply))
}

/// Refresh the catalog and list what was fetched
async fn catalog_snapshot(dispatcher: &UpdateDispatcher) -> Reply {
    let l10n = dispatcher.l10n();
    let products = dispatcher.synchronizer().refresh().await;

    if products.is_empty() {
        Reply::text(l10n.t("catalog-unavailable"))
    } else {
        Reply::text(format_product_list(&l10n.t("catalog-latest"), &products, l10n))
    }
}

/// Handle free text coming from the main menu
pub async fn handle_text(dispatcher: &UpdateDispatcher, body: &str) -> Result<Reply> {
    let l10n = dispatcher.l10n();

    let Some(action) = match_menu_label(dispatcher, body) else {
        debug!("Rejecting text that is not a menu label");
        return Ok(Reply::text(l10n.t("invalid-command")));
    };

    let reply = match action {
        MenuAction::Catalog => {
            // Populate the store so the category buttons have something to show
            let products = dispatcher.synchronizer().refresh().await;
            info!(count = products.len(), "Catalog refreshed for category selector");
            Reply::text(l10n.t("catalog-choose-category")).with_keyboard(Keyboard::CategorySelector)
        }
        MenuAction::Buy => Reply::text(l10n.get_message_with_args(
            "buy-menu-info",
            &[("url", dispatcher.catalog_url())],
        )),
        MenuAction::Contact => Reply::text(l10n.t("contact-info")),
        MenuAction::Help => Reply::text(l10n.t("help-info")),
    };

    Ok(reply)
}
