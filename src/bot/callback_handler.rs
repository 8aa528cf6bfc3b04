//! Callback Handler module for processing inline keyboard callback queries

use anyhow::{Context, Result};
use tracing::debug;

use super::dispatcher::UpdateDispatcher;
use super::ui_builder::{format_product_list, CATEGORY_CALLBACK_PREFIX};
use super::Reply;
use crate::catalog_model::Category;
use crate::text_processing::sanitize_input;

/// Handle a callback query whose data has already been acknowledged
///
/// Data outside the category prefix produces no reply. A prefixed key that
/// names no known category, such as a button left over from an older menu,
/// gets the "not found" reply for that key.
pub async fn handle_callback(dispatcher: &UpdateDispatcher, data: &str) -> Result<Option<Reply>> {
    let data = sanitize_input(data);

    let Some(key) = data.strip_prefix(CATEGORY_CALLBACK_PREFIX) else {
        debug!(data = %data, "Ignoring callback without category prefix");
        return Ok(None);
    };

    let l10n = dispatcher.l10n();
    let Some(category) = Category::from_key(key) else {
        debug!(key, "Callback names an unknown category");
        let label = capitalize(key.trim());
        return Ok(Some(Reply::text(l10n.get_message_with_args(
            "catalog-category-empty",
            &[("category", label.as_str())],
        ))));
    };

    let products = dispatcher
        .resolver()
        .lookup(category)
        .await
        .with_context(|| format!("Failed to look up category {category}"))?;

    let label = category.label();
    let text = if products.is_empty() {
        l10n.get_message_with_args("catalog-category-empty", &[("category", label)])
    } else {
        let header = l10n.get_message_with_args("catalog-category-header", &[("category", label)]);
        format_product_list(&header, &products, l10n)
    };

    Ok(Some(Reply::text(text)))
}

/// Upper-case the first character and lower-case the rest
fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
