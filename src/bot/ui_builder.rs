//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use super::Keyboard;
use crate::catalog_model::{Category, ProductRecord};
use crate::localization::LocalizationManager;

/// Prefix marking callback data as a category selection
pub const CATEGORY_CALLBACK_PREFIX: &str = "aros_";

/// Localization keys of the main menu, row by row
pub const MAIN_MENU_KEYS: [[&str; 2]; 2] = [
    ["menu-catalog", "menu-buy"],
    ["menu-contact", "menu-help"],
];

/// Callback data for a category button, e.g. `aros_aksessuarlar`
pub fn category_callback_data(category: Category) -> String {
    format!("{CATEGORY_CALLBACK_PREFIX}{}", category.key())
}

/// Localized main menu labels, row by row
pub fn main_menu_labels(l10n: &LocalizationManager) -> Vec<Vec<String>> {
    MAIN_MENU_KEYS
        .iter()
        .map(|row| row.iter().map(|key| l10n.t(key)).collect())
        .collect()
}

/// Persistent reply keyboard shown after `/start`
pub fn create_main_menu_keyboard(l10n: &LocalizationManager) -> KeyboardMarkup {
    let rows = main_menu_labels(l10n)
        .into_iter()
        .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    KeyboardMarkup::new(rows)
        .resize_keyboard()
        .input_field_placeholder(l10n.t("menu-placeholder"))
}

/// Inline keyboard with one button per category
pub fn create_category_keyboard() -> InlineKeyboardMarkup {
    let buttons = Category::ALL
        .iter()
        .map(|category| {
            vec![InlineKeyboardButton::callback(
                category.label(),
                category_callback_data(*category),
            )]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}

/// Teloxide markup for a reply keyboard
pub fn render_keyboard(keyboard: Keyboard, l10n: &LocalizationManager) -> ReplyMarkup {
    match keyboard {
        Keyboard::MainMenu => ReplyMarkup::Keyboard(create_main_menu_keyboard(l10n)),
        Keyboard::CategorySelector => ReplyMarkup::InlineKeyboard(create_category_keyboard()),
    }
}

/// Header line followed by `- name: price` / `Havola: link` pairs
pub fn format_product_list(
    header: &str,
    products: &[ProductRecord],
    l10n: &LocalizationManager,
) -> String {
    let mut result = format!("{header}\n");

    for product in products {
        result.push_str(&format!("- {}: {}\n", product.name, product.price));
        result.push_str(&l10n.get_message_with_args("product-link", &[("link", &product.link)]));
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_callback_data() {
        assert_eq!(category_callback_data(Category::Accessories), "aros_aksessuarlar");
        assert_eq!(category_callback_data(Category::SpareParts), "aros_ehtiyot qismlar");
    }

    #[test]
    fn test_category_keyboard_has_one_row_per_category() {
        let keyboard = create_category_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), Category::ALL.len());
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Aksessuarlar");
    }

    #[test]
    fn test_main_menu_layout() {
        let l10n = LocalizationManager::new().unwrap();
        let labels = main_menu_labels(&l10n);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0], vec!["📋 Aros.uz katalogi", "🛒 Sotib olish"]);
        assert_eq!(labels[1], vec!["📞 Aloqa", "❓ Yordam"]);

        let keyboard = create_main_menu_keyboard(&l10n);
        assert_eq!(keyboard.keyboard.len(), 2);
        assert_eq!(keyboard.keyboard[1][1].text, "❓ Yordam");
    }

    #[test]
    fn test_format_product_list() {
        let l10n = LocalizationManager::new().unwrap();
        let products = vec![ProductRecord::new(
            "Car accessory",
            "50 000 so'm",
            "https://aros.uz/uz/p/7",
            Category::Accessories,
        )];

        let text = format_product_list("Aros.uz Aksessuarlar katalogi:", &products, &l10n);
        assert_eq!(
            text,
            "Aros.uz Aksessuarlar katalogi:\n- Car accessory: 50 000 so'm\nHavola: https://aros.uz/uz/p/7\n"
        );
    }
}
