//! # Aros Catalog Telegram Bot
//!
//! A Telegram bot that answers a fixed set of commands and serves a product
//! catalog scraped from the Aros.uz storefront, stored in SQLite and sliced
//! by category on request.

pub mod bot;
pub mod catalog_errors;
pub mod catalog_model;
pub mod catalog_sync;
pub mod category_resolver;
pub mod config;
pub mod db;
pub mod localization;
pub mod text_processing;
pub mod webhook;
