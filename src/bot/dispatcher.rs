//! Update Dispatcher: routes each decoded event to its handler.
//!
//! The dispatcher keeps no per-chat state. It is built once at startup and
//! shared behind an `Arc`; every event is handled using only its own payload
//! and the catalog store.

use std::panic::AssertUnwindSafe;

use anyhow::Result;
use futures::FutureExt;
use tracing::{error, info, warn};

use super::callback_handler::handle_callback;
use super::message_handler::{handle_command, handle_text};
use super::{Event, Reply, Transport};
use crate::catalog_sync::CatalogSynchronizer;
use crate::category_resolver::CategoryResolver;
use crate::localization::LocalizationManager;

pub struct UpdateDispatcher {
    synchronizer: CatalogSynchronizer,
    resolver: CategoryResolver,
    l10n: LocalizationManager,
}

impl UpdateDispatcher {
    /// Build a dispatcher reading from the synchronizer's store
    pub fn new(synchronizer: CatalogSynchronizer) -> Result<Self> {
        let resolver = CategoryResolver::new(synchronizer.store().clone());
        Ok(Self {
            synchronizer,
            resolver,
            l10n: LocalizationManager::new()?,
        })
    }

    pub fn synchronizer(&self) -> &CatalogSynchronizer {
        &self.synchronizer
    }

    pub fn resolver(&self) -> &CategoryResolver {
        &self.resolver
    }

    pub fn l10n(&self) -> &LocalizationManager {
        &self.l10n
    }

    pub fn catalog_url(&self) -> &str {
        &self.synchronizer.config().url
    }

    /// Handle one event and produce the reply to send, if any
    ///
    /// Callback queries are acknowledged through `transport` before their
    /// handler runs, whatever the handler's outcome. Handler failures and
    /// panics are logged and turned into the generic apology.
    pub async fn dispatch<T: Transport>(&self, event: Event, transport: &T) -> Option<Reply> {
        let handled = AssertUnwindSafe(async {
            match event {
                Event::Command { name, args } => {
                    info!(command = %name, args = args.len(), "Dispatching command");
                    handle_command(self, &name).await
                }
                Event::TextMessage { body } => {
                    info!("Dispatching text message");
                    handle_text(self, &body).await.map(Some)
                }
                Event::CallbackQuery { id, data } => {
                    info!(callback_id = %id, "Dispatching callback query");
                    if let Err(e) = transport.acknowledge(&id).await {
                        warn!(callback_id = %id, error = %e, "Failed to acknowledge callback query");
                    }
                    handle_callback(self, &data).await
                }
            }
        })
        .catch_unwind()
        .await;

        match handled {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(error = ?e, "Handler failed, sending apology");
                Some(self.apology())
            }
            Err(_) => {
                error!("Handler panicked, sending apology");
                Some(self.apology())
            }
        }
    }

    fn apology(&self) -> Reply {
        Reply::text(self.l10n.t("error-generic"))
    }
}
