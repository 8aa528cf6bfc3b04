use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

/// Language every reply is rendered in
pub const DEFAULT_LANGUAGE: &str = "uz";

const UZ_RESOURCE: &str = include_str!("../locales/uz/main.ftl");

/// Localization manager for the catalog bot
///
/// Owned by the dispatcher rather than stored in a global, so tests can
/// build as many as they like.
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager with the embedded Uzbek resource
    pub fn new() -> Result<Self> {
        let locale: LanguageIdentifier = DEFAULT_LANGUAGE.parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Replies are plain text; bidi isolation marks would leak into them
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(UZ_RESOURCE.to_string())
            .map_err(|(_, errors)| anyhow!("Failed to parse uz resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Failed to add uz resource: {errors:?}"))?;

        Ok(Self { bundle })
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut errors = vec![];
        let value = self
            .bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            tracing::warn!(key, ?errors, "Fluent formatting reported errors");
        }
        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, Some(&args_map))
    }

    /// Shorthand for an argument-free message
    pub fn t(&self, key: &str) -> String {
        self.get_message(key, None)
    }
}
