use crate::error::ConfigurationError;
use crate::i18n::{Dictionary, Locale, DEFAULT_RESPONSE_MESSAGE, DEFAULT_RESPONSE_TITLE};
use crate::render::provider::{Provider, DEFAULT_VIEW_TEMPLATE_SETTING, PREFERRED_LANGUAGE_SETTING};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Name the responder is registered under unless configured otherwise.
pub const DEFAULT_DECORATOR_NAME: &str = "return";

/// Language used when neither the context nor the app settings name one.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Renderer settings, validated once by `RendererBuilder::build`.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Name the per-request responder is registered under
    pub decorator_name: String,

    /// View used when the caller names none
    pub default_template: Provider,

    /// Language used when neither the context nor its text yields one
    pub preferred_language: Provider,

    /// Dictionary identifier of the default response title
    pub default_response_title: String,

    /// Dictionary identifier of the default response message
    pub default_response_message: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            decorator_name: DEFAULT_DECORATOR_NAME.to_string(),
            default_template: Provider::setting(DEFAULT_VIEW_TEMPLATE_SETTING),
            preferred_language: Provider::computed(|request| {
                Some(
                    request
                        .setting(PREFERRED_LANGUAGE_SETTING)
                        .unwrap_or(FALLBACK_LANGUAGE)
                        .to_string(),
                )
            }),
            default_response_title: DEFAULT_RESPONSE_TITLE.to_string(),
            default_response_message: DEFAULT_RESPONSE_MESSAGE.to_string(),
        }
    }
}

impl RendererConfig {
    pub fn with_decorator_name(mut self, name: impl Into<String>) -> Self {
        self.decorator_name = name.into();
        self
    }

    pub fn with_default_template(mut self, template: impl Into<Provider>) -> Self {
        self.default_template = template.into();
        self
    }

    pub fn with_preferred_language(mut self, language: impl Into<Provider>) -> Self {
        self.preferred_language = language.into();
        self
    }

    pub fn with_default_response(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.default_response_title = title.into();
        self.default_response_message = message.into();
        self
    }

    /// Check the settings against the dictionary they will be used with.
    ///
    /// Static providers are checked eagerly; computed providers can only be
    /// checked per request.
    pub fn validate(&self, dictionary: &Dictionary) -> Result<(), ConfigurationError> {
        let name = self.decorator_name.trim();
        if name.is_empty() {
            return Err(ConfigurationError::EmptyDecoratorName);
        }
        if name != self.decorator_name
            || !self
                .decorator_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigurationError::InvalidDecoratorName(
                self.decorator_name.clone(),
            ));
        }

        if self.default_response_title.trim().is_empty() {
            return Err(ConfigurationError::MissingDefaultIdentifier("title"));
        }
        if self.default_response_message.trim().is_empty() {
            return Err(ConfigurationError::MissingDefaultIdentifier("message"));
        }

        if let Some(template) = self.default_template.as_static() {
            if template.trim().is_empty() {
                return Err(ConfigurationError::InvalidDefaultTemplate);
            }
        }

        if let Some(language) = self.preferred_language.as_static() {
            let locale = Locale::parse(language)
                .ok_or_else(|| ConfigurationError::InvalidPreferredLanguage(language.to_string()))?;
            for identifier in [&self.default_response_title, &self.default_response_message] {
                if !dictionary.has(locale.code(), identifier) {
                    return Err(ConfigurationError::MissingDefaultTranslation {
                        identifier: identifier.clone(),
                        locale: locale.code().to_string(),
                    });
                }
            }
        } else {
            for identifier in [&self.default_response_title, &self.default_response_message] {
                if dictionary.locales(identifier).is_empty() {
                    return Err(ConfigurationError::MissingDefaultTranslation {
                        identifier: identifier.clone(),
                        locale: "*".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Settings of the bundled server binary.
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Views
    pub templates_dir: PathBuf,
    pub template_extension: String,
    pub default_view_template: String,

    // Translations
    pub dictionary_file: Option<PathBuf>,
    pub preferred_language: String,

    // Responder
    pub responder_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .map(|v| v.parse::<u16>().context("PORT must be a port number"))
                .transpose()?
                .unwrap_or(8080),

            // Views
            templates_dir: std::env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("templates")),
            template_extension: std::env::var("TEMPLATE_EXTENSION")
                .unwrap_or_else(|_| "hbs".to_string()),
            default_view_template: std::env::var("DEFAULT_VIEW_TEMPLATE")
                .unwrap_or_else(|_| "default".to_string()),

            // Translations
            dictionary_file: std::env::var("DICTIONARY_FILE").ok().map(PathBuf::from),
            preferred_language: std::env::var("PREFERRED_LANGUAGE")
                .unwrap_or_else(|_| FALLBACK_LANGUAGE.to_string()),

            // Responder
            responder_name: std::env::var("RESPONDER_NAME")
                .unwrap_or_else(|_| DEFAULT_DECORATOR_NAME.to_string()),
        };

        if !Locale::is_valid(&config.preferred_language) {
            anyhow::bail!(
                "PREFERRED_LANGUAGE must be a two-letter language code, got '{}'",
                config.preferred_language
            );
        }

        Ok(config)
    }

    /// Renderer settings derived from the environment.
    ///
    /// The app settings installed by the server take precedence, so the
    /// environment values act as the last fallback.
    pub fn renderer_config(&self) -> RendererConfig {
        let template = self.default_view_template.clone();
        let language = self.preferred_language.clone();
        RendererConfig::default()
            .with_decorator_name(self.responder_name.clone())
            .with_default_template(Provider::computed(move |request| {
                Some(
                    request
                        .setting(DEFAULT_VIEW_TEMPLATE_SETTING)
                        .unwrap_or(&template)
                        .to_string(),
                )
            }))
            .with_preferred_language(Provider::computed(move |request| {
                Some(
                    request
                        .setting(PREFERRED_LANGUAGE_SETTING)
                        .unwrap_or(&language)
                        .to_string(),
                )
            }))
    }
}
