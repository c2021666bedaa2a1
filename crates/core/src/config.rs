//! Session configuration.
//!
//! Everything the worklist needs from its surroundings (API location, bearer token, display
//! locale, layout preference) is resolved once at startup into a [`SessionConfig`] and passed
//! in. Nothing in the core or client crates reads environment variables or persisted state on
//! its own, so each piece can be tested in isolation.

use lab_types::{Locale, NonEmptyText};

use crate::session::PersistedSession;
use crate::{WorklistError, WorklistResult};

/// Session configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    api_base_url: NonEmptyText,
    token: Option<NonEmptyText>,
    locale: Locale,
    sidebar_collapsed: bool,
}

impl SessionConfig {
    /// Create a new `SessionConfig`.
    ///
    /// The base URL must be an absolute `http` or `https` URL; a trailing `/` is dropped so
    /// endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns [`WorklistError::InvalidInput`] if the URL is blank or not http(s).
    pub fn new(
        api_base_url: &str,
        token: Option<NonEmptyText>,
        locale: Locale,
    ) -> WorklistResult<Self> {
        let trimmed = api_base_url.trim().trim_end_matches('/');
        let api_base_url = NonEmptyText::new(trimmed)
            .map_err(|_| WorklistError::InvalidInput("API base URL cannot be empty".into()))?;

        let lower = api_base_url.as_str().to_ascii_lowercase();
        let has_host = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(WorklistError::InvalidInput(format!(
                "API base URL must start with http:// or https:// and name a host, got '{}'",
                api_base_url
            )));
        }

        Ok(Self {
            api_base_url,
            token,
            locale,
            sidebar_collapsed: false,
        })
    }

    /// Fill token and layout preference from persisted state.
    ///
    /// A token already set on the config (for example from the environment) wins over the
    /// stored one.
    pub fn with_persisted(mut self, persisted: &PersistedSession) -> Self {
        if self.token.is_none() {
            self.token = persisted.token.clone();
        }
        self.sidebar_collapsed = persisted.sidebar_collapsed;
        self
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_str()
    }

    pub fn token(&self) -> Option<&NonEmptyText> {
        self.token.as_ref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }
}
