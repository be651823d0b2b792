//! Recognizer credentials value object

use std::fmt;

/// Everything the recognizer needs to open a session
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub access_key: String,
    pub language: String,
    pub auto_punctuation: bool,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            access_key: access_key.into(),
            language: super::app_config::DEFAULT_LANGUAGE.to_string(),
            auto_punctuation: true,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_auto_punctuation(mut self, enabled: bool) -> Self {
        self.auto_punctuation = enabled;
        self
    }
}

// Keeps the access key out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("access_key", &"***")
            .field("language", &self.language)
            .field("auto_punctuation", &self.auto_punctuation)
            .finish()
    }
}
