use serde::{Deserialize, Serialize};

/// One submitted JSON payload plus the key it was stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: serde_json::Value,
}

impl Record {
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A submission rendered for delivery by mail.
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}
