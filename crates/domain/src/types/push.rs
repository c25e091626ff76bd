//! Transactional push request types
//!
//! A push is identified by a group id (the push identifier), addressed to one
//! kind of recipient identifier and carries a title/body message. Everything
//! else the transactional API accepts travels as [`OptionalFields`], merged
//! over a fixed default table.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::{
    DEFAULT_COLLAPSE_KEY, DEFAULT_CUSTOM_PAYLOAD, DEFAULT_PRIORITY, DEFAULT_TIME_TO_LIVE_SECS,
};
use crate::errors::{BatchError, Result};

const CUSTOM_IDS: &str = "custom_ids";
const TOKENS: &str = "tokens";
const INSTALL_IDS: &str = "install_ids";
const RECIPIENT_KEYS: [&str; 3] = [CUSTOM_IDS, TOKENS, INSTALL_IDS];

/// Recipients of a push: exactly one kind of identifier list.
///
/// Identifiers are always held as strings. Numeric identifiers are converted
/// on construction, so the transmitted body only ever contains strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipients {
    CustomIds(Vec<String>),
    Tokens(Vec<String>),
    InstallIds(Vec<String>),
}

impl Recipients {
    pub fn custom_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::CustomIds(ids.into_iter().map(|id| id.to_string()).collect())
    }

    pub fn tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::Tokens(tokens.into_iter().map(|token| token.to_string()).collect())
    }

    pub fn install_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::InstallIds(ids.into_iter().map(|id| id.to_string()).collect())
    }

    /// Parse loosely typed recipients such as `{"custom_ids": [1, "2"]}`.
    ///
    /// Exactly one of `custom_ids`, `tokens` or `install_ids` must be present
    /// and hold a non-empty array of scalars. Numbers keep their decimal form
    /// and booleans become `"1"` or `""`.
    ///
    /// # Errors
    /// Returns a validation error naming the `recipients` field otherwise.
    pub fn from_value(value: &Value) -> Result<Self> {
        let invalid = || BatchError::validation("recipients");
        let object = value.as_object().ok_or_else(invalid)?;

        let mut present =
            RECIPIENT_KEYS.iter().filter_map(|key| object.get(*key).map(|ids| (*key, ids)));
        let (key, ids) = present.next().ok_or_else(invalid)?;
        if present.next().is_some() {
            return Err(invalid());
        }

        let ids = ids
            .as_array()
            .filter(|ids| !ids.is_empty())
            .ok_or_else(invalid)?
            .iter()
            .map(stringify_identifier)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        Ok(match key {
            CUSTOM_IDS => Self::CustomIds(ids),
            TOKENS => Self::Tokens(ids),
            _ => Self::InstallIds(ids),
        })
    }

    /// Wire name of the identifier kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CustomIds(_) => CUSTOM_IDS,
            Self::Tokens(_) => TOKENS,
            Self::InstallIds(_) => INSTALL_IDS,
        }
    }

    pub fn ids(&self) -> &[String] {
        match self {
            Self::CustomIds(ids) | Self::Tokens(ids) | Self::InstallIds(ids) => ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Wire form, e.g. `{"custom_ids": ["1", "2"]}`.
    pub fn to_value(&self) -> Value {
        let mut recipients = Map::new();
        recipients.insert(self.kind().to_owned(), Value::from(self.ids().to_vec()));
        Value::Object(recipients)
    }
}

fn stringify_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

/// Title and body shown by the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }

    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.body.is_empty()
    }

    /// Parse a loosely typed `{"title": ..., "body": ...}` object.
    ///
    /// # Errors
    /// Returns a validation error naming the `message` field when either
    /// entry is missing, not a string, or empty.
    pub fn from_value(value: &Value) -> Result<Self> {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);

        match (field("title"), field("body")) {
            (Some(title), Some(body)) => {
                let message = Self { title, body };
                if message.is_complete() {
                    Ok(message)
                } else {
                    Err(BatchError::validation("message"))
                }
            }
            _ => Err(BatchError::validation("message")),
        }
    }
}

/// Delivery priority of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

crate::impl_domain_status_conversions!(Priority {
    Normal => "normal",
    High => "high",
});

/// Optional push fields, merged over the default table at send time.
///
/// Keys absent from the map take the default value; keys present are sent
/// verbatim, including keys the default table does not know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionalFields(Map<String, Value>);

impl OptionalFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table applied to every push.
    pub fn defaults() -> Map<String, Value> {
        let mut table = Map::new();
        table.insert("priority".into(), Value::from(DEFAULT_PRIORITY));
        table.insert("time_to_live".into(), Value::from(DEFAULT_TIME_TO_LIVE_SECS));
        table.insert(
            "gcm_collapse_key".into(),
            json!({ "enabled": false, "key": DEFAULT_COLLAPSE_KEY }),
        );
        table.insert("media".into(), json!({}));
        table.insert("deeplink".into(), json!(""));
        table.insert("custom_payload".into(), Value::from(DEFAULT_CUSTOM_PAYLOAD));
        table.insert("landing".into(), json!({}));
        table
    }

    /// Set an arbitrary field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn priority(self, priority: Priority) -> Self {
        self.with("priority", priority.to_string())
    }

    pub fn time_to_live(self, seconds: u64) -> Self {
        self.with("time_to_live", seconds)
    }

    pub fn deeplink(self, deeplink: impl Into<String>) -> Self {
        self.with("deeplink", deeplink.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Caller fields laid over [`OptionalFields::defaults`].
    pub fn merged_with_defaults(&self) -> Map<String, Value> {
        let mut merged = Self::defaults();
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Drop `media.icon`, and `media` itself if nothing else is left in it.
    ///
    /// iOS notifications have no icon.
    pub fn without_media_icon(mut self) -> Self {
        let Some(Value::Object(media)) = self.0.get_mut("media") else {
            return self;
        };

        let has_icon = media.get("icon").is_some_and(|icon| !is_empty_value(icon));
        if has_icon {
            media.remove("icon");
            if media.is_empty() {
                self.0.remove("media");
            }
        }
        self
    }
}

impl From<Map<String, Value>> for OptionalFields {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// A transactional push ready to be validated and sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRequest {
    push_identifier: String,
    recipients: Recipients,
    message: Message,
    optional_fields: OptionalFields,
}

impl PushRequest {
    pub fn new(push_identifier: impl Into<String>, recipients: Recipients, message: Message) -> Self {
        Self {
            push_identifier: push_identifier.into(),
            recipients,
            message,
            optional_fields: OptionalFields::default(),
        }
    }

    pub fn with_optional_fields(mut self, optional_fields: OptionalFields) -> Self {
        self.optional_fields = optional_fields;
        self
    }

    /// Build a request from loosely typed parts, validating as it goes.
    ///
    /// Checks run in order: push identifier, recipients, message. The first
    /// failing field is reported.
    ///
    /// # Errors
    /// Returns a validation error (code 32) naming the offending field.
    pub fn from_values(
        push_identifier: &Value,
        recipients: &Value,
        message: &Value,
        optional_fields: OptionalFields,
    ) -> Result<Self> {
        let push_identifier = push_identifier
            .as_str()
            .filter(|identifier| !identifier.is_empty())
            .ok_or_else(|| BatchError::validation("push identifier"))?;
        let recipients = Recipients::from_value(recipients)?;
        let message = Message::from_value(message)?;

        Ok(Self::new(push_identifier, recipients, message).with_optional_fields(optional_fields))
    }

    /// Check the request in the same order as [`PushRequest::from_values`].
    ///
    /// # Errors
    /// Returns a validation error (code 32) naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.push_identifier.is_empty() {
            return Err(BatchError::validation("push identifier"));
        }
        if self.recipients.is_empty() {
            return Err(BatchError::validation("recipients"));
        }
        if !self.message.is_complete() {
            return Err(BatchError::validation("message"));
        }
        Ok(())
    }

    pub fn push_identifier(&self) -> &str {
        &self.push_identifier
    }

    pub fn recipients(&self) -> &Recipients {
        &self.recipients
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn optional_fields(&self) -> &OptionalFields {
        &self.optional_fields
    }

    /// Same request with `media.icon` stripped from the optional fields.
    pub fn without_media_icon(mut self) -> Self {
        self.optional_fields = self.optional_fields.without_media_icon();
        self
    }

    /// JSON body for `transactional/send`.
    pub fn to_body(&self) -> Value {
        let mut body = self.optional_fields.merged_with_defaults();
        body.insert("group_id".into(), Value::from(self.push_identifier.clone()));
        body.insert("recipients".into(), self.recipients.to_value());
        body.insert(
            "message".into(),
            json!({ "title": self.message.title, "body": self.message.body }),
        );
        Value::Object(body)
    }
}
