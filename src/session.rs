//! Session body structures compatible with express-session JSON

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Cookie data structure compatible with express-session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    /// Original max age in milliseconds (as set initially)
    pub original_max_age: Option<i64>,

    /// Expiration time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// Secure flag
    #[serde(default)]
    pub secure: bool,

    /// HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,

    /// Cookie path
    #[serde(default = "default_path")]
    pub path: String,

    /// Cookie domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// SameSite attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_http_only() -> bool {
    true
}

fn default_path() -> String {
    "/".to_string()
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            original_max_age: None,
            expires: None,
            secure: false,
            http_only: true,
            path: "/".to_string(),
            domain: None,
            same_site: None,
        }
    }
}

impl SessionCookie {
    /// Create a new session cookie with the given max age in milliseconds
    pub fn with_max_age_ms(max_age_ms: i64) -> Self {
        let expires = Utc::now() + chrono::Duration::milliseconds(max_age_ms);
        Self {
            original_max_age: Some(max_age_ms),
            expires: Some(expires),
            ..Default::default()
        }
    }

    /// Remaining max age in milliseconds.
    ///
    /// Computed from `expires` when set, otherwise the original max age.
    /// `None` means a browser-session cookie with no bounded lifetime.
    pub fn max_age_ms(&self) -> Option<i64> {
        match self.expires {
            Some(exp) => Some((exp - Utc::now()).num_milliseconds()),
            None => self.original_max_age,
        }
    }

    /// Reset expiration based on the original max age
    pub fn touch(&mut self) {
        if let Some(original) = self.original_max_age {
            self.expires = Some(Utc::now() + chrono::Duration::milliseconds(original));
        }
    }

    /// Check if the cookie has expired
    pub fn is_expired(&self) -> bool {
        match self.expires {
            Some(exp) => exp < Utc::now(),
            None => false, // No expiry = browser session
        }
    }
}

/// Session body as persisted by the store: the cookie plus all user
/// fields flattened at the same level, matching the express-session
/// JSON layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionData {
    /// Cookie information
    pub cookie: SessionCookie,

    /// Additional session data (flattened at same level as cookie)
    #[serde(flatten)]
    pub data: HashMap<String, Value>,
}

impl SessionData {
    /// Create a new session body with the given cookie max age in milliseconds
    pub fn with_max_age_ms(max_age_ms: i64) -> Self {
        Self {
            cookie: SessionCookie::with_max_age_ms(max_age_ms),
            data: HashMap::new(),
        }
    }

    /// Get a value from session data
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in session data
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.to_string(), v);
        }
    }

    /// Remove a value from session data
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Check if the session carries no user data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_json_uses_express_field_names() {
        let cookie = SessionCookie::with_max_age_ms(2000);
        let json = serde_json::to_value(&cookie).unwrap();
        assert!(json.get("originalMaxAge").is_some());
        assert!(json.get("httpOnly").is_some());
        assert_eq!(json["path"], "/");
    }

    #[test]
    fn session_data_flattens_user_fields() {
        let mut session = SessionData::with_max_age_ms(2000);
        session.set("name", "cm");

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["name"], "cm");
        assert!(json.get("cookie").is_some());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn max_age_falls_back_to_original_without_expires() {
        let cookie = SessionCookie {
            original_max_age: Some(5000),
            ..Default::default()
        };
        assert_eq!(cookie.max_age_ms(), Some(5000));
        assert!(!cookie.is_expired());
    }

    #[test]
    fn expired_cookie_reports_expired() {
        let mut cookie = SessionCookie::with_max_age_ms(1000);
        cookie.expires = Some(Utc::now() - chrono::Duration::seconds(1));
        assert!(cookie.is_expired());

        cookie.touch();
        assert!(!cookie.is_expired());
    }
}
