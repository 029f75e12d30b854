//! Data models for the ModernMT API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a translation memory, either the numeric id assigned by
/// the service or a caller-assigned external key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryId {
    /// Numeric id assigned by ModernMT
    Id(i64),
    /// External key supplied at creation time
    Key(String),
}

impl From<i64> for MemoryId {
    fn from(id: i64) -> Self {
        MemoryId::Id(id)
    }
}

impl From<&str> for MemoryId {
    fn from(key: &str) -> Self {
        MemoryId::Key(key.to_string())
    }
}

impl From<String> for MemoryId {
    fn from(key: String) -> Self {
        MemoryId::Key(key)
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryId::Id(id) => write!(f, "{}", id),
            MemoryId::Key(key) => write!(f, "{}", key),
        }
    }
}

/// A single translated segment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translation: String,
    #[serde(default)]
    pub context_vector: Option<String>,
    #[serde(default)]
    pub characters: i64,
    #[serde(default)]
    pub billed_characters: i64,
    #[serde(default)]
    pub detected_language: Option<String>,
    #[serde(default)]
    pub alt_translations: Option<Vec<String>>,
}

/// A server-side translation memory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creation_date: String,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Progress of an asynchronous memory or glossary import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: String,
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub progress: f32,
}

/// Language detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    pub billed_characters: i64,
    pub detected_language: String,
}

/// Billing period snapshot attached to a [`User`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriod {
    pub begin: String,
    pub end: String,
    pub chars: i64,
    pub plan: String,
    pub plan_description: String,
    pub plan_for_cat_tool: bool,
    pub amount: f32,
    pub currency: String,
    pub currency_symbol: String,
}

/// Account information for the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub registration_date: String,
    pub country: String,
    pub is_business: i64,
    pub status: String,
    pub billing_period: BillingPeriod,
}

/// A fixed term translation stored in a glossary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub language: String,
}

impl GlossaryTerm {
    pub fn new(term: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            language: language.into(),
        }
    }
}

/// Optional parameters for translation requests
///
/// Adaptive hints and a precomputed context vector are carried here as well,
/// so a single options value covers plain, adaptive and batch requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateOptions {
    pub priority: Option<String>,
    pub project_id: Option<String>,
    pub multiline: Option<bool>,
    pub timeout: Option<u32>,
    pub format: Option<String>,
    pub alt_translations: Option<u32>,
    pub hints: Option<Vec<i64>>,
    pub context_vector: Option<String>,

    // batch translation only
    pub metadata: Option<Value>,
    pub idempotency_key: Option<String>,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = Some(multiline);
        self
    }

    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_alt_translations(mut self, count: u32) -> Self {
        self.alt_translations = Some(count);
        self
    }

    pub fn with_hints(mut self, hints: Vec<i64>) -> Self {
        self.hints = Some(hints);
        self
    }

    pub fn with_context_vector(mut self, vector: impl Into<String>) -> Self {
        self.context_vector = Some(vector.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Optional parameters for context vector requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextVectorOptions {
    pub hints: Option<Vec<i64>>,
    pub limit: Option<u32>,
    pub compression: Option<String>,
}

impl ContextVectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hints(mut self, hints: Vec<i64>) -> Self {
        self.hints = Some(hints);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_id_display() {
        assert_eq!(MemoryId::from(42).to_string(), "42");
        assert_eq!(MemoryId::from("my-memory").to_string(), "my-memory");
    }

    #[test]
    fn test_translation_optional_fields() {
        let json = r#"{"translation":"Ciao","characters":5,"billedCharacters":5}"#;
        let t: Translation = serde_json::from_str(json).unwrap();
        assert_eq!(t.translation, "Ciao");
        assert_eq!(t.characters, 5);
        assert!(t.context_vector.is_none());
        assert!(t.alt_translations.is_none());
    }

    #[test]
    fn test_translation_full_fields() {
        let json = r#"{
            "translation": "Hallo",
            "contextVector": "cv",
            "characters": 5,
            "billedCharacters": 5,
            "detectedLanguage": "en",
            "altTranslations": ["Guten Tag"]
        }"#;
        let t: Translation = serde_json::from_str(json).unwrap();
        assert_eq!(t.context_vector.as_deref(), Some("cv"));
        assert_eq!(t.detected_language.as_deref(), Some("en"));
        assert_eq!(t.alt_translations.unwrap(), vec!["Guten Tag"]);
    }

    #[test]
    fn test_import_job_without_memory() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000000","size":120,"progress":0.5}"#;
        let job: ImportJob = serde_json::from_str(json).unwrap();
        assert!(job.memory.is_none());
        assert_eq!(job.size, 120);
    }

    #[test]
    fn test_user_parsing() {
        let json = r#"{
            "id": 1,
            "name": "Jane",
            "email": "jane@example.com",
            "registrationDate": "2020-01-01T00:00:00+00:00",
            "country": "IT",
            "isBusiness": 0,
            "status": "ACTIVE",
            "billingPeriod": {
                "begin": "2020-01-01T00:00:00+00:00",
                "end": "2020-02-01T00:00:00+00:00",
                "chars": 1000,
                "plan": "free",
                "planDescription": "Free plan",
                "planForCatTool": false,
                "amount": 0.0,
                "currency": "EUR",
                "currencySymbol": "€"
            }
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.billing_period.plan, "free");
        assert_eq!(user.is_business, 0);
    }

    #[test]
    fn test_translate_options_builder() {
        let options = TranslateOptions::new()
            .with_priority("background")
            .with_hints(vec![1, 2])
            .with_context_vector("cv");

        assert_eq!(options.priority.as_deref(), Some("background"));
        assert_eq!(options.hints.as_deref(), Some(&[1, 2][..]));
        assert!(options.metadata.is_none());
    }
}
