//! Top-level ModernMT client

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::callback::{CallbackVerifier, HttpKeySource};
use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};
use crate::http::{decode_data, FileAttachment, HttpClient};
use crate::memories::MemoryServices;
use crate::models::{ContextVectorOptions, DetectedLanguage, TranslateOptions, Translation, User};

/// Shape of the `/context-vector` response data
#[derive(Deserialize)]
struct ContextVectors {
    vectors: HashMap<String, String>,
}

/// Asynchronous client for the ModernMT translation API
pub struct ModernMt {
    http: HttpClient,
    /// Translation memory and glossary management
    pub memories: MemoryServices,
    verifier: CallbackVerifier,
}

impl ModernMt {
    /// Create a client with the default platform identity
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from an explicit configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::new(&config)?;
        let memories = MemoryServices::new(http.clone());
        let verifier = CallbackVerifier::new(Arc::new(HttpKeySource::new(http.clone())));

        Ok(Self {
            http,
            memories,
            verifier,
        })
    }

    /// Create a client from the `MMT_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// List the language codes the service can translate
    pub async fn list_supported_languages(&self) -> Result<Vec<String>> {
        let data = self
            .http
            .send("GET", "/translate/languages", None, None, None)
            .await?;
        decode_data(data)
    }

    /// Translate a single text segment
    pub async fn translate(
        &self,
        source: Option<&str>,
        target: &str,
        q: &str,
        options: Option<&TranslateOptions>,
    ) -> Result<Translation> {
        let mut translations = self.translate_list(source, target, &[q], options).await?;

        if translations.is_empty() {
            return Err(ClientError::InvalidResponse {
                message: "empty translation list for a single segment".to_string(),
            });
        }

        Ok(translations.remove(0))
    }

    /// Translate a list of text segments in one request.
    ///
    /// Adaptivity (memory hints, context vector) is configured through
    /// [`TranslateOptions`]. Omitting `source` asks the service to detect
    /// the source language.
    pub async fn translate_list(
        &self,
        source: Option<&str>,
        target: &str,
        q: &[&str],
        options: Option<&TranslateOptions>,
    ) -> Result<Vec<Translation>> {
        let payload = translate_payload(source, target, q, None, options);
        let data = self
            .http
            .send("GET", "/translate", Some(payload), None, None)
            .await?;
        decode_data(data)
    }

    /// Submit a batch translation, delivered later to `webhook` as a signed
    /// callback.
    ///
    /// Returns whether the job was enqueued. `options.metadata` is echoed in
    /// the callback; `options.idempotency_key` deduplicates retried
    /// submissions.
    pub async fn translate_batch(
        &self,
        webhook: &str,
        source: Option<&str>,
        target: &str,
        q: &[&str],
        options: Option<&TranslateOptions>,
    ) -> Result<bool> {
        let payload = translate_payload(source, target, q, Some(webhook), options);

        let extra_headers = options
            .and_then(|o| o.idempotency_key.as_ref())
            .map(|key| vec![("x-idempotency-key".to_string(), key.clone())]);

        let data = self
            .http
            .send("POST", "/translate/batch", Some(payload), None, extra_headers)
            .await?;

        #[derive(Deserialize)]
        struct Enqueued {
            enqueued: bool,
        }

        let response: Enqueued = decode_data(data)?;
        Ok(response.enqueued)
    }

    /// Handle a batch translation callback: verify its signature, then parse
    /// the delivered translations.
    pub async fn handle_callback(&self, body: &[u8], signature: &str) -> Result<Vec<Translation>> {
        self.verifier.verify_and_parse(body, signature).await
    }

    /// Like [`handle_callback`](Self::handle_callback), additionally
    /// deserializing the metadata echoed by the service.
    pub async fn handle_callback_with_metadata<M: DeserializeOwned>(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<(Vec<Translation>, Option<M>)> {
        self.verifier
            .verify_and_parse_with_metadata(body, signature)
            .await
    }

    /// Detect the language of a single text
    pub async fn detect_language(&self, q: &str, format: Option<&str>) -> Result<DetectedLanguage> {
        let mut list = self.detect_language_list(&[q], format).await?;

        if list.is_empty() {
            return Err(ClientError::InvalidResponse {
                message: "empty detection list for a single segment".to_string(),
            });
        }

        Ok(list.remove(0))
    }

    /// Detect the language of each text in a list
    pub async fn detect_language_list(
        &self,
        q: &[&str],
        format: Option<&str>,
    ) -> Result<Vec<DetectedLanguage>> {
        let mut payload = Map::new();
        payload.insert("q".to_string(), json!(q));
        if let Some(format) = format {
            payload.insert("format".to_string(), json!(format));
        }

        let data = self
            .http
            .send("GET", "/translate/detect", Some(Value::Object(payload)), None, None)
            .await?;
        decode_data(data)
    }

    /// Compute a context vector for one target language.
    ///
    /// Errors from the underlying request are propagated, including the case
    /// where the response carries no vector for `target`.
    pub async fn get_context_vector(
        &self,
        source: &str,
        target: &str,
        text: &str,
        options: Option<&ContextVectorOptions>,
    ) -> Result<String> {
        let mut vectors = self
            .get_context_vectors(source, &[target], text, options)
            .await?;

        vectors
            .remove(target)
            .ok_or_else(|| ClientError::InvalidResponse {
                message: format!("no context vector returned for {}", target),
            })
    }

    /// Compute context vectors for several target languages at once
    pub async fn get_context_vectors(
        &self,
        source: &str,
        targets: &[&str],
        text: &str,
        options: Option<&ContextVectorOptions>,
    ) -> Result<HashMap<String, String>> {
        let mut payload = context_vector_payload(source, targets, options);
        payload.insert("text".to_string(), json!(text));

        let data = self
            .http
            .send("GET", "/context-vector", Some(Value::Object(payload)), None, None)
            .await?;

        let response: ContextVectors = decode_data(data)?;
        Ok(response.vectors)
    }

    /// Compute a context vector from the contents of a file
    pub async fn get_context_vector_from_file(
        &self,
        source: &str,
        target: &str,
        content: impl AsRef<Path>,
        options: Option<&ContextVectorOptions>,
    ) -> Result<String> {
        let mut vectors = self
            .get_context_vectors_from_file(source, &[target], content, options)
            .await?;

        vectors
            .remove(target)
            .ok_or_else(|| ClientError::InvalidResponse {
                message: format!("no context vector returned for {}", target),
            })
    }

    /// Compute context vectors for several targets from the contents of a
    /// file, uploaded as a multipart attachment
    pub async fn get_context_vectors_from_file(
        &self,
        source: &str,
        targets: &[&str],
        content: impl AsRef<Path>,
        options: Option<&ContextVectorOptions>,
    ) -> Result<HashMap<String, String>> {
        let payload = context_vector_payload(source, targets, options);
        let files = vec![FileAttachment::new("content", content.as_ref())];

        let data = self
            .http
            .send(
                "GET",
                "/context-vector",
                Some(Value::Object(payload)),
                Some(files),
                None,
            )
            .await?;

        let response: ContextVectors = decode_data(data)?;
        Ok(response.vectors)
    }

    /// Retrieve account information for the authenticated user
    pub async fn me(&self) -> Result<User> {
        let data = self.http.send("GET", "/users/me", None, None, None).await?;
        decode_data(data)
    }
}

/// Build the payload shared by plain and batch translation requests
fn translate_payload(
    source: Option<&str>,
    target: &str,
    q: &[&str],
    webhook: Option<&str>,
    options: Option<&TranslateOptions>,
) -> Value {
    let mut payload = Map::new();

    if let Some(webhook) = webhook {
        payload.insert("webhook".to_string(), json!(webhook));
    }
    if let Some(source) = source {
        payload.insert("source".to_string(), json!(source));
    }
    payload.insert("target".to_string(), json!(target));
    payload.insert("q".to_string(), json!(q));

    if let Some(options) = options {
        if let Some(hints) = &options.hints {
            payload.insert("hints".to_string(), json!(hints));
        }
        if let Some(vector) = &options.context_vector {
            payload.insert("context_vector".to_string(), json!(vector));
        }
        if let Some(priority) = &options.priority {
            payload.insert("priority".to_string(), json!(priority));
        }
        if let Some(project_id) = &options.project_id {
            payload.insert("project_id".to_string(), json!(project_id));
        }
        if let Some(multiline) = options.multiline {
            payload.insert("multiline".to_string(), json!(multiline));
        }
        if let Some(timeout) = options.timeout {
            payload.insert("timeout".to_string(), json!(timeout));
        }
        if let Some(format) = &options.format {
            payload.insert("format".to_string(), json!(format));
        }
        if let Some(alt) = options.alt_translations {
            payload.insert("alt_translations".to_string(), json!(alt));
        }
        if let Some(metadata) = &options.metadata {
            payload.insert("metadata".to_string(), metadata.clone());
        }
    }

    Value::Object(payload)
}

/// Build the payload shared by text and file context vector requests
fn context_vector_payload(
    source: &str,
    targets: &[&str],
    options: Option<&ContextVectorOptions>,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("source".to_string(), json!(source));
    payload.insert("targets".to_string(), json!(targets));

    if let Some(options) = options {
        if let Some(hints) = &options.hints {
            payload.insert("hints".to_string(), json!(hints));
        }
        if let Some(limit) = options.limit {
            payload.insert("limit".to_string(), json!(limit));
        }
        if let Some(compression) = &options.compression {
            payload.insert("compression".to_string(), json!(compression));
        }
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;

    #[test]
    fn test_translate_payload_minimal() {
        let payload = translate_payload(Some("en"), "it", &["Hello"], None, None);
        assert_json_eq!(
            payload,
            json!({"source": "en", "target": "it", "q": ["Hello"]})
        );
    }

    #[test]
    fn test_translate_payload_omits_source_for_detection() {
        let payload = translate_payload(None, "it", &["Hello"], None, None);
        assert_json_eq!(payload, json!({"target": "it", "q": ["Hello"]}));
    }

    #[test]
    fn test_translate_payload_with_options() {
        let options = TranslateOptions::new()
            .with_hints(vec![10, 11])
            .with_context_vector("cv-data")
            .with_priority("background")
            .with_project_id("proj")
            .with_multiline(false)
            .with_timeout(200)
            .with_format("text/xml")
            .with_alt_translations(2);

        let payload = translate_payload(Some("en"), "de", &["a", "b"], None, Some(&options));
        assert_json_eq!(
            payload,
            json!({
                "source": "en",
                "target": "de",
                "q": ["a", "b"],
                "hints": [10, 11],
                "context_vector": "cv-data",
                "priority": "background",
                "project_id": "proj",
                "multiline": false,
                "timeout": 200,
                "format": "text/xml",
                "alt_translations": 2
            })
        );
    }

    #[test]
    fn test_batch_payload_carries_webhook_and_metadata() {
        let options = TranslateOptions::new()
            .with_metadata(json!({"job": 7}))
            .with_idempotency_key("key-123");

        let payload = translate_payload(
            Some("en"),
            "fr",
            &["Hi"],
            Some("https://example.com/hook"),
            Some(&options),
        );

        assert_json_eq!(
            payload,
            json!({
                "webhook": "https://example.com/hook",
                "source": "en",
                "target": "fr",
                "q": ["Hi"],
                "metadata": {"job": 7}
            })
        );
    }

    #[test]
    fn test_context_vector_payload() {
        let options = ContextVectorOptions::new()
            .with_hints(vec![3])
            .with_limit(5)
            .with_compression("gzip");

        let payload = context_vector_payload("en", &["it", "de"], Some(&options));
        assert_json_eq!(
            Value::Object(payload),
            json!({
                "source": "en",
                "targets": ["it", "de"],
                "hints": [3],
                "limit": 5,
                "compression": "gzip"
            })
        );
    }

    #[test]
    fn test_client_rejects_empty_api_key() {
        assert!(ModernMt::new("").is_err());
    }
}
