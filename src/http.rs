//! HTTP transport for the ModernMT API
//!
//! Every request is physically sent as a POST; the logical verb travels in
//! the `X-HTTP-Method-Override` header. Payloads are JSON bodies, or
//! multipart forms when file attachments are present. Responses always carry
//! the `{status, data|error}` envelope, decoded in a single step.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};

/// A file to be attached to a multipart request
#[derive(Debug, Clone)]
pub(crate) struct FileAttachment {
    /// Multipart field name, e.g. `tmx` or `content`
    pub field: String,
    pub path: PathBuf,
}

impl FileAttachment {
    pub fn new(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            path: path.into(),
        }
    }
}

/// Response envelope error payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// The `{status, data|error}` envelope wrapping every API response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope {
    pub status: i64,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// Unwrap an envelope into its `data` field, or a structured API error.
///
/// Status outside [200,300) is a failure regardless of the HTTP transport
/// status the envelope arrived with.
pub(crate) fn unwrap_envelope(envelope: ApiEnvelope) -> Result<Value> {
    if !(200..300).contains(&envelope.status) {
        let (error_type, message) = match envelope.error {
            Some(e) => (e.error_type, e.message),
            None => ("UnknownError".to_string(), String::new()),
        };
        return Err(ClientError::Api {
            status: envelope.status,
            error_type,
            message,
        });
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}

/// Decode raw response bytes into the envelope `data` field
pub(crate) fn parse_envelope(body: &[u8]) -> Result<Value> {
    let envelope: ApiEnvelope =
        serde_json::from_slice(body).map_err(|e| ClientError::InvalidResponse {
            message: format!("malformed response envelope: {}", e),
        })?;

    unwrap_envelope(envelope)
}

/// Decode an envelope `data` field into its typed record.
///
/// A decode failure on a well-formed envelope counts as a transport error.
pub(crate) fn decode_data<T: serde::de::DeserializeOwned>(data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| ClientError::InvalidResponse {
        message: format!("unexpected response data: {}", e),
    })
}

/// Stringify a JSON value for a multipart form field.
///
/// Arrays are comma-joined, strings are passed through unquoted, everything
/// else uses its JSON rendering.
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(form_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Low-level HTTP client with the ModernMT auth headers baked in
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    base_url: String,
    headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = vec![
            ("MMT-ApiKey".to_string(), config.api_key.clone()),
            ("MMT-Platform".to_string(), config.platform.clone()),
            (
                "MMT-PlatformVersion".to_string(),
                config.platform_version.clone(),
            ),
        ];

        if let Some(api_client) = config.api_client {
            headers.push(("MMT-ApiClient".to_string(), api_client.to_string()));
        }

        let client = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
            client,
        })
    }

    /// Send one API request and return the `data` field of the envelope
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        data: Option<Value>,
        files: Option<Vec<FileAttachment>>,
        extra_headers: Option<Vec<(String, String)>>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method, path, multipart = files.is_some(), "sending request");

        let mut request = self
            .client
            .post(&url)
            .header("X-HTTP-Method-Override", method);

        for (key, val) in &self.headers {
            request = request.header(key.as_str(), val.as_str());
        }

        if let Some(extra) = extra_headers {
            for (key, val) in extra {
                request = request.header(key.as_str(), val.as_str());
            }
        }

        request = match files {
            Some(files) => {
                let form = build_multipart_form(data.as_ref(), files).await?;
                request.multipart(form)
            }
            None => match &data {
                Some(data) => request.json(data),
                None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
            },
        };

        let response = request.send().await.map_err(|e| ClientError::Network {
            message: e.to_string(),
        })?;

        let body = response.bytes().await.map_err(|e| ClientError::Network {
            message: e.to_string(),
        })?;

        parse_envelope(&body)
    }
}

/// Build a multipart form from the request data plus file attachments
async fn build_multipart_form(
    data: Option<&Value>,
    files: Vec<FileAttachment>,
) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();

    for attachment in files {
        let file_name = attachment
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| attachment.field.clone());

        let contents = tokio::fs::read(&attachment.path).await?;
        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name);
        form = form.part(attachment.field, part);
    }

    if let Some(Value::Object(map)) = data {
        for (key, val) in map {
            form = form.text(key.clone(), form_value(val));
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success_round_trip() {
        let data = json!([{"translation": "Ciao", "characters": 5, "billedCharacters": 5}]);
        let body = json!({"status": 200, "data": data}).to_string();

        let parsed = parse_envelope(body.as_bytes()).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_envelope_error_round_trip() {
        let body = json!({
            "status": 401,
            "error": {"type": "AuthorizationException", "message": "Invalid API key"}
        })
        .to_string();

        let err = parse_envelope(body.as_bytes()).unwrap_err();
        match err {
            ClientError::Api {
                status,
                error_type,
                message,
            } => {
                assert_eq!(status, 401);
                assert_eq!(error_type, "AuthorizationException");
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_boundary_statuses() {
        for status in [200, 204, 299] {
            let body = json!({"status": status, "data": "x"}).to_string();
            assert!(parse_envelope(body.as_bytes()).is_ok(), "status {}", status);
        }

        for status in [199, 300, 500] {
            let body = json!({
                "status": status,
                "error": {"type": "E", "message": "m"}
            })
            .to_string();
            assert!(
                parse_envelope(body.as_bytes()).is_err(),
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_envelope_missing_data_is_null() {
        let body = json!({"status": 200}).to_string();
        assert_eq!(parse_envelope(body.as_bytes()).unwrap(), Value::Null);
    }

    #[test]
    fn test_envelope_error_without_body() {
        let body = json!({"status": 500}).to_string();
        let err = parse_envelope(body.as_bytes()).unwrap_err();
        match err {
            ClientError::Api {
                status, error_type, ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(error_type, "UnknownError");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_is_transport_error() {
        let err = parse_envelope(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));
    }

    #[test]
    fn test_form_value_stringification() {
        assert_eq!(form_value(&json!("plain")), "plain");
        assert_eq!(form_value(&json!(["en", "it"])), "en,it");
        assert_eq!(form_value(&json!([1, 2, 3])), "1,2,3");
        assert_eq!(form_value(&json!(42)), "42");
        assert_eq!(form_value(&json!(true)), "true");
    }

    #[tokio::test]
    async fn test_multipart_form_includes_fields_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tmx");
        tokio::fs::write(&path, b"<tmx/>").await.unwrap();

        let data = json!({"compression": "gzip", "targets": ["it", "de"]});
        let form = build_multipart_form(Some(&data), vec![FileAttachment::new("tmx", &path)])
            .await
            .unwrap();

        // Form internals are opaque; constructing without error is the
        // contract here, field rendering is covered by form_value tests.
        drop(form);
    }

    #[tokio::test]
    async fn test_multipart_missing_file_is_io_error() {
        let result =
            build_multipart_form(None, vec![FileAttachment::new("tmx", "/nonexistent/x.tmx")])
                .await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
