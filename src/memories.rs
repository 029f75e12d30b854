//! Translation memory and glossary management

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::errors::Result;
use crate::http::{decode_data, FileAttachment, HttpClient};
use crate::models::{GlossaryTerm, ImportJob, Memory, MemoryId};

/// Client for the `/memories` family of endpoints.
///
/// Memories are addressed either by their numeric id or by the external key
/// supplied at creation time; every operation takes `impl Into<MemoryId>` so
/// both work.
#[derive(Debug, Clone)]
pub struct MemoryServices {
    client: HttpClient,
}

impl MemoryServices {
    pub(crate) fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// List all translation memories of the account
    pub async fn list(&self) -> Result<Vec<Memory>> {
        let data = self.client.send("GET", "/memories", None, None, None).await?;
        decode_data(data)
    }

    /// Retrieve a single memory
    pub async fn get(&self, id: impl Into<MemoryId>) -> Result<Memory> {
        let path = format!("/memories/{}", id.into());
        let data = self.client.send("GET", &path, None, None, None).await?;
        decode_data(data)
    }

    /// Create a new memory
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Memory> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(name));
        if let Some(description) = description {
            payload.insert("description".to_string(), json!(description));
        }

        let data = self
            .client
            .send("POST", "/memories", Some(Value::Object(payload)), None, None)
            .await?;
        decode_data(data)
    }

    /// Create a new memory bound to a caller-assigned external id
    pub async fn connect(
        &self,
        name: &str,
        description: Option<&str>,
        external_id: &str,
    ) -> Result<Memory> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(name));
        if let Some(description) = description {
            payload.insert("description".to_string(), json!(description));
        }
        payload.insert("external_id".to_string(), json!(external_id));

        let data = self
            .client
            .send("POST", "/memories", Some(Value::Object(payload)), None, None)
            .await?;
        decode_data(data)
    }

    /// Update the name and/or description of a memory
    pub async fn edit(
        &self,
        id: impl Into<MemoryId>,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Memory> {
        let mut payload = Map::new();
        if let Some(name) = name {
            payload.insert("name".to_string(), json!(name));
        }
        if let Some(description) = description {
            payload.insert("description".to_string(), json!(description));
        }

        let path = format!("/memories/{}", id.into());
        let data = self
            .client
            .send("PUT", &path, Some(Value::Object(payload)), None, None)
            .await?;
        decode_data(data)
    }

    /// Delete a memory, returning its last snapshot
    pub async fn delete(&self, id: impl Into<MemoryId>) -> Result<Memory> {
        let path = format!("/memories/{}", id.into());
        let data = self.client.send("DELETE", &path, None, None, None).await?;
        decode_data(data)
    }

    /// Add a single sentence pair to a memory
    pub async fn add(
        &self,
        id: impl Into<MemoryId>,
        source: &str,
        target: &str,
        sentence: &str,
        translation: &str,
        tuid: Option<&str>,
    ) -> Result<ImportJob> {
        let mut payload = Map::new();
        payload.insert("source".to_string(), json!(source));
        payload.insert("target".to_string(), json!(target));
        payload.insert("sentence".to_string(), json!(sentence));
        payload.insert("translation".to_string(), json!(translation));
        if let Some(tuid) = tuid {
            payload.insert("tuid".to_string(), json!(tuid));
        }

        let path = format!("/memories/{}/content", id.into());
        let data = self
            .client
            .send("POST", &path, Some(Value::Object(payload)), None, None)
            .await?;
        decode_data(data)
    }

    /// Replace the sentence pair identified by `tuid`
    pub async fn replace(
        &self,
        id: impl Into<MemoryId>,
        tuid: &str,
        source: &str,
        target: &str,
        sentence: &str,
        translation: &str,
    ) -> Result<ImportJob> {
        let payload = json!({
            "tuid": tuid,
            "source": source,
            "target": target,
            "sentence": sentence,
            "translation": translation,
        });

        let path = format!("/memories/{}/content", id.into());
        let data = self
            .client
            .send("PUT", &path, Some(payload), None, None)
            .await?;
        decode_data(data)
    }

    /// Upload a TMX file into a memory
    pub async fn import_tmx(
        &self,
        id: impl Into<MemoryId>,
        tmx: impl AsRef<Path>,
        compression: Option<&str>,
    ) -> Result<ImportJob> {
        let mut payload = Map::new();
        if let Some(compression) = compression {
            payload.insert("compression".to_string(), json!(compression));
        }

        let path = format!("/memories/{}/content", id.into());
        let files = vec![FileAttachment::new("tmx", tmx.as_ref())];
        let data = self
            .client
            .send("POST", &path, Some(Value::Object(payload)), Some(files), None)
            .await?;
        decode_data(data)
    }

    /// Upload a CSV glossary into a memory.
    ///
    /// `kind` selects the glossary semantics, `equivalent` or
    /// `unidirectional`.
    pub async fn import_glossary(
        &self,
        id: impl Into<MemoryId>,
        csv: impl AsRef<Path>,
        kind: &str,
        compression: Option<&str>,
    ) -> Result<ImportJob> {
        let mut payload = Map::new();
        payload.insert("type".to_string(), json!(kind));
        if let Some(compression) = compression {
            payload.insert("compression".to_string(), json!(compression));
        }

        let path = format!("/memories/{}/glossary", id.into());
        let files = vec![FileAttachment::new("csv", csv.as_ref())];
        let data = self
            .client
            .send("POST", &path, Some(Value::Object(payload)), Some(files), None)
            .await?;
        decode_data(data)
    }

    /// Add one glossary entry, given as its term in each language
    pub async fn add_to_glossary(
        &self,
        id: impl Into<MemoryId>,
        terms: &[GlossaryTerm],
        kind: &str,
        tuid: Option<&str>,
    ) -> Result<ImportJob> {
        let mut payload = Map::new();
        payload.insert("terms".to_string(), serde_json::to_value(terms)?);
        payload.insert("type".to_string(), json!(kind));
        if let Some(tuid) = tuid {
            payload.insert("tuid".to_string(), json!(tuid));
        }

        let path = format!("/memories/{}/glossary", id.into());
        let data = self
            .client
            .send("POST", &path, Some(Value::Object(payload)), None, None)
            .await?;
        decode_data(data)
    }

    /// Replace the glossary entry identified by `tuid`
    pub async fn replace_in_glossary(
        &self,
        id: impl Into<MemoryId>,
        tuid: &str,
        terms: &[GlossaryTerm],
        kind: &str,
    ) -> Result<ImportJob> {
        let payload = json!({
            "tuid": tuid,
            "terms": terms,
            "type": kind,
        });

        let path = format!("/memories/{}/glossary", id.into());
        let data = self
            .client
            .send("PUT", &path, Some(payload), None, None)
            .await?;
        decode_data(data)
    }

    /// Poll the progress of a TMX or glossary import
    pub async fn get_import_status(&self, uuid: &str) -> Result<ImportJob> {
        let path = format!("/import-jobs/{}", uuid);
        let data = self.client.send("GET", &path, None, None, None).await?;
        decode_data(data)
    }
}
