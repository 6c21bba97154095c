//! Client for the WireMock admin API.

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::journal::{self, RequestJournal};
use crate::model::{ListStubMappingsResult, RequestPattern, ScenarioList, StubMapping};
use crate::paths;
use crate::transport::{AdminRequest, AdminTransport, HttpTransport, Payload};
use futures::future::join_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Client for the admin API of a running WireMock server
#[derive(Clone)]
pub struct AdminClient {
    transport: Arc<dyn AdminTransport>,
    files_root: Option<PathBuf>,
}

impl AdminClient {
    /// Create a client talking HTTP to `config.base_url`
    pub fn new(config: &AdminConfig) -> Result<Self, AdminError> {
        config.validate()?;
        let transport = HttpTransport::new(&config.base_url, config.timeout())?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.files_root.clone(),
        ))
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn AdminTransport>, files_root: Option<PathBuf>) -> Self {
        Self {
            transport,
            files_root,
        }
    }

    /// Shared handle to the underlying transport
    pub fn transport(&self) -> Arc<dyn AdminTransport> {
        Arc::clone(&self.transport)
    }

    pub fn files_root(&self) -> Option<&Path> {
        self.files_root.as_deref()
    }

    /// Journal helper sharing this client's transport
    pub fn request_journal(&self, browser_name: Option<&str>) -> RequestJournal {
        RequestJournal::new(self.transport(), browser_name)
    }

    // ========================================================================
    // Scenarios
    // ========================================================================

    /// List all scenarios and their current state
    pub async fn get_scenarios(&self) -> Result<ScenarioList, AdminError> {
        self.transport
            .send(AdminRequest::get(paths::SCENARIOS))
            .await?
            .decode()
    }

    /// Put every scenario back in its initial state
    pub async fn reset_scenarios(&self) -> Result<(), AdminError> {
        self.transport
            .send(AdminRequest::post(paths::SCENARIOS_RESET))
            .await?;
        Ok(())
    }

    // ========================================================================
    // Stub mappings
    // ========================================================================

    /// Create a stub mapping.
    ///
    /// A body file the response refers to is uploaded to the server's file
    /// store first, so the mapping never points at a missing file.
    pub async fn add_mapping(&self, mapping: &StubMapping) -> Result<StubMapping, AdminError> {
        if let Some(file_name) = mapping.referred_body_file() {
            let content = self.read_body_file(file_name).await?;
            self.upload_file(file_name, content).await?;
        }

        let request = AdminRequest::post(paths::MAPPINGS).with_json(mapping)?;
        self.transport.send(request).await?.decode()
    }

    /// Add one mapping per `*.json` file in `dir`.
    ///
    /// Files are submitted concurrently. A file that can't be read, parsed or
    /// accepted is logged and skipped. Returns how many mappings were added.
    pub async fn add_mappings_from_dir(&self, dir: impl AsRef<Path>) -> Result<usize, AdminError> {
        let dir = dir.as_ref();
        let io_error = |source: std::io::Error| AdminError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let results = join_all(files.iter().map(|path| self.add_mapping_from_file(path))).await;

        let mut added = 0;
        for (path, result) in files.iter().zip(results) {
            match result {
                Ok(_) => added += 1,
                Err(e) => warn!(
                    file = %path.display(),
                    error = %e,
                    "Unable to add file to mappings"
                ),
            }
        }
        info!(dir = %dir.display(), added, total = files.len(), "Imported mappings");
        Ok(added)
    }

    async fn add_mapping_from_file(&self, path: &Path) -> Result<StubMapping, AdminError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AdminError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let mapping: StubMapping = serde_json::from_str(&contents)
            .map_err(|e| AdminError::Parse(format!("{}: {e}", path.display())))?;
        self.add_mapping(&mapping).await
    }

    /// List all stub mappings
    pub async fn get_mappings(&self) -> Result<ListStubMappingsResult, AdminError> {
        self.transport
            .send(AdminRequest::get(paths::MAPPINGS))
            .await?
            .decode()
    }

    /// Get a single stub mapping by id
    pub async fn get_mapping(&self, id: &str) -> Result<StubMapping, AdminError> {
        self.transport
            .send(AdminRequest::get(paths::mapping(id)))
            .await?
            .decode()
    }

    /// Replace the stub mapping with the given id
    pub async fn update_mapping(
        &self,
        id: &str,
        mapping: &StubMapping,
    ) -> Result<StubMapping, AdminError> {
        let request = AdminRequest::put(paths::mapping(id)).with_json(mapping)?;
        self.transport.send(request).await?.decode()
    }

    /// Replace the stub mapping whose metadata matches `metadata`.
    ///
    /// When several mappings match, the first one listed is updated.
    pub async fn update_mapping_by_metadata(
        &self,
        metadata: &Value,
        mapping: &StubMapping,
    ) -> Result<StubMapping, AdminError> {
        let found = self.find_by_metadata(metadata).await?;

        let Some(first) = found.mappings.first() else {
            error!(metadata = %metadata, "No stub mappings found to update");
            return Err(AdminError::NotFound(format!(
                "no stub mapping matches metadata {metadata}"
            )));
        };
        if found.mappings.len() > 1 {
            warn!(
                metadata = %metadata,
                matches = found.mappings.len(),
                "Several stub mappings match the metadata, updating the first one"
            );
        }

        let id = first.id.as_deref().ok_or_else(|| {
            AdminError::NotFound(format!("stub mapping matching {metadata} has no id"))
        })?;
        self.update_mapping(id, mapping).await
    }

    /// Delete a stub mapping along with the body file it refers to.
    ///
    /// The file goes first. If that fails the mapping is left in place.
    pub async fn delete_mapping(&self, id: &str) -> Result<(), AdminError> {
        let mapping = self.get_mapping(id).await?;
        if let Some(file_name) = mapping.referred_body_file() {
            self.delete_file(file_name).await?;
            debug!(id, file = file_name, "Deleted body file, deleting mapping");
        }

        self.transport
            .send(AdminRequest::delete(paths::mapping(id)))
            .await?;
        Ok(())
    }

    /// Delete every file and mapping, then reset the request journal
    pub async fn delete_all_mappings(&self) -> Result<(), AdminError> {
        self.delete_all_files().await?;
        self.transport
            .send(AdminRequest::delete(paths::MAPPINGS))
            .await?;
        self.reset_request_journal().await
    }

    /// Find stub mappings whose metadata matches the given expression
    pub async fn find_by_metadata(
        &self,
        metadata: &Value,
    ) -> Result<ListStubMappingsResult, AdminError> {
        let request = AdminRequest::post(paths::MAPPINGS_FIND_BY_METADATA).with_json(metadata)?;
        self.transport.send(request).await?.decode()
    }

    /// Remove stub mappings whose metadata matches the given expression
    pub async fn remove_by_metadata(&self, metadata: &Value) -> Result<(), AdminError> {
        let request = AdminRequest::post(paths::MAPPINGS_REMOVE_BY_METADATA).with_json(metadata)?;
        self.transport.send(request).await?;
        Ok(())
    }

    // ========================================================================
    // Request journal
    // ========================================================================

    /// Every request the server has received
    pub async fn get_request_journal(&self) -> Result<Payload, AdminError> {
        journal::fetch_journal(self.transport.as_ref()).await
    }

    pub async fn reset_request_journal(&self) -> Result<(), AdminError> {
        journal::reset_journal(self.transport.as_ref()).await
    }

    /// Number of journaled requests matching `query`
    pub async fn get_request_count(&self, query: &RequestPattern) -> Result<u64, AdminError> {
        journal::count_requests(self.transport.as_ref(), query).await
    }

    /// Journaled requests matching `query`
    pub async fn find_requests(&self, query: &RequestPattern) -> Result<Payload, AdminError> {
        journal::find_requests(self.transport.as_ref(), query).await
    }

    // ========================================================================
    // File store
    // ========================================================================

    /// Store `content` under `name` in the server's file store
    pub async fn upload_file(
        &self,
        name: &str,
        content: impl Into<String>,
    ) -> Result<(), AdminError> {
        let request = AdminRequest::put(paths::file(name)).with_text(content);
        self.transport.send(request).await?;
        Ok(())
    }

    /// Names of all stored files
    pub async fn list_files(&self) -> Result<Vec<String>, AdminError> {
        self.transport
            .send(AdminRequest::get(paths::FILES))
            .await?
            .decode()
    }

    pub async fn delete_file(&self, name: &str) -> Result<(), AdminError> {
        self.transport
            .send(AdminRequest::delete(paths::file(name)))
            .await?;
        Ok(())
    }

    /// Delete every stored file.
    ///
    /// Deletes run concurrently; individual failures are logged, not returned.
    pub async fn delete_all_files(&self) -> Result<(), AdminError> {
        let files = self.list_files().await?;
        let results = join_all(files.iter().map(|name| self.delete_file(name))).await;

        for (name, result) in files.iter().zip(results) {
            if let Err(e) = result {
                warn!(file = %name, error = %e, "Failed to delete file");
            }
        }
        Ok(())
    }

    /// Content of a referenced body file: the literal path, then `files_root`.
    async fn read_body_file(&self, name: &str) -> Result<String, AdminError> {
        let literal = PathBuf::from(name);
        let literal_err = match tokio::fs::read_to_string(&literal).await {
            Ok(content) => return Ok(content),
            Err(e) => e,
        };

        let Some(root) = &self.files_root else {
            return Err(AdminError::Io {
                path: literal,
                source: literal_err,
            });
        };

        let path = root.join(name);
        debug!(
            file = name,
            fallback = %path.display(),
            "Body file not found as given, trying files root"
        );
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AdminError::Io { path, source })
    }
}
