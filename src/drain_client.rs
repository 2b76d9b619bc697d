use reqwest::{StatusCode, Url};
use tracing::{debug, info, instrument, warn};

use crate::collection::{parse_identifiers, Collection, ID_ONLY_FILTER};
use crate::config::Config;
use crate::drain_error::DrainError;

/// Outcome of draining one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    pub collection: Collection,
    /// Listing calls that returned at least one record
    pub passes: u64,
    /// Delete requests issued, whatever their status
    pub deleted: u64,
    /// Delete responses with a non-success status
    pub failed_deletes: u64,
}

impl DrainReport {
    fn new(collection: Collection) -> Self {
        Self {
            collection,
            passes: 0,
            deleted: 0,
            failed_deletes: 0,
        }
    }
}

/// Sequential list-then-delete client for one service.
///
/// Every request is awaited to completion before the next is sent, and the
/// pool keeps a single idle connection, so a run reuses one connection.
pub struct DrainClient {
    client: reqwest::Client,
    base_url: Url,
    max_passes: Option<u64>,
}

impl DrainClient {
    pub fn new(config: &Config) -> Result<Self, DrainError> {
        let mut drain_client = Self::with_base_url(config.base_url())?;
        drain_client.max_passes = config.max_passes;
        Ok(drain_client)
    }

    /// Build a client for an explicit base URL such as `http://127.0.0.1:4000`
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self, DrainError> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(|e| DrainError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(DrainError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(1)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_passes: None,
        })
    }

    pub fn with_max_passes(mut self, max_passes: u64) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `{base}/api/{collection}`, plus `/{id}` as one percent-encoded segment.
    ///
    /// `.` and `..` are rejected: URL parsing always resolves dot segments, so
    /// they would address a different resource.
    fn route(&self, collection: Collection, id: Option<&str>) -> Result<Url, DrainError> {
        if let Some(id @ ("." | "..")) = id {
            return Err(DrainError::UnaddressableId {
                collection,
                id: id.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DrainError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("api").push(collection.as_str());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn list_identifiers(
        &self,
        collection: Collection,
    ) -> Result<Vec<String>, DrainError> {
        let url = self.route(collection, None)?;

        debug!("Listing {}", collection);
        let response = self
            .client
            .get(url)
            .query(&[("filter", ID_ONLY_FILTER)])
            .send()
            .await?;
        debug!("Received listing response with status: {}", response.status());

        let body = response.text().await?;
        let ids = parse_identifiers(&body)
            .map_err(|source| DrainError::Decode { collection, source })?;
        debug!("Listed {} {}", ids.len(), collection);

        Ok(ids)
    }

    /// Delete one record. The status is returned for reporting only; callers
    /// treat every response as success.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn delete_one(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<StatusCode, DrainError> {
        let url = self.route(collection, Some(id))?;

        let response = self.client.delete(url).send().await?;
        let status = response.status();
        let _ = response.bytes().await?;

        if status.is_success() {
            debug!("Deleted {} {} ({})", collection, id, status);
        } else {
            warn!("Delete of {} {} returned {}, continuing", collection, id, status);
        }

        Ok(status)
    }

    /// List and delete until a listing comes back empty.
    ///
    /// Without a pass limit this never returns while the service keeps
    /// reporting records (concurrent inserts, deletes that silently fail).
    #[instrument(skip(self), fields(base_url = %self.base_url, max_passes = ?self.max_passes))]
    pub async fn drain(&self, collection: Collection) -> Result<DrainReport, DrainError> {
        let mut report = DrainReport::new(collection);
        let mut ids = self.list_identifiers(collection).await?;

        while !ids.is_empty() {
            if let Some(max_passes) = self.max_passes {
                if report.passes >= max_passes {
                    return Err(DrainError::PassLimitExceeded {
                        collection,
                        passes: report.passes,
                    });
                }
            }

            report.passes += 1;
            info!("Pass {}: deleting {} {}", report.passes, ids.len(), collection);

            for id in &ids {
                let status = self.delete_one(collection, id).await?;
                report.deleted += 1;
                if !status.is_success() {
                    report.failed_deletes += 1;
                }
            }

            ids = self.list_identifiers(collection).await?;
        }

        info!(
            "Drained {}: {} deletes over {} passes ({} non-success responses)",
            collection, report.deleted, report.passes, report.failed_deletes
        );
        Ok(report)
    }

    /// Drain users fully, then tasks fully.
    pub async fn drain_all(&self) -> Result<Vec<DrainReport>, DrainError> {
        let mut reports = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            reports.push(self.drain(collection).await?);
        }
        Ok(reports)
    }

    /// Release the connection pool.
    pub fn close(self) {
        debug!("Closing connection to {}", self.base_url);
        drop(self.client);
    }
}
