// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    BulkOperationResult, BulkRequest, ClientConfig, Container, Error, GridPlacement, Id,
    ImageContainer, InventoryApi, NewContainer,
    api::{ApiErrorBody, ServerStatus},
    placement::{PlacementTarget, place_in_grid, place_in_image, place_in_list},
    retry::{create_retry_policy, log_retry_configuration},
};
use async_trait::async_trait;
use log::{Level, debug, error, log_enabled, trace};
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Client for the RSpace Inventory REST API.
///
/// Every request carries the API key in the `apiKey` header. The client is
/// cheap to clone and safe to share between tasks; clones share one
/// connection pool.
///
/// # Examples
///
/// ```no_run
/// use rspace_client::{Client, GridPlacement, Id};
///
/// # async fn example() -> Result<(), rspace_client::Error> {
/// let client = Client::new("https://rspace.example.org", "my-api-key")?;
///
/// let rack = client.container("IC131085".parse()?).await?;
/// println!("{}", rack);
///
/// let items: Vec<Id> = vec!["SS1001".parse()?, "SS1002".parse()?];
/// let placement = GridPlacement::by_column(2, 1, 3, 7, items)?;
/// let result = client.add_items_to_grid_container(&rack, &placement).await?;
/// for error in result.error_results() {
///     println!("failed: {}", error);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Client {
    /// Creates a client for the server at `url` with default timeout and
    /// retry settings.
    pub fn new(url: &str, api_key: &str) -> Result<Self, Error> {
        Self::from_config(&ClientConfig::new(url, api_key))
    }

    /// Creates a client from the configuration file and `RSPACE_*`
    /// environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_config(&ClientConfig::load()?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        url::Url::parse(&config.url)?;
        if config.api_key.is_empty() {
            return Err(Error::InvalidParameters("API key must not be empty".to_string()));
        }
        log_retry_configuration(&config.url, config.max_retries, config.timeout);

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout_duration())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .retry(create_retry_policy(&config.url, config.max_retries))
            .build()?;

        Ok(Client {
            http,
            url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        })
    }

    /// Returns the server base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Server status and version.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub async fn status(&self) -> Result<ServerStatus, Error> {
        self.request(Method::GET, &format!("{}/api/v1/status", self.url), None::<&()>)
            .await
    }

    /// Loads a container, or a workbench for `BE` ids.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub async fn container(&self, id: Id) -> Result<Container, Error> {
        let path = if id.is_bench(false) {
            format!("workbenches/{}", id.value())
        } else if id.is_container(true) {
            format!("containers/{}", id.value())
        } else {
            return Err(Error::WrongRole(format!("{} is not a container", id)));
        };
        let value: serde_json::Value = self
            .request(Method::GET, &self.inventory_url(&path), None::<&()>)
            .await?;
        Container::from_json(&value)
    }

    /// Workbenches visible to the current user.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub async fn workbenches(&self) -> Result<Vec<Container>, Error> {
        let value: serde_json::Value = self
            .request(Method::GET, &self.inventory_url("workbenches"), None::<&()>)
            .await?;
        let benches = match &value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(map) => match map.get("workbenches") {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(Error::InvalidResponse(
                        "workbench listing has no 'workbenches' array".to_string(),
                    ));
                }
            },
            _ => {
                return Err(Error::InvalidResponse(
                    "workbench listing is not a JSON array".to_string(),
                ));
            }
        };
        benches.iter().map(Container::from_json).collect()
    }

    /// Creates a list or grid container at the top level of the user's
    /// workbench.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub async fn create_container(&self, params: &NewContainer) -> Result<Container, Error> {
        params.validate()?;
        let value: serde_json::Value = self
            .request(Method::POST, &self.inventory_url("containers"), Some(params))
            .await?;
        Container::from_json(&value)
    }

    /// Deletes a container.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub async fn delete_container(&self, id: Id) -> Result<(), Error> {
        if !id.is_container(true) {
            return Err(Error::WrongRole(format!("{} is not a container", id)));
        }
        let url = self.inventory_url(&format!("containers/{}", id.value()));
        let _: serde_json::Value = self.request(Method::DELETE, &url, None::<&()>).await?;
        Ok(())
    }

    /// Sends a bulk request.
    ///
    /// Errors are returned as they occurred; the [`InventoryApi`]
    /// implementation wraps them in [`Error::BulkSubmissionFailed`].
    #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(records = request.len())))]
    pub async fn bulk(&self, request: &BulkRequest) -> Result<BulkOperationResult, Error> {
        self.request(Method::POST, &self.inventory_url("bulk"), Some(request))
            .await
    }

    /// Moves items into a grid container, see
    /// [`place_in_grid`][crate::placement::place_in_grid].
    pub async fn add_items_to_grid_container<'a>(
        &self,
        target: impl Into<PlacementTarget<'a>>,
        placement: &GridPlacement,
    ) -> Result<BulkOperationResult, Error> {
        place_in_grid(self, target, placement).await
    }

    /// Moves items into a list container or workbench, see
    /// [`place_in_list`][crate::placement::place_in_list].
    pub async fn add_items_to_list_container<'a>(
        &self,
        target: impl Into<PlacementTarget<'a>>,
        items: &[Id],
    ) -> Result<BulkOperationResult, Error> {
        place_in_list(self, target, items).await
    }

    /// Moves items onto image container locations, see
    /// [`place_in_image`][crate::placement::place_in_image].
    pub async fn add_items_to_image_container(
        &self,
        container: &ImageContainer,
        placements: &[(Id, u64)],
    ) -> Result<BulkOperationResult, Error> {
        place_in_image(self, container, placements).await
    }

    fn inventory_url(&self, path: &str) -> String {
        format!("{}/api/inventory/v1/{}", self.url, path)
    }

    async fn request<Params, T>(
        &self,
        method: Method,
        url: &str,
        params: Option<&Params>,
    ) -> Result<T, Error>
    where
        Params: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url);
        let mut req = self
            .http
            .request(method, url)
            .header("Accept", "application/json")
            .header("User-Agent", "RSpace Client")
            .header("apiKey", &self.api_key);

        if let Some(params) = params {
            if log_enabled!(Level::Trace) {
                trace!("Request: {}", serde_json::to_string_pretty(params)?);
            }
            req = req.json(params);
        }

        let res = req.send().await?;
        Self::process_response(res).await
    }

    async fn process_response<T>(res: reqwest::Response) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let status = res.status();
        let body = res.bytes().await?;

        if log_enabled!(Level::Trace) {
            trace!("Response {}: {}", status, String::from_utf8_lossy(&body));
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiErrorBody>(&body) {
                Ok(error) => error.to_string(),
                Err(_) => format!("error message: {}", String::from_utf8_lossy(&body)),
            };
            return Err(Error::ApiError(status.as_u16(), message));
        }

        // Deletes answer with an empty body.
        let body = if body.is_empty() { &b"null"[..] } else { &body[..] };
        match serde_json::from_slice(body) {
            Ok(value) => Ok(value),
            Err(err) => {
                error!("Invalid JSON Response: {}", String::from_utf8_lossy(body));
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl InventoryApi for Client {
    async fn submit_bulk(&self, request: &BulkRequest) -> Result<BulkOperationResult, Error> {
        self.bulk(request)
            .await
            .map_err(|err| Error::BulkSubmissionFailed(Box::new(err)))
    }

    async fn fetch_container(&self, id: Id) -> Result<Container, Error> {
        self.container(id).await
    }
}
