// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{BulkOperationResult, BulkRequest, Container, ContainerType, Error, Id};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Remote capabilities the placement engine depends on.
///
/// [`Client`][crate::Client] implements this against the inventory REST API.
/// Tests and offline tools can provide their own implementation; the
/// placement functions in [`placement`][crate::placement] only ever talk to
/// the server through this trait.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Submits one bulk request and returns the server's per-record outcome.
    ///
    /// Transport failures and non-success HTTP statuses are reported as
    /// [`Error::BulkSubmissionFailed`].
    async fn submit_bulk(&self, request: &BulkRequest) -> Result<BulkOperationResult, Error>;

    /// Loads the current state of a container or workbench, so callers can
    /// pass it as a [`PlacementTarget::Container`][crate::PlacementTarget]
    /// and have capacity and accept flags checked before submission.
    async fn fetch_container(&self, id: Id) -> Result<Container, Error>;
}

/// Error body returned by the server for failed requests and failed bulk
/// items.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let errors = if self.errors.is_empty() {
            "no error list".to_string()
        } else {
            self.errors.join(", ")
        };
        write!(f, "error message: {}, errors: {}", self.message, errors)
    }
}

/// Response of `GET /api/v1/status`.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rspace_version: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct GridLayoutParams {
    columns_number: u32,
    rows_number: u32,
}

/// Parameters for creating a list or grid container.
///
/// # Examples
///
/// ```rust
/// use rspace_client::NewContainer;
///
/// let rack = NewContainer::grid("rack 4", 3, 7)
///     .with_description("-80 freezer, shelf 2")
///     .with_can_store_containers(false);
/// let body = serde_json::to_value(&rack).unwrap();
/// assert_eq!(body["cType"], "GRID");
/// assert_eq!(body["gridLayout"]["rowsNumber"], 7);
/// ```
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewContainer {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<String>,
    c_type: ContainerType,
    can_store_containers: bool,
    can_store_subsamples: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid_layout: Option<GridLayoutParams>,
}

impl NewContainer {
    /// A list container accepting both containers and subsamples.
    pub fn list(name: &str) -> Self {
        NewContainer {
            name: name.to_owned(),
            description: None,
            tags: None,
            c_type: ContainerType::List,
            can_store_containers: true,
            can_store_subsamples: true,
            grid_layout: None,
        }
    }

    /// A grid container of `columns x rows` cells.
    pub fn grid(name: &str, columns: u32, rows: u32) -> Self {
        NewContainer {
            c_type: ContainerType::Grid,
            grid_layout: Some(GridLayoutParams {
                columns_number: columns,
                rows_number: rows,
            }),
            ..NewContainer::list(name)
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Comma separated tags.
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = Some(tags.to_owned());
        self
    }

    pub fn with_can_store_containers(mut self, can_store: bool) -> Self {
        self.can_store_containers = can_store;
        self
    }

    pub fn with_can_store_subsamples(mut self, can_store: bool) -> Self {
        self.can_store_subsamples = can_store;
        self
    }

    pub fn container_type(&self) -> ContainerType {
        self.c_type
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidParameters(
                "container name must not be empty".to_string(),
            ));
        }
        if let Some(layout) = &self.grid_layout
            && (layout.columns_number < 1 || layout.rows_number < 1)
        {
            return Err(Error::OutOfRange(format!(
                "grid dimensions must be at least 1x1, got {} columns x {} rows",
                layout.columns_number, layout.rows_number
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_format() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "status": "NOT_FOUND",
            "httpCode": 404,
            "message": "Container not found",
            "errors": ["id 9 does not exist", "check permissions"]
        }))
        .unwrap();
        assert_eq!(
            body.to_string(),
            "error message: Container not found, errors: id 9 does not exist, check permissions"
        );
        assert_eq!(
            ApiErrorBody::default().to_string(),
            "error message: , errors: no error list"
        );
    }

    #[test]
    fn test_new_list_container_body() {
        let body = serde_json::to_value(NewContainer::list("shelf").with_tags("cold,room")).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "shelf",
                "tags": "cold,room",
                "cType": "LIST",
                "canStoreContainers": true,
                "canStoreSubsamples": true
            })
        );
    }

    #[test]
    fn test_new_grid_container_body() {
        let rack = NewContainer::grid("rack", 3, 7).with_can_store_subsamples(false);
        assert_eq!(rack.container_type(), ContainerType::Grid);
        let body = serde_json::to_value(&rack).unwrap();
        assert_eq!(body["gridLayout"], json!({"columnsNumber": 3, "rowsNumber": 7}));
        assert_eq!(body["canStoreSubsamples"], json!(false));
        assert!(rack.validate().is_ok());
    }

    #[test]
    fn test_new_container_validation() {
        assert!(matches!(
            NewContainer::grid("rack", 0, 7).validate(),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            NewContainer::list("  ").validate(),
            Err(Error::InvalidParameters(_))
        ));
    }
}
