// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{GridLocation, Id, Role, api::ApiErrorBody};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Bulk operation kind accepted by `POST /api/inventory/v1/bulk`.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum BulkOperationType {
    /// Move records into a parent container.
    Move,
}

impl Display for BulkOperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BulkOperationType::Move => write!(f, "MOVE"),
        }
    }
}

/// Reference to a parent container by numeric id.
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContainerRef {
    pub id: u64,
}

/// Where inside the parent container a moved record lands.
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ParentLocation {
    /// A grid cell, sent as `{"coordX": .., "coordY": ..}`.
    Grid(GridLocation),
    /// A predefined location of an image container, sent as `{"id": ..}`.
    Image { id: u64 },
}

/// One record of a bulk MOVE request.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    #[serde(rename = "type")]
    pub record_type: Role,
    pub id: u64,
    pub parent_containers: Vec<ContainerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_location: Option<ParentLocation>,
}

impl MoveRecord {
    /// Builds a record moving `item` into `target`.
    ///
    /// Items without a prefix carry no role and are tagged `SUBSAMPLE`.
    pub fn new(item: Id, target: Id, location: Option<ParentLocation>) -> Self {
        MoveRecord {
            record_type: item.role().unwrap_or(Role::Subsample),
            id: item.value(),
            parent_containers: vec![ContainerRef { id: target.value() }],
            parent_location: location,
        }
    }
}

/// Body of a bulk request: one operation applied to many records.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    operation_type: BulkOperationType,
    records: Vec<MoveRecord>,
}

impl BulkRequest {
    pub fn moves(records: Vec<MoveRecord>) -> Self {
        BulkRequest {
            operation_type: BulkOperationType::Move,
            records,
        }
    }

    pub fn operation_type(&self) -> BulkOperationType {
        self.operation_type
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Summary of a record returned for a successful bulk item.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: u64,
    #[serde(default)]
    pub global_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub record_type: Option<String>,
}

/// Outcome of a single record inside a bulk operation.
///
/// Exactly one of `record` or `error` is expected to be present.
#[derive(Deserialize, Clone, Debug)]
pub struct BulkItemResult {
    #[serde(default)]
    pub record: Option<RecordSummary>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl BulkItemResult {
    pub fn is_success(&self) -> bool {
        self.record.is_some()
    }
}

/// Read-only view over the response to one bulk request.
///
/// A response with a non-`COMPLETED` status (for example
/// `REVERTED_ON_ERROR`) is not an error; callers inspect
/// [`error_results`][Self::error_results] to see which items failed.
///
/// # Examples
///
/// ```rust
/// use rspace_client::BulkOperationResult;
///
/// let result: BulkOperationResult = serde_json::from_str(
///     r#"{"status": "COMPLETED", "results": [{"record": {"id": 7, "globalId": "SS7"}}]}"#,
/// )
/// .unwrap();
/// assert!(result.is_ok());
/// assert_eq!(result.success_results().count(), 1);
/// assert_eq!(result.error_results().count(), 0);
/// ```
#[derive(Deserialize, Clone, Debug)]
pub struct BulkOperationResult {
    status: String,
    #[serde(default)]
    results: Vec<BulkItemResult>,
}

impl BulkOperationResult {
    pub fn status(&self) -> &str {
        &self.status
    }

    /// True when the server reports the whole operation as `COMPLETED`.
    pub fn is_ok(&self) -> bool {
        self.status == "COMPLETED"
    }

    pub fn results(&self) -> &[BulkItemResult] {
        &self.results
    }

    /// Records that were placed.
    pub fn success_results(&self) -> impl Iterator<Item = &RecordSummary> {
        self.results.iter().filter_map(|r| r.record.as_ref())
    }

    /// Per-item failures reported by the server.
    pub fn error_results(&self) -> impl Iterator<Item = &ApiErrorBody> {
        self.results.iter().filter_map(|r| r.error.as_ref())
    }
}

impl Display for BulkOperationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {} succeeded, {} failed",
            self.status,
            self.success_results().count(),
            self.error_results().count()
        )
    }
}
