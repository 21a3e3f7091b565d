// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # RSpace Inventory Client Library
//!
//! A Rust client for the inventory side of RSpace, an electronic lab
//! notebook and sample management server. Its core is the grid placement
//! engine: given subsamples or sub-containers and a filling strategy it
//! computes the exact cell every item will occupy in a storage grid and
//! moves them all with one bulk request.
//!
//! ## Features
//!
//! - **Identifiers**: parse numeric ids and global ids (`SS12`, `IC7`) and
//!   check their role locally
//! - **Grid placement**: fill by row, by column, or at explicit cells, with
//!   validation before anything is sent
//! - **Capacity**: grid, list, image and workbench containers with free and
//!   used locations
//! - **Bulk results**: per-item successes and failures of a bulk move
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rspace_client::{Client, Error, GridPlacement, Id};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     // Reads RSPACE_URL and RSPACE_API_KEY.
//!     let client = Client::from_env()?;
//!
//!     let rack = client.container("IC131085".parse()?).await?;
//!     let items: Vec<Id> = ["SS1001", "SS1002", "SS1003"]
//!         .iter()
//!         .map(|s| s.parse())
//!         .collect::<Result<_, _>>()?;
//!
//!     let placement = GridPlacement::by_row(1, 1, 3, 7, items)?;
//!     let result = client.add_items_to_grid_container(&rack, &placement).await?;
//!     println!("{}", result);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `profiling`: emits `tracing` spans for client requests and placements

mod api;
mod bulk;
mod client;
mod config;
mod container;
mod error;
mod geometry;
mod id;
pub mod placement;
mod retry;

pub use crate::{
    api::{ApiErrorBody, InventoryApi, NewContainer, ServerStatus},
    bulk::{
        BulkItemResult, BulkOperationResult, BulkOperationType, BulkRequest, ContainerRef,
        MoveRecord, ParentLocation, RecordSummary,
    },
    client::Client,
    config::ClientConfig,
    container::{
        Container, ContainerInfo, ContainerType, GridContainer, ImageContainer, ImageLocation,
        ListContainer,
    },
    error::Error,
    geometry::{FillingStrategy, GridDimensions, GridLocation, coordinate_at, start_index},
    id::{GlobalIdPrefix, Id, IdSource, Role},
    placement::{GridPlacement, PlacementTarget},
    retry::{RetryScope, classify_url},
};
