// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Moving items into containers.
//!
//! A placement is validated and turned into a single bulk MOVE request
//! before anything is sent. The entry points ([`place_in_grid`],
//! [`place_in_list`] and [`place_in_image`]) submit exactly one request per
//! call through an [`InventoryApi`], and never submit when validation fails.
//!
//! # Grid placement
//!
//! [`GridPlacement::by_row`] and [`GridPlacement::by_column`] fill
//! consecutive cells from a starting cell, wrapping at the end of each row
//! or column. Occupied cells are not skipped: when the target already holds
//! items, choose a start that leaves a contiguous free run, or use
//! [`GridPlacement::by_location`] with cells from
//! [`GridContainer::free_locations`][crate::GridContainer::free_locations].
//!
//! ```rust
//! use rspace_client::{GridPlacement, Id};
//!
//! let items: Vec<Id> = (1..=4).map(|n| format!("SS{}", n).parse().unwrap()).collect();
//! // Start at column 2, row 1 of a 3 column x 7 row grid, filling down columns.
//! let placement = GridPlacement::by_column(2, 1, 3, 7, items).unwrap();
//! let cells: Vec<String> = placement
//!     .assignments()
//!     .unwrap()
//!     .iter()
//!     .map(|(_, cell)| cell.to_string())
//!     .collect();
//! assert_eq!(cells, ["(2, 1)", "(2, 2)", "(2, 3)", "(2, 4)"]);
//! ```

use crate::{
    BulkOperationResult, BulkRequest, Container, ContainerInfo, Error, FillingStrategy,
    GridDimensions, GridLocation, Id, ImageContainer, InventoryApi, MoveRecord, ParentLocation,
    geometry::{coordinate_at, start_index},
};
use log::{debug, warn};
use std::{collections::HashSet, fmt::Display};

#[derive(Clone, Debug, PartialEq)]
enum Layout {
    Fill {
        column: u32,
        row: u32,
        dims: GridDimensions,
        strategy: FillingStrategy,
    },
    Exact(Vec<GridLocation>),
}

/// Items to move into a grid container and the cells they should occupy.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPlacement {
    items: Vec<Id>,
    layout: Layout,
}

impl GridPlacement {
    /// Fills cells row by row starting at (`column`, `row`) of a grid with
    /// `total_columns x total_rows` cells.
    pub fn by_row(
        column: u32,
        row: u32,
        total_columns: u32,
        total_rows: u32,
        items: impl IntoIterator<Item = Id>,
    ) -> Result<Self, Error> {
        Self::fill(
            FillingStrategy::ByRow,
            column,
            row,
            total_columns,
            total_rows,
            items,
        )
    }

    /// Fills cells column by column starting at (`column`, `row`) of a grid
    /// with `total_columns x total_rows` cells.
    pub fn by_column(
        column: u32,
        row: u32,
        total_columns: u32,
        total_rows: u32,
        items: impl IntoIterator<Item = Id>,
    ) -> Result<Self, Error> {
        Self::fill(
            FillingStrategy::ByColumn,
            column,
            row,
            total_columns,
            total_rows,
            items,
        )
    }

    /// Fills cells in `strategy` order from a starting cell.
    pub fn fill(
        strategy: FillingStrategy,
        column: u32,
        row: u32,
        total_columns: u32,
        total_rows: u32,
        items: impl IntoIterator<Item = Id>,
    ) -> Result<Self, Error> {
        let dims = GridDimensions::new(total_columns, total_rows)?;
        start_index(column, row, dims, strategy)?;
        let items = movable_items(items)?;
        Ok(GridPlacement {
            items,
            layout: Layout::Fill {
                column,
                row,
                dims,
                strategy,
            },
        })
    }

    /// Places the `n`th item at the `n`th location. Each location may be
    /// used once.
    pub fn by_location(
        locations: Vec<GridLocation>,
        items: impl IntoIterator<Item = Id>,
    ) -> Result<Self, Error> {
        let items: Vec<Id> = items.into_iter().collect();
        if items.len() != locations.len() {
            return Err(Error::MismatchedLengths {
                items: items.len(),
                locations: locations.len(),
            });
        }
        let mut seen = HashSet::with_capacity(locations.len());
        if let Some(cell) = locations.iter().find(|cell| !seen.insert(**cell)) {
            return Err(Error::InvalidParameters(format!(
                "grid location {} is used more than once",
                cell
            )));
        }
        let items = movable_items(items)?;
        Ok(GridPlacement {
            items,
            layout: Layout::Exact(locations),
        })
    }

    pub fn items(&self) -> &[Id] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Filling order, `None` for exact placement.
    pub fn strategy(&self) -> Option<FillingStrategy> {
        match &self.layout {
            Layout::Fill { strategy, .. } => Some(*strategy),
            Layout::Exact(_) => None,
        }
    }

    /// Grid size stated for automatic filling, `None` for exact placement.
    pub fn dimensions(&self) -> Option<GridDimensions> {
        match &self.layout {
            Layout::Fill { dims, .. } => Some(*dims),
            Layout::Exact(_) => None,
        }
    }

    /// Pairs every item with its target cell, in item order.
    ///
    /// Fails with [`Error::OutOfRange`] when an automatic run would continue
    /// past the last cell of the grid.
    pub fn assignments(&self) -> Result<Vec<(Id, GridLocation)>, Error> {
        match &self.layout {
            Layout::Fill {
                column,
                row,
                dims,
                strategy,
            } => {
                let start = start_index(*column, *row, *dims, *strategy)?;
                let end = start + self.items.len() as u64;
                if end > dims.capacity() as u64 {
                    return Err(Error::OutOfRange(format!(
                        "{} items starting at ({}, {}) filling by {} overflow a grid of {}",
                        self.items.len(),
                        column,
                        row,
                        strategy,
                        dims
                    )));
                }
                Ok(self
                    .items
                    .iter()
                    .zip(start..end)
                    .map(|(item, index)| (*item, coordinate_at(index, *dims, *strategy)))
                    .collect())
            }
            Layout::Exact(locations) => Ok(self
                .items
                .iter()
                .copied()
                .zip(locations.iter().copied())
                .collect()),
        }
    }

    /// Builds the bulk MOVE request placing every item into `target`.
    pub fn to_request(&self, target: Id) -> Result<BulkRequest, Error> {
        let records = self
            .assignments()?
            .into_iter()
            .map(|(item, cell)| MoveRecord::new(item, target, Some(ParentLocation::Grid(cell))))
            .collect();
        Ok(BulkRequest::moves(records))
    }
}

impl Display for GridPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.layout {
            Layout::Fill {
                column,
                row,
                dims,
                strategy,
            } => {
                let name = match strategy {
                    FillingStrategy::ByRow => "ByRow",
                    FillingStrategy::ByColumn => "ByColumn",
                };
                write!(
                    f,
                    "{} start=({}, {}) total_columns={}, total_rows={}, Items {}",
                    name,
                    column,
                    row,
                    dims.columns(),
                    dims.rows(),
                    self.items.len()
                )
            }
            Layout::Exact(locations) => write!(
                f,
                "ByLocation locations={}, Items {}",
                locations.len(),
                self.items.len()
            ),
        }
    }
}

/// Container an operation places items into: a bare identifier, or a
/// container loaded from the server.
///
/// A loaded container enables local checks (type, accepted content and free
/// capacity) before anything is sent. A bare identifier is sent unchecked
/// and the server decides.
#[derive(Clone, Copy, Debug)]
pub enum PlacementTarget<'a> {
    Id(Id),
    Container(&'a Container),
}

impl PlacementTarget<'_> {
    pub fn id(&self) -> Id {
        match self {
            PlacementTarget::Id(id) => *id,
            PlacementTarget::Container(container) => container.id(),
        }
    }
}

impl From<Id> for PlacementTarget<'_> {
    fn from(id: Id) -> Self {
        PlacementTarget::Id(id)
    }
}

impl<'a> From<&'a Container> for PlacementTarget<'a> {
    fn from(container: &'a Container) -> Self {
        PlacementTarget::Container(container)
    }
}

/// Moves the items of `placement` into a grid container with one bulk
/// request.
///
/// When `target` is a loaded [`Container`] it must be a grid that accepts
/// the items and has at least as many free cells as there are items,
/// otherwise [`Error::WrongRole`] or [`Error::InsufficientCapacity`] is
/// returned and nothing is submitted.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(items = placement.len())))]
pub async fn place_in_grid<'a, A>(
    api: &A,
    target: impl Into<PlacementTarget<'a>>,
    placement: &GridPlacement,
) -> Result<BulkOperationResult, Error>
where
    A: InventoryApi + ?Sized,
{
    let target = target.into();
    let target_id = target.id();
    if !target_id.is_container(true) {
        return Err(Error::WrongRole(format!(
            "target {} is not a container",
            target_id
        )));
    }

    if let PlacementTarget::Container(container) = target {
        let grid = container.as_grid().ok_or_else(|| {
            Error::WrongRole(format!(
                "target {} is a {} container, not a grid",
                target_id,
                container.kind()
            ))
        })?;
        check_accepts(grid.info(), placement.items())?;
        if placement.len() > grid.free() {
            return Err(Error::InsufficientCapacity {
                requested: placement.len(),
                free: grid.free(),
            });
        }
        for (_, cell) in placement.assignments()? {
            if !grid.dimensions().contains(&cell) {
                return Err(Error::OutOfRange(format!(
                    "{} is outside {} with {}",
                    cell,
                    target_id,
                    grid.dimensions()
                )));
            }
            if !grid.is_free(&cell) {
                warn!("{} of {} is already occupied", cell, target_id);
            }
        }
    }

    let request = placement.to_request(target_id)?;
    debug!("Placing {} into {}", placement, target_id);
    api.submit_bulk(&request).await
}

/// Moves `items` into a list container or workbench with one bulk request.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(items = items.len())))]
pub async fn place_in_list<'a, A>(
    api: &A,
    target: impl Into<PlacementTarget<'a>>,
    items: &[Id],
) -> Result<BulkOperationResult, Error>
where
    A: InventoryApi + ?Sized,
{
    let target = target.into();
    let target_id = target.id();
    if !(target_id.is_container(true) || target_id.is_bench(true)) {
        return Err(Error::WrongRole(format!(
            "target {} is not a container or workbench",
            target_id
        )));
    }
    let items = movable_items(items.iter().copied())?;

    if let PlacementTarget::Container(container) = target {
        if !container.is_list() {
            return Err(Error::WrongRole(format!(
                "target {} is a {} container, not a list",
                target_id,
                container.kind()
            )));
        }
        check_accepts(container.info(), &items)?;
    }

    let records = items
        .iter()
        .map(|item| MoveRecord::new(*item, target_id, None))
        .collect();
    debug!("Placing {} items into {}", items.len(), target_id);
    api.submit_bulk(&BulkRequest::moves(records)).await
}

/// Moves items onto predefined locations of an image container with one
/// bulk request. Each placement pairs an item with an image location id.
///
/// Every location must exist in `container` and be empty, and each may be
/// used once.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(items = placements.len())))]
pub async fn place_in_image<A>(
    api: &A,
    container: &ImageContainer,
    placements: &[(Id, u64)],
) -> Result<BulkOperationResult, Error>
where
    A: InventoryApi + ?Sized,
{
    let target_id = container.info().id();
    let items = movable_items(placements.iter().map(|(item, _)| *item))?;
    check_accepts(container.info(), &items)?;
    if placements.len() > container.free() {
        return Err(Error::InsufficientCapacity {
            requested: placements.len(),
            free: container.free(),
        });
    }

    let mut seen = HashSet::with_capacity(placements.len());
    let mut records = Vec::with_capacity(placements.len());
    for (item, location_id) in placements {
        let location = container.location(*location_id).ok_or_else(|| {
            Error::OutOfRange(format!(
                "image container {} has no location {}",
                target_id, location_id
            ))
        })?;
        if let Some(content) = location.content() {
            return Err(Error::InvalidParameters(format!(
                "location {} of {} is occupied by {}",
                location_id, target_id, content
            )));
        }
        if !seen.insert(*location_id) {
            return Err(Error::InvalidParameters(format!(
                "location {} of {} is used more than once",
                location_id, target_id
            )));
        }
        records.push(MoveRecord::new(
            *item,
            target_id,
            Some(ParentLocation::Image { id: *location_id }),
        ));
    }

    debug!("Placing {} items into image container {}", records.len(), target_id);
    api.submit_bulk(&BulkRequest::moves(records)).await
}

fn movable_items(items: impl IntoIterator<Item = Id>) -> Result<Vec<Id>, Error> {
    let items: Vec<Id> = items.into_iter().collect();
    if items.is_empty() {
        return Err(Error::InvalidParameters("no items to move".to_string()));
    }
    if let Some(item) = items.iter().find(|item| !item.is_movable(true)) {
        return Err(Error::WrongRole(format!(
            "{} is not a subsample or container and cannot be moved",
            item
        )));
    }
    Ok(items)
}

fn check_accepts(info: &ContainerInfo, items: &[Id]) -> Result<(), Error> {
    if !info.accepts_subsamples()
        && let Some(item) = items.iter().find(|item| item.is_subsample(false))
    {
        return Err(Error::WrongRole(format!(
            "{} does not accept subsamples such as {}",
            info.id(),
            item
        )));
    }
    if !info.accepts_containers()
        && let Some(item) = items.iter().find(|item| item.is_container(false))
    {
        return Err(Error::WrongRole(format!(
            "{} does not accept containers such as {}",
            info.id(),
            item
        )));
    }
    Ok(())
}
