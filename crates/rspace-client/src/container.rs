// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Storage containers and their capacity.
//!
//! A [`Container`] is built from the JSON the server returns for
//! `GET /containers/{id}` (or `/workbenches/{id}`). The `cType` field selects
//! the variant. Grid payloads are validated when they are read so that every
//! occupied cell lies inside the grid exactly once, which keeps
//! [`GridContainer::used_locations`] and [`GridContainer::free_locations`] a
//! partition of the grid.

use crate::{Error, GridDimensions, GridLocation, Id};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Display};

/// Container layout as named by the server's `cType` field.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerType {
    Grid,
    List,
    Image,
    Workbench,
}

impl Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ContainerType::Grid => "GRID",
            ContainerType::List => "LIST",
            ContainerType::Image => "IMAGE",
            ContainerType::Workbench => "WORKBENCH",
        };
        write!(f, "{}", name)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ContainerDescriptor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    c_type: Option<String>,
    #[serde(default)]
    can_store_containers: bool,
    #[serde(default, alias = "canStoreSubsamples")]
    can_store_samples: bool,
    #[serde(default)]
    grid_layout: Option<GridLayout>,
    #[serde(default)]
    locations: Vec<LocationDescriptor>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GridLayout {
    columns_number: u32,
    rows_number: u32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LocationDescriptor {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    coord_x: Option<u32>,
    #[serde(default)]
    coord_y: Option<u32>,
    #[serde(default)]
    content: Option<serde_json::Value>,
}

/// Fields shared by every container variant.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerInfo {
    id: Id,
    name: String,
    accepts_containers: bool,
    accepts_subsamples: bool,
}

impl ContainerInfo {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accepts_containers(&self) -> bool {
        self.accepts_containers
    }

    pub fn accepts_subsamples(&self) -> bool {
        self.accepts_subsamples
    }
}

/// A grid of `columns x rows` cells addressed by 1-based (column, row).
#[derive(Clone, Debug, PartialEq)]
pub struct GridContainer {
    info: ContainerInfo,
    dims: GridDimensions,
    used: Vec<GridLocation>,
}

impl GridContainer {
    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    pub fn column_count(&self) -> u32 {
        self.dims.columns()
    }

    pub fn row_count(&self) -> u32 {
        self.dims.rows()
    }

    pub fn capacity(&self) -> usize {
        self.dims.capacity()
    }

    pub fn in_use(&self) -> usize {
        self.used.len()
    }

    pub fn free(&self) -> usize {
        self.capacity() - self.in_use()
    }

    pub fn percent_full(&self) -> f64 {
        self.in_use() as f64 / self.capacity() as f64 * 100.0
    }

    /// Occupied cells, in the order the server listed them.
    pub fn used_locations(&self) -> &[GridLocation] {
        &self.used
    }

    /// Empty cells, column by column.
    pub fn free_locations(&self) -> Vec<GridLocation> {
        let used: HashSet<_> = self.used.iter().collect();
        self.dims
            .locations()
            .filter(|cell| !used.contains(cell))
            .collect()
    }

    pub fn is_free(&self, location: &GridLocation) -> bool {
        self.dims.contains(location) && !self.used.contains(location)
    }
}

impl Display for GridContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "GridContainer id='{}', storesContainers={}, storesSubsamples={}, percent_full={:.2}",
            self.info.id,
            self.info.accepts_containers,
            self.info.accepts_subsamples,
            self.percent_full()
        )
    }
}

/// An unordered container with no coordinates and no fixed capacity.
/// Workbenches share this shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ListContainer {
    info: ContainerInfo,
}

impl ListContainer {
    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }
}

/// A predefined spot on an image container.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageLocation {
    id: u64,
    x: u32,
    y: u32,
    content: Option<Id>,
}

impl ImageLocation {
    /// Location id used as `parentLocation` when moving items here.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Pixel coordinates on the container image.
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn content(&self) -> Option<Id> {
        self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

/// A container whose locations are marked on a picture.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageContainer {
    info: ContainerInfo,
    locations: Vec<ImageLocation>,
}

impl ImageContainer {
    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }

    pub fn locations(&self) -> &[ImageLocation] {
        &self.locations
    }

    pub fn location(&self, id: u64) -> Option<&ImageLocation> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn capacity(&self) -> usize {
        self.locations.len()
    }

    pub fn in_use(&self) -> usize {
        self.locations.iter().filter(|l| !l.is_empty()).count()
    }

    pub fn free(&self) -> usize {
        self.capacity() - self.in_use()
    }

    pub fn free_locations(&self) -> impl Iterator<Item = &ImageLocation> {
        self.locations.iter().filter(|l| l.is_empty())
    }
}

/// A storage container loaded from the server.
///
/// # Examples
///
/// ```rust
/// use rspace_client::Container;
/// use serde_json::json;
///
/// let container = Container::from_json(&json!({
///     "id": 5, "globalId": "IC5", "name": "rack", "cType": "GRID",
///     "canStoreContainers": false, "canStoreSamples": true,
///     "gridLayout": {"columnsNumber": 4, "rowsNumber": 2},
///     "locations": [{"coordX": 1, "coordY": 1}]
/// }))
/// .unwrap();
/// assert_eq!(container.capacity(), Some(8));
/// assert_eq!(container.free(), Some(7));
/// assert!(!container.accepts_containers());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Container {
    Grid(GridContainer),
    List(ListContainer),
    Image(ImageContainer),
    Workbench(ListContainer),
}

impl Container {
    /// Builds the variant selected by the payload's `cType`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        let id = Id::try_from(value).map_err(|err| {
            Error::InvalidResponse(format!("container has no usable id: {}", err))
        })?;
        let descriptor: ContainerDescriptor = serde_json::from_value(value.clone())?;
        let c_type = descriptor.c_type.as_deref().ok_or_else(|| {
            Error::InvalidResponse(format!(
                "{} has no 'cType' container type entry, is this really a container?",
                id
            ))
        })?;
        let kind: ContainerType = serde_json::from_value(serde_json::Value::from(c_type))
            .map_err(|_| {
                Error::InvalidResponse(format!("unsupported container type {}", c_type))
            })?;

        let info = ContainerInfo {
            id,
            name: descriptor.name,
            accepts_containers: descriptor.can_store_containers,
            accepts_subsamples: descriptor.can_store_samples,
        };

        match kind {
            ContainerType::Grid => {
                let layout = descriptor.grid_layout.ok_or_else(|| {
                    Error::InvalidResponse(format!("grid container {} has no gridLayout", id))
                })?;
                let dims = GridDimensions::new(layout.columns_number, layout.rows_number)
                    .map_err(|err| Error::InvalidResponse(err.to_string()))?;
                let used = grid_locations(id, dims, descriptor.locations)?;
                Ok(Container::Grid(GridContainer { info, dims, used }))
            }
            ContainerType::List => Ok(Container::List(ListContainer { info })),
            ContainerType::Workbench => Ok(Container::Workbench(ListContainer { info })),
            ContainerType::Image => {
                let locations = descriptor
                    .locations
                    .into_iter()
                    .map(|location| image_location(id, location))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Container::Image(ImageContainer { info, locations }))
            }
        }
    }

    pub fn kind(&self) -> ContainerType {
        match self {
            Container::Grid(_) => ContainerType::Grid,
            Container::List(_) => ContainerType::List,
            Container::Image(_) => ContainerType::Image,
            Container::Workbench(_) => ContainerType::Workbench,
        }
    }

    pub fn info(&self) -> &ContainerInfo {
        match self {
            Container::Grid(c) => &c.info,
            Container::List(c) | Container::Workbench(c) => &c.info,
            Container::Image(c) => &c.info,
        }
    }

    pub fn id(&self) -> Id {
        self.info().id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn accepts_containers(&self) -> bool {
        self.info().accepts_containers
    }

    pub fn accepts_subsamples(&self) -> bool {
        self.info().accepts_subsamples
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, Container::Grid(_))
    }

    /// True for list containers and workbenches.
    pub fn is_list(&self) -> bool {
        matches!(self, Container::List(_) | Container::Workbench(_))
    }

    pub fn as_grid(&self) -> Option<&GridContainer> {
        match self {
            Container::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContainer> {
        match self {
            Container::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Number of places in the container, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Container::Grid(c) => Some(c.capacity()),
            Container::Image(c) => Some(c.capacity()),
            Container::List(_) | Container::Workbench(_) => None,
        }
    }

    pub fn in_use(&self) -> Option<usize> {
        match self {
            Container::Grid(c) => Some(c.in_use()),
            Container::Image(c) => Some(c.in_use()),
            Container::List(_) | Container::Workbench(_) => None,
        }
    }

    pub fn free(&self) -> Option<usize> {
        match self {
            Container::Grid(c) => Some(c.free()),
            Container::Image(c) => Some(c.free()),
            Container::List(_) | Container::Workbench(_) => None,
        }
    }

    pub fn percent_full(&self) -> Option<f64> {
        match (self.in_use(), self.capacity()) {
            (Some(used), Some(capacity)) if capacity > 0 => {
                Some(used as f64 / capacity as f64 * 100.0)
            }
            (Some(_), Some(_)) => Some(100.0),
            _ => None,
        }
    }
}

impl TryFrom<&serde_json::Value> for Container {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        Container::from_json(value)
    }
}

impl TryFrom<serde_json::Value> for Container {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Container::from_json(&value)
    }
}

impl Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Container::Grid(grid) => Display::fmt(grid, f),
            Container::Image(image) => write!(
                f,
                "ImageContainer id='{}', storesContainers={}, storesSubsamples={}, free={}/{}",
                image.info.id,
                image.info.accepts_containers,
                image.info.accepts_subsamples,
                image.free(),
                image.capacity()
            ),
            Container::List(list) | Container::Workbench(list) => write!(
                f,
                "{} id='{}', storesContainers={}, storesSubsamples={}",
                if self.kind() == ContainerType::Workbench {
                    "Workbench"
                } else {
                    "ListContainer"
                },
                list.info.id,
                list.info.accepts_containers,
                list.info.accepts_subsamples
            ),
        }
    }
}

fn grid_locations(
    id: Id,
    dims: GridDimensions,
    locations: Vec<LocationDescriptor>,
) -> Result<Vec<GridLocation>, Error> {
    let mut seen = HashSet::with_capacity(locations.len());
    let mut used = Vec::with_capacity(locations.len());
    for location in locations {
        let (Some(x), Some(y)) = (location.coord_x, location.coord_y) else {
            return Err(Error::InvalidResponse(format!(
                "grid container {} lists a location without coordinates",
                id
            )));
        };
        let cell = GridLocation::new(x, y).map_err(|err| {
            Error::InvalidResponse(format!("grid container {}: {}", id, err))
        })?;
        if !dims.contains(&cell) {
            return Err(Error::InvalidResponse(format!(
                "grid container {} lists {} outside its {}",
                id, cell, dims
            )));
        }
        if !seen.insert(cell) {
            return Err(Error::InvalidResponse(format!(
                "grid container {} lists {} more than once",
                id, cell
            )));
        }
        used.push(cell);
    }
    Ok(used)
}

fn image_location(container: Id, location: LocationDescriptor) -> Result<ImageLocation, Error> {
    let id = location.id.ok_or_else(|| {
        Error::InvalidResponse(format!(
            "image container {} lists a location without an id",
            container
        ))
    })?;
    let content = match location.content {
        Some(ref value) if !value.is_null() => Some(Id::try_from(value).map_err(|err| {
            Error::InvalidResponse(format!(
                "image container {} location {}: {}",
                container, id, err
            ))
        })?),
        _ => None,
    };
    Ok(ImageLocation {
        id,
        x: location.coord_x.unwrap_or_default(),
        y: location.coord_y.unwrap_or_default(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid_fixture() -> serde_json::Value {
        serde_json::from_str(include_str!("../testdata/grid_container.json")).unwrap()
    }

    fn fixture_container() -> GridContainer {
        match Container::from_json(&grid_fixture()).unwrap() {
            Container::Grid(grid) => grid,
            other => panic!("expected a grid container, got {:?}", other),
        }
    }

    fn cell(column: u32, row: u32) -> GridLocation {
        GridLocation::new(column, row).unwrap()
    }

    #[test]
    fn test_grid_container_counts() {
        let grid = fixture_container();
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.row_count(), 7);
        assert_eq!(grid.capacity(), 21);
        assert_eq!(grid.in_use(), 10);
        assert_eq!(grid.free(), 11);
        assert!((grid.percent_full() - 47.619).abs() < 0.01);
    }

    #[test]
    fn test_grid_used_locations() {
        let grid = fixture_container();
        let used = grid.used_locations();
        assert!(used.contains(&cell(2, 1)));
        assert!(used.contains(&cell(2, 7)));
        assert!(!used.contains(&cell(1, 4)));
        assert!(grid.is_free(&cell(1, 4)));
        assert!(!grid.is_free(&cell(4, 1)));
    }

    #[test]
    fn test_grid_free_locations_partition() {
        let grid = fixture_container();
        let free: HashSet<_> = grid.free_locations().into_iter().collect();
        let used: HashSet<_> = grid.used_locations().iter().copied().collect();

        assert!(free.is_disjoint(&used));
        assert_eq!(free.len() + used.len(), grid.capacity());
        assert_eq!(free.len(), grid.free());
    }

    #[test]
    fn test_grid_display() {
        assert_eq!(
            fixture_container().to_string(),
            "GridContainer id='IC131085', storesContainers=true, storesSubsamples=true, percent_full=47.62"
        );
    }

    #[test]
    fn test_container_of_selects_variant() {
        let container = Container::from_json(&grid_fixture()).unwrap();
        assert!(container.is_grid());
        assert!(!container.is_list());
        assert_eq!(container.kind(), ContainerType::Grid);
        assert_eq!(container.id().global_id().as_deref(), Some("IC131085"));

        let list = Container::from_json(&json!({
            "id": 3, "globalId": "IC3", "name": "shelf", "cType": "LIST",
            "canStoreContainers": true, "canStoreSamples": true
        }))
        .unwrap();
        assert!(list.is_list());
        assert_eq!(list.capacity(), None);
        assert_eq!(list.percent_full(), None);

        let bench = Container::from_json(&json!({
            "id": 8, "globalId": "BE8", "name": "bench", "cType": "WORKBENCH",
            "canStoreContainers": true, "canStoreSamples": true
        }))
        .unwrap();
        assert_eq!(bench.kind(), ContainerType::Workbench);
        assert!(bench.is_list());
        assert!(bench.id().is_bench(false));
    }

    #[test]
    fn test_storable_content_types() {
        let mut raw = grid_fixture();
        raw["canStoreContainers"] = json!(false);
        let grid = Container::from_json(&raw).unwrap();
        assert!(grid.accepts_subsamples());
        assert!(!grid.accepts_containers());
    }

    #[test]
    fn test_rejects_non_containers() {
        let mut raw = grid_fixture();
        raw.as_object_mut().unwrap().remove("cType");
        assert!(matches!(
            Container::from_json(&raw),
            Err(Error::InvalidResponse(_))
        ));

        raw["cType"] = json!("BOX");
        assert!(matches!(
            Container::from_json(&raw),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_rejects_inconsistent_grid() {
        let mut raw = grid_fixture();
        raw["locations"]
            .as_array_mut()
            .unwrap()
            .push(json!({"coordX": 4, "coordY": 1}));
        assert!(matches!(
            Container::from_json(&raw),
            Err(Error::InvalidResponse(_))
        ));

        let mut raw = grid_fixture();
        raw["locations"]
            .as_array_mut()
            .unwrap()
            .push(json!({"coordX": 2, "coordY": 1}));
        assert!(matches!(
            Container::from_json(&raw),
            Err(Error::InvalidResponse(_))
        ));

        let mut raw = grid_fixture();
        raw["gridLayout"]["rowsNumber"] = json!(0);
        assert!(matches!(
            Container::from_json(&raw),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_image_container() {
        let raw: serde_json::Value =
            serde_json::from_str(include_str!("../testdata/image_container.json")).unwrap();
        let container = Container::from_json(&raw).unwrap();
        let image = container.as_image().unwrap();

        assert_eq!(container.capacity(), Some(3));
        assert_eq!(container.in_use(), Some(1));
        assert_eq!(container.free(), Some(2));
        assert_eq!(image.location(502).unwrap().content(), Some("SS2200".parse().unwrap()));
        assert!(image.location(501).unwrap().is_empty());
        assert_eq!(image.location(501).unwrap().position(), (120, 45));
        assert!(image.location(999).is_none());
        let free: Vec<_> = image.free_locations().map(ImageLocation::id).collect();
        assert_eq!(free, vec![501, 503]);
    }
}
