// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Grid coordinate arithmetic shared by every placement strategy.
//!
//! Grid cells are addressed by 1-based `(column, row)` pairs, where the
//! column is the x coordinate and the row is the y coordinate. Automatic
//! placement walks the grid through a 0-based linear index whose order is
//! fixed by the [`FillingStrategy`]:
//!
//! | Strategy | index of `(col, row)` | cell of index `i` |
//! |----------|-----------------------|-------------------|
//! | `ByRow` | `(row-1)*cols + (col-1)` | `(i mod cols + 1, i div cols + 1)` |
//! | `ByColumn` | `(col-1)*rows + (row-1)` | `(i div rows + 1, i mod rows + 1)` |
//!
//! [`start_index`] and [`coordinate_at`] are exact inverses for every cell
//! inside the grid.

use crate::Error;
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Order in which consecutive items fill a grid.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillingStrategy {
    /// Row-major: fill a row left to right, then move to the next row.
    ByRow,
    /// Column-major: fill a column top to bottom, then move to the next
    /// column.
    ByColumn,
}

impl Display for FillingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FillingStrategy::ByRow => write!(f, "row"),
            FillingStrategy::ByColumn => write!(f, "column"),
        }
    }
}

impl FromStr for FillingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "row" | "by_row" | "by-row" => Ok(FillingStrategy::ByRow),
            "column" | "col" | "by_column" | "by-column" => Ok(FillingStrategy::ByColumn),
            _ => Err(Error::InvalidParameters(format!(
                "unknown filling strategy '{}', expected 'row' or 'column'",
                s
            ))),
        }
    }
}

/// A 1-based grid cell: `x` is the column number and `y` the row number.
///
/// Serializes to the `{"coordX": .., "coordY": ..}` shape used by the
/// inventory API.
///
/// # Examples
///
/// ```rust
/// use rspace_client::GridLocation;
///
/// let cell = GridLocation::new(3, 4).unwrap();
/// assert_eq!(cell.column(), 3);
/// assert_eq!(cell.row(), 4);
/// assert_eq!("3,4".parse::<GridLocation>().unwrap(), cell);
/// assert!(GridLocation::new(0, 1).is_err());
/// ```
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridLocation {
    #[serde(rename = "coordX")]
    x: u32,
    #[serde(rename = "coordY")]
    y: u32,
}

impl GridLocation {
    pub fn new(column: u32, row: u32) -> Result<Self, Error> {
        if column < 1 || row < 1 {
            return Err(Error::OutOfRange(format!(
                "grid coordinates are 1-based, got column {} row {}",
                column, row
            )));
        }
        Ok(GridLocation { x: column, y: row })
    }

    pub fn column(&self) -> u32 {
        self.x
    }

    pub fn row(&self) -> u32 {
        self.y
    }
}

impl Display for GridLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for GridLocation {
    type Err = Error;

    /// Parses `"column,row"`, for example `"2,1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, row) = parse_pair(s, "column,row")?;
        GridLocation::new(column, row)
    }
}

fn parse_pair(s: &str, shape: &str) -> Result<(u32, u32), Error> {
    let invalid = || Error::InvalidParameters(format!("'{}' is not a '{}' pair", s, shape));
    let (first, second) = s.split_once(',').ok_or_else(invalid)?;
    let first = first.trim().parse::<u32>().map_err(|_| invalid())?;
    let second = second.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((first, second))
}

/// Size of a grid, with at least one column and one row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    pub fn new(columns: u32, rows: u32) -> Result<Self, Error> {
        if columns < 1 || rows < 1 {
            return Err(Error::OutOfRange(format!(
                "grid dimensions must be at least 1x1, got {} columns x {} rows",
                columns, rows
            )));
        }
        Ok(GridDimensions { columns, rows })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cells in the grid.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn contains(&self, location: &GridLocation) -> bool {
        location.x <= self.columns && location.y <= self.rows
    }

    /// Every cell of the grid, column by column.
    pub fn locations(&self) -> impl Iterator<Item = GridLocation> + use<> {
        (1..=self.columns)
            .cartesian_product(1..=self.rows)
            .map(|(x, y)| GridLocation { x, y })
    }
}

impl Display for GridDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} columns x {} rows", self.columns, self.rows)
    }
}

impl FromStr for GridDimensions {
    type Err = Error;

    /// Parses `"columns,rows"`, for example `"3,7"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (columns, rows) = parse_pair(s, "columns,rows")?;
        GridDimensions::new(columns, rows)
    }
}

/// Converts a 1-based starting cell into the 0-based linear fill index for
/// `strategy`.
///
/// Fails with [`Error::OutOfRange`] when the column or row is zero or lies
/// outside `dims`.
pub fn start_index(
    column: u32,
    row: u32,
    dims: GridDimensions,
    strategy: FillingStrategy,
) -> Result<u64, Error> {
    if column < 1 || row < 1 {
        return Err(Error::OutOfRange(
            "column and row starting position must be >= 1".to_string(),
        ));
    }
    if column > dims.columns || row > dims.rows {
        return Err(Error::OutOfRange(format!(
            "starting position column {} row {} must fit in grid: {}",
            column, row, dims
        )));
    }

    let (column, row) = (column as u64 - 1, row as u64 - 1);
    Ok(match strategy {
        FillingStrategy::ByRow => row * dims.columns as u64 + column,
        FillingStrategy::ByColumn => column * dims.rows as u64 + row,
    })
}

/// Returns the 1-based cell occupied by the 0-based linear `index` under
/// `strategy`.
///
/// No bounds check is performed: an index at or past `dims.capacity()`
/// yields a row (row-major) or column (column-major) outside the grid.
/// Callers must keep runs within capacity.
pub fn coordinate_at(index: u64, dims: GridDimensions, strategy: FillingStrategy) -> GridLocation {
    let (columns, rows) = (dims.columns as u64, dims.rows as u64);
    let (x, y) = match strategy {
        FillingStrategy::ByRow => (index % columns + 1, index / columns + 1),
        FillingStrategy::ByColumn => (index / rows + 1, index % rows + 1),
    };
    GridLocation {
        x: u32::try_from(x).unwrap_or(u32::MAX),
        y: u32::try_from(y).unwrap_or(u32::MAX),
    }
}
