// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Parser, Subcommand};
use log::{debug, warn};
use rspace_client::{
    BulkOperationResult, Client, ClientConfig, Container, Error, FillingStrategy, GridDimensions,
    GridLocation, GridPlacement, Id, InventoryApi as _,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RSpace server URL, for example https://rspace.example.org
    #[clap(long, env = "RSPACE_URL")]
    url: Option<String>,

    /// RSpace API key
    #[clap(long, env = "RSPACE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Client Command
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Returns the RSpace server status and version.
    Status,
    /// Lists the workbenches visible to the current user.
    Workbenches,
    /// Shows a container and how full it is.
    Container {
        /// Container or workbench id, for example IC131085 or BE9
        id: Id,
    },
    /// Lists the free locations of a grid or image container.
    FreeCells {
        /// Container id
        id: Id,
    },
    /// Moves items into a grid container, filling cells by row or by
    /// column from a starting cell.
    Place {
        /// Target grid container id
        target: Id,

        /// Filling order: row or column
        #[clap(long, default_value = "row")]
        fill: FillingStrategy,

        /// Starting cell as column,row
        #[clap(long, default_value = "1,1")]
        start: GridLocation,

        /// Grid size as columns,rows. Without it the container is loaded
        /// and checked for free space first.
        #[clap(long)]
        dims: Option<GridDimensions>,

        /// Subsample or container ids to move
        #[clap(required = true)]
        items: Vec<Id>,
    },
    /// Moves items into explicit grid cells, the nth item into the nth
    /// --at cell.
    PlaceAt {
        /// Target grid container id
        target: Id,

        /// Cell as column,row, repeated once per item
        #[clap(long = "at", required = true)]
        locations: Vec<GridLocation>,

        /// Subsample or container ids to move
        #[clap(required = true)]
        items: Vec<Id>,
    },
    /// Moves items into a list container or workbench.
    AddToList {
        /// Target list container or workbench id
        target: Id,

        /// Subsample or container ids to move
        #[clap(required = true)]
        items: Vec<Id>,
    },
}

fn create_client(url: Option<String>, api_key: Option<String>) -> Result<Client, Error> {
    match (url, api_key) {
        (Some(url), Some(api_key)) => Client::new(&url, &api_key),
        (url, api_key) => {
            let config = ClientConfig::load_overriding(url.as_deref(), api_key.as_deref())?;
            Client::from_config(&config)
        }
    }
}

fn print_result(result: &BulkOperationResult) {
    println!("{}", result);
    for item in result.results() {
        match (&item.record, &item.error) {
            (Some(record), _) => match &record.global_id {
                Some(global_id) => println!("  moved {}", global_id),
                None => println!("  moved {}", record.id),
            },
            (None, Some(error)) => println!("  failed: {}", error),
            (None, None) => warn!("bulk result item without record or error"),
        }
    }
}

async fn handle_status(client: &Client) -> Result<(), Error> {
    let status = client.status().await?;
    match status.rspace_version {
        Some(version) => println!("{} (RSpace {})", status.message, version),
        None => println!("{}", status.message),
    }
    Ok(())
}

async fn handle_workbenches(client: &Client) -> Result<(), Error> {
    for bench in client.workbenches().await? {
        println!("{} {}", bench.id(), bench.name());
    }
    Ok(())
}

async fn handle_container(client: &Client, id: Id) -> Result<(), Error> {
    let container = client.container(id).await?;
    println!("{}", container);
    if let (Some(capacity), Some(in_use)) = (container.capacity(), container.in_use()) {
        println!("{} of {} locations in use", in_use, capacity);
    }
    Ok(())
}

async fn handle_free_cells(client: &Client, id: Id) -> Result<(), Error> {
    let container = client.container(id).await?;
    match &container {
        Container::Grid(grid) => {
            for location in grid.free_locations() {
                println!("{}", location);
            }
        }
        Container::Image(image) => {
            for location in image.free_locations() {
                let (x, y) = location.position();
                println!("{} at ({}, {})", location.id(), x, y);
            }
        }
        _ => {
            return Err(Error::WrongRole(format!(
                "{} is a {} container without fixed locations",
                container.id(),
                container.kind()
            )));
        }
    }
    Ok(())
}

async fn handle_place(
    client: &Client,
    target: Id,
    fill: FillingStrategy,
    start: GridLocation,
    dims: Option<GridDimensions>,
    items: Vec<Id>,
) -> Result<(), Error> {
    let result = match dims {
        Some(dims) => {
            let placement = GridPlacement::fill(
                fill,
                start.column(),
                start.row(),
                dims.columns(),
                dims.rows(),
                items,
            )?;
            debug!("{}", placement);
            client.add_items_to_grid_container(target, &placement).await?
        }
        None => {
            let container = client.fetch_container(target).await?;
            let dims = match container.as_grid() {
                Some(grid) => grid.dimensions(),
                None => {
                    return Err(Error::WrongRole(format!(
                        "{} is a {} container, not a grid",
                        container.id(),
                        container.kind()
                    )));
                }
            };
            let placement = GridPlacement::fill(
                fill,
                start.column(),
                start.row(),
                dims.columns(),
                dims.rows(),
                items,
            )?;
            debug!("{}", placement);
            client
                .add_items_to_grid_container(&container, &placement)
                .await?
        }
    };
    print_result(&result);
    Ok(())
}

async fn handle_place_at(
    client: &Client,
    target: Id,
    locations: Vec<GridLocation>,
    items: Vec<Id>,
) -> Result<(), Error> {
    let placement = GridPlacement::by_location(locations, items)?;
    let result = client
        .add_items_to_grid_container(target, &placement)
        .await?;
    print_result(&result);
    Ok(())
}

async fn handle_add_to_list(client: &Client, target: Id, items: Vec<Id>) -> Result<(), Error> {
    let result = client.add_items_to_list_container(target, &items).await?;
    print_result(&result);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let client = create_client(args.url, args.api_key)?;

    match args.cmd {
        Command::Status => handle_status(&client).await,
        Command::Workbenches => handle_workbenches(&client).await,
        Command::Container { id } => handle_container(&client, id).await,
        Command::FreeCells { id } => handle_free_cells(&client, id).await,
        Command::Place {
            target,
            fill,
            start,
            dims,
            items,
        } => handle_place(&client, target, fill, start, dims, items).await,
        Command::PlaceAt {
            target,
            locations,
            items,
        } => handle_place_at(&client, target, locations, items).await,
        Command::AddToList { target, items } => {
            handle_add_to_list(&client, target, items).await
        }
    }
}
