//! Error types for circuitlab.

use thiserror::Error;

use crate::component::ComponentId;
use crate::point::Point;

#[derive(Debug, Error)]
pub enum Error {
    #[error("slot {start} -> {end} is not free")]
    PlacementRejected { start: Point, end: Point },

    #[error("{start} -> {end} is not a straight span")]
    InvalidFootprint { start: Point, end: Point },

    #[error("no peg at {0}")]
    PegNotFound(Point),

    #[error("component {0} not found")]
    ComponentNotFound(ComponentId),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("netlist error: {0}")]
    Netlist(#[from] circuitlab_core::Error),

    #[error("device error: {0}")]
    Device(#[from] circuitlab_devices::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
