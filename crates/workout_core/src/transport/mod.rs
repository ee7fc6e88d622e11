//! Transport-facing controller for the workout resource.
//!
//! # Responsibility
//! - Define the request/response capability set a transport must offer.
//! - Map resource outcomes to status codes and stable JSON bodies.
//!
//! # Invariants
//! - Every handled request produces exactly one `respond` call.
//! - Error bodies always carry an `error` string.

use serde_json::Value;
use std::fmt::{Display, Formatter};

pub mod controller;
pub mod exchange;
pub mod payload;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Name of the path parameter carrying a workout id.
pub const ID_PARAM: &str = "id";

/// Request/response capabilities consumed by the controller.
pub trait Transport {
    /// Returns a path parameter by name.
    fn param(&self, name: &str) -> Option<&str>;
    /// Returns the raw request body, if any was sent.
    fn body(&self) -> Option<&[u8]>;
    /// Writes the response status and JSON payload.
    fn respond(&mut self, status: u16, payload: Value);
}

/// The five resource operations, keyed by HTTP method and path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /`
    List,
    /// `GET /:id`
    Get,
    /// `POST /`
    Create,
    /// `PATCH /:id`
    Update,
    /// `DELETE /:id`
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
