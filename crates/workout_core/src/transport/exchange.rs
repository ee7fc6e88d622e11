//! In-memory request/response pair implementing `Transport`.
//!
//! Used by transport adapters that collect a request up front and emit the
//! response afterwards.

use super::Transport;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Exchange {
    params: HashMap<String, String>,
    body: Option<Vec<u8>>,
    response: Option<(u16, Value)>,
}

impl Exchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|(status, _)| *status)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.response.as_ref().map(|(_, payload)| payload)
    }

    /// Consumes the exchange, returning the written response if any.
    pub fn into_response(self) -> Option<(u16, Value)> {
        self.response
    }
}

impl Transport for Exchange {
    fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn respond(&mut self, status: u16, payload: Value) {
        self.response = Some((status, payload));
    }
}
