//! Request payloads for the service operations.
//!
//! Deserialized at the HTTP boundary; field types are strict (a fractional
//! bound fails deserialization and surfaces as 400), presence is checked
//! here via `Option` and required fields.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFactoryRequest {
    pub name: String,
    pub lower_bound: i64,
    pub upper_bound: i64,
    pub children_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateFactoryRequest {
    pub name: Option<String>,
    pub lower_bound: Option<i64>,
    pub upper_bound: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegenerateRequest {
    pub lower_bound: Option<i64>,
    pub upper_bound: Option<i64>,
}
