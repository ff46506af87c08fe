//! Deserialization for PATCH fields that distinguish "absent" from "null".
//!
//! Use with `#[serde(default, deserialize_with = "nullable::deserialize")]` on an
//! `Option<Option<T>>` field:
//!
//! - field missing: `None` (leave unchanged)
//! - `null`: `Some(None)` (clear the value)
//! - a value: `Some(Some(value))` (set the value)

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
