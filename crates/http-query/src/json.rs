// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::HttpQueryError;

/// Encode a value as JSON: compact (`,` and `:` separators) or pretty-printed with two-space indentation.
pub fn json_encode<T: Serialize + ?Sized>(
    data: &T,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    }
}

pub fn load_json_body(data: &[u8]) -> Result<Value, HttpQueryError> {
    serde_json::from_slice(data).map_err(|error| {
        tracing::warn!(%error, "Request body is not valid JSON");
        HttpQueryError::InvalidJsonBody
    })
}

/// Normalize the `variables` field of a request.
///
/// A string is decoded as JSON. Absent, `null` and empty values all mean "no variables".
pub fn load_json_variables(
    variables: Option<&Value>,
) -> Result<Option<Map<String, Value>>, HttpQueryError> {
    match variables {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.is_empty() => Ok(None),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(Value::Null) => Ok(None),
            Ok(_) | Err(_) => Err(HttpQueryError::InvalidVariablesJson),
        },
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(_) => Err(HttpQueryError::InvalidVariablesJson),
    }
}
