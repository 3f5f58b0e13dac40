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

use crate::{HttpQueryError, json::load_json_variables};

const QUERY: &str = "query";
const VARIABLES: &str = "variables";
const OPERATION_NAME: &str = "operationName";

/// The decoded body of a GraphQL request: a single payload or a batch of them.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Single(Map<String, Value>),
    /// Entries are validated individually (after the batching policy has been checked)
    Batch(Vec<Value>),
}

impl RequestBody {
    pub fn from_json(body: Value) -> Result<Self, HttpQueryError> {
        match body {
            Value::Object(map) => Ok(RequestBody::Single(map)),
            Value::Array(entries) => Ok(RequestBody::Batch(entries)),
            other => Err(malformed_entry(&other)),
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, RequestBody::Batch(_))
    }
}

/// Parameters of a single GraphQL operation, after merging the request payload with the fallback
/// (query-string) parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLParams {
    pub query: Option<String>,
    pub variables: Option<Map<String, Value>>,
    pub operation_name: Option<String>,
}

impl GraphQLParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Extract the parameters from `entry`, taking each missing field from `fallback`.
    ///
    /// A field counts as missing if it is absent, `null` or an empty string. An empty object also
    /// counts as missing for `variables`.
    pub fn from_payload(
        entry: &Map<String, Value>,
        fallback: &Map<String, Value>,
    ) -> Result<Self, HttpQueryError> {
        Ok(Self {
            query: string_param(QUERY, pick(QUERY, entry, fallback))?,
            variables: load_json_variables(pick(VARIABLES, entry, fallback))?,
            operation_name: string_param(OPERATION_NAME, pick(OPERATION_NAME, entry, fallback))?,
        })
    }
}

pub(crate) fn malformed_entry(entry: &Value) -> HttpQueryError {
    HttpQueryError::MalformedPayload(format!(
        "GraphQL params should be a dict. Received {entry}."
    ))
}

fn pick<'a>(
    key: &str,
    entry: &'a Map<String, Value>,
    fallback: &'a Map<String, Value>,
) -> Option<&'a Value> {
    entry
        .get(key)
        .filter(|value| is_present(key, value))
        .or_else(|| fallback.get(key).filter(|value| is_present(key, value)))
}

fn is_present(key: &str, value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Object(map) if key == VARIABLES => !map.is_empty(),
        _ => true,
    }
}

fn string_param(key: &str, value: Option<&Value>) -> Result<Option<String>, HttpQueryError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(HttpQueryError::MalformedPayload(format!(
            "GraphQL param \"{key}\" should be a string. Received {other}."
        ))),
    }
}
