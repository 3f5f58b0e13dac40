// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::StatusCode;
use serde_json::{Map, Value};

use crate::{ExecutionResult, GraphQLResponse, json::json_encode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResponse {
    pub body: String,
    pub status_code: StatusCode,
}

/// Render one result as a `{"data": ..., "errors": [...]}` object (`errors` only when non-empty).
/// An absent result renders as `null`.
pub fn format_execution_result(result: Option<&ExecutionResult>) -> Value {
    match result {
        None => Value::Null,
        Some(result) => {
            let mut formatted = Map::new();
            formatted.insert(
                "data".to_string(),
                result.data.clone().unwrap_or(Value::Null),
            );
            if !result.errors.is_empty() {
                formatted.insert("errors".to_string(), Value::Array(result.errors.clone()));
            }
            Value::Object(formatted)
        }
    }
}

/// Encode the responses of a request into the HTTP body and status code.
///
/// A batch renders as an array (in request order), a single request as the bare object. The
/// status code is the highest one among the responses.
pub fn encode_execution_results(
    responses: &[GraphQLResponse],
    is_batch: bool,
    pretty: bool,
) -> Result<EncodedResponse, serde_json::Error> {
    let status_code = responses
        .iter()
        .map(|response| response.status_code)
        .max_by_key(|status_code| status_code.as_u16())
        .unwrap_or(StatusCode::OK);

    let mut formatted = responses
        .iter()
        .map(|response| format_execution_result(response.result.as_ref()));

    let body = if is_batch {
        Value::Array(formatted.collect())
    } else {
        formatted.next().unwrap_or(Value::Null)
    };

    Ok(EncodedResponse {
        body: json_encode(&body, pretty)?,
        status_code,
    })
}
