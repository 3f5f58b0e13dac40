// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use futures::future::{join_all, try_join_all};
use http::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::{
    ExecuteOptions, ExecutionRequest, ExecutionResult, GraphQLExecutor, GraphQLParams,
    HttpQueryError,
    params::{RequestBody, malformed_entry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = HttpQueryError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        if method.eq_ignore_ascii_case("get") {
            Ok(HttpMethod::Get)
        } else if method.eq_ignore_ascii_case("post") {
            Ok(HttpMethod::Post)
        } else {
            Err(HttpQueryError::MethodNotAllowed)
        }
    }
}

/// What to do when the executor fails for one entry of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// The first failure fails the whole request
    #[default]
    AbortOnError,
    /// A failing entry produces an absent result; the other entries are unaffected
    SwallowPerEntry,
}

impl ErrorPolicy {
    pub fn from_catch_errors(catch_errors: bool) -> Self {
        if catch_errors {
            ErrorPolicy::SwallowPerEntry
        } else {
            ErrorPolicy::AbortOnError
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HttpQueryConfig {
    pub batch_enabled: bool,
    pub error_policy: ErrorPolicy,
}

/// A validated request, ready to be executed
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub params: Vec<GraphQLParams>,
    pub is_batch: bool,
    pub allow_only_query: bool,
}

/// The response for one entry of a request
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLResponse {
    /// `None` if the execution failed and the failure was swallowed
    pub result: Option<ExecutionResult>,
    pub status_code: StatusCode,
}

impl GraphQLResponse {
    fn from_result(result: ExecutionResult) -> Self {
        let status_code = result.status_code;
        Self {
            result: Some(result),
            status_code,
        }
    }

    fn absent() -> Self {
        Self {
            result: None,
            status_code: StatusCode::OK,
        }
    }
}

/// Validate and normalize a request without executing it.
///
/// A single payload is treated as a batch of one, with `fallback_params` (typically the query
/// string) supplying any field the payload omits. Batch entries must be self-describing, so
/// `fallback_params` is ignored for them. Every entry is normalized before returning, so an
/// invalid entry rejects the whole batch.
pub fn parse_http_query(
    method: &str,
    body: Value,
    fallback_params: Option<&Map<String, Value>>,
    batch_enabled: bool,
) -> Result<NormalizedQuery, HttpQueryError> {
    let method: HttpMethod = method.parse()?;

    let body = RequestBody::from_json(body)?;
    let is_batch = body.is_batch();

    let empty = Map::new();

    let params = match body {
        RequestBody::Single(entry) => {
            vec![GraphQLParams::from_payload(
                &entry,
                fallback_params.unwrap_or(&empty),
            )?]
        }
        RequestBody::Batch(_) if !batch_enabled => return Err(HttpQueryError::BatchingDisabled),
        RequestBody::Batch(entries) if entries.is_empty() => return Err(HttpQueryError::EmptyBatch),
        RequestBody::Batch(entries) => entries
            .iter()
            .map(|entry| match entry {
                Value::Object(entry) => GraphQLParams::from_payload(entry, &empty),
                other => Err(malformed_entry(other)),
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(NormalizedQuery {
        params,
        is_batch,
        allow_only_query: method == HttpMethod::Get,
    })
}

/// Normalize a request and execute each of its entries.
///
/// Entries are executed concurrently, but the returned responses (and params) are in the order of
/// the request's entries.
#[instrument(name = "http_query::run_http_query", skip_all, fields(method = method))]
pub async fn run_http_query(
    executor: &dyn GraphQLExecutor,
    method: &str,
    body: Value,
    fallback_params: Option<&Map<String, Value>>,
    config: HttpQueryConfig,
    options: &ExecuteOptions,
) -> Result<(Vec<GraphQLResponse>, Vec<GraphQLParams>), HttpQueryError> {
    let NormalizedQuery {
        params,
        is_batch,
        allow_only_query,
    } = parse_http_query(method, body, fallback_params, config.batch_enabled)?;

    debug!(entries = params.len(), is_batch, "Executing GraphQL request");

    let executions = params.iter().enumerate().map(|(index, params)| async move {
        debug!(index, operation_name = ?params.operation_name, "Executing entry");
        executor
            .execute(ExecutionRequest {
                params,
                allow_only_query,
                options,
            })
            .await
    });

    let responses = match config.error_policy {
        ErrorPolicy::AbortOnError => try_join_all(executions)
            .await?
            .into_iter()
            .map(GraphQLResponse::from_result)
            .collect(),
        ErrorPolicy::SwallowPerEntry => join_all(executions)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(result) => GraphQLResponse::from_result(result),
                Err(error) => {
                    warn!(index, %error, "Swallowing execution error");
                    GraphQLResponse::absent()
                }
            })
            .collect(),
    };

    Ok((responses, params))
}
