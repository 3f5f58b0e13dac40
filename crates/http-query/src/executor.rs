// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{Map, Value};

use crate::{ExecutionError, GraphQLParams};

/// A GraphQL engine bound to a schema.
///
/// Implementations own their schema (typically behind an `Arc`), so the same executor can serve
/// any number of concurrent requests.
#[async_trait]
pub trait GraphQLExecutor: Send + Sync {
    async fn execute(
        &self,
        request: ExecutionRequest<'_>,
    ) -> Result<ExecutionResult, ExecutionError>;
}

pub struct ExecutionRequest<'a> {
    pub params: &'a GraphQLParams,
    /// Set for GET requests: the executor must refuse anything but query operations
    pub allow_only_query: bool,
    pub options: &'a ExecuteOptions,
}

/// Caller-supplied extras passed unchanged to every execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub context: Map<String, Value>,
}

impl ExecuteOptions {
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// Outcome of executing one operation: `data` and `errors` as produced by the engine, plus the
/// HTTP status the engine wants reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub data: Option<Value>,
    pub errors: Vec<Value>,
    pub status_code: StatusCode,
}

impl ExecutionResult {
    pub fn new(data: Option<Value>, errors: Vec<Value>) -> Self {
        Self {
            data,
            errors,
            status_code: StatusCode::OK,
        }
    }

    pub fn with_status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }
}
