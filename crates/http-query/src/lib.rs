// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Normalization of GraphQL-over-HTTP requests.
//!
//! Turns the raw pieces of an HTTP request (method, decoded body, query-string parameters) into an
//! ordered list of [`GraphQLParams`], hands each of them to a [`GraphQLExecutor`], and encodes the
//! results back into a JSON response body. Nothing here depends on a particular web framework or
//! GraphQL engine.

mod error;
mod executor;
pub mod json;
mod normalizer;
mod params;
mod response;

pub use error::{ExecutionError, HttpQueryError};
pub use executor::{ExecuteOptions, ExecutionRequest, ExecutionResult, GraphQLExecutor};
pub use normalizer::{
    ErrorPolicy, GraphQLResponse, HttpMethod, HttpQueryConfig, NormalizedQuery, parse_http_query,
    run_http_query,
};
pub use params::{GraphQLParams, RequestBody};
pub use response::{EncodedResponse, encode_execution_results, format_execution_result};
