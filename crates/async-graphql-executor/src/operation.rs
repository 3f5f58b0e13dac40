// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::{DocumentOperations, OperationType};
use http::StatusCode;
use http_query::ExecutionError;
use tracing::{instrument, warn};

/// Determine the type of the operation that `operation_name` selects in `query`.
///
/// A document with a single operation selects it whatever `operation_name` says. Returns `None`
/// if the query doesn't parse or the operation can't be selected; the engine reports those
/// problems itself when it executes the query.
#[instrument(name = "operation::operation_type", skip(query))]
pub(crate) fn operation_type(query: &str, operation_name: Option<&str>) -> Option<OperationType> {
    let document = match async_graphql_parser::parse_query(query) {
        Ok(document) => document,
        Err(error) => {
            warn!(%error, "Failed to parse query");
            return None;
        }
    };

    // Named operations land in `Multiple`, even when there is only one of them
    let operation = match document.operations {
        DocumentOperations::Single(operation) => Some(operation),
        DocumentOperations::Multiple(operations) if operations.len() == 1 => {
            operations.into_values().next()
        }
        DocumentOperations::Multiple(operations) => operation_name.and_then(|name| {
            operations.into_iter().find_map(|(operation_name, operation)| {
                (operation_name.as_str() == name).then_some(operation)
            })
        }),
    };

    operation.map(|operation| operation.node.ty)
}

/// Refuse anything but query operations (used for GET requests)
pub(crate) fn ensure_query_operation(
    query: &str,
    operation_name: Option<&str>,
) -> Result<(), ExecutionError> {
    match operation_type(query, operation_name) {
        Some(ty @ (OperationType::Mutation | OperationType::Subscription)) => Err(
            ExecutionError::new(
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Can only perform a {ty} operation from a POST request."),
            )
            .with_header(http::header::ALLOW.as_str(), "POST"),
        ),
        _ => Ok(()),
    }
}
