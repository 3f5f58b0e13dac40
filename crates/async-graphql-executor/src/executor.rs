// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::{ObjectType, Request, Schema, SubscriptionType, Variables};
use async_trait::async_trait;
use http::StatusCode;
use http_query::{ExecutionError, ExecutionRequest, ExecutionResult, GraphQLExecutor};
use serde_json::{Map, Value, json};
use tracing::{error, instrument};

use crate::operation::ensure_query_operation;

/// Per-request context handed to resolvers (available through `Context::data_opt`)
#[derive(Debug, Clone, Default)]
pub struct ExecuteContext(pub Map<String, Value>);

pub struct AsyncGraphQLExecutor<Query, Mutation, Subscription> {
    schema: Schema<Query, Mutation, Subscription>,
}

impl<Query, Mutation, Subscription> AsyncGraphQLExecutor<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    pub fn new(schema: Schema<Query, Mutation, Subscription>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema<Query, Mutation, Subscription> {
        &self.schema
    }
}

#[async_trait]
impl<Query, Mutation, Subscription> GraphQLExecutor
    for AsyncGraphQLExecutor<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    #[instrument(
        name = "AsyncGraphQLExecutor::execute",
        skip_all,
        fields(operation_name = ?request.params.operation_name)
    )]
    async fn execute(
        &self,
        request: ExecutionRequest<'_>,
    ) -> Result<ExecutionResult, ExecutionError> {
        let params = request.params;

        let Some(query) = params.query.as_deref() else {
            return Ok(
                ExecutionResult::new(None, vec![json!({"message": "Must provide query string."})])
                    .with_status_code(StatusCode::BAD_REQUEST),
            );
        };

        if request.allow_only_query {
            ensure_query_operation(query, params.operation_name.as_deref())?;
        }

        let mut graphql_request = Request::new(query)
            .data(ExecuteContext(request.options.context.clone()));
        if let Some(operation_name) = &params.operation_name {
            graphql_request = graphql_request.operation_name(operation_name.as_str());
        }
        if let Some(variables) = &params.variables {
            graphql_request =
                graphql_request.variables(Variables::from_json(Value::Object(variables.clone())));
        }

        let response = self.schema.execute(graphql_request).await;

        // Resolver errors always carry a path; parse and validation errors never do
        let never_ran = !response.errors.is_empty()
            && response.errors.iter().all(|error| error.path.is_empty());

        let errors = response
            .errors
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(encoding_error)?;
        let data = response.data.into_json().map_err(encoding_error)?;

        if never_ran && data.is_null() {
            Ok(ExecutionResult::new(None, errors).with_status_code(StatusCode::BAD_REQUEST))
        } else {
            Ok(ExecutionResult::new(Some(data), errors))
        }
    }
}

fn encoding_error(error: serde_json::Error) -> ExecutionError {
    error!(%error, "Failed to convert the GraphQL response to JSON");
    ExecutionError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
