// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Serves GraphQL over HTTP without depending on any specific web framework.
///
/// The router extracts the method, body and query string from an incoming request, normalizes
/// them with `http-query`, executes the resulting operations and encodes the JSON response.
mod graphql_router;

pub use graphql_router::GraphQLRouter;
