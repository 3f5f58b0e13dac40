// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! [`GraphQLExecutor`](http_query::GraphQLExecutor) backed by an `async-graphql` schema.

mod executor;
mod operation;

pub use executor::{AsyncGraphQLExecutor, ExecuteContext};
