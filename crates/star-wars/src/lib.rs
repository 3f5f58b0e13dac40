// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A small Star Wars schema served by `nextql-server`.
//!
//! Resolvers are stubs: `hero` always returns Luke Skywalker, `droid` always returns R2-D2, and
//! `human`, `friends` and `secretBackstory` resolve to null.

mod model;
mod query;

use async_graphql::{EmptyMutation, EmptySubscription, Schema};

pub use model::{Character, Droid, Episode, Human};
pub use query::QueryRoot;

pub type StarWarsSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn star_wars_schema() -> StarWarsSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).finish()
}
