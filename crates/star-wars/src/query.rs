// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::Object;
use tracing::debug;

use crate::model::{Character, Droid, Episode, Human, luke_skywalker, r2_d2};

pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    async fn hero(
        &self,
        #[graphql(
            desc = "If omitted, returns the hero of the whole saga. If provided, returns the hero of that particular episode."
        )]
        episode: Option<Episode>,
    ) -> Option<Character> {
        debug!(?episode, "Resolving hero");
        Some(Character::Human(luke_skywalker()))
    }

    async fn human(&self, #[graphql(desc = "id of the human")] id: String) -> Option<Human> {
        debug!(%id, "Resolving human");
        None
    }

    async fn droid(&self, #[graphql(desc = "id of the droid")] id: String) -> Option<Droid> {
        debug!(%id, "Resolving droid");
        Some(r2_d2())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::star_wars_schema;

    async fn execute(query: &str) -> serde_json::Value {
        let response = star_wars_schema().execute(query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    #[tokio::test]
    async fn hero() {
        let data = execute("{ hero { id name appearsIn ... on Human { homePlanet } } }").await;

        assert_eq!(
            data,
            json!({
                "hero": {
                    "id": "1000",
                    "name": "Luke Skywalker",
                    "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"],
                    "homePlanet": "Tatooine"
                }
            })
        );
    }

    #[tokio::test]
    async fn hero_of_episode() {
        let data = execute("{ hero(episode: EMPIRE) { __typename name } }").await;

        assert_eq!(
            data,
            json!({"hero": {"__typename": "Human", "name": "Luke Skywalker"}})
        );
    }

    #[tokio::test]
    async fn droid() {
        let data =
            execute(r#"{ droid(id: "2001") { name primaryFunction friends { id } secretBackstory } }"#)
                .await;

        assert_eq!(
            data,
            json!({
                "droid": {
                    "name": "R2-D2",
                    "primaryFunction": "Astromech",
                    "friends": null,
                    "secretBackstory": null
                }
            })
        );
    }

    #[tokio::test]
    async fn human_is_not_found() {
        let data = execute(r#"{ human(id: "1000") { name } }"#).await;

        assert_eq!(data, json!({"human": null}));
    }

    #[tokio::test]
    async fn query_type_shape() {
        let data = execute(
            r#"{
                __schema { queryType { name } }
                __type(name: "Query") { fields { name type { kind name } } }
            }"#,
        )
        .await;

        assert_eq!(data["__schema"]["queryType"]["name"], json!("Query"));
        assert_eq!(
            data["__type"]["fields"],
            json!([
                {"name": "hero", "type": {"kind": "INTERFACE", "name": "Character"}},
                {"name": "human", "type": {"kind": "OBJECT", "name": "Human"}},
                {"name": "droid", "type": {"kind": "OBJECT", "name": "Droid"}}
            ])
        );
    }

    #[tokio::test]
    async fn mutations_are_not_supported() {
        let response = star_wars_schema().execute("mutation { hero { id } }").await;

        assert!(!response.errors.is_empty());
    }
}
