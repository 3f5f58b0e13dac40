// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::{Enum, Interface, Object};
use tracing::debug;

/// One of the films in the Star Wars Trilogy
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Episode {
    /// Released in 1977.
    #[graphql(name = "NEWHOPE")]
    NewHope,
    /// Released in 1980.
    Empire,
    /// Released in 1983.
    Jedi,
}

impl Episode {
    /// The episode number in the saga
    pub fn number(self) -> u8 {
        match self {
            Episode::NewHope => 4,
            Episode::Empire => 5,
            Episode::Jedi => 6,
        }
    }
}

/// A character in the Star Wars Trilogy
#[derive(Interface)]
#[graphql(
    field(name = "id", ty = "&str", desc = "The id of the character."),
    field(name = "name", ty = "Option<&str>", desc = "The name of the character."),
    field(
        name = "friends",
        ty = "Option<Vec<Character>>",
        desc = "The friends of the character, or an empty list if they have none."
    ),
    field(
        name = "appears_in",
        ty = "Option<Vec<Episode>>",
        desc = "Which movies they appear in."
    ),
    field(
        name = "secret_backstory",
        ty = "Option<&str>",
        desc = "All secrets about their past."
    )
)]
pub enum Character {
    Human(Human),
    Droid(Droid),
}

/// A humanoid creature in the Star Wars universe.
#[derive(Debug, Clone)]
pub struct Human {
    pub id: String,
    pub name: String,
    pub friend_ids: Vec<String>,
    pub appears_in: Vec<Episode>,
    pub home_planet: Option<String>,
}

#[Object]
impl Human {
    /// The id of the human.
    async fn id(&self) -> &str {
        &self.id
    }

    /// The name of the human.
    async fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    /// The friends of the human, or an empty list if they have none.
    async fn friends(&self) -> Option<Vec<Character>> {
        debug!(friend_ids = ?self.friend_ids, "Friends are not resolved");
        None
    }

    /// Which movies they appear in.
    async fn appears_in(&self) -> Option<Vec<Episode>> {
        Some(self.appears_in.clone())
    }

    /// The home planet of the human, or null if unknown.
    async fn home_planet(&self) -> Option<&str> {
        self.home_planet.as_deref()
    }

    /// Where are they from and how they came to be who they are.
    async fn secret_backstory(&self) -> Option<&str> {
        None
    }
}

/// A mechanical creature in the Star Wars universe.
#[derive(Debug, Clone)]
pub struct Droid {
    pub id: String,
    pub name: String,
    pub friend_ids: Vec<String>,
    pub appears_in: Vec<Episode>,
    pub primary_function: Option<String>,
}

#[Object]
impl Droid {
    /// The id of the droid.
    async fn id(&self) -> &str {
        &self.id
    }

    /// The name of the droid.
    async fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    /// The friends of the droid, or an empty list if they have none.
    async fn friends(&self) -> Option<Vec<Character>> {
        debug!(friend_ids = ?self.friend_ids, "Friends are not resolved");
        None
    }

    /// Which movies they appear in.
    async fn appears_in(&self) -> Option<Vec<Episode>> {
        Some(self.appears_in.clone())
    }

    /// Construction date and the name of the designer.
    async fn secret_backstory(&self) -> Option<&str> {
        None
    }

    /// The primary function of the droid.
    async fn primary_function(&self) -> Option<&str> {
        self.primary_function.as_deref()
    }
}

pub(crate) fn luke_skywalker() -> Human {
    Human {
        id: "1000".to_string(),
        name: "Luke Skywalker".to_string(),
        friend_ids: ["1002", "1003", "2000", "2001"].map(String::from).to_vec(),
        appears_in: vec![Episode::NewHope, Episode::Empire, Episode::Jedi],
        home_planet: Some("Tatooine".to_string()),
    }
}

pub(crate) fn r2_d2() -> Droid {
    Droid {
        id: "2001".to_string(),
        name: "R2-D2".to_string(),
        friend_ids: ["1000", "1002", "1003"].map(String::from).to_vec(),
        appears_in: vec![Episode::NewHope, Episode::Empire, Episode::Jedi],
        primary_function: Some("Astromech".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_numbers() {
        assert_eq!(
            [Episode::NewHope, Episode::Empire, Episode::Jedi].map(Episode::number),
            [4, 5, 6]
        );
    }
}
