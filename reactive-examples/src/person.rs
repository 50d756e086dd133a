//! The small domain the pipelines run over

use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything with a first and last name that can introduce itself
pub trait Named {
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;

    /// `My Name is {first} {last}.` with both names exactly as stored
    fn describe(&self) -> String {
        format!("My Name is {} {}.", self.first_name(), self.last_name())
    }
}

/// A person record, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    first_name: String,
    last_name: String,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Named for Person {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Command object built from a [`Person`], the target of `map` in the examples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCommand {
    first_name: String,
    last_name: String,
}

impl From<Person> for PersonCommand {
    fn from(person: Person) -> Self {
        Self {
            first_name: person.first_name,
            last_name: person.last_name,
        }
    }
}

impl From<&Person> for PersonCommand {
    fn from(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
        }
    }
}

impl Named for PersonCommand {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl fmt::Display for PersonCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
