//! Team roster configuration.
//!
//! The roster is the allow-list of owners shown when the owner filter is `All`. A
//! built-in roster is compiled in; a JSON file can replace it, either as
//! `{"members": [...]}` or as a bare array of names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Recognised team members, in display order.
pub const DEFAULT_ROSTER: [&str; 8] = [
    "Fitim Ahmeti",
    "Shpend Ajeti",
    "Festim Asllani",
    "Tim Corey",
    "Vlora Ibrahimi",
    "Vanja Petrushevski",
    "Edi Sermaxhaj",
    "Ermal Shala",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub members: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Document { members: Vec<String> },
    List(Vec<String>),
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new(DEFAULT_ROSTER)
    }
}

impl Roster {
    /// Build a roster from names, trimming them and dropping blanks and repeats.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !members.iter().any(|m| m == name) {
                members.push(name.to_string());
            }
        }
        Roster { members }
    }

    /// Read a roster from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::from_json(&text).map_err(|source| Error::Roster {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), members = roster.members.len(), "loaded roster");
        Ok(roster)
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let names = match serde_json::from_str::<RosterFile>(text)? {
            RosterFile::Document { members } => members,
            RosterFile::List(members) => members,
        };
        Ok(Roster::new(names))
    }

    /// Use the file when one is given, otherwise the built-in roster.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Roster::default()),
        }
    }

    pub fn contains(&self, owner: &str) -> bool {
        self.members.iter().any(|m| m == owner)
    }
}
