//! JSON fixture loading for the ephemeral store.
//!
//! A fixture file is either an object keyed by id (`{"1": {...}, "2": {...}}`)
//! or a plain array of records. Keys are ignored; each record carries its own
//! `id`. Unknown fields such as `active` are skipped.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use db::models::{PropertyRow, UserRow};

use crate::StoreError;

pub const USERS_FILE: &str = "users.json";
pub const PROPERTIES_FILE: &str = "properties.json";

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile<T> {
    Keyed(BTreeMap<String, T>),
    List(Vec<T>),
}

impl<T> FixtureFile<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Self::Keyed(map) => map.into_values().collect(),
            Self::List(list) => list,
        }
    }
}

/// Parse fixture `text`; `path` is only used in error messages.
pub fn parse_records<T: DeserializeOwned>(path: &Path, text: &str) -> Result<Vec<T>, StoreError> {
    let file: FixtureFile<T> =
        serde_json::from_str(text).map_err(|source| StoreError::FixtureParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.into_records())
}

async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::FixtureIo {
            path: path.to_path_buf(),
            source,
        })?;
    parse_records(path, &text)
}

/// Read `users.json` and `properties.json` from `dir`.
pub async fn load_dir(dir: &Path) -> Result<(Vec<UserRow>, Vec<PropertyRow>), StoreError> {
    let users = read_records(&dir.join(USERS_FILE)).await?;
    let properties = read_records(&dir.join(PROPERTIES_FILE)).await?;
    Ok((users, properties))
}
