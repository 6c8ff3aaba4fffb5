use serde::Deserialize;
use serde_yaml::{Deserializer, Value as YamlValue};
use std::{
    fs::{read_dir, read_to_string},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    common::data::FakeEndpoint,
    server::persistence::Error::{DeserializationError, FileReadError},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read from endpoint file '{0}': {1}")]
    FileReadError(PathBuf, std::io::Error),
    #[error("cannot deserialize endpoints from '{0}': {1}")]
    DeserializationError(PathBuf, serde_yaml::Error),
}

/// Reads fake endpoints from a YAML or JSON file. If `path` is a directory, every `*.yaml`,
/// `*.yml` and `*.json` file in it is read in file name order.
pub fn read_endpoints<P: AsRef<Path>>(path: P) -> Result<Vec<FakeEndpoint>, Error> {
    let path = path.as_ref();

    if !path.is_dir() {
        return read_endpoint_file(path);
    }

    let mut file_paths = Vec::new();
    for entry in read_dir(path).map_err(|err| FileReadError(path.to_path_buf(), err))? {
        let file_path = entry
            .map_err(|err| FileReadError(path.to_path_buf(), err))?
            .path();
        let is_config = file_path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml" || ext == "json");
        if is_config {
            file_paths.push(file_path);
        }
    }
    file_paths.sort();

    let mut endpoints = Vec::new();
    for file_path in file_paths {
        endpoints.extend(read_endpoint_file(&file_path)?);
    }

    Ok(endpoints)
}

fn read_endpoint_file(path: &Path) -> Result<Vec<FakeEndpoint>, Error> {
    tracing::info!("Loading endpoints from '{}'", path.to_string_lossy());

    let content = read_to_string(path).map_err(|err| FileReadError(path.to_path_buf(), err))?;
    let endpoints = deserialize_endpoints_from_yaml(&content)
        .map_err(|err| DeserializationError(path.to_path_buf(), err))?;

    tracing::debug!(
        "Loaded {} endpoints from '{}'",
        endpoints.len(),
        path.to_string_lossy()
    );
    Ok(endpoints)
}

/// Parses a list of endpoints. Multiple YAML documents are concatenated in order, empty
/// documents are skipped.
pub fn deserialize_endpoints_from_yaml(content: &str) -> Result<Vec<FakeEndpoint>, serde_yaml::Error> {
    let mut endpoints = Vec::new();

    for document in Deserializer::from_str(content) {
        let value = YamlValue::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        let definitions: Vec<FakeEndpoint> = serde_yaml::from_value(value)?;
        endpoints.extend(definitions);
    }

    Ok(endpoints)
}
