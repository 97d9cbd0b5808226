//! Resolved operation model consumed by the binding engine.
//!
//! The model mirrors what an OpenAPI code generator hands to its post-processing
//! hook: every parameter already carries its `is*Param` location flags, schema
//! data format and target data type. This module only deserializes that model;
//! it does not parse OpenAPI documents.
//!
//! # Examples
//!
//! ```no_run
//! use lensgen_core::model::OperationModel;
//! use lensgen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let model = OperationModel::from_file_or_url("operations.yaml").await?;
//! println!("{} operations", model.operations.len());
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::lens::ParameterLocation;
use crate::Error;

// External imports (alphabetized)
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Location flags as set by the upstream OpenAPI parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationFlags {
    pub is_query_param: bool,
    pub is_path_param: bool,
    pub is_header_param: bool,
    pub is_cookie_param: bool,
    pub is_body_param: bool,
}

impl LocationFlags {
    /// Flags with exactly the given location set
    pub fn only(location: ParameterLocation) -> Self {
        let mut flags = Self::default();
        match location {
            ParameterLocation::Query => flags.is_query_param = true,
            ParameterLocation::Path => flags.is_path_param = true,
            ParameterLocation::Header => flags.is_header_param = true,
            ParameterLocation::Cookie => flags.is_cookie_param = true,
            ParameterLocation::Body => flags.is_body_param = true,
        }
        flags
    }

    /// Resolve the single location that is set.
    ///
    /// Returns the number of set flags when it is not exactly one.
    pub fn resolve(&self) -> std::result::Result<ParameterLocation, usize> {
        let set: Vec<ParameterLocation> = [
            (self.is_query_param, ParameterLocation::Query),
            (self.is_path_param, ParameterLocation::Path),
            (self.is_header_param, ParameterLocation::Header),
            (self.is_cookie_param, ParameterLocation::Cookie),
            (self.is_body_param, ParameterLocation::Body),
        ]
        .into_iter()
        .filter_map(|(flag, location)| flag.then_some(location))
        .collect();

        match set.as_slice() {
            [location] => Ok(*location),
            other => Err(other.len()),
        }
    }
}

/// A single operation parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Wire name (query key, header name, path segment name)
    pub base_name: String,
    /// In-code identifier, used to name body lenses
    #[serde(default)]
    pub param_name: String,
    #[serde(default)]
    pub data_format: Option<String>,
    /// Target value type, only meaningful for body parameters
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub flags: LocationFlags,
}

impl Parameter {
    /// Classify the parameter, failing when its location flags are inconsistent.
    pub fn location(&self, operation: &str) -> crate::Result<ParameterLocation> {
        self.flags
            .resolve()
            .map_err(|flags| Error::UnclassifiableLocation {
                operation: operation.to_string(),
                parameter: self.display_name().to_string(),
                flags,
            })
    }

    fn display_name(&self) -> &str {
        if self.base_name.is_empty() {
            &self.param_name
        } else {
            &self.base_name
        }
    }
}

/// A header declared on one of the operation's responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub base_name: String,
    #[serde(default)]
    pub data_format: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Resolved operation, read-only input to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Only used to label diagnostics
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default, alias = "allParams")]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub response_headers: Vec<ResponseHeader>,
}

impl Operation {
    /// Label used in errors and warnings; falls back to the operation's position.
    pub fn label(&self, index: usize) -> String {
        self.operation_id
            .clone()
            .unwrap_or_else(|| format!("#{}", index))
    }
}

/// Accepted document layouts: `{ operations: [...] }` or a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum ModelDocument {
    Wrapped { operations: Vec<Operation> },
    Bare(Vec<Operation>),
}

impl ModelDocument {
    fn into_model(self) -> OperationModel {
        match self {
            ModelDocument::Wrapped { operations } | ModelDocument::Bare(operations) => {
                OperationModel { operations }
            }
        }
    }
}

/// A group of operations, typically everything rendered into one API file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationModel {
    pub operations: Vec<Operation>,
}

impl OperationModel {
    /// Load a model from a file path or an http(s) URL (YAML or JSON)
    pub async fn from_file_or_url<S: AsRef<str>>(location: S) -> crate::Result<Self> {
        let location = location.as_ref();

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::from_url(url).await,
            _ => Self::from_file(location).await,
        }
    }

    /// Load several models concurrently, preserving the order of `locations`
    pub async fn load_all<S: AsRef<str>>(locations: &[S]) -> crate::Result<Vec<Self>> {
        try_join_all(locations.iter().map(Self::from_file_or_url)).await
    }

    /// Load a model from a file (YAML or JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            Error::model(format!(
                "Failed to parse operation model at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load a model from a URL (YAML or JSON)
    pub async fn from_url(url: Url) -> crate::Result<Self> {
        log::debug!("Fetching operation model from {}", url);
        let response = reqwest::get(url.clone()).await?;

        if !response.status().is_success() {
            return Err(Error::model(format!(
                "Failed to fetch operation model from {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response.text().await?;
        Self::parse_content(&content).map_err(|e| {
            Error::model(format!(
                "Failed to parse operation model from {}: {}",
                url, e
            ))
        })
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> crate::Result<Self> {
        let json_err = match serde_json::from_str::<ModelDocument>(content) {
            Ok(doc) => return Ok(doc.into_model()),
            Err(e) => e,
        };

        match serde_yaml::from_str::<ModelDocument>(content) {
            Ok(doc) => Ok(doc.into_model()),
            Err(yaml_err) => Err(Error::model(format!(
                "content is neither a valid JSON ({}) nor YAML ({}) operation model",
                json_err, yaml_err
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_bare_json_list() -> crate::Result<()> {
        let model = OperationModel::parse_content(
            r#"[{"operationId": "getPet", "allParams": [
                {"baseName": "petId", "paramName": "petId", "dataFormat": "int64",
                 "required": true, "isPathParam": true}
            ]}]"#,
        )?;
        let param = &model.operations[0].parameters[0];
        assert_eq!(param.base_name, "petId");
        assert_eq!(param.data_format.as_deref(), Some("int64"));
        assert_eq!(param.location("getPet")?, ParameterLocation::Path);
        Ok(())
    }

    #[test]
    fn test_parse_wrapped_yaml() -> crate::Result<()> {
        let yaml = r#"
operations:
  - operationId: listOrders
    parameters:
      - baseName: limit
        dataFormat: int32
        isQueryParam: true
    responseHeaders:
      - baseName: X-Rate-Limit
        dataFormat: int32
        required: true
"#;
        let model = OperationModel::parse_content(yaml)?;
        let op = &model.operations[0];
        assert_eq!(op.label(0), "listOrders");
        assert!(!op.parameters[0].required);
        assert_eq!(op.response_headers[0].base_name, "X-Rate-Limit");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = OperationModel::parse_content("operations: 12").unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn test_location_requires_exactly_one_flag() {
        let mut param = Parameter {
            base_name: "id".into(),
            ..Default::default()
        };
        assert!(matches!(
            param.location("op"),
            Err(Error::UnclassifiableLocation { flags: 0, .. })
        ));

        param.flags.is_query_param = true;
        param.flags.is_header_param = true;
        assert!(matches!(
            param.location("op"),
            Err(Error::UnclassifiableLocation { flags: 2, .. })
        ));
    }

    #[test]
    fn test_flags_only_round_trips_through_resolve() {
        for location in [
            ParameterLocation::Query,
            ParameterLocation::Path,
            ParameterLocation::Header,
            ParameterLocation::Cookie,
            ParameterLocation::Body,
        ] {
            assert_eq!(LocationFlags::only(location).resolve(), Ok(location));
        }
    }

    #[test]
    fn test_unnamed_operation_label() {
        assert_eq!(Operation::default().label(3), "#3");
    }

    #[tokio::test]
    async fn test_from_file() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("operations.json");
        tokio::fs::write(
            &file_path,
            r#"{"operations": [{"operationId": "ping"}]}"#,
        )
        .await?;

        let model = OperationModel::from_file_or_url(file_path.to_string_lossy()).await?;
        assert_eq!(model.operations.len(), 1);
        assert!(model.operations[0].parameters.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_all_keeps_order_and_fails_on_missing() -> crate::Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("a.yaml");
        let second = dir.path().join("b.yaml");
        tokio::fs::write(&first, "- operationId: a\n").await?;
        tokio::fs::write(&second, "- operationId: b\n").await?;

        let paths = vec![
            first.to_string_lossy().to_string(),
            second.to_string_lossy().to_string(),
        ];
        let models = OperationModel::load_all(&paths).await?;
        let ids: Vec<_> = models
            .iter()
            .map(|m| m.operations[0].label(0))
            .collect();
        assert_eq!(ids, vec!["a", "b"]);

        let missing = vec![dir.path().join("nope.yaml").to_string_lossy().to_string()];
        assert!(matches!(
            OperationModel::load_all(&missing).await,
            Err(Error::Io(_))
        ));
        Ok(())
    }
}
