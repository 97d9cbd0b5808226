//! Template context for the external renderer.
//!
//! The api templates iterate `imports` (one `import` key per entry) and
//! `otherLenses` (`name` / `definition` pairs). `bodyLenses` is kept in the
//! context for older templates and is always empty: body lenses are emitted
//! with the others.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::engine::{BindingDeclaration, BindingSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub import: String,
}

/// Serializable view of a [`BindingSet`] in the shape the templates expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub imports: Vec<ImportEntry>,
    pub body_lenses: Vec<BindingDeclaration>,
    pub other_lenses: Vec<BindingDeclaration>,
    /// Human readable warnings, so a template can surface them as comments
    pub warnings: Vec<String>,
}

impl From<&BindingSet> for RenderContext {
    fn from(bindings: &BindingSet) -> Self {
        Self {
            imports: bindings
                .imports
                .iter()
                .map(|import| ImportEntry {
                    import: import.clone(),
                })
                .collect(),
            body_lenses: Vec::new(),
            other_lenses: bindings.declarations.clone(),
            warnings: bindings.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

impl RenderContext {
    pub fn to_json(&self) -> crate::Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_pretty_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BindingWarning;
    use serde_json::json;

    #[test]
    fn test_context_shape() -> crate::Result<()> {
        let bindings = BindingSet {
            declarations: vec![BindingDeclaration {
                name: "idUuidQueryLens".into(),
                definition: r#"Query.uuid().required("id")"#.into(),
            }],
            imports: vec!["org.http4k.lens.Query".into(), "org.http4k.lens.uuid".into()],
            warnings: vec![BindingWarning::MissingBodyType {
                declaration: "blobBodyLens".into(),
            }],
        };

        let value = RenderContext::from(&bindings).to_json()?;
        assert_eq!(
            value,
            json!({
                "imports": [
                    {"import": "org.http4k.lens.Query"},
                    {"import": "org.http4k.lens.uuid"}
                ],
                "bodyLenses": [],
                "otherLenses": [
                    {"name": "idUuidQueryLens", "definition": "Query.uuid().required(\"id\")"}
                ],
                "warnings": ["blobBodyLens: body parameter has no data type"]
            })
        );
        Ok(())
    }
}
