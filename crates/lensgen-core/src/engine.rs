//! Parameter-to-binding mapping engine.
//!
//! [`BindingEngine::compute_bindings`] walks every parameter and response header
//! of a group of operations and derives one named http4k lens declaration per
//! distinct (wire name, data format, location) together with the imports those
//! declarations need. The engine holds nothing but its [`Config`]; every call
//! builds its own accumulators, so an engine can be shared across threads.
//!
//! # Examples
//!
//! ```
//! use lensgen_core::engine::BindingEngine;
//! use lensgen_core::lens::ParameterLocation;
//! use lensgen_core::model::{LocationFlags, Operation, Parameter};
//!
//! let op = Operation {
//!     parameters: vec![Parameter {
//!         base_name: "id".into(),
//!         data_format: Some("uuid".into()),
//!         required: true,
//!         flags: LocationFlags::only(ParameterLocation::Query),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let bindings = BindingEngine::default().compute_bindings(&[op]).unwrap();
//! let lens = bindings.declaration("idUuidQueryLens").unwrap();
//! assert_eq!(lens.definition, r#"Query.uuid().required("id")"#);
//! assert!(bindings.imports.contains(&"org.http4k.lens.uuid".to_string()));
//! ```

// Internal imports (std, crate)
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::config::{CollisionPolicy, Config};
use crate::lens::{
    AccessMethod, LensKind, ParameterLocation, BODY_IMPORT, NO_DATA_TYPE_SENTINEL,
    NO_PARAM_NAME_SENTINEL,
};
use crate::model::{Operation, Parameter, ResponseHeader};
use crate::utils::{camel_case, title_case};
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// A named lens constructor expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDeclaration {
    /// Unique key; equal names denote the same binding
    pub name: String,
    pub definition: String,
}

/// Non-fatal problem found while deriving bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingWarning {
    /// The data format has no lens; the sentinel was emitted instead
    UnsupportedFormat {
        declaration: String,
        format: Option<String>,
    },
    /// A body parameter without a data type
    MissingBodyType { declaration: String },
    /// A body parameter without a `paramName` to name its lens after
    MissingBodyName {
        operation: String,
        declaration: String,
    },
    /// Two parameters produced the same name with different definitions
    DefinitionOverwritten {
        name: String,
        kept: String,
        discarded: String,
    },
}

impl fmt::Display for BindingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingWarning::UnsupportedFormat {
                declaration,
                format: Some(format),
            } => write!(f, "{}: no lens for data format '{}'", declaration, format),
            BindingWarning::UnsupportedFormat {
                declaration,
                format: None,
            } => write!(f, "{}: no data format declared", declaration),
            BindingWarning::MissingBodyType { declaration } => {
                write!(f, "{}: body parameter has no data type", declaration)
            }
            BindingWarning::MissingBodyName {
                operation,
                declaration,
            } => write!(
                f,
                "{}: body parameter of operation '{}' has no param name",
                declaration, operation
            ),
            BindingWarning::DefinitionOverwritten {
                name,
                kept,
                discarded,
            } => write!(
                f,
                "{}: kept '{}', discarded conflicting '{}'",
                name, kept, discarded
            ),
        }
    }
}

/// Output of one engine run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingSet {
    /// Declarations in order of first appearance
    pub declarations: Vec<BindingDeclaration>,
    /// Sorted, deduplicated import identifiers
    pub imports: Vec<String>,
    pub warnings: Vec<BindingWarning>,
}

impl BindingSet {
    pub fn declaration(&self, name: &str) -> Option<&BindingDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Union two independently computed sets.
    ///
    /// Imports and warnings merge as sets. Declarations of `other` are applied
    /// after those of `self` under `policy`, so groups resolve collisions in
    /// group order. The parameter pass before response header pass ordering of
    /// [`BindingEngine::compute_bindings`] holds within each group only: a
    /// response header of `self` is declared before a parameter of `other`.
    ///
    /// Warnings carried over from `other` were logged when that group was
    /// computed and are not logged again.
    pub fn merge(self, other: BindingSet, policy: CollisionPolicy) -> crate::Result<BindingSet> {
        let mut acc = Accumulator::seeded(self, policy);
        for warning in other.warnings {
            acc.record(warning);
        }
        acc.imports.extend(other.imports);
        for declaration in other.declarations {
            acc.declare(declaration.name, declaration.definition)?;
        }
        Ok(acc.finish(&[]))
    }
}

/// Derives lens declarations and imports from resolved operations
#[derive(Debug, Clone, Default)]
pub struct BindingEngine {
    config: Config,
}

impl BindingEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the bindings for one group of operations.
    ///
    /// Fails on the first parameter whose location cannot be classified, or on a
    /// conflicting redefinition under [`CollisionPolicy::Strict`]; no partial
    /// output is returned in either case.
    pub fn compute_bindings(&self, operations: &[Operation]) -> crate::Result<BindingSet> {
        let mut acc = Accumulator::new(self.config.collision_policy);

        for (index, operation) in operations.iter().enumerate() {
            let label = operation.label(index);
            for param in &operation.parameters {
                self.bind_parameter(&mut acc, &label, param)?;
            }
        }

        // Response headers are a second pass so request lenses keep their positions.
        for operation in operations {
            for header in &operation.response_headers {
                self.bind_response_header(&mut acc, header)?;
            }
        }

        let bindings = acc.finish(&self.config.base_imports);
        log::debug!(
            "Derived {} declarations and {} imports from {} operations",
            bindings.declarations.len(),
            bindings.imports.len(),
            operations.len()
        );
        Ok(bindings)
    }

    fn bind_parameter(
        &self,
        acc: &mut Accumulator,
        operation: &str,
        param: &Parameter,
    ) -> crate::Result<()> {
        let location = param.location(operation)?;
        let kind = location.token();

        if location == ParameterLocation::Body {
            let name = if param.param_name.is_empty() {
                let name = format!("{}{}Lens", NO_PARAM_NAME_SENTINEL, kind);
                acc.warn(BindingWarning::MissingBodyName {
                    operation: operation.to_string(),
                    declaration: name.clone(),
                });
                name
            } else {
                format!("{}{}Lens", param.param_name, kind)
            };
            let data_type = match param.data_type.as_deref().filter(|t| !t.is_empty()) {
                Some(data_type) => data_type,
                None => {
                    acc.warn(BindingWarning::MissingBodyType {
                        declaration: name.clone(),
                    });
                    NO_DATA_TYPE_SENTINEL
                }
            };
            acc.import(BODY_IMPORT);
            acc.import(&self.config.lens_spec_import);
            return acc.declare(name, format!("{}.auto<{}>().toLens()", kind, data_type));
        }

        let access = AccessMethod::for_parameter(location, param.required);
        let name = format!(
            "{}{}{}Lens",
            param.base_name,
            title_case(param.data_format.as_deref().unwrap_or_default()),
            kind
        );
        acc.import(location.import());
        self.declare_lens(acc, name, kind, param.data_format.as_deref(), access, &param.base_name)
    }

    fn bind_response_header(
        &self,
        acc: &mut Accumulator,
        header: &ResponseHeader,
    ) -> crate::Result<()> {
        let location = ParameterLocation::Header;
        let access = AccessMethod::for_response_header(header.required);
        let name = format!(
            "{}{}{}Lens",
            camel_case(&header.base_name),
            title_case(header.data_format.as_deref().unwrap_or_default()),
            location.token()
        );
        acc.import(location.import());
        self.declare_lens(
            acc,
            name,
            location.token(),
            header.data_format.as_deref(),
            access,
            &header.base_name,
        )
    }

    fn declare_lens(
        &self,
        acc: &mut Accumulator,
        name: String,
        kind: &str,
        data_format: Option<&str>,
        access: AccessMethod,
        base_name: &str,
    ) -> crate::Result<()> {
        let lens = LensKind::from_format(data_format);
        if !lens.is_supported() {
            acc.warn(BindingWarning::UnsupportedFormat {
                declaration: name.clone(),
                format: data_format.map(String::from),
            });
        }
        acc.import(&lens.import());
        let definition = format!("{}.{}().{}(\"{}\")", kind, lens, access, base_name);
        acc.declare(name, definition)
    }
}

/// Compute bindings with the default configuration
pub fn compute_bindings(operations: &[Operation]) -> crate::Result<BindingSet> {
    BindingEngine::default().compute_bindings(operations)
}

/// Per-call state: insertion-ordered declarations plus import and warning sets
struct Accumulator {
    policy: CollisionPolicy,
    positions: HashMap<String, usize>,
    declarations: Vec<BindingDeclaration>,
    imports: BTreeSet<String>,
    warnings: Vec<BindingWarning>,
}

impl Accumulator {
    fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            positions: HashMap::new(),
            declarations: Vec::new(),
            imports: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    fn seeded(set: BindingSet, policy: CollisionPolicy) -> Self {
        let mut acc = Self::new(policy);
        acc.positions = set
            .declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        acc.declarations = set.declarations;
        acc.imports = set.imports.into_iter().collect();
        acc.warnings = set.warnings;
        acc
    }

    fn import(&mut self, import: &str) {
        if !self.imports.contains(import) {
            self.imports.insert(import.to_string());
        }
    }

    /// Record and log a newly found warning
    fn warn(&mut self, warning: BindingWarning) {
        if !self.warnings.contains(&warning) {
            log::warn!("{}", warning);
            self.warnings.push(warning);
        }
    }

    /// Record a warning that was already logged
    fn record(&mut self, warning: BindingWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    fn declare(&mut self, name: String, definition: String) -> crate::Result<()> {
        let Some(&position) = self.positions.get(&name) else {
            log::debug!("Declaring {} = {}", name, definition);
            self.positions.insert(name.clone(), self.declarations.len());
            self.declarations.push(BindingDeclaration { name, definition });
            return Ok(());
        };

        let existing = &mut self.declarations[position];
        if existing.definition == definition {
            return Ok(());
        }

        let warning = match self.policy {
            CollisionPolicy::Strict => {
                return Err(Error::DefinitionConflict {
                    name,
                    existing: existing.definition.clone(),
                    incoming: definition,
                });
            }
            CollisionPolicy::LastWins => {
                let discarded = std::mem::replace(&mut existing.definition, definition);
                BindingWarning::DefinitionOverwritten {
                    name,
                    kept: existing.definition.clone(),
                    discarded,
                }
            }
            CollisionPolicy::FirstWins => BindingWarning::DefinitionOverwritten {
                name,
                kept: existing.definition.clone(),
                discarded: definition,
            },
        };
        self.warn(warning);
        Ok(())
    }

    fn finish(mut self, base_imports: &[String]) -> BindingSet {
        for import in base_imports {
            self.import(import);
        }
        BindingSet {
            declarations: self.declarations,
            imports: self.imports.into_iter().collect(),
            warnings: self.warnings,
        }
    }
}
