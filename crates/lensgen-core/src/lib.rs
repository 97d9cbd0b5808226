//! lensgen Core Library
//!
//! This library derives http4k lens declarations, and the imports they need,
//! from the parameters and response headers of resolved OpenAPI operations.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod lens;
pub mod model;
pub mod utils;

pub use crate::{
    config::{CollisionPolicy, Config},
    context::RenderContext,
    engine::{compute_bindings, BindingDeclaration, BindingEngine, BindingSet, BindingWarning},
    error::{Error, Result},
    model::{Operation, OperationModel, Parameter, ResponseHeader},
};
