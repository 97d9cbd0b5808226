//! Lookup tables mapping parameter locations and data formats to http4k lens tokens.
//!
//! Every table is an exhaustive `match` over an enum, so a new location or
//! lens kind will not compile until each table has a row for it.
//!
//! # Examples
//!
//! ```
//! use lensgen_core::lens::{AccessMethod, LensKind, ParameterLocation};
//!
//! assert_eq!(ParameterLocation::Cookie.token(), "Cookies");
//! assert_eq!(LensKind::from_format(Some("int64")), LensKind::Int);
//! assert_eq!(
//!     AccessMethod::for_parameter(ParameterLocation::Path, false),
//!     AccessMethod::Of
//! );
//! ```

// Internal imports (std, crate)
use std::fmt;

/// Package holding the http4k lens namespaces
pub const LENS_PACKAGE: &str = "org.http4k.lens";

/// Import required by every body lens
pub const BODY_IMPORT: &str = "org.http4k.core.Body";

/// Emitted in place of a lens token when a data format has no lens
pub const NO_LENS_SENTINEL: &str = "<no lens map found>";

/// Emitted in place of the target type when a body parameter has no data type
pub const NO_DATA_TYPE_SENTINEL: &str = "<no data type found>";

/// Emitted in place of the lens name prefix when a body parameter has no `paramName`
pub const NO_PARAM_NAME_SENTINEL: &str = "<no param name found>";

/// Transport position of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
    Body,
}

impl ParameterLocation {
    /// Lens namespace used both in the declaration name and its definition
    pub const fn token(self) -> &'static str {
        match self {
            ParameterLocation::Query => "Query",
            ParameterLocation::Path => "Path",
            ParameterLocation::Header => "Header",
            ParameterLocation::Cookie => "Cookies",
            ParameterLocation::Body => "Body",
        }
    }

    /// Import that brings the location's lens namespace into scope
    pub const fn import(self) -> &'static str {
        match self {
            ParameterLocation::Query => "org.http4k.lens.Query",
            ParameterLocation::Path => "org.http4k.lens.Path",
            ParameterLocation::Header => "org.http4k.lens.Header",
            ParameterLocation::Cookie => "org.http4k.lens.Cookies",
            ParameterLocation::Body => BODY_IMPORT,
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Format-specific extraction routine selected for a non-body parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LensKind {
    Uuid,
    Int,
    /// No lens exists for the format; rendered as [`NO_LENS_SENTINEL`]
    Unsupported,
}

impl LensKind {
    /// Look up the lens kind for a schema data format
    pub fn from_format(format: Option<&str>) -> Self {
        match format {
            Some("uuid") => LensKind::Uuid,
            Some("int32") | Some("int64") => LensKind::Int,
            _ => LensKind::Unsupported,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            LensKind::Uuid => "uuid",
            LensKind::Int => "int",
            LensKind::Unsupported => NO_LENS_SENTINEL,
        }
    }

    pub const fn is_supported(self) -> bool {
        !matches!(self, LensKind::Unsupported)
    }

    /// Import for the lens function, e.g. `org.http4k.lens.uuid`
    pub fn import(self) -> String {
        format!("{}.{}", LENS_PACKAGE, self.token())
    }
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// How the lens extracts its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMethod {
    /// Unconditional extraction, used for path segments
    Of,
    Required,
    Optional,
}

impl AccessMethod {
    /// Path parameters always use `of`; `required` is ignored for them.
    pub fn for_parameter(location: ParameterLocation, required: bool) -> Self {
        match location {
            ParameterLocation::Path => AccessMethod::Of,
            _ => Self::for_presence(required),
        }
    }

    /// Response headers never use `of`.
    pub fn for_response_header(required: bool) -> Self {
        Self::for_presence(required)
    }

    fn for_presence(required: bool) -> Self {
        if required {
            AccessMethod::Required
        } else {
            AccessMethod::Optional
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AccessMethod::Of => "of",
            AccessMethod::Required => "required",
            AccessMethod::Optional => "optional",
        }
    }
}

impl fmt::Display for AccessMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: [ParameterLocation; 5] = [
        ParameterLocation::Query,
        ParameterLocation::Path,
        ParameterLocation::Header,
        ParameterLocation::Cookie,
        ParameterLocation::Body,
    ];

    #[test]
    fn test_location_tokens_and_imports() {
        let rows: Vec<_> = LOCATIONS.iter().map(|l| (l.token(), l.import())).collect();
        assert_eq!(
            rows,
            vec![
                ("Query", "org.http4k.lens.Query"),
                ("Path", "org.http4k.lens.Path"),
                ("Header", "org.http4k.lens.Header"),
                ("Cookies", "org.http4k.lens.Cookies"),
                ("Body", "org.http4k.core.Body"),
            ]
        );
    }

    #[test]
    fn test_lens_kind_from_format() {
        assert_eq!(LensKind::from_format(Some("uuid")), LensKind::Uuid);
        assert_eq!(LensKind::from_format(Some("int32")), LensKind::Int);
        assert_eq!(LensKind::from_format(Some("int64")), LensKind::Int);
        assert_eq!(LensKind::from_format(Some("date-time")), LensKind::Unsupported);
        assert_eq!(LensKind::from_format(Some("UUID")), LensKind::Unsupported);
        assert_eq!(LensKind::from_format(None), LensKind::Unsupported);
    }

    #[test]
    fn test_unsupported_lens_renders_sentinel() {
        assert_eq!(LensKind::Unsupported.to_string(), "<no lens map found>");
        assert_eq!(
            LensKind::Unsupported.import(),
            "org.http4k.lens.<no lens map found>"
        );
        assert!(!LensKind::Unsupported.is_supported());
        assert_eq!(LensKind::Int.import(), "org.http4k.lens.int");
    }

    #[test]
    fn test_path_access_ignores_required() {
        for required in [true, false] {
            assert_eq!(
                AccessMethod::for_parameter(ParameterLocation::Path, required),
                AccessMethod::Of
            );
        }
    }

    #[test]
    fn test_presence_access_for_other_locations() {
        for location in [
            ParameterLocation::Query,
            ParameterLocation::Header,
            ParameterLocation::Cookie,
        ] {
            assert_eq!(
                AccessMethod::for_parameter(location, true).as_str(),
                "required"
            );
            assert_eq!(
                AccessMethod::for_parameter(location, false).as_str(),
                "optional"
            );
        }
        assert_eq!(AccessMethod::for_response_header(true), AccessMethod::Required);
        assert_eq!(AccessMethod::for_response_header(false), AccessMethod::Optional);
    }
}
