//! Generation error types.
//!
//! The pipeline has exactly two failure kinds:
//! - [`ValidationError`]: user-correctable and field-addressable. Always
//!   reported as a complete list before any planning happens.
//! - [`CompositionError`]: an internal defect. The catalog, planner and
//!   renderers disagree with each other. Never shown to an end user as an
//!   actionable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{FeatureId, HookPoint};

// ── Validation ───────────────────────────────────────────────────────

/// A single field-addressable problem with a TokenSpec.
///
/// Base token attributes are reported under the feature id `token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub feature_id: String,
    pub parameter_id: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        feature_id: impl Into<String>,
        parameter_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            feature_id: feature_id.into(),
            parameter_id: parameter_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error addresses the given feature and parameter.
    pub fn addresses(&self, feature_id: &str, parameter_id: &str) -> bool {
        self.feature_id == feature_id && self.parameter_id == parameter_id
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.feature_id, self.parameter_id, self.reason)
    }
}

// ── Composition ──────────────────────────────────────────────────────

/// Catalog/planner/renderer mismatch. Indicates a programming error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// The TokenSpec names a feature the catalog does not define.
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    /// Two catalog entries share an id.
    #[error("feature '{0}' is registered twice")]
    DuplicateFeature(FeatureId),

    /// A catalog entry violates its own declaration invariants.
    #[error("invalid catalog entry '{feature}': {reason}")]
    InvalidCatalog { feature: FeatureId, reason: String },

    /// A transfer stage consumes a value produced by a later stage.
    #[error("stage '{consumer}' consumes '{value}' before producer '{producer}' runs")]
    DependencyOrder {
        consumer: FeatureId,
        producer: FeatureId,
        value: String,
    },

    /// Transfer stages form a dependency cycle.
    #[error("transfer stage dependency cycle through {0:?}")]
    DependencyCycle(Vec<FeatureId>),

    /// Two active contributors declare the same administrative function.
    #[error("admin function '{name}' declared by both '{first}' and '{second}'")]
    DuplicateAdminFunction {
        name: String,
        first: String,
        second: String,
    },

    /// The plan expects a fragment the feature's renderer did not produce.
    #[error("renderer for '{feature}' produced no fragment for {hook}")]
    MissingFragment { feature: FeatureId, hook: HookPoint },

    /// A renderer produced output for a hook point it never declared.
    #[error("renderer for '{feature}' produced an undeclared {hook} fragment")]
    UnexpectedFragment { feature: FeatureId, hook: HookPoint },

    /// A validated parameter is unexpectedly absent or mistyped.
    #[error("parameter '{parameter}' of '{feature}' is unavailable after validation")]
    MissingParameter { feature: FeatureId, parameter: String },
}

// ── Top level ────────────────────────────────────────────────────────

/// Outcome of a failed generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// The TokenSpec is invalid; nothing was generated.
    #[error("token specification rejected with {} validation error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Internal defect; surfaced to developers and logs only.
    #[error("internal composition defect: {0}")]
    Composition(#[from] CompositionError),
}

impl ForgeError {
    /// Validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Composition(_) => None,
        }
    }

    /// Whether the error is an internal defect rather than bad input.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Composition(_))
    }
}

/// Result type for generation operations.
pub type ForgeResult<T> = Result<T, ForgeError>;
