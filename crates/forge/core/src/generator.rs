//! The generation pipeline.
//!
//! validate → plan → render → emit. Validation failures stop the pipeline
//! before any planning; composition errors surface as defects.

use crate::catalog::FeatureCatalog;
use crate::emitter::{emit, GeneratedArtifact};
use crate::error::{ForgeError, ForgeResult};
use crate::planner::plan;
use crate::render::render;
use crate::types::{GeneratorConfig, TokenSpec};
use crate::validation::validate;

/// Generate contract source for a TokenSpec.
///
/// Pure in `(catalog, spec, config)`: identical inputs give identical
/// artifacts.
pub fn generate(
    catalog: &FeatureCatalog,
    spec: &TokenSpec,
    config: &GeneratorConfig,
) -> ForgeResult<GeneratedArtifact> {
    let span = tracing::debug_span!("generate", token = %spec.name, symbol = %spec.symbol);
    let _guard = span.enter();

    validate(catalog, spec).map_err(ForgeError::Validation)?;
    let plan = plan(catalog, spec)?;
    let rendered = render(&plan, spec, config)?;
    let artifact = emit(&rendered);

    tracing::info!(
        contract = %artifact.contract_name,
        features = artifact.enabled_feature_ids.len(),
        lines = artifact.line_count(),
        "token contract generated"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureConfig;

    #[test]
    fn invalid_spec_never_reaches_planning() {
        // Unknown feature would be a planning defect; validation fails first.
        let spec = TokenSpec::new("", "MOON", "1000", 18).with_feature("staking", FeatureConfig::enabled());
        let err = generate(&FeatureCatalog::standard(), &spec, &GeneratorConfig::default()).unwrap_err();
        assert!(!err.is_defect());
        assert_eq!(err.validation_errors().unwrap().len(), 1);
    }

    #[test]
    fn unknown_feature_on_valid_spec_is_defect() {
        let spec = TokenSpec::new("Moon", "MOON", "1000", 18).with_feature("staking", FeatureConfig::enabled());
        let err = generate(&FeatureCatalog::standard(), &spec, &GeneratorConfig::default()).unwrap_err();
        assert!(err.is_defect());
    }

    #[test]
    fn license_comes_from_config() {
        let spec = TokenSpec::new("Moon", "MOON", "1000", 18);
        let config = GeneratorConfig {
            license: "Apache-2.0".into(),
            ..GeneratorConfig::default()
        };
        let artifact = generate(&FeatureCatalog::standard(), &spec, &config).unwrap();
        assert!(artifact
            .source_text
            .starts_with("// SPDX-License-Identifier: Apache-2.0\n"));
    }
}
