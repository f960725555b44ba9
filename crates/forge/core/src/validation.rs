//! Validation layer.
//!
//! Checks a `TokenSpec` against the catalog before any generation is
//! attempted. Every violation is collected; nothing short-circuits.
//! Errors are ordered: base attributes, then features in catalog order,
//! then parameters in declaration order.

use crate::address::is_address;
use crate::catalog::{FeatureCatalog, FeatureDefinition, ParameterDefinition, ParameterType};
use crate::error::ValidationError;
use crate::types::{FeatureConfig, ParameterValue, TokenSpec};

/// Feature id used for base token attribute errors.
pub const TOKEN_SCOPE: &str = "token";

/// Largest decimals value accepted.
pub const MAX_DECIMALS: u8 = 18;

/// Largest symbol length accepted.
pub const MAX_SYMBOL_LEN: usize = 11;

/// `supply * 10^decimals` must stay below 2^256 (~1.16e77).
const MAX_SCALED_DIGITS: usize = 77;

const STEP_TOLERANCE: f64 = 1e-6;

/// Validate a TokenSpec. Pure function of (catalog, spec).
pub fn validate(catalog: &FeatureCatalog, spec: &TokenSpec) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_base(spec, &mut errors);

    for feature in catalog.all() {
        if let Some(config) = spec.enabled_feature(feature.id.as_str()) {
            validate_feature(feature, config, &mut errors);
        }
    }

    for id in spec.features.keys() {
        if catalog.find(id).is_none() {
            // Not user-facing; the planner rejects it as a defect.
            tracing::warn!(feature = %id, "token spec references a feature outside the catalog");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "token spec failed validation");
        Err(errors)
    }
}

fn base_error(parameter: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::new(TOKEN_SCOPE, parameter, reason)
}

fn validate_base(spec: &TokenSpec, errors: &mut Vec<ValidationError>) {
    let name = spec.name.trim();
    if name.is_empty() {
        errors.push(base_error("name", "required parameter is missing"));
    } else if name.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        errors.push(base_error(
            "name",
            "must not contain quotes, backslashes or control characters",
        ));
    } else if spec.contract_name().is_empty() {
        errors.push(base_error("name", "must contain at least one ASCII letter or digit"));
    }

    let symbol = spec.symbol.trim();
    if symbol.is_empty() {
        errors.push(base_error("symbol", "required parameter is missing"));
    } else if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(base_error("symbol", "must contain only ASCII letters and digits"));
    } else if symbol.len() > MAX_SYMBOL_LEN {
        errors.push(base_error(
            "symbol",
            format!("must be at most {} characters", MAX_SYMBOL_LEN),
        ));
    }

    let supply = spec.total_supply.trim();
    if supply.is_empty() {
        errors.push(base_error("totalSupply", "required parameter is missing"));
    } else if !supply.chars().all(|c| c.is_ascii_digit()) {
        errors.push(base_error("totalSupply", "must be a whole number"));
    } else {
        let significant = supply.trim_start_matches('0');
        if significant.is_empty() {
            errors.push(base_error("totalSupply", "must be greater than zero"));
        } else if significant.len() + usize::from(spec.decimals) > MAX_SCALED_DIGITS {
            errors.push(base_error(
                "totalSupply",
                "supply scaled by decimals does not fit in uint256",
            ));
        }
    }

    if spec.decimals > MAX_DECIMALS {
        errors.push(base_error(
            "decimals",
            format!("must be at most {}", MAX_DECIMALS),
        ));
    }
}

fn validate_feature(
    feature: &FeatureDefinition,
    config: &FeatureConfig,
    errors: &mut Vec<ValidationError>,
) {
    for param in &feature.parameters {
        let value = config.parameters.get(&param.id).filter(|v| !v.is_blank());
        match value {
            None if param.required => errors.push(ValidationError::new(
                feature.id.as_str(),
                param.id.as_str(),
                "required parameter is missing",
            )),
            None => {}
            Some(value) => {
                if let Err(reason) = check_value(param, value) {
                    errors.push(ValidationError::new(
                        feature.id.as_str(),
                        param.id.as_str(),
                        reason,
                    ));
                }
            }
        }
    }

    for key in config.parameters.keys() {
        if feature.parameter(key).is_none() {
            tracing::warn!(feature = %feature.id, parameter = %key, "ignoring undeclared parameter");
        }
    }
}

/// Check one present value against its schema.
fn check_value(param: &ParameterDefinition, value: &ParameterValue) -> Result<(), String> {
    match param.param_type {
        ParameterType::Number => {
            let n = value
                .as_number()
                .ok_or_else(|| format!("expected a number, got {}", value.kind_name()))?;
            if !n.is_finite() {
                return Err("must be a finite number".into());
            }
            if let Some(min) = param.min {
                if n < min {
                    return Err(format!("must be at least {}", min));
                }
            }
            if let Some(max) = param.max {
                if n > max {
                    return Err(format!("must be at most {}", max));
                }
            }
            if let Some(step) = param.step.filter(|s| *s > 0.0) {
                let steps = (n - param.min.unwrap_or(0.0)) / step;
                if (steps - steps.round()).abs() > STEP_TOLERANCE {
                    return Err(format!("must be a multiple of {}", step));
                }
            }
            Ok(())
        }
        ParameterType::Boolean => value
            .as_bool()
            .map(|_| ())
            .ok_or_else(|| format!("expected a boolean, got {}", value.kind_name())),
        ParameterType::Select => {
            let choice = value
                .as_text()
                .ok_or_else(|| format!("expected one of the options, got {}", value.kind_name()))?;
            if param.options.iter().any(|o| o == choice) {
                Ok(())
            } else {
                Err(format!("must be one of: {}", param.options.join(", ")))
            }
        }
        ParameterType::Text => {
            let text = value
                .as_text()
                .ok_or_else(|| format!("expected text, got {}", value.kind_name()))?;
            if param.address && !is_address(text) {
                return Err("must be a 0x-prefixed 40-digit hexadecimal address".into());
            }
            Ok(())
        }
    }
}
