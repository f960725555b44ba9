//! Feature catalog.
//!
//! Static registry of every feature module, its parameter schema, the
//! hook points it contributes to, its transfer stage (priority and
//! dataflow), the shared capabilities it needs and the administrative
//! setters it declares. Catalog order is the emission tie-break order.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::CompositionError;
use crate::types::{Capability, FeatureConfig, FeatureId, HookPoint, ParameterValue, SharedValue};

/// Catalog feature ids.
pub mod ids {
    pub const TAX: &str = "tax";
    pub const ANTIBOT: &str = "antibot";
    pub const REFLECTION: &str = "reflection";
    pub const AUTO_LIQUIDITY: &str = "autoLiquidity";
    pub const TIMELOCK: &str = "timelock";
}

/// Parameter ids, grouped by feature.
pub mod params {
    pub const BUY_TAX: &str = "buyTax";
    pub const SELL_TAX: &str = "sellTax";
    pub const LIQUIDITY_SHARE: &str = "liquidityShare";
    pub const MARKETING_SHARE: &str = "marketingShare";
    pub const MARKETING_WALLET: &str = "marketingWallet";
    pub const SWAP_THRESHOLD: &str = "swapThreshold";

    pub const MAX_TX_AMOUNT: &str = "maxTxAmount";
    pub const MAX_WALLET_AMOUNT: &str = "maxWalletAmount";
    pub const ENABLE_BLACKLIST: &str = "enableBlacklist";

    pub const REFLECTION_PERCENT: &str = "reflectionPercent";

    pub const LIQUIDITY_PERCENT: &str = "liquidityPercent";
    pub const LIQUIDITY_THRESHOLD: &str = "liquidityThreshold";

    pub const FUNCTIONS_TO_TIMELOCK: &str = "functionsToTimelock";
    pub const DELAY_HOURS: &str = "delayHours";
}

/// Administrative setter names.
pub mod admin {
    pub const SET_BUY_TAX: &str = "setBuyTax";
    pub const SET_SELL_TAX: &str = "setSellTax";
    pub const SET_TAX_SHARES: &str = "setTaxShares";
    pub const SET_MARKETING_WALLET: &str = "setMarketingWallet";
    pub const SET_TAX_SWAP_THRESHOLD: &str = "setTaxSwapThreshold";

    pub const SET_MAX_TX_AMOUNT: &str = "setMaxTxAmount";
    pub const SET_MAX_WALLET_AMOUNT: &str = "setMaxWalletAmount";
    pub const SET_LIMIT_EXEMPTION: &str = "setLimitExemption";
    pub const SET_BLACKLIST: &str = "setBlacklist";

    pub const TRANSFER_OWNERSHIP: &str = "transferOwnership";
    pub const RENOUNCE_OWNERSHIP: &str = "renounceOwnership";
}

/// Fixed transfer-stage priorities. Lower runs first.
pub mod priority {
    pub const ANTIBOT: u32 = 100;
    pub const TAX: u32 = 200;
    pub const REFLECTION: u32 = 300;
    pub const AUTO_LIQUIDITY: u32 = 400;
}

/// Upper bound for buy/sell tax, shared with the generated setter guards.
pub const MAX_TAX_PERCENT: u32 = 25;

/// Timelock scope options, in display order.
pub const TIMELOCK_SCOPES: [&str; 3] = ["all", "tax-only", "ownership-only"];

// ── Parameter Definitions ────────────────────────────────────────────

/// Input type of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterType {
    Text,
    Number,
    Boolean,
    Select,
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Select => write!(f, "select"),
        }
    }
}

/// Schema of a single feature parameter.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub required: bool,
    pub default: ParameterValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Text value must be a 20-byte hex address.
    pub address: bool,
    pub help_text: String,
}

impl ParameterDefinition {
    fn base(id: &str, display_name: &str, param_type: ParameterType, default: ParameterValue) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            param_type,
            required: false,
            default,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            address: false,
            help_text: String::new(),
        }
    }

    pub fn number(id: &str, display_name: &str, default: f64) -> Self {
        Self::base(id, display_name, ParameterType::Number, ParameterValue::Number(default))
    }

    pub fn boolean(id: &str, display_name: &str, default: bool) -> Self {
        Self::base(id, display_name, ParameterType::Boolean, ParameterValue::Bool(default))
    }

    pub fn text(id: &str, display_name: &str) -> Self {
        Self::base(id, display_name, ParameterType::Text, ParameterValue::Text(String::new()))
    }

    pub fn select(id: &str, display_name: &str, options: &[&str], default: &str) -> Self {
        let mut def = Self::base(id, display_name, ParameterType::Select, default.into());
        def.options = options.iter().map(|o| o.to_string()).collect();
        def
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn bounds(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self.step = Some(step);
        self
    }

    pub fn address(mut self) -> Self {
        self.address = true;
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help_text = text.into();
        self
    }

    /// Schema invariants: select has options containing the default;
    /// numeric default lies within bounds.
    fn check(&self) -> Result<(), String> {
        match self.param_type {
            ParameterType::Select => {
                if self.options.is_empty() {
                    return Err(format!("select parameter '{}' has no options", self.id));
                }
                let default = self.default.as_text().unwrap_or_default();
                if !self.options.iter().any(|o| o == default) {
                    return Err(format!("default of '{}' is not one of its options", self.id));
                }
            }
            ParameterType::Number => {
                let default = self
                    .default
                    .as_number()
                    .ok_or_else(|| format!("numeric parameter '{}' has a non-numeric default", self.id))?;
                if let (Some(min), Some(max)) = (self.min, self.max) {
                    if min > max {
                        return Err(format!("'{}' has min {} above max {}", self.id, min, max));
                    }
                }
                if self.min.is_some_and(|min| default < min) || self.max.is_some_and(|max| default > max) {
                    return Err(format!("default of '{}' is outside its bounds", self.id));
                }
            }
            ParameterType::Boolean => {
                if self.default.as_bool().is_none() {
                    return Err(format!("boolean parameter '{}' has a non-boolean default", self.id));
                }
            }
            ParameterType::Text => {
                if self.default.as_text().is_none() {
                    return Err(format!("text parameter '{}' has a non-text default", self.id));
                }
            }
        }
        Ok(())
    }
}

// ── Feature Definitions ──────────────────────────────────────────────

/// Renderer dispatch key for a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    Tax,
    Antibot,
    Reflection,
    AutoLiquidity,
    Timelock,
}

/// Position and dataflow of a feature inside the transfer override.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferStage {
    pub priority: u32,
    pub produces: Vec<SharedValue>,
    pub consumes: Vec<SharedValue>,
}

/// An administrative setter a feature may contribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFunctionDecl {
    pub name: String,
    /// Boolean parameter that must be true for the setter to exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_flag: Option<String>,
}

impl AdminFunctionDecl {
    pub fn always(name: &str) -> Self {
        Self {
            name: name.into(),
            requires_flag: None,
        }
    }

    pub fn when(name: &str, flag: &str) -> Self {
        Self {
            name: name.into(),
            requires_flag: Some(flag.into()),
        }
    }
}

/// Catalog entry for one feature module.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDefinition {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub display_name: String,
    pub description: String,
    pub parameters: Vec<ParameterDefinition>,
    pub hooks: Vec<HookPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_stage: Option<TransferStage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_functions: Vec<AdminFunctionDecl>,
}

impl FeatureDefinition {
    pub fn contributes_to(&self, hook: HookPoint) -> bool {
        self.hooks.contains(&hook)
    }

    pub fn parameter(&self, id: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.id == id)
    }

    fn invalid(&self, reason: String) -> CompositionError {
        CompositionError::InvalidCatalog {
            feature: self.id.clone(),
            reason,
        }
    }

    /// Declaration invariants of a single entry.
    pub fn check(&self) -> Result<(), CompositionError> {
        let mut seen = BTreeSet::new();
        for param in &self.parameters {
            if !seen.insert(param.id.as_str()) {
                return Err(self.invalid(format!("parameter '{}' declared twice", param.id)));
            }
            param.check().map_err(|reason| self.invalid(reason))?;
        }

        let mut hooks = BTreeSet::new();
        for hook in &self.hooks {
            if !hooks.insert(*hook) {
                return Err(self.invalid(format!("hook point {} declared twice", hook)));
            }
        }

        if self.contributes_to(HookPoint::TransferOverride) != self.transfer_stage.is_some() {
            return Err(self.invalid(
                "transfer-override hook and transfer stage must be declared together".into(),
            ));
        }
        if self.contributes_to(HookPoint::AdminFunctions) == self.admin_functions.is_empty() {
            return Err(self.invalid(
                "admin-functions hook and admin setters must be declared together".into(),
            ));
        }
        for decl in &self.admin_functions {
            if let Some(flag) = &decl.requires_flag {
                let is_boolean = self
                    .parameter(flag)
                    .is_some_and(|p| p.param_type == ParameterType::Boolean);
                if !is_boolean {
                    return Err(self.invalid(format!(
                        "setter '{}' depends on non-boolean parameter '{}'",
                        decl.name, flag
                    )));
                }
            }
        }
        Ok(())
    }
}

// ── Feature Catalog ──────────────────────────────────────────────────

/// Read-only registry of feature modules in fixed order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureCatalog {
    features: Vec<FeatureDefinition>,
}

impl FeatureCatalog {
    /// Build a catalog, checking entry invariants and id uniqueness.
    pub fn new(features: Vec<FeatureDefinition>) -> Result<Self, CompositionError> {
        let catalog = Self { features };
        catalog.verify()?;
        Ok(catalog)
    }

    /// The built-in five-module catalog.
    pub fn standard() -> Self {
        Self {
            features: standard_features(),
        }
    }

    pub fn verify(&self) -> Result<(), CompositionError> {
        let mut ids = BTreeSet::new();
        for feature in &self.features {
            if !ids.insert(&feature.id) {
                return Err(CompositionError::DuplicateFeature(feature.id.clone()));
            }
            feature.check()?;
        }
        Ok(())
    }

    /// Look up a feature; absence is a defect.
    pub fn get(&self, id: &str) -> Result<&FeatureDefinition, CompositionError> {
        self.find(id)
            .ok_or_else(|| CompositionError::UnknownFeature(id.to_string()))
    }

    pub fn find(&self, id: &str) -> Option<&FeatureDefinition> {
        self.features.iter().find(|f| f.id == id)
    }

    /// All features in catalog order.
    pub fn all(&self) -> &[FeatureDefinition] {
        &self.features
    }

    /// Catalog position of a feature.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.features.iter().position(|f| f.id == id)
    }

    /// Parameter schema lookup.
    pub fn parameter(&self, feature_id: &str, parameter_id: &str) -> Option<&ParameterDefinition> {
        self.find(feature_id).and_then(|f| f.parameter(parameter_id))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_features() -> Vec<FeatureDefinition> {
    vec![
        FeatureDefinition {
            id: FeatureId::from_name(ids::TAX),
            kind: FeatureKind::Tax,
            display_name: "Transaction Tax".into(),
            description: "Buy/sell fees split between auto-liquidity and a marketing wallet".into(),
            parameters: vec![
                ParameterDefinition::number(params::BUY_TAX, "Buy Tax (%)", 5.0)
                    .required()
                    .bounds(0.0, f64::from(MAX_TAX_PERCENT), 1.0)
                    .help("Fee taken when tokens are bought from the pair"),
                ParameterDefinition::number(params::SELL_TAX, "Sell Tax (%)", 5.0)
                    .required()
                    .bounds(0.0, f64::from(MAX_TAX_PERCENT), 1.0)
                    .help("Fee taken when tokens are sold into the pair"),
                ParameterDefinition::number(params::LIQUIDITY_SHARE, "Liquidity Share (%)", 50.0)
                    .required()
                    .bounds(0.0, 100.0, 1.0)
                    .help("Portion of collected fees added to liquidity"),
                ParameterDefinition::number(params::MARKETING_SHARE, "Marketing Share (%)", 50.0)
                    .required()
                    .bounds(0.0, 100.0, 1.0)
                    .help("Portion of collected fees sent to the marketing wallet"),
                ParameterDefinition::text(params::MARKETING_WALLET, "Marketing Wallet")
                    .address()
                    .help("Receives the marketing share; defaults to the deployer"),
                ParameterDefinition::number(params::SWAP_THRESHOLD, "Swap Threshold (% of supply)", 0.05)
                    .bounds(0.01, 5.0, 0.01)
                    .help("Collected fees are swapped once they reach this share of supply"),
            ],
            hooks: vec![
                HookPoint::Variables,
                HookPoint::Constructor,
                HookPoint::TransferOverride,
                HookPoint::AdminFunctions,
                HookPoint::HelperFunctions,
            ],
            capabilities: vec![Capability::SwapRouter],
            transfer_stage: Some(TransferStage {
                priority: priority::TAX,
                produces: vec![SharedValue::FEE_AMOUNT],
                consumes: vec![],
            }),
            admin_functions: vec![
                AdminFunctionDecl::always(admin::SET_BUY_TAX),
                AdminFunctionDecl::always(admin::SET_SELL_TAX),
                AdminFunctionDecl::always(admin::SET_TAX_SHARES),
                AdminFunctionDecl::always(admin::SET_MARKETING_WALLET),
                AdminFunctionDecl::always(admin::SET_TAX_SWAP_THRESHOLD),
            ],
        },
        FeatureDefinition {
            id: FeatureId::from_name(ids::ANTIBOT),
            kind: FeatureKind::Antibot,
            display_name: "Anti-Bot Limits".into(),
            description: "Max-transaction and max-wallet caps with an optional blacklist".into(),
            parameters: vec![
                ParameterDefinition::number(params::MAX_TX_AMOUNT, "Max Transaction (% of supply)", 1.0)
                    .required()
                    .bounds(0.1, 100.0, 0.1),
                ParameterDefinition::number(params::MAX_WALLET_AMOUNT, "Max Wallet (% of supply)", 2.0)
                    .required()
                    .bounds(0.1, 100.0, 0.1),
                ParameterDefinition::boolean(params::ENABLE_BLACKLIST, "Enable Blacklist", false)
                    .help("Lets the owner block addresses from transferring"),
            ],
            hooks: vec![
                HookPoint::Variables,
                HookPoint::Constructor,
                HookPoint::TransferOverride,
                HookPoint::AdminFunctions,
            ],
            capabilities: vec![],
            transfer_stage: Some(TransferStage {
                priority: priority::ANTIBOT,
                produces: vec![],
                consumes: vec![],
            }),
            admin_functions: vec![
                AdminFunctionDecl::always(admin::SET_MAX_TX_AMOUNT),
                AdminFunctionDecl::always(admin::SET_MAX_WALLET_AMOUNT),
                AdminFunctionDecl::always(admin::SET_LIMIT_EXEMPTION),
                AdminFunctionDecl::when(admin::SET_BLACKLIST, params::ENABLE_BLACKLIST),
            ],
        },
        FeatureDefinition {
            id: FeatureId::from_name(ids::REFLECTION),
            kind: FeatureKind::Reflection,
            display_name: "Reflection Rewards".into(),
            description: "Redistributes part of each extracted fee to holders by balance".into(),
            parameters: vec![ParameterDefinition::number(
                params::REFLECTION_PERCENT,
                "Reflection (% of fee)",
                50.0,
            )
            .required()
            .bounds(0.0, 100.0, 1.0)],
            hooks: vec![
                HookPoint::Imports,
                HookPoint::Variables,
                HookPoint::TransferOverride,
                HookPoint::HelperFunctions,
            ],
            capabilities: vec![],
            transfer_stage: Some(TransferStage {
                priority: priority::REFLECTION,
                produces: vec![],
                consumes: vec![SharedValue::FEE_AMOUNT],
            }),
            admin_functions: vec![],
        },
        FeatureDefinition {
            id: FeatureId::from_name(ids::AUTO_LIQUIDITY),
            kind: FeatureKind::AutoLiquidity,
            display_name: "Auto-Liquidity".into(),
            description: "Accumulates part of each transfer and periodically adds it to the pool".into(),
            parameters: vec![
                ParameterDefinition::number(params::LIQUIDITY_PERCENT, "Liquidity (% of transfer)", 2.0)
                    .required()
                    .bounds(0.0, 10.0, 1.0),
                ParameterDefinition::number(
                    params::LIQUIDITY_THRESHOLD,
                    "Liquify Threshold (% of supply)",
                    0.05,
                )
                .bounds(0.01, 5.0, 0.01),
            ],
            hooks: vec![
                HookPoint::Variables,
                HookPoint::TransferOverride,
                HookPoint::HelperFunctions,
            ],
            capabilities: vec![Capability::SwapRouter],
            transfer_stage: Some(TransferStage {
                priority: priority::AUTO_LIQUIDITY,
                produces: vec![],
                consumes: vec![],
            }),
            admin_functions: vec![],
        },
        FeatureDefinition {
            id: FeatureId::from_name(ids::TIMELOCK),
            kind: FeatureKind::Timelock,
            display_name: "Admin Timelock".into(),
            description: "Delays a scope of administrative functions".into(),
            parameters: vec![
                ParameterDefinition::select(
                    params::FUNCTIONS_TO_TIMELOCK,
                    "Functions to Timelock",
                    &TIMELOCK_SCOPES,
                    "all",
                )
                .required(),
                ParameterDefinition::number(params::DELAY_HOURS, "Delay (hours)", 48.0)
                    .bounds(1.0, 720.0, 1.0),
            ],
            hooks: vec![HookPoint::Variables, HookPoint::HelperFunctions],
            capabilities: vec![],
            transfer_stage: None,
            admin_functions: vec![],
        },
    ]
}

// ── Resolved Parameters ──────────────────────────────────────────────

/// A feature's parameter values with catalog defaults filled in.
///
/// Only built for validated specs, so accessor failures are defects.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedParameters {
    feature: FeatureId,
    values: BTreeMap<String, ParameterValue>,
}

impl ResolvedParameters {
    pub fn resolve(definition: &FeatureDefinition, config: &FeatureConfig) -> Self {
        let values = definition
            .parameters
            .iter()
            .map(|param| {
                let value = config
                    .parameters
                    .get(&param.id)
                    .filter(|v| !v.is_blank())
                    .cloned()
                    .unwrap_or_else(|| param.default.clone());
                (param.id.clone(), value)
            })
            .collect();
        Self {
            feature: definition.id.clone(),
            values,
        }
    }

    pub fn feature(&self) -> &FeatureId {
        &self.feature
    }

    fn missing(&self, id: &str) -> CompositionError {
        CompositionError::MissingParameter {
            feature: self.feature.clone(),
            parameter: id.to_string(),
        }
    }

    pub fn number(&self, id: &str) -> Result<f64, CompositionError> {
        self.values
            .get(id)
            .and_then(ParameterValue::as_number)
            .ok_or_else(|| self.missing(id))
    }

    /// Numeric value rounded to a non-negative integer.
    pub fn integer(&self, id: &str) -> Result<u64, CompositionError> {
        Ok(self.number(id)?.max(0.0).round() as u64)
    }

    /// A percentage expressed in basis points (1% = 100).
    pub fn basis_points(&self, id: &str) -> Result<u64, CompositionError> {
        Ok((self.number(id)? * 100.0).max(0.0).round() as u64)
    }

    pub fn boolean(&self, id: &str) -> Result<bool, CompositionError> {
        self.values
            .get(id)
            .and_then(ParameterValue::as_bool)
            .ok_or_else(|| self.missing(id))
    }

    pub fn text(&self, id: &str) -> Result<&str, CompositionError> {
        self.values
            .get(id)
            .and_then(ParameterValue::as_text)
            .ok_or_else(|| self.missing(id))
    }
}
