//! Core types for the generation pipeline.
//!
//! Defines feature identifiers, hook points, parameter values, the
//! immutable `TokenSpec` input, shared capabilities, transfer dataflow
//! values and generator configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ── Identifiers ──────────────────────────────────────────────────────

/// Catalog identifier of a feature module (`tax`, `antibot`, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn from_name(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for FeatureId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FeatureId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Hook Points ──────────────────────────────────────────────────────

/// Fixed extension slots of the generated contract.
///
/// Variant order is emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HookPoint {
    /// Header imports needed only by specific features.
    Imports,
    Variables,
    Constructor,
    TransferOverride,
    AdminFunctions,
    HelperFunctions,
}

impl HookPoint {
    pub const ALL: [HookPoint; 6] = [
        HookPoint::Imports,
        HookPoint::Variables,
        HookPoint::Constructor,
        HookPoint::TransferOverride,
        HookPoint::AdminFunctions,
        HookPoint::HelperFunctions,
    ];

    /// Indentation depth of fragment text inside the contract.
    pub fn indent_level(&self) -> usize {
        match self {
            Self::Imports => 0,
            Self::Variables | Self::AdminFunctions | Self::HelperFunctions => 1,
            Self::Constructor | Self::TransferOverride => 2,
        }
    }
}

impl std::fmt::Display for HookPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imports => write!(f, "imports"),
            Self::Variables => write!(f, "variables"),
            Self::Constructor => write!(f, "constructor"),
            Self::TransferOverride => write!(f, "transfer-override"),
            Self::AdminFunctions => write!(f, "admin-functions"),
            Self::HelperFunctions => write!(f, "helper-functions"),
        }
    }
}

// ── Capabilities ─────────────────────────────────────────────────────

/// Contract infrastructure shared by several features and emitted once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// DEX router + pair, swap reentrancy flag, swap/liquidity helpers.
    SwapRouter,
}

impl Capability {
    /// Hook points the capability's shared fragments occupy.
    pub fn hooks(&self) -> &'static [HookPoint] {
        match self {
            Self::SwapRouter => &[
                HookPoint::Imports,
                HookPoint::Variables,
                HookPoint::Constructor,
                HookPoint::HelperFunctions,
            ],
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SwapRouter => write!(f, "swap-router"),
        }
    }
}

// ── Transfer Dataflow ────────────────────────────────────────────────

/// A named local shared between transfer stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SharedValue {
    pub name: &'static str,
    pub solidity_type: &'static str,
}

impl SharedValue {
    /// Fee extracted by the tax stage, in token units.
    pub const FEE_AMOUNT: SharedValue = SharedValue {
        name: "feeAmount",
        solidity_type: "uint256",
    };

    /// Declaration statement placed at the top of the override body.
    pub fn declaration(&self) -> String {
        format!("{} {};", self.solidity_type, self.name)
    }
}

impl std::fmt::Display for SharedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

// ── Parameter Values ─────────────────────────────────────────────────

/// A scalar parameter value as submitted by the collection layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParameterValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in validation messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    /// Whether this is an empty text value.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for ParameterValue {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

// ── Token Spec ───────────────────────────────────────────────────────

/// Per-feature selection within a TokenSpec.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub enabled: bool,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl FeatureConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            parameters: BTreeMap::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Set a parameter value (builder style).
    pub fn param(mut self, id: &str, value: impl Into<ParameterValue>) -> Self {
        self.parameters.insert(id.to_string(), value.into());
        self
    }
}

/// The immutable description of a token to generate.
///
/// Produced entirely by the collection layer. `features` is keyed by
/// catalog feature id; ordered storage keeps fingerprints stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    /// Whole-token supply as a decimal string (may exceed u64).
    #[serde(deserialize_with = "supply_from_string_or_integer")]
    pub total_supply: String,
    pub decimals: u8,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureConfig>,
}

impl TokenSpec {
    pub fn new(name: &str, symbol: &str, total_supply: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            total_supply: total_supply.to_string(),
            decimals,
            features: BTreeMap::new(),
        }
    }

    /// Attach a feature selection (builder style).
    pub fn with_feature(mut self, id: &str, config: FeatureConfig) -> Self {
        self.features.insert(id.to_string(), config);
        self
    }

    /// Selection for a feature if it is present and enabled.
    pub fn enabled_feature(&self, id: &str) -> Option<&FeatureConfig> {
        self.features.get(id).filter(|c| c.enabled)
    }

    /// Solidity identifier derived from `name`.
    ///
    /// Keeps ASCII letters, digits and underscores. A leading digit or a
    /// clash with an inherited/imported type name gets a `Token` affix.
    /// Empty when `name` has no usable characters.
    pub fn contract_name(&self) -> String {
        let ident: String = self
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if ident.is_empty() {
            return ident;
        }
        if ident.starts_with(|c: char| c.is_ascii_digit()) {
            return format!("Token{}", ident);
        }
        if RESERVED_IDENTIFIERS.contains(&ident.as_str()) {
            return format!("{}Token", ident);
        }
        ident
    }

    /// Stable content fingerprint (BLAKE3 over canonical JSON).
    pub fn fingerprint(&self) -> String {
        // BTreeMap-backed maps serialize in key order, so the bytes are canonical.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&bytes).to_hex().to_string()
    }
}

/// Names the generated contract must not shadow.
const RESERVED_IDENTIFIERS: &[&str] = &[
    "ERC20",
    "IERC20",
    "IERC20Metadata",
    "Ownable",
    "Context",
    "IUniswapV2Router02",
    "IUniswapV2Factory",
    "contract",
    "function",
    "constructor",
    "address",
    "mapping",
    "return",
];

fn supply_from_string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Supply {
        Text(String),
        Integer(u64),
    }

    Ok(match Supply::deserialize(deserializer)? {
        Supply::Text(s) => s.trim().to_string(),
        Supply::Integer(n) => n.to_string(),
    })
}

// ── Configuration ────────────────────────────────────────────────────

/// Configuration for the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// SPDX license identifier written into the header.
    pub license: String,
    /// Maximum memoized artifacts kept by `TokenForge`.
    pub max_cached_artifacts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            license: "MIT".into(),
            max_cached_artifacts: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_id_display_and_compare() {
        let id = FeatureId::from_name("tax");
        assert_eq!(id.to_string(), "tax");
        assert_eq!(id, "tax");
        assert_eq!(id.as_str(), "tax");
    }

    #[test]
    fn hook_points_sort_in_emission_order() {
        let mut hooks = vec![
            HookPoint::HelperFunctions,
            HookPoint::TransferOverride,
            HookPoint::Imports,
            HookPoint::Variables,
        ];
        hooks.sort();
        assert_eq!(
            hooks,
            vec![
                HookPoint::Imports,
                HookPoint::Variables,
                HookPoint::TransferOverride,
                HookPoint::HelperFunctions,
            ]
        );
        assert_eq!(HookPoint::ALL.len(), 6);
    }

    #[test]
    fn hook_point_indentation() {
        assert_eq!(HookPoint::Imports.indent_level(), 0);
        assert_eq!(HookPoint::Variables.indent_level(), 1);
        assert_eq!(HookPoint::TransferOverride.indent_level(), 2);
    }

    #[test]
    fn shared_value_declaration() {
        assert_eq!(SharedValue::FEE_AMOUNT.declaration(), "uint256 feeAmount;");
    }

    #[test]
    fn parameter_value_untagged_json() {
        let v: ParameterValue = serde_json::from_str("5").unwrap();
        assert_eq!(v, ParameterValue::Number(5.0));
        let v: ParameterValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ParameterValue::Bool(true));
        let v: ParameterValue = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(v.as_text(), Some("all"));
        assert_eq!(v.kind_name(), "text");
    }

    #[test]
    fn parameter_value_blank() {
        assert!(ParameterValue::from("  ").is_blank());
        assert!(!ParameterValue::from("0xabc").is_blank());
        assert!(!ParameterValue::from(0).is_blank());
    }

    #[test]
    fn token_spec_from_json_accepts_string_or_integer_supply() {
        let spec: TokenSpec = serde_json::from_str(
            r#"{"name":"Moon","symbol":"MOON","totalSupply":"1000000","decimals":18}"#,
        )
        .unwrap();
        assert_eq!(spec.total_supply, "1000000");
        assert!(spec.features.is_empty());

        let spec: TokenSpec = serde_json::from_str(
            r#"{"name":"Moon","symbol":"MOON","totalSupply":42,"decimals":9,
                "features":{"tax":{"enabled":true,"parameters":{"buyTax":5}}}}"#,
        )
        .unwrap();
        assert_eq!(spec.total_supply, "42");
        let tax = spec.enabled_feature("tax").unwrap();
        assert_eq!(tax.parameters["buyTax"], ParameterValue::Number(5.0));
    }

    #[test]
    fn enabled_feature_ignores_disabled() {
        let spec = TokenSpec::new("A", "A", "1", 18)
            .with_feature("tax", FeatureConfig::disabled().param("buyTax", 5));
        assert!(spec.enabled_feature("tax").is_none());
        assert!(spec.enabled_feature("antibot").is_none());
    }

    #[test]
    fn contract_name_sanitizes() {
        let name = |n: &str| TokenSpec::new(n, "X", "1", 18).contract_name();
        assert_eq!(name("Moon"), "Moon");
        assert_eq!(name("Moon Shot!"), "MoonShot");
        assert_eq!(name("42 Coin"), "Token42Coin");
        assert_eq!(name("ERC20"), "ERC20Token");
        assert_eq!(name("$$$"), "");
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = TokenSpec::new("Moon", "MOON", "1000000", 18)
            .with_feature("tax", FeatureConfig::enabled().param("buyTax", 5));
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = TokenSpec::new("Moon", "MOON", "1000000", 18)
            .with_feature("tax", FeatureConfig::enabled().param("buyTax", 6));
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn config_defaults() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.license, "MIT");
        assert_eq!(cfg.max_cached_artifacts, 256);
    }

    #[test]
    fn config_partial_deserialize_uses_defaults() {
        let cfg: GeneratorConfig = serde_json::from_str(r#"{"license":"Apache-2.0"}"#).unwrap();
        assert_eq!(cfg.license, "Apache-2.0");
        assert_eq!(cfg.max_cached_artifacts, 256);
    }
}
