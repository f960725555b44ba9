//! Composition planner.
//!
//! Turns a validated `TokenSpec` into a [`CompositionPlan`]: which hook
//! points are active, who contributes to each and in what order, how the
//! transfer stages chain their shared values, and which administrative
//! setters get wrapped by the timelock. Rendering never re-derives any of
//! these decisions.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{admin, ids, params, FeatureCatalog, FeatureDefinition, FeatureKind, ResolvedParameters};
use crate::error::CompositionError;
use crate::types::{Capability, FeatureId, HookPoint, SharedValue, TokenSpec};

// ── Timelock Scope ───────────────────────────────────────────────────

/// Which administrative setters the timelock wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelockScope {
    All,
    TaxOnly,
    OwnershipOnly,
}

impl TimelockScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "tax-only" => Some(Self::TaxOnly),
            "ownership-only" => Some(Self::OwnershipOnly),
            _ => None,
        }
    }

    /// Case-insensitive name match against the scope.
    pub fn matches(&self, function_name: &str) -> bool {
        let name = function_name.to_ascii_lowercase();
        match self {
            Self::All => true,
            Self::TaxOnly => name.contains("tax") || name.contains("fee"),
            Self::OwnershipOnly => name.contains("owner"),
        }
    }
}

impl std::fmt::Display for TimelockScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::TaxOnly => write!(f, "tax-only"),
            Self::OwnershipOnly => write!(f, "ownership-only"),
        }
    }
}

// ── Plan Types ───────────────────────────────────────────────────────

/// Origin of a planned contribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Contributor {
    /// Contract skeleton (inherited ownership overrides).
    Base,
    /// Shared infrastructure, attributed to the first feature requiring it.
    Capability {
        capability: Capability,
        owner: FeatureId,
    },
    Feature { id: FeatureId },
}

impl Contributor {
    pub fn feature(id: &FeatureId) -> Self {
        Self::Feature { id: id.clone() }
    }

    /// Feature responsible for this contribution, if any.
    pub fn feature_id(&self) -> Option<&FeatureId> {
        match self {
            Self::Base => None,
            Self::Capability { owner, .. } => Some(owner),
            Self::Feature { id } => Some(id),
        }
    }

    /// Label used in logs and duplicate reports.
    pub fn label(&self) -> String {
        match self {
            Self::Base => "base".into(),
            Self::Capability { capability, .. } => capability.to_string(),
            Self::Feature { id } => id.to_string(),
        }
    }
}

/// An enabled feature with its resolved parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedFeature {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub parameters: ResolvedParameters,
}

/// One transfer stage in execution order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedStage {
    pub feature: FeatureId,
    pub priority: u32,
}

/// Resolved transfer override layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPlan {
    pub stages: Vec<PlannedStage>,
    /// Declared once at the top of the override body, first-use order.
    pub shared_values: Vec<SharedValue>,
    /// Consumed values with no active producer; they stay zero.
    pub zero_seeded: Vec<SharedValue>,
    /// Skip stages while the contract is swapping its own balance.
    pub swap_guard: bool,
}

/// An administrative setter in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBinding {
    pub name: String,
    pub contributor: Contributor,
    /// Guarded by the timelock schedule/execute check.
    pub timelocked: bool,
}

/// Everything the renderer needs, decided up front.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionPlan {
    /// Enabled features in catalog order.
    pub features: Vec<PlannedFeature>,
    /// Contributors per active hook point, in emission order.
    pub hooks: BTreeMap<HookPoint, Vec<Contributor>>,
    /// Active capabilities and their owning feature.
    pub capabilities: BTreeMap<Capability, FeatureId>,
    pub transfer: Option<TransferPlan>,
    pub admin_functions: Vec<AdminBinding>,
    pub timelock_scope: Option<TimelockScope>,
}

impl CompositionPlan {
    pub fn is_active(&self, hook: HookPoint) -> bool {
        self.hooks.contains_key(&hook)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains_key(&capability)
    }

    pub fn feature(&self, id: &str) -> Option<&PlannedFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn enabled_ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }

    /// Setters owned by one contributor, in emission order.
    pub fn admin_for<'a>(&'a self, contributor: &'a Contributor) -> impl Iterator<Item = &'a AdminBinding> + 'a {
        self.admin_functions
            .iter()
            .filter(move |b| &b.contributor == contributor)
    }

    /// Names of all timelock-wrapped setters.
    pub fn timelocked_functions(&self) -> Vec<&str> {
        self.admin_functions
            .iter()
            .filter(|b| b.timelocked)
            .map(|b| b.name.as_str())
            .collect()
    }
}

// ── Planning ─────────────────────────────────────────────────────────

/// Ownership setters inherited from the base contract that the timelock
/// can wrap.
const BASE_OWNERSHIP_SETTERS: [&str; 2] = [admin::TRANSFER_OWNERSHIP, admin::RENOUNCE_OWNERSHIP];

/// Build the composition plan. `spec` must already have passed validation.
pub fn plan(catalog: &FeatureCatalog, spec: &TokenSpec) -> Result<CompositionPlan, CompositionError> {
    plan_inner(catalog, spec).inspect_err(|e| {
        tracing::error!(error = %e, "composition planning failed");
    })
}

fn plan_inner(catalog: &FeatureCatalog, spec: &TokenSpec) -> Result<CompositionPlan, CompositionError> {
    for id in spec.features.keys() {
        catalog.get(id)?;
    }

    let enabled: Vec<&FeatureDefinition> = catalog
        .all()
        .iter()
        .filter(|f| spec.enabled_feature(f.id.as_str()).is_some())
        .collect();

    let features: Vec<PlannedFeature> = enabled
        .iter()
        .map(|def| PlannedFeature {
            id: def.id.clone(),
            kind: def.kind,
            parameters: ResolvedParameters::resolve(def, &spec.features[def.id.as_str()]),
        })
        .collect();

    let mut capabilities = BTreeMap::new();
    for def in &enabled {
        for capability in &def.capabilities {
            capabilities.entry(*capability).or_insert_with(|| def.id.clone());
        }
    }

    let transfer = plan_transfer(&enabled, &capabilities)?;

    let timelock_scope = match features.iter().find(|f| f.id == ids::TIMELOCK) {
        Some(timelock) => {
            let raw = timelock.parameters.text(params::FUNCTIONS_TO_TIMELOCK)?;
            let scope = TimelockScope::parse(raw).ok_or_else(|| CompositionError::MissingParameter {
                feature: timelock.id.clone(),
                parameter: params::FUNCTIONS_TO_TIMELOCK.into(),
            })?;
            Some(scope)
        }
        None => None,
    };

    let admin_functions = plan_admin(&enabled, &features, timelock_scope)?;
    let hooks = plan_hooks(&enabled, &capabilities, transfer.as_ref(), &admin_functions);

    let plan = CompositionPlan {
        features,
        hooks,
        capabilities,
        transfer,
        admin_functions,
        timelock_scope,
    };

    tracing::debug!(
        features = plan.features.len(),
        hooks = plan.hooks.len(),
        stages = plan.transfer.as_ref().map_or(0, |t| t.stages.len()),
        timelocked = plan.timelocked_functions().len(),
        "composition plan ready"
    );
    Ok(plan)
}

/// Order transfer stages by priority and check their dataflow.
fn plan_transfer(
    enabled: &[&FeatureDefinition],
    capabilities: &BTreeMap<Capability, FeatureId>,
) -> Result<Option<TransferPlan>, CompositionError> {
    let mut staged: Vec<(&FeatureDefinition, u32)> = enabled
        .iter()
        .filter_map(|def| def.transfer_stage.as_ref().map(|s| (*def, s.priority)))
        .collect();
    if staged.is_empty() {
        return Ok(None);
    }
    // Stable sort keeps catalog order for equal priorities.
    staged.sort_by_key(|(_, priority)| *priority);

    check_acyclic(&staged)?;

    let mut producers: BTreeMap<SharedValue, (usize, &FeatureId)> = BTreeMap::new();
    for (index, (def, _)) in staged.iter().enumerate() {
        if let Some(stage) = &def.transfer_stage {
            for value in &stage.produces {
                producers.entry(*value).or_insert((index, &def.id));
            }
        }
    }

    let mut shared_values = Vec::new();
    let mut zero_seeded = Vec::new();
    for (index, (def, _)) in staged.iter().enumerate() {
        let Some(stage) = &def.transfer_stage else {
            continue;
        };
        for value in stage.produces.iter().chain(stage.consumes.iter()) {
            if !shared_values.contains(value) {
                shared_values.push(*value);
            }
        }
        for value in &stage.consumes {
            match producers.get(value) {
                Some((producer_index, producer)) if *producer_index > index => {
                    return Err(CompositionError::DependencyOrder {
                        consumer: def.id.clone(),
                        producer: (*producer).clone(),
                        value: value.name.into(),
                    });
                }
                Some(_) => {}
                None => {
                    tracing::debug!(
                        consumer = %def.id,
                        value = %value,
                        "no active producer; shared value stays zero"
                    );
                    if !zero_seeded.contains(value) {
                        zero_seeded.push(*value);
                    }
                }
            }
        }
    }

    Ok(Some(TransferPlan {
        stages: staged
            .iter()
            .map(|(def, priority)| PlannedStage {
                feature: def.id.clone(),
                priority: *priority,
            })
            .collect(),
        shared_values,
        zero_seeded,
        swap_guard: capabilities.contains_key(&Capability::SwapRouter),
    }))
}

/// Reject stage sets whose produce/consume edges form a cycle.
fn check_acyclic(staged: &[(&FeatureDefinition, u32)]) -> Result<(), CompositionError> {
    let n = staged.len();
    // edges[p] contains c when p produces something c consumes.
    let mut edges = vec![BTreeSet::new(); n];
    let mut indegree = vec![0usize; n];
    for (p, (producer, _)) in staged.iter().enumerate() {
        let Some(produced) = producer.transfer_stage.as_ref().map(|s| &s.produces) else {
            continue;
        };
        for (c, (consumer, _)) in staged.iter().enumerate() {
            let consumes = consumer
                .transfer_stage
                .as_ref()
                .is_some_and(|s| s.consumes.iter().any(|v| produced.contains(v)));
            if p != c && consumes && edges[p].insert(c) {
                indegree[c] += 1;
            }
        }
    }

    let mut ready: Vec<usize> = (0..n).filter(|i| indegree[*i] == 0).collect();
    let mut visited = 0;
    while let Some(node) = ready.pop() {
        visited += 1;
        for next in &edges[node] {
            indegree[*next] -= 1;
            if indegree[*next] == 0 {
                ready.push(*next);
            }
        }
    }

    if visited == n {
        Ok(())
    } else {
        let members = (0..n)
            .filter(|i| indegree[*i] > 0)
            .map(|i| staged[i].0.id.clone())
            .collect();
        Err(CompositionError::DependencyCycle(members))
    }
}

/// Collect administrative setters and decide timelock wrapping.
fn plan_admin(
    enabled: &[&FeatureDefinition],
    features: &[PlannedFeature],
    scope: Option<TimelockScope>,
) -> Result<Vec<AdminBinding>, CompositionError> {
    let mut bindings: Vec<AdminBinding> = Vec::new();
    let mut owners: BTreeMap<String, String> = BTreeMap::new();

    for (def, planned) in enabled.iter().zip(features) {
        for decl in &def.admin_functions {
            if let Some(flag) = &decl.requires_flag {
                if !planned.parameters.boolean(flag)? {
                    continue;
                }
            }
            let contributor = Contributor::feature(&def.id);
            if let Some(first) = owners.insert(decl.name.clone(), contributor.label()) {
                return Err(CompositionError::DuplicateAdminFunction {
                    name: decl.name.clone(),
                    first,
                    second: contributor.label(),
                });
            }
            bindings.push(AdminBinding {
                name: decl.name.clone(),
                contributor,
                timelocked: false,
            });
        }
    }

    let Some(scope) = scope else {
        return Ok(bindings);
    };

    // Inherited ownership setters only appear when wrapped.
    for name in BASE_OWNERSHIP_SETTERS {
        if !scope.matches(name) {
            continue;
        }
        if let Some(first) = owners.insert(name.to_string(), Contributor::Base.label()) {
            return Err(CompositionError::DuplicateAdminFunction {
                name: name.into(),
                first,
                second: Contributor::Base.label(),
            });
        }
        bindings.push(AdminBinding {
            name: name.into(),
            contributor: Contributor::Base,
            timelocked: false,
        });
    }

    let mut wrapped = BTreeSet::new();
    for binding in &mut bindings {
        if scope.matches(&binding.name) && wrapped.insert(binding.name.clone()) {
            binding.timelocked = true;
        }
    }
    tracing::debug!(scope = %scope, wrapped = wrapped.len(), "timelock scope applied");
    Ok(bindings)
}

/// Contributors per hook: capabilities first, then features; transfer
/// stages in execution order; admin setters in binding order.
fn plan_hooks(
    enabled: &[&FeatureDefinition],
    capabilities: &BTreeMap<Capability, FeatureId>,
    transfer: Option<&TransferPlan>,
    admin_functions: &[AdminBinding],
) -> BTreeMap<HookPoint, Vec<Contributor>> {
    let mut hooks = BTreeMap::new();
    for hook in HookPoint::ALL {
        let mut contributors: Vec<Contributor> = capabilities
            .iter()
            .filter(|(capability, _)| capability.hooks().contains(&hook))
            .map(|(capability, owner)| Contributor::Capability {
                capability: *capability,
                owner: owner.clone(),
            })
            .collect();

        match hook {
            HookPoint::TransferOverride => {
                if let Some(transfer) = transfer {
                    contributors.extend(transfer.stages.iter().map(|s| Contributor::feature(&s.feature)));
                }
            }
            HookPoint::AdminFunctions => {
                for binding in admin_functions {
                    if !contributors.contains(&binding.contributor) {
                        contributors.push(binding.contributor.clone());
                    }
                }
            }
            _ => contributors.extend(
                enabled
                    .iter()
                    .filter(|def| def.contributes_to(hook))
                    .map(|def| Contributor::feature(&def.id)),
            ),
        }

        if !contributors.is_empty() {
            hooks.insert(hook, contributors);
        }
    }
    hooks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AdminFunctionDecl, TransferStage};
    use crate::types::FeatureConfig;

    fn spec() -> TokenSpec {
        TokenSpec::new("Moon", "MOON", "1000000", 18)
    }

    fn tax() -> FeatureConfig {
        FeatureConfig::enabled()
            .param("buyTax", 5)
            .param("sellTax", 5)
            .param("liquidityShare", 50)
            .param("marketingShare", 50)
    }

    fn antibot() -> FeatureConfig {
        FeatureConfig::enabled()
            .param("maxTxAmount", 1)
            .param("maxWalletAmount", 2)
    }

    fn timelock(scope: &str) -> FeatureConfig {
        FeatureConfig::enabled().param("functionsToTimelock", scope)
    }

    fn stage_order(plan: &CompositionPlan) -> Vec<String> {
        plan.transfer
            .as_ref()
            .map(|t| t.stages.iter().map(|s| s.feature.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn bare_spec_activates_nothing() {
        let plan = plan(&FeatureCatalog::standard(), &spec()).unwrap();
        assert!(plan.features.is_empty());
        assert!(plan.hooks.is_empty());
        assert!(plan.transfer.is_none());
        assert!(plan.admin_functions.is_empty());
    }

    #[test]
    fn unknown_feature_is_defect() {
        let spec = spec().with_feature("staking", FeatureConfig::enabled());
        assert_eq!(
            plan(&FeatureCatalog::standard(), &spec).unwrap_err(),
            CompositionError::UnknownFeature("staking".into())
        );
    }

    #[test]
    fn disabled_features_are_ignored() {
        let spec = spec().with_feature("tax", FeatureConfig::disabled());
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert!(plan.features.is_empty());
    }

    #[test]
    fn antibot_alone_uses_only_declared_hooks() {
        let spec = spec().with_feature("antibot", antibot());
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        let active: Vec<HookPoint> = plan.hooks.keys().copied().collect();
        assert_eq!(
            active,
            vec![
                HookPoint::Variables,
                HookPoint::Constructor,
                HookPoint::TransferOverride,
                HookPoint::AdminFunctions,
            ]
        );
        assert!(plan.capabilities.is_empty());
        assert!(!plan.transfer.as_ref().unwrap().swap_guard);
    }

    #[test]
    fn transfer_stages_follow_priority_not_catalog_order() {
        let spec = spec()
            .with_feature("antibot", antibot())
            .with_feature("tax", tax())
            .with_feature("autoLiquidity", FeatureConfig::enabled().param("liquidityPercent", 2))
            .with_feature("reflection", FeatureConfig::enabled().param("reflectionPercent", 50));
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert_eq!(stage_order(&plan), vec!["antibot", "tax", "reflection", "autoLiquidity"]);
        let transfer = plan.transfer.unwrap();
        assert_eq!(transfer.shared_values, vec![SharedValue::FEE_AMOUNT]);
        assert!(transfer.zero_seeded.is_empty());
        assert!(transfer.swap_guard);
    }

    #[test]
    fn reflection_without_tax_is_zero_seeded() {
        let spec = spec().with_feature("reflection", FeatureConfig::enabled().param("reflectionPercent", 50));
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        let transfer = plan.transfer.unwrap();
        assert_eq!(transfer.shared_values, vec![SharedValue::FEE_AMOUNT]);
        assert_eq!(transfer.zero_seeded, vec![SharedValue::FEE_AMOUNT]);
        assert!(!transfer.swap_guard);
    }

    #[test]
    fn consumer_before_producer_is_rejected() {
        let mut features = FeatureCatalog::standard().all().to_vec();
        features[2].transfer_stage.as_mut().unwrap().priority = 150;
        let catalog = FeatureCatalog::new(features).unwrap();
        let spec = spec()
            .with_feature("tax", tax())
            .with_feature("reflection", FeatureConfig::enabled().param("reflectionPercent", 50));
        assert_eq!(
            plan(&catalog, &spec).unwrap_err(),
            CompositionError::DependencyOrder {
                consumer: FeatureId::from_name("reflection"),
                producer: FeatureId::from_name("tax"),
                value: "feeAmount".into(),
            }
        );
    }

    #[test]
    fn dataflow_cycle_is_rejected() {
        let mut features = FeatureCatalog::standard().all().to_vec();
        features[0].transfer_stage = Some(TransferStage {
            priority: 200,
            produces: vec![SharedValue::FEE_AMOUNT],
            consumes: vec![SharedValue::FEE_AMOUNT],
        });
        features[2].transfer_stage.as_mut().unwrap().produces = vec![SharedValue::FEE_AMOUNT];
        let catalog = FeatureCatalog::new(features).unwrap();
        let spec = spec()
            .with_feature("tax", tax())
            .with_feature("reflection", FeatureConfig::enabled().param("reflectionPercent", 50));
        assert!(matches!(
            plan(&catalog, &spec).unwrap_err(),
            CompositionError::DependencyCycle(_)
        ));
    }

    #[test]
    fn swap_capability_owned_by_first_requiring_feature() {
        let spec = spec()
            .with_feature("autoLiquidity", FeatureConfig::enabled().param("liquidityPercent", 2))
            .with_feature("tax", tax());
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert_eq!(plan.capabilities[&Capability::SwapRouter], "tax");

        let variables = &plan.hooks[&HookPoint::Variables];
        assert!(matches!(variables[0], Contributor::Capability { .. }));
        assert_eq!(variables.len(), 3);
        assert_eq!(
            plan.hooks[&HookPoint::Imports],
            vec![Contributor::Capability {
                capability: Capability::SwapRouter,
                owner: FeatureId::from_name("tax"),
            }]
        );

        let only_liquidity = TokenSpec::new("M", "M", "1", 18)
            .with_feature("autoLiquidity", FeatureConfig::enabled().param("liquidityPercent", 2));
        let plan = super::plan(&FeatureCatalog::standard(), &only_liquidity).unwrap();
        assert_eq!(plan.capabilities[&Capability::SwapRouter], "autoLiquidity");
    }

    #[test]
    fn blacklist_setter_requires_flag() {
        let catalog = FeatureCatalog::standard();
        let off = plan(&catalog, &spec().with_feature("antibot", antibot())).unwrap();
        assert!(!off.admin_functions.iter().any(|b| b.name == "setBlacklist"));

        let on = plan(
            &catalog,
            &spec().with_feature("antibot", antibot().param("enableBlacklist", true)),
        )
        .unwrap();
        assert!(on.admin_functions.iter().any(|b| b.name == "setBlacklist"));
    }

    #[test]
    fn timelock_tax_only_wraps_tax_setters() {
        let spec = spec()
            .with_feature("tax", tax())
            .with_feature("antibot", antibot())
            .with_feature("timelock", timelock("tax-only"));
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert_eq!(plan.timelock_scope, Some(TimelockScope::TaxOnly));
        assert_eq!(
            plan.timelocked_functions(),
            vec!["setBuyTax", "setSellTax", "setTaxShares", "setTaxSwapThreshold"]
        );
        assert!(!plan.admin_functions.iter().any(|b| b.contributor == Contributor::Base));
    }

    #[test]
    fn timelock_ownership_only_adds_base_overrides() {
        let spec = spec()
            .with_feature("tax", tax())
            .with_feature("timelock", timelock("ownership-only"));
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert_eq!(
            plan.timelocked_functions(),
            vec!["transferOwnership", "renounceOwnership"]
        );
        assert!(plan.hooks[&HookPoint::AdminFunctions].contains(&Contributor::Base));
    }

    #[test]
    fn timelock_all_wraps_every_setter() {
        let spec = spec()
            .with_feature("tax", tax())
            .with_feature("antibot", antibot())
            .with_feature("timelock", timelock("all"));
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert!(plan.admin_functions.iter().all(|b| b.timelocked));
        assert_eq!(plan.admin_functions.len(), 5 + 3 + 2);
    }

    #[test]
    fn timelock_alone_still_covers_ownership() {
        let spec = spec().with_feature("timelock", timelock("all"));
        let plan = plan(&FeatureCatalog::standard(), &spec).unwrap();
        assert_eq!(plan.timelocked_functions().len(), 2);
        assert!(plan.is_active(HookPoint::Variables));
        assert!(plan.is_active(HookPoint::AdminFunctions));
        assert!(!plan.is_active(HookPoint::TransferOverride));
    }

    #[test]
    fn duplicate_setter_names_are_rejected() {
        let mut features = FeatureCatalog::standard().all().to_vec();
        features[1]
            .admin_functions
            .push(AdminFunctionDecl::always("setBuyTax"));
        let catalog = FeatureCatalog::new(features).unwrap();
        let spec = spec().with_feature("tax", tax()).with_feature("antibot", antibot());
        assert_eq!(
            plan(&catalog, &spec).unwrap_err(),
            CompositionError::DuplicateAdminFunction {
                name: "setBuyTax".into(),
                first: "tax".into(),
                second: "antibot".into(),
            }
        );
    }

    #[test]
    fn scope_matching_is_case_insensitive() {
        assert!(TimelockScope::TaxOnly.matches("setBuyTAX"));
        assert!(TimelockScope::TaxOnly.matches("updateFeeWallet"));
        assert!(!TimelockScope::TaxOnly.matches("setMaxTxAmount"));
        assert!(TimelockScope::OwnershipOnly.matches("transferOwnership"));
        assert!(!TimelockScope::OwnershipOnly.matches("setBuyTax"));
        assert_eq!(TimelockScope::parse("tax-only"), Some(TimelockScope::TaxOnly));
        assert_eq!(TimelockScope::parse("nope"), None);
    }
}
