//! Fragment rendering.
//!
//! Each enabled feature renders its hook-point fragments from its own
//! resolved parameters. Capability and base fragments are rendered here.
//! The plan drives everything: a fragment the plan expects but a renderer
//! did not produce (or the reverse) is a composition defect.

pub mod admin;
pub mod antibot;
pub mod auto_liquidity;
pub mod base;
pub mod reflection;
pub mod swap;
pub mod tax;
pub mod timelock;

use std::collections::BTreeMap;

use crate::catalog::{FeatureKind, ResolvedParameters};
use crate::error::CompositionError;
use crate::planner::{CompositionPlan, Contributor, PlannedFeature};
use crate::types::{Capability, FeatureId, GeneratorConfig, HookPoint, TokenSpec};

pub use admin::AdminSetter;

// ── Output Types ─────────────────────────────────────────────────────

/// A unit of contract text bound to one hook point.
///
/// Text is unindented; the emitter places it at the hook's depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub hook_point: HookPoint,
    pub origin: Contributor,
    pub text: String,
}

/// Base token attributes used by the contract skeleton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractHeader {
    pub license: String,
    pub contract_name: String,
    pub token_name: String,
    pub token_symbol: String,
    pub decimals: u8,
    /// Initial supply in base units, as a constant expression.
    pub supply_expr: String,
}

/// Structural parts of the transfer override around the stages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferFrame {
    pub swap_guard: bool,
    pub shared_declarations: Vec<String>,
}

/// Everything the emitter assembles, in plan order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedContract {
    pub header: ContractHeader,
    pub fragments: Vec<Fragment>,
    pub transfer_frame: TransferFrame,
    pub enabled_features: Vec<FeatureId>,
}

impl RenderedContract {
    pub fn fragments_for(&self, hook: HookPoint) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(move |f| f.hook_point == hook)
    }
}

// ── Renderer Trait ───────────────────────────────────────────────────

/// Shared, read-only facts renderers may consult.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub supply_expr: String,
    /// Router, pair and swap helpers are present.
    pub swap_router: bool,
}

impl RenderContext {
    pub fn new(spec: &TokenSpec, plan: &CompositionPlan) -> Self {
        Self {
            supply_expr: format!("{} * 10 ** {}", spec.total_supply.trim(), spec.decimals),
            swap_router: plan.has_capability(Capability::SwapRouter),
        }
    }

    /// Constant expression for a basis-point share of the initial supply.
    pub fn share_of_supply(&self, basis_points: u64) -> String {
        format!("({}) * {} / 10000", self.supply_expr, basis_points)
    }
}

/// Text a feature renderer produced, keyed by hook point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureOutput {
    sections: BTreeMap<HookPoint, String>,
    setters: Vec<AdminSetter>,
}

impl FeatureOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, hook: HookPoint, text: impl Into<String>) -> Self {
        self.sections.insert(hook, text.into());
        self
    }

    pub fn setter(mut self, setter: AdminSetter) -> Self {
        self.setters.push(setter);
        self
    }

    /// Hook points this output covers; setters count as admin-functions.
    pub fn hooks(&self) -> Vec<HookPoint> {
        let mut hooks: Vec<HookPoint> = self.sections.keys().copied().collect();
        if !self.setters.is_empty() && !hooks.contains(&HookPoint::AdminFunctions) {
            hooks.push(HookPoint::AdminFunctions);
            hooks.sort();
        }
        hooks
    }

    pub fn section_text(&self, hook: HookPoint) -> Option<&str> {
        self.sections.get(&hook).map(String::as_str)
    }

    pub fn find_setter(&self, name: &str) -> Option<&AdminSetter> {
        self.setters.iter().find(|s| s.name == name)
    }

    pub fn setters(&self) -> &[AdminSetter] {
        &self.setters
    }
}

/// Renders one feature kind.
pub trait FeatureRenderer: Send + Sync {
    fn render(
        &self,
        params: &ResolvedParameters,
        ctx: &RenderContext,
    ) -> Result<FeatureOutput, CompositionError>;

    /// Name of this renderer implementation.
    fn name(&self) -> &str;
}

/// Renderer registered for a catalog kind.
pub fn renderer_for(kind: FeatureKind) -> &'static dyn FeatureRenderer {
    match kind {
        FeatureKind::Tax => &tax::TaxRenderer,
        FeatureKind::Antibot => &antibot::AntibotRenderer,
        FeatureKind::Reflection => &reflection::ReflectionRenderer,
        FeatureKind::AutoLiquidity => &auto_liquidity::AutoLiquidityRenderer,
        FeatureKind::Timelock => &timelock::TimelockRenderer,
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Render every planned contribution into fragments.
pub fn render(
    plan: &CompositionPlan,
    spec: &TokenSpec,
    config: &GeneratorConfig,
) -> Result<RenderedContract, CompositionError> {
    render_with(plan, spec, config, |feature: &PlannedFeature, ctx: &RenderContext| {
        renderer_for(feature.kind).render(&feature.parameters, ctx)
    })
    .inspect_err(|e| tracing::error!(error = %e, "fragment rendering failed"))
}

/// Rendering with an injectable per-feature renderer.
pub(crate) fn render_with<F>(
    plan: &CompositionPlan,
    spec: &TokenSpec,
    config: &GeneratorConfig,
    render_feature: F,
) -> Result<RenderedContract, CompositionError>
where
    F: Fn(&PlannedFeature, &RenderContext) -> Result<FeatureOutput, CompositionError>,
{
    let ctx = RenderContext::new(spec, plan);

    let mut outputs: BTreeMap<FeatureId, FeatureOutput> = BTreeMap::new();
    for feature in &plan.features {
        let output = render_feature(feature, &ctx)?;
        check_declared(plan, &feature.id, &output)?;
        tracing::trace!(
            feature = %feature.id,
            hooks = output.hooks().len(),
            "feature rendered"
        );
        outputs.insert(feature.id.clone(), output);
    }

    let mut fragments = Vec::new();
    for (hook, contributors) in &plan.hooks {
        for contributor in contributors {
            match contributor {
                Contributor::Capability { capability, owner } => {
                    let text = capability_section(*capability, *hook).ok_or_else(|| {
                        CompositionError::MissingFragment {
                            feature: owner.clone(),
                            hook: *hook,
                        }
                    })?;
                    fragments.push(Fragment {
                        hook_point: *hook,
                        origin: contributor.clone(),
                        text,
                    });
                }
                Contributor::Feature { id } if *hook == HookPoint::AdminFunctions => {
                    let output = outputs.get(id).ok_or_else(|| missing(id, *hook))?;
                    for binding in plan.admin_for(contributor) {
                        let setter = output
                            .find_setter(&binding.name)
                            .ok_or_else(|| missing(id, *hook))?;
                        fragments.push(Fragment {
                            hook_point: *hook,
                            origin: contributor.clone(),
                            text: setter.render(binding.timelocked),
                        });
                    }
                }
                Contributor::Feature { id } => {
                    let text = outputs
                        .get(id)
                        .and_then(|o| o.section_text(*hook))
                        .ok_or_else(|| missing(id, *hook))?;
                    fragments.push(Fragment {
                        hook_point: *hook,
                        origin: contributor.clone(),
                        text: text.to_string(),
                    });
                }
                Contributor::Base => {
                    for binding in plan.admin_for(contributor) {
                        let setter = base::ownership_setter(&binding.name).ok_or_else(|| {
                            missing(&FeatureId::from_name(base::BASE_LABEL), *hook)
                        })?;
                        fragments.push(Fragment {
                            hook_point: *hook,
                            origin: Contributor::Base,
                            text: setter.render(binding.timelocked),
                        });
                    }
                }
            }
        }
    }

    let transfer_frame = plan
        .transfer
        .as_ref()
        .map(|t| TransferFrame {
            swap_guard: t.swap_guard,
            shared_declarations: t.shared_values.iter().map(|v| v.declaration()).collect(),
        })
        .unwrap_or_default();

    Ok(RenderedContract {
        header: base::header(spec, config, &ctx),
        fragments,
        transfer_frame,
        enabled_features: plan.enabled_ids(),
    })
}

fn missing(feature: &FeatureId, hook: HookPoint) -> CompositionError {
    CompositionError::MissingFragment {
        feature: feature.clone(),
        hook,
    }
}

fn capability_section(capability: Capability, hook: HookPoint) -> Option<String> {
    match capability {
        Capability::SwapRouter => swap::section(hook),
    }
}

/// A renderer may only fill hooks (and setters) the plan assigned to it.
fn check_declared(
    plan: &CompositionPlan,
    feature: &FeatureId,
    output: &FeatureOutput,
) -> Result<(), CompositionError> {
    let contributor = Contributor::feature(feature);
    for hook in output.hooks() {
        let planned = match hook {
            HookPoint::AdminFunctions => true,
            _ => plan
                .hooks
                .get(&hook)
                .is_some_and(|c| c.contains(&contributor)),
        };
        if !planned {
            return Err(CompositionError::UnexpectedFragment {
                feature: feature.clone(),
                hook,
            });
        }
    }
    for setter in output.setters() {
        if !plan.admin_for(&contributor).any(|b| b.name == setter.name) {
            return Err(CompositionError::UnexpectedFragment {
                feature: feature.clone(),
                hook: HookPoint::AdminFunctions,
            });
        }
    }
    Ok(())
}
