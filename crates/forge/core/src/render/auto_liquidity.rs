//! Auto-liquidity renderer.

use super::swap::PAIR;
use super::{FeatureOutput, FeatureRenderer, RenderContext};
use crate::catalog::{params, ResolvedParameters};
use crate::error::CompositionError;
use crate::types::HookPoint;

pub struct AutoLiquidityRenderer;

impl FeatureRenderer for AutoLiquidityRenderer {
    fn render(
        &self,
        resolved: &ResolvedParameters,
        ctx: &RenderContext,
    ) -> Result<FeatureOutput, CompositionError> {
        let percent = resolved.integer(params::LIQUIDITY_PERCENT)?;
        let threshold_bps = resolved.basis_points(params::LIQUIDITY_THRESHOLD)?;

        let mut variables = String::new();
        variables.push_str(&format!("uint256 public autoLiquidityPercent = {};\n", percent));
        variables.push_str(&format!(
            "uint256 public liquifyThreshold = {};\n",
            ctx.share_of_supply(threshold_bps)
        ));
        variables.push_str("uint256 private _liquidityTokens;");

        let mut stage = String::new();
        stage.push_str("uint256 liquidityAmount = amount * autoLiquidityPercent / 100;\n");
        stage.push_str("if (liquidityAmount > 0) {\n");
        stage.push_str("    _liquidityTokens += liquidityAmount;\n");
        stage.push_str("    amount -= liquidityAmount;\n");
        stage.push_str("    super._transfer(from, address(this), liquidityAmount);\n");
        stage.push_str("}\n");
        stage.push_str(&format!(
            "if (_liquidityTokens >= liquifyThreshold && from != {}) {{\n",
            PAIR
        ));
        stage.push_str("    _swapAndLiquify(liquifyThreshold);\n");
        stage.push('}');

        let mut helpers = String::new();
        helpers.push_str("function _swapAndLiquify(uint256 tokenAmount) private lockTheSwap {\n");
        helpers.push_str("    _liquidityTokens -= tokenAmount;\n");
        helpers.push_str("    uint256 half = tokenAmount / 2;\n");
        helpers.push_str("    uint256 otherHalf = tokenAmount - half;\n");
        helpers.push_str("    uint256 initialBalance = address(this).balance;\n");
        helpers.push_str("    _swapTokensForEth(half);\n");
        helpers.push_str("    uint256 ethReceived = address(this).balance - initialBalance;\n");
        helpers.push_str("    if (ethReceived > 0) {\n");
        helpers.push_str("        _addLiquidity(otherHalf, ethReceived);\n");
        helpers.push_str("    }\n");
        helpers.push('}');

        Ok(FeatureOutput::new()
            .section(HookPoint::Variables, variables)
            .section(HookPoint::TransferOverride, stage)
            .section(HookPoint::HelperFunctions, helpers))
    }

    fn name(&self) -> &str {
        "auto-liquidity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FeatureCatalog;
    use crate::types::FeatureConfig;

    #[test]
    fn accumulates_then_liquifies() {
        let catalog = FeatureCatalog::standard();
        let config = FeatureConfig::enabled()
            .param("liquidityPercent", 3)
            .param("liquidityThreshold", 0.1);
        let resolved = ResolvedParameters::resolve(catalog.get("autoLiquidity").unwrap(), &config);
        let ctx = RenderContext {
            supply_expr: "500 * 10 ** 18".into(),
            swap_router: true,
        };
        let out = AutoLiquidityRenderer.render(&resolved, &ctx).unwrap();

        let vars = out.section_text(HookPoint::Variables).unwrap();
        assert!(vars.contains("autoLiquidityPercent = 3;"));
        assert!(vars.contains("liquifyThreshold = (500 * 10 ** 18) * 10 / 10000;"));

        let stage = out.section_text(HookPoint::TransferOverride).unwrap();
        let accumulate = stage.find("_liquidityTokens += liquidityAmount;").unwrap();
        let trigger = stage.find("_swapAndLiquify(liquifyThreshold);").unwrap();
        assert!(accumulate < trigger);
        assert!(out.setters().is_empty());
        assert!(out.section_text(HookPoint::Constructor).is_none());
    }
}
