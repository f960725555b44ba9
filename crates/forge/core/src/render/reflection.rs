//! Reflection rewards renderer.
//!
//! An amount sized as a share of the extracted fee is burned from the
//! sender on top of the fee and credited to every holder pro rata through
//! a per-token accumulator. Both parties settle before any balance change
//! through `_beforeTokenTransfer`; holders claim by minting.

use super::{FeatureOutput, FeatureRenderer, RenderContext};
use crate::catalog::{params, ResolvedParameters};
use crate::error::CompositionError;
use crate::types::{HookPoint, SharedValue};

pub struct ReflectionRenderer;

impl FeatureRenderer for ReflectionRenderer {
    fn render(
        &self,
        resolved: &ResolvedParameters,
        _ctx: &RenderContext,
    ) -> Result<FeatureOutput, CompositionError> {
        let percent = resolved.integer(params::REFLECTION_PERCENT)?;

        let imports = "import \"@openzeppelin/contracts/utils/math/Math.sol\";";

        let mut variables = String::new();
        variables.push_str(&format!("uint256 public reflectionPercent = {};\n", percent));
        variables.push_str("uint256 private constant REFLECTION_MAGNITUDE = 2**128;\n");
        variables.push_str("uint256 private _reflectionPerToken;\n");
        variables.push_str("mapping(address => uint256) private _reflectionCheckpoint;\n");
        variables.push_str("mapping(address => uint256) public pendingReflections;");

        Ok(FeatureOutput::new()
            .section(HookPoint::Imports, imports)
            .section(HookPoint::Variables, variables)
            .section(HookPoint::TransferOverride, transfer_stage())
            .section(HookPoint::HelperFunctions, helpers()))
    }

    fn name(&self) -> &str {
        "reflection"
    }
}

/// Reads the shared fee; zero when no producer is active.
fn transfer_stage() -> String {
    let fee = SharedValue::FEE_AMOUNT.name;
    let mut code = String::new();
    code.push_str(&format!(
        "uint256 reflectionAmount = {} * reflectionPercent / 100;\n",
        fee
    ));
    code.push_str("if (reflectionAmount > 0 && totalSupply() > reflectionAmount) {\n");
    code.push_str("    _burn(from, reflectionAmount);\n");
    code.push_str("    amount -= reflectionAmount;\n");
    code.push_str(
        "    _reflectionPerToken += Math.mulDiv(reflectionAmount, REFLECTION_MAGNITUDE, totalSupply());\n",
    );
    code.push('}');
    code
}

fn helpers() -> String {
    let mut code = String::new();
    code.push_str("function _beforeTokenTransfer(address from, address to, uint256 amount) internal override {\n");
    code.push_str("    super._beforeTokenTransfer(from, to, amount);\n");
    code.push_str("    if (from != address(0)) {\n");
    code.push_str("        _settleReflections(from);\n");
    code.push_str("    }\n");
    code.push_str("    if (to != address(0)) {\n");
    code.push_str("        _settleReflections(to);\n");
    code.push_str("    }\n");
    code.push_str("}\n\n");
    code.push_str("function _settleReflections(address account) private {\n");
    code.push_str("    uint256 owed = Math.mulDiv(\n");
    code.push_str("        balanceOf(account),\n");
    code.push_str("        _reflectionPerToken - _reflectionCheckpoint[account],\n");
    code.push_str("        REFLECTION_MAGNITUDE\n");
    code.push_str("    );\n");
    code.push_str("    _reflectionCheckpoint[account] = _reflectionPerToken;\n");
    code.push_str("    if (owed > 0) {\n");
    code.push_str("        pendingReflections[account] += owed;\n");
    code.push_str("    }\n");
    code.push_str("}\n\n");
    code.push_str("function claimReflections() external {\n");
    code.push_str("    _settleReflections(msg.sender);\n");
    code.push_str("    uint256 owed = pendingReflections[msg.sender];\n");
    code.push_str("    require(owed > 0, \"Reflection: nothing to claim\");\n");
    code.push_str("    pendingReflections[msg.sender] = 0;\n");
    code.push_str("    _mint(msg.sender, owed);\n");
    code.push('}');
    code
}
