//! Admin timelock renderer.
//!
//! Declares the schedule state and helpers. Wrapping individual setters is
//! decided by the planner and applied by [`super::admin::timelock_guard`].

use super::admin::{CREATE_TIMELOCK, TIMELOCK_EXPIRED, TIMELOCK_EXPIRY};
use super::{FeatureOutput, FeatureRenderer, RenderContext};
use crate::catalog::{params, ResolvedParameters};
use crate::error::CompositionError;
use crate::types::HookPoint;

pub struct TimelockRenderer;

impl FeatureRenderer for TimelockRenderer {
    fn render(
        &self,
        resolved: &ResolvedParameters,
        _ctx: &RenderContext,
    ) -> Result<FeatureOutput, CompositionError> {
        let delay_hours = resolved.integer(params::DELAY_HOURS)?;

        let mut variables = String::new();
        variables.push_str(&format!(
            "uint256 public constant TIMELOCK_DELAY = {} hours;\n",
            delay_hours
        ));
        variables.push_str(&format!(
            "mapping(bytes32 => uint256) public {};\n\n",
            TIMELOCK_EXPIRY
        ));
        variables.push_str("event TimelockScheduled(bytes32 indexed functionId, uint256 executableAt);");

        let mut helpers = String::new();
        helpers.push_str(&format!(
            "function {}(bytes32 functionId) private {{\n",
            CREATE_TIMELOCK
        ));
        helpers.push_str("    uint256 executableAt = block.timestamp + TIMELOCK_DELAY;\n");
        helpers.push_str(&format!("    {}[functionId] = executableAt;\n", TIMELOCK_EXPIRY));
        helpers.push_str("    emit TimelockScheduled(functionId, executableAt);\n");
        helpers.push_str("}\n\n");
        helpers.push_str(&format!(
            "function {}(bytes32 functionId) private view returns (bool) {{\n",
            TIMELOCK_EXPIRED
        ));
        helpers.push_str(&format!("    uint256 expiry = {}[functionId];\n", TIMELOCK_EXPIRY));
        helpers.push_str("    return expiry != 0 && block.timestamp >= expiry;\n");
        helpers.push('}');

        Ok(FeatureOutput::new()
            .section(HookPoint::Variables, variables)
            .section(HookPoint::HelperFunctions, helpers))
    }

    fn name(&self) -> &str {
        "timelock"
    }
}
