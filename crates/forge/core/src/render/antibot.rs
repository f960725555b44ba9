//! Anti-bot limits renderer.

use super::admin::AdminSetter;
use super::swap::PAIR;
use super::{FeatureOutput, FeatureRenderer, RenderContext};
use crate::catalog::{admin, params, ResolvedParameters};
use crate::error::CompositionError;
use crate::types::HookPoint;

pub struct AntibotRenderer;

impl FeatureRenderer for AntibotRenderer {
    fn render(
        &self,
        resolved: &ResolvedParameters,
        ctx: &RenderContext,
    ) -> Result<FeatureOutput, CompositionError> {
        let max_tx_bps = resolved.basis_points(params::MAX_TX_AMOUNT)?;
        let max_wallet_bps = resolved.basis_points(params::MAX_WALLET_AMOUNT)?;
        let blacklist = resolved.boolean(params::ENABLE_BLACKLIST)?;

        let mut variables = String::new();
        variables.push_str(&format!(
            "uint256 public maxTxAmount = {};\n",
            ctx.share_of_supply(max_tx_bps)
        ));
        variables.push_str(&format!(
            "uint256 public maxWalletAmount = {};\n",
            ctx.share_of_supply(max_wallet_bps)
        ));
        variables.push_str("mapping(address => bool) public isExemptFromLimits;");
        if blacklist {
            variables.push_str("\nmapping(address => bool) public isBlacklisted;");
        }

        let mut constructor = String::new();
        constructor.push_str("isExemptFromLimits[msg.sender] = true;\n");
        constructor.push_str("isExemptFromLimits[address(this)] = true;");

        let mut stage = String::new();
        if blacklist {
            stage.push_str(
                "require(!isBlacklisted[from] && !isBlacklisted[to], \"Antibot: address is blacklisted\");\n",
            );
        }
        stage.push_str("if (!isExemptFromLimits[from] && !isExemptFromLimits[to]) {\n");
        stage.push_str("    require(amount <= maxTxAmount, \"Antibot: transfer exceeds max transaction\");\n");
        stage.push_str("}\n");
        // The pair holds pooled tokens, so it is only spared the wallet cap;
        // buys and sells through it stay under the transaction cap.
        if ctx.swap_router {
            stage.push_str(&format!("if (!isExemptFromLimits[to] && to != {}) {{\n", PAIR));
        } else {
            stage.push_str("if (!isExemptFromLimits[to]) {\n");
        }
        stage.push_str(
            "    require(balanceOf(to) + amount <= maxWalletAmount, \"Antibot: balance exceeds max wallet\");\n",
        );
        stage.push('}');

        let mut output = FeatureOutput::new()
            .section(HookPoint::Variables, variables)
            .section(HookPoint::Constructor, constructor)
            .section(HookPoint::TransferOverride, stage)
            .setter(limit_setter(admin::SET_MAX_TX_AMOUNT, "maxTxAmount"))
            .setter(limit_setter(admin::SET_MAX_WALLET_AMOUNT, "maxWalletAmount"))
            .setter(
                AdminSetter::new(admin::SET_LIMIT_EXEMPTION, "address account, bool exempt")
                    .line("isExemptFromLimits[account] = exempt;"),
            );
        if blacklist {
            output = output.setter(
                AdminSetter::new(admin::SET_BLACKLIST, "address account, bool blocked")
                    .line("isBlacklisted[account] = blocked;"),
            );
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "antibot"
    }
}

/// Limits may not drop below 0.1% of supply, matching the parameter floor.
fn limit_setter(name: &str, variable: &str) -> AdminSetter {
    AdminSetter::new(name, "uint256 newAmount")
        .line("require(newAmount >= totalSupply() / 1000, \"Antibot: limit too low\");")
        .line(format!("{} = newAmount;", variable))
}
