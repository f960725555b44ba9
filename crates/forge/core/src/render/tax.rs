//! Transaction tax renderer.
//!
//! Buys and sells against the pair pay a fee into the contract. Collected
//! fees are swapped once they reach the threshold and split between
//! liquidity and the marketing wallet, normalized by the share sum.

use super::admin::AdminSetter;
use super::swap::PAIR;
use super::{FeatureOutput, FeatureRenderer, RenderContext};
use crate::address::to_checksum_address;
use crate::catalog::{admin, params, ResolvedParameters, MAX_TAX_PERCENT};
use crate::error::CompositionError;
use crate::types::{HookPoint, SharedValue};

pub struct TaxRenderer;

impl FeatureRenderer for TaxRenderer {
    fn render(
        &self,
        resolved: &ResolvedParameters,
        ctx: &RenderContext,
    ) -> Result<FeatureOutput, CompositionError> {
        let buy_tax = resolved.integer(params::BUY_TAX)?;
        let sell_tax = resolved.integer(params::SELL_TAX)?;
        let liquidity_share = resolved.integer(params::LIQUIDITY_SHARE)?;
        let marketing_share = resolved.integer(params::MARKETING_SHARE)?;
        let threshold_bps = resolved.basis_points(params::SWAP_THRESHOLD)?;
        let wallet = resolved.text(params::MARKETING_WALLET)?.trim();

        // Empty means deployer; anything else was validated as an address.
        let wallet_expr = if wallet.is_empty() {
            "msg.sender".to_string()
        } else {
            to_checksum_address(wallet).ok_or_else(|| CompositionError::MissingParameter {
                feature: resolved.feature().clone(),
                parameter: params::MARKETING_WALLET.into(),
            })?
        };

        let mut variables = String::new();
        variables.push_str(&format!("uint256 public buyTax = {};\n", buy_tax));
        variables.push_str(&format!("uint256 public sellTax = {};\n", sell_tax));
        variables.push_str(&format!("uint256 public liquidityShare = {};\n", liquidity_share));
        variables.push_str(&format!("uint256 public marketingShare = {};\n", marketing_share));
        variables.push_str("address public marketingWallet;\n");
        variables.push_str(&format!(
            "uint256 public swapTokensAtAmount = {};\n",
            ctx.share_of_supply(threshold_bps)
        ));
        variables.push_str("uint256 private _taxTokens;");

        let constructor = format!("marketingWallet = {};", wallet_expr);

        Ok(FeatureOutput::new()
            .section(HookPoint::Variables, variables)
            .section(HookPoint::Constructor, constructor)
            .section(HookPoint::TransferOverride, transfer_stage())
            .section(HookPoint::HelperFunctions, helpers())
            .setter(tax_setter(admin::SET_BUY_TAX, "buyTax"))
            .setter(tax_setter(admin::SET_SELL_TAX, "sellTax"))
            .setter(
                AdminSetter::new(
                    admin::SET_TAX_SHARES,
                    "uint256 newLiquidityShare, uint256 newMarketingShare",
                )
                .line("liquidityShare = newLiquidityShare;")
                .line("marketingShare = newMarketingShare;"),
            )
            .setter(
                AdminSetter::new(admin::SET_MARKETING_WALLET, "address newWallet")
                    .line("require(newWallet != address(0), \"Tax: zero address\");")
                    .line("marketingWallet = newWallet;"),
            )
            .setter(
                AdminSetter::new(admin::SET_TAX_SWAP_THRESHOLD, "uint256 newAmount")
                    .line("require(newAmount > 0, \"Tax: zero threshold\");")
                    .line("swapTokensAtAmount = newAmount;"),
            ))
    }

    fn name(&self) -> &str {
        "tax"
    }
}

fn tax_setter(name: &str, variable: &str) -> AdminSetter {
    AdminSetter::new(name, "uint256 newTax")
        .line(format!(
            "require(newTax <= {}, \"Tax: exceeds maximum\");",
            MAX_TAX_PERCENT
        ))
        .line(format!("{} = newTax;", variable))
}

/// Assigns the shared fee value; the declaration lives in the frame.
fn transfer_stage() -> String {
    let fee = SharedValue::FEE_AMOUNT.name;
    let mut code = String::new();
    code.push_str(&format!(
        "if (_taxTokens >= swapTokensAtAmount && from != {}) {{\n",
        PAIR
    ));
    code.push_str("    _swapAndDistribute(swapTokensAtAmount);\n");
    code.push_str("}\n");
    code.push_str(&format!("if (from == {} && buyTax > 0) {{\n", PAIR));
    code.push_str(&format!("    {} = amount * buyTax / 100;\n", fee));
    code.push_str(&format!("}} else if (to == {} && sellTax > 0) {{\n", PAIR));
    code.push_str(&format!("    {} = amount * sellTax / 100;\n", fee));
    code.push_str("}\n");
    code.push_str(&format!("if ({} > 0) {{\n", fee));
    code.push_str(&format!("    _taxTokens += {};\n", fee));
    code.push_str(&format!("    amount -= {};\n", fee));
    code.push_str(&format!("    super._transfer(from, address(this), {});\n", fee));
    code.push('}');
    code
}

fn helpers() -> String {
    let mut code = String::new();
    code.push_str("function _swapAndDistribute(uint256 tokenAmount) private lockTheSwap {\n");
    code.push_str("    uint256 totalShares = liquidityShare + marketingShare;\n");
    code.push_str("    if (totalShares == 0) {\n");
    code.push_str("        return;\n");
    code.push_str("    }\n");
    code.push_str("    _taxTokens -= tokenAmount;\n");
    code.push_str("    uint256 liquidityTokens = tokenAmount * liquidityShare / totalShares / 2;\n");
    code.push_str("    uint256 initialBalance = address(this).balance;\n");
    code.push_str("    _swapTokensForEth(tokenAmount - liquidityTokens);\n");
    code.push_str("    uint256 ethReceived = address(this).balance - initialBalance;\n");
    code.push_str("    uint256 liquidityEth = ethReceived * liquidityShare / (totalShares * 2 - liquidityShare);\n");
    code.push_str("    if (liquidityTokens > 0 && liquidityEth > 0) {\n");
    code.push_str("        _addLiquidity(liquidityTokens, liquidityEth);\n");
    code.push_str("    }\n");
    code.push_str("    uint256 marketingEth = ethReceived - liquidityEth;\n");
    code.push_str("    if (marketingEth > 0) {\n");
    code.push_str("        (bool sent, ) = payable(marketingWallet).call{value: marketingEth}(\"\");\n");
    code.push_str("        require(sent, \"Tax: marketing transfer failed\");\n");
    code.push_str("    }\n");
    code.push('}');
    code
}
