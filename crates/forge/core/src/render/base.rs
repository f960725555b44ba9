//! Contract skeleton pieces that belong to no feature.

use super::admin::AdminSetter;
use super::{ContractHeader, RenderContext};
use crate::catalog::admin;
use crate::types::{GeneratorConfig, TokenSpec};

/// Contributor label for skeleton-owned fragments.
pub const BASE_LABEL: &str = "base";

pub fn header(spec: &TokenSpec, config: &GeneratorConfig, ctx: &RenderContext) -> ContractHeader {
    ContractHeader {
        license: config.license.clone(),
        contract_name: spec.contract_name(),
        token_name: spec.name.trim().to_string(),
        token_symbol: spec.symbol.trim().to_string(),
        decimals: spec.decimals,
        supply_expr: ctx.supply_expr.clone(),
    }
}

/// Override of an inherited ownership setter so it can carry a guard.
pub fn ownership_setter(name: &str) -> Option<AdminSetter> {
    match name {
        admin::TRANSFER_OWNERSHIP => Some(
            AdminSetter::new(admin::TRANSFER_OWNERSHIP, "address newOwner")
                .overriding()
                .line("super.transferOwnership(newOwner);"),
        ),
        admin::RENOUNCE_OWNERSHIP => Some(
            AdminSetter::new(admin::RENOUNCE_OWNERSHIP, "")
                .overriding()
                .line("super.renounceOwnership();"),
        ),
        _ => None,
    }
}
