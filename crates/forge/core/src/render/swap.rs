//! Shared DEX router capability.
//!
//! Emitted once per contract no matter how many features need it. The
//! pair is plain storage (not immutable) so constructor fragments that
//! run after it can read it.

use crate::types::HookPoint;

/// Uniswap V2 router on Ethereum mainnet, EIP-55 form.
pub const UNISWAP_V2_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";

/// Names other fragments may reference.
pub const PAIR: &str = "uniswapV2Pair";
pub const SWAP_FLAG: &str = "_inSwap";

/// Capability text for one hook point.
pub fn section(hook: HookPoint) -> Option<String> {
    match hook {
        HookPoint::Imports => Some(imports()),
        HookPoint::Variables => Some(variables()),
        HookPoint::Constructor => Some(constructor()),
        HookPoint::HelperFunctions => Some(helpers()),
        HookPoint::TransferOverride | HookPoint::AdminFunctions => None,
    }
}

fn imports() -> String {
    let mut code = String::new();
    code.push_str("import \"@uniswap/v2-core/contracts/interfaces/IUniswapV2Factory.sol\";\n");
    code.push_str("import \"@uniswap/v2-periphery/contracts/interfaces/IUniswapV2Router02.sol\";");
    code
}

fn variables() -> String {
    let mut code = String::new();
    code.push_str(&format!(
        "address public constant UNISWAP_V2_ROUTER = {};\n",
        UNISWAP_V2_ROUTER
    ));
    code.push_str("IUniswapV2Router02 public immutable uniswapV2Router;\n");
    code.push_str(&format!("address public {};\n", PAIR));
    code.push_str(&format!("bool private {};\n", SWAP_FLAG));
    code.push('\n');
    code.push_str("modifier lockTheSwap() {\n");
    code.push_str(&format!("    {} = true;\n", SWAP_FLAG));
    code.push_str("    _;\n");
    code.push_str(&format!("    {} = false;\n", SWAP_FLAG));
    code.push('}');
    code
}

fn constructor() -> String {
    let mut code = String::new();
    code.push_str("IUniswapV2Router02 router = IUniswapV2Router02(UNISWAP_V2_ROUTER);\n");
    code.push_str("uniswapV2Router = router;\n");
    code.push_str(&format!(
        "{} = IUniswapV2Factory(router.factory()).createPair(address(this), router.WETH());",
        PAIR
    ));
    code
}

fn helpers() -> String {
    let mut code = String::new();
    code.push_str("function _swapTokensForEth(uint256 tokenAmount) internal {\n");
    code.push_str("    address[] memory path = new address[](2);\n");
    code.push_str("    path[0] = address(this);\n");
    code.push_str("    path[1] = uniswapV2Router.WETH();\n");
    code.push_str("    _approve(address(this), address(uniswapV2Router), tokenAmount);\n");
    code.push_str("    uniswapV2Router.swapExactTokensForETHSupportingFeeOnTransferTokens(\n");
    code.push_str("        tokenAmount,\n");
    code.push_str("        0,\n");
    code.push_str("        path,\n");
    code.push_str("        address(this),\n");
    code.push_str("        block.timestamp\n");
    code.push_str("    );\n");
    code.push_str("}\n\n");
    code.push_str("function _addLiquidity(uint256 tokenAmount, uint256 ethAmount) internal {\n");
    code.push_str("    _approve(address(this), address(uniswapV2Router), tokenAmount);\n");
    code.push_str("    uniswapV2Router.addLiquidityETH{value: ethAmount}(\n");
    code.push_str("        address(this),\n");
    code.push_str("        tokenAmount,\n");
    code.push_str("        0,\n");
    code.push_str("        0,\n");
    code.push_str("        owner(),\n");
    code.push_str("        block.timestamp\n");
    code.push_str("    );\n");
    code.push_str("}\n\n");
    code.push_str("receive() external payable {}");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::to_checksum_address;

    #[test]
    fn router_literal_is_checksummed() {
        assert_eq!(
            to_checksum_address(UNISWAP_V2_ROUTER).as_deref(),
            Some(UNISWAP_V2_ROUTER)
        );
    }

    #[test]
    fn no_transfer_or_admin_sections() {
        assert!(section(HookPoint::TransferOverride).is_none());
        assert!(section(HookPoint::AdminFunctions).is_none());
    }

    #[test]
    fn variables_declare_swap_flag_and_modifier() {
        let text = section(HookPoint::Variables).unwrap();
        assert!(text.contains("bool private _inSwap;"));
        assert!(text.contains("modifier lockTheSwap()"));
        assert!(!text.contains("immutable uniswapV2Pair"));
    }

    #[test]
    fn helpers_provide_swap_and_liquidity() {
        let text = section(HookPoint::HelperFunctions).unwrap();
        assert!(text.contains("function _swapTokensForEth(uint256 tokenAmount) internal"));
        assert!(text.contains("function _addLiquidity(uint256 tokenAmount, uint256 ethAmount) internal"));
        assert!(text.contains("receive() external payable {}"));
    }
}
