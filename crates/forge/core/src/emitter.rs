//! Source emitter.
//!
//! Assembles the contract skeleton and the rendered fragments into one
//! source text. Fragments keep the order the renderer produced them in;
//! the emitter only groups them by hook point and indents them.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::render::{Fragment, RenderedContract};
use crate::types::{FeatureId, HookPoint};

/// Compiler version range written into every contract.
pub const PRAGMA: &str = "pragma solidity ^0.8.19;";

/// Base imports every contract carries.
pub const BASE_IMPORTS: [&str; 2] = [
    "import \"@openzeppelin/contracts/token/ERC20/ERC20.sol\";",
    "import \"@openzeppelin/contracts/access/Ownable.sol\";",
];

const INDENT: &str = "    ";

/// The generation result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub contract_name: String,
    pub source_text: String,
    /// Enabled features in catalog order.
    pub enabled_feature_ids: Vec<FeatureId>,
    /// BLAKE3 of `source_text`.
    pub source_hash: String,
}

impl GeneratedArtifact {
    pub fn line_count(&self) -> usize {
        self.source_text.lines().count()
    }
}

/// Emit the final artifact. Deterministic in its input.
pub fn emit(rendered: &RenderedContract) -> GeneratedArtifact {
    let header = &rendered.header;
    let mut code = String::new();

    code.push_str(&format!("// SPDX-License-Identifier: {}\n", header.license));
    code.push_str(PRAGMA);
    code.push_str("\n\n");
    for line in imports(rendered) {
        code.push_str(&line);
        code.push('\n');
    }
    code.push('\n');

    code.push_str(&format!("contract {} is ERC20, Ownable {{\n", header.contract_name));

    // Each block is a member-level chunk; blocks are separated by a blank line.
    let mut blocks: Vec<String> = Vec::new();

    blocks.extend(section(rendered, HookPoint::Variables));

    let mut constructor = format!(
        "constructor() ERC20({}, \"{}\") {{\n",
        string_literal(&header.token_name),
        header.token_symbol
    );
    constructor.push_str(&format!(
        "{}{}_mint(msg.sender, {});\n",
        INDENT, INDENT, header.supply_expr
    ));
    let constructor_body = join_fragments(rendered, HookPoint::Constructor);
    if !constructor_body.is_empty() {
        constructor.push('\n');
        constructor.push_str(&constructor_body);
        constructor.push('\n');
    }
    constructor.push_str(&format!("{}}}", INDENT));
    blocks.push(format!("{}{}", INDENT, constructor));

    if header.decimals != 18 {
        let mut decimals = String::new();
        decimals.push_str("function decimals() public pure override returns (uint8) {\n");
        decimals.push_str(&format!("    return {};\n", header.decimals));
        decimals.push('}');
        blocks.push(indent(&decimals, 1));
    }

    if let Some(transfer) = transfer_override(rendered) {
        blocks.push(transfer);
    }

    blocks.extend(section(rendered, HookPoint::AdminFunctions));
    blocks.extend(section(rendered, HookPoint::HelperFunctions));

    code.push_str(&blocks.join("\n\n"));
    code.push_str("\n}\n");

    let source_hash = blake3::hash(code.as_bytes()).to_hex().to_string();
    tracing::debug!(
        contract = %header.contract_name,
        fragments = rendered.fragments.len(),
        bytes = code.len(),
        "contract emitted"
    );

    GeneratedArtifact {
        contract_name: header.contract_name.clone(),
        source_text: code,
        enabled_feature_ids: rendered.enabled_features.clone(),
        source_hash,
    }
}

/// Base imports followed by fragment imports, first occurrence wins.
fn imports(rendered: &RenderedContract) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut lines = Vec::new();
    let fragment_lines = rendered
        .fragments_for(HookPoint::Imports)
        .flat_map(|f| f.text.lines())
        .map(str::trim)
        .filter(|l| !l.is_empty());
    for line in BASE_IMPORTS.iter().copied().chain(fragment_lines) {
        if seen.insert(line.to_string()) {
            lines.push(line.to_string());
        }
    }
    lines
}

/// One block per fragment, indented for the hook.
fn section(rendered: &RenderedContract, hook: HookPoint) -> Vec<String> {
    rendered
        .fragments_for(hook)
        .map(|f| indent(&f.text, hook.indent_level()))
        .collect()
}

fn join_fragments(rendered: &RenderedContract, hook: HookPoint) -> String {
    let texts: Vec<String> = section(rendered, hook);
    texts.join("\n\n")
}

/// Transfer override with its fixed guard, present iff any stage exists.
fn transfer_override(rendered: &RenderedContract) -> Option<String> {
    let stages: Vec<&Fragment> = rendered.fragments_for(HookPoint::TransferOverride).collect();
    if stages.is_empty() {
        return None;
    }
    let frame = &rendered.transfer_frame;
    let level = HookPoint::TransferOverride.indent_level();

    let mut body = String::new();
    let guard = if frame.swap_guard {
        "_inSwap || from == owner() || to == owner()"
    } else {
        "from == owner() || to == owner()"
    };
    body.push_str(&format!("if ({}) {{\n", guard));
    body.push_str("    super._transfer(from, to, amount);\n");
    body.push_str("    return;\n");
    body.push('}');
    let mut parts = vec![indent(&body, level)];

    if !frame.shared_declarations.is_empty() {
        parts.push(indent(&frame.shared_declarations.join("\n"), level));
    }
    parts.extend(stages.iter().map(|f| indent(&f.text, level)));
    parts.push(indent("super._transfer(from, to, amount);", level));

    let mut code = String::new();
    code.push_str(INDENT);
    code.push_str("function _transfer(address from, address to, uint256 amount) internal override {\n");
    code.push_str(&parts.join("\n\n"));
    code.push('\n');
    code.push_str(INDENT);
    code.push('}');
    Some(code)
}

/// Prefix every non-empty line with `level` indents.
fn indent(text: &str, level: usize) -> String {
    let prefix = INDENT.repeat(level);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Solidity string literal; non-ASCII text needs the `unicode` prefix.
fn string_literal(value: &str) -> String {
    if value.is_ascii() {
        format!("\"{}\"", value)
    } else {
        format!("unicode\"{}\"", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Contributor;
    use crate::render::{ContractHeader, TransferFrame};

    fn header(decimals: u8) -> ContractHeader {
        ContractHeader {
            license: "MIT".into(),
            contract_name: "Moon".into(),
            token_name: "Moon".into(),
            token_symbol: "MOON".into(),
            decimals,
            supply_expr: "1000 * 10 ** 18".into(),
        }
    }

    fn fragment(hook: HookPoint, id: &str, text: &str) -> Fragment {
        Fragment {
            hook_point: hook,
            origin: Contributor::feature(&FeatureId::from_name(id)),
            text: text.into(),
        }
    }

    fn contract(fragments: Vec<Fragment>, frame: TransferFrame) -> RenderedContract {
        RenderedContract {
            header: header(18),
            fragments,
            transfer_frame: frame,
            enabled_features: vec![],
        }
    }

    #[test]
    fn bare_contract_has_skeleton_only() {
        let artifact = emit(&contract(vec![], TransferFrame::default()));
        let src = &artifact.source_text;
        assert!(src.starts_with("// SPDX-License-Identifier: MIT\npragma solidity ^0.8.19;\n"));
        assert!(src.contains("contract Moon is ERC20, Ownable {"));
        assert!(src.contains("    constructor() ERC20(\"Moon\", \"MOON\") {\n        _mint(msg.sender, 1000 * 10 ** 18);\n    }"));
        assert!(!src.contains("_transfer"));
        assert!(!src.contains("decimals()"));
        assert!(src.ends_with("}\n"));
        assert_eq!(artifact.source_hash.len(), 64);
    }

    #[test]
    fn fragments_are_indented_per_hook() {
        let artifact = emit(&contract(
            vec![
                fragment(HookPoint::Variables, "a", "uint256 public x = 1;"),
                fragment(HookPoint::Constructor, "a", "x = 2;"),
                fragment(HookPoint::TransferOverride, "a", "if (x > 0) {\n    amount -= 1;\n}"),
            ],
            TransferFrame::default(),
        ));
        let src = &artifact.source_text;
        assert!(src.contains("\n    uint256 public x = 1;\n"));
        assert!(src.contains("\n        x = 2;\n"));
        assert!(src.contains("\n        if (x > 0) {\n            amount -= 1;\n        }\n"));
        assert!(src.find("_mint(").unwrap() < src.find("x = 2;").unwrap());
    }

    #[test]
    fn transfer_frame_guard_and_declarations() {
        let frame = TransferFrame {
            swap_guard: true,
            shared_declarations: vec!["uint256 feeAmount;".into()],
        };
        let artifact = emit(&contract(
            vec![fragment(HookPoint::TransferOverride, "a", "feeAmount = 1;")],
            frame,
        ));
        let src = &artifact.source_text;
        let guard = src.find("if (_inSwap || from == owner() || to == owner())").unwrap();
        let decl = src.find("uint256 feeAmount;").unwrap();
        let stage = src.find("feeAmount = 1;").unwrap();
        let tail = src.rfind("super._transfer(from, to, amount);").unwrap();
        assert!(guard < decl && decl < stage && stage < tail);
    }

    #[test]
    fn guard_without_swap_has_owner_exemption_only() {
        let artifact = emit(&contract(
            vec![fragment(HookPoint::TransferOverride, "a", "require(amount > 0);")],
            TransferFrame::default(),
        ));
        assert!(artifact
            .source_text
            .contains("if (from == owner() || to == owner()) {"));
        assert!(!artifact.source_text.contains("_inSwap"));
    }

    #[test]
    fn imports_are_deduplicated() {
        let line = "import \"@openzeppelin/contracts/utils/math/Math.sol\";";
        let artifact = emit(&contract(
            vec![
                fragment(HookPoint::Imports, "a", line),
                fragment(HookPoint::Imports, "b", &format!("{}\n{}", line, BASE_IMPORTS[0])),
            ],
            TransferFrame::default(),
        ));
        assert_eq!(artifact.source_text.matches(line).count(), 1);
        assert_eq!(artifact.source_text.matches(BASE_IMPORTS[0]).count(), 1);
    }

    #[test]
    fn non_default_decimals_override() {
        let mut rendered = contract(vec![], TransferFrame::default());
        rendered.header.decimals = 9;
        let src = emit(&rendered).source_text;
        assert!(src.contains("    function decimals() public pure override returns (uint8) {\n        return 9;\n    }"));
    }

    #[test]
    fn unicode_names_use_unicode_literal() {
        let mut rendered = contract(vec![], TransferFrame::default());
        rendered.header.token_name = "Mönd".into();
        let src = emit(&rendered).source_text;
        assert!(src.contains("ERC20(unicode\"Mönd\", \"MOON\")"));
    }

    #[test]
    fn emission_is_deterministic() {
        let rendered = contract(
            vec![fragment(HookPoint::Variables, "a", "uint256 public x;")],
            TransferFrame::default(),
        );
        assert_eq!(emit(&rendered), emit(&rendered));
    }
}
