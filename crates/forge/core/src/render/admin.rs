//! Administrative setter fragments and the timelock guard.
//!
//! Feature renderers describe their setters as [`AdminSetter`] values; the
//! plan decides whether each one is wrapped. The guard refers to the
//! timelock state through the names below, which the timelock feature
//! renderer declares.

/// Expiry mapping keyed by function id.
pub const TIMELOCK_EXPIRY: &str = "timelockExpiry";
/// Records an expiry for a function id.
pub const CREATE_TIMELOCK: &str = "_createTimelock";
/// True once a recorded expiry has passed.
pub const TIMELOCK_EXPIRED: &str = "_timelockExpired";

/// One owner-only setter, body unindented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSetter {
    pub name: String,
    pub params: String,
    pub modifiers: String,
    pub body: Vec<String>,
}

impl AdminSetter {
    pub fn new(name: &str, params: &str) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            modifiers: "external onlyOwner".into(),
            body: Vec::new(),
        }
    }

    /// Setter overriding an inherited `public virtual` function.
    pub fn overriding(mut self) -> Self {
        self.modifiers = "public override onlyOwner".into();
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    /// Function text; `timelocked` prepends the schedule/execute guard.
    pub fn render(&self, timelocked: bool) -> String {
        let mut code = String::new();
        code.push_str(&format!(
            "function {}({}) {} {{\n",
            self.name, self.params, self.modifiers
        ));
        if timelocked {
            for line in timelock_guard(&self.name) {
                code.push_str(&format!("    {}\n", line));
            }
        }
        for line in &self.body {
            code.push_str(&format!("    {}\n", line));
        }
        code.push('}');
        code
    }
}

/// First call schedules and returns; a call after the delay clears the
/// entry and falls through to the body.
pub fn timelock_guard(function_name: &str) -> Vec<String> {
    vec![
        format!(
            "bytes32 functionId = keccak256(abi.encodePacked(\"{}\"));",
            function_name
        ),
        format!("if ({}[functionId] == 0) {{", TIMELOCK_EXPIRY),
        format!("    {}(functionId);", CREATE_TIMELOCK),
        "    return;".into(),
        "}".into(),
        format!(
            "require({}(functionId), \"Timelock: delay not elapsed\");",
            TIMELOCK_EXPIRED
        ),
        format!("delete {}[functionId];", TIMELOCK_EXPIRY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_setter() {
        let setter = AdminSetter::new("setBuyTax", "uint256 newTax").line("buyTax = newTax;");
        assert_eq!(
            setter.render(false),
            "function setBuyTax(uint256 newTax) external onlyOwner {\n    buyTax = newTax;\n}"
        );
    }

    #[test]
    fn timelocked_setter_guards_before_body() {
        let text = AdminSetter::new("setBuyTax", "uint256 newTax")
            .line("buyTax = newTax;")
            .render(true);
        let guard = text.find("keccak256(abi.encodePacked(\"setBuyTax\"))").unwrap();
        let schedule = text.find("_createTimelock(functionId);").unwrap();
        let check = text.find("_timelockExpired(functionId)").unwrap();
        let body = text.find("buyTax = newTax;").unwrap();
        assert!(guard < schedule && schedule < check && check < body);
        assert!(text.contains("delete timelockExpiry[functionId];"));
    }

    #[test]
    fn overriding_setter_modifiers() {
        let text = AdminSetter::new("renounceOwnership", "")
            .overriding()
            .line("super.renounceOwnership();")
            .render(false);
        assert!(text.starts_with("function renounceOwnership() public override onlyOwner {"));
    }
}
