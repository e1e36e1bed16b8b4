//! Feature gates.
use std::collections::HashMap;

/// Reset minimal shell mode when the app comes back to the foreground.
pub const DISABLE_MIN_SHELL_ON_FOREGROUNDING: &str = "disable_min_shell_on_foregrounding";

pub trait FeatureGate: Send + Sync {
    fn gate(&self, name: &str) -> bool;
}

/// Gates from a fixed table. Unknown gates are closed.
#[derive(Debug, Clone, Default)]
pub struct StaticGates {
    gates: HashMap<String, bool>,
}

impl StaticGates {
    pub fn new(gates: HashMap<String, bool>) -> Self {
        Self { gates }
    }

    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.gates.insert(name.to_string(), enabled);
        self
    }
}

impl FeatureGate for StaticGates {
    fn gate(&self, name: &str) -> bool {
        self.gates.get(name).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_gate_closed() {
        assert!(!StaticGates::default().gate("anything"));
    }

    #[test]
    fn test_gate_lookup() {
        let gates = StaticGates::default()
            .with(DISABLE_MIN_SHELL_ON_FOREGROUNDING, true)
            .with("other", false);
        assert!(gates.gate(DISABLE_MIN_SHELL_ON_FOREGROUNDING));
        assert!(!gates.gate("other"));
    }
}
