use super::traits::AcceptedOptions;
use crate::constants::variants;
use std::collections::HashMap;

/// The closed set of backend variants an agent will dispatch to, with the
/// options each one accepts.
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    variants: HashMap<String, AcceptedOptions>,
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VariantRegistry {
    pub fn empty() -> Self {
        Self {
            variants: HashMap::new(),
        }
    }

    /// `ollama`, `groq` and `openai`.
    pub fn builtin() -> Self {
        Self::empty()
            .with(variants::OLLAMA, AcceptedOptions::LOCAL)
            .with(variants::GROQ, AcceptedOptions::CHAT)
            .with(variants::OPENAI, AcceptedOptions::COMPLETION)
    }

    pub fn with(mut self, variant: impl Into<String>, accepted: AcceptedOptions) -> Self {
        self.register(variant, accepted);
        self
    }

    pub fn register(&mut self, variant: impl Into<String>, accepted: AcceptedOptions) {
        self.variants.insert(variant.into(), accepted);
    }

    pub fn accepted(&self, variant: &str) -> Option<AcceptedOptions> {
        self.variants.get(variant).copied()
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.variants.contains_key(variant)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
