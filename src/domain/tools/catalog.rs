//! Tool catalog - ordered registry of tool descriptors with name lookup.

use std::collections::HashMap;

use thiserror::Error;

use super::descriptor::ToolDescriptor;

/// Errors raised when building a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate tool name `{0}`")]
    DuplicateName(String),
}

/// Ordered set of tool descriptors, resolved by name.
///
/// Registration order is preserved so score distributions, prompts, and the
/// tool list presented to the LLM backend are stable across runs.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool. Names must be unique across the catalog.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), CatalogError> {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(CatalogError::DuplicateName(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Looks a tool up by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Returns true if the catalog contains the named tool.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Converts the whole catalog to OpenAI function-calling format.
    pub fn to_openai_tools(&self) -> Vec<serde_json::Value> {
        self.tools.iter().map(|t| t.to_openai_format()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::handler::FnHandler;

    fn sample_tool(name: &str) -> ToolDescriptor {
        ToolDescriptor::new(
            name,
            format!("Description for {}", name),
            serde_json::json!({"type": "object", "properties": {}}),
            Vec::<String>::new(),
            ["keyword"],
            FnHandler(|_| Ok(serde_json::json!({"status": "ok"}))),
        )
    }

    #[test]
    fn new_catalog_is_empty() {
        let catalog = ToolCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn register_adds_tool() {
        let mut catalog = ToolCatalog::new();
        catalog.register(sample_tool("provider_search")).unwrap();

        assert!(catalog.contains("provider_search"));
        assert_eq!(catalog.get("provider_search").unwrap().name(), "provider_search");
    }

    #[test]
    fn register_rejects_duplicate_name() {
        let mut catalog = ToolCatalog::new();
        catalog.register(sample_tool("provider_search")).unwrap();

        let err = catalog.register(sample_tool("provider_search")).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateName("provider_search".to_string()));
    }

    #[test]
    fn iter_preserves_registration_order() {
        let mut catalog = ToolCatalog::new();
        catalog.register(sample_tool("b_tool")).unwrap();
        catalog.register(sample_tool("a_tool")).unwrap();

        let names: Vec<&str> = catalog.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["b_tool", "a_tool"]);
    }

    #[test]
    fn to_openai_tools_covers_all_tools() {
        let mut catalog = ToolCatalog::new();
        catalog.register(sample_tool("a")).unwrap();
        catalog.register(sample_tool("b")).unwrap();

        let tools = catalog.to_openai_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["function"]["name"], "a");
    }
}
