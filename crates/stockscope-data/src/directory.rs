//! Symbol display-name lookup.

use async_trait::async_trait;
use std::collections::HashMap;
use stockscope_core::error::DataError;
use stockscope_core::traits::SymbolDirectory;
use stockscope_core::types::UNKNOWN_NAME;
use tracing::warn;

/// Directory backed by a fixed table, usually the `symbols` config section.
///
/// Symbols match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    names: HashMap<String, String>,
}

impl StaticDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        let names = names
            .into_iter()
            .map(|(symbol, name)| (symbol.to_ascii_uppercase(), name))
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[async_trait]
impl SymbolDirectory for StaticDirectory {
    async fn display_name(&self, symbol: &str) -> Result<Option<String>, DataError> {
        Ok(self.names.get(&symbol.to_ascii_uppercase()).cloned())
    }
}

/// Resolve a display name, falling back to `UNKNOWN_NAME`.
///
/// Lookup failures never abort an analysis.
pub async fn resolve_display_name(directory: &dyn SymbolDirectory, symbol: &str) -> String {
    match directory.display_name(symbol).await {
        Ok(Some(name)) => name,
        Ok(None) => {
            warn!(symbol, "Symbol not listed in directory");
            UNKNOWN_NAME.to_string()
        }
        Err(e) => {
            warn!(symbol, error = %e, "Display name lookup failed");
            UNKNOWN_NAME.to_string()
        }
    }
}
