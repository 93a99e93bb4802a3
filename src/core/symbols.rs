//! Flat symbol table for one translation run.
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::ast::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Variable,
    Constant,
}

impl SymbolKind {
    pub fn from_const(is_const: bool) -> Self {
        if is_const {
            SymbolKind::Constant
        } else {
            SymbolKind::Variable
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolInfo {
    pub declared_type: ValueType,
    /// Last value text seen for this name (literal, rendered arithmetic, or
    /// folded boolean).
    pub value: String,
    /// Numeric value at the time `value` was recorded, for int/float names
    /// whose value was known then.
    pub numeric: Option<f64>,
    pub is_reference: bool,
    pub kind: SymbolKind,
}

/// Name → metadata. No scoping: a name occupies one slot for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: BTreeMap<String, SymbolInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SymbolInfo> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SymbolInfo> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert or replace, returning whatever was there before.
    pub fn insert(&mut self, name: &str, info: SymbolInfo) -> Option<SymbolInfo> {
        self.entries.insert(name.to_string(), info)
    }

    pub fn declared_type(&self, name: &str) -> Option<ValueType> {
        self.get(name).map(|s| s.declared_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolInfo)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(value: &str, kind: SymbolKind) -> SymbolInfo {
        SymbolInfo { declared_type: ValueType::Int, value: value.into(), numeric: None, is_reference: false, kind }
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut table = SymbolTable::new();
        assert!(table.insert("x", info("1", SymbolKind::Variable)).is_none());
        let prev = table.insert("x", info("2", SymbolKind::Constant));
        assert_eq!(prev.map(|p| p.value), Some("1".to_string()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("x").map(|s| s.kind), Some(SymbolKind::Constant));
    }

    #[test]
    fn serializes_as_name_map() {
        let mut table = SymbolTable::new();
        table.insert("b", info("2", SymbolKind::Variable));
        table.insert("a", info("1", SymbolKind::Constant));
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with(r#"{"a":{"declared_type":"int","value":"1""#), "{json}");
        assert!(json.contains(r#""kind":"variable""#));
    }
}
