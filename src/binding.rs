//==================================================
// File: binding.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Per-call argument mapping handed to host implementations
// Objective: Keep supplied arguments keyed by declared name, in call-site order
//==================================================

use crate::value::Value;

/// Arguments supplied for one call, keyed by declared argument name.
///
/// Only arguments the caller actually supplied are present. Iteration follows
/// the order in which the registry bound them, which is the call-site order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentBinding {
    entries: Vec<(String, Value)>,
}

impl ArgumentBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing an earlier value for the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ArgumentBinding {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut binding = ArgumentBinding::new();
        for (name, value) in iter {
            binding.insert(name, value);
        }
        binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_distinct_from_any_value() {
        let binding: ArgumentBinding = [("value", Value::Bool(false))].into_iter().collect();
        assert_eq!(binding.get("value"), Some(&Value::Bool(false)));
        assert!(binding.get("other").is_none());
    }

    #[test]
    fn preserves_binding_order_and_replaces_in_place() {
        let mut binding = ArgumentBinding::new();
        binding.insert("input", Value::from("%@"));
        binding.insert("arg", Value::from(1.0));
        binding.insert("arg2", Value::from(2.0));
        binding.insert("arg", Value::from(9.0));
        let names: Vec<&str> = binding.names().collect();
        assert_eq!(names, vec!["input", "arg", "arg2"]);
        assert_eq!(binding.remove("input"), Some(Value::from("%@")));
        assert_eq!(binding.values().cloned().collect::<Vec<_>>(), vec![
            Value::Number(9.0),
            Value::Number(2.0)
        ]);
    }
}
