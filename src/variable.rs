use std::collections::HashMap;
use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, Result};
use crate::membership::{Membership, SharedMembership};

new_key_type! {
    /// A linguistic variable key
    pub struct VariableKey;
}

/// A named membership function usable inside rules.
#[derive(Clone)]
pub struct LinguisticVariable {
    name: String,
    membership: SharedMembership,
}

impl LinguisticVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn membership(&self) -> &SharedMembership {
        &self.membership
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.membership.degree(x)
    }
}

impl fmt::Debug for LinguisticVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinguisticVariable")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of linguistic variables. Names are case-insensitive.
///
/// Registering a name twice replaces the membership function in its
/// existing slot, so the key, and every rule compiled against it, keeps
/// pointing at the variable.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    slots: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<String, VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            names: HashMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, membership: SharedMembership) -> VariableKey {
        let name = name.trim().to_lowercase();

        if let Some(&key) = self.names.get(&name) {
            if let Some(slot) = self.slots.get_mut(key) {
                slot.membership = membership;
                return key;
            }
        }

        let key = self.slots.insert(LinguisticVariable {
            name: name.clone(),
            membership,
        });
        self.names.insert(name, key);

        key
    }

    pub fn key(&self, name: &str) -> Option<VariableKey> {
        self.names.get(&name.trim().to_lowercase()).copied()
    }

    pub fn resolve(&self, name: &str) -> Result<VariableKey> {
        self.key(name)
            .ok_or_else(|| FuzzyError::UnknownLinguisticVariable(name.to_owned()))
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable> {
        self.slots.get(key)
    }

    /// The degree of `x` in the variable at `key`; NaN for a stale key.
    pub fn degree(&self, key: VariableKey, x: f64) -> f64 {
        self.slots.get(key).map_or(f64::NAN, |var| var.degree(x))
    }

    pub fn value_of(&self, name: &str, x: f64) -> Result<f64> {
        let key = self.resolve(name)?;
        Ok(self.degree(key, x))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.slots.values()
    }
}

#[cfg(test)]
use crate::membership::{from_fn, shared};

#[test]
fn test_set_and_resolve() {
    let mut vars = Variables::new();
    let key = vars.set("Large", shared(from_fn(|x| if x >= 100. { 1. } else { 0. })));

    assert_eq!(vars.key("large"), Some(key));
    assert_eq!(vars.resolve("LARGE"), Ok(key));
    assert_eq!(vars.get(key).map(LinguisticVariable::name), Some("large"));
    assert_eq!(vars.value_of("large", 150.), Ok(1.));
    assert_eq!(
        vars.resolve("small"),
        Err(FuzzyError::UnknownLinguisticVariable("small".to_owned()))
    );
}

#[test]
fn test_overwrite_keeps_key() {
    let mut vars = Variables::new();
    let first = vars.set("warm", shared(from_fn(|_| 0.25)));
    let second = vars.set("warm", shared(from_fn(|_| 0.75)));

    assert_eq!(first, second);
    assert_eq!(vars.len(), 1);
    assert_eq!(vars.degree(first, 20.), 0.75);
}

#[test]
fn test_stale_key_is_nan() {
    let vars = Variables::new();

    assert!(vars.degree(VariableKey::default(), 1.).is_nan());
    assert!(vars.is_empty());
}
