use std::collections::HashMap;

use crate::expr::Bindings;

/// Crisp values bound to parameter names, used both for rule arguments and
/// for the extra context of consequents. Names are lower-cased on insertion
/// to match rule text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, name: &str, val: f64) -> &mut Self {
        self.0.insert(name.trim().to_lowercase(), val);
        self
    }

    pub fn with(mut self, name: &str, val: f64) -> Self {
        self.add(name, val);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Bindings for Inputs {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut inputs = Inputs::new();
        for (name, val) in iter {
            inputs.add(name.as_ref(), val);
        }
        inputs
    }
}

impl<K: AsRef<str>, const N: usize> From<[(K, f64); N]> for Inputs {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[test]
fn test_inputs() {
    let inputs = Inputs::from([("X", 100.), ("y", 25.)]);

    assert_eq!(inputs.get("x"), Some(100.));
    assert_eq!(inputs.lookup("y"), Some(25.));
    assert!(!inputs.contains("X"));
    assert_eq!(inputs.len(), 2);

    let built = Inputs::new().with("t", 1.).with("t", 2.);
    assert_eq!(built.get("t"), Some(2.));
    assert_eq!(built.names().collect::<Vec<_>>(), vec!["t"]);
}
