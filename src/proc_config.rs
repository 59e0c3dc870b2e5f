//! Procedure configuration bags and their allow-lists

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GdsError, GdsResult};
use crate::procedure::ProcedureName;
use crate::query_runner::Params;

/// Configuration keys an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedKeys {
    /// Pass every key through; the server validates
    Any,
    /// Only these keys
    Only(&'static [&'static str]),
}

impl AllowedKeys {
    pub fn permits(&self, key: &str) -> bool {
        match self {
            AllowedKeys::Any => true,
            AllowedKeys::Only(keys) => keys.contains(&key),
        }
    }

    fn describe(&self) -> String {
        match self {
            AllowedKeys::Any => "any".to_string(),
            AllowedKeys::Only([]) => "none".to_string(),
            AllowedKeys::Only(keys) => keys.join(", "),
        }
    }
}

/// Option name → value map bound as the `$config` parameter.
///
/// ```
/// # use graphdatascience::ProcConfig;
/// let config = ProcConfig::new()
///     .with("mutateProperty", "rank")
///     .with("dampingFactor", 0.85);
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcConfig(Params);

impl ProcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject the first key `allowed` does not permit.
    pub fn validate(&self, procedure: &ProcedureName, allowed: AllowedKeys) -> GdsResult<()> {
        match self.keys().find(|key| !allowed.permits(key)) {
            Some(key) => Err(GdsError::IllegalConfigKey {
                procedure: procedure.to_string(),
                key: key.clone(),
                allowed: allowed.describe(),
            }),
            None => Ok(()),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Params> for ProcConfig {
    fn from(params: Params) -> Self {
        Self(params)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ProcConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
