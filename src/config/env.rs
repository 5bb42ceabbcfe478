//! Environment access seam for configuration loading.

/// Read-only access to environment variables.
///
/// Configuration loaders take this instead of touching process state so
/// tests can substitute a map-backed reader.
pub trait EnvReader: Send + Sync {
    /// Returns the value of the variable, or `None` when unset or not
    /// valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// [`EnvReader`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvReader for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// [`EnvReader`] backed by a fixed map, for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MapEnv(std::collections::HashMap<String, String>);

#[cfg(test)]
impl MapEnv {
    /// Builds a reader from key/value pairs.
    pub fn new<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
impl EnvReader for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}
