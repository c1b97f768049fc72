//! Environment variable sources

use std::collections::{BTreeMap, HashMap};
use std::env;

/// A key/value lookup the binder reads from.
///
/// Absent keys (`None`) and keys set to an empty string (`Some("")`) are
/// distinct: the first leaves a field untouched, the second is coerced.
pub trait Environment {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The live process environment.
///
/// Every lookup reads current process state; nothing is cached between
/// fields. Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl Environment for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}
