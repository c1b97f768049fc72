//! Record traits implemented by `#[derive(EnvBind)]`

use crate::config::Mode;
use crate::error::LoadError;
use crate::value::Value;
use crate::walk::Walker;

/// A struct whose fields can be bound from the environment.
///
/// Normally derived. The derive enumerates every non-skipped field in
/// declaration order and hands each one to the [`Walker`].
pub trait Record {
    /// Visit each field in declaration order.
    fn walk_fields(&mut self, walker: &mut Walker<'_>) -> Result<(), LoadError>;

    /// Custom decoder hook, consulted before the environment lookup.
    ///
    /// `raw` is the current value of `key`, or an empty string when the
    /// variable is not set. Returning `Ok(None)` falls through to the default
    /// coercion.
    fn decode_field(&self, field: &str, key: &str, raw: &str) -> anyhow::Result<Option<Value>> {
        let _ = (field, key, raw);
        Ok(None)
    }

    /// Record how the value was populated. No-op unless the record has a
    /// `#[env(mode)]` field.
    fn set_mode(&mut self, mode: Mode) {
        let _ = mode;
    }
}

/// Per-record override of the string-to-value conversion.
///
/// Enable it with `#[env(custom_decode)]` on the struct:
///
/// ```rust
/// use envbind::{DecodeField, EnvBind, Value};
///
/// #[derive(EnvBind)]
/// #[env(custom_decode)]
/// struct Config {
///     #[env(key = "APP_NAME")]
///     name: String,
/// }
///
/// impl DecodeField for Config {
///     fn decode_field(&self, field: &str, _key: &str, raw: &str) -> anyhow::Result<Option<Value>> {
///         match field {
///             "name" if raw.is_empty() => Ok(Some(Value::from("unnamed"))),
///             _ => Ok(None),
///         }
///     }
/// }
/// ```
pub trait DecodeField {
    /// Produce a value for `field`, or `None` to use the default coercion.
    fn decode_field(&self, field: &str, key: &str, raw: &str) -> anyhow::Result<Option<Value>>;
}

/// Anything accepted by the load entry points.
///
/// Only a mutable reference can be populated. `Option<&mut R>` models a
/// reference that may be null, and a derived record passed by value is
/// rejected.
pub trait Target<'a> {
    type Record: Record + ?Sized + 'a;

    fn into_record(self) -> Result<&'a mut Self::Record, LoadError>;
}

impl<'a, R: Record + ?Sized + 'a> Target<'a> for &'a mut R {
    type Record = R;

    fn into_record(self) -> Result<&'a mut R, LoadError> {
        Ok(self)
    }
}

impl<'a, R: Record + ?Sized + 'a> Target<'a> for Option<&'a mut R> {
    type Record = R;

    fn into_record(self) -> Result<&'a mut R, LoadError> {
        self.ok_or_else(LoadError::null_target::<R>)
    }
}
