//! Binding of a single field

use crate::error::LoadError;
use crate::field::{FieldDescriptor, FieldRef};
use crate::record::Record;
use crate::source::Environment;
use crate::value::Value;

/// Decides whether and how one field is assigned.
pub(crate) struct Binder<'e> {
    env: &'e dyn Environment,
}

impl<'e> Binder<'e> {
    pub(crate) fn new(env: &'e dyn Environment) -> Self {
        Self { env }
    }

    /// Read the variable bound to `field`, once per field.
    pub(crate) fn lookup(&self, field: &FieldDescriptor) -> Option<String> {
        field.key().and_then(|key| self.env.lookup(key))
    }

    /// Ask the declaring record for a custom value.
    ///
    /// Runs before the presence check, so a decoder can supply a value for a
    /// variable that is not set at all; it then sees an empty string.
    pub(crate) fn decode<R: Record + ?Sized>(
        &self,
        parent: &R,
        field: &FieldDescriptor,
        raw: Option<&str>,
    ) -> Result<Option<Value>, LoadError> {
        let Some(key) = field.key() else {
            return Ok(None);
        };
        parent
            .decode_field(field.name(), key, raw.unwrap_or_default())
            .map_err(|source| LoadError::Decode {
                field: field.name(),
                key,
                source,
            })
    }

    /// Assign a decoded value, or fall back to the environment.
    pub(crate) fn bind(
        &self,
        target: &mut FieldRef<'_>,
        field: &FieldDescriptor,
        raw: Option<&str>,
        decoded: Option<Value>,
    ) -> Result<(), LoadError> {
        let Some(key) = field.key() else {
            return Ok(());
        };

        if let Some(value) = decoded {
            return assign(target, field, value);
        }

        let Some(raw) = raw else {
            tracing::debug!(field = field.name(), key, "environment variable not set, keeping current value");
            return Ok(());
        };

        let kind = target.effective_kind();
        let coerced = kind.coerce(raw).map_err(|source| LoadError::Parse {
            field: field.name(),
            key,
            source,
        })?;

        match coerced {
            Some(value) => assign(target, field, value),
            None => {
                tracing::debug!(field = field.name(), key, %kind, "no value coerced, field skipped");
                Ok(())
            }
        }
    }
}

fn assign(target: &mut FieldRef<'_>, field: &FieldDescriptor, value: Value) -> Result<(), LoadError> {
    let from = value.kind();
    let result = match target {
        FieldRef::Value(slot) => slot.set(value),
        FieldRef::Pointer(slot) => slot.set(value),
        FieldRef::Record(_) | FieldRef::Absent => {
            tracing::debug!(field = field.name(), %from, "record fields cannot take a value, skipped");
            return Ok(());
        }
    };

    result.map_err(|_| LoadError::Convert {
        field: field.name(),
        from,
        to: target.effective_kind(),
    })?;
    tracing::trace!(field = field.name(), pointer = target.is_pointer(), "field assigned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unbound_field_is_untouched() {
        let vars = env(&[("PORT", "1")]);
        let binder = Binder::new(&vars);
        let mut port = 80u16;
        let mut target = FieldRef::Value(&mut port);
        binder
            .bind(&mut target, &FieldDescriptor::new("port", None), Some("1"), None)
            .unwrap();
        assert_eq!(port, 80);
    }

    #[test]
    fn test_absent_key_keeps_default() {
        let vars = env(&[]);
        let binder = Binder::new(&vars);
        let mut port = 80u16;
        let mut target = FieldRef::Value(&mut port);
        binder
            .bind(&mut target, &FieldDescriptor::new("port", Some("PORT")), None, None)
            .unwrap();
        assert_eq!(port, 80);
    }

    #[test]
    fn test_decoded_value_wins_over_environment() {
        let vars = env(&[("PORT", "1")]);
        let binder = Binder::new(&vars);
        let mut port = 80u16;
        let mut target = FieldRef::Value(&mut port);
        binder
            .bind(
                &mut target,
                &FieldDescriptor::new("port", Some("PORT")),
                Some("1"),
                Some(Value::I64(9000)),
            )
            .unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_unassignable_decoded_value_is_an_error() {
        let vars = env(&[]);
        let binder = Binder::new(&vars);
        let mut port: Option<u16> = None;
        let mut target = FieldRef::Pointer(&mut port);
        let err = binder
            .bind(
                &mut target,
                &FieldDescriptor::new("port", Some("PORT")),
                None,
                Some(Value::from("nope")),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Convert { field: "port", from: Kind::String, to: Kind::U16 }
        ));
        assert_eq!(port, None);
    }

    #[test]
    fn test_float_failure_names_field_and_key() {
        let vars = env(&[("RATIO", "x")]);
        let binder = Binder::new(&vars);
        let mut ratio = 0.5f64;
        let mut target = FieldRef::Value(&mut ratio);
        let err = binder
            .bind(&mut target, &FieldDescriptor::new("ratio", Some("RATIO")), Some("x"), None)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse { field: "ratio", key: "RATIO", .. }));
        assert_eq!(ratio, 0.5);
    }
}
