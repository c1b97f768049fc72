//! Field descriptors and the mutable views the binder writes through

use crate::record::Record;
use crate::value::{Kind, Primitive, Value};

/// Static metadata for one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    key: Option<&'static str>,
}

impl FieldDescriptor {
    /// An empty key is treated as no binding at all.
    pub const fn new(name: &'static str, key: Option<&'static str>) -> Self {
        let key = match key {
            Some(k) if k.is_empty() => None,
            other => other,
        };
        Self { name, key }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Environment variable bound to this field, if any.
    pub fn key(&self) -> Option<&'static str> {
        self.key
    }
}

/// A field holding a primitive directly.
pub trait ValueSlot {
    fn kind(&self) -> Kind;

    /// Overwrite the field in place.
    fn set(&mut self, value: Value) -> Result<(), Value>;
}

impl<T: Primitive> ValueSlot for T {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn set(&mut self, value: Value) -> Result<(), Value> {
        *self = T::from_value(value)?;
        Ok(())
    }
}

/// An optional primitive field.
///
/// A successful write always stores a freshly built value; a previously
/// absent field is never written through.
pub trait PointerSlot {
    /// Kind of the pointee.
    fn kind(&self) -> Kind;

    fn is_set(&self) -> bool;

    fn set(&mut self, value: Value) -> Result<(), Value>;
}

impl<T: Primitive> PointerSlot for Option<T> {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn is_set(&self) -> bool {
        self.is_some()
    }

    fn set(&mut self, value: Value) -> Result<(), Value> {
        let fresh = T::from_value(value)?;
        *self = Some(fresh);
        Ok(())
    }
}

/// How the walker sees one field.
pub enum FieldRef<'a> {
    /// Primitive stored in place.
    Value(&'a mut dyn ValueSlot),
    /// Optional primitive, allocated on a successful write.
    Pointer(&'a mut dyn PointerSlot),
    /// Nested record, walked recursively.
    Record(&'a mut dyn Record),
    /// Optional record that is not present; nothing below it is visited.
    Absent,
}

impl FieldRef<'_> {
    /// Kind used for default coercion, unwrapping optional primitives.
    pub fn effective_kind(&self) -> Kind {
        match self {
            FieldRef::Value(slot) => slot.kind(),
            FieldRef::Pointer(slot) => slot.kind(),
            FieldRef::Record(_) | FieldRef::Absent => Kind::Other,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, FieldRef::Pointer(_))
    }
}

/// Types that can appear as a record field.
pub trait Field {
    fn as_field(&mut self) -> FieldRef<'_>;
}

/// Types that can appear inside an `Option` record field.
pub trait Pointee: Sized {
    fn optional_field(slot: &mut Option<Self>) -> FieldRef<'_>;
}

impl<T: Pointee> Field for Option<T> {
    fn as_field(&mut self) -> FieldRef<'_> {
        T::optional_field(self)
    }
}

/// Register primitive types as record fields.
///
/// Built-in primitives are already registered. Use this for newtypes that
/// implement [`Primitive`](crate::Primitive):
///
/// ```rust
/// use envbind::{primitive_field, Kind, Primitive, Value};
///
/// struct Port(u16);
///
/// impl Primitive for Port {
///     const KIND: Kind = Kind::U16;
///
///     fn from_value(value: Value) -> Result<Self, Value> {
///         u16::from_value(value).map(Port)
///     }
/// }
///
/// primitive_field!(Port);
/// ```
#[macro_export]
macro_rules! primitive_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Field for $ty {
                fn as_field(&mut self) -> $crate::FieldRef<'_> {
                    $crate::FieldRef::Value(self)
                }
            }

            impl $crate::Pointee for $ty {
                fn optional_field(slot: &mut ::std::option::Option<Self>) -> $crate::FieldRef<'_> {
                    $crate::FieldRef::Pointer(slot)
                }
            }
        )+
    };
}

primitive_field!(bool, String, f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
