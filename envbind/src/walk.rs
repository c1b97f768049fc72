//! Depth-first traversal of records and their nested records

use crate::bind::Binder;
use crate::error::LoadError;
use crate::field::{FieldDescriptor, FieldRef};
use crate::record::Record;
use crate::source::Environment;

/// Walks a record tree, binding each field it passes.
///
/// Fields are visited in declaration order. The first fatal error stops the
/// walk; fields bound before it keep their new values.
pub struct Walker<'e> {
    binder: Binder<'e>,
    depth: usize,
}

impl<'e> Walker<'e> {
    pub(crate) fn new(env: &'e dyn Environment) -> Self {
        Self {
            binder: Binder::new(env),
            depth: 0,
        }
    }

    /// Walk a root record. The root itself has no descriptor and is never
    /// bound directly.
    pub(crate) fn walk_root<R: Record + ?Sized>(&mut self, record: &mut R) -> Result<(), LoadError> {
        record.walk_fields(self)
    }

    /// Bind one field of `parent`, then descend into it if it is a record.
    ///
    /// `project` locates the field on its parent. The custom decoder runs
    /// against the parent before the field is borrowed. The variable is read
    /// once and that same value feeds both the decoder and the coercion.
    pub fn field<R, F>(&mut self, parent: &mut R, descriptor: &FieldDescriptor, project: F) -> Result<(), LoadError>
    where
        R: Record + ?Sized,
        F: FnOnce(&mut R) -> FieldRef<'_>,
    {
        let raw = self.binder.lookup(descriptor);
        let decoded = self.binder.decode(&*parent, descriptor, raw.as_deref())?;
        let mut field = project(parent);
        self.binder.bind(&mut field, descriptor, raw.as_deref(), decoded)?;

        match field {
            FieldRef::Record(record) => {
                tracing::trace!(field = descriptor.name(), depth = self.depth + 1, "descending into record");
                self.depth += 1;
                let result = record.walk_fields(self);
                self.depth -= 1;
                result
            }
            _ => Ok(()),
        }
    }
}
