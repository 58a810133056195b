// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::field::record::Record;
use crate::field::DynField;
use crate::meta::FieldDescriptor;

type DynFactory = fn() -> Box<dyn DynField>;

fn make_dyn<T: DynField + Default>() -> Box<dyn DynField> {
    Box::new(T::default())
}

/// Parsed descriptor set of one record type, in field declaration order.
/// `None` entries are fields that carry no descriptor.
#[derive(Debug)]
pub struct RecordLayout {
    pub descriptors: Vec<Option<FieldDescriptor>>,
}

impl RecordLayout {
    /// Parses the layout of `T` fresh. Call-scoped unless cached through
    /// [`TypeResolver::register`].
    pub fn parse<T: Record>(strict: bool) -> Result<RecordLayout, Error> {
        let descriptors = T::layout()
            .iter()
            .map(|decl| FieldDescriptor::parse(decl.name, decl.meta, strict))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(RecordLayout { descriptors })
    }
}

/// Registry of polymorphic-type factories and cached record layouts.
///
/// Registration happens through `&mut self` before an engine is shared;
/// every lookup is `&self`, so concurrent marshal/unmarshal calls need no
/// locking. The factory map is the explicit dependency-injection point for
/// polymorphic fields: a descriptor's `dyn=Name` resolves here, and a
/// missing entry is a hard error at the point of use.
#[derive(Default)]
pub struct TypeResolver {
    dyn_factories: HashMap<String, DynFactory>,
    layouts: HashMap<TypeId, Arc<RecordLayout>>,
}

impl TypeResolver {
    /// Registers a concrete type under an abstract type name.
    pub fn register_dyn<T: DynField + Default>(&mut self, name: &str) -> Result<(), Error> {
        if self.dyn_factories.contains_key(name) {
            return Err(Error::configuration(format!(
                "type name `{name}` is already registered"
            )));
        }
        self.dyn_factories.insert(name.to_string(), make_dyn::<T>);
        Ok(())
    }

    /// Materializes a zero value of the concrete type behind `name`.
    pub fn materialize_dyn(&self, name: &str, field: &str) -> Result<Box<dyn DynField>, Error> {
        match self.dyn_factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(Error::indirection(format!(
                "field `{field}`: no type registered under `{name}`"
            ))),
        }
    }

    /// Parses and caches the layout of `T`.
    pub fn register<T: Record>(&mut self, strict: bool) -> Result<(), Error> {
        let layout = RecordLayout::parse::<T>(strict)?;
        self.layouts.insert(TypeId::of::<T>(), Arc::new(layout));
        Ok(())
    }

    /// Returns the cached layout of `T`, or parses it fresh for
    /// unregistered types. The cache is an optimization, not a requirement.
    pub fn layout_of<T: Record>(&self, strict: bool) -> Result<Arc<RecordLayout>, Error> {
        if let Some(layout) = self.layouts.get(&TypeId::of::<T>()) {
            return Ok(layout.clone());
        }
        Ok(Arc::new(RecordLayout::parse::<T>(strict)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{DynValue, FieldValue, Gettable, Settable};
    use crate::meta::FieldDescriptor;

    #[derive(Debug, Default)]
    struct Marker(String);

    impl FieldValue for Marker {
        fn render(&self, _desc: &FieldDescriptor) -> String {
            self.0.clone()
        }
        fn assign(&mut self, raw: &str, _desc: &FieldDescriptor) -> Result<(), Error> {
            self.0 = raw.to_string();
            Ok(())
        }
        fn is_blank(&self) -> bool {
            self.0.is_empty()
        }
        fn is_zero(&self) -> bool {
            self.0.is_empty()
        }
        fn clear(&mut self) {
            self.0.clear();
        }
        fn as_gettable(&self) -> Option<&dyn Gettable> {
            None
        }
        fn as_settable(&mut self) -> Option<&mut dyn Settable> {
            None
        }
    }

    impl DynField for Marker {}

    #[test]
    fn dyn_registration_and_materialization() {
        let mut resolver = TypeResolver::default();
        resolver.register_dyn::<Marker>("Marker").unwrap();
        assert!(resolver.register_dyn::<Marker>("Marker").is_err());

        let value = resolver.materialize_dyn("Marker", "tag").unwrap();
        assert!(value.is_blank());
        assert!(resolver.materialize_dyn("Missing", "tag").is_err());
    }

    #[test]
    fn materialized_value_installs_into_a_dyn_slot() {
        let mut resolver = TypeResolver::default();
        resolver.register_dyn::<Marker>("Marker").unwrap();
        let mut slot = DynValue::default();
        assert!(slot.is_absent());
        slot.materialize(resolver.materialize_dyn("Marker", "tag").unwrap())
            .unwrap();
        assert!(!slot.is_absent());
    }
}
