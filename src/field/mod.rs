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

//! Field value abstraction. Every field of a [`Record`](record::Record) is
//! reached through the [`FieldValue`] trait object, which stringifies,
//! assigns, probes the [`Gettable`]/[`Settable`] capabilities, and resets to
//! the zero state for rollback.

pub mod record;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::Error;
use crate::meta::FieldDescriptor;
use crate::types::{CANON_FALSE, CANON_TRUE, TRUE_LITERALS};
use crate::util;

/// Default render/parse formats for date and datetime fields when the
/// descriptor declares no `timefmt`.
const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Capability of a field type that formats itself for marshaling.
///
/// The pipeline probes this before falling back to the record's freeform
/// named-getter dispatch, so a field type can supply custom formatting
/// without the engine knowing the concrete type.
pub trait Gettable {
    /// Produces the wire value. `arg` carries the field's current
    /// stringified value when the descriptor's getter reference has the `+`
    /// marker.
    fn get_value(&self, arg: Option<&str>) -> Result<String, Error>;
}

/// Capability of a field type that parses itself during unmarshaling.
pub trait Settable {
    /// Consumes the pipeline value. The field is re-stringified and
    /// re-validated afterwards; an error aborts the whole operation.
    fn set_value(&mut self, raw: &str) -> Result<(), Error>;
}

/// A polymorphic field value, materialized from the engine's type registry
/// by the abstract name the descriptor declares.
pub trait DynField: FieldValue {}

/// Uniform access to one field of a record.
///
/// An empty `raw` assigns the type's zero value; parse failures are
/// reported, not substituted.
pub trait FieldValue: 'static {
    /// Stringifies the current value for the marshal pipeline.
    fn render(&self, desc: &FieldDescriptor) -> String;

    /// Parses and stores a wire value.
    fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error>;

    /// Whether the value is textually empty (empty string, absent option).
    fn is_blank(&self) -> bool;

    /// Whether the value equals the type's zero value.
    fn is_zero(&self) -> bool;

    /// Whether an optional or polymorphic slot holds no value at all.
    fn is_absent(&self) -> bool {
        false
    }

    /// Resets to the zero/absent state. Rollback is a `clear` of every
    /// field.
    fn clear(&mut self);

    fn as_gettable(&self) -> Option<&dyn Gettable> {
        None
    }

    fn as_settable(&mut self) -> Option<&mut dyn Settable> {
        None
    }

    /// Installs a concrete value into a polymorphic slot. Only
    /// [`DynValue`] accepts this.
    fn materialize(&mut self, _concrete: Box<dyn DynField>) -> Result<(), Error> {
        Err(Error::indirection("field is not polymorphic"))
    }
}

impl FieldValue for String {
    fn render(&self, _desc: &FieldDescriptor) -> String {
        self.clone()
    }

    fn assign(&mut self, raw: &str, _desc: &FieldDescriptor) -> Result<(), Error> {
        *self = raw.to_string();
        Ok(())
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn clear(&mut self) {
        String::clear(self);
    }
}

macro_rules! impl_field_value_for_int {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn render(&self, _desc: &FieldDescriptor) -> String {
                    self.to_string()
                }

                fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
                    if raw.is_empty() {
                        *self = 0;
                        return Ok(());
                    }
                    let n = util::parse_i64_strict(raw).ok_or_else(|| {
                        Error::validation(format!(
                            "field `{}`: value `{}` is not numeric",
                            desc.field, raw
                        ))
                    })?;
                    *self = <$ty>::try_from(n).map_err(|_| {
                        Error::validation(format!(
                            "field `{}`: value {} does not fit the field type",
                            desc.field, n
                        ))
                    })?;
                    Ok(())
                }

                fn is_blank(&self) -> bool {
                    false
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn clear(&mut self) {
                    *self = 0;
                }
            }
        )*
    };
}

impl_field_value_for_int!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_field_value_for_float {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn render(&self, _desc: &FieldDescriptor) -> String {
                    self.to_string()
                }

                fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
                    if raw.is_empty() {
                        *self = 0.0;
                        return Ok(());
                    }
                    *self = raw.trim().parse().map_err(|_| {
                        Error::validation(format!(
                            "field `{}`: value `{}` is not numeric",
                            desc.field, raw
                        ))
                    })?;
                    Ok(())
                }

                fn is_blank(&self) -> bool {
                    false
                }

                fn is_zero(&self) -> bool {
                    *self == 0.0
                }

                fn clear(&mut self) {
                    *self = 0.0;
                }
            }
        )*
    };
}

impl_field_value_for_float!(f32, f64);

impl FieldValue for bool {
    fn render(&self, _desc: &FieldDescriptor) -> String {
        if *self { CANON_TRUE } else { CANON_FALSE }.to_string()
    }

    fn assign(&mut self, raw: &str, _desc: &FieldDescriptor) -> Result<(), Error> {
        // The normalizer canonicalizes declared Boolean fields before
        // assignment; raw literals still land here for undeclared classes.
        *self = util::contains_ignore_case(TRUE_LITERALS, raw.trim());
        Ok(())
    }

    fn is_blank(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn clear(&mut self) {
        *self = false;
    }
}

impl FieldValue for NaiveDateTime {
    fn render(&self, desc: &FieldDescriptor) -> String {
        let format = desc.time_format.as_deref().unwrap_or(DEFAULT_DATETIME_FORMAT);
        self.format(format).to_string()
    }

    fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
        if raw.is_empty() {
            *self = NaiveDateTime::default();
            return Ok(());
        }
        let format = desc.time_format.as_deref().unwrap_or(DEFAULT_DATETIME_FORMAT);
        *self = NaiveDateTime::parse_from_str(raw, format).map_err(|e| {
            Error::validation(format!(
                "field `{}`: `{}` does not match time format `{}`: {}",
                desc.field, raw, format, e
            ))
        })?;
        Ok(())
    }

    fn is_blank(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        *self == NaiveDateTime::default()
    }

    fn clear(&mut self) {
        *self = NaiveDateTime::default();
    }
}

impl FieldValue for NaiveDate {
    fn render(&self, desc: &FieldDescriptor) -> String {
        let format = desc.time_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
        self.format(format).to_string()
    }

    fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
        if raw.is_empty() {
            *self = NaiveDate::default();
            return Ok(());
        }
        let format = desc.time_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
        *self = NaiveDate::parse_from_str(raw, format).map_err(|e| {
            Error::validation(format!(
                "field `{}`: `{}` does not match time format `{}`: {}",
                desc.field, raw, format, e
            ))
        })?;
        Ok(())
    }

    fn is_blank(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        *self == NaiveDate::default()
    }

    fn clear(&mut self) {
        *self = NaiveDate::default();
    }
}

/// An absent option is blank and zero; assigning a non-empty value
/// materializes `Some(T::default())` first, then delegates.
impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn render(&self, desc: &FieldDescriptor) -> String {
        match self {
            Some(inner) => inner.render(desc),
            None => String::new(),
        }
    }

    fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
        if raw.is_empty() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).assign(raw, desc)
    }

    fn is_blank(&self) -> bool {
        match self {
            Some(inner) => inner.is_blank(),
            None => true,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Some(inner) => inner.is_zero(),
            None => true,
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn as_gettable(&self) -> Option<&dyn Gettable> {
        self.as_ref().and_then(|inner| inner.as_gettable())
    }

    fn as_settable(&mut self) -> Option<&mut dyn Settable> {
        self.get_or_insert_with(T::default).as_settable()
    }
}

/// Slot for a polymorphic field value.
///
/// The concrete type behind the slot comes from the engine's type registry,
/// keyed by the abstract name the descriptor declares with `dyn=Name`; the
/// codec materializes the slot before routing a value into it. A record with
/// a `DynValue` field starts with the slot absent.
#[derive(Default)]
pub struct DynValue {
    slot: Option<Box<dyn DynField>>,
}

impl DynValue {
    /// Borrows the concrete value, if materialized.
    pub fn get(&self) -> Option<&dyn DynField> {
        self.slot.as_deref()
    }
}

impl std::fmt::Debug for DynValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.slot {
            Some(_) => f.write_str("DynValue(set)"),
            None => f.write_str("DynValue(absent)"),
        }
    }
}

impl FieldValue for DynValue {
    fn render(&self, desc: &FieldDescriptor) -> String {
        match &self.slot {
            Some(inner) => inner.render(desc),
            None => String::new(),
        }
    }

    fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
        match &mut self.slot {
            Some(inner) => inner.assign(raw, desc),
            None if raw.is_empty() => Ok(()),
            None => Err(Error::indirection(format!(
                "field `{}`: polymorphic slot was not materialized",
                desc.field
            ))),
        }
    }

    fn is_blank(&self) -> bool {
        match &self.slot {
            Some(inner) => inner.is_blank(),
            None => true,
        }
    }

    fn is_zero(&self) -> bool {
        match &self.slot {
            Some(inner) => inner.is_zero(),
            None => true,
        }
    }

    fn is_absent(&self) -> bool {
        self.slot.is_none()
    }

    fn clear(&mut self) {
        self.slot = None;
    }

    fn as_gettable(&self) -> Option<&dyn Gettable> {
        self.slot.as_deref().and_then(|inner| inner.as_gettable())
    }

    fn as_settable(&mut self) -> Option<&mut dyn Settable> {
        self.slot.as_deref_mut().and_then(|inner| inner.as_settable())
    }

    fn materialize(&mut self, concrete: Box<dyn DynField>) -> Result<(), Error> {
        self.slot = Some(concrete);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::FieldDescriptor;

    fn desc(meta: &str) -> FieldDescriptor {
        FieldDescriptor::parse("f", meta, false).unwrap().unwrap()
    }

    #[test]
    fn int_assign_and_zero() {
        let d = desc("class=N");
        let mut v: i64 = 7;
        v.assign("42", &d).unwrap();
        assert_eq!(v, 42);
        v.assign("", &d).unwrap();
        assert_eq!(v, 0);
        assert!(v.is_zero());
        assert!(v.assign("4x2", &d).is_err());
    }

    #[test]
    fn int_overflow_is_reported() {
        let d = desc("class=N");
        let mut v: u8 = 0;
        assert!(v.assign("300", &d).is_err());
    }

    #[test]
    fn option_materializes_on_assign() {
        let d = desc("class=N");
        let mut v: Option<i32> = None;
        assert!(v.is_absent() && v.is_blank() && v.is_zero());
        v.assign("5", &d).unwrap();
        assert_eq!(v, Some(5));
        v.assign("", &d).unwrap();
        assert_eq!(v, None);
    }

    #[test]
    fn datetime_uses_the_declared_format() {
        let d = desc("timefmt=%Y/%m/%d %H:%M");
        let mut v = NaiveDateTime::default();
        v.assign("2024/03/01 12:30", &d).unwrap();
        assert_eq!(v.render(&d), "2024/03/01 12:30");
        assert!(v.assign("01-03-2024", &d).is_err());
    }

    #[test]
    fn bool_literals() {
        let d = desc("class=BOOL");
        let mut v = false;
        v.assign("running", &d).unwrap();
        assert!(v);
        v.assign("off", &d).unwrap();
        assert!(!v);
    }
}
