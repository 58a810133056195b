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

//! The per-field pipeline shared by every codec:
//! extract → literal-boolean substitution → class-normalize → indirection →
//! defaulting → validate → expression-validate → required → assign/emit.
//!
//! All state here is call-scoped. The exclusivity-claim map and the
//! extracted elements live exactly as long as one marshal/unmarshal call.

pub mod json;
pub mod line;
pub mod query;

use std::collections::HashMap;

use crate::error::Error;
use crate::field::record::Record;
use crate::field::FieldValue;
use crate::meta::{Accessor, FieldDescriptor};
use crate::normalize::{canonical_bool, emission_bool, normalize};
use crate::resolver::TypeResolver;
use crate::types::{TypeClass, UNKNOWN_SENTINEL};
use crate::util;
use crate::validate::{check_expr, check_range, check_required, check_size};

/// A raw string pulled from a source representation, plus where it came
/// from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedElement {
    pub raw: String,
    pub origin: Origin,
}

/// Provenance of an extracted element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Ordinal slot within a delimited line.
    Slot(usize),
    /// The prefix token that matched.
    Prefix(String),
    /// The object key that matched.
    Key(String),
}

/// Exclusivity claims of one marshal call: group key to the claiming field's
/// declaration index. A claim is released when the claimant is later judged
/// skip-worthy, so a subsequent group member may still emit.
pub(crate) type Claims = HashMap<String, usize>;

fn field_at<'a, T: Record>(
    record: &'a T,
    index: usize,
    desc: &FieldDescriptor,
) -> Result<&'a dyn FieldValue, Error> {
    record.field(index).ok_or_else(|| {
        Error::configuration(format!(
            "field `{}`: layout index {} is out of range for the record",
            desc.field, index
        ))
    })
}

fn field_at_mut<'a, T: Record>(
    record: &'a mut T,
    index: usize,
    desc: &FieldDescriptor,
) -> Result<&'a mut dyn FieldValue, Error> {
    record.field_mut(index).ok_or_else(|| {
        Error::configuration(format!(
            "field `{}`: layout index {} is out of range for the record",
            desc.field, index
        ))
    })
}

fn release_claim(claims: &mut Claims, desc: &FieldDescriptor, index: usize) {
    if let Some(group) = &desc.group {
        if claims.get(group) == Some(&index) {
            claims.remove(group);
        }
    }
}

/// Runs one field through the marshal pipeline. `Ok(None)` means the field
/// is skipped (group lost, skip flag, absent sentinel).
pub(crate) fn emit_field<T: Record>(
    record: &T,
    index: usize,
    desc: &FieldDescriptor,
    claims: &mut Claims,
) -> Result<Option<String>, Error> {
    if let Some(group) = &desc.group {
        match claims.get(group) {
            Some(&holder) if holder != index => return Ok(None),
            _ => {
                claims.insert(group.clone(), index);
            }
        }
    }

    let fv = field_at(record, index, desc)?;
    let mut value = fv.render(desc);

    // Enum-sentinel rule: a zero value stringifying to "unknown" is absent,
    // never emitted literally.
    if fv.is_zero() && value.eq_ignore_ascii_case(UNKNOWN_SENTINEL) {
        match &desc.default {
            Some(default) => value = default.clone(),
            None => {
                release_claim(claims, desc, index);
                return Ok(None);
            }
        }
    } else if fv.is_blank() || fv.is_zero() {
        if let Some(default) = &desc.default {
            value = default.clone();
        }
    }

    if desc.class == TypeClass::Boolean {
        value = canonical_bool(desc, &value);
    }
    value = normalize(desc, &value);

    if let Some(acc) = &desc.getter {
        value = route_getter(record, index, acc, &value)?;
    }

    let numeric_zero = util::parse_i64_strict(&value) == Some(0);
    if (desc.skip_blank && value.is_empty()) || (desc.skip_zero && numeric_zero) {
        release_claim(claims, desc, index);
        return Ok(None);
    }
    if desc.zero_blank && numeric_zero {
        value.clear();
    }

    check_size(desc, &value)?;
    check_range(desc, &value)?;
    check_expr(desc, &value, record)?;
    check_required(desc, &value)?;

    if desc.class == TypeClass::Boolean && !value.is_empty() {
        value = emission_bool(desc, &value);
    }
    Ok(Some(value))
}

/// Runs one field through the unmarshal pipeline and assigns the result.
/// `element` is `None` when the source held nothing for this field.
pub(crate) fn absorb_field<T: Record>(
    resolver: &TypeResolver,
    record: &mut T,
    index: usize,
    desc: &FieldDescriptor,
    element: Option<&ExtractedElement>,
) -> Result<(), Error> {
    let raw = element.map_or("", |e| e.raw.as_str());
    let mut value = prepare_value(desc, raw);

    // Defaulting happens before validation, and the default itself runs
    // through the same substitution and filtering as a wire value.
    if value.is_empty() {
        if let Some(default) = &desc.default {
            let current = field_at(record, index, desc)?;
            if current.is_blank() || current.is_zero() {
                value = prepare_value(desc, default);
            }
        }
    }

    if let Some(abstract_name) = &desc.dyn_type {
        let needs_value = desc.setter.is_some() || !value.is_empty();
        if field_at(record, index, desc)?.is_absent() && needs_value {
            let concrete = resolver.materialize_dyn(abstract_name, desc.field)?;
            field_at_mut(record, index, desc)?.materialize(concrete)?;
        }
    }

    let assigned = match &desc.setter {
        Some(acc) => {
            route_setter(record, index, acc, &value)?;
            true
        }
        None => false,
    };

    // A setter assigns directly; its result is re-stringified and
    // re-validated. The plain path validates the pipeline value and only
    // then assigns.
    let check_value = if assigned {
        field_at(record, index, desc)?.render(desc)
    } else {
        value.clone()
    };
    validate_value(record, desc, &check_value)?;

    if !assigned {
        field_at_mut(record, index, desc)?.assign(&value, desc)?;
    }
    Ok(())
}

/// Computes a `virtual`-positioned field: invoked once, after all positioned
/// fields are assigned; the computed value passes the normal checks.
pub(crate) fn compute_virtual<T: Record>(
    record: &mut T,
    index: usize,
    desc: &FieldDescriptor,
    strict: bool,
) -> Result<(), Error> {
    let Some(acc) = &desc.setter else {
        if strict {
            return Err(Error::configuration(format!(
                "field `{}`: virtual field declares no setter",
                desc.field
            )));
        }
        return Ok(());
    };
    let current = field_at(record, index, desc)?.render(desc);
    route_setter(record, index, acc, &current)?;
    let computed = field_at(record, index, desc)?.render(desc);
    validate_value(record, desc, &computed)
}

/// Resets every field of the record to its zero/absent state. A failed
/// unmarshal runs this before returning, so callers never observe a
/// half-populated record.
pub(crate) fn reset_record<T: Record>(record: &mut T) {
    for index in 0..T::layout().len() {
        if let Some(field) = record.field_mut(index) {
            field.clear();
        }
    }
}

fn prepare_value(desc: &FieldDescriptor, raw: &str) -> String {
    let substituted = if desc.class == TypeClass::Boolean {
        canonical_bool(desc, raw)
    } else {
        raw.to_string()
    };
    normalize(desc, &substituted)
}

fn validate_value<T: Record>(
    record: &T,
    desc: &FieldDescriptor,
    value: &str,
) -> Result<(), Error> {
    check_size(desc, value)?;
    check_range(desc, value)?;
    check_expr(desc, value, record)?;
    check_required(desc, value)
}

fn route_getter<T: Record>(
    record: &T,
    index: usize,
    acc: &Accessor,
    value: &str,
) -> Result<String, Error> {
    let arg = acc.takes_value.then_some(value);
    if !acc.on_record {
        // Capability dispatch first; freeform name-lookup is the legacy
        // compatibility path.
        if let Some(gettable) = record.field(index).and_then(|f| f.as_gettable()) {
            return gettable.get_value(arg);
        }
    }
    record.invoke_getter(&acc.name, arg)
}

fn route_setter<T: Record>(
    record: &mut T,
    index: usize,
    acc: &Accessor,
    value: &str,
) -> Result<(), Error> {
    if !acc.on_record {
        if let Some(settable) = record.field_mut(index).and_then(|f| f.as_settable()) {
            return settable.set_value(value);
        }
    }
    record.invoke_setter(&acc.name, value)
}
