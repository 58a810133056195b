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

//! Value normalization: class filtering plus silent truncation to size-max.
//! Truncation never fails validation; size-min and modulo violations are the
//! validator's responsibility.

use crate::meta::FieldDescriptor;
use crate::types::{TypeClass, CANON_FALSE, CANON_TRUE, TRUE_LITERALS};
use crate::util;

/// Applies the field's class filter and truncates to size-max.
pub fn normalize(desc: &FieldDescriptor, raw: &str) -> String {
    let filtered = match desc.class {
        TypeClass::Alpha => util::keep_alpha(raw),
        TypeClass::Numeric => util::keep_digits(raw),
        TypeClass::AlphaNumeric => util::keep_alphanumeric(raw),
        // Base64 shares the AlphaNumericSymbol filter; the base64 alphabet
        // is not enforced.
        TypeClass::AlphaNumericSymbol | TypeClass::Base64 => util::keep_graphic(raw),
        TypeClass::Hex => util::keep_hex(raw),
        TypeClass::RegexFilter => match &desc.filter {
            Some(pattern) => pattern.replace_all(raw, "").into_owned(),
            None => raw.to_string(),
        },
        TypeClass::Boolean | TypeClass::Unconstrained => raw.to_string(),
    };
    match desc.size.max {
        Some(max) if max >= 0 => util::clamped_prefix(&filtered, max as usize).to_string(),
        _ => filtered,
    }
}

/// Maps a boolean literal to its canonical wire form.
///
/// Per-field `falsy` overrides win first, then `truthy` overrides and the
/// built-in true-literal set; anything else is false. An empty value stays
/// empty so defaulting and the required check still see it as absent.
pub fn canonical_bool(desc: &FieldDescriptor, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if util::contains_ignore_case(&desc.falsy, trimmed) {
        return CANON_FALSE.to_string();
    }
    if util::contains_ignore_case(&desc.truthy, trimmed)
        || util::contains_ignore_case(TRUE_LITERALS, trimmed)
    {
        return CANON_TRUE.to_string();
    }
    CANON_FALSE.to_string()
}

/// Chooses the emission literal for a canonical boolean value. With literal
/// overrides declared, the first override of the matching polarity is
/// emitted; otherwise the canonical form passes through.
pub fn emission_bool(desc: &FieldDescriptor, canonical: &str) -> String {
    if canonical == CANON_TRUE {
        if let Some(lit) = desc.truthy.first() {
            return lit.clone();
        }
    } else if canonical == CANON_FALSE {
        if let Some(lit) = desc.falsy.first() {
            return lit.clone();
        }
    }
    canonical.to_string()
}
