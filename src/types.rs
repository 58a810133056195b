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

use crate::error::Error;

/// The literals recognized as boolean true, case-insensitively, before any
/// per-field `truthy`/`falsy` overrides are consulted. `true` itself is a
/// member so that marshaled output round-trips.
pub static TRUE_LITERALS: &[&str] = &["true", "yes", "on", "running", "started", "y", "1"];

/// Canonical boolean wire forms produced by the normalizer.
pub const CANON_TRUE: &str = "true";
pub const CANON_FALSE: &str = "false";

/// The sentinel stringification of an enum-like zero value. A zero value that
/// renders to this, case-insensitively, is treated as absent on marshal.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Type class of a field, declared via the `class` descriptor key.
///
/// The class selects the normalizer filter applied to a raw value before
/// validation. `Base64` intentionally shares the `AlphaNumericSymbol` filter
/// and does not enforce the base64 alphabet; narrowing it would reject data
/// accepted by existing deployments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeClass {
    /// Keeps ASCII letters.
    Alpha,
    /// Keeps ASCII digits only. Sign and decimal point are the validator's
    /// concern, not the filter's.
    Numeric,
    /// Keeps ASCII letters and digits.
    AlphaNumeric,
    /// Keeps all ASCII graphic characters.
    AlphaNumericSymbol,
    /// Keeps hex digits.
    Hex,
    /// Same filter as [`TypeClass::AlphaNumericSymbol`].
    Base64,
    /// Maps a literal set to canonical `true`/`false`.
    Boolean,
    /// Removes every match of the declared pattern.
    RegexFilter,
    /// Identity filter.
    #[default]
    Unconstrained,
}

impl TypeClass {
    /// Parses a `class` descriptor token. Unknown tokens fall back to
    /// [`TypeClass::Unconstrained`] unless `strict` is set.
    pub fn parse(token: &str, strict: bool) -> Result<TypeClass, Error> {
        let class = match token.to_ascii_uppercase().as_str() {
            "A" => TypeClass::Alpha,
            "N" => TypeClass::Numeric,
            "AN" => TypeClass::AlphaNumeric,
            "ANS" => TypeClass::AlphaNumericSymbol,
            "HEX" => TypeClass::Hex,
            "B64" => TypeClass::Base64,
            "BOOL" => TypeClass::Boolean,
            "RGX" => TypeClass::RegexFilter,
            "RAW" | "" => TypeClass::Unconstrained,
            other => {
                if strict {
                    return Err(Error::configuration(format!(
                        "unknown type class `{other}`"
                    )));
                }
                TypeClass::Unconstrained
            }
        };
        Ok(class)
    }
}
