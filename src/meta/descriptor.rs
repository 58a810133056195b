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

//! Per-field descriptor metadata: a `;`-separated list of `key` and
//! `key=value` tokens, parsed into a [`FieldDescriptor`]. Parsing is pure
//! per-call introspection; the engine caches the result per record type on
//! registration since metadata never changes for a given type.

use regex::Regex;

use crate::error::Error;
use crate::meta::expr::ValidationExpr;
use crate::types::TypeClass;
use crate::util;

/// Slot addressing of a field within a delimited line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Zero-based ordinal slot.
    Slot(usize),
    /// No source slot; computed by the field's setter after all positioned
    /// fields are assigned. Line codecs only.
    Virtual,
}

/// An interval bound set from the `N` / `N..` / `..M` / `N..M` grammar.
///
/// Absent and zero bounds are distinct states: `0..` declares a present
/// minimum of zero, while `..M` declares no minimum at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interval {
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// `+%K` suffix: the final length must be a multiple of K.
    pub modulo: Option<i64>,
}

/// A named getter/setter reference.
///
/// A leading `@` marks the accessor as applying to the enclosing record
/// rather than the field's own value; a trailing `+` marks it as receiving
/// the field's current stringified value as its argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accessor {
    pub name: String,
    pub on_record: bool,
    pub takes_value: bool,
}

/// Structured per-field descriptor, derived from raw metadata.
///
/// All intermediate parse state is call-scoped; a descriptor is plain data
/// and safe to share across threads once built.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Rust-side field name, used to qualify error messages.
    pub field: &'static str,
    /// Wire name: the `name` override, or the field name.
    pub name: String,
    pub position: Option<Position>,
    pub class: TypeClass,
    pub size: Interval,
    pub range: Interval,
    /// Tri-state: `Some(true)` / `Some(false)` / unset.
    pub required: Option<bool>,
    pub default: Option<String>,
    pub expr: Option<ValidationExpr>,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
    /// Extra literals mapping to true / false for `class=BOOL`, declared as
    /// a `,`- or `|`-separated list.
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
    /// chrono format string for date/time fields.
    pub time_format: Option<String>,
    /// Literal output prefix; also the match token for the prefixed codec.
    pub prefix: Option<String>,
    /// Mutual-exclusion group key.
    pub group: Option<String>,
    pub skip_blank: bool,
    pub skip_zero: bool,
    pub zero_blank: bool,
    /// Abstract type name of a polymorphic field, resolved via the registry.
    pub dyn_type: Option<String>,
    /// Compiled pattern for `class=RGX`.
    pub filter: Option<Regex>,
}

impl FieldDescriptor {
    /// Parses one field's raw metadata.
    ///
    /// Returns `Ok(None)` when the field carries no descriptor (`""` or
    /// `"-"`): such a field is invisible to every codec. Malformed numeric
    /// sub-tokens parse as zero unless `strict` is set.
    pub fn parse(
        field: &'static str,
        meta: &str,
        strict: bool,
    ) -> Result<Option<FieldDescriptor>, Error> {
        let meta = meta.trim();
        if meta.is_empty() || meta == "-" {
            return Ok(None);
        }
        let mut desc = FieldDescriptor {
            field,
            name: field.to_string(),
            position: None,
            class: TypeClass::Unconstrained,
            size: Interval::default(),
            range: Interval::default(),
            required: None,
            default: None,
            expr: None,
            getter: None,
            setter: None,
            truthy: Vec::new(),
            falsy: Vec::new(),
            time_format: None,
            prefix: None,
            group: None,
            skip_blank: false,
            skip_zero: false,
            zero_blank: false,
            dyn_type: None,
            filter: None,
        };
        let mut pattern: Option<String> = None;
        for token in meta.split(';') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k.trim(), v),
                None => (token, ""),
            };
            match key {
                "pos" => desc.position = parse_position(value, strict)?,
                "name" => desc.name = value.to_string(),
                "class" => desc.class = TypeClass::parse(value, strict)?,
                "filter" => pattern = Some(value.to_string()),
                "size" => desc.size = parse_interval(value, true, strict)?,
                "range" => desc.range = parse_interval(value, false, strict)?,
                "required" => {
                    desc.required = Some(value.is_empty() || value.eq_ignore_ascii_case("true"))
                }
                "default" => desc.default = Some(value.to_string()),
                "valid" => desc.expr = ValidationExpr::parse(value, strict)?,
                "get" => desc.getter = Some(parse_accessor(value)?),
                "set" => desc.setter = Some(parse_accessor(value)?),
                "truthy" => desc.truthy = split_literals(value),
                "falsy" => desc.falsy = split_literals(value),
                "timefmt" => desc.time_format = Some(value.to_string()),
                "prefix" => desc.prefix = Some(value.to_string()),
                "group" => desc.group = Some(value.to_string()),
                "skipblank" => desc.skip_blank = true,
                "skipzero" => desc.skip_zero = true,
                "zeroblank" => desc.zero_blank = true,
                "dyn" => desc.dyn_type = Some(value.to_string()),
                other => {
                    if strict {
                        return Err(Error::configuration(format!(
                            "field `{field}`: unknown descriptor key `{other}`"
                        )));
                    }
                }
            }
        }
        if desc.class == TypeClass::RegexFilter {
            let pattern = pattern.ok_or_else(|| {
                Error::configuration(format!(
                    "field `{field}`: class RGX declared without a `filter` pattern"
                ))
            })?;
            let compiled = Regex::new(&pattern).map_err(|e| {
                Error::configuration(format!("field `{field}`: bad filter pattern: {e}"))
            })?;
            desc.filter = Some(compiled);
        }
        Ok(Some(desc))
    }

    /// Whether the field must end up non-empty.
    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }
}

fn parse_position(value: &str, strict: bool) -> Result<Option<Position>, Error> {
    if value.eq_ignore_ascii_case("virtual") {
        return Ok(Some(Position::Virtual));
    }
    let n = parse_number(value, strict)?;
    if n < 0 {
        // A negative slot addresses nothing; the field stays unpositioned.
        return Ok(None);
    }
    Ok(Some(Position::Slot(n as usize)))
}

/// Parses the shared interval grammar: `N` (exact), `N..` (min), `..M`
/// (max), `N..M` (both), with an optional `+%K` modulo suffix when
/// `allow_modulo` is set.
fn parse_interval(value: &str, allow_modulo: bool, strict: bool) -> Result<Interval, Error> {
    let mut interval = Interval::default();
    let body = match value.split_once("+%") {
        Some((body, k)) if allow_modulo => {
            interval.modulo = Some(parse_number(k, strict)?);
            body
        }
        Some((body, _)) => {
            if strict {
                return Err(Error::configuration(format!(
                    "modulo suffix is not valid in `{value}`"
                )));
            }
            body
        }
        None => value,
    };
    match body.split_once("..") {
        Some((lo, hi)) => {
            if !lo.is_empty() {
                interval.min = Some(parse_number(lo, strict)?);
            }
            if !hi.is_empty() {
                interval.max = Some(parse_number(hi, strict)?);
            }
        }
        None => {
            let exact = parse_number(body, strict)?;
            interval.min = Some(exact);
            interval.max = Some(exact);
        }
    }
    Ok(interval)
}

fn parse_number(value: &str, strict: bool) -> Result<i64, Error> {
    match util::parse_i64_strict(value) {
        Some(n) => Ok(n),
        None if strict => Err(Error::configuration(format!(
            "numeric token `{value}` does not parse"
        ))),
        // Deliberate leniency: malformed numeric sub-tokens parse as zero.
        None => Ok(0),
    }
}

fn parse_accessor(value: &str) -> Result<Accessor, Error> {
    let (value, on_record) = match value.strip_prefix('@') {
        Some(rest) => (rest, true),
        None => (value, false),
    };
    let (name, takes_value) = match value.strip_suffix('+') {
        Some(rest) => (rest, true),
        None => (value, false),
    };
    if name.is_empty() {
        return Err(Error::configuration("accessor reference names no method"));
    }
    Ok(Accessor {
        name: name.to_string(),
        on_record,
        takes_value,
    })
}

// Literal lists accept both separators: `,` matches the rest of the
// descriptor grammar, `|` matches the expression language's operand lists.
fn split_literals(value: &str) -> Vec<String> {
    value
        .split([',', '|'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
