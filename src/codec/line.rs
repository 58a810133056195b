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

//! Delimited-line codecs: positional (fields sit at a zero-based ordinal
//! slot) and prefixed (fields are identified by a literal prefix token,
//! order-independent).

use crate::codec::{
    absorb_field, compute_virtual, emit_field, reset_record, Claims, ExtractedElement, Origin,
};
use crate::error::Error;
use crate::field::record::Record;
use crate::meta::Position;
use crate::resolver::{RecordLayout, TypeResolver};
use crate::util;

pub(crate) fn marshal_positional<T: Record>(
    layout: &RecordLayout,
    record: &T,
    delimiter: &str,
) -> Result<String, Error> {
    let mut slot_count = 0;
    for desc in layout.descriptors.iter().flatten() {
        if let Some(Position::Slot(p)) = desc.position {
            slot_count = slot_count.max(p + 1);
        }
    }
    let mut slots: Vec<Option<String>> = vec![None; slot_count];
    let mut claims = Claims::new();
    let mut all_prefixed = true;
    let mut emitted_any = false;
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        // Virtual fields have no slot; they exist only on the unmarshal side.
        let Some(Position::Slot(slot)) = desc.position else {
            continue;
        };
        let Some(value) = emit_field(record, index, desc, &mut claims)? else {
            continue;
        };
        let token = match &desc.prefix {
            Some(prefix) => format!("{prefix}{value}"),
            None => {
                all_prefixed = false;
                value
            }
        };
        slots[slot] = Some(token);
        emitted_any = true;
    }
    // When every emitted field is self-describing via its prefix, unset
    // placeholders are dropped and the line becomes variable-length.
    let line = if emitted_any && all_prefixed {
        slots.into_iter().flatten().collect::<Vec<_>>()
    } else {
        slots
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect::<Vec<_>>()
    };
    Ok(line.join(delimiter))
}

pub(crate) fn unmarshal_positional<T: Record>(
    resolver: &TypeResolver,
    layout: &RecordLayout,
    tokens: &[&str],
    target: &mut T,
    strict: bool,
) -> Result<(), Error> {
    let result = absorb_positional(resolver, layout, tokens, target, strict);
    if result.is_err() {
        reset_record(target);
    }
    result
}

fn absorb_positional<T: Record>(
    resolver: &TypeResolver,
    layout: &RecordLayout,
    tokens: &[&str],
    target: &mut T,
    strict: bool,
) -> Result<(), Error> {
    let mut virtuals = Vec::new();
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        match desc.position {
            Some(Position::Slot(slot)) => {
                if slot >= tokens.len() {
                    return Err(Error::extraction(format!(
                        "field `{}`: position {} exceeds the {} available elements",
                        desc.field,
                        slot,
                        tokens.len()
                    )));
                }
                let mut raw = tokens[slot];
                if let Some(prefix) = &desc.prefix {
                    if util::starts_with_ignore_case(raw, prefix) {
                        raw = &raw[prefix.len()..];
                    }
                }
                let element = ExtractedElement {
                    raw: raw.to_string(),
                    origin: Origin::Slot(slot),
                };
                absorb_field(resolver, target, index, desc, Some(&element))?;
            }
            Some(Position::Virtual) => virtuals.push((index, desc)),
            None => {}
        }
    }
    // Virtual fields compute once, after every positioned field is assigned.
    for (index, desc) in virtuals {
        compute_virtual(target, index, desc, strict)?;
    }
    Ok(())
}

pub(crate) fn marshal_prefixed<T: Record>(
    layout: &RecordLayout,
    record: &T,
    delimiter: &str,
) -> Result<String, Error> {
    let mut claims = Claims::new();
    let mut tokens = Vec::new();
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        if desc.position == Some(Position::Virtual) {
            continue;
        }
        let Some(prefix) = &desc.prefix else { continue };
        let Some(value) = emit_field(record, index, desc, &mut claims)? else {
            continue;
        };
        tokens.push(format!("{prefix}{value}"));
    }
    Ok(tokens.join(delimiter))
}

pub(crate) fn unmarshal_prefixed<T: Record>(
    resolver: &TypeResolver,
    layout: &RecordLayout,
    tokens: &[&str],
    target: &mut T,
    strict: bool,
) -> Result<(), Error> {
    let result = absorb_prefixed(resolver, layout, tokens, target, strict);
    if result.is_err() {
        reset_record(target);
    }
    result
}

fn absorb_prefixed<T: Record>(
    resolver: &TypeResolver,
    layout: &RecordLayout,
    tokens: &[&str],
    target: &mut T,
    strict: bool,
) -> Result<(), Error> {
    let mut virtuals = Vec::new();
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        if desc.position == Some(Position::Virtual) {
            virtuals.push((index, desc));
            continue;
        }
        let Some(prefix) = &desc.prefix else { continue };
        // First match wins; duplicate prefixes collapse.
        let matched = tokens
            .iter()
            .find(|token| util::starts_with_ignore_case(token, prefix));
        match matched {
            Some(token) => {
                let element = ExtractedElement {
                    raw: token[prefix.len()..].to_string(),
                    origin: Origin::Prefix(prefix.clone()),
                };
                absorb_field(resolver, target, index, desc, Some(&element))?;
            }
            None if desc.default.is_some() => {
                absorb_field(resolver, target, index, desc, None)?;
            }
            None if desc.is_required() => {
                return Err(Error::extraction(format!(
                    "field `{}`: required prefix `{}` not found and no default declared",
                    desc.field, prefix
                )));
            }
            // An optional field without a token stays at its zero value.
            None => {}
        }
    }
    for (index, desc) in virtuals {
        compute_virtual(target, index, desc, strict)?;
    }
    Ok(())
}
