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

//! Flat-JSON codec: record fields map to the keys of a single flat JSON
//! object. Escaping is the structural encoder's job, not ours.

use serde_json::{Map, Value};

use crate::codec::{
    absorb_field, compute_virtual, emit_field, reset_record, Claims, ExtractedElement, Origin,
};
use crate::error::Error;
use crate::field::record::Record;
use crate::meta::Position;
use crate::resolver::{RecordLayout, TypeResolver};

pub(crate) fn marshal_json<T: Record>(layout: &RecordLayout, record: &T) -> Result<String, Error> {
    let mut claims = Claims::new();
    let mut object = Map::new();
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        if desc.position == Some(Position::Virtual) {
            continue;
        }
        let Some(value) = emit_field(record, index, desc, &mut claims)? else {
            continue;
        };
        object.insert(desc.name.clone(), Value::String(value));
    }
    Ok(serde_json::to_string(&Value::Object(object))?)
}

pub(crate) fn unmarshal_json<T: Record>(
    resolver: &TypeResolver,
    layout: &RecordLayout,
    input: &str,
    target: &mut T,
    strict: bool,
) -> Result<(), Error> {
    let result = absorb_json(resolver, layout, input, target, strict);
    if result.is_err() {
        reset_record(target);
    }
    result
}

fn absorb_json<T: Record>(
    resolver: &TypeResolver,
    layout: &RecordLayout,
    input: &str,
    target: &mut T,
    strict: bool,
) -> Result<(), Error> {
    let parsed: Value = serde_json::from_str(input)?;
    let object = parsed
        .as_object()
        .ok_or_else(|| Error::extraction("top-level JSON value is not an object"))?;
    let mut virtuals = Vec::new();
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        if desc.position == Some(Position::Virtual) {
            virtuals.push((index, desc));
            continue;
        }
        let raw = match object.get(&desc.name) {
            None => None,
            // A literal null is an empty string for scalars.
            Some(Value::Null) => Some(String::new()),
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                return Err(Error::extraction(format!(
                    "field `{}`: nested structures are not supported",
                    desc.field
                )))
            }
        };
        let element = raw.map(|raw| ExtractedElement {
            raw,
            origin: Origin::Key(desc.name.clone()),
        });
        absorb_field(resolver, target, index, desc, element.as_ref())?;
    }
    for (index, desc) in virtuals {
        compute_virtual(target, index, desc, strict)?;
    }
    Ok(())
}
