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

//! Query-string codec: percent-escaped `name=value` pairs joined by `&`.
//! Encode-only.

use url::form_urlencoded;

use crate::codec::{emit_field, Claims};
use crate::error::Error;
use crate::field::record::Record;
use crate::meta::Position;
use crate::resolver::RecordLayout;

pub(crate) fn marshal_query<T: Record>(layout: &RecordLayout, record: &T) -> Result<String, Error> {
    let mut claims = Claims::new();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (index, desc) in layout.descriptors.iter().enumerate() {
        let Some(desc) = desc else { continue };
        if desc.position == Some(Position::Virtual) {
            continue;
        }
        let Some(value) = emit_field(record, index, desc, &mut claims)? else {
            continue;
        };
        serializer.append_pair(&desc.name, &value);
    }
    Ok(serializer.finish())
}
