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

//! # Flatwire
//!
//! Flatwire is a declarative, metadata-driven marshaling engine for flat
//! records. Each field of a record carries a compact descriptor string, and
//! the engine converts whole records to and from several textual wire
//! shapes driven entirely by those descriptors.
//!
//! ## Wire shapes
//!
//! - **Positional lines**: delimited tokens located by zero-based slot
//! - **Prefixed lines**: order-independent `prefix+value` tokens
//! - **Flat JSON**: a single JSON object with string-ish scalar values
//! - **Query strings**: percent-escaped `name=value` pairs (encode only)
//!
//! ## Architecture
//!
//! The crate is organized into several key modules:
//!
//! - **`engine`**: The [`Flatwire`] engine and public entry points
//! - **`meta`**: Descriptor grammar, interval grammar, and the validation
//!   expression mini-language
//! - **`field`**: The [`FieldValue`] value model, accessor capabilities,
//!   and the [`record!`] declaration macro
//! - **`codec`**: The shared emit/absorb pipeline plus the per-shape codecs
//! - **`normalize`** / **`validate`**: Type-class normalization and the
//!   size/range/expression/required rule chain
//! - **`resolver`**: Cached descriptor layouts and the polymorphic type
//!   registry
//! - **`error`**: Error handling and result types
//!
//! ## Example
//!
//! ```rust
//! use flatwire::{record, Flatwire};
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Order {
//!         code: String => "pos=0;class=AN;size=3..3;required",
//!         qty: i64 => "pos=1;class=N;range=0..100",
//!     }
//! }
//!
//! let mut fw = Flatwire::default();
//! fw.register::<Order>().unwrap();
//!
//! let order: Order = fw.unmarshal_positional("AB1,55", ",").unwrap();
//! assert_eq!(order.qty, 55);
//! assert_eq!(fw.marshal_positional(&order, ",").unwrap(), "AB1,55");
//! assert_eq!(fw.marshal_json(&order).unwrap(), r#"{"code":"AB1","qty":"55"}"#);
//! ```
//!
//! ## Failure semantics
//!
//! An unmarshal either fully populates the target or resets it to its zero
//! state; a marshal either yields a complete line or an error with nothing
//! emitted. Validation failures carry the field name and the rule that
//! rejected the value.

pub mod codec;
pub mod engine;
pub mod error;
pub mod field;
pub mod meta;
pub mod normalize;
pub mod resolver;
pub mod types;
pub mod util;
pub mod validate;

pub use engine::Flatwire;
pub use error::Error;
pub use field::record::{FieldDecl, Record};
pub use field::{DynField, DynValue, FieldValue, Gettable, Settable};
pub use meta::{Accessor, CmpOp, FieldDescriptor, Interval, Position, ValidationExpr};
pub use resolver::{RecordLayout, TypeResolver};
pub use types::TypeClass;
