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
use crate::field::FieldValue;

/// One field declaration of a record: the Rust field name plus its raw
/// descriptor metadata. The metadata string is parsed at call time (or once
/// at registration); nothing is generated at compile time beyond the
/// accessor plumbing.
#[derive(Clone, Copy, Debug)]
pub struct FieldDecl {
    pub name: &'static str,
    pub meta: &'static str,
}

/// A flat, struct-shaped value the engine can marshal and unmarshal.
///
/// `layout` exposes the per-field metadata in declaration order; `field` /
/// `field_mut` reach each field as a [`FieldValue`] trait object at the same
/// index, and answer `None` past the end of the layout. The `invoke_*`
/// methods are the freeform named-dispatch path for descriptors whose
/// accessor reference carries the `@` marker (or whose field type implements
/// neither capability); the defaults report an unknown extension point.
/// Implement [`Record`] through the [`record!`](crate::record!) macro unless
/// the record needs custom accessors beyond what the macro's trailing `impl`
/// block can express.
pub trait Record: 'static {
    fn layout() -> &'static [FieldDecl]
    where
        Self: Sized;

    fn field(&self, index: usize) -> Option<&dyn FieldValue>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue>;

    /// Named getter dispatch. `arg` carries the field's current stringified
    /// value when the descriptor reference has the `+` marker.
    fn invoke_getter(&self, name: &str, _arg: Option<&str>) -> Result<String, Error> {
        Err(Error::indirection(format!(
            "record declares no getter `{name}`"
        )))
    }

    /// Named setter dispatch: one string argument, assigns into the record.
    fn invoke_setter(&mut self, name: &str, _raw: &str) -> Result<(), Error> {
        Err(Error::indirection(format!(
            "record declares no setter `{name}`"
        )))
    }

    /// Named zero-argument predicate for `:=` validation expressions.
    fn invoke_check(&self, name: &str) -> Result<bool, Error> {
        Err(Error::indirection(format!(
            "record declares no check `{name}`"
        )))
    }
}

/// Defines a struct and wires it up as a [`Record`].
///
/// Each field pairs its type with a descriptor metadata literal; `"-"` (or
/// `""`) declares a field the engine never touches. An optional trailing
/// `impl { ... }` block supplies overrides for the named-dispatch methods.
///
/// ```rust
/// use flatwire::record;
///
/// record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Order {
///         code: String => "pos=0;class=AN;size=3..3;required",
///         qty: i64 => "pos=1;class=N;range=0..100",
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fattr:meta])* $fvis:vis $field:ident : $fty:ty => $meta:literal ),* $(,)?
        }
        $( impl { $($extra:item)* } )?
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $( $(#[$fattr])* $fvis $field : $fty, )*
        }

        impl $crate::Record for $name {
            fn layout() -> &'static [$crate::FieldDecl] {
                static LAYOUT: &[$crate::FieldDecl] = &[
                    $( $crate::FieldDecl { name: stringify!($field), meta: $meta }, )*
                ];
                LAYOUT
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn $crate::FieldValue> {
                $crate::__record_field!(self, index $(, $field)*)
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn $crate::FieldValue> {
                $crate::__record_field_mut!(self, index $(, $field)*)
            }

            $( $($extra)* )?
        }
    };
}

///// Index dispatch behind [`record!`]: peels one field per recursion step, so
/// each access is a plain comparison chain with no allocation. Exhausting
/// the field list yields `None`.
#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ($self:ident, $index:expr $(,)?) => {
        ::core::option::Option::None
    };
    ($self:ident, $index:expr, $head:ident $(, $tail:ident)*) => {
        if $index == 0 {
            ::core::option::Option::Some(&$self.$head as &dyn $crate::FieldValue)
        } else {
            $crate::__record_field!($self, $index - 1 $(, $tail)*)
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field_mut {
    ($self:ident, $index:expr $(,)?) => {
        ::core::option::Option::None
    };
    ($self:ident, $index:expr, $head:ident $(, $tail:ident)*) => {
        if $index == 0 {
            ::core::option::Option::Some(&mut $self.$head as &mut dyn $crate::FieldValue)
        } else {
            $crate::__record_field_mut!($self, $index - 1 $(, $tail)*)
        }
    };
}
