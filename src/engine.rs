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

use crate::codec::{json, line, query};
use crate::error::Error;
use crate::field::record::Record;
use crate::field::DynField;
use crate::resolver::TypeResolver;

/// The flatwire marshaling engine.
///
/// `Flatwire` converts between flat records and three wire shapes:
/// delimited lines (positional or prefixed), flat JSON objects, and URL
/// query strings. Every conversion is driven entirely by the per-field
/// descriptor metadata a [`Record`] declares.
///
/// # Features
///
/// - **Declarative descriptors**: position, type class, size/range rules,
///   defaults, validation expressions, accessor indirection and exclusivity
///   groups, all parsed from per-field metadata at call time
/// - **Capability-based extension**: field types implement
///   [`Gettable`](crate::Gettable)/[`Settable`](crate::Settable) for custom
///   formatting/parsing; freeform named dispatch on the record is the
///   legacy path
/// - **Polymorphic fields**: concrete types materialize from an explicit
///   registry keyed by the abstract name a descriptor declares
/// - **Rollback on failure**: a failed unmarshal resets the target to its
///   zero state before returning
///
/// # Examples
///
/// ```rust
/// use flatwire::{record, Flatwire};
///
/// record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Order {
///         code: String => "pos=0;class=AN;size=3..3;required",
///         qty: i64 => "pos=1;class=N;range=0..100",
///     }
/// }
///
/// let mut fw = Flatwire::default();
/// fw.register::<Order>().unwrap();
///
/// let order: Order = fw.unmarshal_positional("AB1,55", ",").unwrap();
/// assert_eq!(order, Order { code: "AB1".into(), qty: 55 });
/// assert_eq!(fw.marshal_positional(&order, ",").unwrap(), "AB1,55");
/// ```
///
/// # Concurrency
///
/// Every marshal/unmarshal call is synchronous, re-entrant, and owns its
/// own descriptor set and exclusivity state. Registration takes `&mut
/// self`; once registered, a shared engine serves concurrent calls without
/// locking.
#[derive(Default)]
pub struct Flatwire {
    type_resolver: TypeResolver,
    strict_meta: bool,
}

impl Flatwire {
    /// Upgrades descriptor leniencies into configuration errors.
    ///
    /// By default, malformed numeric sub-tokens in the `size`/`range`/`pos`
    /// grammars parse as zero, unknown descriptor keys and type classes are
    /// ignored, and a virtual field without a setter is skipped; all of
    /// this is preserved for compatibility with existing metadata. With
    /// `strict_meta(true)` each of these is reported instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatwire::Flatwire;
    ///
    /// let fw = Flatwire::default().strict_meta(true);
    /// ```
    pub fn strict_meta(mut self, strict_meta: bool) -> Self {
        self.strict_meta = strict_meta;
        self
    }

    /// Returns whether strict metadata checking is enabled.
    pub fn is_strict_meta(&self) -> bool {
        self.strict_meta
    }

    /// Returns a reference to the type resolver.
    pub fn get_type_resolver(&self) -> &TypeResolver {
        &self.type_resolver
    }

    /// Parses and caches the descriptor set of a record type.
    ///
    /// Registration is optional: unregistered types parse their metadata
    /// fresh on every call. Since metadata never changes for a given type,
    /// registering once at startup is the cheaper steady state.
    pub fn register<T: Record>(&mut self) -> Result<(), Error> {
        self.type_resolver.register::<T>(self.strict_meta)
    }

    /// Registers a concrete field type under an abstract type name.
    ///
    /// A descriptor declaring `dyn=Name` materializes its field from this
    /// registry during unmarshal; an unregistered name is a hard error at
    /// the point of use. Registering the same name twice is a
    /// configuration error.
    pub fn register_dyn<T: DynField + Default>(&mut self, name: &str) -> Result<(), Error> {
        self.type_resolver.register_dyn::<T>(name)
    }

    /// Marshals a record into a positional delimited line.
    ///
    /// Fields sit at their declared zero-based slot; unset slots render as
    /// empty tokens unless every emitted field declares an output prefix,
    /// in which case placeholders are dropped and the line is
    /// self-describing.
    pub fn marshal_positional<T: Record>(
        &self,
        record: &T,
        delimiter: &str,
    ) -> Result<String, Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        line::marshal_positional(&layout, record, delimiter)
    }

    /// Unmarshals a positional delimited line into a fresh record.
    pub fn unmarshal_positional<T: Record + Default>(
        &self,
        input: &str,
        delimiter: &str,
    ) -> Result<T, Error> {
        let mut record = T::default();
        self.unmarshal_positional_into(input, delimiter, &mut record)?;
        Ok(record)
    }

    /// Unmarshals a positional delimited line into a caller-owned record.
    ///
    /// On error the target is reset to its zero state before returning.
    pub fn unmarshal_positional_into<T: Record>(
        &self,
        input: &str,
        delimiter: &str,
        target: &mut T,
    ) -> Result<(), Error> {
        let tokens = split_line(input, delimiter)?;
        self.unmarshal_positional_tokens(&tokens, target)
    }

    /// Positional unmarshal over pre-tokenized elements, for callers that
    /// bring their own tokenizer.
    pub fn unmarshal_positional_tokens<T: Record>(
        &self,
        tokens: &[&str],
        target: &mut T,
    ) -> Result<(), Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        line::unmarshal_positional(
            &self.type_resolver,
            &layout,
            tokens,
            target,
            self.strict_meta,
        )
    }

    /// Marshals a record into order-independent `prefix+value` tokens.
    pub fn marshal_prefixed<T: Record>(
        &self,
        record: &T,
        delimiter: &str,
    ) -> Result<String, Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        line::marshal_prefixed(&layout, record, delimiter)
    }

    /// Unmarshals a prefixed delimited line into a fresh record.
    pub fn unmarshal_prefixed<T: Record + Default>(
        &self,
        input: &str,
        delimiter: &str,
    ) -> Result<T, Error> {
        let mut record = T::default();
        self.unmarshal_prefixed_into(input, delimiter, &mut record)?;
        Ok(record)
    }

    /// Unmarshals a prefixed delimited line into a caller-owned record.
    ///
    /// Each field's value is located by the first case-insensitive prefix
    /// match; on error the target is reset before returning.
    pub fn unmarshal_prefixed_into<T: Record>(
        &self,
        input: &str,
        delimiter: &str,
        target: &mut T,
    ) -> Result<(), Error> {
        let tokens = split_line(input, delimiter)?;
        self.unmarshal_prefixed_tokens(&tokens, target)
    }

    /// Prefixed unmarshal over pre-tokenized elements.
    pub fn unmarshal_prefixed_tokens<T: Record>(
        &self,
        tokens: &[&str],
        target: &mut T,
    ) -> Result<(), Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        line::unmarshal_prefixed(
            &self.type_resolver,
            &layout,
            tokens,
            target,
            self.strict_meta,
        )
    }

    /// Marshals a record into a flat JSON object.
    pub fn marshal_json<T: Record>(&self, record: &T) -> Result<String, Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        json::marshal_json(&layout, record)
    }

    /// Unmarshals a flat JSON object into a fresh record.
    pub fn unmarshal_json<T: Record + Default>(&self, input: &str) -> Result<T, Error> {
        let mut record = T::default();
        self.unmarshal_json_into(input, &mut record)?;
        Ok(record)
    }

    /// Unmarshals a flat JSON object into a caller-owned record.
    ///
    /// Nested objects and arrays are rejected; a literal `null` reads as an
    /// empty string. On error the target is reset before returning.
    pub fn unmarshal_json_into<T: Record>(&self, input: &str, target: &mut T) -> Result<(), Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        json::unmarshal_json(&self.type_resolver, &layout, input, target, self.strict_meta)
    }

    /// Marshals a record into a percent-escaped query string. Encode-only.
    pub fn marshal_query<T: Record>(&self, record: &T) -> Result<String, Error> {
        let layout = self.type_resolver.layout_of::<T>(self.strict_meta)?;
        query::marshal_query(&layout, record)
    }
}

fn split_line<'a>(input: &'a str, delimiter: &str) -> Result<Vec<&'a str>, Error> {
    if delimiter.is_empty() {
        return Err(Error::configuration("delimiter must not be empty"));
    }
    Ok(input.split(delimiter).collect())
}
