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

use std::borrow::Cow;

use thiserror::Error;

/// Error type for flatwire marshal and unmarshal operations.
///
/// Every failure is terminal and surfaced exactly once to the caller; the
/// engine performs no internal recovery or retries. A failed unmarshal
/// additionally resets the target record to its zero state before returning,
/// so callers never observe a half-populated record.
///
/// Prefer the static constructor functions ([`Error::configuration`],
/// [`Error::extraction`], [`Error::validation`], [`Error::indirection`]) over
/// constructing variants directly; they accept anything convertible into a
/// `Cow<'static, str>` and keep error creation out of the hot path.
///
/// Validation and extraction messages are always field-qualified: for a fixed
/// record layout, fields are processed in declaration order, so the first
/// failing field is reported first, deterministically.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed descriptor metadata (bad grammar, duplicate registrations).
    ///
    /// Most descriptor oddities are demoted to lenient fallbacks unless the
    /// engine is built with `strict_meta(true)`.
    #[error("{0}")]
    Configuration(Cow<'static, str>),

    /// A source element could not be located: a position past the end of the
    /// line, or a required prefix with no default that matched no token.
    #[error("{0}")]
    Extraction(Cow<'static, str>),

    /// A size/range/modulo/required rule or a validation expression failed.
    #[error("{0}")]
    Validation(Cow<'static, str>),

    /// A getter/setter extension point returned an error, or a polymorphic
    /// field had no factory registered for its declared type name.
    #[error("{0}")]
    Indirection(Cow<'static, str>),

    /// The structural encoder failed; always wrapped, never re-interpreted.
    #[error("structural encode failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new [`Error::Configuration`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn configuration<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::Configuration(s.into())
    }

    /// Creates a new [`Error::Extraction`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn extraction<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::Extraction(s.into())
    }

    /// Creates a new [`Error::Validation`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn validation<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::Validation(s.into())
    }

    /// Creates a new [`Error::Indirection`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn indirection<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::Indirection(s.into())
    }
}

/// Returns early with the given error when the condition does not hold.
///
/// ```rust
/// use flatwire::{ensure, Error};
///
/// fn check(len: usize) -> Result<(), Error> {
///     ensure!(len > 0, Error::validation("empty input"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::validation(format!($fmt, $($arg)*)));
        }
    };
}
