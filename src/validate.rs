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

//! Size, range, required and expression validation. Every failure is
//! field-qualified. The engine never substitutes a safe value on a
//! validation failure; only truncation and boolean literal mapping are
//! silent.

use crate::ensure;
use crate::error::Error;
use crate::field::record::Record;
use crate::meta::{CmpOp, FieldDescriptor, ValidationExpr};
use crate::util;

/// Size-min and modulo checks. Size-max never fails here: the normalizer
/// already truncated. An empty value passes; the required check owns that
/// case.
pub fn check_size(desc: &FieldDescriptor, value: &str) -> Result<(), Error> {
    let len = value.len() as i64;
    if len > 0 {
        if let Some(min) = desc.size.min {
            ensure!(
                len >= min,
                Error::validation(format!(
                    "field `{}`: length {} is below the size minimum {}",
                    desc.field, len, min
                ))
            );
        }
    }
    if let Some(modulo) = desc.size.modulo {
        if modulo > 0 {
            ensure!(
                len % modulo == 0,
                Error::validation(format!(
                    "field `{}`: length {} is not a multiple of {}",
                    desc.field, len, modulo
                ))
            );
        }
    }
    Ok(())
}

/// Numeric range check over the filtered value.
///
/// Zero carve-out: a value of 0 passes even below a nonzero range minimum,
/// provided the field is not required.
pub fn check_range(desc: &FieldDescriptor, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Ok(());
    }
    if desc.range.min.is_none() && desc.range.max.is_none() {
        return Ok(());
    }
    let n = util::parse_i64_strict(value).ok_or_else(|| {
        Error::validation(format!(
            "field `{}`: value `{}` is not numeric",
            desc.field, value
        ))
    })?;
    if let Some(min) = desc.range.min {
        let carved_out = n == 0 && min > 0 && !desc.is_required();
        ensure!(
            n >= min || carved_out,
            Error::validation(format!(
                "field `{}`: value {} is below the range minimum {}",
                desc.field, n, min
            ))
        );
    }
    if let Some(max) = desc.range.max {
        ensure!(
            n <= max,
            Error::validation(format!(
                "field `{}`: value {} exceeds the range maximum {}",
                desc.field, n, max
            ))
        );
    }
    Ok(())
}

/// Required check: runs last, after defaulting, so a declared default has
/// already had its chance to fill the value.
pub fn check_required(desc: &FieldDescriptor, value: &str) -> Result<(), Error> {
    if desc.is_required() && value.is_empty() {
        return Err(Error::validation(format!(
            "field `{}` is required",
            desc.field
        )));
    }
    Ok(())
}

/// Evaluates the field's parsed validation expression, if any.
pub fn check_expr<T: Record>(
    desc: &FieldDescriptor,
    value: &str,
    record: &T,
) -> Result<(), Error> {
    let Some(expr) = &desc.expr else {
        return Ok(());
    };
    match expr {
        ValidationExpr::EqualsAny(set) => {
            // An optional blank field is exempt; only a present value has
            // to match the set.
            if value.is_empty() && !desc.is_required() {
                return Ok(());
            }
            ensure!(
                util::contains_ignore_case(set, value),
                Error::validation(format!(
                    "field `{}`: value `{}` is not one of {}",
                    desc.field,
                    value,
                    set.join("|")
                ))
            );
        }
        ValidationExpr::DiffersAll(set) => {
            if value.is_empty() && !desc.is_required() {
                return Ok(());
            }
            ensure!(
                !util::contains_ignore_case(set, value),
                Error::validation(format!(
                    "field `{}`: value `{}` is excluded by {}",
                    desc.field,
                    value,
                    set.join("|")
                ))
            );
        }
        ValidationExpr::Compare(op, operand) => {
            if value.is_empty() && !desc.is_required() {
                return Ok(());
            }
            let n = util::parse_i64_strict(value).ok_or_else(|| {
                Error::validation(format!(
                    "field `{}`: value `{}` is not numeric",
                    desc.field, value
                ))
            })?;
            let holds = match op {
                CmpOp::LessEq => n <= *operand,
                CmpOp::Less => n < *operand,
                CmpOp::GreaterEq => n >= *operand,
                CmpOp::Greater => n > *operand,
            };
            ensure!(
                holds,
                Error::validation(format!(
                    "field `{}`: value {} fails {:?} {}",
                    desc.field, n, op, operand
                ))
            );
        }
        ValidationExpr::Predicate(name) => match record.invoke_check(name) {
            Ok(true) => {}
            Ok(false) => {
                return Err(Error::validation(format!(
                    "field `{}`: check `{}` returned false",
                    desc.field, name
                )))
            }
            Err(e) => {
                return Err(Error::validation(format!(
                    "field `{}`: check `{}` failed: {}",
                    desc.field, name, e
                )))
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::FieldDescriptor;

    #[derive(Default)]
    struct NoRecord;

    impl Record for NoRecord {
        fn layout() -> &'static [crate::field::record::FieldDecl] {
            &[]
        }
        fn field(&self, _index: usize) -> Option<&dyn crate::field::FieldValue> {
            None
        }
        fn field_mut(&mut self, _index: usize) -> Option<&mut dyn crate::field::FieldValue> {
            None
        }
    }

    fn desc(meta: &str) -> FieldDescriptor {
        FieldDescriptor::parse("f", meta, false).unwrap().unwrap()
    }

    #[test]
    fn size_minimum_and_modulo() {
        let d = desc("size=3..5");
        assert!(check_size(&d, "ab").is_err());
        assert!(check_size(&d, "abc").is_ok());
        assert!(check_size(&d, "").is_ok());
        let d = desc("size=..8+%4");
        assert!(check_size(&d, "abcd").is_ok());
        assert!(check_size(&d, "abcde").is_err());
    }

    #[test]
    fn range_with_zero_carve_out() {
        let d = desc("class=N;range=10..20");
        assert!(check_range(&d, "0").is_ok());
        assert!(check_range(&d, "5").is_err());
        assert!(check_range(&d, "15").is_ok());
        assert!(check_range(&d, "25").is_err());
        assert!(check_range(&d, "").is_ok());
    }

    #[test]
    fn required_field_loses_the_carve_out() {
        let d = desc("class=N;range=10..20;required");
        assert!(check_range(&d, "0").is_err());
    }

    #[test]
    fn unparseable_non_empty_value_fails_range() {
        let d = desc("range=1..9");
        assert!(check_range(&d, "x7").is_err());
    }

    #[test]
    fn equality_expressions() {
        let d = desc("valid===A|B");
        assert!(check_expr(&d, "a", &NoRecord).is_ok());
        assert!(check_expr(&d, "C", &NoRecord).is_err());
        assert!(check_expr(&d, "", &NoRecord).is_ok());
        let d = desc("valid=!=X|Y");
        assert!(check_expr(&d, "Z", &NoRecord).is_ok());
        assert!(check_expr(&d, "x", &NoRecord).is_err());
    }

    #[test]
    fn numeric_expressions() {
        let d = desc("valid=>=10");
        assert!(check_expr(&d, "10", &NoRecord).is_ok());
        assert!(check_expr(&d, "9", &NoRecord).is_err());
        assert!(check_expr(&d, "abc", &NoRecord).is_err());
    }
}
