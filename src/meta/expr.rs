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

//! The validation-expression mini-language: a two-character operator followed
//! by its operand(s). Expressions are parsed once per descriptor into a
//! tagged-union AST and evaluated repeatedly per value.

use crate::error::Error;
use crate::util;

/// Numeric comparison operator of a validation expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    /// `<=`
    LessEq,
    /// `<<`
    Less,
    /// `>=`
    GreaterEq,
    /// `>>`
    Greater,
}

/// Parsed validation expression.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationExpr {
    /// `==A|B|C`: the value must equal one of the operands (OR-joined).
    EqualsAny(Vec<String>),
    /// `!=A|B|C`: the value must differ from all operands (AND-joined).
    DiffersAll(Vec<String>),
    /// `<=N` / `<<N` / `>=N` / `>>N`: numeric comparison against a literal.
    Compare(CmpOp, i64),
    /// `:=Name`: zero-argument predicate dispatched on the record; a
    /// returned error or `false` is a validation failure.
    Predicate(String),
}

impl ValidationExpr {
    /// Parses a `valid` descriptor token. An empty token is no expression.
    ///
    /// An unparseable numeric operand falls back to 0 in lenient mode; an
    /// operator that is not one of the seven known ones is a configuration
    /// error even in lenient mode, since there is no sensible fallback.
    pub fn parse(token: &str, strict: bool) -> Result<Option<ValidationExpr>, Error> {
        if token.is_empty() {
            return Ok(None);
        }
        if token.len() < 2 || !token.is_char_boundary(2) {
            return Err(Error::configuration(format!(
                "validation expression `{token}` does not start with a two-character operator"
            )));
        }
        let (op, operand) = token.split_at(2);
        let expr = match op {
            "==" => ValidationExpr::EqualsAny(split_operands(operand)),
            "!=" => ValidationExpr::DiffersAll(split_operands(operand)),
            "<=" => ValidationExpr::Compare(CmpOp::LessEq, numeric_operand(operand, strict)?),
            "<<" => ValidationExpr::Compare(CmpOp::Less, numeric_operand(operand, strict)?),
            ">=" => ValidationExpr::Compare(CmpOp::GreaterEq, numeric_operand(operand, strict)?),
            ">>" => ValidationExpr::Compare(CmpOp::Greater, numeric_operand(operand, strict)?),
            ":=" => {
                if operand.is_empty() {
                    return Err(Error::configuration(
                        "predicate expression `:=` names no check",
                    ));
                }
                ValidationExpr::Predicate(operand.to_string())
            }
            other => {
                return Err(Error::configuration(format!(
                    "unknown validation operator `{other}`"
                )))
            }
        };
        Ok(Some(expr))
    }
}

fn split_operands(operand: &str) -> Vec<String> {
    operand.split('|').map(str::to_string).collect()
}

fn numeric_operand(operand: &str, strict: bool) -> Result<i64, Error> {
    match util::parse_i64_strict(operand) {
        Some(n) => Ok(n),
        None if strict => Err(Error::configuration(format!(
            "numeric validation operand `{operand}` does not parse"
        ))),
        None => Ok(0),
    }
}
