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

use flatwire::{record, Error, Flatwire};

#[test]
fn test_size_modulo() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Hex {
            data: String => "pos=0;class=HEX;size=2..8+%2",
        }
    }

    let fw = Flatwire::default();
    let err = fw.unmarshal_positional::<Hex>("ABC", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let hex: Hex = fw.unmarshal_positional("ABCD", ",").unwrap();
    assert_eq!(hex.data, "ABCD");
}

#[test]
fn test_zero_passes_below_an_optional_range_minimum() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Gauge {
            level: i64 => "pos=0;class=N;range=10..20",
        }
    }

    let fw = Flatwire::default();
    let gauge: Gauge = fw.unmarshal_positional("0", ",").unwrap();
    assert_eq!(gauge.level, 0);

    let err = fw.unmarshal_positional::<Gauge>("5", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_zero_carve_out_does_not_apply_to_required_fields() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Gauge {
            level: i64 => "pos=0;class=N;range=10..20;required",
        }
    }

    let fw = Flatwire::default();
    let err = fw.unmarshal_positional::<Gauge>("0", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_equality_set_expression() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Mode {
            mode: String => "pos=0;valid===FAST|SLOW",
        }
    }

    let fw = Flatwire::default();
    let mode: Mode = fw.unmarshal_positional("fast", ",").unwrap();
    assert_eq!(mode.mode, "fast");

    let err = fw.unmarshal_positional::<Mode>("medium", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // A blank optional field is exempt from the set.
    let blank: Mode = fw.unmarshal_positional("", ",").unwrap();
    assert_eq!(blank.mode, "");
}

#[test]
fn test_difference_set_expression() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Name {
            name: String => "pos=0;valid=!=root|admin",
        }
    }

    let fw = Flatwire::default();
    let name: Name = fw.unmarshal_positional("alice", ",").unwrap();
    assert_eq!(name.name, "alice");

    let err = fw.unmarshal_positional::<Name>("ROOT", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_comparison_expressions() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Caps {
            at_most: i64 => "pos=0;class=N;valid=<=50",
            above: i64 => "pos=1;class=N;valid=>>10",
        }
    }

    let fw = Flatwire::default();
    let caps: Caps = fw.unmarshal_positional("50,11", ",").unwrap();
    assert_eq!(caps.at_most, 50);
    assert_eq!(caps.above, 11);

    let err = fw.unmarshal_positional::<Caps>("51,11", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Strict greater-than rejects the boundary itself.
    let err = fw.unmarshal_positional::<Caps>("50,10", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_predicate_expression_asks_the_record() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Doc {
            body: String => "pos=0;valid=:=has_header",
            header: String => "-",
        }
        impl {
            fn invoke_check(&self, name: &str) -> Result<bool, flatwire::Error> {
                match name {
                    "has_header" => Ok(!self.header.is_empty()),
                    other => Err(flatwire::Error::indirection(format!(
                        "record declares no check `{other}`"
                    ))),
                }
            }
        }
    }

    let fw = Flatwire::default();
    let err = fw.unmarshal_positional::<Doc>("text", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut doc = Doc {
        body: String::new(),
        header: "h1".to_string(),
    };
    fw.unmarshal_positional_into("text", ",", &mut doc).unwrap();
    assert_eq!(doc.body, "text");
}

#[test]
fn test_default_satisfies_the_required_check() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Sized {
            qty: i64 => "pos=0;class=N;required;default=9",
        }
    }

    let fw = Flatwire::default();
    let s: Sized = fw.unmarshal_positional("", ",").unwrap();
    assert_eq!(s.qty, 9);
}

#[test]
fn test_required_rejects_a_blank_wire_value() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Strict {
            code: String => "pos=0;required",
        }
    }

    let fw = Flatwire::default();
    let err = fw.unmarshal_positional::<Strict>("", ",").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
