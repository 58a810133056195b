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

use flatwire::{record, Error, FieldDescriptor, FieldValue, Flatwire, Gettable, Settable};

/// Stored in celsius, marshaled in fahrenheit.
#[derive(Debug, Default, PartialEq)]
struct Celsius(i64);

impl FieldValue for Celsius {
    fn render(&self, _desc: &FieldDescriptor) -> String {
        self.0.to_string()
    }

    fn assign(&mut self, raw: &str, desc: &FieldDescriptor) -> Result<(), Error> {
        self.0.assign(raw, desc)
    }

    fn is_blank(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn clear(&mut self) {
        self.0 = 0;
    }

    fn as_gettable(&self) -> Option<&dyn Gettable> {
        Some(self)
    }

    fn as_settable(&mut self) -> Option<&mut dyn Settable> {
        Some(self)
    }
}

impl Gettable for Celsius {
    fn get_value(&self, _arg: Option<&str>) -> Result<String, Error> {
        Ok((self.0 * 9 / 5 + 32).to_string())
    }
}

impl Settable for Celsius {
    fn set_value(&mut self, raw: &str) -> Result<(), Error> {
        let fahrenheit: i64 = raw
            .parse()
            .map_err(|_| Error::validation(format!("`{raw}` is not a temperature")))?;
        self.0 = (fahrenheit - 32) * 5 / 9;
        Ok(())
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Sensor {
        temp: Celsius => "pos=0;class=N;get=wire_temp;set=wire_temp",
    }
}

#[test]
fn test_capability_getter_formats_the_wire_value() {
    let fw = Flatwire::default();
    let sensor = Sensor { temp: Celsius(100) };
    assert_eq!(fw.marshal_positional(&sensor, ",").unwrap(), "212");
}

#[test]
fn test_capability_setter_parses_the_wire_value() {
    let fw = Flatwire::default();
    let sensor: Sensor = fw.unmarshal_positional("212", ",").unwrap();
    assert_eq!(sensor.temp, Celsius(100));
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Doc {
        code: String => "pos=0;class=AN;get=@upper+;set=@lower",
    }
    impl {
        fn invoke_getter(&self, name: &str, arg: Option<&str>) -> Result<String, flatwire::Error> {
            match name {
                "upper" => Ok(arg.unwrap_or_default().to_uppercase()),
                other => Err(flatwire::Error::indirection(format!(
                    "record declares no getter `{other}`"
                ))),
            }
        }
        fn invoke_setter(&mut self, name: &str, raw: &str) -> Result<(), flatwire::Error> {
            match name {
                "lower" => {
                    self.code = raw.to_lowercase();
                    Ok(())
                }
                other => Err(flatwire::Error::indirection(format!(
                    "record declares no setter `{other}`"
                ))),
            }
        }
    }
}

#[test]
fn test_record_level_getter_receives_the_pipeline_value() {
    let fw = Flatwire::default();
    let doc = Doc {
        code: "ab1".to_string(),
    };
    assert_eq!(fw.marshal_positional(&doc, ",").unwrap(), "AB1");
}

#[test]
fn test_record_level_setter_assigns_directly() {
    let fw = Flatwire::default();
    let doc: Doc = fw.unmarshal_positional("AB1", ",").unwrap();
    assert_eq!(doc.code, "ab1");
}

#[test]
fn test_unknown_accessor_name_is_an_indirection_error() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Bad {
            code: String => "pos=0;get=@missing",
        }
    }

    let fw = Flatwire::default();
    let bad = Bad {
        code: "x".to_string(),
    };
    let err = fw.marshal_positional(&bad, ",").unwrap_err();
    assert!(matches!(err, Error::Indirection(_)));
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Report {
        code: String => "pos=0;class=AN",
        digest: String => "pos=virtual;set=@derive",
    }
    impl {
        fn invoke_setter(&mut self, name: &str, _raw: &str) -> Result<(), flatwire::Error> {
            match name {
                "derive" => {
                    self.digest = format!("len{}", self.code.len());
                    Ok(())
                }
                other => Err(flatwire::Error::indirection(format!(
                    "record declares no setter `{other}`"
                ))),
            }
        }
    }
}

#[test]
fn test_virtual_field_computes_after_positioned_fields() {
    let fw = Flatwire::default();
    let report: Report = fw.unmarshal_positional("abc", ",").unwrap();
    assert_eq!(report.code, "abc");
    assert_eq!(report.digest, "len3");
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Ticket {
        code: String => "pos=0;default=XYZ;set=@stamp",
    }
    impl {
        fn invoke_setter(&mut self, name: &str, raw: &str) -> Result<(), flatwire::Error> {
            match name {
                "stamp" => {
                    self.code = raw.to_lowercase();
                    Ok(())
                }
                other => Err(flatwire::Error::indirection(format!(
                    "record declares no setter `{other}`"
                ))),
            }
        }
    }
}

#[test]
fn test_injected_default_routes_through_the_setter() {
    let fw = Flatwire::default();
    // A blank token takes the declared default, and the default runs
    // through the field's setter like any wire value.
    let ticket: Ticket = fw.unmarshal_positional("", ",").unwrap();
    assert_eq!(ticket.code, "xyz");
}

#[test]
fn test_wire_values_still_route_through_the_same_setter() {
    let fw = Flatwire::default();
    let ticket: Ticket = fw.unmarshal_positional("ABC", ",").unwrap();
    assert_eq!(ticket.code, "abc");
}

#[test]
fn test_virtual_field_never_emits() {
    let fw = Flatwire::default();
    let report = Report {
        code: "abc".to_string(),
        digest: "len3".to_string(),
    };
    assert_eq!(fw.marshal_positional(&report, ",").unwrap(), "abc");
    assert_eq!(fw.marshal_json(&report).unwrap(), r#"{"code":"abc"}"#);
}
