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

use flatwire::{record, Flatwire};

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Plain {
        up: bool => "pos=0;class=BOOL",
    }
}

#[test]
fn test_built_in_true_literals() {
    let fw = Flatwire::default();
    for literal in ["true", "yes", "on", "running", "started", "Y", "1"] {
        let plain: Plain = fw.unmarshal_positional(literal, ",").unwrap();
        assert!(plain.up, "literal `{literal}` should read as true");
    }
}

#[test]
fn test_unrecognized_literals_read_as_false() {
    let fw = Flatwire::default();
    for literal in ["false", "no", "off", "whatever", "0"] {
        let plain: Plain = fw.unmarshal_positional(literal, ",").unwrap();
        assert!(!plain.up, "literal `{literal}` should read as false");
    }
}

#[test]
fn test_emission_without_overrides_is_canonical() {
    let fw = Flatwire::default();
    assert_eq!(
        fw.marshal_positional(&Plain { up: true }, ",").unwrap(),
        "true"
    );
    assert_eq!(
        fw.marshal_positional(&Plain { up: false }, ",").unwrap(),
        "false"
    );
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Link {
        state: bool => "pos=0;class=BOOL;truthy=UP|RUNNING;falsy=DOWN",
    }
}

#[test]
fn test_override_literals_map_both_ways() {
    let fw = Flatwire::default();

    let link: Link = fw.unmarshal_positional("up", ",").unwrap();
    assert!(link.state);
    let link: Link = fw.unmarshal_positional("RUNNING", ",").unwrap();
    assert!(link.state);
    let link: Link = fw.unmarshal_positional("down", ",").unwrap();
    assert!(!link.state);
}

#[test]
fn test_first_override_is_the_emission_literal() {
    let fw = Flatwire::default();
    assert_eq!(
        fw.marshal_positional(&Link { state: true }, ",").unwrap(),
        "UP"
    );
    assert_eq!(
        fw.marshal_positional(&Link { state: false }, ",").unwrap(),
        "DOWN"
    );
}

#[test]
fn test_comma_separated_overrides_behave_like_pipes() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Port {
            state: bool => "pos=0;class=BOOL;truthy=UP,RUNNING;falsy=DOWN",
        }
    }

    let fw = Flatwire::default();
    let port: Port = fw.unmarshal_positional("running", ",").unwrap();
    assert!(port.state);
    assert_eq!(
        fw.marshal_positional(&Port { state: true }, ",").unwrap(),
        "UP"
    );
}

#[test]
fn test_falsy_wins_over_truthy_on_conflict() {
    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Odd {
            flag: bool => "pos=0;class=BOOL;truthy=X;falsy=X",
        }
    }

    let fw = Flatwire::default();
    let odd: Odd = fw.unmarshal_positional("X", ",").unwrap();
    assert!(!odd.flag);
}
