//! Snapshot tests for the declaration tree.
//!
//! Run `cargo insta review` to update snapshots after intentional changes.

use declgen_syntax::{Module, read_typescript, transform};

fn parse(code: &str) -> Module {
    read_typescript(code).expect("parse failed")
}

#[test]
fn string_widening_alias() {
    insta::assert_json_snapshot!(parse(r#"type T = ("a" | "b") & string;"#), @r#"
    {
      "items": [
        {
          "Declaration": {
            "comments": [],
            "export": false,
            "kind": {
              "TypeAlias": {
                "name": "T",
                "type_parameters": null,
                "value": {
                  "Intersection": [
                    {
                      "Parenthesized": {
                        "Union": [
                          {
                            "StringLiteral": "\"a\""
                          },
                          {
                            "StringLiteral": "\"b\""
                          }
                        ]
                      }
                    },
                    {
                      "Keyword": "String"
                    }
                  ]
                }
              }
            }
          }
        }
      ]
    }
    "#);
}

#[test]
fn interface_after_rewrites() {
    let module = transform(parse(
        "export interface C {\n  /** Mode. */\n  mode?: number; // inline\n  [k: string]: unknown;\n}",
    ))
    .expect("transform failed");
    insta::assert_json_snapshot!(module, @r#"
    {
      "items": [
        {
          "Declaration": {
            "comments": [],
            "export": true,
            "kind": {
              "Interface": {
                "name": "C",
                "type_parameters": null,
                "extends": null,
                "members": [
                  {
                    "comments": [
                      "/** Mode. */"
                    ],
                    "kind": {
                      "Property": {
                        "name": "mode",
                        "optional": true,
                        "readonly": false,
                        "ty": {
                          "Keyword": "Number"
                        }
                      }
                    },
                    "trailing": "// inline"
                  }
                ]
              }
            }
          }
        }
      ]
    }
    "#);
}
