//! Read, rewrite and print whole generated modules.

use declgen_syntax::{FormatOptions, print_module, read_typescript, transform};

fn normalize(source: &str) -> String {
    let module = read_typescript(source).expect("parse failed");
    let module = transform(module).expect("transform failed");
    print_module(&module, &FormatOptions::default())
}

const GENERATED: &str = r#"/* eslint-disable */
/**
 * This file was automatically generated by a schema compiler.
 * DO NOT MODIFY IT BY HAND.
 */

/**
 * Linter configuration.
 */
export interface Config {
  /**
   * Rule settings.
   */
  rules?: {
    [k: string]: Rule;
  };
  mode?: ("fast" | "slow") & string;
  extends?: string | string[] | {[k: string]: unknown};
  [k: string]: unknown;
}

export type Rule = Level | [Level] | {
  [k: string]: unknown;
};

export type Level = ((0 | 1 | 2) & number) | (("off" | "warn" | "error") & string);
"#;

#[test]
fn generated_module_is_cleaned() {
    insta::assert_snapshot!(normalize(GENERATED), @r#"
    /* eslint-disable */
    /**
     * This file was automatically generated by a schema compiler.
     * DO NOT MODIFY IT BY HAND.
     */

    /**
     * Linter configuration.
     */
    export interface Config {
      /**
       * Rule settings.
       */
      rules?: {
        [k: string]: Rule;
      };
      mode?: "fast" | "slow";
      extends?: string | string[];
    }

    export type Rule = Level | [Level];

    export type Level = ((0 | 1 | 2) & number) | "off" | "warn" | "error";
    "#);
}

#[test]
fn normalizing_printed_output_is_stable() {
    let once = normalize(GENERATED);
    let twice = normalize(&once);
    assert_eq!(once, twice);
}

#[test]
fn long_unions_break_per_member() {
    let source = r#"export type Level = "off" | "warn" | "error" | "information" | "hint" | "suggestion" | "verbose";"#;
    assert_eq!(
        normalize(source),
        "export type Level =\n  | \"off\"\n  | \"warn\"\n  | \"error\"\n  | \"information\"\n  | \"hint\"\n  | \"suggestion\"\n  | \"verbose\";\n"
    );
}

#[test]
fn untouched_declarations_survive() {
    let source = "export interface Point {\n  x: number;\n  y: number;\n}\n\nexport type Id = string | number;\n";
    assert_eq!(normalize(source), source);
}

#[test]
fn invalid_source_is_rejected() {
    assert!(read_typescript("export interface {").is_err());
}
