//! Schema file binding example.
//!
//! Writes a YAML schema to a temporary directory, loads and compiles it,
//! and prints the record bound from a token list as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --example schema_binding -- --name Ann -v 3 extra
//! ```

use argbind_schema::SchemaFile;

const SCHEMA: &str = r#"version: "1.0"
command: greet
description: Print a greeting
fields:
  - name: name
    kind: named_value
    description: Who to greet
  - name: verbose
    kind: switch
    short: v
    type: bool
  - name: times
    kind: positional_value
    index: 0
    type: uint
    optional: true
    nullable: true
  - name: extra
    kind: remaining
"#;

fn main() {
    let dir = std::env::temp_dir().join("argbind_example_schema");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("greet.yml");
    std::fs::write(&path, SCHEMA).unwrap();

    let schema = SchemaFile::load(&path).unwrap();
    let definition = schema.compile().unwrap();
    println!(
        "Loaded schema for '{}' with {} fields",
        schema.command.as_deref().unwrap_or("?"),
        definition.len()
    );

    let mut tokens: Vec<String> = std::env::args().skip(1).collect();
    if tokens.is_empty() {
        tokens = ["--name", "Ann", "-v", "3", "extra"]
            .into_iter()
            .map(String::from)
            .collect();
    }

    match definition.parse(tokens.as_slice()) {
        Ok(record) => println!("{}", serde_json::to_string_pretty(&record).unwrap()),
        Err(err) => println!("error: {err}"),
    }

    std::fs::remove_dir_all(&dir).ok();
}
