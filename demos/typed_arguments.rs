//! Typed container example.
//!
//! Registers the slots of a plain Rust struct by implementing `Arguments`,
//! then binds a few token lists against it, including failing ones.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --example typed_arguments
//! ```

use std::path::PathBuf;

use argbind_core::{ArgumentDefinition, Arguments, DefinitionError, Slot, parse};

#[derive(Debug, Default)]
struct Archive {
    output: PathBuf,
    level: Option<u8>,
    verbose: bool,
    dry_run: bool,
    inputs: Vec<PathBuf>,
}

impl Arguments for Archive {
    fn definition() -> Result<ArgumentDefinition<Self>, DefinitionError> {
        ArgumentDefinition::builder()
            .slot(
                Slot::named(Some("output"), Some('o'), |a: &mut Archive, v: PathBuf| a.output = v)
                    .describe("Archive file to write"),
            )
            .slot(
                Slot::named(Some("level"), Some('l'), |a: &mut Archive, v: Option<u8>| a.level = v)
                    .optional()
                    .describe("Compression level"),
            )
            .slot(Slot::switch(Some("verbose"), Some('v'), |a: &mut Archive, v| a.verbose = v))
            .slot(Slot::switch(Some("dry-run"), None, |a: &mut Archive, v| a.dry_run = v))
            .slot(Slot::remaining(|a: &mut Archive, v: Vec<PathBuf>| a.inputs = v))
            .build()
    }
}

fn main() {
    // Convenience form: builds the definition on every call.
    match Archive::parse_from(&["-o", "out.tar", "-v", "a.txt", "b.txt"]) {
        Ok(archive) => println!("parsed: {archive:?}"),
        Err(err) => println!("error: {err}"),
    }

    // Low-level form: build once, reuse for many token lists.
    let definition = match Archive::definition() {
        Ok(definition) => definition,
        Err(err) => {
            eprintln!("invalid definition: {err}");
            return;
        }
    };

    let inputs: [&[&str]; 4] = [
        &["--output", "x.tar", "--level", "9", "--dry-run"],
        &["--level", "9"],
        &["--output", "x.tar", "--level", "high"],
        &["--output"],
    ];
    for tokens in inputs {
        match parse(&definition, tokens) {
            Ok(archive) => println!("{tokens:?} -> {archive:?}"),
            Err(err) => println!("{tokens:?} -> error ({:?}): {err}", err.kind()),
        }
    }
}
