use std::sync::Arc;
use std::thread;

use argbind_core::{
    ArgumentDefinition, Arguments, DefinitionError, Error, ParseError, ParseErrorKind, Slot,
    SlotId, TargetType, parse, parse_as,
};

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq)]
struct Greeting {
    name: String,
    verbose: bool,
}

fn greeting_definition() -> ArgumentDefinition<Greeting> {
    ArgumentDefinition::builder()
        .slot(Slot::named(Some("name"), None, |g: &mut Greeting, v: String| g.name = v))
        .slot(Slot::switch(Some("verbose"), Some('v'), |g: &mut Greeting, v| g.verbose = v))
        .build()
        .unwrap()
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Pair {
    first: i32,
    second: Option<String>,
    rest: Vec<String>,
}

fn pair_definition() -> ArgumentDefinition<Pair> {
    ArgumentDefinition::builder()
        .slot(Slot::positional(0, |p: &mut Pair, v: i32| p.first = v))
        .slot(Slot::positional(1, |p: &mut Pair, v: Option<String>| p.second = v).optional())
        .build()
        .unwrap()
}

fn overflow_definition() -> ArgumentDefinition<Pair> {
    ArgumentDefinition::builder()
        .slot(Slot::positional(0, |p: &mut Pair, v: i32| p.first = v))
        .slot(Slot::remaining(|p: &mut Pair, v: Vec<String>| p.rest = v))
        .build()
        .unwrap()
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Transfer {
    source: String,
    target: Option<String>,
    retries: u8,
    rate: Option<f64>,
    force: bool,
    quiet: bool,
}

impl Arguments for Transfer {
    fn definition() -> Result<ArgumentDefinition<Self>, DefinitionError> {
        ArgumentDefinition::builder()
            .slot(Slot::named(Some("retries"), Some('r'), |t: &mut Transfer, v: u8| t.retries = v))
            .slot(
                Slot::named(Some("rate"), None, |t: &mut Transfer, v: Option<f64>| t.rate = v)
                    .optional(),
            )
            .slot(Slot::switch(Some("force"), Some('f'), |t: &mut Transfer, v| t.force = v))
            .slot(Slot::switch(None, Some('q'), |t: &mut Transfer, v| t.quiet = v))
            .slot(Slot::positional(0, |t: &mut Transfer, v: String| t.source = v))
            .slot(
                Slot::positional(1, |t: &mut Transfer, v: String| t.target = Some(v)).optional(),
            )
            .build()
    }
}

#[derive(Debug, Default)]
struct Broken;

impl Arguments for Broken {
    fn definition() -> Result<ArgumentDefinition<Self>, DefinitionError> {
        ArgumentDefinition::builder()
            .slot(Slot::remaining(|_: &mut Broken, _: Vec<String>| {}))
            .slot(Slot::remaining(|_: &mut Broken, _: Vec<String>| {}))
            .build()
    }
}

// ---------------------------------------------------------------------------
// Named arguments and switches
// ---------------------------------------------------------------------------

#[test]
fn named_value_and_switch_bind() {
    let greeting = parse(&greeting_definition(), &["--name", "Ann", "-v"]).unwrap();
    assert_eq!(
        greeting,
        Greeting {
            name: "Ann".into(),
            verbose: true
        }
    );
}

#[test]
fn missing_mandatory_named_argument_fails() {
    let err = parse(&greeting_definition(), &["-v"]).unwrap_err();
    assert_eq!(err, ParseError::MissingMandatoryNamedArgument("name".into()));
}

#[test]
fn switch_absent_stays_false() {
    let greeting = parse(&greeting_definition(), &["--name", "Bo"]).unwrap();
    assert!(!greeting.verbose);
}

#[test]
fn switch_position_does_not_matter() {
    let def = greeting_definition();
    let before = parse(&def, &["--verbose", "--name", "Ann"]).unwrap();
    let after = parse(&def, &["--name", "Ann", "--verbose"]).unwrap();
    assert_eq!(before, after);
}

#[test]
fn switch_never_consumes_following_token() {
    let def = ArgumentDefinition::<Pair>::builder()
        .slot(Slot::switch(Some("all"), None, |_: &mut Pair, _| {}))
        .slot(Slot::positional(0, |p: &mut Pair, v: i32| p.first = v))
        .build()
        .unwrap();

    let pair = parse(&def, &["--all", "12"]).unwrap();
    assert_eq!(pair.first, 12);
}

#[test]
fn named_value_takes_next_token_verbatim() {
    let greeting = parse(&greeting_definition(), &["--name", "--verbose"]).unwrap();
    assert_eq!(greeting.name, "--verbose");
    assert!(!greeting.verbose);
}

#[test]
fn repeated_named_value_keeps_last() {
    let greeting = parse(&greeting_definition(), &["--name", "a", "--name", "b"]).unwrap();
    assert_eq!(greeting.name, "b");
}

#[test]
fn missing_value_at_end_of_input_fails() {
    let err = parse(&greeting_definition(), &["-v", "--name"]).unwrap_err();
    assert_eq!(err, ParseError::MissingValueForNamedArgument("name".into()));

    let err = Transfer::parse_from(&["src", "-r"]).unwrap_err();
    assert_eq!(
        err,
        Error::Parse(ParseError::MissingValueForNamedArgument("r".into()))
    );
}

#[test]
fn unknown_long_argument_fails() {
    let err = parse(&greeting_definition(), &["--unknown"]).unwrap_err();
    assert_eq!(err, ParseError::UnknownArgument("unknown".into()));
    assert_eq!(err.kind(), ParseErrorKind::UnknownArgument);
}

#[test]
fn unknown_short_argument_fails() {
    let err = parse(&greeting_definition(), &["--name", "x", "-q"]).unwrap_err();
    assert_eq!(err, ParseError::UnknownArgument("q".into()));
}

#[test]
fn malformed_short_option_fails() {
    let err = parse(&greeting_definition(), &["-vv"]).unwrap_err();
    assert_eq!(err, ParseError::MalformedShortOption("-vv".into()));
}

#[test]
fn negative_number_is_not_a_positional() {
    let def = pair_definition();
    assert_eq!(
        parse(&def, &["-42"]).unwrap_err(),
        ParseError::MalformedShortOption("-42".into())
    );
    assert_eq!(
        parse(&def, &["-5"]).unwrap_err(),
        ParseError::UnknownArgument("5".into())
    );
}

// ---------------------------------------------------------------------------
// Positional arguments and overflow
// ---------------------------------------------------------------------------

#[test]
fn optional_positional_may_be_omitted() {
    let pair = parse(&pair_definition(), &["7"]).unwrap();
    assert_eq!(pair.first, 7);
    assert_eq!(pair.second, None);
}

#[test]
fn positionals_bind_in_declared_order() {
    let pair = parse(&pair_definition(), &["7", "x"]).unwrap();
    assert_eq!(pair.first, 7);
    assert_eq!(pair.second.as_deref(), Some("x"));
}

#[test]
fn extra_positionals_without_collector_fail() {
    let err = parse(&pair_definition(), &["7", "x", "y"]).unwrap_err();
    assert_eq!(err, ParseError::TooManyPositionalArguments(vec!["y".into()]));
}

#[test]
fn extra_positionals_go_to_collector() {
    let pair = parse(&overflow_definition(), &["7", "y", "z"]).unwrap();
    assert_eq!(pair.first, 7);
    assert_eq!(pair.rest, vec!["y", "z"]);
}

#[test]
fn empty_overflow_still_binds_collector() {
    let def = ArgumentDefinition::builder_with(|| Pair {
        rest: vec!["sentinel".into()],
        ..Pair::default()
    })
    .slot(Slot::remaining(|p: &mut Pair, v: Vec<String>| p.rest = v))
    .build()
    .unwrap();

    let pair = parse::<_, &str>(&def, &[]).unwrap();
    assert!(pair.rest.is_empty());
}

#[test]
fn missing_mandatory_positional_fails() {
    let err = parse::<_, &str>(&pair_definition(), &[]).unwrap_err();
    assert_eq!(err, ParseError::MissingMandatoryPositionalArgument(0));
}

#[test]
fn missing_second_positional_reports_its_index() {
    let def = ArgumentDefinition::<Pair>::builder()
        .slot(Slot::positional(0, |p: &mut Pair, v: i32| p.first = v))
        .slot(Slot::positional(1, |p: &mut Pair, v: String| p.second = Some(v)))
        .build()
        .unwrap();

    assert_eq!(
        parse(&def, &["7"]).unwrap_err(),
        ParseError::MissingMandatoryPositionalArgument(1)
    );
    assert_eq!(parse(&def, &["7", "x"]).unwrap().second.as_deref(), Some("x"));
}

#[test]
fn collector_converts_each_token() {
    #[derive(Debug, Default)]
    struct Numbers {
        values: Vec<i64>,
    }

    let def = ArgumentDefinition::<Numbers>::builder()
        .slot(Slot::remaining(|n: &mut Numbers, v: Vec<i64>| n.values = v))
        .build()
        .unwrap();

    assert_eq!(parse(&def, &["1", "2", "3"]).unwrap().values, vec![1, 2, 3]);

    let err = parse(&def, &["1", "two"]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::ConversionFailure { slot: SlotId::Remaining, ref raw, .. } if raw == "two"
    ));
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[test]
fn conversion_failure_names_slot_value_and_type() {
    let err = parse(&pair_definition(), &["seven"]).unwrap_err();
    match err {
        ParseError::ConversionFailure {
            slot, raw, target, ..
        } => {
            assert_eq!(slot, SlotId::Position(0));
            assert_eq!(raw, "seven");
            assert_eq!(target, TargetType::scalar("i32"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn positional_failure_names_position_not_attached_name() {
    let def = ArgumentDefinition::<Pair>::builder()
        .slot(Slot::positional(0, |p: &mut Pair, v: i32| p.first = v).long("count"))
        .build()
        .unwrap();

    match parse(&def, &["x"]).unwrap_err() {
        ParseError::ConversionFailure { slot, .. } => assert_eq!(slot, SlotId::Position(0)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        parse(&def, &["--count", "3"]).unwrap_err(),
        ParseError::UnknownArgument("count".into())
    );
}

#[test]
fn custom_conversion_binds_named_value() {
    #[derive(Debug, Default)]
    struct Scale {
        percent: u8,
    }

    fn percent(token: &str) -> Result<u8, String> {
        let value: u8 = token
            .trim_end_matches('%')
            .parse()
            .map_err(|err| format!("{err}"))?;
        if value > 100 {
            return Err("above 100%".to_string());
        }
        Ok(value)
    }

    let def = ArgumentDefinition::<Scale>::builder()
        .slot(Slot::named_with(Some("scale"), Some('s'), percent, |s: &mut Scale, v| s.percent = v))
        .build()
        .unwrap();

    assert_eq!(parse(&def, &["-s", "40%"]).unwrap().percent, 40);

    match parse(&def, &["--scale", "140%"]).unwrap_err() {
        ParseError::ConversionFailure {
            slot,
            raw,
            target,
            reason,
        } => {
            assert_eq!(slot, SlotId::Long("scale".into()));
            assert_eq!(raw, "140%");
            assert_eq!(target.name, "u8");
            assert_eq!(reason, "above 100%");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nullable_named_value_binds_some() {
    let transfer = Transfer::parse_from(&["--rate", "1.5", "-r", "3", "in"]).unwrap();
    assert_eq!(transfer.rate, Some(1.5));
    assert_eq!(transfer.retries, 3);
}

#[test]
fn numeric_overflow_is_conversion_failure() {
    let err = Transfer::parse_from(&["-r", "300", "in"]).unwrap_err();
    match err {
        Error::Parse(ParseError::ConversionFailure { slot, target, .. }) => {
            assert_eq!(slot, SlotId::Long("retries".into()));
            assert_eq!(target.to_string(), "u8");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Convenience entry point
// ---------------------------------------------------------------------------

#[test]
fn parse_as_builds_definition_and_binds() {
    let transfer: Transfer = parse_as(&["-f", "-q", "--retries", "2", "a.txt", "b.txt"]).unwrap();
    assert_eq!(
        transfer,
        Transfer {
            source: "a.txt".into(),
            target: Some("b.txt".into()),
            retries: 2,
            rate: None,
            force: true,
            quiet: true,
        }
    );
}

#[test]
fn definition_errors_are_distinct_from_parse_errors() {
    let err = Broken::parse_from::<&str>(&[]).unwrap_err();
    assert_eq!(err, Error::Definition(DefinitionError::MultipleRemaining));
}

#[test]
fn owned_string_tokens_are_accepted() {
    let tokens: Vec<String> = vec!["--name".into(), "Cy".into()];
    let greeting = parse(&greeting_definition(), tokens.as_slice()).unwrap();
    assert_eq!(greeting.name, "Cy");
}

// ---------------------------------------------------------------------------
// Determinism and reuse
// ---------------------------------------------------------------------------

#[test]
fn parsing_is_deterministic() {
    let def = greeting_definition();
    let inputs: [&[&str]; 4] = [
        &["--name", "Ann", "-v"],
        &["-v"],
        &["--bogus"],
        &["--name"],
    ];
    for tokens in inputs {
        assert_eq!(parse(&def, tokens), parse(&def, tokens), "{tokens:?}");
    }
}

#[test]
fn definition_reuse_does_not_leak_state() {
    let def = greeting_definition();

    let first = parse(&def, &["--name", "Ann", "-v"]).unwrap();
    assert!(first.verbose);

    // A failed parse in between leaves nothing behind.
    assert!(parse(&def, &["--verbose"]).is_err());

    let second = parse(&def, &["--name", "Bo"]).unwrap();
    assert_eq!(second.name, "Bo");
    assert!(!second.verbose);
}

#[test]
fn definition_can_be_shared_across_threads() {
    let def = Arc::new(greeting_definition());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let def = Arc::clone(&def);
            thread::spawn(move || {
                let name = format!("user{i}");
                let tokens = if i % 2 == 0 {
                    vec!["--name".to_string(), name.clone(), "-v".to_string()]
                } else {
                    vec!["--name".to_string(), name.clone()]
                };
                let greeting = def.parse(tokens.as_slice()).unwrap();
                (greeting, name, i % 2 == 0)
            })
        })
        .collect();

    for handle in handles {
        let (greeting, name, verbose) = handle.join().unwrap();
        assert_eq!(greeting.name, name);
        assert_eq!(greeting.verbose, verbose);
    }
}
