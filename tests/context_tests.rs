//! Integration tests for the free/fixed parameter partition.

use flexifit::context::{FitContext, PartitionError, DEFAULT_INITIAL};

const FULL: [&str; 4] = ["a", "b", "c", "d"];

#[test]
fn valid_partition_covers_every_parameter_once() {
    let context = FitContext::builder()
        .free(["a", "c"])
        .fix("b", 1.0)
        .fix("d", -2.0)
        .build(&FULL)
        .unwrap();

    // Every full name is either free or fixed, never both.
    for name in FULL {
        let is_free = context.free().iter().any(|n| n == name);
        let is_fixed = context.fixed().contains_key(name);
        assert!(is_free != is_fixed, "'{}' must be in exactly one side", name);
    }
    assert_eq!(context.free().len() + context.fixed().len(), FULL.len());
}

#[test]
fn overlapping_partition_is_rejected() {
    let err = FitContext::builder()
        .free(["a", "b", "c"])
        .fix("c", 0.0)
        .fix("d", 0.0)
        .build(&FULL)
        .unwrap_err();

    assert!(matches!(err, PartitionError::Overlap { .. }));
}

#[test]
fn incomplete_partition_is_rejected() {
    let err = FitContext::builder()
        .free(["a"])
        .fix("b", 0.0)
        .build(&FULL)
        .unwrap_err();

    assert!(matches!(err, PartitionError::Unassigned { .. }));
}

#[test]
fn foreign_names_are_rejected() {
    let err = FitContext::builder()
        .free(["a", "nope"])
        .fix("b", 0.0)
        .fix("c", 0.0)
        .fix("d", 0.0)
        .build(&FULL)
        .unwrap_err();

    assert!(matches!(err, PartitionError::UnknownParameter { .. }));

    let err = FitContext::builder()
        .free(["a", "b", "c", "d"])
        .fix("nope", 0.0)
        .build(&FULL)
        .unwrap_err();

    assert!(matches!(err, PartitionError::UnknownParameter { .. }));
}

#[test]
fn guesses_and_bounds_must_reference_free_parameters() {
    for field in ["initial", "lower", "upper"] {
        let partition = FitContext::builder()
            .free(["a", "b", "c"])
            .fix("d", 0.0);

        let partition = match field {
            "initial" => partition.initial("d", 1.0),
            "lower" => partition.lower("d", 0.0),
            _ => partition.upper("d", 2.0),
        };

        let err = partition.build(&FULL).unwrap_err();
        assert!(
            matches!(err, PartitionError::NotFree { .. }),
            "{} referencing a fixed parameter must be rejected",
            field
        );
    }
}

#[test]
fn p0_and_bounds_are_free_ordered() {
    let context = FitContext::builder()
        .free(["d", "a", "b"])
        .fix("c", 0.0)
        .initial("a", 3.0)
        .initial("d", -1.0)
        .lower("a", 0.0)
        .upper("b", 10.0)
        .build(&FULL)
        .unwrap();

    let p0 = context.p0();
    assert_eq!(p0.to_vec(), vec![-1.0, 3.0, DEFAULT_INITIAL]);

    let (lowers, uppers) = context.bounds();
    for (i, name) in context.free().iter().enumerate() {
        let expected_lower = context
            .lower()
            .get(name)
            .copied()
            .unwrap_or(f64::NEG_INFINITY);
        let expected_upper = context.upper().get(name).copied().unwrap_or(f64::INFINITY);
        assert_eq!(lowers[i], expected_lower, "lower bound for {}", name);
        assert_eq!(uppers[i], expected_upper, "upper bound for {}", name);
    }
}

#[test]
fn identical_inputs_yield_identical_vectors() {
    let build = || {
        FitContext::builder()
            .free(["a", "b"])
            .fix("c", 0.5)
            .fix("d", 1.5)
            .initial("b", 4.0)
            .lower("a", -1.0)
            .upper("a", 1.0)
            .build(&FULL)
            .unwrap()
    };

    let first = build();
    let second = build();

    assert_eq!(first.p0(), second.p0());
    assert_eq!(first.bounds(), second.bounds());

    // Recomputation on the same instance is stable too.
    assert_eq!(first.p0(), first.p0());
    assert_eq!(first.bounds(), first.bounds());
}

#[test]
fn context_serde_round_trip() {
    let context = FitContext::builder()
        .free(["a", "b"])
        .fix("c", 0.5)
        .fix("d", 1.5)
        .initial("a", 2.0)
        .lower("a", 0.0)
        .upper("a", 3.0)
        .build(&FULL)
        .unwrap();

    let json = serde_json::to_string(&context).unwrap();
    let back: FitContext = serde_json::from_str(&json).unwrap();

    assert_eq!(back.free(), context.free());
    assert_eq!(back.fixed(), context.fixed());
    assert_eq!(back.p0(), context.p0());
    assert_eq!(back.bounds(), context.bounds());
}
