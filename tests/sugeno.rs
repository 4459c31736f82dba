use fuzzy_math::membership::{from_fn, shared, triangular};
use fuzzy_math::{FuzzyError, Inputs, SharedMembership, SugenoFis};

fn large() -> SharedMembership {
    shared(from_fn(|x| {
        if x >= 100. {
            1.
        } else if x >= 35. {
            0.5
        } else {
            0.
        }
    }))
}

fn small() -> SharedMembership {
    shared(from_fn(|x| {
        if x <= 25. {
            1.
        } else if x > 25. && x < 40. {
            0.5
        } else {
            0.
        }
    }))
}

fn four_rule_fis() -> SugenoFis {
    SugenoFis::from_parts(
        [("large", large()), ("small", small())],
        [
            "if x is large and y is small then 3x + 2y",
            "if x is small and y is large then 2x + 3y",
            "if x is small and y is small then x + y",
            "if x is large and y is large then 3x + 3y",
        ],
    )
    .unwrap()
}

#[test]
fn test_single_rule_fires() {
    let fis = four_rule_fis();

    assert_eq!(fis.evaluate(&Inputs::from([("x", 100.), ("y", 25.)])), Ok(350.));
}

#[test]
fn test_weighted_average_of_two_rules() {
    let fis = four_rule_fis();
    let outputs = fis
        .evaluate_detailed(&Inputs::from([("x", 37.), ("y", 75.)]), None)
        .unwrap();

    assert_eq!(outputs.value(), 317.5);
    assert_eq!(outputs.weight_sum(), 1.);
    assert_eq!(
        outputs.firings().iter().map(|f| f.w).collect::<Vec<_>>(),
        vec![0., 0.5, 0., 0.5]
    );
}

#[test]
fn test_nothing_fires_yields_zero() {
    let fis = SugenoFis::from_parts([("large", large())], ["if x is large then 1000"]).unwrap();

    assert_eq!(fis.evaluate(&Inputs::from([("x", 0.)])), Ok(0.));
}

#[test]
fn test_context_feeds_the_consequent() {
    let fis = SugenoFis::from_parts([("large", large())], ["if x is large and y is large then t"]).unwrap();
    let args = Inputs::from([("x", 100.), ("y", 100.)]);

    assert_eq!(fis.evaluate_with_context(&args, &Inputs::from([("t", 100.)])), Ok(100.));
    assert_eq!(
        fis.evaluate_with_context(&args, &Inputs::from([("t", 100.), ("y", 5.)])),
        Err(FuzzyError::AmbiguousBinding { name: "y".to_owned() })
    );
    assert!(matches!(fis.evaluate(&args), Err(FuzzyError::NaNConsequent { .. })));
}

#[test]
fn test_missing_argument_is_nan_firing_strength() {
    let fis = four_rule_fis();

    assert!(matches!(
        fis.evaluate(&Inputs::from([("x", 100.)])),
        Err(FuzzyError::NaNFiringStrength { .. })
    ));
}

#[test]
fn test_rule_registration_errors() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("large", large());

    assert_eq!(
        builder.add_rule("if x is large and y is medium then x").err(),
        Some(FuzzyError::UnknownLinguisticVariable("medium".to_owned()))
    );

    builder.add_rule("if x is large then x").unwrap();
    assert!(matches!(
        builder.add_rule("IF X IS LARGE THEN X"),
        Err(FuzzyError::DuplicateRule(_))
    ));
    assert!(matches!(
        builder.add_rule("when x is large then x"),
        Err(FuzzyError::RuleSyntax { .. })
    ));
    assert!(matches!(
        builder.add_rule("if x is large then 3 +"),
        Err(FuzzyError::ExpressionSyntax { .. })
    ));

    assert_eq!(builder.build().rules().len(), 1);
}

#[test]
fn test_deeply_nested_consequent_is_rejected() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("large", large());

    let nested = format!("if t is large then {}t{}", "(".repeat(600), ")".repeat(600));
    assert!(matches!(
        builder.add_rule(&nested),
        Err(FuzzyError::ExpressionSyntax { .. })
    ));
    assert!(builder.build().rules().is_empty());
}

#[test]
fn test_value_of_passes_through() {
    let fis = four_rule_fis();

    assert_eq!(fis.value_of("large", 50.), Ok(0.5));
    assert_eq!(fis.value_of("SMALL", 10.), Ok(1.));
}

#[test]
fn test_parametric_sets() {
    let fis = SugenoFis::from_parts(
        [
            ("cold", triangular(-20., 0., 20.).unwrap()),
            ("hot", triangular(10., 30., 50.).unwrap()),
        ],
        ["if t is cold then 80", "if t is hot then 20"],
    )
    .unwrap();

    // cold 0.25 and hot 0.25
    assert_eq!(fis.evaluate(&Inputs::from([("t", 15.)])), Ok(50.));
}

#[test]
fn test_fis_is_shareable_across_threads() {
    let fis = std::sync::Arc::new(four_rule_fis());

    let handles: Vec<_> = [(100., 25.), (37., 75.)]
        .into_iter()
        .map(|(x, y)| {
            let fis = std::sync::Arc::clone(&fis);
            std::thread::spawn(move || fis.evaluate(&Inputs::from([("x", x), ("y", y)])))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![Ok(350.), Ok(317.5)]);
}
