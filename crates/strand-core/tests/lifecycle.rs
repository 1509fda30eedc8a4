//! Full create / keep / replace / destroy cycles through the provider

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use strand_core::prelude::*;
use strand_core::StrandError;
use strand_state::MIN_BCRYPT_COST;
use strand_test_utils::{counting, keepers, seeded, FailingSource};

fn provider() -> Provider {
    Provider::new(StrandConfig::new().with_bcrypt_cost(MIN_BCRYPT_COST)).unwrap()
}

#[test]
fn string_kept_until_keepers_change() {
    let provider = provider();
    let config = StringInputs::new(24).with_keepers(keepers(&[("ami", "ami-1")]));

    let (action, state) =
        converge(provider.string(), Some(&config), None, &mut seeded(1)).unwrap();
    assert_eq!(action, PlanAction::Create);
    let state = state.unwrap();

    let mut source = counting(2);
    let (action, kept) =
        converge(provider.string(), Some(&config), Some(&state), &mut source).unwrap();
    assert_eq!(action, PlanAction::Update);
    assert_eq!(kept.unwrap().result, state.result);
    assert_eq!(source.bytes_drawn(), 0);

    let rotated = StringInputs::new(24).with_keepers(keepers(&[("ami", "ami-2")]));
    let (action, replaced) =
        converge(provider.string(), Some(&rotated), Some(&state), &mut seeded(3)).unwrap();
    assert_eq!(action, PlanAction::Replace);
    assert_ne!(replaced.unwrap().result, state.result);
}

#[test]
fn adding_null_keeper_keeps_value() {
    let provider = provider();
    let config = StringInputs::new(8);
    let (_, state) = converge(provider.string(), Some(&config), None, &mut seeded(1)).unwrap();
    let state = state.unwrap();

    let mut with_null = Keepers::new();
    with_null.insert("later".to_string(), None);
    let (action, _) = converge(
        provider.string(),
        Some(&StringInputs::new(8).with_keepers(with_null)),
        Some(&state),
        &mut seeded(2),
    )
    .unwrap();
    assert_eq!(action, PlanAction::Update);
}

#[test]
fn password_lifecycle() {
    let provider = provider();
    let config = StringInputs::new(32)
        .with_min(CharClass::Upper, 4)
        .with_min(CharClass::Numeric, 4)
        .with_override_special("!@#");

    let (_, state) = converge(provider.password(), Some(&config), None, &mut seeded(9)).unwrap();
    let state = state.unwrap();
    assert_eq!(state.result.chars().count(), 32);
    assert!(state.result.chars().filter(char::is_ascii_uppercase).count() >= 4);
    assert!(state
        .result
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric())
        .all(|c| "!@#".contains(c)));

    let (action, gone) =
        converge(provider.password(), None, Some(&state), &mut FailingSource).unwrap();
    assert_eq!(action, PlanAction::Destroy);
    assert!(gone.is_none());
}

#[test]
fn invalid_config_never_reaches_generation() {
    let provider = provider();
    let config = StringInputs::new(2)
        .with_min(CharClass::Lower, 2)
        .with_min(CharClass::Upper, 2);
    let err = converge(provider.string(), Some(&config), None, &mut FailingSource).unwrap_err();
    assert!(err.is_user_error());
    assert!(matches!(err, StrandError::Plan(_)));
}

#[test]
fn source_failure_surfaces() {
    let provider = provider();
    let err = converge(
        provider.string(),
        Some(&StringInputs::new(4)),
        None,
        &mut FailingSource,
    )
    .unwrap_err();
    assert!(matches!(err, StrandError::Generation(_)));
    assert!(!err.is_user_error());
}

#[test]
fn integer_and_shuffle_lifecycle() {
    let provider = provider();

    let config = IntegerInputs::new(1, 6);
    let (_, die) = converge(provider.integer(), Some(&config), None, &mut seeded(4)).unwrap();
    let die = die.unwrap();
    assert!((1..=6).contains(&die.result));
    let (action, again) =
        converge(provider.integer(), Some(&config), Some(&die), &mut FailingSource).unwrap();
    assert_eq!(action, PlanAction::Update);
    assert_eq!(again.unwrap().result, die.result);

    let config = ShuffleInputs::new(["us-east-1a", "us-east-1b", "us-east-1c"]).with_result_count(2);
    let (_, zones) = converge(provider.shuffle(), Some(&config), None, &mut seeded(4)).unwrap();
    let zones = zones.unwrap();
    assert_eq!(zones.result.len(), 2);
    assert_ne!(zones.result[0], zones.result[1]);
}

#[test]
fn imported_string_then_planned_without_change() {
    let provider = provider();
    let state = provider.string().import("existing-value").unwrap();
    let config = StringInputs::new(14);
    let (action, kept) =
        converge(provider.string(), Some(&config), Some(&state), &mut FailingSource).unwrap();
    assert_eq!(action, PlanAction::Update);
    assert_eq!(kept.unwrap().result, "existing-value");
}

fn class_config() -> impl Strategy<Value = StringInputs> {
    (1i64..40, 0i64..4, 0i64..4, any::<bool>(), any::<bool>()).prop_map(
        |(length, min_upper, min_special, lower, numeric)| {
            StringInputs::new(length + min_upper + min_special)
                .with_min(CharClass::Upper, min_upper)
                .with_min(CharClass::Special, min_special)
                .with_class(CharClass::Lower, lower)
                .with_class(CharClass::Numeric, numeric)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unchanged_config_never_regenerates(config in class_config(), seed in any::<u64>()) {
        let provider = provider();
        let (_, state) =
            converge(provider.string(), Some(&config), None, &mut seeded(seed)).unwrap();
        let state = state.unwrap();

        let mut source = counting(seed.wrapping_add(1));
        let (action, next) =
            converge(provider.string(), Some(&config), Some(&state), &mut source).unwrap();
        prop_assert_eq!(action, PlanAction::Update);
        prop_assert_eq!(next.unwrap(), state);
        prop_assert_eq!(source.bytes_drawn(), 0);
    }
}
