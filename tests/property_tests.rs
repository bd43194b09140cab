//! Property-based tests for log_dispatch using proptest

use log_dispatch::core::interpolate::interpolate;
use log_dispatch::prelude::*;
use proptest::prelude::*;

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Emergency),
        Just(Severity::Alert),
        Just(Severity::Critical),
        Just(Severity::Error),
        Just(Severity::Warning),
        Just(Severity::Notice),
        Just(Severity::Info),
        Just(Severity::Debug),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Names map onto ranks 0..=7 and back without loss
    #[test]
    fn test_rank_of_is_a_bijection(level in any_severity()) {
        let rank = Severity::rank_of(level.as_str()).unwrap();
        prop_assert!(rank <= 7);
        prop_assert_eq!(Severity::from_rank(rank), Some(level));
        prop_assert_eq!(level.as_str().parse::<Severity>().unwrap(), level);
    }

    /// Anything outside the eight names is rejected
    #[test]
    fn test_unknown_names_are_rejected(name in "[a-zA-Z]{0,12}") {
        let known = Severity::ALL.iter().any(|level| level.as_str() == name);
        prop_assert_eq!(Severity::is_valid_name(&name), known);
        prop_assert_eq!(Severity::rank_of(&name).is_ok(), known);
    }

    /// Ordering follows rank
    #[test]
    fn test_ordering_matches_rank(a in any_severity(), b in any_severity()) {
        prop_assert_eq!(a < b, a.rank() < b.rank());
        prop_assert_eq!(a == b, a.rank() == b.rank());
    }

    /// A single-level band accepts exactly that level
    #[test]
    fn test_single_level_band_is_reflexive(level in any_severity(), other in any_severity()) {
        let band = SeverityBand::only(level);
        prop_assert!(band.accepts(level));
        prop_assert_eq!(band.accepts(other), other == level);
    }

    /// Band acceptance is the closed rank interval
    #[test]
    fn test_band_is_closed_interval(
        minimum in any_severity(),
        maximum in any_severity(),
        level in any_severity(),
    ) {
        let band = SeverityBand::new(minimum, maximum);
        let expected = minimum.rank() >= level.rank() && level.rank() >= maximum.rank();
        prop_assert_eq!(band.accepts(level), expected);
    }
}

// ============================================================================
// Formatting Tests
// ============================================================================

proptest! {
    /// "{message}" with an empty context returns a scalar message unchanged
    #[test]
    fn test_scalar_message_round_trip(message in "[^\n]{0,64}", level in any_severity()) {
        let formatter = LineFormatter::new("{message}");
        let out = formatter.format(level, &Value::from(message.as_str()), &LogContext::new());
        prop_assert_eq!(out, message);
    }

    /// Integers render as their decimal text
    #[test]
    fn test_integer_message(n in any::<i64>()) {
        let formatter = LineFormatter::new("{message}");
        let out = formatter.format(Severity::Info, &Value::from(n), &LogContext::new());
        prop_assert_eq!(out, n.to_string());
    }

    /// Templates without braces pass through interpolation untouched
    #[test]
    fn test_interpolate_without_placeholders(template in "[^{}]{0,64}") {
        let out = interpolate(&template, |_| Some("x".into()));
        prop_assert_eq!(out, template);
    }

    /// Replacement text is never rescanned
    #[test]
    fn test_interpolate_single_pass(key in "[a-z]{1,8}", value in "\\{[a-z]{1,8}\\}") {
        let template = format!("<{{{}}}>", key);
        let out = interpolate(&template, |k| if k == key { Some(value.clone().into()) } else { Some("!".into()) });
        prop_assert_eq!(out, format!("<{}>", value));
    }

    /// Every level is delivered to a sink whose band accepts it, and no other
    #[test]
    fn test_dispatch_respects_band(
        minimum in any_severity(),
        maximum in any_severity(),
        level in any_severity(),
    ) {
        let band = SeverityBand::new(minimum, maximum);
        let logger = Logger::builder()
            .sink(EchoSink::with_writer(Vec::new()).with_name("echo").with_pattern("{level}").with_band(band))
            .build();

        logger.log(level.as_str(), "x", LogContext::new()).unwrap();
        let delivered = logger.last_line("echo").unwrap() == level.as_str();
        prop_assert_eq!(delivered, band.accepts(level));
    }
}
