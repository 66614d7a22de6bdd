#[cfg(test)]
mod tests {
    use crate::config::RuntimeConfig;
    use crate::drange::{Ending, RangeList, RangeSpec};
    use crate::ftype::time::parse_nsecs;
    use crate::ftype::{CmpOp, NsTime, TypeDescriptor, Value, ValueKind};
    use proptest::prelude::*;

    // Strategy for a fully initialized RangeSpec with small offsets
    fn arb_range_spec() -> impl Strategy<Value = RangeSpec> {
        prop_oneof![
            (-1000i32..1000, 0i32..1000).prop_map(|(s, l)| RangeSpec::with_length(s, l)),
            (-1000i32..1000, 0i32..1000).prop_map(|(s, d)| RangeSpec::with_end_offset(s, s + d)),
            (-1000i32..1000).prop_map(RangeSpec::to_the_end),
        ]
    }

    // Each spec paired with whether it goes on the front or the back
    fn arb_inserts() -> impl Strategy<Value = Vec<(bool, RangeSpec)>> {
        prop::collection::vec((any::<bool>(), arb_range_spec()), 0..20)
    }

    fn arb_time() -> impl Strategy<Value = NsTime> {
        (-1_000_000i64..1_000_000, 0i32..1_000_000_000).prop_map(|(secs, nsecs)| {
            // relative times carry the sign on both parts
            if secs < 0 {
                NsTime::new(secs, -nsecs)
            } else {
                NsTime::new(secs, nsecs)
            }
        })
    }

    proptest! {
        #[test]
        fn nsecs_scale_by_digit_count(digits in "[0-9]{1,9}") {
            let expected = digits.parse::<i32>().unwrap() * 10_i32.pow(9 - digits.len() as u32);
            prop_assert_eq!(parse_nsecs(&digits), Some(expected));
        }

        #[test]
        fn overlong_fractions_are_rejected(digits in "[0-9]{10,14}") {
            let d = TypeDescriptor::new(ValueKind::RelativeTime);
            let text = format!("1.{digits}");
            prop_assert!(d.from_text(&text, &RuntimeConfig::default()).is_err());
        }

        #[test]
        fn relative_time_text_round_trips(t in arb_time()) {
            let d = TypeDescriptor::new(ValueKind::RelativeTime);
            let text = Value::RelativeTime(t).to_string();
            prop_assert_eq!(
                d.from_text(&text, &RuntimeConfig::default()),
                Ok(Value::RelativeTime(t))
            );
        }

        #[test]
        fn time_order_is_seconds_then_nanoseconds(
            s1 in -5i64..5, n1 in 0i32..1_000_000_000,
            s2 in -5i64..5, n2 in 0i32..1_000_000_000,
        ) {
            let d = TypeDescriptor::new(ValueKind::AbsoluteTime);
            let a = Value::AbsoluteTime(NsTime::new(s1, n1));
            let b = Value::AbsoluteTime(NsTime::new(s2, n2));
            let expected = s1.cmp(&s2).then(n1.cmp(&n2));
            prop_assert_eq!(d.ordering(&a, &b), Ok(Some(expected)));
            prop_assert_eq!(d.compare(CmpOp::Lt, &a, &b), Ok(expected.is_lt()));
        }

        #[test]
        fn integers_round_trip(n in any::<u32>()) {
            let d = TypeDescriptor::new(ValueKind::Integer);
            let config = RuntimeConfig::default();
            prop_assert_eq!(d.from_text(&n.to_string(), &config).map(|v| v.integer()), Ok(Some(n)));
            prop_assert_eq!(
                d.from_text(&format!("{n:#x}"), &config).map(|v| v.integer()),
                Ok(Some(n))
            );
        }

        #[test]
        fn integers_reject_trailing_garbage(n in any::<u32>(), junk in "[g-z ]{1,3}") {
            let d = TypeDescriptor::new(ValueKind::Integer);
            let text = format!("{n}{junk}");
            prop_assert!(d.from_text(&text, &RuntimeConfig::default()).is_err());
        }

        #[test]
        fn doubles_reject_trailing_garbage(x in -1.0e300f64..1.0e300, junk in "[g-z ]{1,3}") {
            let d = TypeDescriptor::new(ValueKind::Double);
            let text = format!("{x}{junk}");
            prop_assert!(d.from_text(&text, &RuntimeConfig::default()).is_err());
        }

        #[test]
        fn relative_times_reject_trailing_garbage(t in arb_time(), junk in "[a-z ]{1,3}") {
            let d = TypeDescriptor::new(ValueKind::RelativeTime);
            let text = format!("{}{junk}", Value::RelativeTime(t));
            prop_assert!(d.from_text(&text, &RuntimeConfig::default()).is_err());
        }

        #[test]
        fn doubles_round_trip(x in -1.0e300f64..1.0e300) {
            let d = TypeDescriptor::new(ValueKind::Double);
            prop_assert_eq!(
                d.from_text(&x.to_string(), &RuntimeConfig::default()),
                Ok(Value::Double(x))
            );
        }

        #[test]
        fn range_list_aggregates_hold(inserts in arb_inserts()) {
            let mut list = RangeList::new();
            for (front, spec) in &inserts {
                if *front {
                    list.prepend(*spec);
                } else {
                    list.append(*spec);
                }
            }

            let specs: Vec<RangeSpec> = inserts.iter().map(|(_, s)| *s).collect();
            prop_assert_eq!(list.len(), specs.len());
            prop_assert_eq!(
                list.has_total_length(),
                !specs.iter().any(|s| s.ending() == Ending::ToEnd)
            );
            if list.has_total_length() {
                let total: i32 = specs.iter().filter_map(RangeSpec::span_len).sum();
                prop_assert_eq!(list.total_length(), total);
            }
            let min = specs.iter().map(RangeSpec::start_offset).min().unwrap_or(i32::MAX);
            let max = specs.iter().map(RangeSpec::start_offset).max().unwrap_or(i32::MIN);
            prop_assert_eq!(list.min_start_offset(), min);
            prop_assert_eq!(list.max_start_offset(), max);

            // builder order matches sequential appends
            let built = RangeList::from_specs(specs.iter().copied());
            prop_assert_eq!(built.has_total_length(), list.has_total_length());
            prop_assert_eq!(built.total_length(), list.total_length());
            prop_assert_eq!(built.min_start_offset(), list.min_start_offset());
        }
    }
}
