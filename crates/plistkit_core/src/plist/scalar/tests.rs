use crate::plist::scalar::{format_date, format_real, parse_bool, parse_date, parse_integer, parse_real};
use crate::plist::{Date, Integer};

#[test]
fn integers_accept_sign_and_hex() {
	assert_eq!(parse_integer("42"), Some(Integer::from_i64(42)));
	assert_eq!(parse_integer(" -17 "), Some(Integer::from_i64(-17)));
	assert_eq!(parse_integer("+8"), Some(Integer::from_i64(8)));
	assert_eq!(parse_integer("0x1F"), Some(Integer::from_i64(31)));
	assert_eq!(parse_integer("18446744073709551615"), Some(Integer::from_u64(u64::MAX)));
}

#[test]
fn integers_reject_garbage() {
	assert_eq!(parse_integer(""), None);
	assert_eq!(parse_integer("1.5"), None);
	assert_eq!(parse_integer("+-1"), None);
	assert_eq!(parse_integer("-9223372036854775809"), None);
	assert_eq!(parse_integer("0xZZ"), None);
}

#[test]
fn reals_accept_exponents_and_specials() {
	assert_eq!(parse_real("1.5"), Some(1.5));
	assert_eq!(parse_real("-2.5e3"), Some(-2500.0));
	assert_eq!(parse_real("+infinity"), Some(f64::INFINITY));
	assert_eq!(parse_real("-INF"), Some(f64::NEG_INFINITY));
	assert!(parse_real("nan").is_some_and(f64::is_nan));
	assert_eq!(parse_real("one"), None);
}

#[test]
fn reals_format_round_trip() {
	for value in [0.0, 1.0, -0.25, 1e300, 3.141_592_653_589_793, 1e-7] {
		assert_eq!(parse_real(&format_real(value)), Some(value));
	}
	assert_eq!(format_real(f64::INFINITY), "+infinity");
	assert_eq!(format_real(f64::NEG_INFINITY), "-infinity");
	assert_eq!(format_real(f64::NAN), "nan");
}

#[test]
fn booleans_accept_digits_and_words() {
	assert_eq!(parse_bool("1"), Some(true));
	assert_eq!(parse_bool("0"), Some(false));
	assert_eq!(parse_bool("TRUE"), Some(true));
	assert_eq!(parse_bool("false"), Some(false));
	assert_eq!(parse_bool("yes"), None);
	assert_eq!(parse_bool("2"), None);
}

#[test]
fn dates_parse_and_format() {
	let date = parse_date("2013-11-27T00:34:00Z").expect("date parses");
	assert_eq!(date, Date(407_205_240.0));
	assert_eq!(format_date(date).as_deref(), Some("2013-11-27T00:34:00Z"));
	assert_eq!(format_date(Date(0.75)).as_deref(), Some("2001-01-01T00:00:00Z"));
	assert_eq!(format_date(Date(-0.5)).as_deref(), Some("2000-12-31T23:59:59Z"));
}

#[test]
fn dates_reject_other_layouts() {
	assert_eq!(parse_date("2013-11-27"), None);
	assert_eq!(parse_date("2013-11-27 00:34:00"), None);
	assert_eq!(parse_date("2013-13-01T00:00:00Z"), None);
}
