//! Text grammar for scalar values shared by the XML codec and lax coercion.

use chrono::NaiveDateTime;

use crate::plist::{Date, Integer};

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a decimal integer with optional sign, or a `0x` hexadecimal literal.
pub fn parse_integer(text: &str) -> Option<Integer> {
	let text = text.trim();
	if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		return u64::from_str_radix(hex, 16).ok().map(Integer::from_u64);
	}
	if text.starts_with('-') {
		return text.parse::<i64>().ok().map(Integer::from_i64);
	}
	let unsigned = text.strip_prefix('+').unwrap_or(text);
	if unsigned.starts_with(['+', '-']) {
		return None;
	}
	unsigned.parse::<u64>().ok().map(Integer::from_u64)
}

/// Parse a decimal or exponential real; accepts `nan`, `inf`, and `infinity` with optional sign.
pub fn parse_real(text: &str) -> Option<f64> {
	text.trim().parse::<f64>().ok()
}

/// Parse a boolean literal: `true`/`false` (any case) or `1`/`0`.
pub fn parse_bool(text: &str) -> Option<bool> {
	let text = text.trim();
	if text == "1" || text.eq_ignore_ascii_case("true") {
		Some(true)
	} else if text == "0" || text.eq_ignore_ascii_case("false") {
		Some(false)
	} else {
		None
	}
}

/// Parse an ISO-8601 `YYYY-MM-DDTHH:MM:SSZ` timestamp.
pub fn parse_date(text: &str) -> Option<Date> {
	let naive = NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT).ok()?;
	Some(Date::from_datetime(naive.and_utc()))
}

/// Render a date as `YYYY-MM-DDTHH:MM:SSZ`, truncating sub-second precision.
pub fn format_date(date: Date) -> Option<String> {
	let whole = Date(date.seconds().floor());
	Some(whole.to_datetime()?.format(DATE_FORMAT).to_string())
}

/// Render a real with the shortest text that parses back to the same value.
pub fn format_real(value: f64) -> String {
	if value.is_nan() {
		"nan".to_owned()
	} else if value.is_infinite() {
		if value > 0.0 { "+infinity".to_owned() } else { "-infinity".to_owned() }
	} else {
		format!("{value:?}")
	}
}

#[cfg(test)]
mod tests;
