//! ISO 8601 duration conversion used by codecs for `Duration` fields.
//! Supports the calendar-free subset that survives a round trip through
//! `time::Duration`: weeks, days, hours, minutes and (fractional) seconds.

use time::Duration;

/// Parses an ISO 8601 duration string such as `P3DT4H30M12.5S` or `PT0S`.
/// Years and months are rejected: they have no fixed length in seconds.
pub fn parse_iso8601_duration(raw: &str) -> Option<Duration> {
    let rest = raw.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) if !time.is_empty() => (date, Some(time)),
        Some(_) => return None,
        None => (rest, None),
    };

    let mut total = Duration::ZERO;
    let mut number = String::new();
    for ch in date_part.chars() {
        match ch {
            '0'..='9' => number.push(ch),
            'W' => total += Duration::weeks(take_int(&mut number)?),
            'D' => total += Duration::days(take_int(&mut number)?),
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }

    if let Some(time_part) = time_part {
        for ch in time_part.chars() {
            match ch {
                '0'..='9' | '.' => number.push(ch),
                'H' => total += Duration::hours(take_int(&mut number)?),
                'M' => total += Duration::minutes(take_int(&mut number)?),
                'S' => total += Duration::seconds_f64(take_float(&mut number)?),
                _ => return None,
            }
        }
        if !number.is_empty() {
            return None;
        }
    }

    Some(total)
}

/// Formats a duration as ISO 8601. Negative durations are not representable
/// and return `None`; zero formats as `PT0S`.
pub fn format_iso8601_duration(value: Duration) -> Option<String> {
    if value.is_negative() {
        return None;
    }
    if value.is_zero() {
        return Some("PT0S".to_string());
    }

    let mut seconds = value.whole_seconds();
    let nanos = value.subsec_nanoseconds();
    let days = seconds / 86_400;
    seconds %= 86_400;
    let hours = seconds / 3_600;
    seconds %= 3_600;
    let minutes = seconds / 60;
    seconds %= 60;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if nanos > 0 {
            let fractional = seconds as f64 + f64::from(nanos) / 1e9;
            out.push_str(&format!("{fractional}S"));
        } else if seconds > 0 {
            out.push_str(&format!("{seconds}S"));
        }
    }
    Some(out)
}

fn take_int(buffer: &mut String) -> Option<i64> {
    let value = buffer.parse().ok();
    buffer.clear();
    value
}

fn take_float(buffer: &mut String) -> Option<f64> {
    let value = buffer.parse().ok();
    buffer.clear();
    value
}
