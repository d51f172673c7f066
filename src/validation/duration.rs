use chrono::Duration;

/// Parse an ISO-8601 duration string such as `PT1H` or `P1DT30M`.
///
/// Accepts `[-]P[nW][nD][T[nH][nM][n[.f]S]]` with at least one component.
/// A leading `-` negates the whole span; fractional values are only allowed
/// on the seconds component and are kept to millisecond precision. Calendar
/// components (months, years) are rejected since they have no fixed length.
/// Returns `None` when the input is not syntactically valid.
pub fn parse(input: &str) -> Option<Duration> {
    let mut s = input.trim();

    let negative = match s.strip_prefix('-') {
        Some(rest) => {
            s = rest;
            true
        }
        None => false,
    };

    s = s.strip_prefix('P').or_else(|| s.strip_prefix('p'))?;

    let mut total_ms: i64 = 0;
    let mut saw_component = false;
    let mut in_time = false;
    let mut number = String::new();

    for c in s.chars() {
        match c {
            'T' | 't' => {
                if in_time || !number.is_empty() {
                    return None;
                }
                in_time = true;
            }
            '0'..='9' => number.push(c),
            '.' | ',' => {
                if !in_time || number.contains('.') {
                    return None;
                }
                number.push('.');
            }
            _ => {
                let unit_ms: i64 = match (c.to_ascii_uppercase(), in_time) {
                    ('W', false) => 7 * 86_400_000,
                    ('D', false) => 86_400_000,
                    ('H', true) => 3_600_000,
                    ('M', true) => 60_000,
                    ('S', true) => 1_000,
                    _ => return None,
                };
                if number.is_empty() {
                    return None;
                }
                if number.contains('.') && c.to_ascii_uppercase() != 'S' {
                    return None;
                }
                let value: f64 = number.parse().ok()?;
                total_ms = total_ms.checked_add((value * unit_ms as f64).round() as i64)?;
                number.clear();
                saw_component = true;
            }
        }
    }

    // A trailing bare number ("PT1H30") or no components at all ("P", "PT")
    // make the string invalid.
    if !saw_component || !number.is_empty() {
        return None;
    }

    if negative {
        total_ms = -total_ms;
    }
    Some(Duration::milliseconds(total_ms))
}

/// Render a span in compact ISO-8601 form: `PT1H`, `PT30M`, `P1DT2H30M`.
///
/// Zero components are omitted; the zero span renders as `PT0S`.
pub fn format(duration: Duration) -> String {
    let mut millis = duration.num_milliseconds();
    if millis == 0 {
        return "PT0S".to_string();
    }

    let mut out = String::new();
    if millis < 0 {
        out.push('-');
        millis = -millis;
    }

    let days = millis / 86_400_000;
    let hours = millis / 3_600_000 % 24;
    let minutes = millis / 60_000 % 60;
    let seconds = millis / 1_000 % 60;
    let fraction = millis % 1_000;

    out.push('P');
    if days > 0 {
        out.push_str(&days.to_string());
        out.push('D');
    }
    if hours > 0 || minutes > 0 || seconds > 0 || fraction > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&hours.to_string());
            out.push('H');
        }
        if minutes > 0 {
            out.push_str(&minutes.to_string());
            out.push('M');
        }
        if fraction > 0 {
            let frac = format!("{:03}", fraction);
            out.push_str(&format!("{}.{}S", seconds, frac.trim_end_matches('0')));
        } else if seconds > 0 {
            out.push_str(&seconds.to_string());
            out.push('S');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_standard_forms() {
        assert_eq!(parse("PT1H"), Some(Duration::hours(1)));
        assert_eq!(parse("PT30M"), Some(Duration::minutes(30)));
        assert_eq!(parse("PT90S"), Some(Duration::seconds(90)));
        assert_eq!(parse("P1D"), Some(Duration::days(1)));
        assert_eq!(parse("P1W"), Some(Duration::weeks(1)));
        assert_eq!(
            parse("P1DT2H30M"),
            Some(Duration::days(1) + Duration::hours(2) + Duration::minutes(30))
        );
        assert_eq!(parse("PT0S"), Some(Duration::zero()));
        assert_eq!(parse("-PT1H"), Some(Duration::hours(-1)));
        assert_eq!(parse("PT0.5S"), Some(Duration::milliseconds(500)));
        assert_eq!(parse("pt1h"), Some(Duration::hours(1)));
        assert_eq!(parse(" PT1H "), Some(Duration::hours(1)));
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("P"), None);
        assert_eq!(parse("PT"), None);
        assert_eq!(parse("1H"), None);
        assert_eq!(parse("PT1"), None);
        assert_eq!(parse("PTH"), None);
        assert_eq!(parse("PT1H30"), None);
        assert_eq!(parse("PT1.5H"), None);
        assert_eq!(parse("P1M"), None); // calendar months have no fixed span
        assert_eq!(parse("one hour"), None);
        assert_eq!(parse("PT1H1H"), Some(Duration::hours(2))); // lenient on repeats
    }

    #[test]
    fn test_format_compact_rendering() {
        assert_eq!(format(Duration::hours(1)), "PT1H");
        assert_eq!(format(Duration::minutes(30)), "PT30M");
        assert_eq!(format(Duration::zero()), "PT0S");
        assert_eq!(format(Duration::seconds(86_400 + 3_661)), "P1DT1H1M1S");
        assert_eq!(format(Duration::hours(2) + Duration::minutes(30)), "PT2H30M");
        assert_eq!(format(Duration::milliseconds(500)), "PT0.5S");
        assert_eq!(format(Duration::days(2)), "P2D");
    }

    #[test]
    fn test_parse_format_round_trip() {
        for text in ["PT1H", "PT30M", "P1DT1H1M1S", "PT2H30M"] {
            let parsed = parse(text).unwrap();
            assert_eq!(format(parsed), text);
        }
    }
}
