use chrono::{NaiveDate, NaiveDateTime};

#[inline]
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let first = b[0];
        let last = b[b.len() - 1];
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Splits one delimited row into trimmed, unquoted fields.
///
/// A field wrapped in single or double quotes may contain the delimiter;
/// the quotes themselves are not part of the returned value. A trailing
/// delimiter yields a final empty field.
pub fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes: Option<char> = None;

    for ch in line.chars() {
        match in_quotes {
            Some(q) => {
                if ch == q {
                    in_quotes = None;
                }
                cur.push(ch);
            }
            None => {
                if ch == '"' || ch == '\'' {
                    in_quotes = Some(ch);
                    cur.push(ch);
                } else if ch == delimiter {
                    out.push(strip_surrounding_quotes(cur.trim()).to_string());
                    cur.clear();
                } else {
                    cur.push(ch);
                }
            }
        }
    }
    out.push(strip_surrounding_quotes(cur.trim()).to_string());
    out
}

/// Timestamp layouts accepted in CSV data, tried in order.
///
/// Covers ISO-ish datetimes (with optional fractional seconds and `T`
/// separator) and the `%m/%d/%y %H:%M` layout of the historical hourly
/// datasets.
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
];

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    // Date-only rows land on midnight.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_works() {
        assert_eq!(strip_surrounding_quotes("'a,b'"), "a,b");
        assert_eq!(strip_surrounding_quotes(r#""x""#), "x");
        assert_eq!(strip_surrounding_quotes("nq"), "nq");
    }

    #[test]
    fn split_unquotes_and_trims() {
        let line = r#"2010-07-02 00:00:00, 21.2 ,"0.02",'a,b'"#;
        let p = split_row(line, ',');
        assert_eq!(p, vec!["2010-07-02 00:00:00", "21.2", "0.02", "a,b"]);
    }

    #[test]
    fn split_keeps_trailing_empty_field() {
        let p = split_row("1,2,", ',');
        assert_eq!(p, vec!["1", "2", ""]);
    }

    #[test]
    fn parses_iso_datetimes() {
        let ts = parse_timestamp("2010-07-02 07:15:00").unwrap();
        assert_eq!(ts.to_string(), "2010-07-02 07:15:00");

        let ts = parse_timestamp("2010-07-02T07:15:00.250").unwrap();
        assert_eq!(ts.date().to_string(), "2010-07-02");
    }

    #[test]
    fn parses_hourly_dataset_layout() {
        let ts = parse_timestamp("7/2/10 7:15").unwrap();
        assert_eq!(ts.to_string(), "2010-07-02 07:15:00");
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let ts = parse_timestamp("2010-07-02").unwrap();
        assert_eq!(ts.to_string(), "2010-07-02 00:00:00");
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_timestamp("not a time").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
