use chrono::{NaiveDate, NaiveTime};

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Day-first parse of a filing date.
///
/// Accepts `DD/MM/YYYY`, `DD-MM-YYYY`, `DD.MM.YYYY` (two-digit years pivot at 69),
/// ISO `YYYY-MM-DD`, each optionally followed by a time. When the day-first reading is
/// not a valid date but the month-first one is (`12/25/2023`), the latter is used.
pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (date_part, time_part) = match s.find([' ', 'T']) {
        Some(idx) => (&s[..idx], Some(s[idx + 1..].trim())),
        None => (s, None),
    };
    if let Some(t) = time_part {
        if !t.is_empty() && !TIME_FORMATS.iter().any(|f| NaiveTime::parse_from_str(t, f).is_ok())
        {
            return None;
        }
    }

    let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    if parts[0].len() == 4 {
        let year = parts[0].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, parts[1].parse().ok()?, parts[2].parse().ok()?);
    }

    let year = match parts[2].len() {
        4 => parts[2].parse::<i32>().ok()?,
        2 => {
            let yy: i32 = parts[2].parse().ok()?;
            if yy < 69 {
                2000 + yy
            } else {
                1900 + yy
            }
        }
        _ => return None,
    };
    let first: u32 = parts[0].parse().ok()?;
    let second: u32 = parts[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, second, first).or_else(|| NaiveDate::from_ymd_opt(year, first, second))
}
