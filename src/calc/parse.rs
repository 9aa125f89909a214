use crate::calc::date_math::days_in_month;
use crate::data::locale::Locale;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

pub type ParseResult<T> = Result<T, DateParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("'{0}' is not a number")]
    InvalidToken(String),
    #[error("missing value for format token '{0}'")]
    MissingComponent(String),
    #[error("{component} value {value} is out of range")]
    OutOfRange { component: &'static str, value: u32 },
    #[error("'{0}' is not a known day period")]
    UnknownMeridian(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridian {
    Am,
    Pm,
}

fn meridian(token: &str, locale: &Locale) -> Option<Meridian> {
    if token == locale.day_periods[0].to_uppercase() {
        Some(Meridian::Am)
    } else if token == locale.day_periods[1].to_uppercase() {
        Some(Meridian::Pm)
    } else {
        None
    }
}

/// Splits uppercased input into digit runs and word runs, dropping separators.
fn input_tokens(input: &str) -> Vec<String> {
    let upper = input.to_uppercase();
    let chars: Vec<char> = upper.chars().collect();
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        if chars[i].is_ascii_digit() {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        } else if is_word(chars[i]) {
            while i < chars.len() && is_word(chars[i]) {
                i += 1;
            }
        } else {
            i += 1;
            continue;
        }
        tokens.push(chars[start..i].iter().collect());
    }
    tokens
}

fn format_tokens(format: &str) -> Vec<&str> {
    format
        .split(|c: char| !matches!(c, 'M' | 'y' | 'd' | 'h' | 'H' | 'm' | 's' | 'S' | 'a'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parses user input against a numeric date/time pattern.
///
/// Returns `Ok(None)` for empty input. Two-digit years below 50 map to the
/// 2000s and 50..=99 to the 1900s. Missing seconds or milliseconds default
/// to zero; a trailing day period (`PM`) is matched against the locale.
pub fn parse_date(input: &str, format: &str, locale: &Locale) -> ParseResult<Option<NaiveDateTime>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let mut tokens = input_tokens(input);
    if tokens.is_empty() {
        return Err(DateParseError::InvalidToken(input.to_string()));
    }

    // Locales whose day period contains separators are matched on the last
    // space-delimited piece.
    if let Some(last_piece) = input.split(' ').rev().find(|p| !p.is_empty()) {
        let piece = last_piece.to_uppercase();
        if tokens.last() != Some(&piece) && meridian(&piece, locale).is_some() {
            tokens.push(piece);
        }
    }

    let last = tokens.len() - 1;
    for (i, token) in tokens.iter().enumerate() {
        if i == last && meridian(token, locale).is_some() {
            continue;
        }
        if token.parse::<u32>().is_err() {
            return Err(DateParseError::InvalidToken(token.clone()));
        }
    }

    let mut year = 1900;
    let mut month = 0;
    let mut day = 1;
    let mut hour = 0;
    let mut minute = 0;
    let mut second = 0;
    let mut millis = 0;

    for (i, f) in format_tokens(format).into_iter().enumerate() {
        let number = match tokens.get(i).and_then(|t| t.parse::<u32>().ok()) {
            Some(n) => n,
            None if f == "a" => 0,
            None if f.starts_with('s') || f.starts_with('S') => 0,
            None => return Err(DateParseError::MissingComponent(f.to_string())),
        };
        match f.chars().next() {
            Some('M') => month = number,
            Some('d') => day = number,
            Some('y') => {
                year = match number {
                    n if n < 50 => n as i32 + 2000,
                    n if n < 100 => n as i32 + 1900,
                    n => n as i32,
                }
            }
            Some('h') | Some('H') => hour = number,
            Some('m') => minute = number,
            Some('s') => second = number,
            Some('S') => millis = number,
            Some('a') => {
                let token = &tokens[last];
                if token.parse::<u32>().is_ok() {
                    continue;
                }
                match meridian(token, locale) {
                    Some(Meridian::Am) if hour == 12 => hour = 0,
                    Some(Meridian::Am) => {}
                    Some(Meridian::Pm) => hour = hour % 12 + 12,
                    None => return Err(DateParseError::UnknownMeridian(token.clone())),
                }
            }
            _ => {}
        }
    }

    if month == 0 || month > 12 {
        return Err(DateParseError::OutOfRange { component: "month", value: month });
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(DateParseError::OutOfRange { component: "day", value: day });
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateParseError::OutOfRange { component: "year", value: year.unsigned_abs() })?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis).ok_or(
        DateParseError::OutOfRange {
            component: "time",
            value: hour,
        },
    )?;
    Ok(Some(date.and_time(time)))
}

/// Formats a value with a date pattern. Supports numeric tokens, month and
/// weekday names (`MMM`, `MMMM`, `EEE`, `EEEE`), day periods and quoted
/// literals.
pub fn format_date(value: NaiveDateTime, format: &str, locale: &Locale) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            i += 1;
            if i < chars.len() && chars[i] == '\'' {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < chars.len() {
                if chars[i] == '\'' {
                    if i + 1 < chars.len() && chars[i + 1] == '\'' {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                out.push(chars[i]);
                i += 1;
            }
            continue;
        }
        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i] == c {
            i += 1;
        }
        out.push_str(&format_field(value, c, i - start, locale));
    }
    out
}

fn format_field(value: NaiveDateTime, symbol: char, width: usize, locale: &Locale) -> String {
    let pad = |n: u32, w: usize| format!("{:0w$}", n, w = w);
    match symbol {
        'y' => match width {
            2 => pad(value.year().rem_euclid(100) as u32, 2),
            1 => value.year().to_string(),
            w => format!("{:0w$}", value.year(), w = w),
        },
        'M' | 'L' => match width {
            1 | 2 => pad(value.month(), width),
            3 => locale.month_names_short[value.month0() as usize].to_string(),
            _ => locale.month_names[value.month0() as usize].to_string(),
        },
        'd' => pad(value.day(), width.min(2)),
        'E' => {
            let weekday = value.weekday().num_days_from_sunday() as usize;
            if width >= 4 {
                locale.day_names[weekday].to_string()
            } else {
                locale.day_names_short[weekday].to_string()
            }
        }
        'h' => {
            let h = value.hour() % 12;
            pad(if h == 0 { 12 } else { h }, width.min(2))
        }
        'H' => pad(value.hour(), width.min(2)),
        'm' => pad(value.minute(), width.min(2)),
        's' => pad(value.second(), width.min(2)),
        'S' => {
            let millis = format!("{:03}", value.nanosecond() / 1_000_000 % 1000);
            millis.chars().take(width.min(3)).collect()
        }
        'a' => {
            let index = if value.hour() < 12 { 0 } else { 1 };
            locale.day_periods[index].to_string()
        }
        other => std::iter::repeat_n(other, width).collect(),
    }
}

/// Resolves a named pattern (`shortDate`, `shortTime`, `mediumTime`, `short`,
/// `medium`) for the locale.
pub fn named_format(locale: &Locale, name: &str) -> Option<String> {
    match name {
        "shortDate" => Some(locale.short_date.to_string()),
        "shortTime" => Some(locale.short_time.to_string()),
        "mediumTime" => Some(locale.medium_time.to_string()),
        "short" | "medium" => {
            let time = if name == "short" { locale.short_time } else { locale.medium_time };
            Some(
                locale
                    .date_time
                    .replace("{0}", time)
                    .replace("{1}", locale.short_date),
            )
        }
        _ => None,
    }
}
