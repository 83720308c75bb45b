//! Number formatting for read-back values
//!
//! Covers the format codes streamed workbooks actually use: `General`,
//! fixed decimals, thousands separators, percentages, scientific notation,
//! text (`@`) and date/time codes. Colors, conditions and fractions are
//! ignored.

use chrono::{Datelike, NaiveDateTime, Timelike};
use streamsheet_core::style::is_date_format_code;
use streamsheet_core::DateSystem;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Format the raw text of a numeric cell with `code`.
///
/// Text that does not parse as a number is returned unchanged.
pub fn format_raw(raw: &str, code: &str, date_system: DateSystem) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) => format_number(value, code, date_system),
        Err(_) => raw.to_string(),
    }
}

/// Format `value` with the number format `code`
///
/// # Examples
/// ```
/// use streamsheet_core::DateSystem;
/// use streamsheet_xlsx::reader::format_number;
///
/// assert_eq!(format_number(1234.5, "#,##0.00", DateSystem::Excel1900), "1,234.50");
/// assert_eq!(format_number(40127.0, "mm-dd-yy", DateSystem::Excel1900), "11-10-09");
/// ```
pub fn format_number(value: f64, code: &str, date_system: DateSystem) -> String {
    let sections = split_sections(code);
    let section = match sections.as_slice() {
        [] => "General",
        [only] => *only,
        [_, negative, ..] if value < 0.0 => {
            // An explicit negative section supplies its own sign
            return format_section(-value, negative, date_system);
        }
        [_, _, zero, ..] if value == 0.0 => *zero,
        [positive, ..] => *positive,
    };
    format_section(value, section, date_system)
}

fn format_section(value: f64, section: &str, date_system: DateSystem) -> String {
    if section.is_empty() || section.eq_ignore_ascii_case("general") {
        return format_general(value);
    }
    if section == "@" {
        return format_general(value);
    }
    if is_date_format_code(section) {
        return match date_system.from_serial(value) {
            Some(dt) => format_date(dt, section),
            None => format_general(value),
        };
    }
    format_decimal(value, section)
}

/// Split on `;` outside quotes, brackets and escapes
fn split_sections(code: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;
    for (i, c) in code.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if !in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            ';' if !in_quotes && !in_brackets => {
                sections.push(&code[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < code.len() || sections.is_empty() {
        sections.push(&code[start..]);
    }
    sections
}

fn format_general(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// One item of a number section: a literal run or a digit placeholder
#[derive(Debug, PartialEq)]
enum NumToken {
    Literal(String),
    Digit(char),
    Point,
    Comma,
    Percent,
    Exponent(String),
}

fn tokenize_number(section: &str) -> Vec<NumToken> {
    let mut tokens = Vec::new();
    let mut chars = section.chars().peekable();
    let mut literal = String::new();
    let flush = |literal: &mut String, tokens: &mut Vec<NumToken>| {
        if !literal.is_empty() {
            tokens.push(NumToken::Literal(std::mem::take(literal)));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '0' | '#' | '?' => {
                flush(&mut literal, &mut tokens);
                tokens.push(NumToken::Digit(c));
            }
            '.' => {
                flush(&mut literal, &mut tokens);
                tokens.push(NumToken::Point);
            }
            ',' => {
                flush(&mut literal, &mut tokens);
                tokens.push(NumToken::Comma);
            }
            '%' => {
                flush(&mut literal, &mut tokens);
                tokens.push(NumToken::Percent);
            }
            'E' | 'e' if matches!(chars.peek(), Some(&'+') | Some(&'-')) => {
                flush(&mut literal, &mut tokens);
                let mut exp = String::new();
                if let Some(sign) = chars.next() {
                    exp.push(sign);
                }
                while let Some(&d) = chars.peek() {
                    if d != '0' && d != '#' {
                        break;
                    }
                    exp.push(d);
                    chars.next();
                }
                tokens.push(NumToken::Exponent(exp));
            }
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                    literal.push(q);
                }
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    literal.push(next);
                }
            }
            '_' => {
                // `_x` reserves the width of x
                chars.next();
                literal.push(' ');
            }
            '*' => {
                chars.next();
            }
            '[' => {
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                }
            }
            _ => literal.push(c),
        }
    }
    flush(&mut literal, &mut tokens);
    tokens
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_decimal(value: f64, section: &str) -> String {
    let tokens = tokenize_number(section);

    let first = tokens.iter().position(|t| {
        matches!(t, NumToken::Digit(_) | NumToken::Point | NumToken::Exponent(_))
    });
    let last = tokens.iter().rposition(|t| {
        matches!(t, NumToken::Digit(_) | NumToken::Point | NumToken::Exponent(_))
    });
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        // No placeholders at all: the section is pure literal text
        _ => return render_literals(&tokens),
    };

    let mut value = value;
    if tokens.iter().any(|t| *t == NumToken::Percent) {
        value *= 100.0;
    }

    let body = &tokens[first..=last];
    let point = body.iter().position(|t| *t == NumToken::Point);
    let (int_part, frac_part) = match point {
        Some(p) => (&body[..p], &body[p + 1..]),
        None => (body, &body[body.len()..]),
    };
    let grouping = int_part.iter().any(|t| *t == NumToken::Comma);
    let min_int = int_part
        .iter()
        .filter(|t| matches!(t, NumToken::Digit('0')))
        .count();
    let required = frac_part
        .iter()
        .filter(|t| matches!(t, NumToken::Digit('0') | NumToken::Digit('?')))
        .count();
    let optional = frac_part
        .iter()
        .filter(|t| matches!(t, NumToken::Digit('#')))
        .count();
    let exponent = body.iter().find_map(|t| match t {
        NumToken::Exponent(e) => Some(e.as_str()),
        _ => None,
    });

    let negative = value < 0.0;
    let number = match exponent {
        Some(exp) => format_scientific(value.abs(), required + optional, exp),
        None => {
            let fixed = format!("{:.*}", required + optional, value.abs());
            let (int_digits, frac_digits) = match fixed.split_once('.') {
                Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
                None => (fixed, String::new()),
            };

            let mut frac_digits = frac_digits;
            while frac_digits.len() < required {
                frac_digits.push('0');
            }

            let int_digits = if int_digits == "0" && min_int == 0 {
                String::new()
            } else if int_digits.len() < min_int {
                format!("{:0>width$}", int_digits, width = min_int)
            } else {
                int_digits
            };
            let int_digits = if grouping {
                group_thousands(&int_digits)
            } else {
                int_digits
            };

            if point.is_some() && !frac_digits.is_empty() {
                format!("{}.{}", int_digits, frac_digits)
            } else if point.is_some() && required > 0 {
                format!("{}.", int_digits)
            } else {
                int_digits
            }
        }
    };

    let mut out = String::new();
    // Rounded to zero is not negative
    if negative && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&render_literals(&tokens[..first]));
    out.push_str(&number);
    out.push_str(&render_literals(&tokens[last + 1..]));
    out
}

fn format_scientific(value: f64, decimals: usize, exp_pattern: &str) -> String {
    let formatted = format!("{:.*e}", decimals, value);
    let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits = exp_pattern.len().saturating_sub(1).max(1);
    let sign = if exp < 0 {
        "-"
    } else if exp_pattern.starts_with('+') {
        "+"
    } else {
        ""
    };
    format!("{}E{}{:0>width$}", mantissa, sign, exp.abs(), width = digits)
}

fn render_literals(tokens: &[NumToken]) -> String {
    let mut out = String::new();
    for t in tokens {
        match t {
            NumToken::Literal(s) => out.push_str(s),
            NumToken::Percent => out.push('%'),
            NumToken::Comma => out.push(','),
            _ => {}
        }
    }
    out
}

/// One item of a date/time code
#[derive(Debug, Clone, PartialEq)]
enum DateToken {
    Year(usize),
    Month(usize),
    Day(usize),
    Hour(usize),
    Minute(usize),
    Second(usize),
    AmPm,
    AP,
    Literal(String),
}

fn tokenize_date(section: &str) -> Vec<DateToken> {
    let chars: Vec<char> = section.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let lower = c.to_ascii_lowercase();
        if starts_with_ignore_case(&chars[i..], "am/pm") {
            push_literal(&mut literal, &mut tokens);
            tokens.push(DateToken::AmPm);
            i += 5;
            continue;
        }
        if starts_with_ignore_case(&chars[i..], "a/p") {
            push_literal(&mut literal, &mut tokens);
            tokens.push(DateToken::AP);
            i += 3;
            continue;
        }

        match lower {
            'y' | 'm' | 'd' | 'h' | 's' => {
                push_literal(&mut literal, &mut tokens);
                let run = chars[i..]
                    .iter()
                    .take_while(|ch| ch.to_ascii_lowercase() == lower)
                    .count();
                tokens.push(match lower {
                    'y' => DateToken::Year(run),
                    'm' => DateToken::Month(run),
                    'd' => DateToken::Day(run),
                    'h' => DateToken::Hour(run),
                    _ => DateToken::Second(run),
                });
                i += run;
            }
            '"' => {
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    literal.push(chars[i]);
                    i += 1;
                }
                i += 1;
            }
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    literal.push(next);
                }
                i += 2;
            }
            '[' => {
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                i += 1;
            }
            '_' | '*' => i += 2,
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }
    push_literal(&mut literal, &mut tokens);

    resolve_minutes(&mut tokens);
    tokens
}

fn starts_with_ignore_case(chars: &[char], pattern: &str) -> bool {
    let mut rest = chars.iter();
    pattern
        .chars()
        .all(|p| rest.next().map_or(false, |c| c.eq_ignore_ascii_case(&p)))
}

fn push_literal(literal: &mut String, tokens: &mut Vec<DateToken>) {
    if !literal.is_empty() {
        tokens.push(DateToken::Literal(std::mem::take(literal)));
    }
}

/// `m`/`mm` right after an hour or right before a second means minutes
fn resolve_minutes(tokens: &mut [DateToken]) {
    let fields: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !matches!(t, DateToken::Literal(_)))
        .map(|(i, _)| i)
        .collect();

    for (pos, &i) in fields.iter().enumerate() {
        let run = match tokens[i] {
            DateToken::Month(run) if run <= 2 => run,
            _ => continue,
        };
        let after_hour = pos > 0 && matches!(tokens[fields[pos - 1]], DateToken::Hour(_));
        let before_second = fields
            .get(pos + 1)
            .map_or(false, |&j| matches!(tokens[j], DateToken::Second(_)));
        if after_hour || before_second {
            tokens[i] = DateToken::Minute(run);
        }
    }
}

fn format_date(dt: NaiveDateTime, section: &str) -> String {
    let tokens = tokenize_date(section);
    let twelve_hour = tokens
        .iter()
        .any(|t| matches!(t, DateToken::AmPm | DateToken::AP));

    let mut out = String::new();
    for token in &tokens {
        match token {
            DateToken::Year(n) if *n <= 2 => out.push_str(&format!("{:02}", dt.year() % 100)),
            DateToken::Year(_) => out.push_str(&format!("{:04}", dt.year())),
            DateToken::Month(1) => out.push_str(&dt.month().to_string()),
            DateToken::Month(2) => out.push_str(&format!("{:02}", dt.month())),
            DateToken::Month(n) => {
                let name = MONTH_NAMES[dt.month0() as usize];
                match n {
                    3 => out.push_str(&name[..3]),
                    4 => out.push_str(name),
                    _ => out.push_str(&name[..1]),
                }
            }
            DateToken::Day(1) => out.push_str(&dt.day().to_string()),
            DateToken::Day(2) => out.push_str(&format!("{:02}", dt.day())),
            DateToken::Day(n) => {
                let name = DAY_NAMES[dt.weekday().num_days_from_monday() as usize];
                if *n == 3 {
                    out.push_str(&name[..3]);
                } else {
                    out.push_str(name);
                }
            }
            DateToken::Hour(n) => {
                let hour = if twelve_hour {
                    match dt.hour() % 12 {
                        0 => 12,
                        h => h,
                    }
                } else {
                    dt.hour()
                };
                if *n >= 2 {
                    out.push_str(&format!("{:02}", hour));
                } else {
                    out.push_str(&hour.to_string());
                }
            }
            DateToken::Minute(n) => {
                if *n >= 2 {
                    out.push_str(&format!("{:02}", dt.minute()));
                } else {
                    out.push_str(&dt.minute().to_string());
                }
            }
            DateToken::Second(n) => {
                if *n >= 2 {
                    out.push_str(&format!("{:02}", dt.second()));
                } else {
                    out.push_str(&dt.second().to_string());
                }
            }
            DateToken::AmPm => out.push_str(if dt.hour() < 12 { "AM" } else { "PM" }),
            DateToken::AP => out.push(if dt.hour() < 12 { 'A' } else { 'P' }),
            DateToken::Literal(s) => out.push_str(s),
        }
    }
    out
}
