use std::cmp::Ordering;

/// Remove ANSI escape sequences.
pub fn strip_ansi(text: &str) -> String {
    let clean = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&clean).into_owned()
}

/// On-screen columns of a rendered string: code points left after stripping
/// escape sequences.
pub fn visible_length(text: &str) -> usize {
    strip_ansi(text).chars().count()
}

const BYTE_SUFFIXES: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// `1536` -> `"1.5KiB"`, rounded to two decimals.
pub fn human_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut i = 0;
    while value >= 1024.0 && i < BYTE_SUFFIXES.len() - 1 {
        value /= 1024.0;
        i += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}{}", trim_float(rounded), BYTE_SUFFIXES[i])
}

/// `0.423` -> `"42%"`
pub fn percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').to_string()
    }
}

/// Compare so that embedded numbers sort by value: `"2" < "10"`, `"ws9" < "ws10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_number(&mut a_chars);
                let right = take_number(&mut b_chars);
                let ord = compare_digits(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

pub fn natural_sort(items: &mut [String]) {
    items.sort_by(|a, b| natural_cmp(a, b));
}

fn take_number<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
