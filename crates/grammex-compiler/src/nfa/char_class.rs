//! Character class arithmetic over Unicode scalar values.

use grammex_core::CharRange;

fn succ(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(c as u32 + 1),
    }
}

fn pred(c: char) -> Option<char> {
    match c {
        '\u{E000}' => Some('\u{D7FF}'),
        '\0' => None,
        _ => char::from_u32(c as u32 - 1),
    }
}

/// Sorted, non-overlapping, non-adjacent ranges. Inverted ranges match
/// nothing and are dropped.
pub fn normalize(ranges: &[CharRange]) -> Vec<CharRange> {
    let mut sorted: Vec<CharRange> = ranges.iter().copied().filter(CharRange::is_valid).collect();
    sorted.sort();

    let mut out: Vec<CharRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = out.last_mut()
            && (range.low <= last.high || succ(last.high) == Some(range.low))
        {
            last.high = last.high.max(range.high);
            continue;
        }
        out.push(range);
    }
    out
}

/// Every scalar value not in `ranges`.
pub fn negate(ranges: &[CharRange]) -> Vec<CharRange> {
    let mut out = Vec::new();
    let mut next = Some('\0');
    for range in normalize(ranges) {
        if let Some(low) = next
            && low < range.low
            && let Some(high) = pred(range.low)
        {
            out.push(CharRange::new(low, high));
        }
        next = succ(range.high);
    }
    if let Some(low) = next {
        out.push(CharRange::new(low, char::MAX));
    }
    out
}

/// Single-character case variants of `c`, `c` first.
pub fn case_variants(c: char) -> Vec<char> {
    let mut out = vec![c];
    for variant in [single(c.to_lowercase()), single(c.to_uppercase())]
        .into_iter()
        .flatten()
    {
        if !out.contains(&variant) {
            out.push(variant);
        }
    }
    out
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Last scalar value with a single-character case variant.
const LAST_CASED: u32 = 0x1E943;

/// `ranges` extended with the case variants of every member.
pub fn case_fold(ranges: &[CharRange]) -> Vec<CharRange> {
    let ranges = normalize(ranges);
    let mut out = ranges.clone();
    for range in &ranges {
        let low = range.low as u32;
        if low > LAST_CASED {
            break;
        }
        for code in low..=(range.high as u32).min(LAST_CASED) {
            let Some(c) = char::from_u32(code) else {
                continue;
            };
            if !c.is_lowercase() && !c.is_uppercase() && !c.is_alphabetic() {
                continue;
            }
            out.extend(case_variants(c).into_iter().skip(1).map(CharRange::single));
        }
    }
    normalize(&out)
}

/// Class of a character list: folded first, complemented last.
pub fn list_class(ranges: &[CharRange], negated: bool, ignore_case: bool) -> Vec<CharRange> {
    let class = if ignore_case { case_fold(ranges) } else { ranges.to_vec() };
    if negated { negate(&class) } else { class }
}

/// Ranges for one character, case variants included when `ignore_case`.
pub fn char_class(c: char, ignore_case: bool) -> Vec<CharRange> {
    if ignore_case {
        normalize(&case_variants(c).into_iter().map(CharRange::single).collect::<Vec<_>>())
    } else {
        vec![CharRange::single(c)]
    }
}

pub fn contains(ranges: &[CharRange], c: char) -> bool {
    ranges.iter().any(|r| r.contains(c))
}
