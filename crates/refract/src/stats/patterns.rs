//! Fixed-format token pattern detection for string columns.

use regex::Regex;

/// Fraction of values that must match a candidate for it to be reported.
const MATCH_THRESHOLD: f64 = 0.90;

/// Detect a common fixed-format pattern across sampled values, if one
/// exists. Returns the regex source string.
pub fn detect_pattern(values: &[&str]) -> Option<String> {
    if values.is_empty() {
        return None;
    }

    let candidates = generate_candidate_patterns(values);

    let mut best_pattern: Option<String> = None;
    let mut best_score = 0.0;

    for pattern_str in candidates {
        if let Ok(pattern) = Regex::new(&pattern_str) {
            let matches = values.iter().filter(|v| pattern.is_match(v)).count();
            let score = matches as f64 / values.len() as f64;

            if score > best_score && score >= MATCH_THRESHOLD {
                best_score = score;
                best_pattern = Some(pattern_str);
            }
        }
    }

    best_pattern
}

/// Generate candidate regex patterns from sampled values.
fn generate_candidate_patterns(values: &[&str]) -> Vec<String> {
    let mut patterns = Vec::new();

    let lengths: Vec<usize> = values.iter().map(|v| v.len()).collect();
    let all_same_length = lengths.iter().all(|&l| l == lengths[0]);

    let all_alphanumeric = values
        .iter()
        .all(|v| v.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-'));
    let all_numeric = values
        .iter()
        .all(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()));
    let all_alpha = values
        .iter()
        .all(|v| !v.is_empty() && v.chars().all(|c| c.is_alphabetic()));
    let all_uppercase = values
        .iter()
        .all(|v| v.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase()));

    if all_numeric {
        if all_same_length {
            patterns.push(format!(r"^\d{{{}}}$", lengths[0]));
        } else {
            let min_len = lengths.iter().min().copied().unwrap_or(1);
            let max_len = lengths.iter().max().copied().unwrap_or(20);
            patterns.push(format!(r"^\d{{{},{}}}$", min_len, max_len));
        }
    } else if all_alpha && all_uppercase && all_same_length {
        patterns.push(format!(r"^[A-Z]{{{}}}$", lengths[0]));
    } else if all_alphanumeric {
        if let Some(first) = values.first() {
            patterns.push(build_pattern_from_sample(first));
        }
    }

    patterns
}

/// Build a regex pattern from a single sample value by run-length encoding
/// its character classes.
fn build_pattern_from_sample(sample: &str) -> String {
    let mut pattern = String::from("^");
    let mut chars = sample.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            let mut count = 1;
            while chars.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                chars.next();
                count += 1;
            }
            if count > 1 {
                pattern.push_str(&format!(r"\d{{{}}}", count));
            } else {
                pattern.push_str(r"\d");
            }
        } else if c.is_alphabetic() {
            let mut count = 1;
            let is_upper = c.is_uppercase();
            while chars
                .peek()
                .map(|c| c.is_alphabetic() && c.is_uppercase() == is_upper)
                .unwrap_or(false)
            {
                chars.next();
                count += 1;
            }
            let char_class = if is_upper { "[A-Z]" } else { "[a-z]" };
            if count > 1 {
                pattern.push_str(&format!("{}{{{}}}", char_class, count));
            } else {
                pattern.push_str(char_class);
            }
        } else {
            if "[](){}.*+?^$\\|".contains(c) {
                pattern.push('\\');
            }
            pattern.push(c);
        }
    }

    pattern.push('$');
    pattern
}
