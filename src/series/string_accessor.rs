//! String accessor for Series containing string data.
//!
//! Provides pandas-like string operations through the `.str()` accessor.
//! Every transform here is idempotent: applying it twice yields the same
//! result as applying it once.

use crate::series::Series;

/// String accessor for `Series<String>`
#[derive(Clone)]
pub struct StringAccessor<'a> {
    series: &'a Series<String>,
}

impl<'a> StringAccessor<'a> {
    /// Create a new StringAccessor
    pub fn new(series: &'a Series<String>) -> Self {
        StringAccessor { series }
    }

    fn map<F: Fn(&str) -> String>(&self, f: F) -> Series<String> {
        let values: Vec<String> = self.series.values().iter().map(|s| f(s)).collect();
        Series::new(values, self.series.name().cloned())
    }

    /// Remove leading and trailing whitespace from every value
    pub fn strip(&self) -> Series<String> {
        self.map(|s| s.trim().to_string())
    }

    /// Convert all strings to uppercase
    pub fn upper(&self) -> Series<String> {
        self.map(|s| s.to_uppercase())
    }

    /// Convert all strings to lowercase
    pub fn lower(&self) -> Series<String> {
        self.map(|s| s.to_lowercase())
    }

    /// Convert strings to title case: the first letter of each word is
    /// uppercased, the rest lowercased. Word boundaries are transitions
    /// from non-alphabetic to alphabetic characters.
    pub fn title(&self) -> Series<String> {
        self.map(title_case)
    }

    /// Strip then titlecase, the normalization applied to province names
    /// before grouping and plotting.
    pub fn normalize(&self) -> Series<String> {
        self.map(|s| title_case(s.trim()))
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(values: &[&str]) -> Series<String> {
        Series::new(values.iter().map(|v| v.to_string()).collect(), None)
    }

    #[test]
    fn test_title_case_words() {
        let series = s(&["eastern cape", "  GAUTENG", "kwaZulu-natal"]);
        let titled = series.str().title();
        assert_eq!(
            titled.values(),
            &["Eastern Cape", "  Gauteng", "Kwazulu-Natal"]
        );
    }

    #[test]
    fn test_normalize_strips_and_titles() {
        let series = s(&["  western cape  "]);
        assert_eq!(series.str().normalize().values(), &["Western Cape"]);
    }

    #[test]
    fn test_transforms_are_idempotent() {
        let series = s(&["  MiXeD Case  ", "x", ""]);
        let once = series.str().normalize();
        let twice = once.str().normalize();
        assert_eq!(once.values(), twice.values());

        let stripped_once = series.str().strip();
        let stripped_twice = stripped_once.str().strip();
        assert_eq!(stripped_once.values(), stripped_twice.values());
    }
}
