pub(crate) fn uppercase_first_letter(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

pub(crate) fn join_with_spaces<I>(mut iter: I) -> String
where
    I: Iterator + Clone,
    I::Item: AsRef<str>,
{
    let length: usize = iter
        .clone()
        .map(|item| item.as_ref().len() + 1)
        .sum::<usize>()
        .saturating_sub(1);
    let mut string = String::with_capacity(length);

    match iter.next() {
        Some(item) => string.push_str(item.as_ref()),
        None => return string,
    };

    for item in iter {
        string.push(' ');
        string.push_str(item.as_ref());
    }
    string
}

/// Letter casing of a token, as far as case restoration is concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CasePattern {
    Upper,
    Lower,
    Capitalized,
    Mixed,
}

impl CasePattern {
    pub fn of(token: &str) -> Self {
        let mut letters = token.chars().filter(|c| c.is_alphabetic());
        let first = match letters.next() {
            Some(c) => c,
            None => return CasePattern::Mixed,
        };
        let rest: Vec<char> = letters.collect();

        if first.is_uppercase() && rest.iter().all(|c| c.is_uppercase()) {
            CasePattern::Upper
        } else if first.is_lowercase() && rest.iter().all(|c| c.is_lowercase()) {
            CasePattern::Lower
        } else if first.is_uppercase() && rest.iter().all(|c| c.is_lowercase()) {
            CasePattern::Capitalized
        } else {
            CasePattern::Mixed
        }
    }

    /// Rewrite `s` to follow this pattern. Capitalization is applied to every
    /// space separated word so that split corrections read naturally.
    pub fn apply(self, s: &str) -> String {
        match self {
            CasePattern::Upper => s.to_uppercase(),
            CasePattern::Lower => s.to_lowercase(),
            CasePattern::Capitalized => join_with_spaces(
                s.split(' ')
                    .map(|word| uppercase_first_letter(&word.to_lowercase())),
            ),
            CasePattern::Mixed => s.to_owned(),
        }
    }
}
