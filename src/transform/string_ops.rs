use std::borrow::Cow;

/// Trims leading/trailing whitespace while borrowing the original when unchanged.
pub fn trim(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim();
    if trimmed.len() == input.len() {
        Cow::Borrowed(input)
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Lowercases the value, then uppercases every letter that starts a run of letters.
///
/// `"pessoa FISICA"` becomes `"Pessoa Fisica"` and `"e-MAIL"` becomes `"E-Mail"`.
pub fn title_case(input: &str) -> Cow<'_, str> {
    let mut output = String::with_capacity(input.len());
    let mut previous_is_alpha = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_alpha {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            output.push(ch);
            previous_is_alpha = false;
        }
    }
    if output == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(output)
    }
}

/// Removes the first prefix from `prefixes` that the value starts with, checked in order.
pub fn strip_first_prefix<'a>(input: &'a str, prefixes: &[&str]) -> Cow<'a, str> {
    prefixes
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .map(Cow::Borrowed)
        .unwrap_or(Cow::Borrowed(input))
}

/// Drops every character contained in `remove`, avoiding allocation when none occur.
pub fn remove_chars<'a>(input: &'a str, remove: &[char]) -> Cow<'a, str> {
    if input.contains(remove) {
        Cow::Owned(input.chars().filter(|ch| !remove.contains(ch)).collect())
    } else {
        Cow::Borrowed(input)
    }
}
