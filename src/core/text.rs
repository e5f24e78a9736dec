//! Text normalization and string similarity shared by the taxonomy and the
//! classifier.

/// Lowercase, turn every non-alphanumeric character into a space and collapse
/// runs of whitespace. `"Chest-Pain,  FEVER!"` becomes `"chest pain fever"`.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when `phrase` occurs in `haystack` on token boundaries. Both sides must
/// already be normalized.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let padded_haystack = format!(" {} ", haystack);
    let padded_phrase = format!(" {} ", phrase);
    padded_haystack.contains(&padded_phrase)
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// `1 - distance / longer_length`, in `0.0..=1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Shape of free text for logs, without any of its words: `"<12 chars, 2 tokens>"`.
pub fn redacted(text: &str) -> String {
    format!(
        "<{} chars, {} tokens>",
        text.chars().count(),
        text.split_whitespace().count()
    )
}
