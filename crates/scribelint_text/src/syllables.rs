//! Deterministic syllable counting.
//!
//! Counts vowel groups with a silent-`e` adjustment and a small exception
//! list for words the heuristic is known to miss.

/// Words the vowel-group heuristic miscounts, with their true counts.
const EXCEPTIONS: &[(&str, usize)] = &[
    ("being", 2),
    ("business", 2),
    ("create", 2),
    ("doing", 2),
    ("going", 2),
    ("people", 2),
    ("quiet", 2),
    ("react", 2),
    ("science", 2),
    ("seeing", 2),
];

const VOWELS: &str = "aeiouy";

/// Counts the syllables in a single word.
///
/// Non-alphabetic characters are ignored; the result is always at least 1
/// for any word containing a letter, and 0 otherwise.
pub fn count(word: &str) -> usize {
    let lower: String = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();

    if lower.is_empty() {
        return 0;
    }

    if let Ok(idx) = EXCEPTIONS.binary_search_by_key(&lower.as_str(), |&(w, _)| w) {
        return EXCEPTIONS[idx].1;
    }

    let chars: Vec<char> = lower.chars().collect();
    let mut groups = 0;
    let mut prev_vowel = false;
    for &c in &chars {
        let is_vowel = VOWELS.contains(c);
        if is_vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = is_vowel;
    }

    // Silent trailing 'e' ("make"), except the consonant-le ending
    // ("table").
    let n = chars.len();
    if n >= 2 && chars[n - 1] == 'e' && !VOWELS.contains(chars[n - 2]) {
        let is_consonant_le = n >= 3 && chars[n - 1] == 'e' && chars[n - 2] == 'l'
            && !VOWELS.contains(chars[n - 3]);
        if !is_consonant_le && groups > 1 {
            groups -= 1;
        }
    }

    groups.max(1)
}
