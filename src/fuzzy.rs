//! Hand-rolled "partial token sort ratio" fuzzy matcher, deliberately not
//! pulled in from a `strsim`-style crate: tokenize-sort-then-best-aligned-
//! substring-distance is a small enough algorithm to own outright.
//!
//! Three layers, each a pure function of its inputs so the scoring stays
//! deterministic and independently testable, mirroring the same "scoring as
//! pure functions" discipline used in `schema.rs`:
//!   1. `levenshtein` - classic edit distance.
//!   2. `ratio` - edit distance normalized into a 0..=100 similarity score.
//!   3. `partial_ratio` - slides the shorter string over the longer one and
//!      keeps the best-aligned window's ratio (handles "query is a substring
//!      of a longer product name").
//!   4. `partial_token_sort_ratio` - tokenizes both strings by whitespace,
//!      sorts the tokens, and runs `partial_ratio` on the normalized forms,
//!      so word order in the product name doesn't matter.

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let (la, lb) = (a.len(), b.len());
    if la == 0 {
        return lb;
    }
    if lb == 0 {
        return la;
    }

    let mut prev: Vec<usize> = (0..=lb).collect();
    let mut curr = vec![0usize; lb + 1];

    for i in 1..=la {
        curr[0] = i;
        for j in 1..=lb {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[lb]
}

/// Normalized edit-distance similarity in 0..=100; 100 means identical.
pub fn ratio(a: &str, b: &str) -> u8 {
    let ca: Vec<char> = a.chars().collect();
    let cb: Vec<char> = b.chars().collect();
    let max_len = ca.len().max(cb.len());
    if max_len == 0 {
        return 100;
    }
    let dist = levenshtein(&ca, &cb);
    let score = 100.0 - (dist as f64 * 100.0 / max_len as f64);
    score.round().clamp(0.0, 100.0) as u8
}

/// Best-aligned-substring ratio: slides the shorter string as a window over
/// the longer one and keeps the highest `ratio` found at any alignment.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_chars: Vec<char> = short.chars().collect();
    let long_chars: Vec<char> = long.chars().collect();

    if short_chars.is_empty() {
        return if long_chars.is_empty() { 100 } else { 0 };
    }
    if long_chars.len() <= short_chars.len() {
        return ratio(short, long);
    }

    let mut best = 0u8;
    for start in 0..=(long_chars.len() - short_chars.len()) {
        let window: String = long_chars[start..start + short_chars.len()].iter().collect();
        best = best.max(ratio(short, &window));
    }
    best
}

fn tokenize_sort(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ").to_lowercase()
}

/// Tokenizes both strings by whitespace, sorts the tokens, and scores the
/// best-aligned substring match between the normalized forms. Returns
/// 0..=100, where 100 is reserved by the caller for exact substring hits
/// (this function can still return 100 for a true match; the caller is
/// responsible for deduplicating against Phase 1 substring hits).
pub fn partial_token_sort_ratio(query: &str, candidate: &str) -> u8 {
    let q = tokenize_sort(query);
    let c = tokenize_sort(candidate);
    partial_ratio(&q, &c)
}

/// Ranks `candidates` against `query` by descending `partial_token_sort_ratio`
/// and returns the top `n` `(index, score)` pairs.
pub fn top_matches(query: &str, candidates: &[String], n: usize) -> Vec<(usize, u8)> {
    let mut scored: Vec<(usize, u8)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, partial_token_sort_ratio(query, c)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(n);
    scored
}
