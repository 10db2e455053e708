//! Hangul initial-consonant (초성) matching, using the unicode syllable
//! block directly. "ㅅㅇ" matches "서울".

/// The 19 initial jamo, in unicode order.
const CHOSUNG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ',
    'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

const SYLLABLE_START: u32 = 0xAC00;
const SYLLABLE_END: u32 = 0xD7AF;
/// 21 medials × 28 finals per initial.
const PER_INITIAL: u32 = 588;

fn is_syllable(c: char) -> bool {
    (SYLLABLE_START..=SYLLABLE_END).contains(&(c as u32))
}

fn is_initial_jamo(c: char) -> bool {
    CHOSUNG.contains(&c)
}

/// The initial consonant of a composed syllable; other characters pass
/// through unchanged.
fn initial_of(c: char) -> char {
    if is_syllable(c) {
        CHOSUNG[((c as u32 - SYLLABLE_START) / PER_INITIAL) as usize]
    } else {
        c
    }
}

pub fn extract_initials(text: &str) -> String {
    text.chars().map(initial_of).collect()
}

/// Whether the query consists solely of initial jamo (whitespace ignored).
/// An all-whitespace query is not an initials query.
pub fn is_initials_query(query: &str) -> bool {
    let mut chars = query.chars().filter(|c| !c.is_whitespace()).peekable();
    chars.peek().is_some() && chars.all(is_initial_jamo)
}

/// Substring match on the initial-consonant projection of `text`, whitespace
/// stripped from both sides.
pub fn matches_initials(text: &str, query: &str) -> bool {
    let projected: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(initial_of)
        .collect();
    let needle: String = query.chars().filter(|c| !c.is_whitespace()).collect();
    projected.contains(&needle)
}
