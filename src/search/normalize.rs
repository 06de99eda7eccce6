//! Text Normalization
//!
//! Produces the two comparison forms every search layer works with:
//! a lowercase, accent-free ASCII form and a lowercase form that keeps
//! Vietnamese diacritics.

use unicode_normalization::UnicodeNormalization;

/// Precomposed Vietnamese vowels (plus `đ`) kept by the diacritic-preserving form.
pub static VIETNAMESE_LETTERS: &[char] = &[
    'à', 'á', 'ạ', 'ả', 'ã', //
    'â', 'ầ', 'ấ', 'ậ', 'ẩ', 'ẫ', //
    'ă', 'ằ', 'ắ', 'ặ', 'ẳ', 'ẵ', //
    'è', 'é', 'ẹ', 'ẻ', 'ẽ', //
    'ê', 'ề', 'ế', 'ệ', 'ể', 'ễ', //
    'ì', 'í', 'ị', 'ỉ', 'ĩ', //
    'ò', 'ó', 'ọ', 'ỏ', 'õ', //
    'ô', 'ồ', 'ố', 'ộ', 'ổ', 'ỗ', //
    'ơ', 'ờ', 'ớ', 'ợ', 'ở', 'ỡ', //
    'ù', 'ú', 'ụ', 'ủ', 'ũ', //
    'ư', 'ừ', 'ứ', 'ự', 'ử', 'ữ', //
    'ỳ', 'ý', 'ỵ', 'ỷ', 'ỹ', //
    'đ',
];

/// Both comparison forms of a single source string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Lowercase, diacritics removed, ASCII letters/digits/whitespace only.
    pub normalized: String,
    /// Lowercase with collapsed whitespace, diacritics retained.
    pub with_diacritics: String,
}

impl NormalizedText {
    /// Space-separated tokens of the accent-free form, empty tokens dropped.
    pub fn normalized_words(&self) -> Vec<&str> {
        split_words(&self.normalized)
    }

    /// Space-separated tokens of the diacritic form, empty tokens dropped.
    pub fn diacritic_words(&self) -> Vec<&str> {
        split_words(&self.with_diacritics)
    }
}

/// Normalizes `input` into both comparison forms.
///
/// A missing value is treated as the empty string.
pub fn normalize_text(input: Option<&str>) -> NormalizedText {
    let with_diacritics = collapse_whitespace(&input.unwrap_or_default().to_lowercase());
    let normalized = strip_diacritics(&with_diacritics);

    NormalizedText {
        normalized,
        with_diacritics,
    }
}

/// Same as [`normalize_text`], but the diacritic form is further restricted to
/// ASCII alphanumerics, whitespace and [`VIETNAMESE_LETTERS`].
///
/// This is the form the search engine compares on.
pub fn normalize_for_search(input: Option<&str>) -> NormalizedText {
    let NormalizedText {
        normalized,
        with_diacritics,
    } = normalize_text(input);

    let with_diacritics = with_diacritics
        .nfc()
        .filter(|c| is_plain(*c) || VIETNAMESE_LETTERS.contains(c))
        .collect();

    NormalizedText {
        normalized,
        with_diacritics,
    }
}

pub fn split_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .filter(|c| is_plain(*c))
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace()
}
