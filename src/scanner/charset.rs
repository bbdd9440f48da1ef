//! Character classes used by scanner operations.

/// A fixed set of characters a scanner run may consume.
#[derive(Debug, Clone, Copy)]
pub enum CharSet {
    /// Exactly the characters of this string.
    Chars(&'static str),
    /// Characters accepted by a predicate.
    Class(fn(char) -> bool),
}

impl CharSet {
    /// Check membership.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Chars(chars) => chars.contains(c),
            Self::Class(predicate) => predicate(c),
        }
    }
}

fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' '
}

/// Spaces and tabs.
pub const HORIZONTAL_SPACE: CharSet = CharSet::Chars(" \t");

/// Letters, digits and spaces allowed in a speaker cue.
pub const LABEL: CharSet = CharSet::Class(is_label_char);

/// Emoji accepted inside a speaker cue.
pub const CUE_EMOJI: &[char] = &[
    '🤖', '👤', '🧑', '👩', '👨', '🙂', '😀', '😎', '🤔', '✨', '💬', '🦜', '🧠', '🐍', '⭐',
    '❤', '☺', '⚡',
];

/// Variation selector that may follow an emoji base character.
pub const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Whether `c` is an allow-listed cue emoji.
#[must_use]
pub fn is_cue_emoji(c: char) -> bool {
    CUE_EMOJI.contains(&c)
}
