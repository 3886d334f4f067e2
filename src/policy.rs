//! # Password Policy
//!
//! A validated, immutable description of the candidate space: the length range,
//! which character classes are active, and whether the candidate cap is lifted.
//! Build one with [`PolicyBuilder`](crate::PolicyBuilder).

use std::fmt;

/// One of the four fixed character classes.
///
/// Declaration order is the charset concatenation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl CharClass {
    /// All classes in charset order.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digit,
        CharClass::Special,
    ];

    /// The class's symbols, in enumeration order.
    #[must_use]
    pub const fn alphabet(self) -> &'static [u8] {
        match self {
            CharClass::Lowercase => b"abcdefghijklmnopqrstuvwxyz",
            CharClass::Uppercase => b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            CharClass::Digit => b"0123456789",
            CharClass::Special => b"!@#$%^&*",
        }
    }

    /// Number of symbols: 26, 26, 10 or 8.
    #[must_use]
    pub const fn size(self) -> usize {
        self.alphabet().len()
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CharClass::Lowercase => "lowercase",
            CharClass::Uppercase => "uppercase",
            CharClass::Digit => "digits",
            CharClass::Special => "special",
        })
    }
}

/// Which character classes a policy selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharClasses {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub special: bool,
}

impl CharClasses {
    #[must_use]
    pub const fn contains(&self, class: CharClass) -> bool {
        match class {
            CharClass::Lowercase => self.lowercase,
            CharClass::Uppercase => self.uppercase,
            CharClass::Digit => self.digits,
            CharClass::Special => self.special,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.lowercase || self.uppercase || self.digits || self.special)
    }

    /// The selection with the lowercase fallback applied when nothing is selected.
    #[must_use]
    pub const fn effective(self) -> Self {
        if self.is_empty() {
            CharClasses {
                lowercase: true,
                ..self
            }
        } else {
            self
        }
    }
}

/// The concatenated alphabet of the active classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    classes: CharClasses,
    symbols: Vec<u8>,
}

impl Charset {
    /// Concatenates the selected classes in [`CharClass::ALL`] order,
    /// falling back to lowercase when none are selected.
    #[must_use]
    pub fn new(selected: CharClasses) -> Self {
        let classes = selected.effective();
        let symbols = CharClass::ALL
            .iter()
            .filter(|class| classes.contains(**class))
            .flat_map(|class| class.alphabet().iter().copied())
            .collect();
        Self { classes, symbols }
    }

    #[must_use]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `class` contributes to this charset (after the lowercase fallback).
    #[must_use]
    pub const fn has(&self, class: CharClass) -> bool {
        self.classes.contains(class)
    }
}

/// Validated search-space configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub(crate) min_length: usize,
    pub(crate) max_length: usize,
    pub(crate) classes: CharClasses,
    pub(crate) unlimited: bool,
}

impl PasswordPolicy {
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// The classes as requested, before the lowercase fallback.
    #[must_use]
    pub const fn classes(&self) -> CharClasses {
        self.classes
    }

    /// `true` only when unlimited generation was requested and acknowledged.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.unlimited
    }

    /// The active charset.
    #[must_use]
    pub fn charset(&self) -> Charset {
        Charset::new(self.classes)
    }

    /// Lengths in enumeration order.
    pub fn lengths(&self) -> impl Iterator<Item = usize> {
        self.min_length..=self.max_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_concatenates_in_fixed_order() {
        let cs = Charset::new(CharClasses {
            lowercase: false,
            uppercase: true,
            digits: true,
            special: true,
        });
        assert_eq!(cs.len(), 26 + 10 + 8);
        assert_eq!(cs.symbols()[0], b'A');
        assert_eq!(cs.symbols()[26], b'0');
        assert_eq!(&cs.symbols()[36..], b"!@#$%^&*");
    }

    #[test]
    fn empty_selection_falls_back_to_lowercase() {
        let cs = Charset::new(CharClasses::default());
        assert_eq!(cs.symbols(), CharClass::Lowercase.alphabet());
        assert!(cs.has(CharClass::Lowercase));
        assert!(!cs.has(CharClass::Digit));
    }

    #[test]
    fn class_sizes_are_fixed() {
        let sizes: Vec<_> = CharClass::ALL.iter().map(|c| c.size()).collect();
        assert_eq!(sizes, vec![26, 26, 10, 8]);
    }
}
