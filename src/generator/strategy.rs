//! src/generator/strategy.rs
//! Per-length enumeration strategy and the passes it expands into
//!
//! Every length is handled by exactly one [`EnumerationStrategy`]. A strategy
//! expands into an ordered list of [`Pass`]es; each pass is one odometer run with
//! a human-readable label. The ordering contract lives entirely here.

use crate::consts::SHORT_LENGTH_OVERRIDE_MAX;
use crate::generator::budget::GenerationBudget;
use crate::generator::odometer::Odometer;
use crate::policy::{CharClass, Charset};

/// How one length is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationStrategy {
    /// Every combination of the active charset; it fits the budget.
    FullProduct,
    /// Every combination of the active charset even though it overflows the
    /// budget, because the length is short. The hard cap still applies.
    ShortLengthOverride,
    /// Lowercase-only, then digit-only, then lowercase-prefix/digit-suffix.
    StructuredFallback,
}

impl EnumerationStrategy {
    /// Picks the strategy for `length` given what has been emitted so far.
    #[must_use]
    pub fn select(
        length: usize,
        combinations: u128,
        emitted: u64,
        budget: GenerationBudget,
    ) -> Self {
        if budget.admits(u128::from(emitted).saturating_add(combinations)) {
            EnumerationStrategy::FullProduct
        } else if length <= SHORT_LENGTH_OVERRIDE_MAX {
            EnumerationStrategy::ShortLengthOverride
        } else {
            EnumerationStrategy::StructuredFallback
        }
    }

    /// Expands the strategy into its passes for `length`, in emission order.
    #[must_use]
    pub fn passes<'a>(self, length: usize, charset: &'a Charset) -> Vec<Pass<'a>> {
        match self {
            EnumerationStrategy::FullProduct => vec![Pass {
                label: format!("all length-{length} combinations"),
                alphabets: vec![charset.symbols(); length],
            }],
            EnumerationStrategy::ShortLengthOverride => vec![Pass {
                label: format!("length-{length} full charset"),
                alphabets: vec![charset.symbols(); length],
            }],
            EnumerationStrategy::StructuredFallback => fallback_passes(length, charset),
        }
    }
}

fn fallback_passes(length: usize, charset: &Charset) -> Vec<Pass<'static>> {
    let lower = CharClass::Lowercase.alphabet();
    let digits = CharClass::Digit.alphabet();
    let has_lower = charset.has(CharClass::Lowercase);
    let has_digits = charset.has(CharClass::Digit);

    let mut passes = Vec::with_capacity(3);
    if has_lower {
        passes.push(Pass {
            label: format!("length-{length} lowercase"),
            alphabets: vec![lower; length],
        });
    }
    if has_digits {
        passes.push(Pass {
            label: format!("length-{length} numeric"),
            alphabets: vec![digits; length],
        });
    }
    if has_lower && has_digits && length >= 4 {
        let half = length / 2;
        let mut alphabets = vec![lower; half];
        alphabets.extend(std::iter::repeat(digits).take(length - half));
        passes.push(Pass {
            label: format!("length-{length} mixed letter-number"),
            alphabets,
        });
    }
    passes
}

/// One labelled odometer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass<'a> {
    pub label: String,
    pub alphabets: Vec<&'a [u8]>,
}

impl<'a> Pass<'a> {
    /// The candidates of this pass, in order.
    #[must_use]
    pub fn candidates(&self) -> Odometer<'a> {
        Odometer::new(self.alphabets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CharClasses;

    fn lower_digits() -> Charset {
        Charset::new(CharClasses {
            lowercase: true,
            digits: true,
            ..CharClasses::default()
        })
    }

    #[test]
    fn selects_full_product_when_it_fits() {
        let budget = GenerationBudget::Capped(1_000);
        assert_eq!(
            EnumerationStrategy::select(2, 676, 0, budget),
            EnumerationStrategy::FullProduct
        );
        assert_eq!(
            EnumerationStrategy::select(2, 676, 324, budget),
            EnumerationStrategy::FullProduct
        );
    }

    #[test]
    fn short_lengths_override_the_budget() {
        let budget = GenerationBudget::Capped(1_000);
        assert_eq!(
            EnumerationStrategy::select(3, 17_576, 0, budget),
            EnumerationStrategy::ShortLengthOverride
        );
        assert_eq!(
            EnumerationStrategy::select(4, 456_976, 0, budget),
            EnumerationStrategy::StructuredFallback
        );
    }

    #[test]
    fn unlimited_is_always_full_product() {
        assert_eq!(
            EnumerationStrategy::select(12, u128::MAX, u64::MAX, GenerationBudget::Unlimited),
            EnumerationStrategy::FullProduct
        );
    }

    #[test]
    fn fallback_order_and_split() {
        let cs = lower_digits();
        let passes = EnumerationStrategy::StructuredFallback.passes(5, &cs);
        let labels: Vec<_> = passes.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "length-5 lowercase",
                "length-5 numeric",
                "length-5 mixed letter-number"
            ]
        );
        // ⌊5/2⌋ = 2 letters, then 3 digits
        let mixed = &passes[2];
        assert_eq!(mixed.candidates().next().as_deref(), Some("aa000"));
        assert_eq!(mixed.candidates().span(), 26 * 26 * 1000);
    }

    #[test]
    fn fallback_without_digits_is_lowercase_only() {
        let cs = Charset::new(CharClasses {
            lowercase: true,
            uppercase: true,
            ..CharClasses::default()
        });
        let passes = EnumerationStrategy::StructuredFallback.passes(4, &cs);
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].label, "length-4 lowercase");
    }

    #[test]
    fn fallback_with_neither_class_is_empty() {
        let cs = Charset::new(CharClasses {
            uppercase: true,
            special: true,
            ..CharClasses::default()
        });
        assert!(EnumerationStrategy::StructuredFallback
            .passes(6, &cs)
            .is_empty());
    }
}
