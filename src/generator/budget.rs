//! src/generator/budget.rs
//! Candidate budget and the closed-form size estimate

use crate::consts::DEFAULT_MAX_CANDIDATES;
use crate::policy::PasswordPolicy;

/// The maximum number of candidates a generation may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationBudget {
    Capped(u64),
    Unlimited,
}

impl GenerationBudget {
    /// `Unlimited` for an acknowledged unlimited policy, otherwise the default cap.
    #[must_use]
    pub const fn for_policy(policy: &PasswordPolicy) -> Self {
        if policy.is_unlimited() {
            GenerationBudget::Unlimited
        } else {
            GenerationBudget::Capped(DEFAULT_MAX_CANDIDATES)
        }
    }

    #[must_use]
    pub const fn limit(self) -> Option<u64> {
        match self {
            GenerationBudget::Capped(n) => Some(n),
            GenerationBudget::Unlimited => None,
        }
    }

    /// Whether a running total of `total` candidates stays within the budget.
    #[must_use]
    pub fn admits(self, total: u128) -> bool {
        match self {
            GenerationBudget::Capped(n) => total <= u128::from(n),
            GenerationBudget::Unlimited => true,
        }
    }

    /// Whether `emitted` has hit the hard stop.
    #[must_use]
    pub const fn is_exhausted_by(self, emitted: u64) -> bool {
        match self {
            GenerationBudget::Capped(n) => emitted >= n,
            GenerationBudget::Unlimited => false,
        }
    }

    /// Clamp a raw count to the budget.
    #[must_use]
    pub fn clamp(self, total: u128) -> u128 {
        match self {
            GenerationBudget::Capped(n) => total.min(u128::from(n)),
            GenerationBudget::Unlimited => total,
        }
    }
}

/// Theoretical size of the policy's space: `Σ |charset|^L` over its lengths.
///
/// Saturates at `u128::MAX`, which no supported policy reaches (70^12 ≈ 1.4e22).
#[must_use]
pub fn space_size(policy: &PasswordPolicy) -> u128 {
    let radix = policy.charset().len();
    policy
        .lengths()
        .fold(0u128, |acc, length| acc.saturating_add(combinations(radix, length)))
}

/// `radix^length`, saturating.
#[must_use]
pub fn combinations(radix: usize, length: usize) -> u128 {
    u32::try_from(length)
        .ok()
        .and_then(|exp| (radix as u128).checked_pow(exp))
        .unwrap_or(u128::MAX)
}

/// Number of candidates the policy is expected to produce under its own budget.
///
/// `min(Σ |charset|^L, 1_000_000)` for a capped policy, the full sum when unlimited.
/// Computed arithmetically; nothing is enumerated.
#[must_use]
pub fn estimate_count(policy: &PasswordPolicy) -> u128 {
    estimate_count_within(policy, GenerationBudget::for_policy(policy))
}

/// [`estimate_count`] against an explicit budget.
#[must_use]
pub fn estimate_count_within(policy: &PasswordPolicy, budget: GenerationBudget) -> u128 {
    budget.clamp(space_size(policy))
}
