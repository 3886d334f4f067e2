//! src/builders/policy_builder.rs
//! Fluent, validating constructor for [`PasswordPolicy`]

use crate::consts::{MAX_LENGTH_LIMIT, MIN_LENGTH_LIMIT};
use crate::error::PolicyError;
use crate::policy::{CharClass, CharClasses, PasswordPolicy};

/// Password policy builder
///
/// Defaults: lengths `4..=6`, lowercase + digits, capped generation.
///
/// Lifting the candidate cap takes two calls: [`unlimited`](Self::unlimited)
/// requests it, [`acknowledge_unlimited`](Self::acknowledge_unlimited) confirms the
/// caller accepts the memory risk. `build` refuses a request that was never
/// acknowledged.
///
/// # Example
///
/// ```
/// use aescrypt_recover::PolicyBuilder;
///
/// let policy = PolicyBuilder::new()
///     .with_lengths(3, 3)
///     .with_lowercase(true)
///     .with_digits(false)
///     .build()?;
/// assert_eq!(policy.charset().len(), 26);
/// # Ok::<(), aescrypt_recover::PolicyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    min_length: usize,
    max_length: usize,
    classes: CharClasses,
    unlimited_requested: bool,
    unlimited_acknowledged: bool,
}

impl PolicyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: 4,
            max_length: 6,
            classes: CharClasses {
                lowercase: true,
                uppercase: false,
                digits: true,
                special: false,
            },
            unlimited_requested: false,
            unlimited_acknowledged: false,
        }
    }

    /// Set both length bounds (inclusive)
    #[must_use]
    pub fn with_lengths(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    #[must_use]
    pub fn with_lowercase(mut self, on: bool) -> Self {
        self.classes.lowercase = on;
        self
    }

    #[must_use]
    pub fn with_uppercase(mut self, on: bool) -> Self {
        self.classes.uppercase = on;
        self
    }

    #[must_use]
    pub fn with_digits(mut self, on: bool) -> Self {
        self.classes.digits = on;
        self
    }

    #[must_use]
    pub fn with_special(mut self, on: bool) -> Self {
        self.classes.special = on;
        self
    }

    /// Select exactly the given classes, clearing the rest
    #[must_use]
    pub fn with_classes(mut self, classes: &[CharClass]) -> Self {
        self.classes = CharClasses::default();
        for class in classes {
            match class {
                CharClass::Lowercase => self.classes.lowercase = true,
                CharClass::Uppercase => self.classes.uppercase = true,
                CharClass::Digit => self.classes.digits = true,
                CharClass::Special => self.classes.special = true,
            }
        }
        self
    }

    /// Request that the candidate cap be lifted
    #[must_use]
    pub fn unlimited(mut self, on: bool) -> Self {
        self.unlimited_requested = on;
        self
    }

    /// Confirm an unlimited request
    #[must_use]
    pub fn acknowledge_unlimited(mut self) -> Self {
        self.unlimited_acknowledged = true;
        self
    }

    /// Validate and freeze the policy
    pub fn build(self) -> Result<PasswordPolicy, PolicyError> {
        if !(1..=MIN_LENGTH_LIMIT).contains(&self.min_length) {
            return Err(PolicyError::MinLengthOutOfRange(self.min_length));
        }
        if !(1..=MAX_LENGTH_LIMIT).contains(&self.max_length) {
            return Err(PolicyError::MaxLengthOutOfRange(self.max_length));
        }
        if self.max_length < self.min_length {
            return Err(PolicyError::InvertedLengths {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.unlimited_requested && !self.unlimited_acknowledged {
            return Err(PolicyError::UnlimitedNotAcknowledged);
        }

        Ok(PasswordPolicy {
            min_length: self.min_length,
            max_length: self.max_length,
            classes: self.classes,
            unlimited: self.unlimited_requested,
        })
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
