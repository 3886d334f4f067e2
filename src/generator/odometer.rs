//! src/generator/odometer.rs
//! Mixed-radix odometer over per-position alphabets

/// Yields every string whose position `i` is drawn from `alphabets[i]`,
/// rightmost position varying fastest.
///
/// With one alphabet repeated `L` times this is the cartesian product
/// `alphabet^L` in lexicographic order. With a run of letter alphabets followed
/// by digit alphabets it is the nested prefix/suffix product.
#[derive(Debug, Clone)]
pub struct Odometer<'a> {
    alphabets: Vec<&'a [u8]>,
    wheels: Vec<usize>,
    current: Vec<u8>,
    exhausted: bool,
}

impl<'a> Odometer<'a> {
    #[must_use]
    pub fn new(alphabets: Vec<&'a [u8]>) -> Self {
        let exhausted = alphabets.is_empty() || alphabets.iter().any(|a| a.is_empty());
        let current = if exhausted {
            Vec::new()
        } else {
            alphabets.iter().map(|a| a[0]).collect()
        };
        Self {
            wheels: vec![0; alphabets.len()],
            alphabets,
            current,
            exhausted,
        }
    }

    /// `alphabet` repeated `length` times.
    #[must_use]
    pub fn uniform(alphabet: &'a [u8], length: usize) -> Self {
        Self::new(vec![alphabet; length])
    }

    /// Total strings this odometer yields from a fresh start, saturating at `u128::MAX`.
    #[must_use]
    pub fn span(&self) -> u128 {
        self.alphabets
            .iter()
            .try_fold(1u128, |acc, a| acc.checked_mul(a.len() as u128))
            .unwrap_or(u128::MAX)
    }

    fn advance(&mut self) {
        for i in (0..self.wheels.len()).rev() {
            self.wheels[i] += 1;
            if self.wheels[i] < self.alphabets[i].len() {
                self.current[i] = self.alphabets[i][self.wheels[i]];
                return;
            }
            self.wheels[i] = 0;
            self.current[i] = self.alphabets[i][0];
        }
        self.exhausted = true;
    }
}

impl Iterator for Odometer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        // Alphabets are ASCII, so each byte is one char
        let out = self.current.iter().map(|&b| char::from(b)).collect();
        self.advance();
        Some(out)
    }
}
