//! Repeat-count prefix accumulator

/// Digits typed before a command, e.g. the `23` of `23j`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountAccumulator {
    pending: Option<String>,
    max_count: usize,
}

impl Default for CountAccumulator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_COUNT)
    }
}

impl CountAccumulator {
    /// `max_count` clamps every consumed count
    pub fn new(max_count: usize) -> Self {
        Self {
            pending: None,
            max_count: max_count.max(1),
        }
    }

    /// Start a new count with its first digit
    pub fn begin(&mut self, digit: u32) {
        self.pending = Some(digit.to_string());
    }

    /// Append a digit to the pending count, starting one if needed
    pub fn append(&mut self, digit: u32) {
        self.pending
            .get_or_insert_with(String::new)
            .push_str(&digit.to_string());
    }

    /// Read and clear the count
    ///
    /// A missing, zero or unparsable count yields `default`. Values above the
    /// configured maximum (including ones too large for `usize`) are clamped.
    pub fn consume(&mut self, default: usize) -> usize {
        let Some(digits) = self.pending.take() else {
            return default;
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            tracing::debug!("malformed count {:?}, using {}", digits, default);
            return default;
        }

        match digits.parse::<usize>() {
            Ok(0) => default,
            Ok(n) => n.min(self.max_count),
            Err(_) => self.max_count,
        }
    }

    /// Read and clear the count without applying a default
    ///
    /// Used by count-param actions, whose commands treat "no count" and
    /// "count of 1" differently.
    pub fn take_raw(&mut self) -> Option<usize> {
        let digits = self.pending.take()?;
        match digits.parse::<usize>() {
            Ok(n) => Some(n.min(self.max_count)),
            Err(_) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Some(self.max_count)
            }
            Err(_) => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// The digits collected so far
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_count_uses_default() {
        let mut count = CountAccumulator::new(100);
        assert_eq!(count.consume(1), 1);
        assert_eq!(count.consume(4), 4);
    }

    #[test]
    fn test_begin_append_consume() {
        let mut count = CountAccumulator::new(100);
        count.begin(2);
        count.append(3);
        assert_eq!(count.pending(), Some("23"));
        assert_eq!(count.consume(1), 23);
        assert_eq!(count.pending(), None);
        assert_eq!(count.consume(1), 1);
    }

    #[test]
    fn test_begin_restarts() {
        let mut count = CountAccumulator::new(100);
        count.begin(4);
        count.begin(7);
        assert_eq!(count.consume(1), 7);
    }

    #[test]
    fn test_zero_count_uses_default() {
        let mut count = CountAccumulator::new(100);
        count.append(0);
        count.append(0);
        assert_eq!(count.consume(3), 3);
    }

    #[test]
    fn test_clamped_to_max() {
        let mut count = CountAccumulator::new(50);
        count.begin(9);
        count.append(9);
        assert_eq!(count.consume(1), 50);

        for _ in 0..40 {
            count.append(9);
        }
        assert_eq!(count.consume(1), 50);
    }

    #[test]
    fn test_take_raw() {
        let mut count = CountAccumulator::new(100);
        assert_eq!(count.take_raw(), None);
        count.begin(5);
        assert_eq!(count.take_raw(), Some(5));
        assert!(!count.is_pending());

        count.append(0);
        assert_eq!(count.take_raw(), Some(0));
    }

    #[test]
    fn test_clear() {
        let mut count = CountAccumulator::new(100);
        count.begin(3);
        count.clear();
        assert_eq!(count.consume(1), 1);
    }

    #[test]
    fn test_zero_max_is_raised_to_one() {
        assert_eq!(CountAccumulator::new(0).max_count(), 1);
    }
}
