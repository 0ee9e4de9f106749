//! Guarded write-discipline cells for stats record fields
//!
//! Lifecycle signals may legitimately be delivered more than once, so
//! write-once fields swallow replays instead of failing, while
//! latest-value fields overwrite on every report.

/// Field that keeps the first value it is ever given
#[derive(Debug, Clone)]
pub struct WriteOnce<T> {
    value: Option<T>,
}

impl<T> WriteOnce<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Store `value` unless a value is already present. Returns whether the
    /// write took effect; a replayed write is a silent no-op.
    pub fn set(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: Copy> WriteOnce<T> {
    pub fn value(&self) -> Option<T> {
        self.value
    }
}

impl<T> Default for WriteOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Field that always reflects the latest value written
#[derive(Debug, Clone)]
pub struct WriteMulti<T> {
    value: Option<T>,
}

impl<T> WriteMulti<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Overwrite unconditionally, no monotonicity enforcement
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: Copy> WriteMulti<T> {
    pub fn value(&self) -> Option<T> {
        self.value
    }
}

impl<T> Default for WriteMulti<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_once_unset_reads_none() {
        let cell: WriteOnce<u64> = WriteOnce::new();
        assert_eq!(cell.value(), None);
        assert!(!cell.is_set());
    }

    #[test]
    fn test_write_once_first_write_wins() {
        let mut cell = WriteOnce::new();
        assert!(cell.set(10.5));
        assert!(!cell.set(99.0));
        assert_eq!(cell.value(), Some(10.5));
    }

    #[test]
    fn test_write_once_replay_is_silent() {
        let mut cell = WriteOnce::new();
        cell.set(1u64);
        // replayed signals must not fail, only be ignored
        for _ in 0..10 {
            assert!(!cell.set(2));
        }
        assert_eq!(cell.value(), Some(1));
    }

    #[test]
    fn test_write_multi_overwrites() {
        let mut cell = WriteMulti::new();
        cell.set(5u64);
        cell.set(9);
        assert_eq!(cell.value(), Some(9));
        // no monotonic enforcement, lower values overwrite too
        cell.set(3);
        assert_eq!(cell.value(), Some(3));
    }

    #[test]
    fn test_write_multi_unset_reads_none() {
        let cell: WriteMulti<bool> = WriteMulti::new();
        assert_eq!(cell.get(), None);
    }
}
