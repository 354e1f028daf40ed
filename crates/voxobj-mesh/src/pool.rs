/// Number stored for slots nobody referenced.
pub const UNREFERENCED: i32 = -1;

/// Fixed-size reference-counted arena with post-hoc compaction.
///
/// Slots are addressed by a caller-side bijection. During building only the
/// counts move; [`RefPool::number`] then hands every referenced slot the
/// next 1-based output number in storage order. Storage is reused across
/// chunks through [`RefPool::clear`].
#[derive(Clone, Debug)]
pub struct RefPool {
    refs: Vec<u32>,
    numbers: Vec<i32>,
    numbered: bool,
}

impl RefPool {
    pub fn new(slots: usize) -> Self {
        Self {
            refs: vec![0; slots],
            numbers: vec![UNREFERENCED; slots],
            numbered: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    #[inline]
    pub fn acquire(&mut self, slot: usize) -> usize {
        debug_assert!(!self.numbered, "pool used after numbering");
        self.refs[slot] += 1;
        slot
    }

    #[inline]
    pub fn release(&mut self, slot: usize) -> usize {
        debug_assert!(!self.numbered, "pool released after numbering");
        debug_assert!(self.refs[slot] > 0, "release of unreferenced slot {}", slot);
        self.refs[slot] = self.refs[slot].saturating_sub(1);
        slot
    }

    pub fn clear(&mut self) {
        self.refs.fill(0);
        self.numbers.fill(UNREFERENCED);
        self.numbered = false;
    }

    /// Assigns output numbers and returns how many slots are referenced.
    pub fn number(&mut self) -> usize {
        let mut count = 0;
        for (number, &refs) in self.numbers.iter_mut().zip(&self.refs) {
            if refs != 0 {
                count += 1;
                *number = count as i32;
            } else {
                *number = UNREFERENCED;
            }
        }
        self.numbered = true;
        count
    }

    #[inline]
    pub fn is_numbered(&self) -> bool {
        self.numbered
    }

    /// Output number once numbered; the raw reference count before.
    #[inline]
    pub fn get(&self, slot: usize) -> i32 {
        if self.numbered {
            self.numbers[slot]
        } else {
            self.refs[slot] as i32
        }
    }

    #[inline]
    pub fn refs(&self, slot: usize) -> u32 {
        self.refs[slot]
    }

    /// Referenced slots in storage order, which is also output order.
    pub fn referenced(&self) -> impl Iterator<Item = usize> + '_ {
        self.refs
            .iter()
            .enumerate()
            .filter(|(_, r)| **r != 0)
            .map(|(i, _)| i)
    }

    pub fn referenced_count(&self) -> usize {
        self.refs.iter().filter(|r| **r != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_follow_storage_order() {
        let mut p = RefPool::new(8);
        p.acquire(5);
        p.acquire(1);
        p.acquire(5);
        p.acquire(6);
        assert_eq!(p.get(5), 2);
        assert_eq!(p.number(), 3);
        assert_eq!(p.get(1), 1);
        assert_eq!(p.get(5), 2);
        assert_eq!(p.get(6), 3);
        assert_eq!(p.get(0), UNREFERENCED);
        assert_eq!(p.referenced().collect::<Vec<_>>(), vec![1, 5, 6]);
    }

    #[test]
    fn release_undoes_acquire() {
        let mut p = RefPool::new(4);
        p.acquire(2);
        p.acquire(2);
        p.release(2);
        assert_eq!(p.refs(2), 1);
        p.release(2);
        assert_eq!(p.number(), 0);
        assert_eq!(p.get(2), UNREFERENCED);
    }

    #[test]
    fn clear_resets_everything() {
        let mut p = RefPool::new(4);
        p.acquire(0);
        p.acquire(3);
        p.number();
        p.clear();
        assert!(!p.is_numbered());
        assert!((0..4).all(|i| p.refs(i) == 0 && p.get(i) == 0));
        assert_eq!(p.referenced_count(), 0);
    }
}
