//! Two-slot arena with an index flag selecting the current slot
//!
//! Writers never get a mutable handle to the current slot: [`PingPong::split`]
//! hands out `(&current, &mut next)` and [`PingPong::swap`] is the only way to
//! promote next. Both the CPU reference and the GPU driver hold their
//! generation buffers in one of these.

#[derive(Debug, Clone)]
pub struct PingPong<T> {
    slots: [T; 2],
    current: usize,
}

impl<T> PingPong<T> {
    /// Slot `a` starts as current
    pub fn new(a: T, b: T) -> Self {
        Self {
            slots: [a, b],
            current: 0,
        }
    }

    /// Index (0 or 1) of the slot holding the latest generation
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn next_index(&self) -> usize {
        1 - self.current
    }

    pub fn current(&self) -> &T {
        &self.slots[self.current]
    }

    /// Read current, write next
    pub fn split(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.slots;
        if self.current == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Promotes next to current
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    /// Both slots by index, for building per-slot resources
    pub fn slots(&self) -> &[T; 2] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_alternates_roles() {
        let mut pair = PingPong::new("a", "b");
        assert_eq!(*pair.current(), "a");
        assert_eq!(pair.current_index(), 0);
        pair.swap();
        assert_eq!(*pair.current(), "b");
        assert_eq!(pair.next_index(), 0);
        pair.swap();
        assert_eq!(*pair.current(), "a");
    }

    #[test]
    fn test_split_writes_only_next() {
        let mut pair = PingPong::new(1, 2);
        {
            let (current, next) = pair.split();
            *next = *current * 10;
        }
        assert_eq!(*pair.current(), 1);
        pair.swap();
        assert_eq!(*pair.current(), 10);

        let (current, next) = pair.split();
        assert_eq!(*current, 10);
        assert_eq!(*next, 1);
    }
}
