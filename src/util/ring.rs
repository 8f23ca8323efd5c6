/// Fixed-size circular buffer stored inline. No heap allocs, ever.
///
/// Starts full: `filled(value)` seeds every slot so a fresh trail renders as
/// a single point instead of a line back to the origin.
#[derive(Debug, Clone, Copy)]
pub struct RingBuffer<T, const N: usize> {
    buf: [T; N],
    /// Slot the next push overwrites (the oldest entry).
    head: usize,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    pub fn filled(value: T) -> Self {
        Self {
            buf: [value; N],
            head: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        self.buf[self.head] = value;
        self.head = (self.head + 1) % N;
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..N).map(move |i| &self.buf[(self.head + i) % N])
    }
}
