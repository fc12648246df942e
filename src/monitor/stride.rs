use std::num::NonZeroUsize;

/// The downsampling factor: every `n`-th raw sample is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval(NonZeroUsize);

impl Interval {
    /// Forward every raw sample.
    pub const EVERY: Interval = Interval(NonZeroUsize::MIN);

    /// Returns `None` for a zero interval.
    pub fn new(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EVERY
    }
}

/// Decides, in arrival order, which raw samples are forwarded.
///
/// The sample with zero-based arrival index `i` is admitted iff `i % interval == 0`. Only the
/// position within the current stride is stored, so the counter never overflows.
#[derive(Debug)]
pub(crate) struct Stride {
    interval: Interval,
    position: usize,
}

impl Stride {
    pub(crate) fn new(interval: Interval) -> Self {
        Self {
            interval,
            position: 0,
        }
    }

    /// Registers the arrival of one raw sample and reports whether it is forwarded.
    pub(crate) fn admit(&mut self) -> bool {
        let admitted = self.position == 0;
        self.position += 1;
        if self.position == self.interval.get() {
            self.position = 0;
        }
        admitted
    }
}
