//! The objective contract between the GA engine and the problem being solved.
//!
//! The engine treats the objective as an opaque, expensive black box. Every
//! call is counted, and the engine polls that count to enforce its
//! evaluation budget.

/// A black-box fitness function over bitstrings, with an evaluation counter.
///
/// Higher fitness is better (maximization).
///
/// # Implementing
///
/// ```
/// use u_bitga::ga::Objective;
///
/// struct OneMax {
///     calls: usize,
/// }
///
/// impl Objective for OneMax {
///     fn evaluate(&mut self, bits: &[bool]) -> f64 {
///         self.calls += 1;
///         bits.iter().filter(|&&b| b).count() as f64
///     }
///     fn evaluations(&self) -> usize {
///         self.calls
///     }
///     fn reset(&mut self) {
///         self.calls = 0;
///     }
/// }
/// ```
pub trait Objective {
    /// Evaluates a candidate and advances the evaluation counter by one.
    fn evaluate(&mut self, bits: &[bool]) -> f64;

    /// Number of evaluations performed since construction or the last reset.
    fn evaluations(&self) -> usize;

    /// Zeroes the evaluation counter and any internal state between
    /// independent runs.
    fn reset(&mut self);
}

impl<O: Objective + ?Sized> Objective for &mut O {
    fn evaluate(&mut self, bits: &[bool]) -> f64 {
        (**self).evaluate(bits)
    }

    fn evaluations(&self) -> usize {
        (**self).evaluations()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<O: Objective + ?Sized> Objective for Box<O> {
    fn evaluate(&mut self, bits: &[bool]) -> f64 {
        (**self).evaluate(bits)
    }

    fn evaluations(&self) -> usize {
        (**self).evaluations()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Adapts a plain fitness closure into an [`Objective`] by counting calls.
///
/// ```
/// use u_bitga::ga::{CountingObjective, Objective};
///
/// let mut onemax = CountingObjective::new(|bits: &[bool]| {
///     bits.iter().filter(|&&b| b).count() as f64
/// });
/// assert_eq!(onemax.evaluate(&[true, false, true]), 2.0);
/// assert_eq!(onemax.evaluations(), 1);
/// ```
pub struct CountingObjective<F> {
    function: F,
    evaluations: usize,
}

impl<F> CountingObjective<F>
where
    F: FnMut(&[bool]) -> f64,
{
    /// Wraps `function` with a zeroed counter.
    pub fn new(function: F) -> Self {
        Self {
            function,
            evaluations: 0,
        }
    }

    /// Returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.function
    }
}

impl<F> Objective for CountingObjective<F>
where
    F: FnMut(&[bool]) -> f64,
{
    fn evaluate(&mut self, bits: &[bool]) -> f64 {
        self.evaluations += 1;
        (self.function)(bits)
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn reset(&mut self) {
        self.evaluations = 0;
    }
}

impl<F> std::fmt::Debug for CountingObjective<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingObjective")
            .field("evaluations", &self.evaluations)
            .finish_non_exhaustive()
    }
}
