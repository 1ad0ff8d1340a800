//! Lock-free parameter store shared between a control thread and the audio thread.
//!
//! [`ParamBank`] keeps one `f32` per parameter in an [`AtomicU32`] (bit
//! pattern via `to_bits`/`from_bits`). The control side calls
//! [`set`](ParamBank::set) at any time; the audio side takes a
//! [`snapshot`](ParamBank::snapshot) or calls [`apply_to`](ParamBank::apply_to)
//! at the top of a tick.
//!
//! All accesses use `Relaxed` ordering. Each scalar is read atomically, but a
//! snapshot may mix values from before and after a concurrent burst of
//! writes. That tears across parameters for at most one tick and corrects
//! itself on the next.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::param_info::ParameterInfo;

/// Fixed-size bank of atomically updated `f32` parameter values.
///
/// # Example
///
/// ```rust
/// use diodering_core::ParamBank;
///
/// let bank = ParamBank::new([1.0, 0.5]);
/// assert!(bank.set(1, 0.25));
/// assert!(!bank.set(2, 0.0));
/// assert_eq!(bank.snapshot(), [1.0, 0.25]);
/// ```
#[derive(Debug)]
pub struct ParamBank<const N: usize> {
    values: [AtomicU32; N],
}

impl<const N: usize> ParamBank<N> {
    /// Creates a bank holding `initial`.
    pub fn new(initial: [f32; N]) -> Self {
        Self {
            values: initial.map(|v| AtomicU32::new(v.to_bits())),
        }
    }

    /// Creates a bank from the current values of `params`.
    ///
    /// Slots beyond `params.param_count()` start at 0.
    pub fn from_params<P: ParameterInfo + ?Sized>(params: &P) -> Self {
        Self::new(core::array::from_fn(|i| {
            if i < params.param_count() {
                params.get_param(i)
            } else {
                0.0
            }
        }))
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` if the bank has no slots.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Stores `value` at `index`. Returns `false` if `index` is out of range.
    #[inline]
    pub fn set(&self, index: usize, value: f32) -> bool {
        match self.values.get(index) {
            Some(slot) => {
                slot.store(value.to_bits(), Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Loads the value at `index`, `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values
            .get(index)
            .map(|slot| f32::from_bits(slot.load(Ordering::Relaxed)))
    }

    /// Reads every slot.
    #[inline]
    pub fn snapshot(&self) -> [f32; N] {
        core::array::from_fn(|i| f32::from_bits(self.values[i].load(Ordering::Relaxed)))
    }

    /// Pushes the current values into `target` through `set_param`.
    ///
    /// Allocation-free; safe to call on the audio thread.
    pub fn apply_to<P: ParameterInfo + ?Sized>(&self, target: &mut P) {
        let count = N.min(target.param_count());
        for (i, slot) in self.values.iter().take(count).enumerate() {
            target.set_param(i, f32::from_bits(slot.load(Ordering::Relaxed)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param_info::ParamDescriptor;

    struct Pair {
        values: [f32; 2],
    }

    impl ParameterInfo for Pair {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            (index < 2).then(|| ParamDescriptor::level("Level", "Level"))
        }

        fn get_param(&self, index: usize) -> f32 {
            self.values.get(index).copied().unwrap_or(0.0)
        }

        fn set_param(&mut self, index: usize, value: f32) {
            if let Some(desc) = self.param_info(index) {
                self.values[index] = desc.clamp(value);
            }
        }
    }

    #[test]
    fn test_from_params_and_apply() {
        let mut target = Pair { values: [0.1, 0.2] };
        let bank: ParamBank<3> = ParamBank::from_params(&target);
        assert_eq!(bank.snapshot(), [0.1, 0.2, 0.0]);

        bank.set(0, 0.9);
        bank.set(1, 7.0);
        bank.apply_to(&mut target);
        // set_param clamps through the descriptor
        assert_eq!(target.values, [0.9, 1.0]);
    }

    #[test]
    fn test_get_out_of_range() {
        let bank = ParamBank::new([0.5]);
        assert_eq!(bank.get(0), Some(0.5));
        assert_eq!(bank.get(1), None);
        assert_eq!(bank.len(), 1);
        assert!(!bank.is_empty());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_cross_thread_writes() {
        use std::sync::Arc;

        let bank = Arc::new(ParamBank::new([0.0; 4]));
        let writer = {
            let bank = Arc::clone(&bank);
            std::thread::spawn(move || {
                for step in 0..1000 {
                    for i in 0..4 {
                        bank.set(i, step as f32);
                    }
                }
            })
        };
        for _ in 0..1000 {
            for v in bank.snapshot() {
                assert!((0.0..1000.0).contains(&v), "torn scalar: {v}");
            }
        }
        writer.join().expect("writer thread panicked");
        assert_eq!(bank.snapshot(), [999.0; 4]);
    }
}
