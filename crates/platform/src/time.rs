//! Monotonic time source

/// Non-decreasing microsecond counter driven by the scheduler's timer.
///
/// Wrap-around is not handled: a `u64` of microseconds lasts longer than
/// the device.
pub trait Monotonic {
    /// Microseconds since an arbitrary fixed epoch (usually boot).
    fn now_us(&self) -> u64;
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
