use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast, ToPrimitive};

/// A trait for types that can be used as interval endpoints of a bound.
///
/// The hierarchy itself only ever looks at endpoints through [`ToPrimitive::to_f64`], so any
/// primitive number works. Integer coordinates are accepted as long as their differences fit in
/// the type.
pub trait IndexableNum:
    Num + NumCast + ToPrimitive + PartialOrd + Copy + Debug + Send + Sync + Bounded
{
    /// Widen this value to `f64` for metric computations.
    ///
    /// Every primitive implementing this trait converts losslessly or with rounding, never
    /// failing, so this falls back to `NaN` only for exotic implementations.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl IndexableNum for i8 {}
impl IndexableNum for u8 {}
impl IndexableNum for i16 {}
impl IndexableNum for u16 {}
impl IndexableNum for i32 {}
impl IndexableNum for u32 {}
impl IndexableNum for i64 {}
impl IndexableNum for u64 {}
impl IndexableNum for f32 {}
impl IndexableNum for f64 {}
