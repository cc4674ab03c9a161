//! Two-variant tagged value, used as the `race` result carrier.
//!
//! 双变体标签值，用作 `race` 的结果载体。
//!
//! Exactly one variant is live at any time, selected by the tag. Because the
//! two payload types may be unrelated or even identical, tag selection is
//! always explicit: `Either::Left(v)` and `Either::Right(v)` never infer the
//! tag from the payload type.
//!
//! 任何时刻恰好有一个变体存活，由标签选择。由于两个载荷类型可能无关甚至相同，
//! 标签选择始终是显式的：`Either::Left(v)` 和 `Either::Right(v)` 不会从载荷
//! 类型推断标签。

use core::fmt;

/// A value that is either a `Left(L)` or a `Right(R)`.
///
/// Equality compares the tag first, then the live payload:
/// `Left(v) != Right(v)` even for identical `v`.
///
/// 要么是 `Left(L)` 要么是 `Right(R)` 的值。
///
/// 相等性先比较标签，再比较存活载荷：即使 `v` 相同，`Left(v) != Right(v)`。
///
/// # Examples
///
/// ```
/// use lite_cps::Either;
///
/// let a: Either<u32, u32> = Either::Left(1);
/// let b: Either<u32, u32> = Either::Right(1);
/// assert_ne!(a, b);
/// assert_eq!(a, Either::Left(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<L, R> {
    /// The first branch completed first
    ///
    /// 第一个分支先完成
    Left(L),
    /// The second branch completed first
    ///
    /// 第二个分支先完成
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` if this is a `Left` value
    #[inline]
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Returns `true` if this is a `Right` value
    #[inline]
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Consume and return the `Left` payload, if live
    ///
    /// 消耗并返回 `Left` 载荷（如果存活）
    #[inline]
    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(l) => Some(l),
            Either::Right(_) => None,
        }
    }

    /// Consume and return the `Right` payload, if live
    ///
    /// 消耗并返回 `Right` 载荷（如果存活）
    #[inline]
    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }

    /// Map the `Left` payload, leaving a `Right` untouched
    #[inline]
    pub fn map_left<L2>(self, f: impl FnOnce(L) -> L2) -> Either<L2, R> {
        match self {
            Either::Left(l) => Either::Left(f(l)),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Map the `Right` payload, leaving a `Left` untouched
    #[inline]
    pub fn map_right<R2>(self, f: impl FnOnce(R) -> R2) -> Either<L, R2> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(f(r)),
        }
    }
}

impl<L: fmt::Display, R: fmt::Display> fmt::Display for Either<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Either::Left(l) => write!(f, "Left({l})"),
            Either::Right(r) => write!(f, "Right({r})"),
        }
    }
}
