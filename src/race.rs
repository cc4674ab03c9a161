//! Winner-take-all choice between two independent asynchronous values.
//!
//! 两个独立异步值之间的胜者全得选择。
//!
//! [`race`] resolves to whichever side actually completes first — determined
//! by real completion order, not argument position — carrying the winner as
//! [`Either::Left`] or [`Either::Right`]. Each instance owns one small shared
//! [`RaceCell`]; exactly one branch wins the atomic settle and alone invokes
//! the continuation. Ties between near-simultaneous completions on different
//! threads are broken by whichever side wins the atomic swap, which is
//! implementation-defined.
//!
//! [`race`] 解析为实际先完成的那一侧——由真实完成顺序而非参数位置决定——
//! 以 [`Either::Left`] 或 [`Either::Right`] 携带胜者。每个实例拥有一个小的
//! 共享 [`RaceCell`]；恰好一个分支赢得原子落定并独自调用 continuation。
//! 不同线程上几乎同时完成的平局由赢得原子交换的一侧决定，具体结果由实现
//! 定义。
//!
//! Known, intentional gap: the losing branch's producer is never notified to
//! stop, and any resource it holds is not released by this layer. Its payload
//! is dropped silently on arrival. Cancellation is out of scope and must be
//! supplied externally if needed.
//!
//! 已知且有意的空缺：失败分支的生产者不会被通知停止，其持有的资源本层也
//! 不会释放。其载荷到达时被静默丢弃。取消不在本层范围内，如有需要必须由
//! 外部提供。

use crate::async_value::{Async, Continuation};
use crate::either::Either;
use crate::shim::atomic::{AtomicBool, Ordering};
use crate::shim::cell::UnsafeCell;
use crate::shim::sync::Arc;

/// Shared settle-flag state, jointly owned by the two completion closures of
/// a [`race`] instance and released when the last of them drops.
///
/// [`race`] 实例的两个完成闭包共同拥有的落定标志状态，最后一个闭包释放时
/// 随之释放。
struct RaceCell<A, B> {
    settled: AtomicBool,
    cont: UnsafeCell<Option<Continuation<Either<A, B>>>>,
}

// SAFETY: the continuation slot is written once before the cell is shared and
// drained only by the single branch that wins the atomic swap on `settled`;
// the losing branch never touches it. The continuation box is itself Send.
unsafe impl<A, B> Send for RaceCell<A, B> {}
unsafe impl<A, B> Sync for RaceCell<A, B> {}

impl<A, B> RaceCell<A, B> {
    fn new(cont: Continuation<Either<A, B>>) -> Self {
        Self {
            settled: AtomicBool::new(false),
            cont: UnsafeCell::new(Some(cont)),
        }
    }

    /// Atomically claim the race; exactly one branch observes `false` here.
    ///
    /// The winner invokes the continuation with nothing held; the loser's
    /// outcome is dropped silently.
    #[inline]
    fn settle(&self, outcome: Either<A, B>) {
        if !self.settled.swap(true, Ordering::AcqRel) {
            // SAFETY: exclusive access — only the swap winner reaches here,
            // exactly once.
            let cont = self.cont.with_mut(|slot| unsafe { (*slot).take() });
            if let Some(cont) = cont {
                cont(outcome);
            }
        }
    }
}

/// Race two independent asynchronous values: the continuation receives
/// `Left(a)` if the first completes first, `Right(b)` if the second does.
///
/// The continuation is invoked exactly once across both branches, assuming at
/// least one branch eventually completes. Racing against
/// [`Async::zero`] just waits for the other side. Also available as the `|`
/// operator and the [`Async::race`] method.
///
/// 竞争两个独立的异步值：若第一个先完成，continuation 收到 `Left(a)`；若
/// 第二个先完成，则收到 `Right(b)`。
///
/// 只要至少一个分支最终完成，continuation 在两个分支间恰好被调用一次。与
/// [`Async::zero`] 竞争只是等待另一侧。也可以使用 `|` 运算符和
/// [`Async::race`] 方法。
///
/// # Examples
///
/// ```
/// use lite_cps::{Async, Either, race};
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// race(Async::pure(1), Async::<i32>::zero()).run(move |v| tx.send(v).unwrap());
/// assert_eq!(rx.recv().unwrap(), Either::Left(1));
/// ```
pub fn race<A, B>(aa: Async<A>, ab: Async<B>) -> Async<Either<A, B>>
where
    A: Send + 'static,
    B: Send + 'static,
{
    Async::new(move |cont| {
        let cell = Arc::new(RaceCell::new(cont));

        let left = cell.clone();
        aa.run(move |a| left.settle(Either::Left(a)));
        ab.run(move |b| cell.settle(Either::Right(b)));
    })
}

impl<A: Send + 'static> Async<A> {
    /// Method form of [`race`].
    ///
    /// [`race`] 的方法形式。
    ///
    /// # Examples
    ///
    /// ```
    /// use lite_cps::{Async, Either};
    /// use std::sync::mpsc;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// (Async::<i32>::zero() | Async::pure("second"))
    ///     .run(move |v| tx.send(v).unwrap());
    /// assert_eq!(rx.recv().unwrap(), Either::Right("second"));
    /// ```
    #[inline]
    pub fn race<B: Send + 'static>(self, other: Async<B>) -> Async<Either<A, B>> {
        race(self, other)
    }
}

impl<A: Send + 'static, B: Send + 'static> core::ops::BitOr<Async<B>> for Async<A> {
    type Output = Async<Either<A, B>>;

    #[inline]
    fn bitor(self, rhs: Async<B>) -> Async<Either<A, B>> {
        self.race(rhs)
    }
}
