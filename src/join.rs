//! Parallel join: apply a pending function to a pending argument.
//!
//! 并行汇合：将待定的函数应用于待定的参数。
//!
//! [`apply`] joins two *independent* asynchronous values — no ordering
//! relationship, possibly completing on different threads, possibly
//! concurrently — into one. Each composition instance owns exactly one small
//! shared [`JoinCell`], scoped to that instance, with no global state and no
//! blocking. Whichever side arrives second performs the application and the
//! single continuation call; the composed result is identical regardless of
//! completion order.
//!
//! [`apply`] 将两个*独立的*异步值——没有顺序关系、可能在不同线程上完成、
//! 可能并发完成——汇合为一个。每个组合实例恰好拥有一个小的共享
//! [`JoinCell`]，作用域仅限该实例，没有全局状态，也不阻塞。后到达的一侧
//! 执行函数应用和唯一一次 continuation 调用；无论完成顺序如何，组合结果
//! 都相同。
//!
//! **Key design points / 关键设计点**:
//! - Atomic state machine instead of a held lock / 原子状态机而非持有的锁
//! - The continuation is never invoked while any synchronization is held,
//!   so continuations may freely build further combinators re-entrantly /
//!   调用 continuation 时不持有任何同步，因此 continuation 可以自由地
//!   重入式构建更多组合子
//! - Arriving values are moved exactly once, never copied and discarded /
//!   到达的值恰好被移动一次，绝不复制后丢弃

use crate::async_value::{Async, Continuation};
use crate::shim::atomic::{AtomicU8, Ordering};
use crate::shim::cell::UnsafeCell;
use crate::shim::sync::Arc;

// Join cell states. Whoever fails the EMPTY -> *_READY transition is the
// second arrival and alone drains the cell.
const EMPTY: u8 = 0;
const FN_READY: u8 = 1;
const ARG_READY: u8 = 2;

/// Shared two-slot join state, jointly owned by the two completion closures
/// of an [`apply`] instance and released when the last of them drops.
///
/// [`apply`] 实例的两个完成闭包共同拥有的双槽汇合状态，最后一个闭包释放时
/// 随之释放。
struct JoinCell<F, A, B> {
    state: AtomicU8,
    func: UnsafeCell<Option<F>>,
    arg: UnsafeCell<Option<A>>,
    cont: UnsafeCell<Option<Continuation<B>>>,
}

// SAFETY: access to the three slots is synchronized by the atomic state
// machine. Each side writes only its own slot before publishing via the CAS;
// the slots and the continuation are drained only by the single side that
// loses the CAS, whose failed exchange orders those reads after the winner's
// release store. The continuation box is itself Send.
unsafe impl<F: Send, A: Send, B> Send for JoinCell<F, A, B> {}
unsafe impl<F: Send, A: Send, B> Sync for JoinCell<F, A, B> {}

impl<F, A, B> JoinCell<F, A, B>
where
    F: FnOnce(A) -> B,
{
    fn new(cont: Continuation<B>) -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            func: UnsafeCell::new(None),
            arg: UnsafeCell::new(None),
            cont: UnsafeCell::new(Some(cont)),
        }
    }

    /// Called when the pending function arrives.
    #[inline]
    fn complete_func(&self, f: F) {
        // SAFETY: the function branch is invoked at most once and is the only
        // writer of this slot; any reader is ordered after the CAS below.
        self.func.with_mut(|slot| unsafe { *slot = Some(f) });

        if self
            .state
            .compare_exchange(EMPTY, FN_READY, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // The argument is already published: this side is second.
            self.finish();
        }
    }

    /// Called when the pending argument arrives.
    #[inline]
    fn complete_arg(&self, a: A) {
        // SAFETY: the argument branch is invoked at most once and is the only
        // writer of this slot; any reader is ordered after the CAS below.
        self.arg.with_mut(|slot| unsafe { *slot = Some(a) });

        if self
            .state
            .compare_exchange(EMPTY, ARG_READY, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // The function is already published: this side is second.
            self.finish();
        }
    }

    /// Drain both slots, apply, and invoke the continuation.
    ///
    /// Reached by exactly one side: the one whose compare-exchange failed.
    /// Nothing is held while the continuation runs.
    fn finish(&self) {
        // SAFETY: exclusive access — only the single losing side reaches
        // here, exactly once, ordered after both publications.
        let func = self.func.with_mut(|slot| unsafe { (*slot).take() });
        let arg = self.arg.with_mut(|slot| unsafe { (*slot).take() });
        let cont = self.cont.with_mut(|slot| unsafe { (*slot).take() });

        if let (Some(func), Some(arg), Some(cont)) = (func, arg, cont) {
            cont(func(arg));
        }
    }
}

/// Apply an asynchronous function to an asynchronous argument.
///
/// Both inputs are assumed independent: they may complete in either order,
/// on different threads, possibly near-simultaneously. Exactly one side
/// observes the other's publication and alone performs the application and
/// the single continuation call — the composed continuation is invoked
/// exactly once, with the same result, regardless of completion order.
///
/// 将异步函数应用于异步参数。
///
/// 两个输入被假定为独立的：它们可以以任意顺序、在不同线程上、甚至几乎同时
/// 完成。恰好一侧观察到另一侧已发布，并独自执行函数应用和唯一一次
/// continuation 调用——无论完成顺序如何，组合的 continuation 恰好被调用
/// 一次，结果相同。
///
/// # Examples
///
/// ```
/// use lite_cps::{Async, apply};
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// apply(Async::pure(|x: i32| x + 3), Async::pure(4)).run(move |v| tx.send(v).unwrap());
/// assert_eq!(rx.recv().unwrap(), 7);
/// ```
pub fn apply<F, A, B>(af: Async<F>, aa: Async<A>) -> Async<B>
where
    F: FnOnce(A) -> B + Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
{
    Async::new(move |cont| {
        let cell = Arc::new(JoinCell::new(cont));

        let func_side = cell.clone();
        af.run(move |f| func_side.complete_func(f));
        aa.run(move |a| cell.complete_arg(a));
    })
}

/// Apply a two-argument combining function to two independent results once
/// both are available: `concurrently(aa, ab, f)` = `apply(aa.map(curry f), ab)`.
///
/// 当两个独立结果都可用时，对它们应用双参数合并函数：
/// `concurrently(aa, ab, f)` = `apply(aa.map(curry f), ab)`。
///
/// # Examples
///
/// ```
/// use lite_cps::{Async, concurrently};
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// concurrently(Async::pure(3), Async::pure(4), |a, b| a + b)
///     .run(move |v| tx.send(v).unwrap());
/// assert_eq!(rx.recv().unwrap(), 7);
/// ```
pub fn concurrently<A, B, C, F>(aa: Async<A>, ab: Async<B>, f: F) -> Async<C>
where
    A: Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
    F: FnOnce(A, B) -> C + Send + 'static,
{
    apply(aa.map(move |a| move |b: B| f(a, b)), ab)
}

impl<A: Send + 'static> Async<A> {
    /// Pair this result with another independent result.
    ///
    /// Payload-free sides pair as `()`, so pairing is always well-typed.
    /// Also available as the `&` operator.
    ///
    /// 将此结果与另一个独立结果配对。
    ///
    /// 无载荷一侧以 `()` 参与配对，因此配对总是类型良好的。
    /// 也可以使用 `&` 运算符。
    ///
    /// # Examples
    ///
    /// ```
    /// use lite_cps::Async;
    /// use std::sync::mpsc;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// (Async::pure(1) & Async::pure("left")).run(move |v| tx.send(v).unwrap());
    /// assert_eq!(rx.recv().unwrap(), (1, "left"));
    /// ```
    #[inline]
    pub fn zip<B: Send + 'static>(self, other: Async<B>) -> Async<(A, B)> {
        concurrently(self, other, |a, b| (a, b))
    }
}

impl<A: Send + 'static, B: Send + 'static> core::ops::BitAnd<Async<B>> for Async<A> {
    type Output = Async<(A, B)>;

    #[inline]
    fn bitand(self, rhs: Async<B>) -> Async<(A, B)> {
        self.zip(rhs)
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier, mpsc};
    use std::time::Duration;

    /// A producer that completes on a separate thread once `barrier` opens
    fn from_thread<T: Send + 'static>(barrier: Arc<Barrier>, value: T) -> Async<T> {
        Async::new(move |cont| {
            std::thread::spawn(move || {
                barrier.wait();
                cont(value);
            });
        })
    }

    #[test]
    fn test_apply_both_pure() {
        let (tx, rx) = mpsc::channel();
        apply(Async::pure(|x: i32| x + 3), Async::pure(4)).run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn test_apply_function_arrives_last() {
        let (tx, rx) = mpsc::channel();
        let af = Async::new(|cont: Continuation<fn(i32) -> i32>| {
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(10));
                cont(|x| x * 2);
            });
        });
        apply(af, Async::pure(21)).run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }

    #[test]
    fn test_apply_argument_arrives_last() {
        let (tx, rx) = mpsc::channel();
        let aa = Async::new(|cont: Continuation<i32>| {
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(10));
                cont(21);
            });
        });
        apply(Async::pure(|x: i32| x * 2), aa).run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }

    #[test]
    fn test_apply_moves_values_once() {
        // Non-Copy payloads travel by move through the cell
        let (tx, rx) = mpsc::channel();
        apply(
            Async::pure(|s: String| s.len()),
            Async::pure(String::from("seven!!")),
        )
        .run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn test_concurrently_pure_scenario() {
        // The (+3, +4) => 7 composition, deterministically
        let (tx, rx) = mpsc::channel();
        concurrently(Async::pure(3), Async::pure(4), |a, b| a + b)
            .run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn test_zip_operator_pairs_results() {
        let (tx, rx) = mpsc::channel();
        (Async::pure(1) & Async::pure("right")).run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), (1, "right"));
    }

    #[test]
    fn test_zip_unit_side_pairs_as_unit() {
        // A payload-free side participates as ()
        let (tx, rx) = mpsc::channel();
        (Async::pure(()) & Async::pure(5)).run(move |v| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), ((), 5));
    }

    #[test]
    fn test_continuation_may_reenter_combinators() {
        // The continuation itself builds and runs another apply; nothing is
        // held across the call, so this must not deadlock.
        let (tx, rx) = mpsc::channel();
        apply(Async::pure(|x: i32| x + 1), Async::pure(1)).run(move |two| {
            apply(Async::pure(move |x: i32| x + two), Async::pure(40))
                .run(move |v| tx.send(v).unwrap());
        });
        assert_eq!(rx.try_recv().unwrap(), 42);
    }

    #[test]
    fn test_apply_exactly_once_under_contention() {
        // Both sides released simultaneously from independent threads,
        // repeated to cover both interleavings.
        const TRIALS: usize = 200;

        for _ in 0..TRIALS {
            let barrier = Arc::new(Barrier::new(2));
            let af = from_thread(barrier.clone(), |x: i32| x + 3);
            let aa = from_thread(barrier, 4);

            let count = Arc::new(AtomicUsize::new(0));
            let c = count.clone();
            let (tx, rx) = mpsc::channel();

            apply(af, aa).run(move |v| {
                c.fetch_add(1, Ordering::SeqCst);
                tx.send(v).unwrap();
            });

            assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
            // No second delivery
            assert!(rx.recv_timeout(Duration::from_millis(1)).is_err());
            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }
}
