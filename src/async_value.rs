//! The asynchronous-value primitive and its pointwise combinators.
//!
//! 异步值原语及其逐点组合子。
//!
//! An [`Async<T>`] is "a thing that will call a continuation with a `T`,
//! eventually, at most once, from an unspecified thread". It is purely
//! reactive: nothing happens until [`Async::run`] hands it a continuation,
//! and no scheduler, thread pool, or I/O is built in. Producers (timers,
//! completion ports, worker threads, or plain synchronous code as in
//! [`Async::pure`]) drive the continuation; this layer only composes them.
//!
//! [`Async<T>`] 是"最终至多调用一次 continuation 并传入 `T` 的东西，调用
//! 线程不确定"。它是纯被动的：在 [`Async::run`] 交给它一个 continuation 之前
//! 什么都不会发生，也不内置任何调度器、线程池或 I/O。生产者（定时器、完成
//! 端口、工作线程，或如 [`Async::pure`] 的纯同步代码）驱动 continuation；
//! 本层只负责组合它们。
//!
//! "Waiting" is represented purely by not yet having called the
//! continuation. No combinator in this crate blocks or busy-waits.
//!
//! "等待"仅表现为尚未调用 continuation。本 crate 中没有组合子会阻塞或忙等。

use core::fmt;

/// The single-shot callback an [`Async`] invokes with its result.
///
/// For payload-free completions the payload type is simply `()`; there is no
/// separate void code path anywhere in this crate.
///
/// [`Async`] 用其结果调用的一次性回调。
///
/// 对于无载荷的完成，载荷类型就是 `()`；本 crate 中不存在单独的 void 代码路径。
pub type Continuation<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// An asynchronous value: subscribe with a continuation, receive the result
/// at most once, eventually, from an unspecified thread.
///
/// 异步值：用 continuation 订阅，最终至多收到一次结果，线程不确定。
///
/// # Contract
///
/// - Once subscribed via [`run`](Async::run), the continuation is invoked
///   **at most once**. [`zero`](Async::zero) is the only sanctioned case of
///   *never* invoking it.
/// - The continuation may be invoked synchronously on the subscriber's own
///   stack (as [`pure`](Async::pure) does), re-entrantly, or from a foreign
///   thread. Subscribers must tolerate all three.
/// - No cancellation, timeout, retry, or error channel exists at this layer.
///   Producer failures are encoded in the payload type (typically
///   [`Either`](crate::Either)) and handled through
///   [`and_then`](Async::and_then).
///
/// # Examples
///
/// ```
/// use lite_cps::Async;
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// Async::pure(20).map(|x| x + 1).run(move |v| tx.send(v).unwrap());
/// assert_eq!(rx.recv().unwrap(), 21);
/// ```
pub struct Async<T> {
    run: Box<dyn FnOnce(Continuation<T>) + Send + 'static>,
}

impl<T> fmt::Debug for Async<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Async").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Async<T> {
    /// Create an asynchronous value from a producer closure.
    ///
    /// The producer receives the subscriber's continuation and must invoke
    /// it at most once, eventually, from any thread.
    ///
    /// 从生产者闭包创建异步值。
    ///
    /// 生产者收到订阅者的 continuation，必须最终至多调用一次，线程不限。
    ///
    /// # Examples
    ///
    /// ```
    /// use lite_cps::Async;
    /// use std::sync::mpsc;
    /// use std::thread;
    ///
    /// // A producer that completes from another thread
    /// let value = Async::new(|cont| {
    ///     thread::spawn(move || cont(6 * 7));
    /// });
    ///
    /// let (tx, rx) = mpsc::channel();
    /// value.run(move |v| tx.send(v).unwrap());
    /// assert_eq!(rx.recv().unwrap(), 42);
    /// ```
    #[inline]
    pub fn new(producer: impl FnOnce(Continuation<T>) + Send + 'static) -> Self {
        Self {
            run: Box::new(producer),
        }
    }

    /// Subscribe: hand this value a continuation, consuming it.
    ///
    /// The continuation may run synchronously on the current stack, or later
    /// from whatever thread the producer completes on.
    ///
    /// 订阅：将 continuation 交给此值，并消耗它。
    ///
    /// continuation 可能在当前栈上同步运行，也可能稍后在生产者完成所在的
    /// 任意线程上运行。
    #[inline]
    pub fn run(self, cont: impl FnOnce(T) + Send + 'static) {
        (self.run)(Box::new(cont));
    }

    /// Subscribe with an already-boxed continuation, avoiding a re-box when
    /// chaining combinators.
    ///
    /// 使用已装箱的 continuation 订阅，在组合子链接时避免重复装箱。
    #[inline]
    pub(crate) fn run_boxed(self, cont: Continuation<T>) {
        (self.run)(cont);
    }

    /// Lift an already-known value: the continuation is invoked
    /// synchronously, exactly once, on the subscriber's call stack, with the
    /// captured value moved into it.
    ///
    /// 提升一个已知值：continuation 在订阅者的调用栈上同步地、恰好一次地被
    /// 调用，捕获的值被移动进去。
    ///
    /// # Examples
    ///
    /// ```
    /// use lite_cps::Async;
    /// use std::sync::mpsc;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// Async::pure(String::from("ready")).run(move |v| tx.send(v).unwrap());
    /// // Already delivered, synchronously
    /// assert_eq!(rx.try_recv().unwrap(), "ready");
    /// ```
    #[inline]
    pub fn pure(value: T) -> Self {
        Self::new(move |cont| cont(value))
    }

    /// The identity element of choice composition: an asynchronous value
    /// that **never** invokes its continuation.
    ///
    /// Racing against `zero` just waits for the other side, and `zero` stands
    /// in wherever "nothing will ever arrive" is needed. It is not an error
    /// value and not cancellable: anything that synchronously waits on it
    /// will never proceed. That is working as designed — this is a
    /// non-terminating primitive.
    ///
    /// 选择组合的单位元：**永不**调用其 continuation 的异步值。
    ///
    /// 与 `zero` 竞争只是等待另一侧，凡是需要"永远不会有结果到来"之处都可用
    /// `zero`。它不是错误值，也不可取消：任何同步等待它的代码将永远无法继续。
    /// 这是设计行为——这是一个不终止的原语。
    #[inline]
    pub fn zero() -> Self {
        Self::new(|_cont| {})
    }

    /// Map a pure function over the eventual result (the functor `fmap`).
    ///
    /// Introduces no new concurrency: `f` runs on whatever thread this
    /// value's completion happens on, and at-most-once invocation is
    /// preserved.
    ///
    /// 将纯函数映射到最终结果上（函子的 `fmap`）。
    ///
    /// 不引入新的并发：`f` 在此值完成所在的线程上运行，并保持至多一次调用。
    ///
    /// # Examples
    ///
    /// ```
    /// use lite_cps::Async;
    /// use std::sync::mpsc;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// Async::pure(3).map(|x| x * x).run(move |v| tx.send(v).unwrap());
    /// assert_eq!(rx.recv().unwrap(), 9);
    /// ```
    #[inline]
    pub fn map<U, F>(self, f: F) -> Async<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Async::new(move |cont| self.run(move |value| cont(f(value))))
    }

    /// Chain a dependent asynchronous value (the monadic `bind`).
    ///
    /// On completion with `value`, `f(value)` produces the next asynchronous
    /// value, which is immediately subscribed with the outer continuation.
    /// The dependency is a direct chain, not a join of independent branches,
    /// so no shared state or synchronization is involved.
    ///
    /// 链接一个依赖的异步值（单子的 `bind`）。
    ///
    /// 完成并得到 `value` 后，`f(value)` 产生下一个异步值，并立即用外层
    /// continuation 订阅它。这种依赖是直接的链，而非独立分支的汇合，因此
    /// 不涉及共享状态或同步。
    ///
    /// # Examples
    ///
    /// ```
    /// use lite_cps::Async;
    /// use std::sync::mpsc;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// Async::pure(2)
    ///     .and_then(|x| Async::pure(x * 10))
    ///     .run(move |v| tx.send(v).unwrap());
    /// assert_eq!(rx.recv().unwrap(), 20);
    /// ```
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Async<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Async<U> + Send + 'static,
    {
        Async::new(move |cont| self.run(move |value| f(value).run_boxed(cont)))
    }

    /// Sequence a successor, discarding this value's payload.
    ///
    /// Like [`and_then`](Async::and_then) but the successor does not depend
    /// on the predecessor's result. Unit-payload predecessors (`Async<()>`)
    /// are the degenerate case of the same contract, not a separate feature.
    ///
    /// 顺序执行后继，丢弃此值的载荷。
    ///
    /// 类似 [`and_then`](Async::and_then)，但后继不依赖前驱的结果。无载荷
    /// 前驱（`Async<()>`）是同一契约的退化情形，而非单独的特性。
    #[inline]
    pub fn then<U, G>(self, g: G) -> Async<U>
    where
        U: Send + 'static,
        G: FnOnce() -> Async<U> + Send + 'static,
    {
        self.and_then(move |_| g())
    }
}
