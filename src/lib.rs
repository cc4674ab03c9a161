//! # lite-cps
//!
//! Lightweight continuation-passing async combinators for Rust.
//!
//! 轻量级、基于 continuation 传递的 Rust 异步组合子库。
//!
//! ## Overview / 概述
//!
//! `lite-cps` is a small algebra for composing values that become available
//! later, with no built-in scheduler, thread pool, or I/O. An [`Async<T>`]
//! is purely reactive: it does nothing until subscribed with a continuation,
//! and that continuation is invoked at most once, eventually, from an
//! unspecified thread — synchronously on the subscriber's stack, or from
//! whatever thread the external producer completes on.
//!
//! `lite-cps` 是用于组合稍后才可用的值的小型代数，不内置调度器、线程池或
//! I/O。[`Async<T>`] 是纯被动的：在用 continuation 订阅之前什么都不做，而
//! 该 continuation 最终至多被调用一次，调用线程不确定——可能在订阅者的栈上
//! 同步调用，也可能在外部生产者完成所在的任意线程上调用。
//!
//! ## Key Features / 主要特性
//!
//! - **One small allocation per composition**: each `apply`/`race` instance
//!   owns exactly one `Arc`-shared cell, nothing global
//! - **Lock-free join and settle**: atomic state machines decide which
//!   completion callback finishes the composition
//! - **Never blocking**: "waiting" is simply not having called the
//!   continuation yet
//! - **Uniform unit handling**: payload-free completions are plain
//!   `Async<()>`; there are no separate void code paths
//!
//! - **每次组合仅一次小分配**：每个 `apply`/`race` 实例恰好拥有一个
//!   `Arc` 共享单元，没有全局状态
//! - **无锁汇合与落定**：原子状态机决定哪个完成回调结束组合
//! - **永不阻塞**："等待"仅表现为尚未调用 continuation
//! - **统一的 unit 处理**：无载荷的完成就是普通的 `Async<()>`，没有单独的
//!   void 代码路径
//!
//! ## Modules / 模块
//!
//! ### [`async_value`]
//!
//! The [`Async<T>`] primitive with its pointwise and sequential combinators:
//! [`Async::pure`], [`Async::map`], [`Async::and_then`], [`Async::then`],
//! and the never-completing identity [`Async::zero`].
//!
//! [`Async<T>`] 原语及其逐点与顺序组合子：[`Async::pure`]、[`Async::map`]、
//! [`Async::and_then`]、[`Async::then`]，以及永不完成的单位元
//! [`Async::zero`]。
//!
//! ### [`join`]
//!
//! Parallel joining of two independent results: [`apply`], [`concurrently`],
//! [`Async::zip`] and the `&` operator. Correct for any completion order and
//! any completion thread, invoking the composed continuation exactly once.
//!
//! 两个独立结果的并行汇合：[`apply`]、[`concurrently`]、[`Async::zip`] 与
//! `&` 运算符。对任意完成顺序和任意完成线程都正确，组合的 continuation
//! 恰好被调用一次。
//!
//! ### [`race`]
//!
//! Winner-take-all choice: [`race()`](race::race), [`Async::race`] and the
//! `|` operator, resolving to an [`Either`] tagged with the actual winner.
//!
//! 胜者全得的选择：[`race()`](race::race)、[`Async::race`] 与 `|` 运算符，
//! 解析为以实际胜者打标签的 [`Either`]。
//!
//! ### [`either`]
//!
//! The two-variant tagged value [`Either<L, R>`] carrying heterogeneous race
//! outcomes.
//!
//! 承载异质竞争结果的双变体标签值 [`Either<L, R>`]。
//!
//! ## Examples / 示例
//!
//! ### Joining two thread-completed results
//!
//! ```
//! use lite_cps::{Async, concurrently};
//! use std::sync::mpsc;
//! use std::thread;
//!
//! let left = Async::new(|cont| { thread::spawn(move || cont(3)); });
//! let right = Async::new(|cont| { thread::spawn(move || cont(4)); });
//!
//! let (tx, rx) = mpsc::channel();
//! concurrently(left, right, |a, b| a + b).run(move |v| tx.send(v).unwrap());
//! assert_eq!(rx.recv().unwrap(), 7);
//! ```
//!
//! ### Racing a result against "nothing"
//!
//! ```
//! use lite_cps::{Async, Either};
//! use std::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel();
//! (Async::pure("fast") | Async::<u32>::zero()).run(move |v| tx.send(v).unwrap());
//! assert_eq!(rx.recv().unwrap(), Either::Left("fast"));
//! ```
//!
//! ### Sequential chaining
//!
//! ```
//! use lite_cps::Async;
//! use std::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel();
//! Async::pure(2)
//!     .and_then(|x| Async::pure(x * 3))
//!     .then(|| Async::pure("done"))
//!     .run(move |v| tx.send(v).unwrap());
//! assert_eq!(rx.recv().unwrap(), "done");
//! ```
//!
//! ## What this layer does not do / 本层不做什么
//!
//! No cancellation, no timeout, no retry, no backpressure. The losing branch
//! of a race keeps running unobserved, and [`Async::zero`] waits forever by
//! design. Producer failures are not interpreted here either: encode them in
//! the payload (typically [`Either`]) and branch with [`Async::and_then`].
//!
//! 没有取消、超时、重试或背压。竞争中失败的分支会继续运行而不被观察，
//! [`Async::zero`] 按设计永远等待。生产者的失败本层也不做解释：请将其编码
//! 在载荷中（通常用 [`Either`]），并通过 [`Async::and_then`] 分支处理。
//!
//! ## Safety / 安全性
//!
//! The join and race cells use `unsafe` internally but expose safe APIs.
//! Safety is guaranteed through:
//!
//! 汇合单元与竞争单元在内部使用 `unsafe`，但暴露安全的 API。
//! 安全性通过以下方式保证：
//!
//! - Atomic state machines granting exclusive slot access to exactly one side
//! - Careful ordering of atomic operations
//! - Never invoking a continuation while synchronization state is held
//! - Loom model checking of the concurrent paths (`--features loom`)
//!
//! - 原子状态机将槽位的独占访问权恰好授予一侧
//! - 原子操作的仔细排序
//! - 调用 continuation 时从不持有同步状态
//! - 对并发路径进行 loom 模型检查（`--features loom`）

pub mod async_value;
pub mod either;
pub mod join;
pub mod race;
pub(crate) mod shim;

pub use async_value::{Async, Continuation};
pub use either::Either;
pub use join::{apply, concurrently};
pub use race::race;
