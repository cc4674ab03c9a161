//! Shim module to abstract over core and loom primitives.
//!
//! The join and race cells are built on atomics and `UnsafeCell`. This module
//! provides a unified interface that transparently switches between the `core`
//! implementation (for production) and the `loom` implementation (for model
//! checking with `--features loom`).
//!
//! 连接单元和竞争单元基于原子操作和 `UnsafeCell` 构建。此模块提供统一接口，
//! 在 `core` 实现（生产环境）和 `loom` 实现（使用 `--features loom` 进行
//! 模型检查）之间透明切换。

#[cfg(not(feature = "loom"))]
pub(crate) mod atomic {
    pub use core::sync::atomic::*;
}

#[cfg(feature = "loom")]
pub(crate) mod atomic {
    pub use loom::sync::atomic::*;
}

#[cfg(not(feature = "loom"))]
pub(crate) mod cell {
    /// `UnsafeCell` with the loom access API, so production code and loom
    /// models share one call shape.
    ///
    /// 具有 loom 访问 API 的 `UnsafeCell`，使生产代码和 loom 模型共享同一调用形式。
    #[derive(Debug)]
    #[repr(transparent)]
    pub struct UnsafeCell<T: ?Sized>(core::cell::UnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        #[inline]
        pub const fn new(data: T) -> UnsafeCell<T> {
            UnsafeCell(core::cell::UnsafeCell::new(data))
        }
    }

    impl<T: ?Sized> UnsafeCell<T> {
        #[inline]
        pub fn with_mut<F, R>(&self, f: F) -> R
        where
            F: FnOnce(*mut T) -> R,
        {
            f(self.0.get())
        }
    }
}

#[cfg(feature = "loom")]
pub(crate) mod cell {
    pub use loom::cell::UnsafeCell;
}

#[cfg(not(feature = "loom"))]
pub(crate) mod sync {
    pub use std::sync::Arc;
}

#[cfg(feature = "loom")]
pub(crate) mod sync {
    pub use loom::sync::Arc;
}
