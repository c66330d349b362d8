//! A minimal, dependency-free cooperative yield point, used by the genetic
//! and annealing solvers so a long-running search never blocks whichever
//! async runtime (or none) is driving it for more than one poll.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Resolves to `Ready` on its second poll. The first poll always returns
/// `Pending` after registering a wake, handing control back to the executor
/// exactly once.
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Awaiting this once gives any executor a chance to run other work before
/// the caller continues. Safe to call from a bare `futures::executor::block_on`
/// equivalent or a full multi-threaded runtime alike.
pub fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::task::{RawWaker, RawWakerVTable, Waker};

    fn noop_waker() -> Waker {
        fn clone(_: *const ()) -> RawWaker {
            raw()
        }
        fn no_op(_: *const ()) {}
        fn raw() -> RawWaker {
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        unsafe { Waker::from_raw(raw()) }
    }

    #[test]
    fn yields_pending_once_then_ready() {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut fut = Box::pin(yield_now());

        assert_eq!(fut.as_mut().poll(&mut cx), Poll::Pending);
        assert_eq!(fut.as_mut().poll(&mut cx), Poll::Ready(()));
    }
}
