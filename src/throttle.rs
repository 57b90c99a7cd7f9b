use std::cell::Cell;
use std::rc::Rc;

/// Something that can run a callback on the next rendered frame.
pub trait FrameHost {
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Coalesces bursts of events into at most one handler run per frame.
///
/// Clones share the same pending flag, so a throttler can be captured by
/// several listeners that feed the same handler.
#[derive(Clone, Debug)]
pub struct FrameThrottler {
    name: &'static str,
    ticking: Rc<Cell<bool>>,
}

impl FrameThrottler {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ticking: Rc::new(Cell::new(false)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_pending(&self) -> bool {
        self.ticking.get()
    }

    /// Requests a frame for `handler` unless one is already pending.
    /// Returns whether a frame was requested.
    pub fn schedule<H>(&self, host: &H, handler: impl FnOnce() + 'static) -> bool
    where
        H: FrameHost + ?Sized,
    {
        if self.ticking.get() {
            return false;
        }

        self.ticking.set(true);
        let ticking = Rc::clone(&self.ticking);
        host.request_frame(Box::new(move || {
            handler();
            ticking.set(false);
        }));
        true
    }
}
