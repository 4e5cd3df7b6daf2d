//! Handles for live host registrations.
//!
//! Attaching a scroll listener or a mutation observer hands back a
//! `Subscription`. Cancelling it detaches the registration; the widget holds
//! on to it until teardown.

/// A live registration with the host environment.
pub trait Subscription {
    /// Detaches the registration. Consumes the handle.
    fn cancel(self: Box<Self>);
}

impl<F: FnOnce()> Subscription for F {
    fn cancel(self: Box<Self>) {
        (*self)()
    }
}
