//! Provider discovery bus.
//!
//! Wallets announce themselves with a [`ProviderDetail`]; pages ask them to
//! do so by broadcasting a provider request. [`InMemoryEventBus`] carries
//! both directions for native runs and tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::ProviderDetail;
use crate::ports::PortError;

pub type AnnouncementHandler<P> = Box<dyn Fn(Rc<ProviderDetail<P>>)>;
pub type RequestHandler = Box<dyn Fn()>;

pub trait EventBus {
    type Provider;

    /// Registers a handler for every announcement dispatched from now on.
    fn subscribe_announcements(
        &self,
        handler: AnnouncementHandler<Self::Provider>,
    ) -> Result<(), PortError>;

    /// Broadcasts the request for providers to announce themselves.
    fn request_providers(&self) -> Result<(), PortError>;
}

pub struct InMemoryEventBus<P> {
    inner: Rc<RefCell<BusState<P>>>,
}

struct BusState<P> {
    announcement_handlers: Vec<Rc<dyn Fn(Rc<ProviderDetail<P>>)>>,
    request_handlers: Vec<Rc<dyn Fn()>>,
    announcements_dispatched: u64,
    requests_dispatched: u64,
}

impl<P> Default for InMemoryEventBus<P> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusState {
                announcement_handlers: Vec::new(),
                request_handlers: Vec::new(),
                announcements_dispatched: 0,
                requests_dispatched: 0,
            })),
        }
    }
}

impl<P> Clone for InMemoryEventBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P> InMemoryEventBus<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet side: dispatches an announcement to every current subscriber.
    pub fn announce(&self, detail: ProviderDetail<P>) {
        let handlers = {
            let mut g = self.inner.borrow_mut();
            g.announcements_dispatched = g.announcements_dispatched.saturating_add(1);
            g.announcement_handlers.clone()
        };
        let detail = Rc::new(detail);
        for handler in handlers {
            handler(Rc::clone(&detail));
        }
    }

    /// Wallet side: runs `handler` whenever a page requests providers.
    pub fn on_provider_request(&self, handler: RequestHandler) {
        self.inner
            .borrow_mut()
            .request_handlers
            .push(Rc::from(handler));
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().announcement_handlers.len()
    }

    pub fn announcements_dispatched(&self) -> u64 {
        self.inner.borrow().announcements_dispatched
    }

    pub fn requests_dispatched(&self) -> u64 {
        self.inner.borrow().requests_dispatched
    }
}

impl<P> EventBus for InMemoryEventBus<P> {
    type Provider = P;

    fn subscribe_announcements(&self, handler: AnnouncementHandler<P>) -> Result<(), PortError> {
        self.inner
            .borrow_mut()
            .announcement_handlers
            .push(Rc::from(handler));
        Ok(())
    }

    fn request_providers(&self) -> Result<(), PortError> {
        // Handlers may announce, which borrows the state again.
        let handlers = {
            let mut g = self.inner.borrow_mut();
            g.requests_dispatched = g.requests_dispatched.saturating_add(1);
            g.request_handlers.clone()
        };
        for handler in handlers {
            handler();
        }
        Ok(())
    }
}
