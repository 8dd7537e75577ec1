use std::cell::Cell;
use std::rc::Rc;

use tracing::{error, info, warn};

use crate::bus::EventBus;
use crate::domain::{ProviderButton, ProviderDetail};
use crate::ports::{
    ClickHandler, PortError, ProviderListPort, ProviderPort, ServerPort, TaskSpawner,
};
use crate::workflow::ConnectWorkflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Installed,
    AlreadyInstalled,
}

/// Turns provider announcements into buttons that start the connect workflow.
pub struct ProviderRegistry<B, S, T> {
    bus: B,
    workflow: Rc<ConnectWorkflow<S>>,
    spawner: Rc<T>,
    installed: Cell<bool>,
}

impl<B, S, T> ProviderRegistry<B, S, T>
where
    B: EventBus,
    B::Provider: ProviderPort + 'static,
    S: ServerPort + 'static,
    T: TaskSpawner + 'static,
{
    pub fn new(bus: B, workflow: ConnectWorkflow<S>, spawner: T) -> Self {
        Self {
            bus,
            workflow: Rc::new(workflow),
            spawner: Rc::new(spawner),
            installed: Cell::new(false),
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn workflow(&self) -> &ConnectWorkflow<S> {
        &self.workflow
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get()
    }

    /// Subscribes to announcements, appending one button per provider to
    /// `container`, then asks providers to announce themselves.
    ///
    /// Only the first call installs anything. Announcements dispatched
    /// before it are not replayed.
    pub fn list_providers<L>(&self, container: L) -> Result<Registration, PortError>
    where
        L: ProviderListPort + 'static,
    {
        if self.installed.replace(true) {
            warn!("provider listener already installed; ignoring repeated registration");
            return Ok(Registration::AlreadyInstalled);
        }

        let workflow = Rc::clone(&self.workflow);
        let spawner = Rc::clone(&self.spawner);
        let on_announce = move |detail: Rc<ProviderDetail<B::Provider>>| {
            info!(
                name = %detail.info.name,
                rdns = %detail.info.rdns,
                uuid = %detail.info.uuid,
                "provider announced"
            );
            let button = ProviderButton::from_info(&detail.info);
            let on_click = click_handler(Rc::clone(&workflow), Rc::clone(&spawner), detail);
            if let Err(e) = container.append_button(button, on_click) {
                error!(error = %e, "failed to append provider button");
            }
        };

        if let Err(e) = self.bus.subscribe_announcements(Box::new(on_announce)) {
            self.installed.set(false);
            return Err(e);
        }
        self.bus.request_providers()?;
        info!("provider listener installed");
        Ok(Registration::Installed)
    }
}

fn click_handler<P, S, T>(
    workflow: Rc<ConnectWorkflow<S>>,
    spawner: Rc<T>,
    detail: Rc<ProviderDetail<P>>,
) -> ClickHandler
where
    P: ProviderPort + 'static,
    S: ServerPort + 'static,
    T: TaskSpawner + 'static,
{
    Box::new(move || {
        let workflow = Rc::clone(&workflow);
        let detail = Rc::clone(&detail);
        spawner.spawn(Box::pin(async move {
            if let Err(e) = workflow.connect(&detail).await {
                error!(
                    wallet = %detail.info.name,
                    error = %e,
                    "unhandled failure while reporting completion"
                );
            }
        }));
    })
}
