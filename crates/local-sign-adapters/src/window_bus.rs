//! EIP-6963 discovery over the browser `window`.

use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use local_sign_core::{AnnouncementHandler, EventBus, PortError, ProviderDetail, ProviderInfo};

use crate::Eip1193Adapter;

pub const ANNOUNCE_PROVIDER_EVENT: &str = "eip6963:announceProvider";
pub const REQUEST_PROVIDER_EVENT: &str = "eip6963:requestProvider";

#[derive(Debug, Clone)]
pub struct WindowEventBus {
    window: web_sys::Window,
}

impl WindowEventBus {
    pub fn new() -> Result<Self, PortError> {
        let window =
            web_sys::window().ok_or_else(|| PortError::NotFound("window".to_owned()))?;
        Ok(Self { window })
    }
}

impl EventBus for WindowEventBus {
    type Provider = Eip1193Adapter;

    fn subscribe_announcements(
        &self,
        handler: AnnouncementHandler<Eip1193Adapter>,
    ) -> Result<(), PortError> {
        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            match decode_announcement(&event) {
                Ok(detail) => handler(Rc::new(detail)),
                Err(e) => warn!(error = %e, "ignoring malformed provider announcement"),
            }
        });
        self.window
            .add_event_listener_with_callback(
                ANNOUNCE_PROVIDER_EVENT,
                listener.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("subscribe {ANNOUNCE_PROVIDER_EVENT} failed: {e:?}")))?;
        // No teardown: the listener lives as long as the page.
        listener.forget();
        Ok(())
    }

    fn request_providers(&self) -> Result<(), PortError> {
        let event = web_sys::Event::new(REQUEST_PROVIDER_EVENT)
            .map_err(|e| PortError::Transport(format!("create {REQUEST_PROVIDER_EVENT} failed: {e:?}")))?;
        self.window
            .dispatch_event(&event)
            .map_err(|e| PortError::Transport(format!("dispatch {REQUEST_PROVIDER_EVENT} failed: {e:?}")))?;
        Ok(())
    }
}

fn decode_announcement(event: &web_sys::Event) -> Result<ProviderDetail<Eip1193Adapter>, PortError> {
    let detail = event
        .dyn_ref::<web_sys::CustomEvent>()
        .ok_or_else(|| PortError::Decode("announcement is not a CustomEvent".to_owned()))?
        .detail();
    let info: ProviderInfo = serde_wasm_bindgen::from_value(read(&detail, "info")?)
        .map_err(|e| PortError::Decode(format!("provider info: {e}")))?;
    let provider = read(&detail, "provider")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::Decode(format!("{} announced without a provider", info.name)));
    }
    Ok(ProviderDetail {
        info,
        provider: Eip1193Adapter::from_js(provider),
    })
}

fn read(target: &JsValue, key: &str) -> Result<JsValue, PortError> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| PortError::Decode(format!("read detail.{key} failed: {e:?}")))
}
