//! Browser entry points.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use local_sign_adapters::{
    DomProviderList, HttpServerAdapter, LocalSignConfig, LocalSpawner, WindowEventBus,
};
use local_sign_core::{ConnectWorkflow, PortError, ProviderRegistry};

type BrowserRegistry = ProviderRegistry<WindowEventBus, HttpServerAdapter, LocalSpawner>;

thread_local! {
    static REGISTRY: RefCell<Option<Rc<BrowserRegistry>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    tracing_wasm::set_as_global_default();

    let config = LocalSignConfig::default();
    match DomProviderList::mount(&config.mount_element_id) {
        Ok(list) => install(list, &config),
        Err(e) => {
            tracing::info!(error = %e, "no mount element; waiting for listProviders()");
            Ok(())
        }
    }
}

/// Lists announced wallets as buttons inside `element`. Only the first call per page has an effect.
#[wasm_bindgen(js_name = listProviders)]
pub fn list_providers(element: web_sys::Element) -> Result<(), JsValue> {
    let list = DomProviderList::new(element).map_err(to_js)?;
    install(list, &LocalSignConfig::default())
}

fn install(list: DomProviderList, config: &LocalSignConfig) -> Result<(), JsValue> {
    let registry = REGISTRY.with(|slot| -> Result<Rc<BrowserRegistry>, JsValue> {
        let mut slot = slot.borrow_mut();
        if let Some(registry) = slot.as_ref() {
            return Ok(Rc::clone(registry));
        }
        let server = HttpServerAdapter::with_config(config).map_err(to_js)?;
        let bus = WindowEventBus::new().map_err(to_js)?;
        let registry = Rc::new(ProviderRegistry::new(
            bus,
            ConnectWorkflow::new(server),
            LocalSpawner,
        ));
        *slot = Some(Rc::clone(&registry));
        Ok(registry)
    })?;
    // The slot is released here; announcements dispatch synchronously.
    registry.list_providers(list).map(|_| ()).map_err(to_js)
}

fn to_js(e: PortError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
