use std::cell::RefCell;
use std::rc::Rc;

use local_sign_core::{ClickHandler, PortError, ProviderButton, ProviderListPort};

/// Button list kept in memory; "clicking" runs the stored handler.
#[derive(Clone, Default)]
pub struct InMemoryProviderList {
    entries: Rc<RefCell<Vec<ListedButton>>>,
}

struct ListedButton {
    button: ProviderButton,
    on_click: Rc<dyn Fn()>,
}

impl InMemoryProviderList {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn buttons(&self) -> Vec<ProviderButton> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.button.clone())
            .collect()
    }

    /// Markup of every button, in append order.
    pub fn render(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.button.to_html())
            .collect()
    }

    pub fn click(&self, index: usize) -> Result<(), PortError> {
        let handler = self
            .entries
            .borrow()
            .get(index)
            .map(|entry| Rc::clone(&entry.on_click))
            .ok_or_else(|| PortError::NotFound(format!("provider button #{index}")))?;
        handler();
        Ok(())
    }

    /// Clicks the first button labelled `name`.
    pub fn click_by_name(&self, name: &str) -> Result<(), PortError> {
        let index = self
            .entries
            .borrow()
            .iter()
            .position(|entry| entry.button.name == name)
            .ok_or_else(|| PortError::NotFound(format!("provider button {name:?}")))?;
        self.click(index)
    }
}

impl ProviderListPort for InMemoryProviderList {
    fn append_button(&self, button: ProviderButton, on_click: ClickHandler) -> Result<(), PortError> {
        self.entries.borrow_mut().push(ListedButton {
            button,
            on_click: Rc::from(on_click),
        });
        Ok(())
    }
}

/// Appends `<button><img><div>name</div></button>` to a page element.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct DomProviderList {
    document: web_sys::Document,
    container: web_sys::Element,
}

#[cfg(target_arch = "wasm32")]
impl DomProviderList {
    pub fn new(container: web_sys::Element) -> Result<Self, PortError> {
        let document = container
            .owner_document()
            .ok_or_else(|| PortError::NotFound("container has no owner document".to_owned()))?;
        Ok(Self {
            document,
            container,
        })
    }

    /// Looks the container up by element id.
    pub fn mount(element_id: &str) -> Result<Self, PortError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PortError::NotFound("document".to_owned()))?;
        let container = document
            .get_element_by_id(element_id)
            .ok_or_else(|| PortError::NotFound(format!("element #{element_id}")))?;
        Ok(Self {
            document,
            container,
        })
    }

    fn create(&self, tag: &str) -> Result<web_sys::Element, PortError> {
        self.document
            .create_element(tag)
            .map_err(|e| PortError::Transport(format!("create <{tag}> failed: {e:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl ProviderListPort for DomProviderList {
    fn append_button(&self, button: ProviderButton, on_click: ClickHandler) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast};

        let dom_err = |what: &str, e: wasm_bindgen::JsValue| {
            PortError::Transport(format!("{what} failed: {e:?}"))
        };

        let element = self.create("button")?;
        let icon = self.create("img")?;
        icon.set_attribute("src", &button.icon)
            .map_err(|e| dom_err("set img src", e))?;
        icon.set_attribute("alt", &button.name)
            .map_err(|e| dom_err("set img alt", e))?;
        let label = self.create("div")?;
        label.set_text_content(Some(&button.name));
        element
            .append_child(&icon)
            .map_err(|e| dom_err("append img", e))?;
        element
            .append_child(&label)
            .map_err(|e| dom_err("append label", e))?;

        let callback = Closure::<dyn FnMut()>::new(move || on_click());
        element
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
            .map_err(|e| dom_err("bind click", e))?;
        // The button stays on the page for its whole lifetime.
        callback.forget();

        self.container
            .append_child(&element)
            .map_err(|e| dom_err("append button", e))?;
        Ok(())
    }
}
