pub mod config;
pub mod eip1193;
pub mod provider_list;
pub mod server;
pub mod spawn;
#[cfg(target_arch = "wasm32")]
pub mod window_bus;

pub use config::{LocalSignConfig, RuntimeProfile};
pub use eip1193::Eip1193Adapter;
#[cfg(target_arch = "wasm32")]
pub use provider_list::DomProviderList;
pub use provider_list::InMemoryProviderList;
pub use server::HttpServerAdapter;
pub use spawn::LocalSpawner;
#[cfg(target_arch = "wasm32")]
pub use window_bus::{WindowEventBus, ANNOUNCE_PROVIDER_EVENT, REQUEST_PROVIDER_EVENT};
