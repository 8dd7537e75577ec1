pub mod bus;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod workflow;

pub use bus::{AnnouncementHandler, EventBus, InMemoryEventBus, RequestHandler};
pub use domain::{
    CompletionSignal, ProviderButton, ProviderDetail, ProviderInfo, TxParams, TxRequest,
    REJECTED_TX_HASH,
};
pub use ports::{
    ClickHandler, PortError, ProviderError, ProviderListPort, ProviderPort, ServerPort,
    TaskSpawner, USER_REJECTED_CODE,
};
pub use registry::{ProviderRegistry, Registration};
pub use workflow::{ConnectError, ConnectOutcome, ConnectWorkflow};
