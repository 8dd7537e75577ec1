use futures::future::LocalBoxFuture;

use local_sign_core::TaskSpawner;

/// Spawns onto the current thread's executor.
///
/// Natively this is `tokio::task::spawn_local`, so it must be used from
/// inside a `tokio::task::LocalSet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _detached = tokio::task::spawn_local(task);
        }
    }
}
