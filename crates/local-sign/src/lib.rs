//! local-sign: lists the wallets a page can see and sends the local sign
//! server's transaction through the one the user picks.

#[cfg(not(target_arch = "wasm32"))]
pub mod headless;
#[cfg(target_arch = "wasm32")]
mod web;
