//! Console logging that also works off-wasm (native builds, tests).

#[cfg(target_arch = "wasm32")]
pub fn warn(message: &str) {
    gloo::console::warn!(message);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(message: &str) {
    eprintln!("WARN {message}");
}

#[cfg(target_arch = "wasm32")]
pub fn error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(message: &str) {
    eprintln!("ERROR {message}");
}

#[cfg(target_arch = "wasm32")]
pub fn debug(message: &str) {
    gloo::console::debug!(message);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn debug(message: &str) {
    let _ = message;
}
