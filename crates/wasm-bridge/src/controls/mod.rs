pub mod window_listener;

pub use window_listener::WindowListener;
