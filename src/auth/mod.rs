pub mod inputs;
pub mod locks;
pub mod service;

pub use inputs::flatten_inputs;
pub use locks::UserLocks;
pub use service::{validate_username, AuthService, Registration};
