pub mod credential;

pub use credential::{credential_middleware, CurrentCredential};
