mod health;
mod whoami;

pub use health::{health_check, readiness_check};
pub use whoami::{key_hint, whoami};
