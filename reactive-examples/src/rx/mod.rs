//! Reactor-style reactive programming for Rust
//!
//! [`Mono`] pipelines produce zero or one value, [`Flux`] pipelines a finite
//! sequence. Both are lazy recipes over futures streams, evaluated on a
//! Tokio-backed [`Scheduler`].

pub mod flux;
pub mod mono;
pub mod operators;
pub mod scheduler;
pub mod subscription;

pub use flux::Flux;
pub use mono::Mono;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use subscription::{Subscription, SubscriptionState};

// Re-export free-standing operators
pub use operators::{delay_elements, do_on_complete};
