//! # Reactive Examples
//!
//! Reactor-style `Mono` / `Flux` pipelines on Tokio, demonstrated over a
//! small person domain.
//!
//! ## Quick Start
//!
//! ```rust
//! use reactive_examples::{Named, Person, PersonCommand, rx::Mono};
//!
//! let fiona = Person::new("Fiona", "Glenanne");
//! let command = Mono::just(fiona.clone())
//!     .map(PersonCommand::from)
//!     .block()?;
//!
//! assert_eq!(command.describe(), fiona.describe());
//! # Ok::<(), reactive_examples::ReactiveError>(())
//! ```

pub mod error;
pub mod person;
pub mod rx;

pub use error::{ReactiveError, Result};
pub use person::{Named, Person, PersonCommand};
