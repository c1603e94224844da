//! Cycle collector cooperation.
//!
//! Containers free their elements deterministically when their last handle
//! is dropped. Containers that refer to each other never reach that point on
//! their own; this module finds such groups and clears them.
//!
//! - [`Trace`]: reports the container handles a value owns
//! - [`Collector`]: tracks containers and clears unreachable cycles
//! - [`CollectorConfig`]: automatic collection threshold
//!
//! With the `derive` feature, `#[derive(Trace)]` implements [`Trace`] for
//! structs and enums by tracing every field; `#[trace(skip)]` leaves a field
//! out.
//!
//! # Examples
//!
//! ```rust
//! use slotted::gc::{Collector, Trace};
//! use slotted::slots::SlotContainer;
//!
//! #[derive(Clone, Trace)]
//! enum Item {
//!     Scalar(i64),
//!     Nested(SlotContainer<Item>),
//! }
//!
//! let mut collector = Collector::default();
//! let outer: SlotContainer<Item> = vec![Item::Scalar(0)].into();
//! collector.track(&outer);
//! outer.set(0, Item::Nested(outer.clone())).unwrap();
//!
//! // still referenced from here
//! assert_eq!(collector.collect().unreachable, 0);
//!
//! drop(outer);
//! assert_eq!(collector.collect().unreachable, 1);
//! ```

mod collector;
mod trace;

pub use collector::CollectionStats;
pub use collector::Collector;
pub use collector::CollectorConfig;
pub use collector::DEFAULT_THRESHOLD;
pub use trace::ObjectId;
pub use trace::Trace;
pub use trace::Tracer;
pub use trace::reported_edges;

#[cfg(feature = "derive")]
pub use slotted_derive::Trace;
