//! Trial-deletion cycle collector.
//!
//! Reference counting alone never frees containers that refer to each other.
//! The [`Collector`] tracks containers weakly and, on [`Collector::collect`],
//! finds the tracked containers that are only referenced from inside the
//! tracked graph, then clears their cells. Clearing releases the inner
//! references, and ordinary reference counting frees the rest.
//!
//! # Algorithm
//!
//! 1. every live tracked container starts with `gc_refs` equal to its strong
//!    count, not counting the collector's own temporary reference;
//! 2. every edge reported by [`Trace`](super::Trace) from one tracked
//!    container to another subtracts one from the target;
//! 3. containers left with `gc_refs > 0` are referenced from outside, and
//!    everything reachable from them through edges stays alive;
//! 4. every other container is garbage and is cleared.
//!
//! # Examples
//!
//! ```rust
//! use slotted::gc::{Collector, Trace, Tracer};
//! use slotted::slots::SlotContainer;
//!
//! enum Value {
//!     Number(i64),
//!     Slots(SlotContainer<Value>),
//! }
//!
//! impl Trace for Value {
//!     fn trace(&self, tracer: &mut Tracer<'_>) {
//!         if let Self::Slots(slots) = self {
//!             tracer.visit(slots);
//!         }
//!     }
//! }
//!
//! let mut collector = Collector::default();
//! let node: SlotContainer<Value> = vec![Value::Number(1), Value::Number(2)].into();
//! collector.track(&node);
//! node.set(1, Value::Slots(node.clone())).unwrap();
//! drop(node);
//!
//! let stats = collector.collect();
//! assert_eq!(stats.unreachable, 1);
//! assert_eq!(collector.tracked_count(), 0);
//! ```

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::trace::{Collectable, ObjectId, Trace};
use crate::slots::{ReferenceCounter, SlotContainer, WeakReference};

/// Default number of tracked allocations between automatic collections.
pub const DEFAULT_THRESHOLD: usize = 700;

/// Runtime configuration of a [`Collector`].
///
/// # Examples
///
/// ```rust
/// use slotted::gc::CollectorConfig;
///
/// let config = CollectorConfig::default().with_threshold(64);
/// assert_eq!(config.threshold, 64);
/// assert!(config.enabled);
/// assert!(!CollectorConfig::disabled().enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollectorConfig {
    /// Tracked allocations after which [`Collector::maybe_collect`] runs a
    /// collection.
    pub threshold: usize,
    /// Whether [`Collector::maybe_collect`] collects at all.
    pub enabled: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            enabled: true,
        }
    }
}

impl CollectorConfig {
    /// Returns this configuration with a different threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns a configuration that never collects automatically.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            enabled: false,
        }
    }
}

/// Outcome of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionStats {
    /// Live tracked containers that were examined.
    pub examined: usize,
    /// Containers found unreachable and cleared.
    pub unreachable: usize,
}

/// Tracks containers and breaks unreachable reference cycles between them.
pub struct Collector {
    config: CollectorConfig,
    tracked: Vec<WeakReference<dyn Collectable>>,
    allocations_since_collect: usize,
    prune_at: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Collector")
            .field("config", &self.config)
            .field("tracked", &self.tracked.len())
            .field("allocations_since_collect", &self.allocations_since_collect)
            .field("prune_at", &self.prune_at)
            .finish()
    }
}

impl Collector {
    /// Creates a collector with the given configuration.
    #[must_use]
    pub const fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            tracked: Vec::new(),
            allocations_since_collect: 0,
            prune_at: Self::prune_floor(config),
        }
    }

    const fn prune_floor(config: CollectorConfig) -> usize {
        let threshold = if config.threshold == 0 { 1 } else { config.threshold };
        threshold.saturating_mul(2)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> CollectorConfig {
        self.config
    }

    /// Starts tracking `container`.
    ///
    /// Only a weak reference is kept, so tracking never extends a
    /// container's lifetime. Tracking the same container twice is harmless.
    ///
    /// Entries of freed containers are pruned here as well as in
    /// [`collect`](Self::collect), so the tracked list stays bounded even
    /// when automatic collection is disabled.
    pub fn track<T: Trace + 'static>(&mut self, container: &SlotContainer<T>) {
        let weak = ReferenceCounter::downgrade(container.storage());
        self.tracked.push(weak);
        self.allocations_since_collect += 1;
        if self.tracked.len() > self.prune_at {
            self.prune();
        }
        tracing::trace!(
            length = container.len(),
            tracked = self.tracked.len(),
            "tracking slot container"
        );
    }

    /// Returns the number of tracked entries, including ones whose container
    /// has been freed since the last prune.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Returns the number of containers tracked since the last collection.
    #[must_use]
    pub const fn allocations_since_collect(&self) -> usize {
        self.allocations_since_collect
    }

    /// Returns `true` if [`maybe_collect`](Self::maybe_collect) would collect.
    #[must_use]
    pub const fn should_collect(&self) -> bool {
        self.config.enabled && self.allocations_since_collect >= self.config.threshold
    }

    /// Collects if the allocation threshold has been reached.
    pub fn maybe_collect(&mut self) -> Option<CollectionStats> {
        if self.should_collect() {
            Some(self.collect())
        } else {
            None
        }
    }

    /// Runs a full collection and clears every unreachable container.
    pub fn collect(&mut self) -> CollectionStats {
        let mut live: Vec<ReferenceCounter<dyn Collectable>> = Vec::with_capacity(self.tracked.len());
        let mut index_of: FxHashMap<ObjectId, usize> = FxHashMap::default();
        for weak in &self.tracked {
            let Some(object) = weak.upgrade() else {
                continue;
            };
            let id = object.object_id();
            if index_of.contains_key(&id) {
                continue;
            }
            index_of.insert(id, live.len());
            live.push(object);
        }

        // our own upgraded reference is not a real owner
        let mut gc_refs: Vec<usize> = live
            .iter()
            .map(|object| ReferenceCounter::strong_count(object) - 1)
            .collect();

        let mut edges: Vec<Vec<usize>> = Vec::with_capacity(live.len());
        let mut scratch = Vec::new();
        for (index, object) in live.iter().enumerate() {
            scratch.clear();
            if !object.traverse_edges(&mut scratch) {
                // cells in use; treat as externally referenced
                gc_refs[index] = gc_refs[index].max(1);
            }
            let targets: Vec<usize> = scratch
                .iter()
                .filter_map(|id| index_of.get(id).copied())
                .collect();
            for &target in &targets {
                gc_refs[target] = gc_refs[target].saturating_sub(1);
            }
            edges.push(targets);
        }

        let mut reachable = vec![false; live.len()];
        let mut pending: VecDeque<usize> = (0..live.len()).filter(|&index| gc_refs[index] > 0).collect();
        for &root in &pending {
            reachable[root] = true;
        }
        while let Some(index) = pending.pop_front() {
            for &target in &edges[index] {
                if !reachable[target] {
                    reachable[target] = true;
                    pending.push_back(target);
                }
            }
        }

        let mut unreachable = 0;
        for (object, _) in live.iter().zip(&reachable).filter(|(_, reachable)| !**reachable) {
            object.clear_cells();
            unreachable += 1;
        }

        let stats = CollectionStats {
            examined: live.len(),
            unreachable,
        };
        // releasing the upgraded references frees the cleared containers
        drop(live);
        self.prune();
        self.allocations_since_collect = 0;

        tracing::debug!(
            examined = stats.examined,
            unreachable = stats.unreachable,
            remaining = self.tracked.len(),
            "slot container collection finished"
        );
        stats
    }

    /// Drops entries whose container has been freed.
    fn prune(&mut self) {
        let before = self.tracked.len();
        self.tracked.retain(|weak| weak.strong_count() > 0);
        // amortized: the next prune waits until the live set doubles
        self.prune_at = self
            .tracked
            .len()
            .saturating_mul(2)
            .max(Self::prune_floor(self.config));
        tracing::trace!(
            pruned = before - self.tracked.len(),
            remaining = self.tracked.len(),
            "pruned freed slot containers"
        );
    }
}
