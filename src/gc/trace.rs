//! Edge reporting for the cycle collector.
//!
//! An element type implements [`Trace`] by reporting, through a [`Tracer`],
//! every [`SlotContainer`] handle it owns. The collector uses those edges to
//! tell references held inside the tracked graph from references held by
//! the rest of the program.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::slots::{SlotContainer, SlotStorage};

/// Identity of a container's storage, stable for as long as it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    fn of_storage<T>(storage: &SlotStorage<T>) -> Self {
        Self(std::ptr::from_ref(storage).cast::<()>().addr())
    }
}

impl<T> SlotContainer<T> {
    /// Returns the identity the collector uses for this container.
    ///
    /// Handles that share storage have the same identity.
    #[must_use]
    pub fn object_id(&self) -> ObjectId {
        ObjectId::of_storage(self.storage())
    }
}

/// Collects the container edges reported by [`Trace`] implementations.
pub struct Tracer<'a> {
    edges: &'a mut Vec<ObjectId>,
}

impl<'a> Tracer<'a> {
    pub(crate) const fn new(edges: &'a mut Vec<ObjectId>) -> Self {
        Self { edges }
    }

    /// Reports one owned container handle.
    #[inline]
    pub fn visit<T>(&mut self, container: &SlotContainer<T>) {
        self.edges.push(container.object_id());
    }
}

/// Returns the identities `value` reports when traced, in report order.
///
/// ```rust
/// use slotted::gc::reported_edges;
/// use slotted::slots::SlotContainer;
///
/// let child: SlotContainer<i32> = (0..2).collect();
/// let value = (Some(child.clone()), 7_u8, vec![child.clone()]);
/// assert_eq!(reported_edges(&value), vec![child.object_id(), child.object_id()]);
/// ```
#[must_use]
pub fn reported_edges<V: Trace + ?Sized>(value: &V) -> Vec<ObjectId> {
    let mut edges = Vec::new();
    value.trace(&mut Tracer::new(&mut edges));
    edges
}

/// Reports the container handles a value owns.
///
/// Each owned handle must be reported exactly once per call. Under-reporting
/// only keeps garbage alive; over-reporting can make the collector clear a
/// container that is still in use.
///
/// Shared handles such as `Rc<U>` are not traced: the collector cannot know
/// how many of their owners live inside the tracked graph.
///
/// # Examples
///
/// ```rust
/// use slotted::gc::{Trace, Tracer};
/// use slotted::slots::SlotContainer;
///
/// enum Node {
///     Leaf(i64),
///     Branch(SlotContainer<Node>),
/// }
///
/// impl Trace for Node {
///     fn trace(&self, tracer: &mut Tracer<'_>) {
///         if let Self::Branch(children) = self {
///             tracer.visit(children);
///         }
///     }
/// }
/// ```
pub trait Trace {
    /// Reports every owned container handle to `tracer`.
    fn trace(&self, tracer: &mut Tracer<'_>);
}

macro_rules! impl_trace_for_leaf {
    ($($type:ty),* $(,)?) => {
        $(
            impl Trace for $type {
                #[inline]
                fn trace(&self, _tracer: &mut Tracer<'_>) {}
            }
        )*
    };
}

impl_trace_for_leaf!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    str,
    String,
);

impl<T: ?Sized> Trace for &T {
    /// Borrowed values are owned elsewhere.
    #[inline]
    fn trace(&self, _tracer: &mut Tracer<'_>) {}
}

impl<T> Trace for SlotContainer<T> {
    #[inline]
    fn trace(&self, tracer: &mut Tracer<'_>) {
        tracer.visit(self);
    }
}

impl<T: Trace + ?Sized> Trace for Box<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        (**self).trace(tracer);
    }
}

impl<T: Trace> Trace for Option<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        if let Some(value) = self {
            value.trace(tracer);
        }
    }
}

impl<T: Trace, E: Trace> Trace for Result<T, E> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        match self {
            Ok(value) => value.trace(tracer),
            Err(error) => error.trace(tracer),
        }
    }
}

impl<T: Trace> Trace for [T] {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for element in self {
            element.trace(tracer);
        }
    }
}

impl<T: Trace, const N: usize> Trace for [T; N] {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        self.as_slice().trace(tracer);
    }
}

impl<T: Trace> Trace for Vec<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        self.as_slice().trace(tracer);
    }
}

impl<T: Trace> Trace for VecDeque<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for element in self {
            element.trace(tracer);
        }
    }
}

impl<K: Trace, V: Trace> Trace for BTreeMap<K, V> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for (key, value) in self {
            key.trace(tracer);
            value.trace(tracer);
        }
    }
}

impl<K: Trace, V: Trace, S> Trace for HashMap<K, V, S> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for (key, value) in self {
            key.trace(tracer);
            value.trace(tracer);
        }
    }
}

impl<T: Trace> Trace for RefCell<T> {
    /// A value that is mutably borrowed at collection time is skipped, which
    /// keeps whatever it owns alive until the next collection.
    fn trace(&self, tracer: &mut Tracer<'_>) {
        if let Ok(value) = self.try_borrow() {
            value.trace(tracer);
        }
    }
}

macro_rules! impl_trace_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Trace),+> Trace for ($($name,)+) {
            #[allow(non_snake_case)]
            fn trace(&self, tracer: &mut Tracer<'_>) {
                let ($($name,)+) = self;
                $($name.trace(tracer);)+
            }
        }
    };
}

impl_trace_for_tuple!(A);
impl_trace_for_tuple!(A, B);
impl_trace_for_tuple!(A, B, C);
impl_trace_for_tuple!(A, B, C, D);
impl_trace_for_tuple!(A, B, C, D, E);
impl_trace_for_tuple!(A, B, C, D, E, F);

// =============================================================================
// Collector View of Storage
// =============================================================================

/// Type-erased view of a container's storage used by the collector.
pub(crate) trait Collectable {
    fn object_id(&self) -> ObjectId;

    /// Appends the identities of the containers owned by live cells.
    ///
    /// Returns `false` if the cells were mutably borrowed and could not be
    /// traversed.
    fn traverse_edges(&self, edges: &mut Vec<ObjectId>) -> bool;

    /// Releases every live cell.
    fn clear_cells(&self);
}

impl<T: Trace> Collectable for SlotStorage<T> {
    fn object_id(&self) -> ObjectId {
        ObjectId::of_storage(self)
    }

    fn traverse_edges(&self, edges: &mut Vec<ObjectId>) -> bool {
        let Ok(cells) = self.cells.try_borrow() else {
            return false;
        };
        let mut tracer = Tracer::new(edges);
        for element in cells.iter().flatten() {
            element.trace(&mut tracer);
        }
        true
    }

    fn clear_cells(&self) {
        let released: Vec<T> = match self.cells.try_borrow_mut() {
            Ok(mut cells) => cells.iter_mut().filter_map(Option::take).collect(),
            Err(_) => return,
        };
        drop(released);
    }
}
