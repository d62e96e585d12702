//! Drag-to-reorder engine.
//!
//! The permutation itself is the pure [`move_item`]; [`DragSession`] feeds
//! it from pointer samples. Each sample is throttled against the time of
//! the last commit, hit-tested against the rendered item regions, and
//! committed at once when it lands on another item. Nothing is ever
//! half-applied: releasing, or moving outside every region, leaves the last
//! committed order.

use std::time::{Duration, Instant};

/// Default minimum interval between two commits.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(50);

/// Move `dragged` to the index `target` occupies, shifting the items in
/// between.
///
/// Returns `None` when either item is missing or both are the same.
pub fn move_item<T: PartialEq + Clone>(order: &[T], dragged: &T, target: &T) -> Option<Vec<T>> {
    if dragged == target {
        return None;
    }
    let from = order.iter().position(|item| item == dragged)?;
    let to = order.iter().position(|item| item == target)?;

    let mut next = order.to_vec();
    let item = next.remove(from);
    next.insert(to, item);
    Some(next)
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// A pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges belong to the
    /// neighbouring rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// The rendered region of one draggable item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRegion<T> {
    pub id: T,
    pub rect: Rect,
}

impl<T> ItemRegion<T> {
    pub fn new(id: T, rect: Rect) -> Self {
        Self { id, rect }
    }
}

/// Find the item under `point`.
pub fn hit_test<T>(regions: &[ItemRegion<T>], point: Point) -> Option<&T> {
    regions
        .iter()
        .find(|region| region.rect.contains(point))
        .map(|region| &region.id)
}

// =============================================================================
// DRAG SESSION
// =============================================================================

/// Result of feeding one pointer sample to a [`DragSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum DragUpdate<T> {
    /// Dropped by the throttle.
    Throttled,
    /// Outside every region, or over the dragged item itself.
    NoTarget,
    /// A new order was committed.
    Committed(Vec<T>),
}

/// One pointer drag over an ordered list.
#[derive(Debug, Clone)]
pub struct DragSession<T> {
    dragged: T,
    initial: Vec<T>,
    order: Vec<T>,
    interval: Duration,
    last_commit: Option<Instant>,
}

impl<T: PartialEq + Clone> DragSession<T> {
    /// Start dragging `dragged` within `order`.
    ///
    /// Returns `None` when `dragged` is not part of the list.
    pub fn start(order: Vec<T>, dragged: T) -> Option<Self> {
        if !order.contains(&dragged) {
            return None;
        }
        Some(Self {
            dragged,
            initial: order.clone(),
            order,
            interval: DEFAULT_THROTTLE,
            last_commit: None,
        })
    }

    /// Set the minimum interval between commits.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn dragged(&self) -> &T {
        &self.dragged
    }

    /// Last committed order.
    pub fn order(&self) -> &[T] {
        &self.order
    }

    /// Whether any commit changed the order since the drag started.
    pub fn is_moved(&self) -> bool {
        self.order != self.initial
    }

    /// Feed a pointer sample taken at `now`.
    pub fn pointer_moved(
        &mut self,
        point: Point,
        regions: &[ItemRegion<T>],
        now: Instant,
    ) -> DragUpdate<T> {
        if self
            .last_commit
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval)
        {
            return DragUpdate::Throttled;
        }

        let Some(next) = hit_test(regions, point)
            .and_then(|target| move_item(&self.order, &self.dragged, target))
        else {
            return DragUpdate::NoTarget;
        };

        self.order = next;
        self.last_commit = Some(now);
        DragUpdate::Committed(self.order.clone())
    }

    /// End the drag, keeping the last committed order.
    pub fn release(self) -> Vec<T> {
        self.order
    }
}
