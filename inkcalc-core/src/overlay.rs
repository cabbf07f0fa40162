//! # Overlays
//!
//! Recognized results are shown as draggable overlays near the drawing. They don't appear immediately:
//! each is scheduled on a [`RevealScheduler`], and [`OverlayQueue`] only holds what has been revealed.

/// Logical time in milliseconds, supplied by the host.
pub type Millis = u64;

/// Where new overlays land when no drawing content could be located.
pub const DEFAULT_ANCHOR: (f32, f32) = (10.0, 200.0);

/// Markup handed to the typesetter for one result.
#[must_use]
pub fn markup(expr: &str, result: &str) -> String {
    format!("\\(\\LARGE{{{expr} = {result}}}\\)")
}

#[derive(Clone, PartialEq, Debug)]
pub struct Overlay {
    pub markup: String,
    pub position: (f32, f32),
}

/// Overlays that have been revealed, in reveal order, plus the shared anchor new ones are placed at.
#[derive(Clone, Debug)]
pub struct OverlayQueue {
    overlays: Vec<Overlay>,
    anchor: (f32, f32),
}
impl OverlayQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            overlays: Vec::new(),
            anchor: DEFAULT_ANCHOR,
        }
    }
    #[must_use]
    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }
    pub fn set_anchor(&mut self, anchor: (f32, f32)) {
        self.anchor = anchor;
    }
    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
    pub fn push(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }
    /// The user dropped overlay `index` at `position`. That overlay moves, and the drop point
    /// becomes the anchor for later ones. Returns false for an unknown index.
    pub fn drag(&mut self, index: usize, position: (f32, f32)) -> bool {
        let Some(overlay) = self.overlays.get_mut(index) else {
            return false;
        };
        overlay.position = position;
        self.anchor = position;
        true
    }
    /// Remove every overlay. The anchor is kept.
    pub fn clear(&mut self) {
        self.overlays.clear();
    }
}
impl Default for OverlayQueue {
    fn default() -> Self {
        Self::new()
    }
}

struct Scheduled {
    due: Millis,
    /// Insertion order, to keep ties stable.
    seq: u64,
    overlay: Overlay,
}

/// Pending reveals, ordered by due time. Cancelable as a whole.
#[derive(Default)]
pub struct RevealScheduler {
    pending: Vec<Scheduled>,
    next_seq: u64,
}
impl RevealScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn schedule(&mut self, due: Millis, overlay: Overlay) {
        let seq = self.next_seq;
        self.next_seq += 1;
        // Keep sorted by (due, seq). Appends are the common case.
        let at = self
            .pending
            .partition_point(|entry| (entry.due, entry.seq) <= (due, seq));
        self.pending.insert(at, Scheduled { due, seq, overlay });
    }
    /// Take every overlay due at or before `now`, in reveal order.
    pub fn take_due(&mut self, now: Millis) -> Vec<Overlay> {
        let split = self.pending.partition_point(|entry| entry.due <= now);
        self.pending
            .drain(..split)
            .map(|entry| entry.overlay)
            .collect()
    }
    /// Drop everything pending. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
    /// Due time of the next reveal, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.first().map(|entry| entry.due)
    }
}

#[cfg(test)]
mod test {
    use super::{markup, Overlay, OverlayQueue, RevealScheduler, DEFAULT_ANCHOR};

    fn overlay(s: &str) -> Overlay {
        Overlay {
            markup: s.to_owned(),
            position: (0.0, 0.0),
        }
    }
    #[test]
    fn markup_format() {
        assert_eq!(markup("2+2", "4"), r"\(\LARGE{2+2 = 4}\)");
    }
    #[test]
    fn reveal_order() {
        let mut scheduler = RevealScheduler::new();
        scheduler.schedule(2000, overlay("b"));
        scheduler.schedule(1000, overlay("a"));
        scheduler.schedule(2000, overlay("c"));
        assert_eq!(scheduler.next_due(), Some(1000));
        assert!(scheduler.take_due(999).is_empty());
        assert_eq!(scheduler.take_due(1000), [overlay("a")]);
        assert_eq!(scheduler.take_due(5000), [overlay("b"), overlay("c")]);
        assert_eq!(scheduler.pending(), 0);
    }
    #[test]
    fn cancel() {
        let mut scheduler = RevealScheduler::new();
        scheduler.schedule(10, overlay("a"));
        scheduler.schedule(20, overlay("b"));
        assert_eq!(scheduler.cancel_all(), 2);
        assert!(scheduler.take_due(u64::MAX).is_empty());
    }
    #[test]
    fn drag_moves_one_and_anchor() {
        let mut queue = OverlayQueue::new();
        assert_eq!(queue.anchor(), DEFAULT_ANCHOR);
        queue.push(overlay("a"));
        queue.push(overlay("b"));
        assert!(queue.drag(1, (50.0, 60.0)));
        assert_eq!(queue.overlays()[0].position, (0.0, 0.0));
        assert_eq!(queue.overlays()[1].position, (50.0, 60.0));
        assert_eq!(queue.anchor(), (50.0, 60.0));
        assert!(!queue.drag(2, (1.0, 1.0)));
    }
}
