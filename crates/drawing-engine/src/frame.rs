//! Animation-frame coalescing for pointer samples
//!
//! Pointer moves can arrive far faster than the display refreshes. During a
//! drag only the newest sample matters, so the coalescer holds at most one
//! pending value and tells the caller when a frame callback needs to be
//! requested.

#[derive(Debug)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    /// Samples overwritten before their frame fired
    dropped_samples: u64,
    /// Frames that applied a sample
    applied_frames: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            dropped_samples: 0,
            applied_frames: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sample`, replacing any pending one.
    /// Returns `true` when no frame was pending and one must be requested.
    pub fn schedule(&mut self, sample: T) -> bool {
        let needs_frame = self.pending.is_none();
        if !needs_frame {
            self.dropped_samples += 1;
        }
        self.pending = Some(sample);
        needs_frame
    }

    /// Take the pending sample, if any. Called from the frame callback and
    /// before a drag is released.
    pub fn take(&mut self) -> Option<T> {
        let sample = self.pending.take();
        if sample.is_some() {
            self.applied_frames += 1;
        }
        sample
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }

    pub fn applied_frames(&self) -> u64 {
        self.applied_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut coalescer = FrameCoalescer::new();
        assert!(coalescer.schedule(1));
        assert!(!coalescer.schedule(2));
        assert!(!coalescer.schedule(3));
        assert_eq!(coalescer.take(), Some(3));
        assert_eq!(coalescer.take(), None);
        assert_eq!(coalescer.dropped_samples(), 2);
        assert_eq!(coalescer.applied_frames(), 1);

        // next move after the frame fired requests a new one
        assert!(coalescer.schedule(4));
        coalescer.cancel();
        assert!(!coalescer.is_pending());
    }
}
