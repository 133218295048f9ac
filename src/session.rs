// Copyright (C) 2026 Liyang <liyang@veronica>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! An editing session over a kit: every mutation goes through here so that
//! interested parties (previews, the renderer) hear about changes.
//!
//! Each mutation fires the synchronous `updating` callbacks immediately and
//! arms a debounce timer; the `updated` callbacks fire only once the session
//! has been quiet for the debounce interval, so a drag gesture produces a
//! stream of `updating` notifications but a single `updated` one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::debug;

use crate::editor::{self, Blend, Boundary};
use crate::kit::{Kit, KitError};

/// How long the session must stay quiet before `updated` fires.
pub const UPDATE_DEBOUNCE: Duration = Duration::from_millis(680);

type Callbacks = Arc<Mutex<Vec<Box<dyn Fn() + Send + Sync>>>>;

fn invoke(callbacks: &Callbacks) {
    for callback in callbacks.lock().iter() {
        callback();
    }
}

/// Coalesces a burst of change notifications into one settled notification.
///
/// Dropping the notifier disarms any pending timer; `updated` never fires
/// after the notifier is gone.
pub struct UpdateNotifier {
    updating: Callbacks,
    updated: Callbacks,
    touches: AtomicU64,
    events: mpsc::UnboundedSender<u64>,
    settled: watch::Receiver<u64>,
}

impl UpdateNotifier {
    pub fn new() -> UpdateNotifier {
        UpdateNotifier::with_debounce(UPDATE_DEBOUNCE)
    }

    /// A notifier with a custom quiet interval.
    pub fn with_debounce(debounce: Duration) -> UpdateNotifier {
        let updated: Callbacks = Arc::new(Mutex::new(Vec::new()));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = watch::channel(0);

        tokio::spawn(UpdateNotifier::run(
            events_rx,
            settled_tx,
            Arc::clone(&updated),
            debounce,
        ));

        UpdateNotifier {
            updating: Arc::new(Mutex::new(Vec::new())),
            updated,
            touches: AtomicU64::new(0),
            events: events_tx,
            settled: settled_rx,
        }
    }

    /// Registers a callback fired synchronously on every mutation.
    pub fn on_updating<F: Fn() + Send + Sync + 'static>(&self, callback: F) {
        self.updating.lock().push(Box::new(callback));
    }

    /// Registers a callback fired once per quiet period after mutations.
    pub fn on_updated<F: Fn() + Send + Sync + 'static>(&self, callback: F) {
        self.updated.lock().push(Box::new(callback));
    }

    /// Records one mutation: fires `updating` now and (re)arms the timer.
    pub fn touch(&self) {
        invoke(&self.updating);
        let generation = self.touches.fetch_add(1, Ordering::SeqCst) + 1;
        // The receiver only goes away when this notifier is dropped.
        let _ = self.events.send(generation);
    }

    /// Waits until every mutation made so far has been reported through
    /// `updated`. Returns immediately when the session is already settled.
    pub async fn flush(&self) {
        let target = self.touches.load(Ordering::SeqCst);
        let mut settled = self.settled.clone();
        while *settled.borrow() < target {
            if settled.changed().await.is_err() {
                break;
            }
        }
    }

    async fn run(
        mut events: mpsc::UnboundedReceiver<u64>,
        settled: watch::Sender<u64>,
        updated: Callbacks,
        debounce: Duration,
    ) {
        let mut pending: Option<(Instant, u64)> = None;
        loop {
            match pending {
                None => match events.recv().await {
                    Some(generation) => {
                        pending = Some((Instant::now() + debounce, generation));
                    }
                    None => break,
                },
                Some((deadline, generation)) => {
                    tokio::select! {
                        event = events.recv() => match event {
                            // Still being edited: push the deadline out.
                            Some(generation) => {
                                pending = Some((Instant::now() + debounce, generation));
                            }
                            // Notifier dropped mid-burst: never fire late.
                            None => break,
                        },
                        _ = tokio::time::sleep_until(deadline) => {
                            debug!(generation, "edits settled");
                            invoke(&updated);
                            let _ = settled.send(generation);
                            pending = None;
                        }
                    }
                }
            }
        }
    }
}

impl Default for UpdateNotifier {
    fn default() -> UpdateNotifier {
        UpdateNotifier::new()
    }
}

/// A kit under edit, plus per-instrument blend modes and the notifier
/// that reports changes. All mutating operations notify on success and
/// leave the notifier untouched on failure.
pub struct EditSession {
    kit: Arc<Mutex<Kit>>,
    blends: Mutex<HashMap<u8, Blend>>,
    notifier: UpdateNotifier,
}

impl EditSession {
    pub fn new() -> EditSession {
        EditSession::with_kit(Kit::new())
    }

    /// A session over an existing kit, typically one loaded from disk.
    pub fn with_kit(kit: Kit) -> EditSession {
        EditSession {
            kit: Arc::new(Mutex::new(kit)),
            blends: Mutex::new(HashMap::new()),
            notifier: UpdateNotifier::new(),
        }
    }

    pub fn notifier(&self) -> &UpdateNotifier {
        &self.notifier
    }

    /// A point-in-time copy of the kit, for rendering or inspection
    /// without holding the session lock.
    pub fn snapshot(&self) -> Kit {
        self.kit.lock().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.kit.lock().is_dirty()
    }

    pub fn clear_dirty(&self) {
        self.kit.lock().clear_dirty();
    }

    /// The blend mode of one instrument. Defaults to [`Blend::Off`].
    pub fn blend(&self, pitch: u8) -> Blend {
        self.blends.lock().get(&pitch).copied().unwrap_or_default()
    }

    pub fn attach_sample(&self, pitch: u8, path: PathBuf) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            kit.instrument_mut(pitch)?.attach(path)?;
        }
        self.notifier.touch();
        Ok(())
    }

    pub fn detach_sample(&self, pitch: u8, path: &Path) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            kit.instrument_mut(pitch)?.detach(path)?;
        }
        self.notifier.touch();
        Ok(())
    }

    pub fn set_volume(&self, pitch: u8, path: &Path, volume: f64) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            let instrument = kit.instrument_mut(pitch)?;
            instrument
                .range_mut(path)
                .ok_or_else(|| KitError::SampleNotFound(path.to_path_buf()))?
                .set_volume(volume);
        }
        self.notifier.touch();
        Ok(())
    }

    pub fn set_window(&self, pitch: u8, path: &Path, lovel: u8, hivel: u8) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            let instrument = kit.instrument_mut(pitch)?;
            instrument
                .range_mut(path)
                .ok_or_else(|| KitError::SampleNotFound(path.to_path_buf()))?
                .set_window(lovel, hivel);
        }
        self.notifier.touch();
        Ok(())
    }

    /// One drag event on an instrument's range, honoring the instrument's
    /// current blend mode. Returns which boundary moved. The index may be
    /// stale if another caller detached a sample in between, so it is
    /// checked rather than trusted.
    pub fn drag(&self, pitch: u8, index: usize, velocity: u8) -> Result<Boundary, KitError> {
        let blend = self.blend(pitch);
        let boundary = {
            let mut kit = self.kit.lock();
            let instrument = kit.instrument_mut(pitch)?;
            if index >= instrument.len() {
                return Err(KitError::RangeOutOfBounds(index));
            }
            editor::drag(instrument, index, velocity, blend)
        };
        self.notifier.touch();
        Ok(boundary)
    }

    /// Switches an instrument's blend mode, recomputing or dropping its
    /// crossfade curves as needed.
    pub fn set_blend(&self, pitch: u8, blend: Blend) -> Result<(), KitError> {
        let current = self.blend(pitch);
        {
            let mut kit = self.kit.lock();
            editor::set_blend(kit.instrument_mut(pitch)?, current, blend);
        }
        self.blends.lock().insert(pitch, blend);
        self.notifier.touch();
        Ok(())
    }

    /// Evenly distributes an instrument's ranges over the velocity axis.
    pub fn spread(&self, pitch: u8) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            editor::spread(kit.instrument_mut(pitch)?);
        }
        self.notifier.touch();
        Ok(())
    }

    pub fn move_up(&self, pitch: u8, path: &Path) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            kit.instrument_mut(pitch)?.move_up(path)?;
        }
        self.notifier.touch();
        Ok(())
    }

    pub fn move_down(&self, pitch: u8, path: &Path) -> Result<(), KitError> {
        {
            let mut kit = self.kit.lock();
            kit.instrument_mut(pitch)?.move_down(path)?;
        }
        self.notifier.touch();
        Ok(())
    }
}

impl Default for EditSession {
    fn default() -> EditSession {
        EditSession::new()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter(notifier: &UpdateNotifier, updated: bool) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let register = {
            let count = Arc::clone(&count);
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };
        if updated {
            notifier.on_updated(register);
        } else {
            notifier.on_updating(register);
        }
        count
    }

    #[tokio::test]
    async fn test_updating_fires_per_mutation() {
        let session = EditSession::new();
        let updating = counter(session.notifier(), false);

        session.attach_sample(38, PathBuf::from("/a.wav")).unwrap();
        session.attach_sample(38, PathBuf::from("/b.wav")).unwrap();
        session.spread(38).unwrap();

        assert_eq!(updating.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_notify() {
        let session = EditSession::new();
        let updating = counter(session.notifier(), false);

        session.attach_sample(38, PathBuf::from("/a.wav")).unwrap();
        assert!(session.attach_sample(38, PathBuf::from("/a.wav")).is_err());
        assert!(session.detach_sample(38, Path::new("/missing.wav")).is_err());

        assert_eq!(updating.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_burst_coalesces_into_one_updated() {
        let notifier = UpdateNotifier::with_debounce(Duration::from_millis(20));
        let updated = counter(&notifier, true);

        for _ in 0..10 {
            notifier.touch();
        }
        notifier.flush().await;

        assert_eq!(updated.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_separate_bursts_fire_separately() {
        let notifier = UpdateNotifier::with_debounce(Duration::from_millis(20));
        let updated = counter(&notifier, true);

        notifier.touch();
        notifier.flush().await;
        notifier.touch();
        notifier.flush().await;

        assert_eq!(updated.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_drop_before_deadline_suppresses_updated() {
        let updated = Arc::new(AtomicUsize::new(0));
        {
            let notifier = UpdateNotifier::with_debounce(Duration::from_millis(50));
            let updated = Arc::clone(&updated);
            notifier.on_updated(move || {
                updated.fetch_add(1, Ordering::SeqCst);
            });
            notifier.touch();
        }
        // Well past the deadline the notifier would have used.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(updated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_flush_settles_immediately_when_quiet() {
        let notifier = UpdateNotifier::with_debounce(Duration::from_millis(20));
        notifier.flush().await;
    }

    #[tokio::test]
    async fn test_session_operations_mutate_kit() {
        let session = EditSession::new();
        session.attach_sample(38, PathBuf::from("/a.wav")).unwrap();
        session.attach_sample(38, PathBuf::from("/b.wav")).unwrap();
        session.set_blend(38, Blend::Crossfade).unwrap();
        session.drag(38, 0, 70).unwrap();

        let kit = session.snapshot();
        let inst = kit.instrument(38).unwrap();
        assert_eq!(session.blend(38), Blend::Crossfade);
        assert!(inst.ranges().iter().any(|r| !r.curve_points().is_empty()));

        session.set_blend(38, Blend::Off).unwrap();
        let kit = session.snapshot();
        let inst = kit.instrument(38).unwrap();
        assert!(inst.ranges().iter().all(|r| r.curve_points().is_empty()));
    }

    #[tokio::test]
    async fn test_drag_rejects_stale_index() {
        let session = EditSession::new();
        let updating = counter(session.notifier(), false);

        session.attach_sample(38, PathBuf::from("/a.wav")).unwrap();
        session.attach_sample(38, PathBuf::from("/b.wav")).unwrap();
        session.detach_sample(38, Path::new("/b.wav")).unwrap();

        // Index 1 pointed at the detached sample; it must fail, not panic.
        let result = session.drag(38, 1, 60);
        assert!(matches!(result, Err(KitError::RangeOutOfBounds(1))));
        assert_eq!(updating.load(Ordering::SeqCst), 3);

        // The surviving range is still reachable.
        session.drag(38, 0, 60).unwrap();
        assert_eq!(updating.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_dirty_tracking_through_session() {
        let session = EditSession::new();
        assert!(!session.is_dirty());

        session.attach_sample(36, PathBuf::from("/kick.wav")).unwrap();
        assert!(session.is_dirty());

        session.clear_dirty();
        assert!(!session.is_dirty());
    }
}
