//! # Dispatcher
//!
//! The session object. Owns the surface, brush, symbol table and overlays, and maps pointer events,
//! [`Action`]s and spoken commands onto them.
//!
//! Submission is split in two so the user can keep drawing while a request is in flight:
//! [`Dispatcher::begin_submission`] captures everything the request needs *now* (image, variables,
//! the anchor for its results) and hands back a [`PendingSubmission`], and
//! [`Dispatcher::complete_submission`] applies the response whenever it arrives.
//! [`Dispatcher::submit`] does both around an `await` for hosts that don't need the split.

use crate::actions::{match_utterance, Action};
use crate::brush::BrushSettings;
use crate::config::{CanvasConfig, SubmissionPolicy};
use crate::input::PointerSample;
use crate::localize::bounding_box;
use crate::overlay::{markup, Millis, Overlay, OverlayQueue, RevealScheduler};
use crate::recognize::{RecognitionRequest, RecognitionResponse, Recognizer};
use crate::renderer::StrokeRenderer;
use crate::surface::{Placement, Surface, SurfaceError};
use crate::symbols::SymbolTable;
use crate::util::Rect;
use crate::voice::{Unsupported, VoiceControl};

/// Renders overlay markup for display. Fire-and-forget.
pub trait Typesetter {
    /// Called after the set of visible overlays changed.
    fn typeset(&mut self, overlays: &[Overlay]);
}
/// Discards everything.
pub struct NoTypesetter;
impl Typesetter for NoTypesetter {
    fn typeset(&mut self, _: &[Overlay]) {}
}

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Voice(#[from] Unsupported),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DispatchState {
    Idle,
    Drawing,
    Submitting,
}

/// A submission whose response hasn't been applied yet. Hand it back through
/// [`Dispatcher::complete_submission`] or [`Dispatcher::abandon_submission`], otherwise it keeps
/// occupying its slot.
#[derive(Debug)]
#[must_use = "a pending submission stays in flight until completed or abandoned"]
pub struct PendingSubmission {
    id: u64,
    /// Reset generation it was started in.
    epoch: u64,
    request: RecognitionRequest,
    /// Center of the drawn content at submission time, if there was any.
    anchor: Option<(f32, f32)>,
}
impl PendingSubmission {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
    #[must_use]
    pub fn request(&self) -> &RecognitionRequest {
        &self.request
    }
    #[must_use]
    pub fn anchor(&self) -> Option<(f32, f32)> {
        self.anchor
    }
}

/// What became of a submission.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// Response applied.
    Applied {
        assigned: usize,
        scheduled: usize,
        anchor: (f32, f32),
    },
    /// The recognizer failed. Nothing changed.
    Failed,
    /// A reset happened while it was in flight. The response was dropped.
    Stale,
}

/// Result of performing an [`Action`].
#[derive(Debug)]
pub enum Effect {
    Done,
    /// PNG bytes of the surface.
    Saved(Vec<u8>),
    Loaded(Placement),
    /// New listening state.
    Listening(bool),
    /// The caller must drive this to completion.
    Pending(PendingSubmission),
    Completed(Completion),
}

pub struct Dispatcher {
    surface: Surface,
    renderer: StrokeRenderer,
    brush: BrushSettings,
    symbols: SymbolTable,
    overlays: OverlayQueue,
    reveals: RevealScheduler,
    voice: VoiceControl,
    typesetter: Box<dyn Typesetter>,
    reveal_delay: Millis,
    policy: SubmissionPolicy,
    in_flight: hashbrown::HashSet<u64>,
    next_submission: u64,
    epoch: u64,
}
impl Dispatcher {
    /// # Errors
    /// The configured surface size can't be allocated.
    pub fn new(
        config: &CanvasConfig,
        typesetter: Box<dyn Typesetter>,
    ) -> Result<Self, DispatchError> {
        Ok(Self {
            surface: Surface::new(config.width, config.height, config.background)?,
            renderer: StrokeRenderer::new(config.accepted),
            brush: BrushSettings::new(config.color, config.background, config.widths),
            symbols: SymbolTable::new(),
            overlays: OverlayQueue::new(),
            reveals: RevealScheduler::new(),
            voice: if config.voice_supported {
                VoiceControl::supported()
            } else {
                VoiceControl::unsupported()
            },
            typesetter,
            reveal_delay: config.reveal_delay,
            policy: config.policy,
            in_flight: hashbrown::HashSet::new(),
            next_submission: 0,
            epoch: 0,
        })
    }
    #[must_use]
    pub fn state(&self) -> DispatchState {
        if self.renderer.is_stroking() {
            DispatchState::Drawing
        } else if !self.in_flight.is_empty() {
            DispatchState::Submitting
        } else {
            DispatchState::Idle
        }
    }
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
    #[must_use]
    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
    #[must_use]
    pub fn overlays(&self) -> &OverlayQueue {
        &self.overlays
    }
    #[must_use]
    pub fn voice(&self) -> &VoiceControl {
        &self.voice
    }
    /// Number of reveals still scheduled.
    #[must_use]
    pub fn pending_reveals(&self) -> usize {
        self.reveals.pending()
    }
    #[must_use]
    pub fn next_reveal(&self) -> Option<Millis> {
        self.reveals.next_due()
    }
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pointer_down(&mut self, sample: &PointerSample) -> bool {
        self.renderer.begin_stroke(sample, &self.brush)
    }
    pub fn pointer_move(&mut self, sample: &PointerSample) -> Option<Rect> {
        self.renderer
            .extend_stroke(sample, self.surface.buffer_mut())
    }
    /// Pointer up or pointer leaving the surface.
    pub fn pointer_up(&mut self) {
        self.renderer.end_stroke();
    }
    /// The user dropped an overlay somewhere else.
    pub fn drag_overlay(&mut self, index: usize, position: (f32, f32)) -> bool {
        let moved = self.overlays.drag(index, position);
        if moved {
            self.typesetter.typeset(self.overlays.overlays());
        }
        moved
    }

    /// Perform everything an action does that doesn't need to wait. A [`Action::Submit`] yields
    /// [`Effect::Pending`], which the caller completes with [`Self::complete_submission`].
    ///
    /// # Errors
    /// The action had no effect.
    pub fn perform(&mut self, action: Action) -> Result<Effect, DispatchError> {
        log::debug!("performing {}", action.as_ref());
        match action {
            Action::Submit => self.begin_submission().map(Effect::Pending),
            Action::Reset => {
                self.reset();
                Ok(Effect::Done)
            }
            Action::ToggleEraser => {
                self.brush.toggle_eraser();
                log::debug!("brush mode now {}", self.brush.mode());
                Ok(Effect::Done)
            }
            Action::Save => Ok(Effect::Saved(self.surface.encode_png()?)),
            Action::SelectColor(color) => {
                self.brush.select_color(color);
                Ok(Effect::Done)
            }
            Action::LoadImage(bytes) => Ok(Effect::Loaded(self.surface.load_image(&bytes)?)),
            Action::Resize { width, height } => {
                self.surface.resize(width, height)?;
                Ok(Effect::Done)
            }
            Action::ToggleVoice => Ok(Effect::Listening(self.voice.toggle()?)),
        }
    }
    /// [`Self::perform`], driving a submission to completion with `recognizer`.
    ///
    /// # Errors
    /// See [`Self::perform`].
    pub async fn run<R: Recognizer + ?Sized>(
        &mut self,
        action: Action,
        recognizer: &R,
        now: Millis,
    ) -> Result<Effect, DispatchError> {
        match self.perform(action)? {
            Effect::Pending(pending) => {
                let result = recognizer.recognize(pending.request().clone()).await;
                Ok(Effect::Completed(self.complete_submission(
                    pending, result, now,
                )))
            }
            other => Ok(other),
        }
    }
    /// Map a finalized transcript onto at most one action. The transcript is consumed either way.
    #[must_use]
    pub fn interpret_transcript(&self, transcript: &str) -> Option<Action> {
        let action = match_utterance(transcript);
        match &action {
            Some(action) => log::info!("voice: {transcript:?} -> {}", action.as_ref()),
            None => log::debug!("voice: no command in {transcript:?}"),
        }
        action
    }

    /// Clear the surface, variables and overlays, and cancel pending reveals.
    /// Submissions still in flight will be dropped when they resolve.
    pub fn reset(&mut self) {
        self.surface.reset();
        self.symbols.clear();
        self.overlays.clear();
        let cancelled = self.reveals.cancel_all();
        self.epoch += 1;
        log::info!(
            "reset (cancelled {cancelled} reveals, {} submissions orphaned)",
            self.in_flight.len()
        );
        self.typesetter.typeset(self.overlays.overlays());
    }

    /// Capture the request for a submission from the current state.
    ///
    /// # Errors
    /// [`DispatchError::SubmissionInFlight`] under [`SubmissionPolicy::SingleSlot`], or if the surface can't be encoded.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, DispatchError> {
        if self.policy == SubmissionPolicy::SingleSlot && !self.in_flight.is_empty() {
            return Err(DispatchError::SubmissionInFlight);
        }
        let image = self.surface.to_data_url()?;
        let anchor = bounding_box(self.surface.buffer()).center();
        let id = self.next_submission;
        self.next_submission += 1;
        self.in_flight.insert(id);
        log::info!("submission {id} started, content anchor {anchor:?}");
        Ok(PendingSubmission {
            id,
            epoch: self.epoch,
            request: RecognitionRequest {
                image,
                dict_of_vars: self.symbols.snapshot(),
            },
            anchor,
        })
    }
    /// Apply the outcome of a recognition call, scheduling its overlays relative to `now`.
    /// Give up on a submission without a response, e.g. when the request was cancelled.
    /// Nothing changes but the slot it held.
    pub fn abandon_submission(&mut self, pending: PendingSubmission) {
        if self.in_flight.remove(&pending.id) {
            log::debug!("submission {} abandoned", pending.id);
        }
    }
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        result: anyhow::Result<RecognitionResponse>,
        now: Millis,
    ) -> Completion {
        self.in_flight.remove(&pending.id);
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::warn!("submission {} failed: {e:#}", pending.id);
                return Completion::Failed;
            }
        };
        if pending.epoch != self.epoch {
            log::info!("submission {} resolved after a reset, dropped", pending.id);
            return Completion::Stale;
        }

        let mut assigned = 0;
        for item in response.data.iter().filter(|item| item.assign) {
            self.symbols.upsert(item.expr.clone(), item.result.clone());
            assigned += 1;
        }

        let anchor = pending.anchor.unwrap_or_else(|| self.overlays.anchor());
        self.overlays.set_anchor(anchor);
        for (i, item) in (1..).zip(response.data.iter()) {
            self.reveals.schedule(
                now.saturating_add(self.reveal_delay.saturating_mul(i)),
                Overlay {
                    markup: markup(&item.expr, &item.result),
                    position: anchor,
                },
            );
        }
        log::info!(
            "submission {} applied: {} results, {assigned} assignments",
            pending.id,
            response.data.len()
        );
        Completion::Applied {
            assigned,
            scheduled: response.data.len(),
            anchor,
        }
    }
    /// Begin, await, and complete a submission in one go.
    ///
    /// # Errors
    /// See [`Self::begin_submission`]. Recognizer failures are not errors, see [`Completion::Failed`].
    pub async fn submit<R: Recognizer + ?Sized>(
        &mut self,
        recognizer: &R,
        now: Millis,
    ) -> Result<Completion, DispatchError> {
        let pending = self.begin_submission()?;
        let result = recognizer.recognize(pending.request().clone()).await;
        Ok(self.complete_submission(pending, result, now))
    }
    /// Reveal every overlay due by `now`. Returns how many appeared.
    pub fn tick(&mut self, now: Millis) -> usize {
        let due = self.reveals.take_due(now);
        let count = due.len();
        if count > 0 {
            for overlay in due {
                self.overlays.push(overlay);
            }
            self.typesetter.typeset(self.overlays.overlays());
        }
        count
    }
}
