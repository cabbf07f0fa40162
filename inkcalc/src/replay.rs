//! Drives a parsed session script through a [`Dispatcher`] on a logical clock.

use crate::script::{ColorChoice, Event};
use crate::settings::Settings;
use inkcalc_core::actions::Action;
use inkcalc_core::dispatch::{Completion, DispatchError, Dispatcher, Effect, Typesetter};
use inkcalc_core::overlay::Millis;
use inkcalc_core::recognize::{RecognitionRequest, RecognitionResponse, Recognizer};

/// Used when no service is configured. Recognizes nothing.
pub struct OfflineRecognizer;
#[async_trait::async_trait]
impl Recognizer for OfflineRecognizer {
    async fn recognize(&self, request: RecognitionRequest) -> anyhow::Result<RecognitionResponse> {
        log::info!(
            "offline: skipping recognition of {} byte image",
            request.image.len()
        );
        Ok(RecognitionResponse::default())
    }
}

/// Tallies of what happened during a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub events: usize,
    /// Events that had no effect because of an error.
    pub rejected: usize,
    pub submissions: usize,
    pub failed_submissions: usize,
    pub revealed: usize,
    pub saved: Vec<std::path::PathBuf>,
}

pub struct Replay {
    dispatcher: Dispatcher,
    settings: Settings,
    /// Default save destination.
    out: std::path::PathBuf,
    now: Millis,
    report: Report,
}
impl Replay {
    /// # Errors
    /// The configured surface can't be allocated.
    pub fn new(
        settings: Settings,
        typesetter: Box<dyn Typesetter>,
        out: std::path::PathBuf,
    ) -> Result<Self, DispatchError> {
        Ok(Self {
            dispatcher: Dispatcher::new(&settings.canvas_config(), typesetter)?,
            settings,
            out,
            now: 0,
            report: Report::default(),
        })
    }
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
    #[must_use]
    pub fn now(&self) -> Millis {
        self.now
    }
    /// Play every event, then let the clock run until all scheduled reveals have happened.
    pub async fn run<R: Recognizer + ?Sized>(mut self, events: Vec<Event>, recognizer: &R) -> Report {
        for event in events {
            self.apply(event, recognizer).await;
        }
        self.settle();
        self.report
    }
    /// Advance to each outstanding reveal in turn.
    pub fn settle(&mut self) {
        while let Some(due) = self.dispatcher.next_reveal() {
            self.advance_to(due.max(self.now));
        }
    }
    fn advance_to(&mut self, now: Millis) {
        self.now = now;
        self.report.revealed += self.dispatcher.tick(now);
    }
    pub async fn apply<R: Recognizer + ?Sized>(&mut self, event: Event, recognizer: &R) {
        self.report.events += 1;
        match event {
            Event::Down(sample) => {
                if !self.dispatcher.pointer_down(&sample) {
                    log::debug!("ignored pointer down from {:?}", sample.source);
                }
            }
            Event::Move(sample) => {
                self.dispatcher.pointer_move(&sample);
            }
            Event::Up => self.dispatcher.pointer_up(),
            Event::Say(transcript) => {
                if !self.dispatcher.voice().is_listening() {
                    log::debug!("not listening, ignored {transcript:?}");
                    return;
                }
                match self.dispatcher.interpret_transcript(&transcript) {
                    Some(Action::Save) => self.save(self.out.clone()),
                    Some(action) => self.action(action, recognizer).await,
                    None => (),
                }
            }
            Event::ToggleVoice => {
                self.action(Action::ToggleVoice, recognizer).await;
            }
            Event::Submit => {
                self.action(Action::Submit, recognizer).await;
            }
            Event::Reset => {
                self.action(Action::Reset, recognizer).await;
            }
            Event::Eraser => {
                self.action(Action::ToggleEraser, recognizer).await;
            }
            Event::Color(choice) => {
                let color = match choice {
                    ColorChoice::Literal(color) => Some(color),
                    ColorChoice::Swatch(index) => self.settings.swatch(index),
                };
                match color {
                    Some(color) => {
                        self.action(Action::SelectColor(color), recognizer).await;
                    }
                    None => {
                        log::warn!("no such swatch");
                        self.report.rejected += 1;
                    }
                }
            }
            Event::Resize { width, height } => {
                self.action(Action::Resize { width, height }, recognizer)
                    .await;
            }
            Event::Load(path) => match std::fs::read(&path) {
                Ok(bytes) => {
                    self.action(Action::LoadImage(bytes), recognizer).await;
                }
                Err(e) => {
                    log::error!("failed to open file {path:?}: {e:#}");
                    self.report.rejected += 1;
                }
            },
            Event::Save(path) => {
                let path = path.unwrap_or_else(|| self.out.clone());
                self.save(path);
            }
            Event::Wait(ms) => self.advance_to(self.now.saturating_add(ms)),
        }
    }
    /// Write the surface as PNG to `path`.
    fn save(&mut self, path: std::path::PathBuf) {
        let png = match self.dispatcher.perform(Action::Save) {
            Ok(Effect::Saved(png)) => png,
            Ok(_) => return,
            Err(e) => {
                log::warn!("save: {e}");
                self.report.rejected += 1;
                return;
            }
        };
        match std::fs::write(&path, png) {
            Ok(()) => {
                log::info!("saved {path:?}");
                self.report.saved.push(path);
            }
            Err(e) => {
                log::error!("failed to write {path:?}: {e:#}");
                self.report.rejected += 1;
            }
        }
    }
    /// Perform an action, logging anything that didn't take.
    async fn action<R: Recognizer + ?Sized>(&mut self, action: Action, recognizer: &R) {
        let is_submit = action == Action::Submit;
        match self.dispatcher.run(action, recognizer, self.now).await {
            // Saves go through `Self::save`.
            Ok(Effect::Saved(_)) => (),
            Ok(Effect::Loaded(placement)) => {
                log::info!(
                    "image placed at ({}, {}) size {}x{}",
                    placement.x,
                    placement.y,
                    placement.width,
                    placement.height
                );
            }
            Ok(Effect::Listening(listening)) => {
                log::info!("voice commands {}", if listening { "on" } else { "off" });
            }
            Ok(Effect::Completed(completion)) => {
                self.report.submissions += 1;
                if completion == Completion::Failed {
                    self.report.failed_submissions += 1;
                }
            }
            Ok(Effect::Done | Effect::Pending(_)) => (),
            Err(DispatchError::Voice(e)) => {
                // Not fatal, everything else keeps working.
                println!("Voice commands unavailable: {e}");
                self.report.rejected += 1;
            }
            Err(e) => {
                log::warn!("{}: {e}", if is_submit { "submit" } else { "action" });
                self.report.rejected += 1;
            }
        }
    }
}
