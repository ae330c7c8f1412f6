/*
[INPUT]:  Phrases announced at lifecycle transitions, narration settings, a speech device
[OUTPUT]: Best-effort spoken feedback, newest phrase preempting any playback in progress
[POS]:    Narration sink - single-slot channel plus background speaker worker
[UPDATE]: When changing voice selection, preemption, or device integration
*/

pub mod device;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use device::{CommandDevice, SilentDevice};

/// Errors a speech device may report. The narrator logs and drops them.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("speech device unavailable: {0}")]
    Unavailable(String),

    #[error("speech process failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("speech process exited with status {0}")]
    Exit(i32),
}

/// A voice offered by the speech device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub id: String,
}

/// One phrase ready for the device.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub voice: Option<Voice>,
}

/// Speech output. Dropping the future returned by `speak` must stop playback.
#[async_trait]
pub trait NarrationDevice: Send + Sync {
    fn voices(&self) -> Vec<Voice>;

    async fn speak(&self, utterance: &Utterance) -> Result<(), NarrationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationSettings {
    pub enabled: bool,
    pub rate: f32,
    pub pitch: f32,
    /// Substrings matched against device voice names, in order of preference
    pub preferred_voices: Vec<String>,
    /// Speech command; empty means the silent device
    pub program: String,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            pitch: 1.0,
            preferred_voices: vec![
                "Google US English".to_string(),
                "Microsoft David".to_string(),
            ],
            program: "espeak-ng".to_string(),
        }
    }
}

/// Pick the first device voice matching a preferred substring, in preference order.
pub fn select_voice(voices: &[Voice], preferred: &[String]) -> Option<Voice> {
    preferred.iter().find_map(|wanted| {
        voices
            .iter()
            .find(|voice| voice.name.contains(wanted.as_str()))
            .cloned()
    })
}

/// Fire-and-forget announcer.
///
/// Phrases go through a single-slot `watch` channel: a new phrase overwrites
/// whatever is waiting and cancels whatever is playing.
pub struct Narrator {
    enabled: bool,
    slot: watch::Sender<Option<String>>,
    shutdown: CancellationToken,
    worker_handle: Option<tokio::task::JoinHandle<()>>,
}

impl Narrator {
    /// Create a narrator and start its worker on the current Tokio runtime.
    pub fn new(device: Arc<dyn NarrationDevice>, settings: NarrationSettings) -> Self {
        let (slot, slot_rx) = watch::channel(None);
        let shutdown = CancellationToken::new();
        let enabled = settings.enabled;

        let worker_handle = if tokio::runtime::Handle::try_current().is_ok() {
            let worker = NarrationWorker {
                device,
                settings,
                slot: slot_rx,
                shutdown: shutdown.clone(),
            };
            Some(tokio::spawn(worker.run()))
        } else {
            warn!("Narrator created without Tokio runtime; narration disabled");
            None
        };

        Self {
            enabled,
            slot,
            shutdown,
            worker_handle,
        }
    }

    /// Narrator backed by a device that never makes a sound.
    pub fn silent() -> Self {
        Self::new(
            Arc::new(SilentDevice),
            NarrationSettings {
                enabled: false,
                ..NarrationSettings::default()
            },
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Queue a phrase, preempting anything queued or playing. Never blocks.
    pub fn announce(&self, phrase: &str) {
        if !self.enabled || self.worker_handle.is_none() {
            return;
        }
        debug!(phrase, "narration queued");
        self.slot.send_replace(Some(phrase.to_string()));
    }

    /// Stop the worker; playback in progress is cut.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct NarrationWorker {
    device: Arc<dyn NarrationDevice>,
    settings: NarrationSettings,
    slot: watch::Receiver<Option<String>>,
    shutdown: CancellationToken,
}

impl NarrationWorker {
    async fn run(mut self) {
        let mut next: Option<String> = None;

        loop {
            let phrase = match next.take() {
                Some(phrase) => phrase,
                None => {
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        changed = self.slot.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                    match self.slot.borrow_and_update().clone() {
                        Some(phrase) => phrase,
                        None => continue,
                    }
                }
            };

            let utterance = self.utterance_for(phrase);
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.device.speak(&utterance) => {
                    if let Err(err) = result {
                        warn!(error = %err, "narration failed");
                    }
                }
                changed = self.slot.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!(preempted = %utterance.text, "narration preempted");
                    next = self.slot.borrow_and_update().clone();
                }
            }
        }
    }

    fn utterance_for(&self, text: String) -> Utterance {
        let voice = select_voice(&self.device.voices(), &self.settings.preferred_voices);
        Utterance {
            text,
            rate: self.settings.rate,
            pitch: self.settings.pitch,
            voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Played {
        Started(String),
        Finished(String),
        Cancelled(String),
    }

    struct RecordingDevice {
        voices: Vec<Voice>,
        hold: Duration,
        fail: bool,
        events: mpsc::UnboundedSender<Played>,
        last_voice: std::sync::Mutex<Option<Voice>>,
    }

    struct CancelGuard {
        text: String,
        events: mpsc::UnboundedSender<Played>,
        finished: bool,
    }

    impl Drop for CancelGuard {
        fn drop(&mut self) {
            if !self.finished {
                let _ = self.events.send(Played::Cancelled(self.text.clone()));
            }
        }
    }

    #[async_trait]
    impl NarrationDevice for RecordingDevice {
        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        async fn speak(&self, utterance: &Utterance) -> Result<(), NarrationError> {
            *self.last_voice.lock().expect("voice lock") = utterance.voice.clone();
            if self.fail {
                return Err(NarrationError::Unavailable("no voices".to_string()));
            }
            let _ = self.events.send(Played::Started(utterance.text.clone()));
            let mut guard = CancelGuard {
                text: utterance.text.clone(),
                events: self.events.clone(),
                finished: false,
            };
            tokio::time::sleep(self.hold).await;
            guard.finished = true;
            let _ = self.events.send(Played::Finished(utterance.text.clone()));
            Ok(())
        }
    }

    fn recording(
        hold: Duration,
        voices: Vec<Voice>,
        fail: bool,
    ) -> (Arc<RecordingDevice>, mpsc::UnboundedReceiver<Played>) {
        let (events, rx) = mpsc::unbounded_channel();
        let device = Arc::new(RecordingDevice {
            voices,
            hold,
            fail,
            events,
            last_voice: std::sync::Mutex::new(None),
        });
        (device, rx)
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<Played>) -> Played {
        timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("narration event timed out")
            .expect("device dropped")
    }

    fn voice(name: &str) -> Voice {
        Voice {
            name: name.to_string(),
            id: name.to_lowercase(),
        }
    }

    #[tokio::test]
    async fn test_newer_phrase_preempts_playing_phrase() {
        let (device, mut rx) = recording(Duration::from_millis(300), vec![], false);
        let narrator = Narrator::new(device, NarrationSettings::default());

        narrator.announce("A");
        assert_eq!(next_event(&mut rx).await, Played::Started("A".to_string()));

        narrator.announce("B");
        assert_eq!(next_event(&mut rx).await, Played::Cancelled("A".to_string()));
        assert_eq!(next_event(&mut rx).await, Played::Started("B".to_string()));
        assert_eq!(next_event(&mut rx).await, Played::Finished("B".to_string()));
    }

    #[tokio::test]
    async fn test_back_to_back_announcements_only_finish_last() {
        let (device, mut rx) = recording(Duration::from_millis(50), vec![], false);
        let narrator = Narrator::new(device, NarrationSettings::default());

        narrator.announce("A");
        narrator.announce("B");

        loop {
            match next_event(&mut rx).await {
                Played::Finished(text) => {
                    assert_eq!(text, "B");
                    break;
                }
                Played::Started(_) | Played::Cancelled(_) => {}
            }
        }
    }

    #[tokio::test]
    async fn test_disabled_narrator_is_silent() {
        let (device, mut rx) = recording(Duration::ZERO, vec![], false);
        let mut narrator = Narrator::new(
            device,
            NarrationSettings {
                enabled: false,
                ..NarrationSettings::default()
            },
        );

        narrator.announce("hello");
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());

        narrator.set_enabled(true);
        narrator.announce("again");
        assert_eq!(next_event(&mut rx).await, Played::Started("again".to_string()));
    }

    #[tokio::test]
    async fn test_device_failure_is_swallowed() {
        let (device, mut rx) = recording(Duration::ZERO, vec![], true);
        let narrator = Narrator::new(device, NarrationSettings::default());

        narrator.announce("first");
        narrator.announce("second");
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
        assert!(narrator.is_enabled());
    }

    #[tokio::test]
    async fn test_preferred_voice_is_used() {
        let voices = vec![voice("eSpeak default"), voice("Microsoft David Desktop")];
        let (device, mut rx) = recording(Duration::ZERO, voices, false);
        let narrator = Narrator::new(device.clone(), NarrationSettings::default());

        narrator.announce("hi");
        assert_eq!(next_event(&mut rx).await, Played::Started("hi".to_string()));
        let chosen = device.last_voice.lock().expect("voice lock").clone();
        assert_eq!(chosen, Some(voice("Microsoft David Desktop")));
    }

    #[test]
    fn test_select_voice_falls_back_to_default() {
        let voices = vec![voice("en-us"), voice("fr")];
        assert_eq!(select_voice(&voices, &NarrationSettings::default().preferred_voices), None);
    }

    #[test]
    fn test_select_voice_respects_preference_order() {
        let voices = vec![voice("Microsoft David"), voice("Google US English")];
        let preferred = vec!["Google US English".to_string(), "Microsoft David".to_string()];
        assert_eq!(select_voice(&voices, &preferred), Some(voice("Google US English")));
    }

    #[test]
    fn test_announce_without_runtime_is_noop() {
        let narrator = Narrator::new(Arc::new(SilentDevice), NarrationSettings::default());
        narrator.announce("nobody hears this");
        assert!(narrator.is_enabled());
    }
}
