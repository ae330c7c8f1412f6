/*
[INPUT]:  Utterances from the narration worker
[OUTPUT]: Speech through an external TTS command, or a log line for the silent device
[POS]:    Narration sink - concrete speech devices
[UPDATE]: When supporting another speech engine or changing argument mapping
*/

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{NarrationDevice, NarrationError, Utterance, Voice};

/// espeak-ng words per minute at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
/// espeak-ng pitch (0-99) at pitch 1.0
const BASE_PITCH: f32 = 50.0;

/// Speaks through an espeak-compatible command line program.
///
/// Each utterance is a child process spawned with `kill_on_drop`, so a
/// preempted `speak` future silences the audio by dropping the child.
#[derive(Debug, Clone)]
pub struct CommandDevice {
    program: String,
    voices: Vec<Voice>,
}

impl CommandDevice {
    /// Probe the program for its voice list. A program that cannot be run
    /// still yields a device; it reports errors on `speak`.
    pub async fn discover(program: impl Into<String>) -> Self {
        let program = program.into();
        let voices = match Command::new(&program)
            .arg("--voices")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                parse_voice_list(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                warn!(%program, status = ?output.status.code(), "voice listing failed");
                Vec::new()
            }
            Err(err) => {
                warn!(%program, error = %err, "speech program not available");
                Vec::new()
            }
        };
        info!(%program, voices = voices.len(), "speech device ready");
        Self { program, voices }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_command(&self, utterance: &Utterance) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-s")
            .arg(scaled(BASE_WORDS_PER_MINUTE, utterance.rate, 80, 450).to_string())
            .arg("-p")
            .arg(scaled(BASE_PITCH, utterance.pitch, 0, 99).to_string());
        if let Some(voice) = &utterance.voice {
            cmd.arg("-v").arg(&voice.id);
        }
        cmd.arg(&utterance.text);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl NarrationDevice for CommandDevice {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), NarrationError> {
        let mut child = self.build_command(utterance).spawn()?;
        debug!(program = %self.program, text = %utterance.text, "speaking");
        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(NarrationError::Exit(status.code().unwrap_or(-1)))
        }
    }
}

/// Device for muted or headless sessions: records the phrase in the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDevice;

#[async_trait]
impl NarrationDevice for SilentDevice {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), NarrationError> {
        info!(text = %utterance.text, "narration");
        Ok(())
    }
}

fn scaled(base: f32, factor: f32, min: u32, max: u32) -> u32 {
    let factor = if factor.is_finite() && factor > 0.0 { factor } else { 1.0 };
    ((base * factor).round() as u32).clamp(min, max)
}

/// Parse `espeak-ng --voices` output.
///
/// Columns: `Pty Language Age/Gender VoiceName File Other Languages`; the
/// file column is what `-v` accepts.
fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [_, _, _, name, file, ..] => Some(Voice {
                    name: name.replace('_', " "),
                    id: (*file).to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
