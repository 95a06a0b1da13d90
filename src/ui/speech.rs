use std::process::Command;

use tracing::debug;

/// Fire-and-forget text-to-speech through the platform synthesizer. Used
/// by the 🔊 buttons on spelling and phonics cards; where no synthesizer
/// exists the button silently does nothing.
pub fn speak(text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if let Err(e) = spawn_synth(text) {
        debug!(%e, "speech synthesis unavailable");
    }
}

#[cfg(target_os = "macos")]
fn spawn_synth(text: &str) -> std::io::Result<()> {
    Command::new("say").arg(text).spawn().map(|_| ())
}

#[cfg(target_os = "windows")]
fn spawn_synth(text: &str) -> std::io::Result<()> {
    let escaped = text.replace('\'', "''");
    Command::new("powershell")
        .args([
            "-NoProfile",
            "-Command",
            &format!(
                "Add-Type -AssemblyName System.Speech; \
                 (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{escaped}')"
            ),
        ])
        .spawn()
        .map(|_| ())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn spawn_synth(text: &str) -> std::io::Result<()> {
    Command::new("espeak").arg(text).spawn().map(|_| ())
}
