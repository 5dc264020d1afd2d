//! Clipboard sink used by the copy action.

use anyhow::{Context, Result};
use std::time::Duration;

/// Accepts a text blob for the system clipboard.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard, via `arboard`.
///
/// The handle is opened on the first copy and kept for the life of the value:
/// on X11 and Wayland the copied text is only served while its owner is alive.
/// Headless sessions fail at the first copy rather than at startup.
///
/// A process that exits right after copying should use [`holding_for`]. On
/// Linux that keeps serving the text until another application takes the
/// clipboard over or the hold runs out. Without a clipboard manager the text
/// is gone once the hold ends and the process exits. Other platforms copy the
/// text into the system clipboard and ignore the hold.
///
/// [`holding_for`]: SystemClipboard::holding_for
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
    hold: Option<Duration>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding_for(hold: Duration) -> Self {
        Self {
            handle: None,
            hold: Some(hold).filter(|hold| !hold.is_zero()),
        }
    }

    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        let clipboard = match self.handle.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("Clipboard is unavailable")?,
        };
        Ok(self.handle.insert(clipboard))
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let hold = self.hold;
        let written = write_text(self.handle()?, text, hold);
        if written.is_err() {
            self.handle = None;
        }
        written.context("Failed to write to clipboard")
    }
}

#[cfg(target_os = "linux")]
fn write_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    hold: Option<Duration>,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    match hold {
        Some(hold) => {
            log::debug!("Serving clipboard contents for up to {:?}", hold);
            clipboard
                .set()
                .wait_until(std::time::Instant::now() + hold)
                .text(text.to_string())
        }
        None => clipboard.set_text(text.to_string()),
    }
}

#[cfg(not(target_os = "linux"))]
fn write_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    _hold: Option<Duration>,
) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_only_when_requested() {
        assert_eq!(SystemClipboard::new().hold(), None);
        assert_eq!(
            SystemClipboard::holding_for(Duration::from_secs(3)).hold(),
            Some(Duration::from_secs(3))
        );
        assert_eq!(SystemClipboard::holding_for(Duration::ZERO).hold(), None);
    }
}
