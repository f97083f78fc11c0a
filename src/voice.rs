use crate::errors::{AppError, AppResult};
use crate::models::Task;
use crate::notifications::Notifier;
use crate::tasks::{parse_quick_entry, TaskBoard};
use serde::Serialize;

pub const UNSUPPORTED_MESSAGE: &str = "Speech recognition is not supported in your browser";
pub const LISTENING_MESSAGE: &str = "Listening... Speak now";
pub const RECOGNITION_FAILED_MESSAGE: &str = "Failed to recognize speech. Please try again.";
pub const EMPTY_TRANSCRIPT_MESSAGE: &str = "Please speak a task title";
pub const EMPTY_TYPED_MESSAGE: &str = "Please enter a task title";

/// Continuous recognizer owned by the capture panel.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> AppResult<()>;
    fn stop(&mut self);
}

/// Recognition runs in the shell; results arrive through `VoiceCapture::on_result`.
#[derive(Debug, Default)]
pub struct HostRecognizer {
    running: bool,
}

impl HostRecognizer {
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl SpeechRecognizer for HostRecognizer {
    fn start(&mut self) -> AppResult<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceState {
    pub supported: bool,
    pub listening: bool,
    pub transcript: String,
    pub typed: String,
}

pub struct VoiceCapture {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    listening: bool,
    transcript: String,
    typed: String,
}

impl std::fmt::Debug for VoiceCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceCapture")
            .field("supported", &self.recognizer.is_some())
            .field("listening", &self.listening)
            .field("transcript", &self.transcript)
            .finish()
    }
}

impl VoiceCapture {
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            listening: false,
            transcript: String::new(),
            typed: String::new(),
        }
    }

    pub fn state(&self) -> VoiceState {
        VoiceState {
            supported: self.recognizer.is_some(),
            listening: self.listening,
            transcript: self.transcript.clone(),
            typed: self.typed.clone(),
        }
    }

    pub fn toggle_listening(&mut self, notifier: &Notifier) -> VoiceState {
        let Some(recognizer) = self.recognizer.as_mut() else {
            notifier.error(UNSUPPORTED_MESSAGE);
            return self.state();
        };

        if self.listening {
            recognizer.stop();
            self.listening = false;
        } else {
            match recognizer.start() {
                Ok(()) => {
                    self.transcript.clear();
                    self.listening = true;
                    notifier.info(LISTENING_MESSAGE);
                }
                Err(error) => {
                    tracing::warn!(error = %error, "speech recognizer failed to start");
                    notifier.error(RECOGNITION_FAILED_MESSAGE);
                }
            }
        }
        self.state()
    }

    /// Each interim or final result replaces the transcript.
    pub fn on_result(&mut self, transcript: &str) {
        if !self.listening {
            tracing::debug!("speech result ignored while not listening");
            return;
        }
        self.transcript = transcript.to_string();
    }

    pub fn on_error(&mut self, reason: &str, notifier: &Notifier) {
        tracing::warn!(reason = %reason, "speech recognition error");
        notifier.error(RECOGNITION_FAILED_MESSAGE);
    }

    pub fn set_typed(&mut self, value: &str) {
        self.typed = value.to_string();
    }

    pub fn submit(&mut self, board: &mut TaskBoard, notifier: &Notifier) -> AppResult<Task> {
        if self.transcript.trim().is_empty() {
            notifier.error(EMPTY_TRANSCRIPT_MESSAGE);
            return Err(AppError::invalid(EMPTY_TRANSCRIPT_MESSAGE));
        }
        let task = add_parsed(&self.transcript, board, notifier)?;
        self.transcript.clear();
        self.listening = false;
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        Ok(task)
    }

    pub fn submit_typed(&mut self, board: &mut TaskBoard, notifier: &Notifier) -> AppResult<Task> {
        if self.typed.trim().is_empty() {
            notifier.error(EMPTY_TYPED_MESSAGE);
            return Err(AppError::invalid(EMPTY_TYPED_MESSAGE));
        }
        let task = add_parsed(&self.typed, board, notifier)?;
        self.typed.clear();
        Ok(task)
    }
}

fn add_parsed(raw: &str, board: &mut TaskBoard, notifier: &Notifier) -> AppResult<Task> {
    match parse_quick_entry(raw) {
        Ok(entry) => board.add_entry(entry, notifier),
        Err(error) => {
            notifier.error(crate::tasks::EMPTY_TITLE_MESSAGE);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HostRecognizer, VoiceCapture};
    use crate::notifications::Notifier;
    use crate::tasks::TaskBoard;

    fn capture() -> VoiceCapture {
        VoiceCapture::new(Some(Box::new(HostRecognizer::default())))
    }

    #[test]
    fn unsupported_host_reports_and_changes_nothing() {
        let notifier = Notifier::new();
        let mut voice = VoiceCapture::new(None);
        let state = voice.toggle_listening(&notifier);
        assert!(!state.supported);
        assert!(!state.listening);
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Speech recognition is not supported in your browser")
        );
    }

    #[test]
    fn results_replace_transcript_and_submit_adds_task() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::default();
        let mut voice = capture();
        assert!(voice.toggle_listening(&notifier).listening);

        voice.on_result("Buy");
        voice.on_result("Buy milk with description Get 2% milk from the store");
        assert_eq!(
            voice.state().transcript,
            "Buy milk with description Get 2% milk from the store"
        );

        let task = voice.submit(&mut board, &notifier).expect("submit");
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some("Get 2% milk from the store"));
        let state = voice.state();
        assert!(!state.listening);
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn empty_submissions_are_rejected_with_distinct_messages() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::default();
        let mut voice = capture();

        assert!(voice.submit(&mut board, &notifier).is_err());
        assert_eq!(notifier.last_message().as_deref(), Some("Please speak a task title"));

        voice.set_typed("   ");
        assert!(voice.submit_typed(&mut board, &notifier).is_err());
        assert_eq!(notifier.last_message().as_deref(), Some("Please enter a task title"));
        assert!(board.list().is_empty());
    }

    #[test]
    fn recognition_error_keeps_listening_state() {
        let notifier = Notifier::new();
        let mut voice = capture();
        voice.toggle_listening(&notifier);
        voice.on_result("Call the bank");
        voice.on_error("network", &notifier);
        let state = voice.state();
        assert!(state.listening);
        assert_eq!(state.transcript, "Call the bank");
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Failed to recognize speech. Please try again.")
        );
    }

    #[test]
    fn typed_entry_clears_after_submit() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::default();
        let mut voice = capture();
        voice.set_typed("Renew passport: before June");
        let task = voice.submit_typed(&mut board, &notifier).expect("typed");
        assert_eq!(task.title, "Renew passport");
        assert!(voice.state().typed.is_empty());
    }
}
