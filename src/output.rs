// ABOUTME: Step events and their rendering for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Something that happened during a run, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeployEvent {
    /// A step began. `command` is omitted for silent steps.
    StepStarted {
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        command: Option<String>,
    },
    /// A step ended.
    StepFinished { description: String, success: bool },
    /// Informational line.
    Notice { message: String },
    /// Non-fatal problem.
    Warning { message: String },
}

/// Receives events from the pipeline.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DeployEvent);

    fn notice(&self, message: &str) {
        self.emit(DeployEvent::Notice {
            message: message.to_string(),
        });
    }

    fn warning(&self, message: &str) {
        self.emit(DeployEvent::Warning {
            message: message.to_string(),
        });
    }

    /// Whether child processes may write straight to the terminal. When this
    /// is false every command's output is captured instead.
    fn passes_through_output(&self) -> bool {
        true
    }
}

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only warnings, failures and the final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.print_json("success", message),
        }
    }

    /// Print a warning message.
    pub fn warn(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.print_json("warning", message),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.print_json("error", message),
        }
    }

    /// Print a one-line remediation hint after a failure.
    pub fn hint(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Hint: {message}"),
            OutputMode::Json => self.print_json("hint", message),
        }
    }

    fn print_json(&self, event: &str, message: &str) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.start_time.map(|_| self.elapsed_secs()),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            println!("{json}");
        }
    }
}

impl EventSink for Output {
    fn emit(&self, event: DeployEvent) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
            OutputMode::Normal => match event {
                DeployEvent::StepStarted {
                    description,
                    command,
                } => {
                    println!("\n====== {description} ======");
                    if let Some(command) = command {
                        println!("  $ {command}");
                    }
                }
                DeployEvent::StepFinished {
                    description,
                    success: true,
                } => println!("  ✓ {description}"),
                DeployEvent::StepFinished {
                    description,
                    success: false,
                } => eprintln!("  ✗ {description}"),
                DeployEvent::Notice { message } => println!("  → {message}"),
                DeployEvent::Warning { message } => eprintln!("  ! {message}"),
            },
            OutputMode::Quiet => match event {
                DeployEvent::StepFinished {
                    description,
                    success: false,
                } => eprintln!("✗ {description}"),
                DeployEvent::Warning { message } => eprintln!("Warning: {message}"),
                _ => {}
            },
        }
    }

    // Quiet keeps stdout to the final result, JSON keeps it to one object per line.
    fn passes_through_output(&self) -> bool {
        self.mode == OutputMode::Normal
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = DeployEvent::StepFinished {
            description: "Upload".to_string(),
            success: false,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"step_finished","description":"Upload","success":false}"#
        );
    }

    #[test]
    fn silent_step_omits_command() {
        let event = DeployEvent::StepStarted {
            description: "Back up".to_string(),
            command: None,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"step_started","description":"Back up"}"#
        );
    }

    #[test]
    fn only_normal_mode_passes_output_through() {
        assert!(Output::new(OutputMode::Normal).passes_through_output());
        assert!(!Output::new(OutputMode::Quiet).passes_through_output());
        assert!(!Output::new(OutputMode::Json).passes_through_output());
    }

    #[test]
    fn timer_starts_at_zero() {
        let output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), 0.0);
    }
}
