/// Progress reporting for rename runs.
/// Progress message types for consistent formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    /// File scanning completion
    ScanComplete {
        files_scanned: usize,
        audio_files_found: usize,
        files_skipped: usize,
    },
    /// About to run the encoder or copy tool on file number `file_num`
    FileCommand { file_num: usize, command: String },
    /// Dry run: what would have been run
    WouldRun { file_num: usize, command: String },
    /// Output already present
    FileSkipped { file_num: usize, destination: String },
    /// Final completion message
    FinalComplete { files_processed: usize },
}

impl ProgressMessage {
    /// Format the message for display
    pub fn format(&self) -> String {
        match self {
            ProgressMessage::ScanComplete {
                files_scanned,
                audio_files_found,
                files_skipped,
            } => {
                format!(
                    "Scanned {} files ({} audio files found, {} skipped)",
                    files_scanned, audio_files_found, files_skipped
                )
            }
            ProgressMessage::FileCommand { file_num, command } => {
                format!("{:04}: {}", file_num, command)
            }
            ProgressMessage::WouldRun { file_num, command } => {
                format!("{:04}: (dry run) {}", file_num, command)
            }
            ProgressMessage::FileSkipped {
                file_num,
                destination,
            } => {
                format!("{:04}: exists, skipping {}", file_num, destination)
            }
            ProgressMessage::FinalComplete { files_processed } => {
                format!("{} files processed.", files_processed)
            }
        }
    }

    /// Messages that are part of the normal output, as opposed to chatter
    /// that is only shown in verbose runs
    pub fn is_essential(&self) -> bool {
        matches!(
            self,
            ProgressMessage::FileCommand { .. }
                | ProgressMessage::WouldRun { .. }
                | ProgressMessage::FinalComplete { .. }
        )
    }
}

/// Where progress messages go
pub trait ProgressSink {
    fn send(&mut self, message: ProgressMessage);
}

/// Prints progress lines on stdout.
pub struct StdoutProgress {
    pub verbose: bool,
}

impl ProgressSink for StdoutProgress {
    fn send(&mut self, message: ProgressMessage) {
        if self.verbose || message.is_essential() {
            println!("{}", message.format());
        }
    }
}

/// Collects formatted lines; handy for tests and callers that render later
impl ProgressSink for Vec<String> {
    fn send(&mut self, message: ProgressMessage) {
        self.push(message.format());
    }
}
