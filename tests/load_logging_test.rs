use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use jarvis::chatbot::Chatbot;
use jarvis::config::ChatbotConfig;
use jarvis::resolver::UNAVAILABLE_RESPONSE;
use jarvis::store::ArtifactPaths;

/// Logger that keeps every error record for inspection.
struct ErrorRecorder {
    records: Mutex<Vec<String>>,
}

impl Log for ErrorRecorder {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Error
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static RECORDER: ErrorRecorder = ErrorRecorder {
    records: Mutex::new(Vec::new()),
};

// The only test in this binary, so it owns the global logger.
#[test]
fn load_failure_is_logged_once() {
    log::set_logger(&RECORDER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let dir = tempfile::tempdir().unwrap();
    let config = ChatbotConfig {
        artifacts: ArtifactPaths::in_dir(dir.path().join("missing")),
        ..ChatbotConfig::default()
    };

    let chatbot = Chatbot::from_config(&config);
    assert!(!chatbot.is_available());
    assert_eq!(chatbot.get_reply("hello"), UNAVAILABLE_RESPONSE);

    let records = RECORDER.records.lock().unwrap();
    assert_eq!(records.len(), 1, "error records: {records:?}");
    assert!(records[0].contains("not found"), "{}", records[0]);
}
