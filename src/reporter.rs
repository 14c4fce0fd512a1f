use bytesize::ByteSize;
use std::time::Duration;

use crate::events::Event;

/// Reporter aggregates events and produces human or JSON output.
pub struct Reporter {
    events: Vec<Event>,
    json_mode: bool,
}

impl Reporter {
    pub fn new(json_mode: bool) -> Self {
        Self {
            events: Vec::new(),
            json_mode,
        }
    }

    pub fn record(&mut self, event: Event) {
        if self.json_mode {
            // Emit JSON line to stdout
            if let Ok(line) = serde_json::to_string(&event) {
                println!("{}", line);
            }
        } else {
            match &event {
                Event::ScaffoldAborted { message, .. } => eprintln!("🛑 {message}"),
                Event::ScaffoldCompleted { .. } => {
                    if let Some(text) = human_summary(&event) {
                        println!("{text}");
                    }
                }
                _ => {}
            }
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

/// Human-readable lines for a completed run.
pub fn human_summary(event: &Event) -> Option<String> {
    let Event::ScaffoldCompleted {
        destination,
        dry_run,
        report,
        elapsed_ms,
        ..
    } = event
    else {
        return None;
    };
    let elapsed = humantime::format_duration(Duration::from_millis(*elapsed_ms));
    let size = ByteSize::b(report.bytes_copied);
    let text = if *dry_run {
        format!(
            "🔎 Dry run for {}: {} files ({size}) would be copied, {} existing files left untouched",
            destination.display(),
            report.files_copied,
            report.files_skipped,
        )
    } else {
        format!(
            "✅ Roo Code SPARC scaffold created in {}\n   {} files copied ({size}), {} existing files kept, in {elapsed}",
            destination.display(),
            report.files_copied,
            report.files_skipped,
        )
    };
    Some(text)
}
