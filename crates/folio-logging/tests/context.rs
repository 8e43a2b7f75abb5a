//! View context under concurrency and in rendered JSONL output

use std::io;
use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;
use uuid::Uuid;

use folio_logging::{JsonlConfig, ViewContextGuard, ViewContextLayer, jsonl_layer, view_span};

/// Each thread sees only its own view context
#[test]
fn test_concurrent_view_contexts() {
    const NUM_THREADS: usize = 16;
    const ITERATIONS: usize = 200;

    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|thread_id| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let view = format!("view-{thread_id}");
                barrier.wait();

                for _ in 0..ITERATIONS {
                    let _guard = ViewContextGuard::new(view.clone());
                    assert_eq!(ViewContextGuard::current_view(), Some(view.clone()));
                }
                assert!(ViewContextGuard::current().is_none());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

/// Rapid remounting restores the outer context every time
#[test]
fn test_rapid_remounts() {
    let outer_session = Uuid::new_v4();
    let _outer = ViewContextGuard::with_session_id("portfolio", outer_session);

    for i in 0..5_000 {
        let _inner = ViewContextGuard::new(if i % 2 == 0 { "preview" } else { "print" });
        assert_ne!(ViewContextGuard::current_session_id(), Some(outer_session));
    }

    assert_eq!(ViewContextGuard::current_session_id(), Some(outer_session));
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_jsonl_lines_carry_view_fields() {
    let capture = Capture::default();
    let subscriber = Registry::default()
        .with(ViewContextLayer::new())
        .with(jsonl_layer(capture.clone(), &JsonlConfig::default()));

    let session_id = Uuid::new_v4();
    tracing::subscriber::with_default(subscriber, || {
        let _guard = ViewContextGuard::with_session_id("portfolio", session_id);
        let _span = view_span().entered();
        tracing::info!(section = "about", "Active section changed");
    });

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.contains("\"view\":\"portfolio\""), "{line}");
    assert!(line.contains(&session_id.to_string()), "{line}");
    assert!(line.contains("\"section\":\"about\""), "{line}");
    assert!(line.contains("Active section changed"), "{line}");
}
