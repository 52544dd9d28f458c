//! Tests for chaining a caller-provided detector with the local fallback

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use figurebox::core::{
    Detector, DiagramCoordinates, DiagramError, DiagramType, PixelBuffer, ValidationOptions,
};
use figurebox::detection::{DetectionOrchestrator, LocalDiagramDetector};

/// Stand-in for a remote model that can be switched off
struct RemoteDetector {
    online: bool,
    calls: Arc<AtomicUsize>,
}

impl Detector for RemoteDetector {
    fn detect(&self, buffer: &PixelBuffer) -> Result<Vec<DiagramCoordinates>, DiagramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.online {
            return Err(DiagramError::detection_error("service unavailable".to_string()));
        }
        let w = buffer.width as f64;
        Ok(vec![
            DiagramCoordinates::new(10.0, 10.0, w / 2.0, 80.0)
                .with_type(DiagramType::Circuit)
                .with_confidence(0.95)
                .with_description("remote"),
            // Non-finite corner, repaired by sanitizing.
            DiagramCoordinates::new(f64::NAN, 0.0, 5.0, 5.0),
        ])
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

fn outlined_page() -> PixelBuffer {
    let mut page = PixelBuffer::filled(300, 300, [255, 255, 255, 255]);
    for i in 50..=200 {
        for t in 0..2 {
            page.set_pixel(i, 50 + t, [0, 0, 0, 255]);
            page.set_pixel(i, 200 - t, [0, 0, 0, 255]);
            page.set_pixel(50 + t, i, [0, 0, 0, 255]);
            page.set_pixel(200 - t, i, [0, 0, 0, 255]);
        }
    }
    page
}

fn orchestrator(online: bool) -> (DetectionOrchestrator, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut orchestrator = DetectionOrchestrator::new();
    orchestrator.register_detector(
        "remote".to_string(),
        Box::new(RemoteDetector {
            online,
            calls: Arc::clone(&calls),
        }),
    );
    orchestrator.register_detector("local".to_string(), Box::new(LocalDiagramDetector::new()));
    (orchestrator, calls)
}

#[test]
fn test_remote_result_preferred() {
    let (orchestrator, calls) = orchestrator(true);
    let outcome = orchestrator.detect(&outlined_page());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.source.as_deref(), Some("remote"));
    assert_eq!(outcome.diagrams.len(), 2);
    assert_eq!(outcome.diagrams[0].description, "remote");
    assert_eq!(outcome.diagrams[0].diagram_type, DiagramType::Circuit);
}

#[test]
fn test_non_finite_boxes_are_repaired_before_screening() {
    let (orchestrator, _) = orchestrator(true);
    let outcome = orchestrator.detect(&outlined_page());
    let repaired = &outcome.diagrams[1];
    assert!(repaired.is_finite());
    assert_eq!((repaired.x1, repaired.x2), (0.0, 10.0));
}

#[test]
fn test_falls_back_to_local_when_remote_fails() {
    let (orchestrator, calls) = orchestrator(false);
    let outcome = orchestrator.detect(&outlined_page());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.source.as_deref(), Some("local"));
    assert_eq!(outcome.diagrams.len(), 1);
    assert_eq!(orchestrator.get_detectors(), vec!["remote", "local"]);
}

#[test]
fn test_screening_options_apply() {
    let (orchestrator, _) = orchestrator(true);
    let strict = orchestrator.with_options(ValidationOptions {
        min_size: 200.0,
        ..ValidationOptions::default()
    });
    assert_eq!(strict.options().min_size, 200.0);
    // Sanitizing grows every box to 200px, which the 300px page can hold.
    let outcome = strict.detect(&outlined_page());
    assert_eq!(outcome.source.as_deref(), Some("remote"));
    assert!(outcome.diagrams.iter().all(|d| d.width() >= 200.0));
}

#[test]
fn test_detectors_are_shareable_across_threads() {
    let detector = Arc::new(LocalDiagramDetector::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let detector = Arc::clone(&detector);
            std::thread::spawn(move || detector.detect_diagrams(&outlined_page()).len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
