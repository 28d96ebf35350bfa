use std::cell::RefCell;
use std::rc::Rc;

use rhea_tools::{TraceEvent, TraceSink, Tracer};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn disabled_tracer_drops_events() {
    let mut tracer = Tracer::new();
    assert!(!tracer.is_enabled());

    tracer.emit(TraceEvent::new(1, "rhea.replan"));
    assert!(tracer.log().is_none());
}

#[test]
fn emit_writes_to_log_when_enabled() {
    let mut tracer = Tracer::new().with_log();

    tracer.emit(TraceEvent::new(1, "rhea.replan").with_a(10).with_b(20));

    let log = tracer.log().unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].tick, 1);
    assert_eq!(log.events[0].tag, "rhea.replan");
    assert_eq!(log.events[0].a, 10);
    assert_eq!(log.events[0].b, 20);
}

#[test]
fn emit_writes_to_both_log_and_sink() {
    let handle = RcSink::default();
    let shared = handle.0.clone();
    let mut tracer = Tracer::new().with_log().with_sink(Box::new(handle));

    tracer.emit(TraceEvent::new(3, "rhea.skip").with_a(2));

    assert_eq!(tracer.log().unwrap().count("rhea.skip"), 1);
    let events = shared.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].a, 2);
}

#[test]
fn take_log_drains_but_keeps_logging() {
    let mut tracer = Tracer::new().with_log();
    tracer.emit(TraceEvent::new(1, "a"));
    tracer.emit(TraceEvent::new(2, "b"));

    let drained = tracer.take_log().unwrap();
    assert_eq!(drained.events.len(), 2);
    assert_eq!(drained.last("b").map(|e| e.tick), Some(2));

    tracer.emit(TraceEvent::new(3, "a"));
    assert_eq!(tracer.log().unwrap().events.len(), 1);
}

#[test]
fn closure_sink_receives_events() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let recorder = seen.clone();
    let mut tracer = Tracer::new().with_sink(Box::new(move |event: TraceEvent| {
        recorder.borrow_mut().push(event.tag.into_owned());
    }));

    tracer.emit(TraceEvent::new(1, "rhea.maze.new"));
    tracer.emit(TraceEvent::new(1, "rhea.replan"));

    assert!(tracer.log().is_none());
    assert_eq!(*seen.borrow(), vec!["rhea.maze.new", "rhea.replan"]);
}
