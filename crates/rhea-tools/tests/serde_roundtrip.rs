#![cfg(feature = "serde")]

use rhea_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let log = TraceLog {
        events: vec![
            TraceEvent::new(1, "rhea.replan").with_a(1).with_b(12),
            TraceEvent::new(2, "rhea.skip").with_a(1),
            TraceEvent::new(3, "rhea.opportunity.track").with_a(2),
        ],
    };

    let json = serde_json::to_string(&log).expect("serialize");
    let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, log);
}
