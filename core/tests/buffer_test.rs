// Aggregation buffer: consolidation in both visualisations, split
// staggering, and epoch reset.
use murmur_core::{CategoryBuffer, DelayedCircleEvent, GeoPoint, ServiceEvent, Visualisation};

fn circle(title: &str, radius: f64) -> DelayedCircleEvent {
    DelayedCircleEvent {
        event: ServiceEvent::MinervaPublicMessage,
        title: title.to_string(),
        radius,
        delay: 0,
        location: Some(GeoPoint { lat: 48.5, long: 9.0 }),
    }
}

#[test]
fn aggregate_release_merges_the_whole_buffer_into_one_event() {
    let mut buffer = CategoryBuffer::new(142, 1000);
    buffer.add(circle("A", 10.0));
    buffer.add(circle("A", 20.0));
    buffer.add(circle("B", 30.0));

    let released = buffer.consolidate(Visualisation::ListenTo, 10.0);
    assert_eq!(released.len(), 1);
    let event = &released[0];
    assert_eq!(event.radius, 20.0);
    assert_eq!(event.delay, 0);
    assert!(event.title.starts_with('A') || event.title.starts_with('B'));
    assert!(event.title.contains(" and 1 others"));
    assert!(event.title.ends_with("[3 messages]"));
}

#[test]
fn a_single_distinct_title_gets_no_suffix() {
    let mut buffer = CategoryBuffer::new(142, 1000);
    buffer.add(circle("A", 10.0));
    buffer.add(circle("A", 30.0));

    let released = buffer.consolidate(Visualisation::ListenTo, 10.0);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].title, "A");
    assert_eq!(released[0].radius, 20.0);
}

#[test]
fn geo_release_emits_one_marker_per_distinct_title() {
    let mut buffer = CategoryBuffer::new(142, 1000);
    buffer.add(circle("A", 10.0));
    buffer.add(circle("A", 20.0));
    buffer.add(circle("B", 30.0));

    let released = buffer.consolidate(Visualisation::Geo, 7.0);
    assert_eq!(released.len(), 2);
    assert_eq!(released[0].title, "A [2 messages]");
    assert_eq!(released[1].title, "B [1 messages]");
    for event in &released {
        assert_eq!(event.radius, 7.0);
        assert!(event.location.is_some());
    }
}

#[test]
fn split_produces_staggered_chunks_with_increasing_delays() {
    let mut buffer = CategoryBuffer::new(142, 1000);
    for i in 0..10 {
        buffer.add(circle(&format!("t{i}"), 5.0));
    }

    let chunks = buffer.split_chunks(3);
    assert_eq!(chunks.len(), 4);
    let sizes: Vec<usize> = chunks.iter().map(|(_, events)| events.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);

    let delays: Vec<u64> = chunks.iter().map(|(delay, _)| *delay).collect();
    assert_eq!(delays, vec![250, 500, 750, 1000]);
    assert!(delays[0] > 0, "the first chunk must never fire at delay 0");
    assert!(buffer.is_empty());
}

#[test]
fn splitting_fewer_events_than_chunks_degrades_to_single_event_chunks() {
    let mut buffer = CategoryBuffer::new(142, 1200);
    buffer.add(circle("a", 1.0));
    buffer.add(circle("b", 2.0));

    let chunks = buffer.split_chunks(3);
    assert_eq!(chunks.len(), 2);
    let delays: Vec<u64> = chunks.iter().map(|(delay, _)| *delay).collect();
    assert_eq!(delays, vec![600, 1200]);
}

#[test]
fn release_resets_the_buffer_for_a_fresh_epoch() {
    let mut buffer = CategoryBuffer::new(142, 1000);
    buffer.add(circle("old", 10.0));
    buffer.add(circle("older", 20.0));
    let _ = buffer.consolidate(Visualisation::ListenTo, 10.0);
    assert!(buffer.is_empty());

    buffer.add(circle("fresh", 42.0));
    let released = buffer.consolidate(Visualisation::ListenTo, 10.0);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].title, "fresh");
    assert_eq!(released[0].radius, 42.0);
}

#[test]
fn consolidating_an_empty_buffer_releases_nothing() {
    let mut buffer = CategoryBuffer::new(142, 1000);
    assert!(buffer.consolidate(Visualisation::ListenTo, 10.0).is_empty());
    assert!(buffer.split_chunks(3).is_empty());
}
