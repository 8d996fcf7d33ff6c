use dmxp_bounded::{BoundedBuffer, BufferError, CancelToken, Snapshot};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn simple_produce_consume() {
    let buffer = BoundedBuffer::new(16).unwrap();
    let cancel = CancelToken::new();

    buffer.produce(7u32, &cancel).unwrap();
    assert_eq!(buffer.len(), 1);

    assert_eq!(buffer.consume(&cancel).unwrap(), 7);
    assert!(buffer.is_empty());
}

#[test]
fn zero_capacity_is_rejected() {
    let result = BoundedBuffer::<u32>::new(0);
    assert!(matches!(result, Err(BufferError::InvalidCapacity { capacity: 0 })));
}

#[test]
fn zero_is_an_ordinary_payload() {
    let buffer = BoundedBuffer::new(2).unwrap();
    let cancel = CancelToken::new();

    buffer.produce(0u32, &cancel).unwrap();
    let snapshot = buffer.snapshot();
    assert!(snapshot.occupied(0));
    assert_eq!(snapshot.pending().copied().collect::<Vec<_>>(), vec![0]);

    assert_eq!(buffer.consume(&cancel).unwrap(), 0);
}

#[test]
fn full_buffer() {
    let buffer = BoundedBuffer::new(4).unwrap();

    // Fill buffer
    for i in 0..4u32 {
        assert!(buffer.try_produce(i).is_ok());
    }
    assert!(buffer.is_full());

    // Next produce hands the item back
    assert_eq!(buffer.try_produce(99), Err(99));

    // Dequeue one
    assert_eq!(buffer.try_consume(), Some(0));

    // Produce should succeed now
    assert!(buffer.try_produce(4).is_ok());
    assert_eq!(buffer.try_consume(), Some(1));
}

#[test]
fn try_consume_on_empty_returns_none() {
    let buffer = BoundedBuffer::<u32>::new(3).unwrap();
    assert_eq!(buffer.try_consume(), None);
    assert_eq!(buffer.permits().empty, 3);
    assert_eq!(buffer.permits().filled, 0);
}

#[test]
fn fourth_produce_waits_for_first_consume() {
    let buffer = Arc::new(BoundedBuffer::new(3).unwrap());
    let cancel = CancelToken::new();

    for item in [10u32, 20, 30] {
        buffer.produce(item, &cancel).unwrap();
    }

    let blocked = {
        let buffer = Arc::clone(&buffer);
        let cancel = cancel.clone();
        thread::spawn(move || buffer.produce(40, &cancel))
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!blocked.is_finished(), "produce(40) must wait on a full buffer");

    assert_eq!(buffer.consume(&cancel).unwrap(), 10);
    blocked.join().unwrap().unwrap();

    assert_eq!(buffer.consume(&cancel).unwrap(), 20);
    assert_eq!(buffer.consume(&cancel).unwrap(), 30);
    assert_eq!(buffer.consume(&cancel).unwrap(), 40);
}

#[test]
fn capacity_one_is_a_strict_handoff() {
    let buffer = Arc::new(BoundedBuffer::new(1).unwrap());
    let cancel = CancelToken::new();

    buffer.produce(1u32, &cancel).unwrap();

    let second = {
        let buffer = Arc::clone(&buffer);
        let cancel = cancel.clone();
        thread::spawn(move || buffer.produce(2, &cancel))
    };
    thread::sleep(Duration::from_millis(50));
    assert!(!second.is_finished());
    assert_eq!(buffer.snapshot().pending().copied().collect::<Vec<_>>(), vec![1]);

    assert_eq!(buffer.consume(&cancel).unwrap(), 1);
    second.join().unwrap().unwrap();
    assert_eq!(buffer.consume(&cancel).unwrap(), 2);

    let snapshot = buffer.snapshot();
    assert_eq!((snapshot.write_cursor, snapshot.read_cursor), (0, 0));
}

#[test]
fn cursors_wrap_and_permits_add_up() {
    let buffer = BoundedBuffer::new(5).unwrap();
    let cancel = CancelToken::new();

    for round in 0..7u32 {
        for k in 0..3 {
            buffer.produce(round * 10 + k, &cancel).unwrap();
        }
        for k in 0..3 {
            assert_eq!(buffer.consume(&cancel).unwrap(), round * 10 + k);
        }
        let permits = buffer.permits();
        assert_eq!(permits.total(), 5);
        assert_eq!(permits.filled, 0);
    }

    // 21 writes and reads on 5 slots
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.write_cursor, 21 % 5);
    assert_eq!(snapshot.read_cursor, 21 % 5);
}

#[test]
fn snapshot_tracks_occupancy_from_cursors() {
    let buffer = BoundedBuffer::new(4).unwrap();
    let cancel = CancelToken::new();

    for item in [5u32, 6, 7, 8] {
        buffer.produce(item, &cancel).unwrap();
    }
    buffer.consume(&cancel).unwrap();
    buffer.consume(&cancel).unwrap();
    buffer.produce(9, &cancel).unwrap();

    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.write_cursor, 1);
    assert_eq!(snapshot.read_cursor, 2);
    assert_eq!(snapshot.filled, 3);
    assert_eq!(
        (0..4).map(|i| snapshot.occupied(i)).collect::<Vec<_>>(),
        vec![true, false, true, true]
    );
    assert_eq!(snapshot.pending().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    assert!(!snapshot.occupied(17));
}

#[test]
fn snapshot_renders_cells_and_markers() {
    let snapshot = Snapshot {
        write_cursor: 2,
        read_cursor: 0,
        filled: 2,
        capacity: 3,
        slots: vec![Some(4u32), Some(12), None],
    };

    let rendered = snapshot.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "[  4][ 12][   ]");
    assert_eq!(lines[1], "  R         W");
    assert_eq!(lines[2], "write=2 read=0 filled=2/3");
}

#[test]
fn snapshot_hides_consumed_values_and_marks_shared_cursor() {
    let buffer = BoundedBuffer::new(2).unwrap();
    let cancel = CancelToken::new();
    buffer.produce(3u32, &cancel).unwrap();
    buffer.consume(&cancel).unwrap();

    let rendered = buffer.snapshot().to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "[   ][   ]");
    assert_eq!(lines[1], "      W/R");
}

#[test]
fn debug_output_does_not_block_on_the_ring() {
    let buffer = BoundedBuffer::new(2).unwrap();
    buffer.try_produce(1u32).unwrap();

    let text = format!("{:?}", buffer);
    assert!(text.contains("capacity: 2"));
    assert!(text.contains("filled_slots: 1"));
}
