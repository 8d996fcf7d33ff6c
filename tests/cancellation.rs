use dmxp_bounded::{BoundedBuffer, BufferError, CancelToken, PermitCounts};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn blocked_consumer_returns_cancelled_without_mutation() {
    let buffer = Arc::new(BoundedBuffer::<u32>::new(3).unwrap());
    let cancel = CancelToken::new();
    let before = buffer.snapshot();

    let consumer = {
        let buffer = Arc::clone(&buffer);
        let cancel = cancel.clone();
        thread::spawn(move || buffer.consume(&cancel))
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!consumer.is_finished());

    let cancelled_at = Instant::now();
    cancel.cancel();
    buffer.wake_all();
    let result = consumer.join().unwrap();

    assert!(matches!(result, Err(BufferError::Cancelled)));
    assert!(cancelled_at.elapsed() < Duration::from_millis(500));
    assert_eq!(buffer.snapshot(), before);
    assert_eq!(buffer.permits(), PermitCounts { empty: 3, filled: 0 });
}

#[test]
fn blocked_producer_returns_cancelled_without_mutation() {
    let buffer = Arc::new(BoundedBuffer::new(2).unwrap());
    let cancel = CancelToken::new();
    buffer.produce(1u32, &cancel).unwrap();
    buffer.produce(2u32, &cancel).unwrap();
    let before = buffer.snapshot();

    let producer = {
        let buffer = Arc::clone(&buffer);
        let cancel = cancel.clone();
        thread::spawn(move || buffer.produce(3, &cancel))
    };

    thread::sleep(Duration::from_millis(50));
    cancel.cancel();
    buffer.wake_all();

    let result = producer.join().unwrap();
    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(buffer.snapshot(), before);
    assert_eq!(buffer.permits(), PermitCounts { empty: 0, filled: 2 });

    // The buffer itself is still usable with a live token
    let live = CancelToken::new();
    assert_eq!(buffer.consume(&live).unwrap(), 1);
    assert_eq!(buffer.consume(&live).unwrap(), 2);
}

#[test]
fn cancellation_only_affects_its_own_token() {
    let buffer = Arc::new(BoundedBuffer::<u32>::new(1).unwrap());
    let doomed = CancelToken::new();
    let survivor = CancelToken::new();

    let spawn_consumer = |cancel: CancelToken| {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || buffer.consume(&cancel))
    };
    let first = spawn_consumer(doomed.clone());
    let second = spawn_consumer(survivor.clone());

    thread::sleep(Duration::from_millis(50));
    doomed.cancel();
    buffer.wake_all();
    assert!(first.join().unwrap().unwrap_err().is_cancelled());

    thread::sleep(Duration::from_millis(50));
    assert!(!second.is_finished());
    buffer.produce(5, &survivor).unwrap();
    assert_eq!(second.join().unwrap().unwrap(), 5);
}

#[test]
fn many_waiters_all_leave_on_cancel() {
    let buffer = Arc::new(BoundedBuffer::<u32>::new(4).unwrap());
    let cancel = CancelToken::new();

    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            let cancel = cancel.clone();
            thread::spawn(move || buffer.consume(&cancel))
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    cancel.cancel();
    buffer.wake_all();

    for waiter in waiters {
        assert!(waiter.join().unwrap().unwrap_err().is_cancelled());
    }
    assert_eq!(buffer.permits().total(), 4);
}
