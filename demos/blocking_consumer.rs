// A consumer parked on an empty buffer, released by cancellation instead of an item.
use dmxp_bounded::{BufferBuilder, ChannelSink, Pacing};
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let wait_ms = if args.len() > 1 {
        args[1].parse().unwrap_or(500)
    } else {
        500
    };

    let (sink, events) = ChannelSink::new();
    let pipeline = BufferBuilder::new()
        .with_capacity(3)
        .with_pacing(Pacing::immediate())
        .with_sink(Arc::new(sink))
        .build()?;

    println!("Blocking Consumer: Waiting on an empty buffer for {} ms...", wait_ms);
    let consumer = pipeline.consumer(0).spawn()?;

    std::thread::sleep(Duration::from_millis(wait_ms));
    let cancelled_at = Instant::now();
    pipeline.cancel_token().cancel();
    pipeline.buffer().wake_all();

    let report = consumer.join()?;
    println!(
        "Blocking Consumer: {} released after {:.2?}, transferred {} items",
        report.worker,
        cancelled_at.elapsed(),
        report.transferred
    );

    for event in events.try_iter() {
        println!("Event: {}", event);
    }
    println!("Buffer after cancellation: {:?}", pipeline.buffer());

    Ok(())
}
