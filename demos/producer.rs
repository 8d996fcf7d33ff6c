// In demos/producer.rs
// One producer, one consumer, a small buffer: items come out in the order they went in.
use dmxp_bounded::{BoundedBuffer, CancelToken, Item};
use std::env;
use std::sync::Arc;
use std::thread;

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <num_messages> [capacity]", args[0]);
        std::process::exit(1);
    }

    let num_messages: Item = args[1].parse().expect("Invalid number of messages");
    let capacity: usize = args.get(2).map(|s| s.parse().expect("Invalid capacity")).unwrap_or(4);

    let buffer = Arc::new(BoundedBuffer::new(capacity)?);
    let cancel = CancelToken::new();

    println!("Producer: Sending {} items through {} slots...", num_messages, capacity);
    let start = std::time::Instant::now();

    let producer = {
        let buffer = Arc::clone(&buffer);
        let cancel = cancel.clone();
        thread::spawn(move || -> dmxp_bounded::Result<()> {
            for item in 0..num_messages {
                buffer.produce(item, &cancel)?;
            }
            Ok(())
        })
    };

    let mut out_of_order = 0;
    for expected in 0..num_messages {
        let item = buffer.consume(&cancel)?;
        if item != expected {
            out_of_order += 1;
        }
        if (expected + 1) % 100 == 0 {
            println!("--- Received {} items ---", expected + 1);
        }
    }

    producer.join().expect("producer thread panicked")?;

    let elapsed = start.elapsed();
    println!("Consumer: Received {} items in {:.2?}", num_messages, elapsed);
    println!("Permits at rest: {:?}", buffer.permits());
    if out_of_order == 0 {
        println!("All items received in order");
    } else {
        eprintln!("{} items arrived out of order", out_of_order);
        std::process::exit(1);
    }

    Ok(())
}
