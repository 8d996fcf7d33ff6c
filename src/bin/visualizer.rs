// Live text visualizer: workers, a polling observer and scheduled resizes
use dmxp_bounded::{BufferError, CancelToken, DemoConfig, Observer, Supervisor, TracingSink};
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), BufferError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();

    let config = DemoConfig::from_args(env::args().skip(1))?;
    info!(?config, "starting visualizer");

    // Handle Ctrl+C by cancelling the run
    let stop = CancelToken::new();
    let stop_for_handler = stop.clone();
    ctrlc::set_handler(move || stop_for_handler.cancel())
        .map_err(|e| BufferError::config(format!("cannot install Ctrl+C handler: {e}")))?;

    let mut supervisor = Supervisor::start(config.clone(), Arc::new(TracingSink))?;

    let mut last_frame = String::new();
    let observer = Observer::spawn(supervisor.watch(), config.poll_interval, move |snapshot| {
        let frame = snapshot.to_string();
        if frame != last_frame {
            println!("{frame}\n");
            last_frame = frame;
        }
    })?;

    let started = Instant::now();
    let mut resizes = config.resizes.iter().peekable();
    while !stop.sleep(Duration::from_millis(50)) {
        let elapsed = started.elapsed();
        while let Some(resize) = resizes.next_if(|resize| resize.at <= elapsed) {
            match supervisor.reconfigure(resize.capacity) {
                Ok(retired) => info!(
                    capacity = resize.capacity,
                    transferred = retired.iter().map(|r| r.transferred).sum::<u64>(),
                    "resized buffer"
                ),
                Err(e) => warn!(error = %e, capacity = resize.capacity, "resize failed"),
            }
        }
        if config.duration.is_some_and(|limit| elapsed >= limit) {
            break;
        }
    }

    let polls = observer.stop()?;
    let reports = supervisor.shutdown()?;
    for report in &reports {
        info!(worker = %report.worker, transferred = report.transferred, "worker summary");
    }
    info!(polls, "visualizer finished");
    Ok(())
}
