//! Real-time driver: bind a session, run it at 60 fps while a second thread
//! pulls the stop handle after two seconds, then print the frame counters.

use std::time::Duration;

use contrail::{BackdropConfig, BackdropSession, FrameClock, Viewport};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let mut session = BackdropSession::bind(Viewport::new(640, 360), BackdropConfig::default())?;
    let handle = session.stop_handle();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(2));
        handle.stop();
    });

    let mut clock = FrameClock::new(60.0)?;
    let stats = session.run(&mut clock)?;
    stopper.join().ok();

    println!(
        "rendered {} frames ({} skipped)",
        stats.frames_rendered, stats.frames_skipped
    );
    Ok(())
}
