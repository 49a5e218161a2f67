//! Sends a real SIGINT to this test process, so it lives in its own binary.
#![cfg(unix)]

use sensorlink::{run_console, ControlSurface, ScriptedLink};
use std::time::Duration;
use tokio::io::BufReader;

/// Ctrl-C while waiting at the menu says goodbye and returns
#[tokio::test]
async fn test_interrupt_at_menu_quits() {
    // Input that never ends on its own.
    let (_keyboard, stdin) = tokio::io::duplex(64);
    let mut surface =
        ControlSurface::new(ScriptedLink::default(), Vec::new()).with_interrupt_watch(true);

    let console = tokio::time::timeout(
        Duration::from_secs(5),
        run_console(&mut surface, BufReader::new(stdin)),
    );
    let interrupt = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let status = std::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .expect("kill should be available");
        assert!(status.success());
    };

    let (result, _) = tokio::join!(console, interrupt);
    result
        .expect("Console should stop on Ctrl-C")
        .expect("Console should exit cleanly");

    assert!(surface.link().sent().is_empty());
    let text = String::from_utf8_lossy(surface.output()).into_owned();
    assert!(text.starts_with("Hello! I control the sensor board."));
    assert!(text.ends_with("Stopping. Goodbye!\n"));
}
