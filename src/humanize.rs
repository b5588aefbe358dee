use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::browser::BrowserSession;

/// How many interpolated pointer positions each waypoint hop gets.
const STEPS_PER_HOP: usize = 25;

/// Random viewport waypoints for one wiggle pass: 2 or 3 of them, kept away
/// from the extreme edges.
pub fn waypoints(width: u32, height: u32) -> Vec<(f64, f64)> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(2..=3);
    (0..count)
        .map(|_| {
            (
                rng.gen_range(0.1..0.9) * f64::from(width),
                rng.gen_range(0.1..0.9) * f64::from(height),
            )
        })
        .collect()
}

/// Evenly interpolated positions from `from` to `to`, ending exactly on `to`.
pub fn interpolate(from: (f64, f64), to: (f64, f64), steps: usize) -> Vec<(f64, f64)> {
    (1..=steps)
        .map(|step| {
            let t = step as f64 / steps as f64;
            (
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
            )
        })
        .collect()
}

/// Move the pointer through a few random waypoints, then idle briefly.
///
/// Uniform, instant automation is a strong bot signal; a meandering pointer
/// and an uneven pause are not. Has no effect on extraction correctness and
/// must never sink a run: every failure is swallowed.
pub async fn wiggle(session: &BrowserSession, width: u32, height: u32) {
    let mut current = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    if let Err(e) = session.dispatch_pointer_move(current.0, current.1) {
        debug!("pointer wiggle abandoned: {e}");
        return;
    }

    for target in waypoints(width, height) {
        for (x, y) in interpolate(current, target, STEPS_PER_HOP) {
            if let Err(e) = session.dispatch_pointer_move(x, y) {
                debug!("pointer wiggle abandoned mid-hop: {e}");
                return;
            }
        }
        current = target;
    }

    let pause_ms = { rand::thread_rng().gen_range(500..1500) };
    tokio::time::sleep(Duration::from_millis(pause_ms)).await;
}
