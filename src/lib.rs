pub mod game;

/// Log a status line once every 100 simulation ticks.
///
/// `$tick` is anything with a `u64` in field `.0`, normally [`SimTick`](game::simulation::SimTick).
/// Without the `perf_stats` feature the macro expands to nothing and its
/// arguments are never evaluated.
///
/// ```ignore
/// profile_log!(tick, "Tick {}: {} units alive", tick.0, sim.registry().len());
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % 100 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}
