/// Converts irregular wall-clock updates into whole fixed-rate ticks.
pub struct TickPacer {
    tick_secs: f64,
    carry: f64,
}

// A window that stalls (dragged, minimized) shouldn't fast-forward when it comes back.
const MAX_TICKS_PER_UPDATE: usize = 4;

impl TickPacer {
    pub fn new(ticks_per_second: u32) -> TickPacer {
        TickPacer {
            tick_secs: 1.0 / ticks_per_second.max(1) as f64,
            carry: 0.0,
        }
    }

    /// How many ticks to run for this much elapsed time. The remainder carries over.
    pub fn ticks_due(&mut self, elapsed_secs: f64) -> usize {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return 0;
        }
        self.carry += elapsed_secs;
        let ticks = (self.carry / self.tick_secs).floor() as usize;
        if ticks > MAX_TICKS_PER_UPDATE {
            self.carry = 0.0;
            return MAX_TICKS_PER_UPDATE;
        }
        self.carry -= ticks as f64 * self.tick_secs;
        ticks
    }
}
