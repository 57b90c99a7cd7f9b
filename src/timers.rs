/// A deferred unit of work with its fire time.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask<P> {
    pub fire_at_ms: f64,
    seq: u64,
    pub payload: P,
}

/// Virtual-time queue for staggered effects.
///
/// Nothing here reads a clock: callers pass `now_ms`, so tests can step time
/// by hand and the browser can pump it from a single timeout.
#[derive(Debug)]
pub struct TimerQueue<P> {
    tasks: Vec<ScheduledTask<P>>,
    next_seq: u64,
}

impl<P> Default for TimerQueue<P> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<P> TimerQueue<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_after(&mut self, now_ms: f64, delay_ms: f64, payload: P) -> f64 {
        let fire_at_ms = now_ms + delay_ms.max(0.0);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask {
            fire_at_ms,
            seq,
            payload,
        });
        fire_at_ms
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.tasks
            .iter()
            .map(|task| task.fire_at_ms)
            .min_by(f64::total_cmp)
    }

    /// Removes the earliest task due at `now_ms`; ties go to the first scheduled.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<ScheduledTask<P>> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.fire_at_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.fire_at_ms
                    .total_cmp(&b.fire_at_ms)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(index, _)| index)?;

        Some(self.tasks.swap_remove(index))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
