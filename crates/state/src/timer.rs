/// One-shot cancellable deadline on the injected frame clock (milliseconds).
///
/// Re-arming supersedes the previous deadline. `fire` reports a due
/// deadline exactly once and disarms it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deadline {
    at_ms: Option<f64>,
}

impl Deadline {
    pub fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.at_ms = Some(now_ms + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.at_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at_ms.is_some()
    }

    pub fn is_pending(&self, now_ms: f64) -> bool {
        self.at_ms.is_some_and(|at| now_ms < at)
    }

    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.at_ms {
            Some(at) if now_ms >= at => {
                self.at_ms = None;
                true
            }
            _ => false,
        }
    }
}
