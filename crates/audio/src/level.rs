use std::collections::VecDeque;

/// Folds a mono sample stream into RMS levels, one per `window` samples.
#[derive(Debug, Clone)]
pub struct LevelMeter {
    window: usize,
    sum_squares: f32,
    count: usize,
}

impl LevelMeter {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            sum_squares: 0.0,
            count: 0,
        }
    }

    pub fn push(&mut self, sample: f32) -> Option<f32> {
        self.sum_squares += sample * sample;
        self.count += 1;
        if self.count < self.window {
            return None;
        }
        let rms = (self.sum_squares / self.count as f32).sqrt();
        self.sum_squares = 0.0;
        self.count = 0;
        Some(rms.clamp(0.0, 1.0))
    }
}

/// Most recent levels, oldest first, for the voice indicator bars.
#[derive(Debug, Clone)]
pub struct LevelHistory {
    levels: VecDeque<f32>,
    capacity: usize,
}

impl LevelHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            levels: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: f32) {
        if self.levels.len() == self.capacity {
            self.levels.pop_front();
        }
        self.levels.push_back(level);
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.levels.iter().copied()
    }
}

/// Averages one interleaved frame down to mono.
pub fn downmix(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().sum::<f32>() / frame.len() as f32
}
