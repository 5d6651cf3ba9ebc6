/// Looping list of frames advanced by a fixed switch time.
///
/// A sequence counts as completed once its last frame has been shown for a
/// full switch time. It then wraps to the first frame and keeps looping, but
/// stays completed until [`Sequence::restart`] is called.
#[derive(Debug, Clone)]
pub struct Sequence<F> {
    frames: Vec<F>,
    switch_time: f32,
    elapsed: f32,
    index: usize,
    completed: bool,
}

impl<F> Sequence<F> {
    pub fn new(switch_time: f32) -> Self {
        Self {
            frames: Vec::new(),
            switch_time,
            elapsed: 0.0,
            index: 0,
            completed: false,
        }
    }

    pub fn with_frames(switch_time: f32, frames: Vec<F>) -> Self {
        Self {
            frames,
            ..Self::new(switch_time)
        }
    }

    pub fn add_frame(&mut self, frame: F) {
        self.frames.push(frame);
    }

    pub fn update(&mut self, delta: f32) {
        if self.frames.is_empty() {
            return;
        }

        // A non-positive switch time steps one frame per update
        if self.switch_time <= 0.0 {
            self.advance();
            return;
        }

        self.elapsed += delta;
        while self.elapsed >= self.switch_time {
            self.elapsed -= self.switch_time;
            self.advance();
        }
    }

    fn advance(&mut self) {
        if self.index + 1 >= self.frames.len() {
            self.index = 0;
            self.completed = true;
        } else {
            self.index += 1;
        }
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed = 0.0;
        self.completed = false;
    }

    pub fn current(&self) -> Option<&F> {
        self.frames.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
