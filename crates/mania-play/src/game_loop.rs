use anyhow::Result;
use log::info;
use mania_rule::JudgeEvent;

use crate::input::InputProvider;
use crate::result::PlayResult;
use crate::session::PlaySession;
use crate::timer::{FramePacer, TimeProvider};

/// Drives a `PlaySession` from a clock and an input source until it ends.
pub struct GameLoop<T: TimeProvider, I: InputProvider> {
    session: PlaySession,
    clock: T,
    input: I,
    pacer: FramePacer,
    frames: u64,
}

impl<T: TimeProvider, I: InputProvider> GameLoop<T, I> {
    pub fn new(session: PlaySession, clock: T, input: I, max_frame_per_second: i32) -> Self {
        Self {
            session,
            clock,
            input,
            pacer: FramePacer::new(max_frame_per_second),
            frames: 0,
        }
    }

    pub fn session(&self) -> &PlaySession {
        &self.session
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn run(&mut self) -> Result<PlayResult> {
        self.run_with(|_, _| {})
    }

    /// Run to completion, calling `on_frame` after every tick.
    pub fn run_with<F>(&mut self, mut on_frame: F) -> Result<PlayResult>
    where
        F: FnMut(&PlaySession, &[JudgeEvent]),
    {
        let start_us = self.clock.now_us();
        while !self.session.is_finished() {
            let elapsed_ms = (self.clock.now_us() - start_us) / 1000;
            let map_time = elapsed_ms - self.session.correction();

            self.input.poll(map_time);
            let events = self.session.tick(map_time, &self.input);
            on_frame(&self.session, &events);
            self.frames += 1;

            if self.input.exit_requested() {
                self.session.end_early();
                break;
            }
            self.pacer.wait(&self.clock);
        }
        info!("Loop ran {} frames", self.frames);
        self.session.result()
    }
}
