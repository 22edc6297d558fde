//! Scripted two-phase ball animation
//!
//! The animation advances only on discrete input events. While the ball is
//! [`Phase::Falling`] each step drops it and spins it; once it reaches the
//! floor it switches to [`Phase::Rolling`], where each step rolls it sideways,
//! spins it faster, lifts it back up and bends the figure's knee. A reset
//! returns everything to the resting pose.

/// Discrete logical input consumed by the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Step,
    Reset,
}

/// Stage of the scripted ball animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Falling,
    Rolling,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Falling => "Falling",
            Phase::Rolling => "Rolling",
        }
    }
}

/// Step sizes and limits for the animation.
///
/// The defaults reproduce the reference animation: the ball starts at height
/// 20, drops 2 units per step until it reaches -50, then rolls 2 units and
/// rises 3 units per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Height of the ball before the first step and after a reset
    pub resting_height: f32,
    /// Lowest height the ball may reach while falling
    pub floor: f32,
    pub fall_step: f32,
    /// Spin (degrees) subtracted per falling step
    pub fall_spin_step: f32,
    /// Knee bend (degrees) added per rolling step
    pub bend_step: f32,
    pub roll_step: f32,
    /// Spin (degrees) subtracted per rolling step
    pub roll_spin_step: f32,
    /// Height regained per rolling step
    pub rise_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            resting_height: 20.0,
            floor: -50.0,
            fall_step: 2.0,
            fall_spin_step: 5.0,
            bend_step: 1.0,
            roll_step: 2.0,
            roll_spin_step: 20.0,
            rise_step: 3.0,
        }
    }
}

impl AnimationConfig {
    pub fn with_resting_height(mut self, height: f32) -> Self {
        self.resting_height = height;
        self
    }

    /// Sets the floor as a drop budget below the resting height.
    pub fn with_drop_budget(mut self, budget: f32) -> Self {
        self.floor = self.resting_height - budget;
        self
    }

    pub fn with_floor(mut self, floor: f32) -> Self {
        self.floor = floor;
        self
    }

    pub fn with_fall_step(mut self, fall_step: f32, spin_step: f32) -> Self {
        self.fall_step = fall_step;
        self.fall_spin_step = spin_step;
        self
    }

    pub fn with_roll_step(mut self, roll_step: f32, spin_step: f32, rise_step: f32) -> Self {
        self.roll_step = roll_step;
        self.roll_spin_step = spin_step;
        self.rise_step = rise_step;
        self
    }

    pub fn with_bend_step(mut self, bend_step: f32) -> Self {
        self.bend_step = bend_step;
        self
    }

    /// Distance between the resting height and the floor
    pub fn drop_budget(&self) -> f32 {
        self.resting_height - self.floor
    }
}

/// The animation variables read by the rigs every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Knee rotation of the figure's right leg, in degrees
    pub spine_bend: f32,
    /// Ball rotation about Z, in degrees
    pub ball_spin: f32,
    /// Horizontal ball offset
    pub ball_roll: f32,
    /// Vertical ball offset
    pub ball_fall: f32,
    pub phase: Phase,
}

impl AnimationState {
    /// The resting pose for `config`.
    pub fn initial(config: &AnimationConfig) -> Self {
        Self {
            spine_bend: 0.0,
            ball_spin: 0.0,
            ball_roll: 0.0,
            ball_fall: config.resting_height,
            phase: Phase::Falling,
        }
    }

    /// Returns the state after `event`. Total over every state and event.
    pub fn transition(self, event: InputEvent, config: &AnimationConfig) -> Self {
        match (event, self.phase) {
            (InputEvent::Reset, _) => Self::initial(config),
            (InputEvent::Step, Phase::Falling) if self.ball_fall > config.floor => Self {
                ball_fall: (self.ball_fall - config.fall_step).max(config.floor),
                ball_spin: self.ball_spin - config.fall_spin_step,
                ..self
            },
            // Reaching the floor flips the phase and rolls in the same step
            (InputEvent::Step, Phase::Falling | Phase::Rolling) => Self {
                phase: Phase::Rolling,
                spine_bend: self.spine_bend + config.bend_step,
                ball_roll: self.ball_roll + config.roll_step,
                ball_spin: self.ball_spin - config.roll_spin_step,
                ball_fall: self.ball_fall + config.rise_step,
            },
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::initial(&AnimationConfig::default())
    }
}

/// Owns the animation state and its configuration.
#[derive(Debug, Clone)]
pub struct Animator {
    config: AnimationConfig,
    state: AnimationState,
    steps_in_cycle: u32,
}

impl Animator {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            state: AnimationState::initial(&config),
            config,
            steps_in_cycle: 0,
        }
    }

    /// Applies one input event.
    pub fn handle(&mut self, event: InputEvent) {
        let previous = self.state.phase;
        self.state = self.state.transition(event, &self.config);

        match event {
            InputEvent::Step => self.steps_in_cycle += 1,
            InputEvent::Reset => {
                log::info!("Animation reset after {} steps", self.steps_in_cycle);
                self.steps_in_cycle = 0;
            }
        }

        if previous != self.state.phase {
            log::info!(
                "Ball phase {} -> {} at step {}",
                previous.label(),
                self.state.phase.label(),
                self.steps_in_cycle
            );
        }
        log::debug!("{:?} => {:?}", event, self.state);
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Steps applied since start-up or the last reset
    pub fn steps_in_cycle(&self) -> u32 {
        self.steps_in_cycle
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_n(mut state: AnimationState, n: usize, config: &AnimationConfig) -> AnimationState {
        for _ in 0..n {
            state = state.transition(InputEvent::Step, config);
        }
        state
    }

    #[test]
    fn test_initial_state() {
        let config = AnimationConfig::default();
        let state = AnimationState::initial(&config);
        assert_eq!(state.spine_bend, 0.0);
        assert_eq!(state.ball_spin, 0.0);
        assert_eq!(state.ball_roll, 0.0);
        assert_eq!(state.ball_fall, 20.0);
        assert_eq!(state.phase, Phase::Falling);
        assert_eq!(config.drop_budget(), 70.0);
    }

    #[test]
    fn test_single_falling_step() {
        let config = AnimationConfig::default();
        let state = AnimationState::initial(&config).transition(InputEvent::Step, &config);

        assert_eq!(state.ball_fall, 20.0 - config.fall_step);
        assert_eq!(state.ball_spin, -config.fall_spin_step);
        assert_eq!(state.spine_bend, 0.0);
        assert_eq!(state.ball_roll, 0.0);
        assert_eq!(state.phase, Phase::Falling);
    }

    #[test]
    fn test_reaches_floor_then_rolls() {
        let config = AnimationConfig::default();
        let start = AnimationState::initial(&config);

        // 35 steps of 2.0 take the ball from 20 to exactly -50
        let at_floor = step_n(start, 35, &config);
        assert_eq!(at_floor.phase, Phase::Falling);
        assert_eq!(at_floor.ball_fall, -50.0);
        assert_eq!(at_floor.ball_spin, -175.0);

        let rolling = at_floor.transition(InputEvent::Step, &config);
        assert_eq!(rolling.phase, Phase::Rolling);
        assert_eq!(rolling.ball_fall, -47.0);
        assert_eq!(rolling.ball_roll, 2.0);
        assert_eq!(rolling.spine_bend, 1.0);
        assert_eq!(rolling.ball_spin, -195.0);
    }

    #[test]
    fn test_rolling_is_monotone_and_sticky() {
        let config = AnimationConfig::default();
        let mut state = step_n(AnimationState::initial(&config), 36, &config);
        assert_eq!(state.phase, Phase::Rolling);

        for _ in 0..50 {
            let next = state.transition(InputEvent::Step, &config);
            assert_eq!(next.phase, Phase::Rolling);
            assert!(next.spine_bend > state.spine_bend);
            assert!(next.ball_roll > state.ball_roll);
            assert!(next.ball_fall > state.ball_fall);
            assert!(next.ball_spin < state.ball_spin);
            state = next;
        }
    }

    #[test]
    fn test_twenty_five_steps_with_short_drop() {
        // A 40 unit drop budget is used up after 20 steps, leaving 5 rolling steps
        let config = AnimationConfig::default().with_drop_budget(40.0);
        assert_eq!(config.floor, -20.0);

        let mut state = AnimationState::initial(&config);
        let mut lowest = state.ball_fall;
        let mut flipped_at = None;
        for i in 1..=25 {
            let next = state.transition(InputEvent::Step, &config);
            if next.phase == Phase::Rolling && flipped_at.is_none() {
                flipped_at = Some(i);
            }
            if state.phase == Phase::Rolling {
                assert!(next.ball_fall > state.ball_fall);
            }
            lowest = lowest.min(next.ball_fall);
            state = next;
        }

        assert_eq!(flipped_at, Some(21));
        assert_eq!(lowest, -20.0);
        assert_eq!(state.phase, Phase::Rolling);
        assert_eq!(state.ball_fall, -20.0 + 5.0 * config.rise_step);
    }

    #[test]
    fn test_fall_is_clamped_at_floor() {
        let config = AnimationConfig::default().with_fall_step(3.0, 5.0);
        let mut state = AnimationState::initial(&config);
        while state.phase == Phase::Falling {
            let next = state.transition(InputEvent::Step, &config);
            if next.phase == Phase::Falling {
                assert!(next.ball_fall >= config.floor);
                assert!(next.ball_fall < state.ball_fall);
            }
            state = next;
        }
        // 20 - 3 * 23 = -49, then the clamp stops at -50 instead of -52
        assert_eq!(state.ball_fall, config.floor + config.rise_step);
    }

    #[test]
    fn test_reset_from_any_state() {
        let config = AnimationConfig::default();
        let initial = AnimationState::initial(&config);

        for steps in [0, 1, 10, 35, 36, 100] {
            let state = step_n(initial, steps, &config);
            assert_eq!(state.transition(InputEvent::Reset, &config), initial);
        }
    }

    #[test]
    fn test_animator_counts_steps() {
        let mut animator = Animator::default();
        for _ in 0..40 {
            animator.handle(InputEvent::Step);
        }
        assert_eq!(animator.steps_in_cycle(), 40);
        assert_eq!(animator.state().phase, Phase::Rolling);

        animator.handle(InputEvent::Reset);
        assert_eq!(animator.steps_in_cycle(), 0);
        assert_eq!(*animator.state(), AnimationState::initial(animator.config()));
    }
}
