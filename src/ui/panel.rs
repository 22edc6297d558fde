use imgui::Ui;

use crate::frame::MAX_FRAME_DELTA;
use crate::scene::{AnimationState, InputEvent};

/// Read-only figures shown in the animation panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStats {
    pub state: AnimationState,
    pub steps_in_cycle: u32,
    pub draw_count: usize,
    pub fps: f32,
    /// Last frame delta in seconds, after clamping
    pub frame_delta: f32,
}

impl PanelStats {
    pub fn lines(&self) -> [String; 7] {
        let s = &self.state;
        [
            format!("Phase: {} (step {})", s.phase.label(), self.steps_in_cycle),
            format!("Fall: {:.1}", s.ball_fall),
            format!("Roll: {:.1}", s.ball_roll),
            format!("Spin: {:.1} deg", s.ball_spin),
            format!("Knee bend: {:.1} deg", s.spine_bend),
            format!("{} draws, {:.0} fps", self.draw_count, self.fps),
            self.frame_line(),
        ]
    }

    fn frame_line(&self) -> String {
        let ms = self.frame_delta * 1000.0;
        if self.frame_delta >= MAX_FRAME_DELTA {
            format!("Frame: {:.1} ms (clamped)", ms)
        } else {
            format!("Frame: {:.1} ms", ms)
        }
    }
}

/// Animation panel with buttons mirroring the X and R keys.
///
/// Returns the event for a button pressed this frame.
pub fn animation_panel(ui: &Ui, stats: &PanelStats) -> Option<InputEvent> {
    let mut event = None;

    ui.window("Animation")
        .size([260.0, 240.0], imgui::Condition::FirstUseEver)
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .build(|| {
            for line in stats.lines() {
                ui.text(line);
            }
            ui.separator();

            if ui.button("Step (X)") {
                event = Some(InputEvent::Step);
            }
            ui.same_line();
            if ui.button("Reset (R)") {
                event = Some(InputEvent::Reset);
            }
            ui.text_disabled("Tab hides this panel");
        });

    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameClock;
    use crate::scene::{AnimationConfig, Animator, Phase};
    use std::time::{Duration, Instant};

    #[test]
    fn test_lines_reflect_state() {
        let mut animator = Animator::new(AnimationConfig::default());
        for _ in 0..36 {
            animator.handle(InputEvent::Step);
        }
        assert_eq!(animator.state().phase, Phase::Rolling);

        let stats = PanelStats {
            state: *animator.state(),
            steps_in_cycle: animator.steps_in_cycle(),
            draw_count: 21,
            fps: 59.6,
            frame_delta: 0.0167,
        };
        let lines = stats.lines();
        assert!(lines[0].starts_with(&format!("Phase: {}", Phase::Rolling.label())));
        assert!(lines[0].contains("step 36"));
        assert_eq!(lines[1], "Fall: -47.0");
        assert_eq!(lines[5], "21 draws, 60 fps");
        assert_eq!(lines[6], "Frame: 16.7 ms");
    }

    #[test]
    fn test_frame_line_marks_clamped_delta() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick(start);
        let frame_delta = clock.tick(start + Duration::from_millis(250));

        let stats = PanelStats {
            state: AnimationState::default(),
            steps_in_cycle: 0,
            draw_count: 0,
            fps: clock.fps(),
            frame_delta,
        };
        assert_eq!(stats.lines()[6], "Frame: 30.0 ms (clamped)");
    }
}
