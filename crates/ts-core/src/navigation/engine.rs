//! Camera rig implementation

use glam::Vec3;
use tracing::debug;

use super::CameraPose;
use crate::state::CameraSettings;

/// A multi-frame interpolation of the camera eye toward a focus point
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransition {
    start: Vec3,
    end: Vec3,
    look_at: Vec3,
    progress: f32,
}

impl CameraTransition {
    pub fn new(start: Vec3, end: Vec3, look_at: Vec3) -> Self {
        Self {
            start,
            end,
            look_at,
            progress: 0.0,
        }
    }

    /// Advance by `step` and return the interpolated pose. Progress is
    /// clamped to 1, so stepping a finished transition is a no-op.
    pub fn advance(&mut self, step: f32) -> CameraPose {
        self.progress = (self.progress + step.max(0.0)).min(1.0);
        CameraPose::new(self.start.lerp(self.end, self.progress), self.look_at)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Owns the camera pose and at most one running transition
#[derive(Debug, Clone)]
pub struct CameraRig {
    settings: CameraSettings,
    pose: CameraPose,
    transition: Option<CameraTransition>,
}

impl CameraRig {
    pub fn new(settings: CameraSettings) -> Self {
        let pose = Self::home_pose(&settings);
        Self {
            settings,
            pose,
            transition: None,
        }
    }

    fn home_pose(settings: &CameraSettings) -> CameraPose {
        CameraPose::new(
            Vec3::from_array(settings.home_eye),
            Vec3::from_array(settings.home_target),
        )
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn transition(&self) -> Option<&CameraTransition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start moving toward `position`. Any running transition is abandoned.
    pub fn focus_on(&mut self, position: Vec3) {
        let end = position + Vec3::from_array(self.settings.focus_offset);
        debug!("Camera focus from {:?} to {:?}", self.pose.eye, end);
        self.transition = Some(CameraTransition::new(self.pose.eye, end, position));
    }

    /// Jump back to the home pose
    pub fn reset(&mut self) {
        self.transition = None;
        self.pose = Self::home_pose(&self.settings);
    }

    /// Advance the running transition by one frame. Returns the new pose when
    /// the camera moved.
    pub fn step(&mut self) -> Option<CameraPose> {
        let transition = self.transition.as_mut()?;
        self.pose = transition.advance(self.settings.transition_step);
        if transition.is_finished() {
            self.transition = None;
        }
        Some(self.pose)
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_reaches_offset_target() {
        let mut rig = CameraRig::default();
        rig.focus_on(Vec3::new(10.0, 2.0, 3.0));

        let mut frames = 0;
        while rig.step().is_some() {
            frames += 1;
            assert!(frames <= 60);
        }
        assert_eq!(rig.pose().eye, Vec3::new(10.0, 2.0, 23.0));
        assert_eq!(rig.pose().target, Vec3::new(10.0, 2.0, 3.0));
        assert!(!rig.is_transitioning());
    }

    #[test]
    fn test_finished_transition_is_idempotent() {
        let mut transition = CameraTransition::new(Vec3::ZERO, Vec3::X, Vec3::ZERO);
        let end = transition.advance(2.0);
        assert_eq!(end.eye, Vec3::X);
        assert_eq!(transition.advance(0.5), end);
        assert_eq!(transition.progress(), 1.0);
    }

    #[test]
    fn test_new_focus_abandons_running_transition() {
        let mut rig = CameraRig::default();
        rig.focus_on(Vec3::new(100.0, 0.0, 0.0));
        rig.step();
        let midway = rig.pose().eye;

        rig.focus_on(Vec3::new(-100.0, 0.0, 0.0));
        let next = rig.step().unwrap();
        assert!(next.eye.x < midway.x);
        assert_eq!(next.target, Vec3::new(-100.0, 0.0, 0.0));
    }

    #[test]
    fn test_reset_returns_home() {
        let mut rig = CameraRig::default();
        rig.focus_on(Vec3::new(5.0, 5.0, 5.0));
        rig.step();
        rig.reset();
        assert_eq!(rig.pose().eye, Vec3::new(0.0, 10.0, 50.0));
        assert!(rig.step().is_none());
    }
}
