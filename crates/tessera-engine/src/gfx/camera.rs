use crate::input::{InputFrame, InputState, Key};
use crate::math::{Mat4, Vec2, Vec3, rotation_to_euler, vector_times_matrix};
use crate::render::Viewport;

use super::view::ViewState;

/// Tunables for [`Camera::update_fps`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsSettings {
    /// Distance moved per update per held key.
    pub step: f32,
    /// Radians per viewport-width of mouse travel.
    pub sensitivity: f32,
}

impl Default for FpsSettings {
    fn default() -> Self {
        Self {
            step: 0.1,
            sensitivity: 10.0,
        }
    }
}

/// One update's worth of first-person input.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FpsControls {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Raw mouse motion since the last update, in pixels.
    pub mouse_delta: Vec2,
    pub viewport: Viewport,
}

impl FpsControls {
    /// W/A/S/D held state and the frame's accumulated mouse motion.
    pub fn from_input(state: &InputState, frame: &InputFrame, viewport: Viewport) -> Self {
        Self {
            forward: state.key_down(Key::W),
            back: state.key_down(Key::S),
            left: state.key_down(Key::A),
            right: state.key_down(Key::D),
            mouse_delta: frame.mouse_delta,
            viewport,
        }
    }
}

/// First-person camera: a position plus an accumulated rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Mat4,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub settings: FpsSettings,
}

impl Camera {
    /// Creates a camera and writes its projection into `view`.
    ///
    /// The aspect ratio is taken from `viewport` once; it is not re-derived
    /// when the window is resized.
    pub fn create(
        view: &mut ViewState,
        viewport: Viewport,
        position: Vec3,
        fov: f32,
        near: f32,
        far: f32,
    ) -> Camera {
        let camera = Camera {
            position,
            rotation: Mat4::identity(),
            fov,
            near,
            far,
            settings: FpsSettings::default(),
        };
        view.put_projection(Mat4::perspective(fov, viewport.aspect(), near, far));
        view.put_view(camera.view_matrix());
        camera
    }

    /// `translate(-position)` followed by the rotation.
    pub fn view_matrix(&self) -> Mat4 {
        let p = -self.position;
        Mat4::multiply(&Mat4::translate(p.x, p.y, p.z), &self.rotation)
    }

    /// Applies one frame of WASD movement and mouse look, then writes the
    /// view matrix.
    ///
    /// Movement is rotated by yaw only, so looking up or down does not change
    /// height.
    pub fn update_fps(&mut self, view: &mut ViewState, controls: &FpsControls) {
        let step = self.settings.step;
        let mut ds = Vec3::zero();
        if controls.forward {
            ds.z -= step;
        }
        if controls.back {
            ds.z += step;
        }
        if controls.left {
            ds.x -= step;
        }
        if controls.right {
            ds.x += step;
        }

        if controls.viewport.is_valid() {
            let s = self.settings.sensitivity;
            let yaw = controls.mouse_delta.x / controls.viewport.width * s;
            let pitch = controls.mouse_delta.y / controls.viewport.height * s;
            self.rotation = Mat4::multiply(&Mat4::rotate_y(yaw), &self.rotation);
            self.rotation = Mat4::multiply(&self.rotation, &Mat4::rotate_x(pitch));
        }

        let (_, yaw, _) = rotation_to_euler(&self.rotation);
        self.position += vector_times_matrix(ds, &Mat4::rotate_y(yaw));

        view.put_view(self.view_matrix());
    }

    /// Turns the camera to face `target`, with no roll.
    ///
    /// Does nothing when `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(dir) = (target - self.position).try_normalize() else {
            return;
        };
        let pitch = -dir.y.clamp(-1.0, 1.0).asin();
        let yaw = dir.x.atan2(-dir.z);
        self.rotation = Mat4::multiply(&Mat4::rotate_y(yaw), &Mat4::rotate_x(pitch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    fn setup() -> (ViewState, Camera) {
        let mut view = ViewState::default();
        let cam = Camera::create(
            &mut view,
            Viewport::new(100.0, 100.0),
            Vec3::new(0.0, 0.0, -1.0),
            1.5,
            0.1,
            100.0,
        );
        (view, cam)
    }

    fn controls() -> FpsControls {
        FpsControls {
            viewport: Viewport::new(100.0, 100.0),
            ..Default::default()
        }
    }

    #[test]
    fn create_writes_projection() {
        let (view, _) = setup();
        assert!(view.projection.approx_eq(&Mat4::perspective(1.5, 1.0, 0.1, 100.0), EPS));
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let (mut view, mut cam) = setup();
        cam.update_fps(&mut view, &FpsControls { forward: true, ..controls() });
        assert!(close(cam.position, Vec3::new(0.0, 0.0, -1.1)));
        assert!(view.view.approx_eq(&Mat4::translate(0.0, 0.0, 1.1), EPS));
    }

    #[test]
    fn opposite_keys_cancel() {
        let (mut view, mut cam) = setup();
        let c = FpsControls {
            forward: true,
            back: true,
            left: true,
            right: true,
            ..controls()
        };
        cam.update_fps(&mut view, &c);
        assert!(close(cam.position, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn strafe_right_moves_positive_x() {
        let (mut view, mut cam) = setup();
        cam.update_fps(&mut view, &FpsControls { right: true, ..controls() });
        assert!(close(cam.position, Vec3::new(0.1, 0.0, -1.0)));
    }

    #[test]
    fn quarter_turn_redirects_forward() {
        let (mut view, mut cam) = setup();
        let half_pi_in_pixels = std::f32::consts::FRAC_PI_2 / 10.0 * 100.0;
        let c = FpsControls {
            forward: true,
            mouse_delta: Vec2::new(half_pi_in_pixels, 0.0),
            ..controls()
        };
        cam.update_fps(&mut view, &c);

        let (_, yaw, _) = rotation_to_euler(&cam.rotation);
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < EPS);
        assert!(close(cam.position, Vec3::new(0.1, 0.0, -1.0)));
    }

    #[test]
    fn pitch_does_not_change_height() {
        let (mut view, mut cam) = setup();
        let c = FpsControls {
            forward: true,
            mouse_delta: Vec2::new(0.0, 5.0),
            ..controls()
        };
        cam.update_fps(&mut view, &c);
        assert!(cam.position.y.abs() < EPS);
    }

    #[test]
    fn yaw_turns_about_world_up_after_pitch() {
        let (mut view, mut cam) = setup();
        // 100 px viewport at sensitivity 10: one pixel is 0.1 rad.
        let look = |dx: f32, dy: f32| FpsControls {
            mouse_delta: Vec2::new(dx, dy),
            ..controls()
        };
        cam.update_fps(&mut view, &look(0.0, 3.0));
        cam.update_fps(&mut view, &look(5.0, 0.0));

        let expected = Mat4::multiply(&Mat4::rotate_y(0.5), &Mat4::rotate_x(0.3));
        assert!(cam.rotation.approx_eq(&expected, EPS));

        let (pitch, yaw, roll) = rotation_to_euler(&cam.rotation);
        assert!((pitch - 0.3).abs() < EPS);
        assert!((yaw - 0.5).abs() < EPS);
        assert!(roll.abs() < EPS);
    }

    #[test]
    fn combined_look_keeps_zero_roll() {
        let (mut view, mut cam) = setup();
        for _ in 0..4 {
            cam.update_fps(&mut view, &FpsControls {
                mouse_delta: Vec2::new(2.0, -1.5),
                ..controls()
            });
        }
        let (pitch, yaw, roll) = rotation_to_euler(&cam.rotation);
        assert!((pitch + 0.6).abs() < 1e-4);
        assert!((yaw - 0.8).abs() < 1e-4);
        assert!(roll.abs() < 1e-4);
    }

    #[test]
    fn degenerate_viewport_ignores_mouse() {
        let (mut view, mut cam) = setup();
        let c = FpsControls {
            mouse_delta: Vec2::new(50.0, 50.0),
            viewport: Viewport::new(0.0, 0.0),
            ..Default::default()
        };
        cam.update_fps(&mut view, &c);
        assert!(cam.rotation.approx_eq(&Mat4::identity(), EPS));
    }

    #[test]
    fn look_at_faces_target() {
        let (mut view, mut cam) = setup();
        cam.position = Vec3::zero();
        cam.look_at(Vec3::new(5.0, 0.0, 0.0));

        let (pitch, yaw, _) = rotation_to_euler(&cam.rotation);
        assert!(pitch.abs() < EPS);
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < EPS);

        // Walking forward now heads toward the target.
        cam.update_fps(&mut view, &FpsControls { forward: true, ..controls() });
        assert!(close(cam.position, Vec3::new(0.1, 0.0, 0.0)));
    }

    #[test]
    fn look_at_own_position_is_noop() {
        let (_, mut cam) = setup();
        let before = cam.rotation;
        cam.look_at(cam.position);
        assert_eq!(cam.rotation, before);
    }

    #[test]
    fn controls_read_held_keys_and_motion() {
        use crate::input::InputEvent;

        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.focused = true;
        state.keys_down.insert(Key::W);
        state.keys_down.insert(Key::D);
        state.apply_event(&mut frame, InputEvent::MouseMotion { dx: 3.0, dy: -2.0 });

        let c = FpsControls::from_input(&state, &frame, Viewport::new(10.0, 10.0));
        assert!(c.forward && c.right && !c.back && !c.left);
        assert_eq!(c.mouse_delta, Vec2::new(3.0, -2.0));
    }
}
