use glam::{Mat4, Vec2, Vec3};

/// 2D orthographic camera with position and rotation (degrees) about z.
///
/// View and view-projection are recomputed whenever an input changes, so the
/// getters are plain field reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    projection: Mat4,
    view: Mat4,
    view_projection: Mat4,
    position: Vec2,
    rotation: f32,
}

impl OrthographicCamera {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let projection = Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0);
        Self {
            projection,
            view: Mat4::IDENTITY,
            view_projection: projection,
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Pixel-space camera: origin bottom-left, one unit per pixel.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    pub fn set_projection(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.projection = Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0);
        self.view_projection = self.projection * self.view;
    }

    /// Pixel-space counterpart of [`Self::set_projection`].
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.set_projection(0.0, width, 0.0, height);
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.recalculate_view();
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.recalculate_view();
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    fn recalculate_view(&mut self) {
        let transform = Mat4::from_translation(self.position.extend(0.0))
            * Mat4::from_axis_angle(Vec3::Z, self.rotation.to_radians());
        self.view = transform.inverse();
        self.view_projection = self.projection * self.view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn pixel_camera_maps_corners_to_clip_space() {
        let cam = OrthographicCamera::from_size(800.0, 600.0);
        let bl = cam.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let tr = cam.view_projection() * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((bl.x + 1.0).abs() < 1e-5 && (bl.y + 1.0).abs() < 1e-5);
        assert!((tr.x - 1.0).abs() < 1e-5 && (tr.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn moving_changes_view_but_not_projection() {
        let mut cam = OrthographicCamera::new(-1.0, 1.0, -1.0, 1.0);
        let projection = cam.projection();
        let view = cam.view();

        cam.set_position(Vec2::new(3.0, -2.0));
        assert_eq!(cam.projection(), projection);
        assert_ne!(cam.view(), view);

        let view = cam.view();
        cam.set_rotation(45.0);
        assert_eq!(cam.projection(), projection);
        assert_ne!(cam.view(), view);
    }

    #[test]
    fn camera_position_maps_to_clip_origin() {
        let mut cam = OrthographicCamera::new(-2.0, 2.0, -1.0, 1.0);
        cam.set_position(Vec2::new(5.0, 5.0));
        cam.set_rotation(30.0);
        let clip = cam.view_projection() * Vec4::new(5.0, 5.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
    }

    #[test]
    fn projection_change_keeps_view() {
        let mut cam = OrthographicCamera::from_size(100.0, 100.0);
        cam.set_position(Vec2::new(10.0, 0.0));
        let view = cam.view();
        cam.set_size(200.0, 50.0);
        assert_eq!(cam.view(), view);
        assert_eq!(cam.view_projection(), cam.projection() * view);
    }
}
