use crate::math::Mat4;

/// The active view and projection matrices for one window.
///
/// Written by camera logic, read by every draw recorded in the frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewState {
    pub view: Mat4,
    pub projection: Mat4,
}

impl ViewState {
    #[inline]
    pub fn put_view(&mut self, view: Mat4) {
        self.view = view;
    }

    #[inline]
    pub fn put_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}
