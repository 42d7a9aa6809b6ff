//! Vector and matrix algebra.
//!
//! Pure value types with no GPU or platform dependencies. Matrix layout and
//! composition order are documented on [`Mat4`].

mod mat;
mod vec;

pub use mat::{idx, rotation_to_euler, vector_times_matrix, Mat4};
pub use vec::{Vec2, Vec3};
