/// Projection matrices: view space to clip space
use nalgebra::{Matrix4, Point3};

use crate::matrix::{ModelMatrix, Scalar};

/// Projection mode a matrix was built with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Identity,
    Orthographic,
    Perspective,
    Custom,
}

/// Projection matrix, column-major, right-handed clip space in [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionMatrix<T: Scalar> {
    matrix: Matrix4<T>,
    mode: ProjectionMode,
}

impl<T: Scalar> ProjectionMatrix<T> {
    pub fn new(matrix: Matrix4<T>) -> Self {
        Self {
            matrix,
            mode: ProjectionMode::Custom,
        }
    }

    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            mode: ProjectionMode::Identity,
        }
    }

    /// Create an orthographic projection
    pub fn orthographic(left: T, right: T, bottom: T, top: T, near: T, far: T) -> Self {
        Self {
            matrix: Matrix4::new_orthographic(left, right, bottom, top, near, far),
            mode: ProjectionMode::Orthographic,
        }
    }

    /// Create a perspective projection; `fovy` is the vertical field of view in radians
    pub fn perspective(fovy: T, aspect: T, near: T, far: T) -> Self {
        Self {
            matrix: Matrix4::new_perspective(aspect, fovy, near, far),
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn as_matrix(&self) -> &Matrix4<T> {
        &self.matrix
    }

    /// Compose with a model-view matrix: `self × model_view`
    pub fn multiply(&self, model_view: &ModelMatrix<T>) -> ModelMatrix<T> {
        ModelMatrix::new(self.matrix * model_view.as_matrix())
    }

    /// Project a view-space point to normalized device coordinates
    pub fn project(&self, point: &Point3<T>) -> Point3<T> {
        self.matrix.transform_point(point)
    }
}

impl<T: Scalar> Default for ProjectionMatrix<T> {
    fn default() -> Self {
        Self::identity()
    }
}
