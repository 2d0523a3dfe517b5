/// Model matrices and the tagged matrix type accepted by state setters
use std::fmt;

use nalgebra::{Matrix4, Point3, RealField, Vector3};

use crate::error::TransformError;
use crate::projection::ProjectionMatrix;

/// Floating-point precision of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

/// Capability set of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Model,
    Projection,
}

/// Concrete matrix type: kind and precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixType {
    pub kind: MatrixKind,
    pub precision: Precision,
}

impl MatrixType {
    pub fn model(precision: Precision) -> Self {
        Self {
            kind: MatrixKind::Model,
            precision,
        }
    }

    pub fn projection(precision: Precision) -> Self {
        Self {
            kind: MatrixKind::Projection,
            precision,
        }
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = match self.precision {
            Precision::Single => "single-precision",
            Precision::Double => "double-precision",
        };
        let kind = match self.kind {
            MatrixKind::Model => "model",
            MatrixKind::Projection => "projection",
        };
        write!(f, "{} {} matrix", precision, kind)
    }
}

/// Scalar types a transform state can be built on.
///
/// Implemented for `f32` and `f64`; performs the checked narrowing from the
/// tagged [`Matrix`] to the concrete matrix of that precision.
pub trait Scalar: RealField + Copy {
    const PRECISION: Precision;

    fn model_matrix(matrix: &Matrix) -> Option<&ModelMatrix<Self>>;

    fn projection_matrix(matrix: &Matrix) -> Option<&ProjectionMatrix<Self>>;

    fn wrap_model(matrix: ModelMatrix<Self>) -> Matrix;

    fn wrap_projection(matrix: ProjectionMatrix<Self>) -> Matrix;
}

macro_rules! impl_scalar {
    ($scalar:ty, $precision:ident, $model:ident, $projection:ident) => {
        impl Scalar for $scalar {
            const PRECISION: Precision = Precision::$precision;

            fn model_matrix(matrix: &Matrix) -> Option<&ModelMatrix<Self>> {
                match matrix {
                    Matrix::$model(model) => Some(model),
                    _ => None,
                }
            }

            fn projection_matrix(matrix: &Matrix) -> Option<&ProjectionMatrix<Self>> {
                match matrix {
                    Matrix::$projection(projection) => Some(projection),
                    _ => None,
                }
            }

            fn wrap_model(matrix: ModelMatrix<Self>) -> Matrix {
                Matrix::$model(matrix)
            }

            fn wrap_projection(matrix: ProjectionMatrix<Self>) -> Matrix {
                Matrix::$projection(matrix)
            }
        }
    };
}

impl_scalar!(f32, Single, ModelSingle, ProjectionSingle);
impl_scalar!(f64, Double, ModelDouble, ProjectionDouble);

/// Model (or model-view) transform, column-major, OpenGL conventions
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMatrix<T: Scalar> {
    matrix: Matrix4<T>,
}

impl<T: Scalar> ModelMatrix<T> {
    pub fn new(matrix: Matrix4<T>) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    /// Create a pure translation
    pub fn from_translation(x: T, y: T, z: T) -> Self {
        Self::new(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    pub fn as_matrix(&self) -> &Matrix4<T> {
        &self.matrix
    }

    pub fn into_inner(self) -> Matrix4<T> {
        self.matrix
    }

    pub fn set_identity(&mut self) {
        self.matrix = Matrix4::identity();
    }

    /// Post-multiply by a translation
    pub fn translate(&mut self, x: T, y: T, z: T) {
        self.matrix *= Matrix4::new_translation(&Vector3::new(x, y, z));
    }

    /// Post-multiply by a non-uniform scale
    pub fn scale(&mut self, x: T, y: T, z: T) {
        self.matrix *= Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z));
    }

    /// Post-multiply by a rotation around X (radians)
    pub fn rotate_x(&mut self, angle: T) {
        self.matrix *= Matrix4::from_axis_angle(&Vector3::x_axis(), angle);
    }

    /// Post-multiply by a rotation around Y (radians)
    pub fn rotate_y(&mut self, angle: T) {
        self.matrix *= Matrix4::from_axis_angle(&Vector3::y_axis(), angle);
    }

    /// Post-multiply by a rotation around Z (radians)
    pub fn rotate_z(&mut self, angle: T) {
        self.matrix *= Matrix4::from_axis_angle(&Vector3::z_axis(), angle);
    }

    /// Compute `self × other`
    pub fn multiply(&self, other: &ModelMatrix<T>) -> ModelMatrix<T> {
        Self::new(self.matrix * other.matrix)
    }

    pub fn inverse(&self) -> Option<ModelMatrix<T>> {
        self.matrix.try_inverse().map(Self::new)
    }

    pub fn transform_point(&self, point: &Point3<T>) -> Point3<T> {
        self.matrix.transform_point(point)
    }

    /// Translation component (last column)
    pub fn position(&self) -> Vector3<T> {
        Vector3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }
}

impl<T: Scalar> Default for ModelMatrix<T> {
    fn default() -> Self {
        Self::identity()
    }
}

/// A matrix of any supported kind and precision
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    ModelSingle(ModelMatrix<f32>),
    ModelDouble(ModelMatrix<f64>),
    ProjectionSingle(ProjectionMatrix<f32>),
    ProjectionDouble(ProjectionMatrix<f64>),
}

impl Matrix {
    pub fn matrix_type(&self) -> MatrixType {
        match self {
            Matrix::ModelSingle(_) => MatrixType::model(Precision::Single),
            Matrix::ModelDouble(_) => MatrixType::model(Precision::Double),
            Matrix::ProjectionSingle(_) => MatrixType::projection(Precision::Single),
            Matrix::ProjectionDouble(_) => MatrixType::projection(Precision::Double),
        }
    }

    pub fn kind(&self) -> MatrixKind {
        self.matrix_type().kind
    }

    pub fn precision(&self) -> Precision {
        self.matrix_type().precision
    }

    /// Clone into a model matrix of precision `T`, failing on any other type
    pub fn try_model<T: Scalar>(&self, slot: &'static str) -> Result<ModelMatrix<T>, TransformError> {
        T::model_matrix(self)
            .cloned()
            .ok_or(TransformError::TypeMismatch {
                slot,
                expected: MatrixType::model(T::PRECISION),
                found: self.matrix_type(),
            })
    }

    /// Clone into a projection matrix of precision `T`, failing on any other type
    pub fn try_projection<T: Scalar>(
        &self,
        slot: &'static str,
    ) -> Result<ProjectionMatrix<T>, TransformError> {
        T::projection_matrix(self)
            .cloned()
            .ok_or(TransformError::TypeMismatch {
                slot,
                expected: MatrixType::projection(T::PRECISION),
                found: self.matrix_type(),
            })
    }
}

impl<T: Scalar> From<ModelMatrix<T>> for Matrix {
    fn from(matrix: ModelMatrix<T>) -> Self {
        T::wrap_model(matrix)
    }
}

impl<T: Scalar> From<ProjectionMatrix<T>> for Matrix {
    fn from(matrix: ProjectionMatrix<T>) -> Self {
        T::wrap_projection(matrix)
    }
}
