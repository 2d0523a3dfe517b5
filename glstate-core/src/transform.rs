/// Transformation state: model, projection and derived model-view-projection
use log::trace;

use crate::error::TransformError;
use crate::matrix::{Matrix, ModelMatrix, Scalar};
use crate::projection::ProjectionMatrix;
use crate::stack::GraphicsState;

const LOCAL_PROJECTION: &str = "local projection";
const LOCAL_MODEL_VIEW: &str = "local model-view";
const LOCAL_MODEL_VIEW_PROJECTION: &str = "local model-view-projection";

/// Content of the model-view-projection slot
#[derive(Debug, Clone, PartialEq)]
enum ModelViewProjection<T: Scalar> {
    /// Computed from the projection and model-view; dropped when either changes
    Derived(ModelMatrix<T>),
    /// Set by the caller; kept until cleared or replaced
    Assigned(ModelMatrix<T>),
}

impl<T: Scalar> ModelViewProjection<T> {
    fn matrix(&self) -> &ModelMatrix<T> {
        match self {
            ModelViewProjection::Derived(matrix) | ModelViewProjection::Assigned(matrix) => matrix,
        }
    }
}

/// State tracking the transformation of a rendered object.
///
/// The local model matrix is created lazily on first access. The
/// model-view-projection matrix is derived from the local projection and the
/// local model-view on first read and cached until one of them is set again;
/// a value assigned through [`set_local_model_view_projection`] is never
/// replaced by derivation.
///
/// [`set_local_model_view_projection`]: TransformState::set_local_model_view_projection
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState<T: Scalar> {
    local_model: Option<ModelMatrix<T>>,
    local_projection: Option<ProjectionMatrix<T>>,
    local_model_view: Option<ModelMatrix<T>>,
    local_model_view_projection: Option<ModelViewProjection<T>>,
}

/// Transform state in single precision
pub type TransformStateSingle = TransformState<f32>;

/// Transform state in double precision
pub type TransformStateDouble = TransformState<f64>;

impl<T: Scalar> TransformState<T> {
    pub fn new() -> Self {
        Self {
            local_model: None,
            local_projection: None,
            local_model_view: None,
            local_model_view_projection: None,
        }
    }

    /// The local model matrix (object space to parent space), created as
    /// identity on first access.
    pub fn local_model(&mut self) -> &mut ModelMatrix<T> {
        self.local_model.get_or_insert_with(ModelMatrix::identity)
    }

    /// Whether the local model matrix exists, without creating it.
    pub fn has_local_model(&self) -> bool {
        self.local_model.is_some()
    }

    pub fn local_projection(&self) -> Option<&ProjectionMatrix<T>> {
        self.local_projection.as_ref()
    }

    pub fn has_local_projection(&self) -> bool {
        self.local_projection.is_some()
    }

    /// Set (a copy of) the local projection, or clear it with `None`.
    ///
    /// Fails without modifying the state if `value` is not a projection
    /// matrix of this state's precision.
    pub fn set_local_projection(&mut self, value: Option<&Matrix>) -> Result<(), TransformError> {
        self.local_projection = value
            .map(|matrix| matrix.try_projection(LOCAL_PROJECTION))
            .transpose()?;
        self.discard_derived();
        Ok(())
    }

    pub fn local_model_view(&self) -> Option<&ModelMatrix<T>> {
        self.local_model_view.as_ref()
    }

    pub fn has_local_model_view(&self) -> bool {
        self.local_model_view.is_some()
    }

    /// Set (a copy of) the local model-view, or clear it with `None`.
    pub fn set_local_model_view(&mut self, value: Option<&Matrix>) -> Result<(), TransformError> {
        self.local_model_view = value
            .map(|matrix| matrix.try_model(LOCAL_MODEL_VIEW))
            .transpose()?;
        self.discard_derived();
        Ok(())
    }

    /// The local model-view-projection matrix.
    ///
    /// Returns the assigned or cached value if there is one; otherwise computes
    /// `projection × model-view`, caches it and returns it.
    pub fn local_model_view_projection(&mut self) -> Result<&ModelMatrix<T>, TransformError> {
        let model_view_projection = match self.local_model_view_projection.take() {
            Some(model_view_projection) => model_view_projection,
            None => ModelViewProjection::Derived(self.derive_model_view_projection()?),
        };

        Ok(self
            .local_model_view_projection
            .insert(model_view_projection)
            .matrix())
    }

    /// The model-view-projection matrix if one is assigned or cached,
    /// without deriving it.
    pub fn cached_local_model_view_projection(&self) -> Option<&ModelMatrix<T>> {
        self.local_model_view_projection
            .as_ref()
            .map(ModelViewProjection::matrix)
    }

    /// Assign (a copy of) the model-view-projection, or clear it with `None`.
    pub fn set_local_model_view_projection(
        &mut self,
        value: Option<&Matrix>,
    ) -> Result<(), TransformError> {
        self.local_model_view_projection = value
            .map(|matrix| matrix.try_model(LOCAL_MODEL_VIEW_PROJECTION))
            .transpose()?
            .map(ModelViewProjection::Assigned);
        Ok(())
    }

    /// Drop the model-view-projection matrix, assigned or derived.
    pub fn clear_local_model_view_projection(&mut self) {
        self.local_model_view_projection = None;
    }

    /// Copy this state so the copy and the original can be changed
    /// independently. The copy always has a local model matrix.
    pub fn push(&self) -> Self {
        let mut copied = self.clone();
        copied.local_model = Some(self.local_model.clone().unwrap_or_default());
        trace!(
            "pushed transform state (model: {}, projection: {}, model-view: {})",
            self.has_local_model(),
            self.has_local_projection(),
            self.has_local_model_view()
        );
        copied
    }

    fn derive_model_view_projection(&self) -> Result<ModelMatrix<T>, TransformError> {
        let projection = self
            .local_projection
            .as_ref()
            .ok_or(TransformError::MissingPrerequisite {
                slot: LOCAL_MODEL_VIEW_PROJECTION,
                missing: LOCAL_PROJECTION,
            })?;
        let model_view = self
            .local_model_view
            .as_ref()
            .ok_or(TransformError::MissingPrerequisite {
                slot: LOCAL_MODEL_VIEW_PROJECTION,
                missing: LOCAL_MODEL_VIEW,
            })?;

        trace!("deriving {}", LOCAL_MODEL_VIEW_PROJECTION);
        Ok(projection.multiply(model_view))
    }

    fn discard_derived(&mut self) {
        if let Some(ModelViewProjection::Derived(_)) = self.local_model_view_projection {
            self.local_model_view_projection = None;
        }
    }
}

impl<T: Scalar> Default for TransformState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> GraphicsState for TransformState<T> {
    fn push(&self) -> Self {
        TransformState::push(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{MatrixType, Precision};
    use nalgebra::Matrix4;

    fn projection(matrix: ProjectionMatrix<f64>) -> Matrix {
        Matrix::from(matrix)
    }

    fn model(matrix: ModelMatrix<f64>) -> Matrix {
        Matrix::from(matrix)
    }

    #[test]
    fn test_local_model_is_lazy() {
        let mut state = TransformStateDouble::new();
        assert!(!state.has_local_model());

        let first: *const ModelMatrix<f64> = state.local_model();
        assert!(state.has_local_model());
        assert!((state.local_model().as_matrix() - Matrix4::identity()).norm() < 1e-12);

        let second: *const ModelMatrix<f64> = state.local_model();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_local_model_keeps_mutations() {
        let mut state = TransformStateSingle::default();
        state.local_model().translate(0.0, 2.0, 0.0);
        assert!((state.local_model().position().y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_type_mismatch() {
        let mut state = TransformStateDouble::new();

        let single = Matrix::from(ProjectionMatrix::<f32>::identity());
        assert_eq!(
            state.set_local_projection(Some(&single)),
            Err(TransformError::TypeMismatch {
                slot: "local projection",
                expected: MatrixType::projection(Precision::Double),
                found: MatrixType::projection(Precision::Single),
            })
        );

        let wrong_kind = model(ModelMatrix::identity());
        assert!(state.set_local_projection(Some(&wrong_kind)).is_err());
        assert!(!state.has_local_projection());
    }

    #[test]
    fn test_failed_assignment_keeps_previous_value() {
        let mut state = TransformStateDouble::new();
        let view = model(ModelMatrix::from_translation(0.0, 0.0, -5.0));
        state.set_local_model_view(Some(&view)).unwrap();

        let wrong_kind = projection(ProjectionMatrix::identity());
        assert!(state.set_local_model_view(Some(&wrong_kind)).is_err());
        assert_eq!(
            state.local_model_view(),
            Some(&ModelMatrix::from_translation(0.0, 0.0, -5.0))
        );
    }

    #[test]
    fn test_projection_clear() {
        let mut state = TransformStateDouble::new();
        state
            .set_local_projection(Some(&projection(ProjectionMatrix::identity())))
            .unwrap();
        assert!(state.has_local_projection());

        state.set_local_projection(None).unwrap();
        assert!(!state.has_local_projection());
        assert!(state.local_projection().is_none());
    }

    #[test]
    fn test_setter_stores_a_copy() {
        let mut state = TransformStateDouble::new();
        let mut source = ModelMatrix::from_translation(1.0, 0.0, 0.0);
        state.set_local_model_view(Some(&model(source.clone()))).unwrap();

        source.translate(5.0, 0.0, 0.0);
        let stored = state.local_model_view().unwrap();
        assert!((stored.position().x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_model_view_projection_derivation() {
        let mut state = TransformStateDouble::new();
        let p = ProjectionMatrix::perspective(1.0, 1.5, 0.1, 50.0);
        let v = ModelMatrix::from_translation(0.5, -1.0, -4.0);
        state.set_local_projection(Some(&projection(p.clone()))).unwrap();
        state.set_local_model_view(Some(&model(v.clone()))).unwrap();

        let expected = p.multiply(&v);
        let first: *const ModelMatrix<f64> = {
            let mvp = state.local_model_view_projection().unwrap();
            assert!((mvp.as_matrix() - expected.as_matrix()).norm() < 1e-12);
            mvp
        };
        let second: *const ModelMatrix<f64> = state.local_model_view_projection().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_identity_projection_example() {
        let mut state = TransformStateDouble::new();
        state
            .set_local_projection(Some(&projection(ProjectionMatrix::new(Matrix4::identity()))))
            .unwrap();
        state
            .set_local_model_view(Some(&model(ModelMatrix::from_translation(1.0, 0.0, 0.0))))
            .unwrap();

        let mvp = state.local_model_view_projection().unwrap();
        let translate = ModelMatrix::<f64>::from_translation(1.0, 0.0, 0.0);
        assert!((mvp.as_matrix() - translate.as_matrix()).norm() < 1e-12);
    }

    #[test]
    fn test_model_view_projection_missing_prerequisite() {
        let mut state = TransformStateDouble::new();
        state
            .set_local_projection(Some(&projection(ProjectionMatrix::identity())))
            .unwrap();
        assert_eq!(
            state.local_model_view_projection(),
            Err(TransformError::MissingPrerequisite {
                slot: "local model-view-projection",
                missing: "local model-view",
            })
        );

        let mut state = TransformStateDouble::new();
        state
            .set_local_model_view(Some(&model(ModelMatrix::identity())))
            .unwrap();
        assert_eq!(
            state.local_model_view_projection(),
            Err(TransformError::MissingPrerequisite {
                slot: "local model-view-projection",
                missing: "local projection",
            })
        );
        assert!(state.cached_local_model_view_projection().is_none());
    }

    #[test]
    fn test_derived_value_follows_inputs() {
        let mut state = TransformStateDouble::new();
        state
            .set_local_projection(Some(&projection(ProjectionMatrix::identity())))
            .unwrap();
        state
            .set_local_model_view(Some(&model(ModelMatrix::identity())))
            .unwrap();
        state.local_model_view_projection().unwrap();

        state
            .set_local_model_view(Some(&model(ModelMatrix::from_translation(0.0, 3.0, 0.0))))
            .unwrap();
        assert!(state.cached_local_model_view_projection().is_none());

        let mvp = state.local_model_view_projection().unwrap();
        assert!((mvp.position().y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_assigned_value_survives_input_changes() {
        let mut state = TransformStateDouble::new();
        let assigned = ModelMatrix::from_translation(9.0, 9.0, 9.0);
        state
            .set_local_model_view_projection(Some(&model(assigned.clone())))
            .unwrap();

        // No inputs are needed once a value is assigned
        assert_eq!(state.local_model_view_projection(), Ok(&assigned));

        state
            .set_local_projection(Some(&projection(ProjectionMatrix::identity())))
            .unwrap();
        assert_eq!(state.cached_local_model_view_projection(), Some(&assigned));

        state.clear_local_model_view_projection();
        assert!(state.local_model_view_projection().is_err());
    }

    #[test]
    fn test_model_view_projection_type_mismatch() {
        let mut state = TransformStateSingle::new();
        let double = model(ModelMatrix::identity());
        assert!(matches!(
            state.set_local_model_view_projection(Some(&double)),
            Err(TransformError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_push_copies_are_independent() {
        let mut original = TransformStateDouble::new();
        original.local_model().translate(1.0, 0.0, 0.0);
        original
            .set_local_projection(Some(&projection(ProjectionMatrix::identity())))
            .unwrap();

        let mut copy = original.push();
        assert!(!std::ptr::eq(original.local_model(), copy.local_model()));

        copy.local_model().translate(0.0, 1.0, 0.0);
        assert!((original.local_model().position().y).abs() < 1e-12);
        assert!((copy.local_model().position().y - 1.0).abs() < 1e-12);

        original.local_model().scale(2.0, 2.0, 2.0);
        assert!((copy.local_model().as_matrix()[(0, 0)] - 1.0).abs() < 1e-12);
        assert!(copy.has_local_projection());
    }

    #[test]
    fn test_push_materializes_local_model() {
        let original = TransformStateDouble::new();
        let copy = original.push();
        assert!(!original.has_local_model());
        assert!(copy.has_local_model());
    }
}
