/// Example: save and restore transform state while walking a small scene
///
/// Usage: cargo run --example transform_stack

use glstate_core::{Matrix, ModelMatrix, ProjectionMatrix, StateStack, TransformStateDouble, TransformError};
use nalgebra::Point3;

fn main() -> Result<(), TransformError> {
    let mut stack = StateStack::new(TransformStateDouble::new());

    let projection = ProjectionMatrix::perspective(std::f64::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    let view = ModelMatrix::from_translation(0.0, 0.0, -10.0);
    stack.current_mut().set_local_projection(Some(&Matrix::from(projection)))?;
    stack.current_mut().set_local_model_view(Some(&Matrix::from(view.clone())))?;

    for (name, offset) in [("left", -2.0), ("center", 0.0), ("right", 2.0)] {
        stack.push();

        let state = stack.current_mut();
        let mut model_view = view.clone();
        model_view.translate(offset, 0.0, 0.0);
        model_view.rotate_y(offset * 0.25);
        state.set_local_model_view(Some(&Matrix::from(model_view)))?;

        let clip = state
            .local_model_view_projection()?
            .transform_point(&Point3::origin());
        println!("{:>6}: origin -> ({:+.3}, {:+.3}, {:+.3})", name, clip.x, clip.y, clip.z);

        stack.pop()?;
    }

    println!("stack depth after traversal: {}", stack.depth());
    Ok(())
}
