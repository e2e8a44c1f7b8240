//! Record descriptor capability
//!
//! The only abstraction the engine needs from domain data: a record that knows
//! which procedure it drives and what its result rows look like.

use crate::shape::Shape;

/// A record that can be dispatched to a stored procedure
///
/// The record itself is the input shape. `input_shape_name` and
/// `output_shape_name` key the resolved field orders, so two descriptor types
/// must never share a name unless they share a field layout.
///
/// # Example
///
/// ```
/// use procmap_core::descriptor::RecordDescriptor;
/// use procmap_core::shape::NoOutput;
///
/// procmap_core::record_shape! {
///     #[derive(Debug, Default)]
///     pub struct DeleteUser {
///         #[order = "1"]
///         pub id: i64,
///     }
/// }
///
/// impl RecordDescriptor for DeleteUser {
///     type Output = NoOutput;
///
///     fn input_shape_name(&self) -> &str { "DeleteUser" }
///     fn procedure_name(&self) -> &str { "delete_user" }
///     fn output_shape_name(&self) -> &str { "NoOutput" }
///     fn new_empty_output(&self) -> NoOutput { NoOutput }
/// }
/// ```
pub trait RecordDescriptor: Shape {
    type Output: Shape;

    fn input_shape_name(&self) -> &str;

    fn procedure_name(&self) -> &str;

    fn output_shape_name(&self) -> &str;

    /// A freshly allocated, empty output record
    fn new_empty_output(&self) -> Self::Output;
}
