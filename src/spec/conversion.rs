use super::definition::InputSpec;
use crate::error::SpecConversionError;

/// A trait for custom host declaration formats that can be converted into an `InputSpec`.
///
/// This is the primary extension point for keeping the engine format-agnostic. A graph
/// editor keeps whatever node-declaration shape it already has; implementing this trait
/// on that shape provides the translation layer the slot registry parses.
///
/// # Example
///
/// ```rust
/// use dynslot::prelude::*;
/// use dynslot::error::SpecConversionError;
///
/// // 1. The host's own declaration shape.
/// struct MyInput {
///     name: String,
///     type_name: String,
///     grows: bool,
/// }
/// struct MyNodeDecl {
///     inputs: Vec<MyInput>,
/// }
///
/// // 2. Implement `IntoInputSpec` for the top-level declaration.
/// impl IntoInputSpec for MyNodeDecl {
///     fn into_input_spec(self) -> Result<InputSpec, SpecConversionError> {
///         let mut inputs = Vec::new();
///         for input in self.inputs {
///             inputs.push(InputDeclaration {
///                 name: input.name,
///                 value_type: input.type_name,
///                 options: DeclarationOptions {
///                     dynamic_scheme: input.grows.then_some(NamingScheme::Numeric),
///                     dynamic_group: 0,
///                     companion_value_kind: None,
///                 },
///             });
///         }
///         Ok(InputSpec { inputs })
///     }
/// }
/// ```
pub trait IntoInputSpec {
    /// Consumes the object and converts it into a registry-compatible input spec.
    fn into_input_spec(self) -> Result<InputSpec, SpecConversionError>;
}
