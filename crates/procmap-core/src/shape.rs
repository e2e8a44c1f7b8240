//! Shape metadata and fieldwise access
//!
//! A shape is the field structure of an input or output record. Each field may
//! carry a 1-based order marker; only marked fields take part in binding, and
//! unmarked fields are left alone.
//!
//! Shapes are usually declared with [`record_shape!`](crate::record_shape),
//! which generates the field table and the accessors from one declaration:
//!
//! ```
//! procmap_core::record_shape! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct CreateUser {
//!         #[order = "2"]
//!         pub email: String,
//!         #[order = "1"]
//!         pub name: String,
//!         pub note: String,
//!     }
//! }
//!
//! use procmap_core::shape::Shape;
//! let user = CreateUser::default();
//! assert_eq!(user.field_defs().len(), 3);
//! assert_eq!(CreateUser::FIELD_DEFS[1].order, Some("1"));
//! ```

use crate::value::{Value, ValueError};
use thiserror::Error;

/// Declared metadata for one field of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    /// Raw order marker, expected to be a positive integer string
    pub order: Option<&'static str>,
}

impl FieldDef {
    pub const fn ordered(name: &'static str, order: &'static str) -> Self {
        Self {
            name,
            order: Some(order),
        }
    }

    pub const fn unordered(name: &'static str) -> Self {
        Self { name, order: None }
    }
}

/// Failure to assign a field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("no field named {0}")]
    Missing(String),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Fieldwise access to a record
///
/// Replaces runtime reflection: a shape states its fields once and exposes a
/// getter/setter keyed by field identifier.
pub trait Shape {
    /// Every field of the shape in declaration order
    fn field_defs(&self) -> &'static [FieldDef];

    /// Current value of `field`, or `None` if the shape has no such field
    fn get_field(&self, field: &str) -> Option<Value>;

    /// Assign `value` to `field`
    ///
    /// # Errors
    ///
    /// [`FieldError::Missing`] for an unknown field, [`FieldError::Value`] when
    /// the value does not convert to the field's type.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldError>;
}

/// Output shape for descriptors whose procedure returns nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOutput;

impl Shape for NoOutput {
    fn field_defs(&self) -> &'static [FieldDef] {
        &[]
    }

    fn get_field(&self, _field: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, field: &str, _value: Value) -> Result<(), FieldError> {
        Err(FieldError::Missing(field.to_string()))
    }
}

/// Declare a struct together with its [`Shape`] implementation
///
/// Fields may be preceded by `#[order = "N"]`; no other field attributes are
/// accepted. Every field type must implement
/// [`FieldValue`](crate::value::FieldValue). The generated struct also gets an
/// associated `FIELD_DEFS` constant.
#[macro_export]
macro_rules! record_shape {
    (@order) => {
        ::core::option::Option::None
    };
    (@order $order:literal) => {
        ::core::option::Option::Some($order)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[order = $order:literal])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field: $ty, )*
        }

        impl $name {
            pub const FIELD_DEFS: &'static [$crate::shape::FieldDef] = &[
                $(
                    $crate::shape::FieldDef {
                        name: stringify!($field),
                        order: $crate::record_shape!(@order $($order)?),
                    },
                )*
            ];
        }

        impl $crate::shape::Shape for $name {
            fn field_defs(&self) -> &'static [$crate::shape::FieldDef] {
                Self::FIELD_DEFS
            }

            fn get_field(&self, field: &str) -> ::core::option::Option<$crate::value::Value> {
                $(
                    if field == stringify!($field) {
                        return ::core::option::Option::Some(
                            $crate::value::FieldValue::to_value(&self.$field),
                        );
                    }
                )*
                ::core::option::Option::None
            }

            fn set_field(
                &mut self,
                field: &str,
                value: $crate::value::Value,
            ) -> ::core::result::Result<(), $crate::shape::FieldError> {
                $(
                    if field == stringify!($field) {
                        self.$field = <$ty as $crate::value::FieldValue>::from_value(value)?;
                        return ::core::result::Result::Ok(());
                    }
                )*
                let _ = value;
                ::core::result::Result::Err($crate::shape::FieldError::Missing(field.to_string()))
            }
        }
    };
}
