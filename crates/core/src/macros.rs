// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared across the workspace.
//!
//! - [`wire_names!`]: string names for fieldless enums
//! - [`setters!`]: chainable setters for request and config structs

/// Give a fieldless enum a fixed string name per variant.
///
/// Generates `as_str`, the inverse `from_name`, and a `Display` impl that
/// writes the name.
///
/// ```ignore
/// sj_core::wire_names! {
///     Phase {
///         Queued => "queued",
///         Done => "done",
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_names {
    ($enum:ident { $( $variant:ident => $name:literal ),+ $(,)? }) => {
        impl $enum {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Chainable setters, one per listed field, inside an `impl` block.
///
/// A field declared as `Option<T>` gets a setter taking `impl Into<T>` that
/// stores `Some`. A field prefixed with `set` takes its type as-is, which
/// keeps integer literals inferring to the field type. Any other field takes
/// `impl Into<Type>`.
///
/// ```ignore
/// impl Settings {
///     sj_core::setters! {
///         name: String,
///         set retries: u32,
///         label: Option<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    () => {};
    (set $field:ident : $ty:ty $(, $($rest:tt)*)?) => {
        pub fn $field(mut self, v: $ty) -> Self {
            self.$field = v;
            self
        }
        $( $crate::setters! { $($rest)* } )?
    };
    ($field:ident : Option<$inner:ty> $(, $($rest:tt)*)?) => {
        pub fn $field(mut self, v: impl Into<$inner>) -> Self {
            self.$field = Some(v.into());
            self
        }
        $( $crate::setters! { $($rest)* } )?
    };
    ($field:ident : $ty:ty $(, $($rest:tt)*)?) => {
        pub fn $field(mut self, v: impl Into<$ty>) -> Self {
            self.$field = v.into();
            self
        }
        $( $crate::setters! { $($rest)* } )?
    };
}
