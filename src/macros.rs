/// Declares a discriminant type and implements [`FlatEnum`](crate::FlatEnum) for it.
///
/// The generated type is a transparent newtype over the representation, so values that no
/// variant names still round-trip instead of being rejected. Variant names become associated
/// constants.
///
/// ```rust
/// use flatview::{flat_enum, FlatEnum};
///
/// flat_enum! {
///     /// Kind of shape stored in a union.
///     pub struct Shape: u8 {
///         NONE = 0,
///         Circle = 1,
///         Square = 2,
///     }
/// }
///
/// assert_eq!(Shape::from_repr(2), Shape::Square);
/// assert_eq!(Shape::Square.variant_name(), Some("Square"));
/// assert_eq!(format!("{:?}", Shape::from_repr(9)), "Shape(9)");
/// assert!(Shape::default().is_none());
/// ```
#[macro_export]
macro_rules! flat_enum {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $repr:ty {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        $vis struct $name(pub $repr);

        #[allow(non_upper_case_globals)]
        impl $name {
            $(
                $(#[$variant_meta])*
                pub const $variant: $name = $name($value);
            )+

            /// Every named variant, in declaration order.
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            /// Name of the variant, or `None` for an unnamed value.
            pub fn variant_name(self) -> ::core::option::Option<&'static str> {
                $(
                    if self == $name::$variant {
                        return ::core::option::Option::Some(stringify!($variant));
                    }
                )+
                ::core::option::Option::None
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self.variant_name() {
                    ::core::option::Option::Some(name) => f.write_str(name),
                    ::core::option::Option::None => {
                        write!(f, "{}({})", stringify!($name), self.0)
                    }
                }
            }
        }

        impl $crate::FlatEnum for $name {
            type Repr = $repr;

            #[inline]
            fn from_repr(repr: $repr) -> Self {
                $name(repr)
            }

            #[inline]
            fn to_repr(self) -> $repr {
                self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::FlatEnum;

    flat_enum! {
        struct Color: i16 {
            Red = 1,
            Green = 2,
            /// Outside the u8 range on purpose.
            Blue = 300,
        }
    }

    #[test]
    fn test_flat_enum_constants() {
        assert_eq!(Color::Red.0, 1);
        assert_eq!(Color::Blue.to_repr(), 300);
        assert_eq!(Color::VARIANTS, &[Color::Red, Color::Green, Color::Blue]);
    }

    #[test]
    fn test_flat_enum_unknown_value() {
        let unknown = Color::from_repr(-5);
        assert_eq!(unknown.variant_name(), None);
        assert_eq!(format!("{:?}", unknown), "Color(-5)");
        assert_eq!(format!("{:?}", Color::Green), "Green");
    }

    #[test]
    fn test_flat_enum_none() {
        assert!(Color::default().is_none());
        assert!(!Color::Red.is_none());
    }
}
