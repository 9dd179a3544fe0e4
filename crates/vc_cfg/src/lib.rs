#![doc = include_str!("../README.md")]
#![no_std]

/// Always expands its input.
///
/// Used as the target of an alias whose condition holds.
///
/// - `enabled!()` is `true`.
/// - `enabled! { if { A } else { B } }` is `A`.
/// - `enabled! { tokens }` is `tokens`.
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// Never expands its input.
///
/// Used as the target of an alias whose condition does not hold.
///
/// - `disabled!()` is `false`.
/// - `disabled! { if { A } else { B } }` is `B`.
/// - `disabled! { tokens }` is nothing.
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}

/// Selects the first arm whose condition holds.
///
/// A condition is either `#[cfg(..)]` or the path of an alias created by
/// [`define_alias!`]. The final `_` arm is taken when nothing else is.
///
/// Arms are not separated by commas. Arms written with `#[cfg(..)]` expand to
/// several items, so they are only usable in item or statement position;
/// alias arms expand to a single chain and also work as expressions.
///
/// ```
/// vc_cfg::switch! {
///     #[cfg(target_pointer_width = "64")] => { const WIDTH: u32 = 64; }
///     #[cfg(target_pointer_width = "32")] => { const WIDTH: u32 = 32; }
///     _ => { const WIDTH: u32 = 16; }
/// }
/// assert_eq!(WIDTH, usize::BITS);
/// ```
#[macro_export]
macro_rules! switch {
    () => {};
    ({ $($tt:tt)* }) => {{
        $crate::switch! { $($tt)* }
    }};
    (_ => { $($output:tt)* }) => {
        $($output)*
    };
    (
        #[cfg($cfg:meta)] => $output:tt
        $( $rest:tt )*
    ) => {
        #[cfg($cfg)]
        $crate::switch! { _ => $output }
        #[cfg(not($cfg))]
        $crate::switch! { $( $rest )* }
    };
    (
        $cond:path => $output:tt
        $( $rest:tt )*
    ) => {
        $cond! {
            if {
                $crate::switch! { _ => $output }
            } else {
                $crate::switch! { $( $rest )* }
            }
        }
    };
}

/// Defines aliases for `cfg` conditions.
///
/// Each alias becomes a macro that is either [`enabled!`] or [`disabled!`].
///
/// ```
/// mod cfg {
///     vc_cfg::define_alias! {
///         #[cfg(debug_assertions)] => debug,
///         #[cfg(not(debug_assertions))] => release,
///     }
/// }
///
/// assert_ne!(cfg::debug!(), cfg::release!());
/// ```
#[macro_export]
macro_rules! define_alias {
    (
        #[cfg($meta:meta)] => $p:ident
        $(, $( $rest:tt )* )?
    ) => {
        $crate::switch! {
            #[cfg($meta)] => {
                #[doc = concat!("Alias for `#[cfg(", stringify!($meta), ")]`.")]
                #[allow(unused_imports)]
                pub use $crate::enabled as $p;
            }
            _ => {
                #[doc = concat!("Alias for `#[cfg(", stringify!($meta), ")]`.")]
                #[allow(unused_imports)]
                pub use $crate::disabled as $p;
            }
        }
        $( $crate::define_alias! { $( $rest )* } )?
    };
    () => {};
}
