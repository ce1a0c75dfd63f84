//! Macros for declaring phase vocabularies.

/// Declare a phase enum and its [`Phase`](crate::core::Phase) implementation.
///
/// Each variant is paired with the tag observers see. The serde
/// representation uses the same tag, so a serialized snapshot reads
/// `"phase": "next_j"` rather than the Rust variant name.
///
/// # Example
///
/// ```
/// use algostep::core::Phase;
/// use algostep::phase_enum;
///
/// phase_enum! {
///     pub enum WalkPhase {
///         Start => "start",
///         Step => "step",
///         Done => "done",
///     }
///     start: Start
///     final: Done
/// }
///
/// assert_eq!(WalkPhase::Step.name(), "step");
/// assert!(WalkPhase::Start.is_start());
/// assert!(WalkPhase::Done.is_final());
/// assert_eq!(WalkPhase::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! phase_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $tag:literal
            ),* $(,)?
        }
        start: $start:ident
        final: $final:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $tag)]
                $variant
            ),*
        }

        impl $name {
            /// Every phase in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::Phase for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),*
                }
            }

            fn is_start(&self) -> bool {
                matches!(self, Self::$start)
            }

            fn is_final(&self) -> bool {
                matches!(self, Self::$final)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::core::Phase::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::Phase;

    phase_enum! {
        enum TestPhase {
            Start => "start",
            CheckEnd => "check_end",
            Done => "done",
        }
        start: Start
        final: Done
    }

    #[test]
    fn phase_enum_macro_generates_trait() {
        assert_eq!(TestPhase::Start.name(), "start");
        assert_eq!(TestPhase::CheckEnd.name(), "check_end");
        assert!(TestPhase::Start.is_start());
        assert!(!TestPhase::CheckEnd.is_start());
        assert!(TestPhase::Done.is_final());
        assert!(!TestPhase::CheckEnd.is_final());
    }

    #[test]
    fn phase_enum_lists_all_variants() {
        assert_eq!(
            TestPhase::ALL,
            &[TestPhase::Start, TestPhase::CheckEnd, TestPhase::Done]
        );
    }

    #[test]
    fn phase_enum_serializes_with_tag() {
        let json = serde_json::to_string(&TestPhase::CheckEnd).unwrap();
        assert_eq!(json, "\"check_end\"");
        assert_eq!(TestPhase::CheckEnd.to_string(), "check_end");
    }
}
