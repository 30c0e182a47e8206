//! Macros for declaring event types.

/// Declare an event enum and implement [`Event`](crate::core::Event) for it.
///
/// Each variant's dispatch tag is its name, whatever payload it carries.
/// `Clone` and `Debug` are derived; further derives can be added as
/// attributes.
///
/// # Example
///
/// ```
/// use harel::core::Event;
/// use harel::event_enum;
///
/// event_enum! {
///     #[derive(PartialEq)]
///     pub enum PlayerEvent {
///         Play,
///         Seek(u64),
///         Volume { level: u8 },
///     }
/// }
///
/// assert_eq!(PlayerEvent::Play.name(), "Play");
/// assert_eq!(PlayerEvent::Seek(30).name(), "Seek");
/// assert_eq!(PlayerEvent::Volume { level: 3 }.name(), "Volume");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $( ( $($tuple:ty),* $(,)? ) )?
                $( { $($field:ident : $field_ty:ty),* $(,)? } )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $( ( $($tuple),* ) )?
                $( { $($field : $field_ty),* } )?
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::Event;

    event_enum! {
        #[derive(PartialEq)]
        enum TestEvent {
            Start,
            Tick(u64),
            Move(i32, i32),
            Rename { from: String, to: String },
        }
    }

    #[test]
    fn unit_variants_use_their_name() {
        assert_eq!(TestEvent::Start.name(), "Start");
    }

    #[test]
    fn payload_does_not_change_the_tag() {
        assert_eq!(TestEvent::Tick(1).name(), "Tick");
        assert_eq!(TestEvent::Move(-1, 2).name(), "Move");
        assert_eq!(
            TestEvent::Rename {
                from: "a".into(),
                to: "b".into()
            }
            .name(),
            "Rename"
        );
    }

    #[test]
    fn derives_are_kept() {
        let event = TestEvent::Tick(7);
        assert_eq!(event.clone(), TestEvent::Tick(7));
        assert_eq!(format!("{:?}", event), "Tick(7)");
    }
}
