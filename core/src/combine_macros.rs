//! Declarative macro for statically typed reducer composition
//!
//! `combine_reducers!` is the typed counterpart of
//! [`CombinedReducer`](crate::composition::CombinedReducer): the composite
//! state is a plain struct with one `Arc` field per sub-reducer, so branches
//! are read as fields instead of through string keys and downcasts.

/// Declare a root reducer composed of named sub-reducers
///
/// Generates:
/// - the reducer struct, with one public field per sub-reducer and a
///   `new` constructor taking them in declaration order;
/// - the state struct, with one `Arc<Sub::State>` field per sub-reducer and a
///   `changed_fields` method;
/// - a [`Reducer`](crate::reducer::Reducer) impl that feeds every action to
///   every sub-reducer and always builds a new state struct.
///
/// All sub-reducers must share the declared action type. The action type
/// and the sub-reducer types must be at least as visible as the generated
/// structs.
///
/// # Example
///
/// ```
/// use reducer_kit_core::combine_reducers;
/// use reducer_kit_core::reducer::Reducer;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// pub enum AppAction {
///     Increment,
///     SetFilter(&'static str),
/// }
///
/// #[derive(Debug, Default)]
/// pub struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = i64;
///     type Action = AppAction;
///
///     fn initial_state(&self) -> i64 {
///         0
///     }
///
///     fn reduce(&self, state: &Arc<i64>, action: &AppAction) -> Arc<i64> {
///         match action {
///             AppAction::Increment => Arc::new(**state + 1),
///             AppAction::SetFilter(_) => Arc::clone(state),
///         }
///     }
/// }
///
/// #[derive(Debug, Default)]
/// pub struct FilterReducer;
///
/// impl Reducer for FilterReducer {
///     type State = &'static str;
///     type Action = AppAction;
///
///     fn initial_state(&self) -> &'static str {
///         "SHOW_ALL"
///     }
///
///     fn reduce(&self, state: &Arc<&'static str>, action: &AppAction) -> Arc<&'static str> {
///         match action {
///             AppAction::SetFilter(filter) => Arc::new(*filter),
///             AppAction::Increment => Arc::clone(state),
///         }
///     }
/// }
///
/// combine_reducers! {
///     /// Root reducer
///     #[derive(Debug, Default)]
///     pub struct AppReducer;
///
///     /// Root state
///     #[derive(Debug, Clone)]
///     pub struct AppState;
///
///     action: AppAction;
///
///     fields {
///         counter: CounterReducer,
///         filter: FilterReducer,
///     }
/// }
///
/// let reducer = AppReducer::default();
/// let state = Arc::new(reducer.initial_state());
/// let next = reducer.reduce(&state, &AppAction::Increment);
///
/// assert_eq!(*next.counter, 1);
/// assert_eq!(next.changed_fields(&state), vec!["counter"]);
/// assert!(Arc::ptr_eq(&next.filter, &state.filter));
/// ```
#[macro_export]
macro_rules! combine_reducers {
    (
        $(#[$reducer_meta:meta])*
        $reducer_vis:vis struct $reducer:ident;

        $(#[$state_meta:meta])*
        $state_vis:vis struct $state:ident;

        action: $action:ty;

        fields {
            $( $field:ident : $sub:ty ),+ $(,)?
        }
    ) => {
        $(#[$reducer_meta])*
        $reducer_vis struct $reducer {
            $(
                #[doc = concat!("Reducer for the `", stringify!($field), "` branch")]
                pub $field: $sub,
            )+
        }

        impl $reducer {
            /// Create the root reducer from its sub-reducers
            #[must_use]
            #[allow(clippy::too_many_arguments)]
            pub const fn new($( $field: $sub ),+) -> Self {
                Self { $( $field ),+ }
            }
        }

        $(#[$state_meta])*
        $state_vis struct $state {
            $(
                #[doc = concat!("State of the `", stringify!($field), "` branch")]
                pub $field: ::std::sync::Arc<<$sub as $crate::reducer::Reducer>::State>,
            )+
        }

        impl $state {
            /// Names of the fields whose branch is not pointer-equal to `previous`
            #[must_use]
            pub fn changed_fields(&self, previous: &Self) -> ::std::vec::Vec<&'static str> {
                let mut changed = ::std::vec::Vec::new();
                $(
                    if !::std::sync::Arc::ptr_eq(&self.$field, &previous.$field) {
                        changed.push(stringify!($field));
                    }
                )+
                changed
            }
        }

        impl $crate::reducer::Reducer for $reducer {
            type State = $state;
            type Action = $action;

            fn initial_state(&self) -> $state {
                $state {
                    $(
                        $field: ::std::sync::Arc::new(
                            $crate::reducer::Reducer::initial_state(&self.$field),
                        ),
                    )+
                }
            }

            fn reduce(
                &self,
                state: &::std::sync::Arc<$state>,
                action: &$action,
            ) -> ::std::sync::Arc<$state> {
                ::std::sync::Arc::new($state {
                    $(
                        $field: $crate::reducer::Reducer::reduce(&self.$field, &state.$field, action),
                    )+
                })
            }
        }
    };
}
