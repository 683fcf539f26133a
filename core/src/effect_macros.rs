//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```
/// use storefront_core::{async_effect, effect::Effect};
///
/// #[derive(Debug)]
/// enum CartAction {
///     Reloaded,
/// }
///
/// let effect: Effect<CartAction> = async_effect! {
///     Some(CartAction::Reloaded)
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_yields_action() {
        let captured = 7;
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: captured })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds Effect::Future");
        };
        assert_eq!(fut.await, Some(TestAction::AsyncResult { value: 7 }));
    }
}
