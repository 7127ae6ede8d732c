/// Build a [`Value`](crate::Value) from JSON-like syntax.
///
/// Maps become [`Value::Map`](crate::Value::Map), brackets become lists, and
/// anything else goes through `Value::from`. Negative numbers and other
/// multi-token expressions need parentheses when nested.
///
/// ```
/// use shapecast_core::{Value, value};
///
/// let v = value!({
///     "name": "Alice",
///     "tags": ["a", "b"],
///     "score": (-1),
///     "partner": null
/// });
/// assert_eq!(v.as_object().unwrap()["score"], Value::Int(-1));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(::std::vec![ $( $crate::value!($elem) ),* ])
    };
    ({ $($key:literal : $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::VObject::new();
        $(
            map.insert(::std::string::String::from($key), $crate::value!($val));
        )*
        $crate::Value::Map(map)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
