//! Macro for memoizing async functions through a cache store.

/// Wrap an async `Result`-returning function with cache memoization.
///
/// The wrapped function checks the store first, deserializing a hit
/// with `serde_json`; on a miss it runs the body, stores the
/// serialized result, and returns it. Cache read or write failures
/// fall through to computing the value, never into the caller.
///
/// # Usage
///
/// ```ignore
/// cache_remember! {
///     name = "room_info",
///     ttl = 60,
///     key = |room_id: &str| room_id.to_string(),
///     async fn room_info(store: &RedisStore, room_id: &str) -> CacheResult<RoomInfo> {
///         provider.room_info(room_id).await
///     }
/// }
/// ```
///
/// # Parameters
///
/// - `name`: namespace prepended to every key as `"{name}:{key}"`
/// - `ttl` (optional): time-to-live in seconds; absent means the value
///   is stored with no expiry
/// - `key`: closure building the cache key from the function arguments
/// - `async fn`: the function definition; its first parameter is a
///   reference to any [`Store`](crate::Store) implementation
#[macro_export]
macro_rules! cache_remember {
    (
        name = $cache_name:literal,
        $(ttl = $ttl:expr,)?
        key = |$($key_arg:ident : $key_ty:ty),* $(,)?| $key_expr:expr,
        async fn $fn_name:ident($store_param:ident : &$store_ty:ty $(, $arg:ident : $arg_ty:ty)* $(,)?) -> $ret_ty:ty $body:block
    ) => {
        pub async fn $fn_name(
            $store_param: &$store_ty,
            $($arg: $arg_ty),*
        ) -> $ret_ty {
            use $crate::Store as _;

            let cache_key = {
                $(let $key_arg: $key_ty = &$arg;)*
                format!("{}:{}", $cache_name, $key_expr)
            };

            if let Ok(Some(raw)) = $store_param.fetch(&cache_key).await {
                if let Ok(cached_value) = $crate::serde_json::from_str(&raw) {
                    return Ok(cached_value);
                }
            }

            let result: $ret_ty = (|| async $body)().await;

            if let Ok(ref value) = result {
                if let Ok(raw) = $crate::serde_json::to_string(value) {
                    let ttl = $crate::cache_remember!(@ttl $($ttl)?);
                    let _ = $store_param.put(&cache_key, &raw, ttl).await;
                }
            }

            result
        }
    };

    (@ttl) => { ::std::time::Duration::ZERO };
    (@ttl $ttl:expr) => { ::std::time::Duration::from_secs($ttl) };
}
