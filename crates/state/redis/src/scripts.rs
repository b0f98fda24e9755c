/// Lua script implementing `StateStore::acquire`: atomic increment then
/// compare-and-rollback.
///
/// KEYS\[1\] = counter key
/// ARGV\[1\] = limit
///
/// Returns 1 if the post-increment value is `<= limit`, 0 otherwise (the
/// increment is rolled back before returning 0).
pub const ACQUIRE: &str = r"
local current = redis.call('INCR', KEYS[1])
local limit = tonumber(ARGV[1])
if current > limit then
    redis.call('DECR', KEYS[1])
    return 0
end
return 1
";

/// Lua script implementing the distributed fixed-window rate limiter:
/// increment, arm the window's expiry the first time the key is created,
/// then compare against the limit.
///
/// KEYS\[1\] = `ratelimit:<org_id>` counter key
/// ARGV\[1\] = limit
/// ARGV\[2\] = window size in seconds
///
/// Returns 1 (allowed) or 0 (denied). Steps 1-3 execute as a single Redis
/// command and therefore cannot interleave with other callers.
pub const FIXED_WINDOW_ALLOW: &str = r"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[2])
end
local limit = tonumber(ARGV[1])
if current > limit then
    return 0
end
return 1
";
