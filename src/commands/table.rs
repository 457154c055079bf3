//! The static catalogue itself.
//!
//! Not exhaustive over every command the server understands — it covers
//! the generic, string, hash, list, set, sorted-set, stream, geo, bitmap,
//! scripting, pub/sub, transaction, connection, server, and cluster groups
//! widely enough to exercise every key-extraction rule `keys::extract`
//! implements. Commands not listed here simply fail the `UnknownCommand`
//! lookup; adding one is a matter of appending a row, not touching the
//! parser.

use super::{CommandInfo, Flags, LAST_KEY_TO_END};

const NO_SUBCOMMANDS: &[CommandInfo] = &[];

macro_rules! cmd {
    ($name:expr, $arity:expr, $first:expr, $last:expr, $step:expr, $flags:expr) => {
        CommandInfo {
            name: $name,
            arity: $arity,
            first_key: $first,
            last_key: $last,
            key_step: $step,
            flags: $flags,
            subcommands: NO_SUBCOMMANDS,
        }
    };
}

macro_rules! parent {
    ($name:expr, $arity:expr, $flags:expr, $subs:expr) => {
        CommandInfo {
            name: $name,
            arity: $arity,
            first_key: 0,
            last_key: 0,
            key_step: 0,
            flags: $flags,
            subcommands: $subs,
        }
    };
}

const XGROUP_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("CREATE", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("SETID", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("DESTROY", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("CREATECONSUMER", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("DELCONSUMER", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("HELP", -1, 0, 0, 0, Flags::NONE),
];

const XINFO_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("STREAM", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("GROUPS", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("CONSUMERS", -3, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("HELP", -1, 0, 0, 0, Flags::NONE),
];

const OBJECT_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("ENCODING", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("REFCOUNT", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("IDLETIME", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("FREQ", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("HELP", -1, 0, 0, 0, Flags::NONE),
];

const DEBUG_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("OBJECT", -2, 2, 2, 1, Flags::NEEDS_KEYS),
    cmd!("SLEEP", -2, 0, 0, 0, Flags::NONE),
    cmd!("JMAP", -1, 0, 0, 0, Flags::NONE),
    cmd!("SET-ACTIVE-EXPIRE", -2, 0, 0, 0, Flags::NONE),
];

const CLUSTER_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("SLOTS", -1, 0, 0, 0, Flags::NONE),
    cmd!("SHARDS", -1, 0, 0, 0, Flags::NONE),
    cmd!("NODES", -1, 0, 0, 0, Flags::NONE),
    cmd!("INFO", -1, 0, 0, 0, Flags::NONE),
    cmd!("MYID", -1, 0, 0, 0, Flags::NONE),
    cmd!("KEYSLOT", 2, 0, 0, 0, Flags::NONE),
    cmd!("COUNTKEYSINSLOT", 2, 0, 0, 0, Flags::NONE),
    cmd!("GETKEYSINSLOT", 3, 0, 0, 0, Flags::NONE),
];

const CONFIG_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("GET", -2, 0, 0, 0, Flags::NONE),
    cmd!("SET", -3, 0, 0, 0, Flags::NONE),
    cmd!("RESETSTAT", -1, 0, 0, 0, Flags::NONE),
    cmd!("REWRITE", -1, 0, 0, 0, Flags::NONE),
];

const CLIENT_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("ID", -1, 0, 0, 0, Flags::NONE),
    cmd!("GETNAME", -1, 0, 0, 0, Flags::NONE),
    cmd!("SETNAME", -2, 0, 0, 0, Flags::NONE),
    cmd!("LIST", -1, 0, 0, 0, Flags::NONE),
    cmd!("KILL", -2, 0, 0, 0, Flags::NONE),
    cmd!("NO-EVICT", -2, 0, 0, 0, Flags::NONE),
    cmd!("UNPAUSE", -1, 0, 0, 0, Flags::NONE),
];

const SCRIPT_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("LOAD", -2, 0, 0, 0, Flags::NONE),
    cmd!("EXISTS", -2, 0, 0, 0, Flags::NONE),
    cmd!("FLUSH", -1, 0, 0, 0, Flags::NONE),
    cmd!("KILL", -1, 0, 0, 0, Flags::NONE),
];

const FUNCTION_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("LOAD", -2, 0, 0, 0, Flags::NONE),
    cmd!("DELETE", -2, 0, 0, 0, Flags::NONE),
    cmd!("FLUSH", -1, 0, 0, 0, Flags::NONE),
    cmd!("LIST", -1, 0, 0, 0, Flags::NONE),
    cmd!("DUMP", -1, 0, 0, 0, Flags::NONE),
];

const ACL_SUBCOMMANDS: &[CommandInfo] = &[
    cmd!("WHOAMI", -1, 0, 0, 0, Flags::NONE),
    cmd!("LIST", -1, 0, 0, 0, Flags::NONE),
    cmd!("CAT", -1, 0, 0, 0, Flags::NONE),
    cmd!("SETUSER", -2, 0, 0, 0, Flags::NONE),
    cmd!("DELUSER", -2, 0, 0, 0, Flags::NONE),
];

pub(super) static COMMAND_TABLE: &[CommandInfo] = &[
    // --- generic / keyspace ---
    cmd!("DEL", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("UNLINK", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("EXISTS", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("TOUCH", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("EXPIRE", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PEXPIRE", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("EXPIREAT", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PEXPIREAT", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("EXPIRETIME", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PEXPIRETIME", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("TTL", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PTTL", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PERSIST", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("TYPE", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RENAME", 3, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("RENAMENX", 3, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("COPY", -3, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("DUMP", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RESTORE", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RESTORE-ASKING", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("MOVE", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RANDOMKEY", 1, 0, 0, 0, Flags::NONE),
    cmd!("KEYS", 2, 0, 0, 0, Flags::NONE),
    cmd!("SCAN", -2, 0, 0, 0, Flags::NONE),
    cmd!("WAIT", 3, 0, 0, 0, Flags::NONE),
    cmd!("SORT", -2, 1, 1, 1, Flags::MOVABLE),
    cmd!("SORT_RO", -2, 1, 1, 1, Flags::MOVABLE),
    parent!("OBJECT", -2, Flags::SUBCOMMAND, OBJECT_SUBCOMMANDS),
    parent!("DEBUG", -2, Flags::SUBCOMMAND, DEBUG_SUBCOMMANDS),
    // --- string ---
    cmd!("GET", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SET", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SETNX", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SETEX", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PSETEX", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GETSET", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GETDEL", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GETEX", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("APPEND", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("STRLEN", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("INCR", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("DECR", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("INCRBY", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("DECRBY", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("INCRBYFLOAT", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("MGET", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("MSET", -3, 1, LAST_KEY_TO_END, 2, Flags::NEEDS_KEYS),
    cmd!("MSETNX", -3, 1, LAST_KEY_TO_END, 2, Flags::NEEDS_KEYS),
    cmd!("SETRANGE", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GETRANGE", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    // --- hash ---
    cmd!("HGET", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HSET", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HSETNX", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HMSET", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HMGET", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HGETALL", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HDEL", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HEXISTS", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HINCRBY", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HINCRBYFLOAT", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HKEYS", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HVALS", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HLEN", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HSCAN", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("HRANDFIELD", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    // --- list ---
    cmd!("LPUSH", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RPUSH", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LPUSHX", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RPUSHX", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LPOP", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RPOP", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LRANGE", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LLEN", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LINDEX", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LSET", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LREM", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LTRIM", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("LINSERT", 5, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("RPOPLPUSH", 3, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("LMOVE", 5, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("BLPOP", -3, 1, -2, 1, Flags::NEEDS_KEYS),
    cmd!("BRPOP", -3, 1, -2, 1, Flags::NEEDS_KEYS),
    // --- set ---
    cmd!("SADD", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SREM", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SMEMBERS", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SISMEMBER", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SMISMEMBER", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SCARD", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SPOP", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SRANDMEMBER", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("SUNION", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("SUNIONSTORE", -3, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("SINTER", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("SINTERSTORE", -3, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("SINTERCARD", -3, 0, 0, 0, Flags::MOVABLE),
    cmd!("SDIFF", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("SDIFFSTORE", -3, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("SMOVE", 4, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("SSCAN", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    // --- sorted set ---
    cmd!("ZADD", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZREM", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZSCORE", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZMSCORE", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZINCRBY", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZCARD", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZCOUNT", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZRANGE", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZRANGEBYSCORE", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZREVRANGE", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZREVRANGEBYSCORE", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZRANK", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZREVRANK", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZSCAN", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZPOPMIN", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZPOPMAX", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("ZUNIONSTORE", -4, 0, 0, 0, Flags::MOVABLE),
    cmd!("ZINTERSTORE", -4, 0, 0, 0, Flags::MOVABLE),
    cmd!("ZDIFFSTORE", -4, 0, 0, 0, Flags::MOVABLE),
    // --- geo ---
    cmd!("GEOADD", -5, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GEOPOS", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GEODIST", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GEOHASH", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GEOSEARCH", -7, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GEOSEARCHSTORE", -8, 1, 2, 1, Flags::NEEDS_KEYS),
    cmd!("GEORADIUS", -6, 1, 1, 1, Flags::MOVABLE),
    cmd!("GEORADIUS_RO", -6, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GEORADIUSBYMEMBER", -5, 1, 1, 1, Flags::MOVABLE),
    cmd!("GEORADIUSBYMEMBER_RO", -5, 1, 1, 1, Flags::NEEDS_KEYS),
    // --- hyperloglog ---
    cmd!("PFADD", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("PFCOUNT", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("PFMERGE", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    // --- bitmap ---
    cmd!("SETBIT", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("GETBIT", 3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("BITCOUNT", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("BITPOS", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("BITOP", -4, 2, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("BITFIELD", -2, 1, 1, 1, Flags::NEEDS_KEYS),
    // --- pub/sub (channels are not routable keys) ---
    cmd!("PUBLISH", 3, 0, 0, 0, Flags::NONE),
    cmd!("SUBSCRIBE", -2, 0, 0, 0, Flags::NONE),
    cmd!("PSUBSCRIBE", -2, 0, 0, 0, Flags::NONE),
    cmd!("UNSUBSCRIBE", -1, 0, 0, 0, Flags::NONE),
    // --- transactions ---
    cmd!("MULTI", 1, 0, 0, 0, Flags::NONE),
    cmd!("EXEC", 1, 0, 0, 0, Flags::NONE),
    cmd!("DISCARD", 1, 0, 0, 0, Flags::NONE),
    cmd!("WATCH", -2, 1, LAST_KEY_TO_END, 1, Flags::NEEDS_KEYS),
    cmd!("UNWATCH", 1, 0, 0, 0, Flags::NONE),
    // --- connection ---
    cmd!("PING", -1, 0, 0, 0, Flags::NONE),
    cmd!("ECHO", 2, 0, 0, 0, Flags::NONE),
    cmd!("AUTH", -2, 0, 0, 0, Flags::NONE),
    cmd!("SELECT", 2, 0, 0, 0, Flags::NONE),
    cmd!("HELLO", -1, 0, 0, 0, Flags::NONE),
    cmd!("ASKING", 1, 0, 0, 0, Flags::NONE),
    cmd!("READONLY", 1, 0, 0, 0, Flags::NONE),
    cmd!("READWRITE", 1, 0, 0, 0, Flags::NONE),
    parent!("CLIENT", -2, Flags::SUBCOMMAND, CLIENT_SUBCOMMANDS),
    cmd!("COMMAND", -1, 0, 0, 0, Flags::NONE),
    // --- server ---
    cmd!("DBSIZE", 1, 0, 0, 0, Flags::NONE),
    cmd!("FLUSHDB", -1, 0, 0, 0, Flags::NONE),
    cmd!("FLUSHALL", -1, 0, 0, 0, Flags::NONE),
    cmd!("INFO", -1, 0, 0, 0, Flags::NONE),
    cmd!("TIME", 1, 0, 0, 0, Flags::NONE),
    cmd!("LASTSAVE", 1, 0, 0, 0, Flags::NONE),
    cmd!("SHUTDOWN", -1, 0, 0, 0, Flags::NONE),
    parent!("CONFIG", -2, Flags::SUBCOMMAND, CONFIG_SUBCOMMANDS),
    // --- scripting ---
    cmd!("EVAL", -3, 0, 0, 0, Flags::SCRIPT),
    cmd!("EVALSHA", -3, 0, 0, 0, Flags::SCRIPT),
    cmd!("EVAL_RO", -3, 0, 0, 0, Flags::SCRIPT),
    cmd!("EVALSHA_RO", -3, 0, 0, 0, Flags::SCRIPT),
    cmd!("FCALL", -3, 0, 0, 0, Flags::SCRIPT),
    cmd!("FCALL_RO", -3, 0, 0, 0, Flags::SCRIPT),
    parent!("SCRIPT", -2, Flags::SUBCOMMAND, SCRIPT_SUBCOMMANDS),
    parent!("FUNCTION", -2, Flags::SUBCOMMAND, FUNCTION_SUBCOMMANDS),
    // --- cluster / acl ---
    parent!("CLUSTER", -2, Flags::SUBCOMMAND, CLUSTER_SUBCOMMANDS),
    parent!("ACL", -2, Flags::SUBCOMMAND, ACL_SUBCOMMANDS),
    // --- streams ---
    cmd!("XADD", -5, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XLEN", 2, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XRANGE", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XREVRANGE", 4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XDEL", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XTRIM", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XACK", -4, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XCLAIM", -6, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XAUTOCLAIM", -7, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XPENDING", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XSETID", -3, 1, 1, 1, Flags::NEEDS_KEYS),
    cmd!("XREAD", -4, 0, 0, 0, Flags::MOVABLE),
    cmd!("XREADGROUP", -7, 0, 0, 0, Flags::MOVABLE),
    parent!("XGROUP", -2, Flags::SUBCOMMAND, XGROUP_SUBCOMMANDS),
    parent!("XINFO", -2, Flags::SUBCOMMAND, XINFO_SUBCOMMANDS),
];
