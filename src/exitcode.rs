//! Process exit codes, following BSD sysexits.h

/// Bad flags, missing command or missing snapshot source
pub const USAGE: i32 = 64;

/// Malformed snapshot document or unknown node id
pub const DATAERR: i32 = 65;

/// Snapshot source could not be read or downloaded
pub const NOINPUT: i32 = 66;

/// Config template could not be written
pub const CANTCREAT: i32 = 73;

/// Unreadable or invalid settings
pub const CONFIG: i32 = 78;
