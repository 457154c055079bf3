//! The static command descriptor catalogue.
//!
//! Built once, at compile time, as a plain `&'static` slice — looked up by
//! case-insensitive name. A second level of descriptors (`subcommands`)
//! handles commands that are only meaningful together with a subcommand
//! token, e.g. `XGROUP DESTROY`, `CONFIG GET`, `CLUSTER SLOTS`.

mod table;

/// Sentinel for `last_key` meaning "every remaining argument is a key,
/// counted back from the end" when the true end isn't known ahead of time
/// (e.g. `MSET key val [key val ...]`). Concretely: -1 means "the last
/// argv element", -2 "second to last", and so on, same convention the
/// upstream command table uses.
pub const LAST_KEY_TO_END: i32 = -1;

/// Per-command behavior flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// First/last/step don't determine every key position; the parser must
    /// run a command-specific extraction routine (see `crate::keys`).
    pub movable_keys: bool,
    /// `argv[1]` selects a nested descriptor from `subcommands`.
    pub subcommand_dispatch: bool,
    /// Keys are given as `<script> <numkeys> <key>...` starting at argv[3].
    pub script_numkeys: bool,
    /// An empty key list after extraction is itself a parse error.
    pub needs_keys: bool,
}

impl Flags {
    pub const NONE: Flags = Flags {
        movable_keys: false,
        subcommand_dispatch: false,
        script_numkeys: false,
        needs_keys: false,
    };
    pub const NEEDS_KEYS: Flags = Flags {
        needs_keys: true,
        ..Flags::NONE
    };
    pub const MOVABLE: Flags = Flags {
        movable_keys: true,
        needs_keys: true,
        ..Flags::NONE
    };
    pub const SUBCOMMAND: Flags = Flags {
        subcommand_dispatch: true,
        ..Flags::NONE
    };
    pub const SCRIPT: Flags = Flags {
        script_numkeys: true,
        ..Flags::NONE
    };
}

/// One entry in the command catalogue.
#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    /// Canonical, uppercase name. For a subcommand entry, just the
    /// subcommand token (e.g. `"DESTROY"`), not `"XGROUP DESTROY"`.
    pub name: &'static str,
    /// `n >= 0` means exactly `n` argv elements; negative means "at least
    /// `|n|`".
    pub arity: i32,
    /// 0 when the command takes no keys at all (and isn't movable/script).
    pub first_key: i32,
    /// See [`LAST_KEY_TO_END`] for the "rest of argv" sentinel.
    pub last_key: i32,
    pub key_step: i32,
    pub flags: Flags,
    pub subcommands: &'static [CommandInfo],
}

impl CommandInfo {
    /// True if this descriptor participates in routing at all (either via
    /// fixed first/last/step, or a movable-key special case).
    pub fn takes_keys(&self) -> bool {
        self.first_key > 0 || self.flags.movable_keys || self.flags.script_numkeys
    }
}

/// Case-insensitive ASCII compare against a raw argv byte slice.
fn eq_ignore_case(name: &str, argv: &[u8]) -> bool {
    name.len() == argv.len() && name.bytes().zip(argv.iter()).all(|(a, b)| a.eq_ignore_ascii_case(b))
}

/// Looks up a top-level command descriptor by its name bytes.
pub fn lookup(name: &[u8]) -> Option<&'static CommandInfo> {
    table::COMMAND_TABLE.iter().find(|c| eq_ignore_case(c.name, name))
}

/// Looks up a subcommand descriptor of `parent` by its name bytes.
pub fn lookup_subcommand(parent: &CommandInfo, name: &[u8]) -> Option<&'static CommandInfo> {
    parent.subcommands.iter().find(|c| eq_ignore_case(c.name, name))
}
