/// Embed palette and shared builders.
pub mod embed;
/// Pure parser helpers.
pub mod parse;
/// Role-gate predicates.
pub mod permissions;
/// Shared time helpers.
pub mod time;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
