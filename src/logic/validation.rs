//! Player name rule shared by create and rename.

/// Shortest accepted name, in characters.
pub const MIN_NAME_LEN: usize = 2;
/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 30;

const ACCENTED: &str = "ÁÉÍÓÚÜÑáéíóúüñ";

/// Whether `c` may appear in a player name.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '_' || ACCENTED.contains(c)
}

/// Check a (trimmed) name: 2-30 characters of ASCII letters, Á É Í Ó Ú Ü Ñ in either case,
/// digits, space or underscore.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) && name.chars().all(is_name_char)
}
