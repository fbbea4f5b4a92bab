//! Key-name vocabulary for the keyboard tools.
//!
//! Tokens resolve to X11 keysyms, which is what the VNC key-event message
//! carries. Printable ASCII characters are their own keysym, so only named
//! keys need table entries.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeymapError {
    #[error("Unknown key name {0:?}")]
    UnknownKey(String),
}

/// Named key tokens and their keysyms, in the order the keymap resource
/// advertises them.
pub const KEYMAP: &[(&str, u32)] = &[
    ("bsp", 0xff08),
    ("tab", 0xff09),
    ("return", 0xff0d),
    ("enter", 0xff0d),
    ("esc", 0xff1b),
    ("ins", 0xff63),
    ("delete", 0xffff),
    ("del", 0xffff),
    ("home", 0xff50),
    ("end", 0xff57),
    ("pgup", 0xff55),
    ("pgdn", 0xff56),
    ("left", 0xff51),
    ("up", 0xff52),
    ("right", 0xff53),
    ("down", 0xff54),
    ("slash", 0x002f),
    ("bslash", 0x005c),
    ("fslash", 0x002f),
    ("spacebar", 0x0020),
    ("space", 0x0020),
    ("sb", 0x0020),
    ("f1", 0xffbe),
    ("f2", 0xffbf),
    ("f3", 0xffc0),
    ("f4", 0xffc1),
    ("f5", 0xffc2),
    ("f6", 0xffc3),
    ("f7", 0xffc4),
    ("f8", 0xffc5),
    ("f9", 0xffc6),
    ("f10", 0xffc7),
    ("f11", 0xffc8),
    ("f12", 0xffc9),
    ("f13", 0xffca),
    ("f14", 0xffcb),
    ("f15", 0xffcc),
    ("f16", 0xffcd),
    ("f17", 0xffce),
    ("f18", 0xffcf),
    ("f19", 0xffd0),
    ("f20", 0xffd1),
    ("lshift", 0xffe1),
    ("shift", 0xffe1),
    ("rshift", 0xffe2),
    ("lctrl", 0xffe3),
    ("ctrl", 0xffe3),
    ("rctrl", 0xffe4),
    ("lmeta", 0xffe7),
    ("meta", 0xffe7),
    ("rmeta", 0xffe8),
    ("lalt", 0xffe9),
    ("alt", 0xffe9),
    ("ralt", 0xffea),
    ("scrlk", 0xff14),
    ("sysrq", 0xff15),
    ("numlk", 0xff7f),
    ("caplk", 0xffe5),
    ("pause", 0xff13),
    ("lsuper", 0xffeb),
    ("super", 0xffeb),
    ("rsuper", 0xffec),
    ("lhyper", 0xffed),
    ("hyper", 0xffed),
    ("rhyper", 0xffee),
    ("kp0", 0xffb0),
    ("kp1", 0xffb1),
    ("kp2", 0xffb2),
    ("kp3", 0xffb3),
    ("kp4", 0xffb4),
    ("kp5", 0xffb5),
    ("kp6", 0xffb6),
    ("kp7", 0xffb7),
    ("kp8", 0xffb8),
    ("kp9", 0xffb9),
    ("kpenter", 0xff8d),
];

/// The advertised key vocabulary, in stable order.
pub fn key_names() -> Vec<&'static str> {
    KEYMAP.iter().map(|&(name, _)| name).collect()
}

/// Resolve a single token: a named key, or one printable-ASCII character.
pub fn keysym(token: &str) -> Option<u32> {
    if let Some(&(_, sym)) = KEYMAP.iter().find(|&&(name, _)| name == token) {
        return Some(sym);
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => char_keysym(ch),
        _ => None,
    }
}

/// Resolve a compound descriptor like `ctrl-alt-del` into the keysyms of its
/// tokens, in order. A lone `-` is the minus key, not an empty chord.
pub fn resolve_chord(descriptor: &str) -> Result<Vec<u32>, KeymapError> {
    if let (Some(ch), None) = {
        let mut chars = descriptor.chars();
        (chars.next(), chars.next())
    } {
        let sym =
            char_keysym(ch).ok_or_else(|| KeymapError::UnknownKey(descriptor.to_string()))?;
        return Ok(vec![sym]);
    }
    descriptor
        .split('-')
        .map(|token| keysym(token).ok_or_else(|| KeymapError::UnknownKey(token.to_string())))
        .collect()
}

fn char_keysym(ch: char) -> Option<u32> {
    // X11 keysyms coincide with ASCII in the printable range
    if ch == ' ' || ch.is_ascii_graphic() {
        Some(ch as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_is_fixed_and_non_empty() {
        let names = key_names();
        assert!(!names.is_empty());
        assert_eq!(names, key_names());
        assert_eq!(names[0], "bsp");
        assert_eq!(*names.last().unwrap(), "kpenter");
    }

    #[test]
    fn test_every_advertised_name_resolves() {
        for name in key_names() {
            assert!(keysym(name).is_some(), "no keysym for {name}");
        }
    }

    #[test]
    fn test_named_keys_resolve_to_keysyms() {
        assert_eq!(keysym("enter"), Some(0xff0d));
        assert_eq!(keysym("return"), Some(0xff0d));
        assert_eq!(keysym("shift"), Some(0xffe1));
        assert_eq!(keysym("kpenter"), Some(0xff8d));
        assert_eq!(keysym("f12"), Some(0xffc9));
    }

    #[test]
    fn test_single_characters_resolve_to_ascii() {
        assert_eq!(keysym("a"), Some(0x61));
        assert_eq!(keysym("1"), Some(0x31));
        assert_eq!(keysym("!"), Some(0x21));
        assert_eq!(keysym(" "), Some(0x20));
    }

    #[test]
    fn test_unknown_token_does_not_resolve() {
        assert_eq!(keysym("bogus"), None);
        assert_eq!(keysym(""), None);
        assert_eq!(keysym("\u{e9}"), None);
    }

    #[test]
    fn test_resolve_chord_orders_tokens() {
        assert_eq!(resolve_chord("shift-e").unwrap(), vec![0xffe1, 0x65]);
        assert_eq!(
            resolve_chord("ctrl-alt-del").unwrap(),
            vec![0xffe3, 0xffe9, 0xffff]
        );
        assert_eq!(resolve_chord("enter").unwrap(), vec![0xff0d]);
    }

    #[test]
    fn test_resolve_chord_lone_dash_is_minus() {
        assert_eq!(resolve_chord("-").unwrap(), vec![0x2d]);
    }

    #[test]
    fn test_resolve_chord_rejects_unknown_token() {
        assert_eq!(
            resolve_chord("ctrl-bogus"),
            Err(KeymapError::UnknownKey("bogus".to_string()))
        );
        assert!(resolve_chord("").is_err());
    }
}
