//! Tab completion over the command tree.
//!
//! The buffer is split into whitespace-delimited tokens and walked through
//! the menu levels. Candidates are whole replacement lines (the editor
//! swaps the entire buffer while cycling), padded with trailing spaces to
//! at least the width of the current line so the cursor does not jump
//! backwards between candidates.

use crate::menu::{Menu, MenuItem, MenuNode};
use core_text::str_width;

/// Byte ranges of the whitespace-separated tokens in `s`.
pub(crate) fn split_index(s: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut in_space = true;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if !in_space && c == ' ' {
            in_space = true;
            ranges.push((start, i));
        } else if in_space && c != ' ' {
            start = i;
            in_space = false;
        }
    }
    if !in_space {
        ranges.push((start, s.len()));
    }
    ranges
}

/// Build full replacement lines for `names` at the current position:
/// `line` is everything up to and including the token being completed and
/// `cmd` is that token (empty when completing at a fresh word boundary).
/// `minlen` is the byte length of the line being completed; the pad that
/// tops a candidate up to it is measured in display columns.
fn candidate_lines(line: &str, cmd: &str, names: &[&str], minlen: usize) -> Vec<String> {
    let mut base = line.to_string();
    if cmd.is_empty() && !base.is_empty() {
        base.push(' ');
    }
    names
        .iter()
        .map(|name| {
            let mut out = format!("{}{}", base, &name[cmd.len()..]);
            let pad = minlen.saturating_sub(str_width(&out));
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out
        })
        .collect()
}

/// The completion callback body: candidates for `cmd_line` against `root`.
pub(crate) fn completions_for(root: &Menu, cmd_line: &str) -> Vec<String> {
    let minlen = cmd_line.len();
    let mut menu: &Menu = root;
    let mut line = "";
    for (start, end) in split_index(cmd_line) {
        let cmd = &cmd_line[start..end];
        line = &cmd_line[..end];
        let matches: Vec<&MenuItem> = menu
            .items()
            .iter()
            .filter(|item| item.name.starts_with(cmd))
            .collect();
        match matches.len() {
            0 => return Vec::new(),
            1 => {
                let item = matches[0];
                if cmd.len() < item.name.len() {
                    // Unambiguous but incomplete: extend it.
                    return candidate_lines(line, cmd, &[item.name], minlen);
                }
                match &item.node {
                    MenuNode::Sub { menu: sub, .. } => {
                        menu = sub.as_ref();
                    }
                    // A fully typed leaf has nothing to offer.
                    MenuNode::Leaf { .. } => return Vec::new(),
                }
            }
            _ => {
                let names: Vec<&str> = matches.iter().map(|item| item.name).collect();
                return candidate_lines(line, cmd, &names, minlen);
            }
        }
    }
    // Every token matched a submenu exactly: offer everything here.
    let names: Vec<&str> = menu.items().iter().map(|item| item.name).collect();
    candidate_lines(line, "", &names, minlen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuItem;
    use crate::Cli;

    fn noop(_cli: &mut Cli, _args: &[String]) {}

    fn tree() -> Menu {
        let amenu = Menu::new(vec![
            MenuItem::leaf("a0", "a0 function", noop),
            MenuItem::leaf("a1", "a1 function", noop),
        ]);
        Menu::new(vec![
            MenuItem::submenu("amenu", amenu, "menu a functions"),
            MenuItem::leaf("exit", "exit application", noop),
            MenuItem::leaf("extra", "another command", noop),
            MenuItem::leaf("help", "general help", noop),
        ])
    }

    #[test]
    fn split_index_matches_tokens() {
        assert_eq!(
            split_index("aaa bb  ccccc      ddddd"),
            vec![(0, 3), (4, 6), (8, 13), (19, 24)]
        );
        assert_eq!(split_index(""), vec![]);
        assert_eq!(split_index("a"), vec![(0, 1)]);
        assert_eq!(split_index("  a  "), vec![(2, 3)]);
    }

    #[test]
    fn empty_line_offers_all_roots() {
        let menu = tree();
        let out = completions_for(&menu, "");
        assert_eq!(out, ["amenu", "exit", "extra", "help"]);
    }

    #[test]
    fn unique_prefix_extends() {
        let menu = tree();
        let out = completions_for(&menu, "h");
        assert_eq!(out, ["help"]);
    }

    #[test]
    fn ambiguous_prefix_lists_matches() {
        let menu = tree();
        let out = completions_for(&menu, "ex");
        assert_eq!(out, ["exit", "extra"]);
    }

    #[test]
    fn no_match_offers_nothing() {
        let menu = tree();
        assert!(completions_for(&menu, "zz").is_empty());
    }

    #[test]
    fn submenu_path_offers_children() {
        let menu = tree();
        let out = completions_for(&menu, "amenu");
        assert_eq!(out, ["amenu a0", "amenu a1"]);
        let out = completions_for(&menu, "amenu a0");
        assert!(out.is_empty());
    }

    #[test]
    fn candidates_pad_to_line_width() {
        let menu = tree();
        // The line is longer than the candidate it produces: completions
        // are padded so the repaint does not shrink the line.
        let out = completions_for(&menu, "amenu a0   ");
        // Token walk: "amenu" -> submenu, "a0" -> complete leaf; the
        // trailing spaces are not a token, so this is the leaf case.
        assert!(out.is_empty());
        let out = completions_for(&menu, "e");
        for cand in &out {
            assert!(str_width(cand) >= str_width("e"));
        }
    }

    #[test]
    fn multibyte_token_pads_to_byte_length() {
        let menu = Menu::new(vec![
            MenuItem::leaf("日本語x", "wide command", noop),
            MenuItem::leaf("other", "ascii command", noop),
        ]);
        // "日本語" is 9 bytes but 6 display columns; the unique-prefix
        // extension "日本語x" is 7 columns, so it is topped up with two
        // pad spaces to reach the 9-byte target.
        let out = completions_for(&menu, "日本語");
        assert_eq!(out, ["日本語x  "]);
    }
}
