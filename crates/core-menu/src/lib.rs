//! Hierarchical command interpreter over the line editor.
//!
//! Commands live in a tree of named menus whose leaves are plain function
//! pointers. The interpreter supplies tab completion that walks the tree,
//! context help on a trailing `?`, abbreviated (unique-prefix) command
//! matching, and a history display with recall by index.

mod cli;
mod complete;
mod menu;
mod table;

pub use cli::{int_arg, Cli};
pub use menu::{Help, Leaf, Menu, MenuItem, MenuNode, User, GENERAL_HELP, HISTORY_HELP};
pub use table::table_string;
