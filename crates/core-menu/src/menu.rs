//! The command tree: menus, leaves and their help tables.

use crate::cli::Cli;
use std::rc::Rc;

/// Output sink supplied by the embedding application.
pub trait User {
    fn put(&mut self, s: &str);
}

/// One row of a help table: a parameter form and its description.
#[derive(Debug, Clone, Copy)]
pub struct Help {
    pub parm: &'static str,
    pub descr: &'static str,
}

/// Generic help for a leaf with no argument table.
pub(crate) const CR_HELP: &[Help] = &[Help {
    parm: "<cr>",
    descr: "perform the function",
}];

/// Top-level editing help, displayed by the conventional `help` command.
pub const GENERAL_HELP: &[Help] = &[
    Help {
        parm: "?",
        descr: "display command help - e.g. ?, show ?, s?",
    },
    Help {
        parm: "<up>",
        descr: "go backwards in command history",
    },
    Help {
        parm: "<dn>",
        descr: "go forwards in command history",
    },
    Help {
        parm: "<tab>",
        descr: "auto complete commands",
    },
    Help {
        parm: "* note",
        descr: "commands can be incomplete - e.g. sh = sho = show",
    },
];

/// Help for the conventional `history` command.
pub const HISTORY_HELP: &[Help] = &[
    Help {
        parm: "<cr>",
        descr: "display all history",
    },
    Help {
        parm: "<index>",
        descr: "recall history entry <index>",
    },
];

/// A leaf command: description plus the function invoked with the
/// remaining whitespace-split arguments.
#[derive(Clone, Copy)]
pub struct Leaf {
    pub descr: &'static str,
    pub func: fn(&mut Cli, &[String]),
}

/// What a named item resolves to.
pub enum MenuNode {
    /// A nested menu with its own description.
    Sub { menu: Rc<Menu>, descr: &'static str },
    /// A command; an empty help table means the generic `<cr>` help.
    Leaf { leaf: Leaf, help: &'static [Help] },
}

pub struct MenuItem {
    pub name: &'static str,
    pub node: MenuNode,
}

impl MenuItem {
    pub fn submenu(name: &'static str, menu: Menu, descr: &'static str) -> Self {
        Self {
            name,
            node: MenuNode::Sub {
                menu: Rc::new(menu),
                descr,
            },
        }
    }

    pub fn leaf(name: &'static str, descr: &'static str, func: fn(&mut Cli, &[String])) -> Self {
        Self {
            name,
            node: MenuNode::Leaf {
                leaf: Leaf { descr, func },
                help: &[],
            },
        }
    }

    pub fn leaf_with_help(
        name: &'static str,
        descr: &'static str,
        func: fn(&mut Cli, &[String]),
        help: &'static [Help],
    ) -> Self {
        Self {
            name,
            node: MenuNode::Leaf {
                leaf: Leaf { descr, func },
                help,
            },
        }
    }
}

/// An ordered set of named items at one level of the tree.
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}
