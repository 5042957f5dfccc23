use apprec::catalog::{CatalogEntry, MemoryCatalog};
use apprec::example_apps::DemoCorpus;
use apprec::index::MemoryIndex;

/// Build the small Debian-flavored corpus shared by the demo binaries.
///
/// The catalog carries eight installed packages (two auto-installed, one
/// OR-dependency pair) plus ten available ones, so both profile reductions
/// have something to remove before the first query runs.
pub fn build_demo_corpus() -> DemoCorpus {
    DemoCorpus {
        catalog: demo_catalog(),
        items: demo_items(),
        users: demo_users(),
    }
}

fn demo_catalog() -> MemoryCatalog {
    MemoryCatalog::new(vec![
        CatalogEntry::installed("vim").with_or_group(&["vim-common"]),
        CatalogEntry::auto_installed("vim-common"),
        CatalogEntry::installed("mutt").with_or_group(&["exim4", "postfix"]),
        CatalogEntry::auto_installed("exim4"),
        CatalogEntry::installed("git"),
        CatalogEntry::installed("irssi"),
        CatalogEntry::installed("gcc"),
        CatalogEntry::installed("make"),
        CatalogEntry::available("emacs"),
        CatalogEntry::available("nano"),
        CatalogEntry::available("postfix"),
        CatalogEntry::available("tmux"),
        CatalogEntry::available("screen"),
        CatalogEntry::available("weechat"),
        CatalogEntry::available("gdb"),
        CatalogEntry::available("cmake"),
        CatalogEntry::available("gimp"),
        CatalogEntry::available("inkscape"),
    ])
}

fn demo_items() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.add_package(
        "vim",
        &["role::program", "use::editing", "interface::text-mode"],
        "vi compatible text editor",
    );
    index.add_package(
        "vim-common",
        &["role::app-data"],
        "shared runtime files for vim",
    );
    index.add_package(
        "emacs",
        &["role::program", "use::editing", "interface::x11"],
        "extensible self documenting text editor",
    );
    index.add_package(
        "nano",
        &["role::program", "use::editing", "interface::text-mode"],
        "small friendly text editor",
    );
    index.add_package(
        "mutt",
        &["role::program", "mail", "interface::text-mode"],
        "text based mail reader",
    );
    index.add_package(
        "exim4",
        &["role::program", "mail", "network::server"],
        "lightweight mail transport agent",
    );
    index.add_package(
        "postfix",
        &["role::program", "mail", "network::server"],
        "high performance mail transport agent",
    );
    index.add_package(
        "git",
        &["role::program", "devel", "works-with::vcs"],
        "fast distributed revision control system",
    );
    index.add_package(
        "irssi",
        &["role::program", "use::chatting", "interface::text-mode"],
        "terminal based irc client",
    );
    index.add_package(
        "weechat",
        &["role::program", "use::chatting", "interface::text-mode"],
        "fast light extensible chat client",
    );
    index.add_package(
        "tmux",
        &["role::program", "interface::text-mode"],
        "terminal multiplexer with pane splitting",
    );
    index.add_package(
        "screen",
        &["role::program", "interface::text-mode"],
        "terminal multiplexer with session reattach",
    );
    index.add_package(
        "gcc",
        &["role::program", "devel", "devel::compiler"],
        "gnu c compiler",
    );
    index.add_package(
        "gdb",
        &["role::program", "devel", "devel::debugger"],
        "gnu source level debugger",
    );
    index.add_package(
        "make",
        &["role::program", "devel"],
        "utility for directing compilation",
    );
    index.add_package(
        "cmake",
        &["role::program", "devel"],
        "cross platform build system generator",
    );
    index.add_package(
        "gimp",
        &["role::program", "use::image", "interface::x11"],
        "raster image editor and paint program",
    );
    index.add_package(
        "inkscape",
        &["role::program", "use::image", "interface::x11"],
        "vector based drawing program",
    );
    index
}

fn demo_users() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.add_user("user-01", &["vim", "git", "gcc", "gdb", "make", "tmux"]);
    index.add_user("user-02", &["vim", "git", "mutt", "irssi", "screen"]);
    index.add_user("user-03", &["emacs", "git", "gcc", "cmake", "gdb"]);
    index.add_user("user-04", &["vim", "mutt", "postfix", "weechat"]);
    index.add_user("user-05", &["nano", "irssi", "screen", "tmux"]);
    index.add_user("user-06", &["vim", "git", "make", "cmake", "gdb"]);
    index
}
