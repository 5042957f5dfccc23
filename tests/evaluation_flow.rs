use apprec::{
    CatalogEntry, CrossValidation, MemoryCatalog, MemoryIndex, Metric, Recommender,
    RecommenderConfig, UserProfile,
};

/// Catalog with six manually installed packages, two auto-installed
/// companions, and six more available ones.
fn demo_catalog() -> MemoryCatalog {
    MemoryCatalog::new(vec![
        CatalogEntry::installed("vim"),
        CatalogEntry::auto_installed("vim-common"),
        CatalogEntry::installed("mutt"),
        CatalogEntry::auto_installed("exim4"),
        CatalogEntry::installed("git"),
        CatalogEntry::installed("irssi"),
        CatalogEntry::installed("gcc"),
        CatalogEntry::installed("make"),
        CatalogEntry::available("nano"),
        CatalogEntry::available("postfix"),
        CatalogEntry::available("weechat"),
        CatalogEntry::available("tmux"),
        CatalogEntry::available("gdb"),
        CatalogEntry::available("cmake"),
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
        "gcc",
        &["role::program", "devel", "devel::compiler"],
        "gnu c compiler",
    );
    index.add_package(
        "make",
        &["role::program", "devel"],
        "utility for directing compilation",
    );
    index.add_package(
        "nano",
        &["role::program", "use::editing", "interface::text-mode"],
        "small friendly text editor",
    );
    index.add_package(
        "postfix",
        &["role::program", "mail", "network::server"],
        "high performance mail transport agent",
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
        "gdb",
        &["role::program", "devel", "devel::debugger"],
        "gnu source level debugger",
    );
    index.add_package(
        "cmake",
        &["role::program", "devel"],
        "cross platform build system generator",
    );
    index
}

fn reduced_user(catalog: &MemoryCatalog) -> UserProfile {
    let mut user = UserProfile::from_catalog(catalog);
    user.reduce_to_manually_installed(catalog);
    user
}

fn demo_recommender() -> Recommender {
    Recommender::new(
        Box::new(demo_items()),
        Box::new(MemoryIndex::new()),
        &RecommenderConfig::default(),
    )
    .unwrap()
}

#[test]
fn half_ratio_single_trial_yields_one_value_per_metric() {
    // Four manual items survive the reduction, so a 0.5 ratio trains on
    // two and hides two.
    let catalog = MemoryCatalog::new(vec![
        CatalogEntry::installed("vim"),
        CatalogEntry::auto_installed("vim-common"),
        CatalogEntry::installed("mutt"),
        CatalogEntry::auto_installed("exim4"),
        CatalogEntry::installed("git"),
        CatalogEntry::installed("irssi"),
        CatalogEntry::available("nano"),
        CatalogEntry::available("postfix"),
        CatalogEntry::available("weechat"),
        CatalogEntry::available("tmux"),
    ]);
    let user = reduced_user(&catalog);
    assert_eq!(user.pkg_profile().len(), 4);

    let recommender = demo_recommender();
    let harness = CrossValidation::new(0.5, 1, &recommender, Metric::standard_set(), false)
        .unwrap()
        .with_seed(5);
    let report = harness.run(&user).unwrap();

    assert_eq!(report.rounds(), 1);
    assert_eq!(report.columns().len(), 5);
    for column in report.columns() {
        assert_eq!(column.values().len(), 1);
    }
}

#[test]
fn metric_values_stay_in_the_unit_interval() {
    let catalog = demo_catalog();
    let user = reduced_user(&catalog);
    assert_eq!(user.pkg_profile().len(), 6);

    let recommender = demo_recommender();
    let harness = CrossValidation::new(0.5, 10, &recommender, Metric::standard_set(), false)
        .unwrap()
        .with_seed(29);
    let report = harness.run(&user).unwrap();

    for column in report.columns() {
        assert_eq!(column.values().len(), 10);
        for value in column.values() {
            assert!(
                (0.0..=1.0).contains(value),
                "{} left the unit interval: {value}",
                column.name()
            );
        }
        assert!((0.0..=1.0).contains(&column.mean()));
    }
}

#[test]
fn seeded_runs_agree_end_to_end() {
    let run = || {
        let catalog = demo_catalog();
        let user = reduced_user(&catalog);
        let recommender = demo_recommender();
        CrossValidation::new(0.75, 6, &recommender, Metric::standard_set(), false)
            .unwrap()
            .with_seed(83)
            .run(&user)
            .unwrap()
    };

    let first = run();
    let second = run();
    for (a, b) in first.columns().iter().zip(second.columns().iter()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.values(), b.values());
    }
}

#[test]
fn reports_serialize_for_downstream_plotting() {
    let catalog = demo_catalog();
    let user = reduced_user(&catalog);
    let recommender = demo_recommender();
    let report = CrossValidation::new(0.5, 3, &recommender, Metric::standard_set(), false)
        .unwrap()
        .with_seed(7)
        .run(&user)
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rounds"], 3);
    assert_eq!(json["columns"][0]["name"], "precision");
    assert_eq!(json["columns"][0]["values"].as_array().unwrap().len(), 3);
    assert_eq!(json["columns"][4]["name"], "fpr");
}
