//! Focused unit tests covering render option resolution.

use super::*;
use camino::Utf8PathBuf;
use clap::Parser;
use rbook_core::BookConfig;
use crate::render::{RenderArgs, RenderConfig, RenderPlan, config_from_layers_for_test};
use rstest::rstest;

fn book() -> BookConfig {
    BookConfig {
        output_folder: String::from("out"),
        rallybook_file: String::from("book.html"),
        database: String::from("rally.db"),
        ..BookConfig::default()
    }
}

fn options(output: Option<&str>, gpx: Option<&str>, database: Option<&str>) -> RenderConfig {
    RenderConfig {
        config: Utf8PathBuf::from(DEFAULT_BOOK_CONFIG),
        output: output.map(Utf8PathBuf::from),
        gpx: gpx.map(Utf8PathBuf::from),
        database: database.map(Utf8PathBuf::from),
    }
}

#[rstest]
fn config_path_defaults_to_rbook_yml() {
    let config = RenderConfig::from(RenderArgs::default());
    assert_eq!(config.config, Utf8PathBuf::from("rbook.yml"));
    assert_eq!(config.output, None);
}

#[rstest]
fn book_configuration_supplies_default_targets() {
    let plan = options(None, None, None).plan(&book()).expect("plan resolves");
    assert_eq!(
        plan,
        RenderPlan {
            database: Utf8PathBuf::from("rally.db"),
            targets: rbook_render::OutputTargets {
                document: Utf8PathBuf::from("out/book.html"),
                gpx: None,
            },
        }
    );
}

#[rstest]
#[case("", "out/output.html")]
#[case("   ", "out/output.html")]
#[case("brit-butt.html", "out/brit-butt.html")]
fn rally_book_file_falls_back_to_output_html(#[case] file: &str, #[case] expected: &str) {
    let config = BookConfig {
        rallybook_file: file.to_owned(),
        ..book()
    };
    let plan = options(None, None, None).plan(&config).expect("plan resolves");
    assert_eq!(plan.targets.document, Utf8PathBuf::from(expected));
}

#[rstest]
fn configured_gpx_file_lands_in_the_output_folder() {
    let mut config = book();
    config.generate_gpx.output_gpx = String::from("bonuses.gpx");
    let plan = options(None, None, None).plan(&config).expect("plan resolves");
    assert_eq!(plan.targets.gpx, Some(Utf8PathBuf::from("out/bonuses.gpx")));
}

#[rstest]
fn command_line_overrides_win() {
    let mut config = book();
    config.generate_gpx.output_gpx = String::from("bonuses.gpx");
    let plan = options(Some("print/final.html"), Some("sat.gpx"), Some("copy.db"))
        .plan(&config)
        .expect("plan resolves");
    assert_eq!(plan.targets.document, Utf8PathBuf::from("print/final.html"));
    assert_eq!(plan.targets.gpx, Some(Utf8PathBuf::from("sat.gpx")));
    assert_eq!(plan.database, Utf8PathBuf::from("copy.db"));
}

#[rstest]
fn missing_database_names_flag_and_environment() {
    let config = BookConfig {
        database: String::new(),
        ..book()
    };
    let err = options(None, None, None)
        .plan(&config)
        .expect_err("database is required");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_RENDER_DATABASE);
            assert_eq!(env, ENV_RENDER_DATABASE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn render_flags_parse() {
    let cli = Cli::try_parse_from([
        "rbook",
        "render",
        "--config",
        "rally/rbook.yml",
        "--output",
        "book.html",
        "--verbose",
    ])
    .expect("arguments parse");
    assert!(cli.verbose);
    let Command::Render(args) = cli.command;
    assert_eq!(args.config, Some(Utf8PathBuf::from("rally/rbook.yml")));
    assert_eq!(args.output, Some(Utf8PathBuf::from("book.html")));
    assert_eq!(args.gpx, None);
}

#[rstest]
fn unknown_subcommands_are_rejected() {
    let err = Cli::try_parse_from(["rbook", "publish"]).expect_err("unknown subcommand");
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
}

#[rstest]
fn render_command_name_sets_the_environment_prefix() {
    use clap::CommandFactory;

    // ortho_config derives RBOOK_CMDS_<NAME>_* from the command name.
    assert_eq!(RenderArgs::command().get_name(), "render");
    assert!(ENV_RENDER_DATABASE.starts_with("RBOOK_CMDS_RENDER_"));
}

#[rstest]
fn environment_layer_supplies_the_database() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_environment(json!({ "database": "/srv/rally/env.db" }));

    let config = config_from_layers_for_test(composer.layers()).expect("layers merge");
    assert_eq!(config.database, Some(Utf8PathBuf::from("/srv/rally/env.db")));
    assert_eq!(config.config, Utf8PathBuf::from(DEFAULT_BOOK_CONFIG));

    let plan = config
        .plan(&BookConfig {
            database: String::new(),
            ..book()
        })
        .expect("environment database satisfies the plan");
    assert_eq!(plan.database, Utf8PathBuf::from("/srv/rally/env.db"));
}

#[rstest]
fn command_line_layer_beats_environment_and_file() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "database": "file.db", "output": "file.html" }),
        None,
    );
    composer.push_environment(json!({ "database": "env.db", "gpx": "env.gpx" }));
    composer.push_cli(json!({ "database": "cli.db" }));

    let config = config_from_layers_for_test(composer.layers()).expect("layers merge");
    assert_eq!(config.database, Some(Utf8PathBuf::from("cli.db")));
    assert_eq!(config.gpx, Some(Utf8PathBuf::from("env.gpx")));
    assert_eq!(config.output, Some(Utf8PathBuf::from("file.html")));
}

#[rstest]
fn into_config_keeps_command_line_values() {
    let args = RenderArgs {
        config: Some(Utf8PathBuf::from("rally/rbook.yml")),
        database: Some(Utf8PathBuf::from("rally/rally.db")),
        ..RenderArgs::default()
    };
    let config = args.into_config().expect("options merge");
    assert_eq!(config.config, Utf8PathBuf::from("rally/rbook.yml"));
    assert_eq!(config.database, Some(Utf8PathBuf::from("rally/rally.db")));
}
