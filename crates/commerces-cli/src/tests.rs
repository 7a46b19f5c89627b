use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["commerces"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.filters.types.is_empty());
    assert!(cli.filters.communes.is_empty());
    assert!(cli.url.is_none());
}

#[test]
fn parses_summary_command() {
    let cli = Cli::try_parse_from(["commerces", "summary"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Summary)));
}

#[test]
fn types_top_defaults_to_ten() {
    let cli = Cli::try_parse_from(["commerces", "types"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Types { top: 10 })));
}

#[test]
fn communes_top_override() {
    let cli = Cli::try_parse_from(["commerces", "communes", "--top", "3"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Communes { top: 3 })));
}

#[test]
fn crosstab_top_override() {
    let cli = Cli::try_parse_from(["commerces", "crosstab", "--top", "5"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Crosstab { top: 5 })));
}

#[test]
fn list_limit_is_optional() {
    let cli = Cli::try_parse_from(["commerces", "list"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::List { limit: None })));

    let cli = Cli::try_parse_from(["commerces", "list", "--limit", "20"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::List { limit: Some(20) })));
}

#[test]
fn filters_are_repeatable_and_global() {
    let cli = Cli::try_parse_from([
        "commerces",
        "map",
        "--type",
        "Presse",
        "--type",
        "Fleuriste",
        "--commune",
        "Paris",
    ])
    .unwrap();
    assert!(matches!(cli.command, Some(Commands::Map)));
    assert_eq!(cli.filters.types, vec!["Presse", "Fleuriste"]);
    assert_eq!(cli.filters.communes, vec!["Paris"]);
}

#[test]
fn filters_before_subcommand() {
    let cli = Cli::try_parse_from(["commerces", "--commune", "Vincennes", "raw"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Raw)));
    assert_eq!(cli.filters.communes, vec!["Vincennes"]);
}

#[test]
fn url_override() {
    let cli = Cli::try_parse_from(["commerces", "source", "--url", "http://localhost:8080/records"])
        .unwrap();
    assert!(matches!(cli.command, Some(Commands::Source)));
    assert_eq!(cli.url.as_deref(), Some("http://localhost:8080/records"));
}

#[test]
fn watch_interval_default() {
    let cli = Cli::try_parse_from(["commerces", "watch"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Watch { interval_secs: 60 })
    ));
}

#[test]
fn timeline_field_is_optional() {
    let cli = Cli::try_parse_from(["commerces", "timeline"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Timeline { field: None })));

    let cli = Cli::try_parse_from(["commerces", "timeline", "--field", "date"]).unwrap();
    match cli.command {
        Some(Commands::Timeline { field }) => assert_eq!(field.as_deref(), Some("date")),
        other => panic!("expected timeline command, got {other:?}"),
    }
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["commerces", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["commerces", "collect"]).is_err());
}
