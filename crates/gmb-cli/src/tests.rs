use super::*;
use commands::{parse_action, ComposerAction};

#[test]
fn parses_reviews_command() {
    let cli = Cli::try_parse_from(["gmb", "reviews"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Reviews));
}

#[test]
fn parses_location_command() {
    let cli = Cli::try_parse_from(["gmb", "location", "ChIJ123"]).expect("expected valid cli args");
    match cli.command {
        Commands::Location { place_id } => assert_eq!(place_id, "ChIJ123"),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn location_requires_place_id() {
    assert!(Cli::try_parse_from(["gmb", "location"]).is_err());
}

#[test]
fn reply_defaults_to_interactive() {
    let cli = Cli::try_parse_from(["gmb", "reply", "r1"]).expect("expected valid cli args");
    match cli.command {
        Commands::Reply { review_id, yes } => {
            assert_eq!(review_id, "r1");
            assert!(!yes);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn reply_with_yes_flag() {
    let cli =
        Cli::try_parse_from(["gmb", "reply", "r1", "--yes"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Reply { yes: true, .. }));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["gmb"]).is_err());
}

#[test]
fn composer_actions_parse_short_and_long_forms() {
    assert_eq!(parse_action("s"), Some(ComposerAction::Submit));
    assert_eq!(parse_action(" Submit \n"), Some(ComposerAction::Submit));
    assert_eq!(parse_action("R"), Some(ComposerAction::Regenerate));
    assert_eq!(parse_action("edit"), Some(ComposerAction::Edit));
    assert_eq!(parse_action("c"), Some(ComposerAction::Cancel));
    assert_eq!(parse_action("x"), None);
    assert_eq!(parse_action(""), None);
}
