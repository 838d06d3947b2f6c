use super::*;

#[test]
fn parses_migrate_command() {
    let cli = Cli::try_parse_from(["routeledger-cli", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Migrate));
}

#[test]
fn parses_submit_with_repeated_stops_in_order() {
    let cli = Cli::try_parse_from([
        "routeledger-cli",
        "submit",
        "--origin",
        "Depot",
        "--destination",
        "Home",
        "--stop",
        "1 Church St",
        "--stop",
        "2 Mill Ln",
        "--fuel-cost",
        "45",
        "--fuel-liters",
        "30",
        "--price-per-liter",
        "1.5",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Submit {
            origin,
            stops,
            fuel_in_liters,
            ..
        } => {
            assert_eq!(origin, "Depot");
            assert_eq!(stops, vec!["1 Church St", "2 Mill Ln"]);
            assert!((fuel_in_liters - 30.0).abs() < f64::EPSILON);
        }
        other => panic!("expected submit, got {other:?}"),
    }
}

#[test]
fn submit_without_stops_is_allowed() {
    let cli = Cli::try_parse_from([
        "routeledger-cli",
        "submit",
        "--origin",
        "A",
        "--destination",
        "B",
        "--fuel-cost",
        "1",
        "--fuel-liters",
        "1",
        "--price-per-liter",
        "1",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Submit { ref stops, .. } if stops.is_empty()));
}

#[test]
fn submit_requires_fuel_fields() {
    let result = Cli::try_parse_from([
        "routeledger-cli",
        "submit",
        "--origin",
        "A",
        "--destination",
        "B",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_delete_with_id() {
    let cli = Cli::try_parse_from(["routeledger-cli", "delete", "42"]).expect("valid args");
    assert!(matches!(cli.command, Commands::Delete { id: 42 }));
}

#[test]
fn clear_defaults_to_unconfirmed() {
    let cli = Cli::try_parse_from(["routeledger-cli", "clear"]).expect("valid args");
    assert!(matches!(cli.command, Commands::Clear { yes: false }));

    let cli = Cli::try_parse_from(["routeledger-cli", "clear", "--yes"]).expect("valid args");
    assert!(matches!(cli.command, Commands::Clear { yes: true }));
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["routeledger-cli"]).is_err());
}
