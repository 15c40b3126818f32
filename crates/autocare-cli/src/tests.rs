use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["autocare-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["autocare-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["autocare-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn reminders_run_defaults() {
    let cli = Cli::try_parse_from(["autocare-cli", "reminders", "run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Reminders {
            command: ReminderCommands::Run {
                date: None,
                dry_run: false
            }
        })
    ));
}

#[test]
fn reminders_run_with_date_and_dry_run() {
    let cli = Cli::try_parse_from([
        "autocare-cli",
        "reminders",
        "run",
        "--date",
        "2025-03-10",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Reminders {
            command: ReminderCommands::Run {
                date: Some(d),
                dry_run: true
            }
        }) if d == NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    ));
}

#[test]
fn reminders_run_rejects_bad_date() {
    let result = Cli::try_parse_from(["autocare-cli", "reminders", "run", "--date", "03/10/2025"]);
    assert!(result.is_err());
}

#[test]
fn centers_nearby_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "autocare-cli",
        "centers",
        "nearby",
        "--lat",
        "40.7128",
        "--lng",
        "-74.006",
        "--query",
        "oil change",
        "--registered-only",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Centers {
            command:
                CenterCommands::Nearby {
                    lat,
                    lng,
                    query,
                    registered_only,
                    radius,
                    max_results,
                },
        }) => {
            assert!((lat - 40.7128).abs() < f64::EPSILON);
            assert!((lng + 74.006).abs() < f64::EPSILON);
            assert_eq!(query.as_deref(), Some("oil change"));
            assert!(registered_only);
            assert_eq!(radius, None);
            assert_eq!(max_results, None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn centers_nearby_requires_coordinates() {
    let result = Cli::try_parse_from(["autocare-cli", "centers", "nearby", "--lat", "40.0"]);
    assert!(result.is_err());
}

fn nearby_command(args: &[&str]) -> CenterCommands {
    let mut argv = vec!["autocare-cli", "centers", "nearby", "--lat", "40.0", "--lng", "-74.0"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).expect("expected valid cli args").command {
        Some(Commands::Centers { command }) => command,
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn nearby_query_clamps_out_of_range_flags() {
    let query = nearby_query(
        nearby_command(&["--radius", "999999", "--max-results", "0"]),
        5000,
        60,
    );
    assert_eq!(query.radius_m, 50_000);
    assert_eq!(query.max_results, 1);

    let query = nearby_query(nearby_command(&["--radius", "0", "--max-results", "500"]), 5000, 60);
    assert_eq!(query.radius_m, 1);
    assert_eq!(query.max_results, 60);
}

#[test]
fn nearby_query_falls_back_to_configured_defaults() {
    let query = nearby_query(nearby_command(&[]), 8000, 20);
    assert_eq!(query.radius_m, 8000);
    assert_eq!(query.max_results, 20);
    assert!(!query.filter_registered);
}
