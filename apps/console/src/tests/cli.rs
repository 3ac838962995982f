use crate::cli::{Cli, Command, InstanceCommand, VolumeCommand, parse_field};

use clap::Parser;

/// **VALUE**: Global flags work after the subcommand and list args get defaults.
#[test]
fn given_instances_list_when_parsed_then_defaults_applied() {
    let cli = Cli::try_parse_from([
        "console",
        "instances",
        "list",
        "--status",
        "running",
        "--base-url",
        "http://10.0.0.5/api/",
    ])
    .unwrap();

    assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.5/api/"));
    match cli.command {
        Command::Instances(InstanceCommand::List(args)) => {
            assert_eq!(args.page, 1);
            assert_eq!(args.page_size, 10);
            assert_eq!(args.status.as_deref(), Some("running"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

/// **VALUE**: Upload fields parse as repeated key=value pairs.
#[test]
fn given_upload_fields_when_parsed_then_pairs_collected() {
    let cli = Cli::try_parse_from([
        "console", "upload", "a.txt", "--field", "category=docs", "--field", "note=a=b",
    ])
    .unwrap();

    match cli.command {
        Command::Upload { fields, url, .. } => {
            assert_eq!(url, "/upload");
            assert_eq!(
                fields,
                vec![
                    ("category".to_string(), "docs".to_string()),
                    ("note".to_string(), "a=b".to_string())
                ]
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_malformed_field_when_parsed_then_rejected() {
    assert!(parse_field("novalue").is_err());
    assert!(parse_field("=x").is_err());
    assert!(Cli::try_parse_from(["console", "upload", "a.txt", "--field", "bad"]).is_err());
}

#[test]
fn given_attach_without_instance_when_parsed_then_error() {
    assert!(Cli::try_parse_from(["console", "volumes", "attach", "v-1"]).is_err());

    let cli = Cli::try_parse_from(["console", "volumes", "attach", "v-1", "--instance", "i-1"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Command::Volumes(VolumeCommand::Attach { ref id, ref instance }) if id == "v-1" && instance == "i-1"
    ));
}
