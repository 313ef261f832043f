//! Command-line definition

use ccc_catalog::CascadeLevel;
use ccc_core::FormType;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Selection flags in cascade order, paired with their level
pub const LEVEL_FLAGS: [(&str, CascadeLevel); 5] = [
    ("operation", CascadeLevel::Operation),
    ("control", CascadeLevel::Control),
    ("framework", CascadeLevel::ControlFramework),
    ("context", CascadeLevel::OperatingContext),
    ("equipment", CascadeLevel::Equipment),
];

fn selection_args(cmd: Command) -> Command {
    let cmd = LEVEL_FLAGS.iter().fold(cmd, |cmd, (flag, level)| {
        cmd.arg(
            Arg::new(*flag)
                .long(*flag)
                .value_name("ID")
                .help(format!("{} id", level.title())),
        )
    });
    cmd.arg(
        Arg::new("lead-observer")
            .long("lead-observer")
            .value_name("ID")
            .help("Lead observer id"),
    )
}

fn location_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("lat")
            .long("lat")
            .required(required)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
            .help("Latitude of the marker"),
    )
    .arg(
        Arg::new("lng")
            .long("lng")
            .required(required)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
            .help("Longitude of the marker"),
    )
}

/// Build the `ccc-marker` command
#[must_use]
pub fn build() -> Command {
    Command::new("ccc-marker")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Critical-control marker selection, share URLs and submission")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            selection_args(
                Command::new("options").about("List the choices offered at a cascade level"),
            )
            .arg(
                Arg::new("level")
                    .required(true)
                    .value_parser(value_parser!(CascadeLevel))
                    .help("operation, control, control-framework, operating-context or equipment"),
            ),
        )
        .subcommand(selection_args(
            Command::new("url").about("Print the share URL for a selection"),
        ))
        .subcommand(
            Command::new("decode")
                .about("Print the selection encoded in a share URL")
                .arg(Arg::new("url").required(true).help("Share URL")),
        )
        .subcommand(location_args(
            selection_args(Command::new("summary").about("Print the parameter summary")),
            false,
        ))
        .subcommand(Command::new("assignees").about("List assignees from the store"))
        .subcommand(
            location_args(
                selection_args(Command::new("submit").about("Validate and store a marker")),
                true,
            )
            .arg(
                Arg::new("form")
                    .long("form")
                    .required(true)
                    .value_parser(value_parser!(FormType))
                    .help("Form type: CCC or FCC"),
            )
            .arg(
                Arg::new("assignee")
                    .long("assignee")
                    .value_name("UID")
                    .help("Assignee uid from the store"),
            ),
        )
}

/// Config path given on the command line
#[must_use]
pub fn config_path(matches: &ArgMatches) -> Option<&PathBuf> {
    matches.get_one::<PathBuf>("config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_is_consistent() {
        build().debug_assert();
    }

    #[test]
    fn parses_submit() {
        let m = build()
            .try_get_matches_from([
                "ccc-marker", "submit", "--operation", "NMKM", "--form", "fcc", "--lat",
                "-37.8", "--lng", "144.9",
            ])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "submit");
        assert_eq!(sub.get_one::<FormType>("form"), Some(&FormType::Fcc));
        assert_eq!(sub.get_one::<f64>("lat"), Some(&-37.8));
    }

    #[test]
    fn submit_requires_location() {
        let res = build().try_get_matches_from(["ccc-marker", "submit", "--form", "CCC"]);
        assert!(res.is_err());
    }

    #[test]
    fn level_argument_uses_kebab_names() {
        let m = build()
            .try_get_matches_from(["ccc-marker", "options", "control-framework", "--control", "1"])
            .unwrap();
        let sub = m.subcommand_matches("options").unwrap();
        assert_eq!(
            sub.get_one::<CascadeLevel>("level"),
            Some(&CascadeLevel::ControlFramework)
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let m = build()
            .try_get_matches_from(["ccc-marker", "assignees", "--log-json", "--config", "c.toml"])
            .unwrap();
        assert!(m.get_flag("log-json"));
        assert_eq!(config_path(&m), Some(&PathBuf::from("c.toml")));
    }
}
