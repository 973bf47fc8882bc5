use crate::suite::CaseId;

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Run { cases: Vec<CaseId> },
    List,
    Help,
    Unknown(String),
}

pub const USAGE: &str = "\
Usage: issuecheck <command>

Commands:
  run [case...]  Run all cases, or only the named ones
  list           List the available cases
  help           Show this message

Configuration:
  ISSUECHECK_BASE_URL    API base URL (default https://api.github.com)
  ISSUECHECK_REPOSITORY  Target repository as <owner>/<repo>
  ISSUECHECK_USER        Login used for Basic authentication
  ISSUECHECK_TOKEN       Personal access token used for Basic authentication
  ISSUECHECK_LOG         Log filter (default warn)";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Help,
        2 => match args[1].as_str() {
            "run" => Command::Run {
                cases: CaseId::all().to_vec(),
            },
            "list" => Command::List,
            "help" | "--help" | "-h" => Command::Help,
            cmd => Command::Unknown(cmd.to_string()),
        },
        _ => match args[1].as_str() {
            "run" => parse_case_names(&args[2..]),
            cmd => Command::Unknown(format!("{} {}", cmd, args[2])),
        },
    }
}

fn parse_case_names(names: &[String]) -> Command {
    let mut cases = Vec::new();
    for name in names {
        match CaseId::from_name(name) {
            Some(id) if !cases.contains(&id) => cases.push(id),
            Some(_) => (),
            None => {
                return Command::Unknown(format!(
                    "Unknown case `{name}`. Run `issuecheck list` to see the available cases."
                ));
            }
        }
    }
    Command::Run { cases }
}
