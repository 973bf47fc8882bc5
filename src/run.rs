use anyhow::Context;

use crate::cli;
use crate::config::SuiteConfig;
use crate::output;
use crate::suite;

pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Run { cases } => {
            let config = SuiteConfig::load().context("Failed to load configuration")?;
            run_cases(&config, &cases, &mut stdout_additional).await?;
        }
        cli::parser::Command::List => {
            for case in suite::cases() {
                let line = format!(
                    "{:<22} {:<6} -> {}  {}",
                    case.id.name(),
                    case.method.as_str(),
                    case.expected_status.as_u16(),
                    case.id.description()
                );
                output::println(&line, &mut stdout_additional)?;
            }
        }
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Unknown(message) => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
            return Err(anyhow::anyhow!("Invalid command or arguments: {message}"));
        }
    }
    Ok(())
}

/// Runs `cases` in order, printing one line per case and a summary.
///
/// Returns the number of cases run when all of them passed.
pub async fn run_cases(
    config: &SuiteConfig,
    cases: &[suite::CaseId],
    stdout_additional: &mut Option<&mut dyn std::io::Write>,
) -> anyhow::Result<usize> {
    tracing::info!(
        base_url = config.base_url(),
        repository = %config.repository(),
        authenticated = config.credentials().is_some(),
        "running {} case(s)",
        cases.len()
    );

    let mut failed = 0;
    for id in cases {
        let outcome = suite::run_case(config, &suite::case(*id)).await;
        if !outcome.passed() {
            failed += 1;
        }
        output::println(&outcome.to_string(), stdout_additional)?;
    }

    output::println(
        &format!("\n{} passed; {} failed", cases.len() - failed, failed),
        stdout_additional,
    )?;
    if failed > 0 {
        return Err(anyhow::anyhow!("{failed} case(s) failed"));
    }
    Ok(cases.len())
}
