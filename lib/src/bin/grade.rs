//! Grades the trained model in the working directory.
//!
//! Exits 0 when every check passes, 1 on the first failure.

use std::process::ExitCode;

use regression_grader::config::GradingConfig;
use regression_grader::{grading, logging};

fn main() -> ExitCode {
    if let Err(err) = logging::init() {
        eprintln!("{err}");
    }

    match grading::run(&GradingConfig::default()) {
        Ok(report) => {
            println!("{}: all checks passed", report.type_name);
            for stage in &report.stages {
                println!("  {stage}");
            }
            println!(
                "  train score {:.4}, test score {:.4}",
                report.train_score, report.test_score
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
