use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = sqlite_xlsx_report::app::run() {
        eprintln!("xlsxreport: {err}");
        return ExitCode::from(err.exit_code());
    }
    ExitCode::SUCCESS
}
