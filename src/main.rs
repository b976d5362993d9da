use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    resume_match_desktop_lib::run(std::env::args().collect()).await
}
