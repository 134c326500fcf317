use bill_reminders::{cli::run_cli, cli::output, init};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init();

    if let Err(err) = run_cli(std::env::args().skip(1)).await {
        output::error(format!("Error: {err}"));
        std::process::exit(1);
    }
}
