use std::io::Write;

fn main() {
    // Logs go to stderr; stdout carries only UCI protocol lines
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    )
    .format(|buf, record| {
        writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
    })
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = bitchess::uci::run_uci_loop() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
