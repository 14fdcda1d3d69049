// mediamill-cli/src/logging.rs
//
// Logging setup for the CLI. The application uses the standard `log`
// facade with env_logger as the backend, driven by RUST_LOG:
// - RUST_LOG=warn (default): problems only, keeps the progress bar clean
// - RUST_LOG=info: job lifecycle logs from mediamill-core
// - RUST_LOG=debug: staged slots and full engine invocations

pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
