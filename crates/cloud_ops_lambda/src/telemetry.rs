/// Installs the fmt subscriber for the Lambda binaries. `RUST_LOG`
/// controls the filter; repeated init attempts are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
