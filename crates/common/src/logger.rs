use tracing_subscriber::EnvFilter;

pub fn setup_logger() {
    // Chromium's CDP traffic and teloxide's polling are extremely chatty at
    // debug level, keep them down to warnings.
    let filter = EnvFilter::new("debug")
        .add_directive("chromiumoxide=warn".parse().unwrap())
        .add_directive("teloxide=warn".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    tracing_subscriber::fmt()
        // .with_file(true)
        // .with_line_number(true)
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(filter)
        .init();
}
