/// Native entry point: optional image paths as arguments, commands on stdin.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io;
    use std::path::PathBuf;

    use ocrbox::config::AppConfig;
    use ocrbox::native::NativeDriver;

    let config = AppConfig::load_from_default_path();
    ocrbox::logging::init(config.preferences.log_level);

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let mut driver = NativeDriver::new(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let loaded = if paths.is_empty() {
        Ok(())
    } else {
        driver.load(&paths, &mut out)
    };
    let result = loaded.and_then(|()| driver.run(io::stdin().lock(), &mut out));

    if let Err(e) = result {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
