//! Main application entry point (native).

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
fn main() {
    use inkmark_app::{ReplayError, Script, replay};
    use std::path::PathBuf;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let run = || -> Result<(), ReplayError> {
        let path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .ok_or_else(|| ReplayError::Usage("usage: inkmark <script.json>".to_string()))?;
        log::info!("Replaying {}", path.display());

        let script = Script::load(&path)?;
        let report = replay::run(&script)?;

        println!("{} shape(s) in scene", report.shapes.len());
        for (index, shape) in report.shapes.iter().enumerate() {
            println!(
                "  #{index}: {} with {} point(s), width {} color {}",
                shape.kind.name(),
                shape.points,
                shape.style.line_width,
                shape.style.color
            );
        }
        println!(
            "{} committed, {} erased, {} frame(s), {} draw command(s), {} shape(s) in the last frame",
            report.committed, report.erased, report.frames, report.commands, report.painted
        );
        for filename in &report.exports {
            println!("exported {filename}");
        }
        Ok(())
    };

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(all(feature = "native", not(target_arch = "wasm32"))))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
