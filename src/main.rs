mod album;
mod app;
mod audio;
mod config;
mod durations;
mod gate;
mod playback;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
