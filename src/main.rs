mod app;
mod catalog;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "catalog.json")]
    catalog: String,

    /// Optional saved view state (focus, axis selections, display mode).
    #[arg(long)]
    view: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "factmap",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::FactmapApp::new(
                cc,
                args.catalog.clone(),
                args.view.clone(),
            )))
        }),
    )
}
