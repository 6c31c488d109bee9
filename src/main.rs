//! # Cartolina CLI
//!
//! Command-line interface for browsing templates, previewing panels, and
//! exporting print-ready cards.
//!
//! ## Usage
//!
//! ```bash
//! # List the template gallery
//! cartolina templates
//!
//! # Filter and search
//! cartolina templates --category birthday --search balloons
//!
//! # Render one panel to PNG at preview scale
//! cartolina preview birthday-balloons-01 --panel front -o front.png
//!
//! # Render at full print resolution
//! cartolina preview birthday-balloons-01 --panel inside-left --print -o left.png
//!
//! # Export the quarter-fold PDF
//! cartolina export birthday-balloons-01 -o card.pdf
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cartolina::{
    CardError,
    export::{ExportSettings, export_pdf_to_file, render_card_panels},
    render::{self, RasterSurface},
    template::{CategoryFilter, PanelKind, Template, TemplateStore},
};

/// Cartolina - greeting card composer
#[derive(Parser, Debug)]
#[command(name = "cartolina")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the template records
    #[arg(long, global = true, default_value = "templates")]
    templates_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List templates in the gallery
    Templates {
        /// Category filter: all, birthday, holiday, thank-you, get-well, blank
        #[arg(long, default_value = "all")]
        category: String,

        /// Case-insensitive search over name, description, and tags
        #[arg(long)]
        search: Option<String>,
    },

    /// Render one panel of a template to a PNG file
    Preview {
        /// Template id (see `cartolina templates`)
        template_id: String,

        /// Panel to render: front, back, inside-left, inside-right
        #[arg(long, default_value = "front")]
        panel: String,

        /// Render at full print resolution instead of preview scale
        #[arg(long)]
        print: bool,

        /// Explicit scale factor (overrides --print)
        #[arg(long)]
        scale: Option<f32>,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = "panel.png")]
        output: PathBuf,
    },

    /// Export a template as a quarter-fold card PDF
    Export {
        /// Template id (see `cartolina templates`)
        template_id: String,

        /// Skip the dashed fold guides
        #[arg(long)]
        no_fold_lines: bool,

        /// JPEG quality for the embedded panels (1-100)
        #[arg(long, default_value = "95")]
        quality: u8,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = "card.pdf")]
        output: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CardError> {
    let cli = Cli::parse();
    let store = TemplateStore::new(&cli.templates_dir);

    match cli.command {
        Commands::Templates { category, search } => {
            let all = store.load_all()?;
            report_load_failures(&store);

            let filter: CategoryFilter = category.parse().map_err(CardError::Validation)?;
            let selected: Vec<&Template> = match &search {
                Some(query) => store
                    .search(query)
                    .into_iter()
                    .filter(|t| filter.matches(t.category))
                    .collect(),
                None => store.by_category(filter),
            };

            for template in &selected {
                println!(
                    "{:<24} {:<10} {:<24} {}",
                    template.id,
                    template.category,
                    template.name,
                    template.description
                );
            }
            println!("\n{} of {} templates", selected.len(), all.len());
        }

        Commands::Preview {
            template_id,
            panel,
            print,
            scale,
            output,
        } => {
            store.load_all()?;
            report_load_failures(&store);
            let template = find_template(&store, &template_id)?;
            let kind: PanelKind = panel.parse().map_err(CardError::Validation)?;

            let scale = scale.unwrap_or(if print {
                render::PRINT_SCALE
            } else {
                render::PREVIEW_SCALE
            });

            let mut surface = RasterSurface::new();
            render::render_panel(template.panel(kind), &mut surface, scale)?;
            std::fs::write(&output, surface.encode_png()?)?;
            println!(
                "Saved {} panel ({}x{}) to {}",
                kind,
                surface.width(),
                surface.height(),
                output.display()
            );
        }

        Commands::Export {
            template_id,
            no_fold_lines,
            quality,
            output,
        } => {
            store.load_all()?;
            report_load_failures(&store);
            let template = find_template(&store, &template_id)?;

            let mut settings = ExportSettings::default();
            settings.include_fold_lines = !no_fold_lines;
            settings.jpeg_quality = quality;
            settings.metadata.title = template.name.clone();

            println!("Rendering panels for '{}'...", template.name);
            let panels = render_card_panels(template)?;
            export_pdf_to_file(&panels, &settings, &output)?;
            println!("Exported {}", output.display());
        }
    }

    Ok(())
}

fn find_template<'a>(store: &'a TemplateStore, id: &str) -> Result<&'a Template, CardError> {
    store.get_by_id(id).ok_or_else(|| {
        CardError::Validation(format!(
            "unknown template '{}'. Run `cartolina templates` to see available ids.",
            id
        ))
    })
}

fn report_load_failures(store: &TemplateStore) {
    for failure in store.load_failures() {
        eprintln!("warning: skipped {}: {}", failure.file, failure.reason);
    }
}
